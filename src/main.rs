mod ui;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use gaitview::{AppConfig, GaitViewError, JointName, skeleton::load_pose_sequence};
use log::info;
use ui::app::GaitViewApp;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Open the playback window
    View {
        /// Joint position file played back on the simulation tab
        #[arg(short, long)]
        joints: Option<PathBuf>,

        /// Motion file previewed on the data tab
        #[arg(short, long)]
        motion: Option<PathBuf>,
    },
    /// Load a joint position file and print a summary of its first frame
    Inspect {
        #[arg(short, long)]
        joints: PathBuf,
    },
}

fn view(joints: Option<PathBuf>, motion: Option<PathBuf>) -> Result<(), GaitViewError> {
    let app_config = AppConfig::from_local_file().unwrap_or_default();

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([900.0, 600.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Gait Viewer",
        native_options,
        Box::new(|cc| Ok(Box::new(GaitViewApp::new(app_config, joints, motion, cc)))),
    )
    .expect("could not start app");
    Ok(())
}

fn inspect(joints: &Path) -> Result<(), GaitViewError> {
    let sequence = load_pose_sequence(joints)?;
    info!("Inspecting {:?}", joints);
    println!("{} frames", sequence.len());
    if let Some(pose) = sequence.first() {
        for (joint, point) in pose.iter() {
            println!(
                "{:<18} x={:>8.3} y={:>8.3} z={:>8.3}",
                joint.as_str(),
                point.x,
                point.y,
                point.z
            );
        }
        if let Some(com) = pose.get(JointName::CoM) {
            println!("center of mass height: {:.3}", com.z);
        }
    }
    Ok(())
}

fn main() {
    #[cfg(debug_assertions)]
    colog::init();

    let cli = Args::parse();
    ctrlc::set_handler(move || {
        println!("Exiting...");
        std::process::exit(0);
    })
    .expect("Could not set Ctrl-C handler");
    match cli.command {
        Commands::View { joints, motion } => {
            view(joints, motion).expect("Error while running gait viewer")
        }
        Commands::Inspect { joints } => {
            if let Err(e) = inspect(&joints) {
                eprintln!("Could not inspect {:?}: {}", joints, e);
                std::process::exit(1);
            }
        }
    };
}
