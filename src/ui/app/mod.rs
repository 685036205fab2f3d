mod data_view;
mod simulation_view;

use std::{
    path::{Path, PathBuf},
    time::{Duration, Instant},
};

use egui::{Color32, RichText};
use gaitview::{
    AppConfig, GaitViewError, PlaybackDriver, PlaybackEvent, PlaybackSnapshot, Point3D,
    PoseSequence,
    motion::{DataTabSource, SELECTABLE_JOINTS, load_motion_table},
    playback::{
        battery::Battery,
        fault::LegPositionLimit,
    },
    skeleton::JointName,
};
use log::error;

use super::{Notification, install_visuals, skeleton_canvas::Camera3D};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Screen {
    Opening,
    Main,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Tab {
    Simulation,
    Data,
}

/// `GaitViewApp` is the egui front end of the gait viewer.
///
/// It owns the [`PlaybackDriver`] and feeds it from a single periodic tick source
/// evaluated on every frame; views only read the latest [`PlaybackSnapshot`].
pub(crate) struct GaitViewApp {
    config: AppConfig,
    screen: Screen,
    tab: Tab,
    driver: PlaybackDriver,
    snapshot: PlaybackSnapshot,
    next_tick: Option<Instant>,
    action: String,
    joint_file: Option<PathBuf>,
    foot_patches: Vec<Point3D>,
    camera: Camera3D,
    // data tab
    data_source: DataTabSource,
    selected_joint: String,
    motion_file: Option<PathBuf>,
    motion_preview: Vec<[f64; 2]>,
    export_name: String,
    // messages
    status: Option<String>,
    notification: Option<Notification>,
}

impl GaitViewApp {
    pub(crate) fn new(
        config: AppConfig,
        joint_file: Option<PathBuf>,
        motion_file: Option<PathBuf>,
        cc: &eframe::CreationContext<'_>,
    ) -> Self {
        install_visuals(&cc.egui_ctx);

        let driver = PlaybackDriver::default()
            .with_battery(Battery::with_level(config.initial_battery))
            .with_fault_predicate(Box::new(LegPositionLimit::new(config.fault_threshold)))
            .with_tick_period(Duration::from_millis(config.tick_period_ms));
        let snapshot = driver.snapshot();

        let mut app = Self {
            screen: Screen::Opening,
            tab: Tab::Simulation,
            driver,
            snapshot,
            next_tick: None,
            action: "None".to_string(),
            joint_file: None,
            foot_patches: Vec::new(),
            camera: Camera3D::default(),
            data_source: DataTabSource::default(),
            selected_joint: SELECTABLE_JOINTS[0].as_str().to_string(),
            motion_file: None,
            motion_preview: Vec::new(),
            export_name: String::new(),
            status: None,
            notification: None,
            config,
        };

        if let Some(path) = joint_file.or_else(|| app.config.last_joint_file.clone()) {
            app.load_joint_file(&path);
        }
        if let Some(path) = motion_file.or_else(|| app.config.last_motion_file.clone()) {
            app.load_motion_file(&path);
        }
        app
    }

    pub(crate) fn load_joint_file(&mut self, path: &Path) {
        if let Err(e) = self.driver.load_file(path) {
            self.report_load_error(path, e);
            return;
        }
        self.foot_patches = foot_patches(self.driver.sequence());
        self.snapshot = self.driver.snapshot();
        self.joint_file = Some(path.to_path_buf());
        self.config.last_joint_file = Some(path.to_path_buf());
        self.status = None;
        if let Err(e) = self.data_source.follow_joint_file(path) {
            self.report_load_error(path, e);
        }
    }

    pub(crate) fn load_data_file(&mut self, path: &Path) {
        match self.data_source.load_data_file(path) {
            Ok(()) => self.status = None,
            Err(e) => self.report_load_error(path, e),
        }
    }

    pub(crate) fn load_motion_file(&mut self, path: &Path) {
        match load_motion_table(path) {
            Ok(table) => {
                self.motion_preview = table.preview_series();
                self.motion_file = Some(path.to_path_buf());
                self.config.last_motion_file = Some(path.to_path_buf());
                self.status = None;
            }
            Err(e) => self.report_load_error(path, e),
        }
    }

    fn report_load_error(&mut self, path: &Path, e: GaitViewError) {
        error!("Could not load {:?}: {}", path, e);
        self.status = Some(format!("Could not load {}: {}", path.display(), e));
    }

    fn selected_joint(&self) -> Option<JointName> {
        self.selected_joint.parse().ok()
    }

    pub(crate) fn start_simulation(&mut self) {
        match self.driver.start() {
            Ok(()) => {
                if self.next_tick.is_none() {
                    self.next_tick = Some(Instant::now() + self.driver.tick_period());
                }
                self.action = "Walking".to_string();
            }
            Err(GaitViewError::BatteryExhausted) => {
                self.notification = Some(Notification::info("Battery Level", "Battery is empty"));
            }
            Err(e) => error!("Could not start simulation: {}", e),
        }
        self.snapshot = self.driver.snapshot();
    }

    pub(crate) fn stop_simulation(&mut self) {
        self.driver.stop();
        self.next_tick = None;
        self.action = "Stopped".to_string();
        self.snapshot = self.driver.snapshot();
    }

    /// Runs every tick that fell due since the last frame.
    fn drive_playback(&mut self) {
        let Some(mut next_tick) = self.next_tick else {
            return;
        };
        let now = Instant::now();
        while now >= next_tick {
            next_tick += self.driver.tick_period();
            match self.driver.tick_at(now) {
                Some(event) => self.handle_event(event),
                None => break,
            }
            if !self.driver.is_running() {
                self.next_tick = None;
                return;
            }
        }
        self.next_tick = Some(next_tick);
    }

    fn handle_event(&mut self, event: PlaybackEvent) {
        match event {
            PlaybackEvent::Advanced(snapshot) => self.snapshot = snapshot,
            PlaybackEvent::FaultDetected { snapshot, .. } => {
                self.snapshot = snapshot;
                self.action = "Stopped".to_string();
            }
            PlaybackEvent::BatteryExhausted(snapshot) => {
                self.snapshot = snapshot;
                self.action = "Stopped".to_string();
                self.notification = Some(Notification::info("Battery Level", "Battery is empty"));
            }
        }
    }

    fn opening_view(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(ui.available_height() * 0.3);
                ui.heading(RichText::new("Gait Viewer").color(Color32::WHITE).strong());
                ui.label("Bipedal gait telemetry playback");
                ui.add_space(20.);
                ui.horizontal(|ui| {
                    if ui.button("Open").clicked() {
                        self.screen = Screen::Main;
                    }
                    if ui.button("Close").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });
            });
        });
    }
}

/// Foot positions of the first frame, where the ground patches are drawn.
fn foot_patches(sequence: &PoseSequence) -> Vec<Point3D> {
    sequence
        .first()
        .map(|pose| {
            [JointName::LeftFoot, JointName::RightFoot]
                .iter()
                .filter_map(|j| pose.get(*j))
                .collect()
        })
        .unwrap_or_default()
}

impl eframe::App for GaitViewApp {
    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        if let Err(e) = self.config.save() {
            error!("Error while saving config file: {}", e);
        }
    }

    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.screen == Screen::Opening {
            self.opening_view(ctx);
            return;
        }

        self.drive_playback();

        egui::TopBottomPanel::top("tabs")
            .frame(egui::Frame::new().inner_margin(4))
            .show(ctx, |ui| {
                ui.horizontal_wrapped(|ui| {
                    ui.selectable_value(&mut self.tab, Tab::Simulation, "Simulation");
                    ui.selectable_value(&mut self.tab, Tab::Data, "Data");
                    ui.separator();
                    if ui.button("📂 Load Joint CSV").clicked()
                        && let Some(path) = rfd::FileDialog::new()
                            .add_filter("CSV Files", &["csv"])
                            .pick_file()
                    {
                        self.load_joint_file(&path);
                    }
                    if let Some(path) = &self.joint_file {
                        ui.label(RichText::new(path.display().to_string()).small());
                    }
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("Exit").clicked() {
                            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                        }
                    });
                });
                if let Some(status) = &self.status {
                    ui.label(RichText::new(status).color(Color32::RED));
                }
            });

        match self.tab {
            Tab::Simulation => self.simulation_view(ctx),
            Tab::Data => self.data_view(ctx),
        }

        let dismissed = self
            .notification
            .as_ref()
            .is_some_and(|notification| !notification.show(ctx));
        if dismissed {
            self.notification = None;
        }

        if self.driver.is_running() {
            ctx.request_repaint_after(Duration::from_millis(self.config.animation_interval_ms));
        }
    }
}
