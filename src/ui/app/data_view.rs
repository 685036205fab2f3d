use egui::{Color32, Direction, Layout, RichText, TextEdit, Ui, Vec2b};
use egui_dropdown::DropDownBox;
use egui_plot::{GridInput, GridMark, Legend, Line, PlotPoints};
use gaitview::{
    export::{export_file_name, export_sample_csv},
    motion::{Axis, JointCurves, SELECTABLE_JOINTS},
};
use itertools::Itertools;
use log::error;

use crate::ui::Notification;

use super::GaitViewApp;

fn axis_color(axis: Axis) -> Color32 {
    match axis {
        Axis::X => Color32::RED,
        Axis::Y => Color32::GREEN,
        Axis::Z => Color32::BLUE,
    }
}

/// Grid marks every `step` seconds between zero and `window`.
fn time_grid(step: f64, window: f64) -> impl Fn(GridInput) -> Vec<GridMark> {
    move |_input| {
        (0..)
            .map(|i| i as f64 * step)
            .take_while(|v| *v <= window)
            .map(|value| GridMark {
                value,
                step_size: step,
            })
            .collect()
    }
}

impl GaitViewApp {
    pub(crate) fn data_view(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("DataSelectors").show(ctx, |ui| {
            ui.with_layout(Layout::left_to_right(egui::Align::Center), |ui| {
                ui.label(RichText::new("Joint: ").color(Color32::WHITE));
                let joints = SELECTABLE_JOINTS.iter().map(|j| j.as_str()).collect_vec();
                ui.add(
                    DropDownBox::from_iter(
                        joints,
                        "joint_dropbox",
                        &mut self.selected_joint,
                        |ui, text| ui.selectable_label(false, text),
                    )
                    .filter_by_input(false),
                );
                ui.separator();
                if ui.button("📂 Load Data CSV").clicked()
                    && let Some(path) = rfd::FileDialog::new()
                        .add_filter("CSV Files", &["csv"])
                        .pick_file()
                {
                    self.load_data_file(&path);
                }
                if let Some(path) = self.data_source.path() {
                    ui.label(RichText::new(path.display().to_string()).small());
                }
            });
        });

        egui::TopBottomPanel::bottom("MotionAndExport")
            .resizable(true)
            .min_height(200.)
            .show(ctx, |ui| {
                self.motion_preview(ui);
                ui.separator();
                self.export_controls(ui);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            let Some(table) = self.data_source.table() else {
                ui.label(RichText::new("Load a joint or data file to plot joint positions").color(Color32::GRAY));
                return;
            };
            let Some(joint) = self.selected_joint() else {
                return;
            };
            match table.joint_curves(joint, self.config.plot_window_s) {
                Ok(curves) => self.joint_chart(ui, &curves),
                Err(e) => {
                    ui.label(RichText::new(format!("Cannot plot {}: {}", joint, e)).color(Color32::RED));
                }
            }
        });
    }

    fn joint_chart(&self, ui: &mut Ui, curves: &JointCurves) {
        ui.heading(RichText::new(&curves.title).color(Color32::WHITE));
        ui.with_layout(Layout::centered_and_justified(Direction::TopDown), |ui| {
            egui_plot::Plot::new("joint_positions")
                .legend(Legend::default().position(egui_plot::Corner::RightTop))
                .x_axis_label("Seconds (s)")
                .y_axis_label("Position")
                .include_x(0.)
                .include_x(self.config.plot_window_s)
                .auto_bounds(Vec2b::new(false, true))
                .x_grid_spacer(time_grid(
                    self.config.plot_tick_step_s,
                    self.config.plot_window_s,
                ))
                .show_background(false)
                .show(ui, |plot_ui| {
                    for curve in &curves.curves {
                        plot_ui.line(
                            Line::new(curve.label.as_str(), PlotPoints::new(curve.points.clone()))
                                .color(axis_color(curve.axis))
                                .width(0.7),
                        );
                    }
                });
        });
    }

    fn motion_preview(&mut self, ui: &mut Ui) {
        ui.horizontal(|ui| {
            if ui.button("📂 Load Motion CSV").clicked()
                && let Some(path) = rfd::FileDialog::new()
                    .add_filter("CSV Files", &["csv"])
                    .pick_file()
            {
                self.load_motion_file(&path);
            }
            if let Some(path) = &self.motion_file {
                ui.label(RichText::new(path.display().to_string()).small());
            }
        });
        if self.motion_preview.is_empty() {
            return;
        }
        egui_plot::Plot::new("motion_preview")
            .height(120.)
            .x_axis_label("Row")
            .y_axis_label("Value")
            .show_background(false)
            .show(ui, |plot_ui| {
                plot_ui.line(
                    Line::new("Motion CSV Data Plot", PlotPoints::new(self.motion_preview.clone()))
                        .color(Color32::LIGHT_BLUE),
                );
            });
    }

    fn export_controls(&mut self, ui: &mut Ui) {
        ui.horizontal(|ui| {
            ui.label("CSV name:");
            ui.add(TextEdit::singleline(&mut self.export_name).desired_width(200.));
            if ui.button("💾 Save CSV").clicked() {
                self.save_csv();
            }
        });
    }

    fn save_csv(&mut self) {
        let file_name = match export_file_name(&self.export_name) {
            Ok(file_name) => file_name,
            Err(e) => {
                self.notification = Some(Notification::warning("Input Error", e.to_string()));
                return;
            }
        };
        let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv"])
            .set_file_name(file_name)
            .save_file()
        else {
            return;
        };
        match export_sample_csv(&path, self.config.export_rows) {
            Ok(path) => {
                self.notification = Some(Notification::info(
                    "Save Success",
                    format!("CSV file saved as {}", path.display()),
                ));
            }
            Err(e) => {
                error!("Could not save {:?}: {}", path, e);
                self.notification = Some(Notification::warning("Save Error", e.to_string()));
            }
        }
    }
}
