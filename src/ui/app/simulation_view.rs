use egui::{Color32, Frame, Grid, Layout, Margin, ProgressBar, RichText, ScrollArea, Ui, Vec2};
use gaitview::playback::{
    fault::FaultLogEntry,
    format_elapsed,
};

use crate::ui::{
    battery_color,
    skeleton_canvas::{draw_3d_skeleton, draw_side_view},
    state_label,
};

use super::GaitViewApp;

impl GaitViewApp {
    pub(crate) fn simulation_view(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("SimulationControls")
            .frame(
                Frame::default()
                    .fill(Color32::TRANSPARENT)
                    .inner_margin(Margin::same(5)),
            )
            .show(ctx, |ui| {
                ui.with_layout(Layout::left_to_right(egui::Align::Center), |ui| {
                    let level = self.snapshot.battery_level;
                    ui.add(
                        ProgressBar::new(level as f32 / 100.)
                            .desired_width(ui.available_width() * 0.6)
                            .fill(battery_color(self.snapshot.battery_band))
                            .text(format!("Battery Level: {}%", level)),
                    );
                    let (state, color) = state_label(self.snapshot.state);
                    ui.label(
                        RichText::new(format!("Simulation State : {}", state)).color(color),
                    );
                });
                ui.separator();
                ui.label(format!("Current Action: {}", self.action));
                ui.separator();
                ui.columns(2, |columns| {
                    columns[0].vertical_centered_justified(|ui| {
                        if ui.button("Start Simulation").clicked() {
                            self.start_simulation();
                        }
                    });
                    columns[1].vertical_centered_justified(|ui| {
                        if ui.button("Stop Simulation").clicked() {
                            self.stop_simulation();
                        }
                    });
                });
            });

        egui::SidePanel::right("JointValues")
            .frame(
                Frame::default()
                    .fill(Color32::TRANSPARENT)
                    .inner_margin(Margin::same(5)),
            )
            .resizable(true)
            .min_width(320.0)
            .show(ctx, |ui| {
                ui.heading("Joint Values");
                ScrollArea::vertical()
                    .id_salt("joint_values_scroll")
                    .max_height(ui.available_height() * 0.55)
                    .show(ui, |ui| self.joint_values(ui));
                ui.separator();
                ui.heading("Fault Detection");
                ui.label(format!(
                    "Simulation time: {}",
                    format_elapsed(self.snapshot.elapsed)
                ));
                ScrollArea::vertical()
                    .id_salt("fault_log_scroll")
                    .stick_to_bottom(true)
                    .show(ui, |ui| self.fault_log(ui));
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.label(
                RichText::new(format!(
                    "Frame {} / {}",
                    self.snapshot.frame + usize::from(self.snapshot.frame_count > 0),
                    self.snapshot.frame_count
                ))
                .color(Color32::GRAY),
            );
            let pose = self.snapshot.pose.as_ref();
            let size = ui.available_size();
            ui.horizontal(|ui| {
                draw_3d_skeleton(
                    ui,
                    pose,
                    &self.foot_patches,
                    &mut self.camera,
                    Vec2::new(size.x * 0.5, size.y),
                );
                ui.vertical(|ui| {
                    ui.set_width(size.x * 0.48);
                    draw_side_view(ui, pose);
                });
            });
        });
    }

    fn joint_values(&self, ui: &mut Ui) {
        let Some(pose) = &self.snapshot.pose else {
            ui.label(RichText::new("No joint data loaded").color(Color32::GRAY));
            return;
        };
        Grid::new("joint_values_grid")
            .num_columns(2)
            .spacing([12., 8.])
            .show(ui, |ui| {
                for (i, (joint, coords)) in pose.iter().enumerate() {
                    ui.group(|ui| {
                        ui.vertical(|ui| {
                            ui.label(RichText::new(joint.as_str()).strong());
                            ui.label(RichText::new(format!("X: {:.2}", coords.x)).size(14.));
                            ui.label(RichText::new(format!("Y: {:.2}", coords.y)).size(14.));
                            ui.label(RichText::new(format!("Z: {:.2}", coords.z)).size(14.));
                        });
                    });
                    if i % 2 == 1 {
                        ui.end_row();
                    }
                }
            });
    }

    fn fault_log(&self, ui: &mut Ui) {
        for entry in self.snapshot.fault_log.entries() {
            match entry {
                FaultLogEntry::Clear { elapsed } => {
                    ui.label(RichText::new("No fault detected.").color(Color32::GREEN));
                    ui.label(format!("Simulation running: {}", format_elapsed(*elapsed)));
                }
                FaultLogEntry::Fault(fault) => {
                    ui.label(RichText::new(&fault.description).color(Color32::RED));
                    ui.label(RichText::new(&fault.explanation).color(Color32::RED));
                }
            }
        }
    }
}
