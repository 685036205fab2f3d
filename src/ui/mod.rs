use egui::{Color32, Context, Visuals, style::Widgets};
use gaitview::{RunState, playback::battery::BatteryBand};

pub(crate) mod app;
pub(crate) mod skeleton_canvas;

pub(crate) const PALETTE_BLACK: Color32 = Color32::from_rgb(12, 12, 12);
pub(crate) const PALETTE_BROWN: Color32 = Color32::from_rgb(72, 30, 20);
pub(crate) const PALETTE_MAROON: Color32 = Color32::from_rgb(155, 57, 34);
pub(crate) const PALETTE_ORANGE: Color32 = Color32::from_rgb(242, 97, 63);

pub(crate) fn install_visuals(ctx: &Context) {
    ctx.set_visuals(Visuals {
        dark_mode: true,
        hyperlink_color: PALETTE_MAROON,
        faint_bg_color: PALETTE_BLACK,
        extreme_bg_color: PALETTE_BROWN,
        panel_fill: PALETTE_BLACK,
        button_frame: true,
        widgets: Widgets::dark(),
        striped: false,
        ..Default::default()
    });
}

pub(crate) fn battery_color(band: BatteryBand) -> Color32 {
    match band {
        BatteryBand::Green => Color32::GREEN,
        BatteryBand::Orange => PALETTE_ORANGE,
        BatteryBand::Red => Color32::RED,
    }
}

pub(crate) fn state_label(state: RunState) -> (&'static str, Color32) {
    match state {
        RunState::Running => ("Running", Color32::GREEN),
        RunState::Stopped => ("Stopped", Color32::RED),
    }
}

/// Blocking style message shown on top of the main view until dismissed.
#[derive(Clone, Debug)]
pub(crate) struct Notification {
    pub(crate) title: String,
    pub(crate) message: String,
    pub(crate) is_error: bool,
}

impl Notification {
    pub(crate) fn info(title: &str, message: impl Into<String>) -> Self {
        Self {
            title: title.to_string(),
            message: message.into(),
            is_error: false,
        }
    }

    pub(crate) fn warning(title: &str, message: impl Into<String>) -> Self {
        Self {
            title: title.to_string(),
            message: message.into(),
            is_error: true,
        }
    }

    /// Returns false once the user dismissed it.
    pub(crate) fn show(&self, ctx: &Context) -> bool {
        let mut open = true;
        egui::Window::new(self.title.as_str())
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0., 0.])
            .show(ctx, |ui| {
                let color = if self.is_error {
                    PALETTE_ORANGE
                } else {
                    Color32::WHITE
                };
                ui.label(egui::RichText::new(self.message.as_str()).color(color));
                ui.add_space(8.);
                if ui.button("OK").clicked() {
                    open = false;
                }
            });
        open
    }
}
