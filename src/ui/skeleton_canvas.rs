use egui::{Color32, Pos2, Rect, Response, Sense, Shape, Stroke, Ui, Vec2, Vec2b};
use egui_plot::{Line, PlotPoints, Points};
use gaitview::{CONNECTIONS, JointName, Point3D, Pose, SKELETON_JOINTS};

/// Display volume of the 3D view: x and y in [-0.5, 0.5], z in [0, 1.5].
const VIEW_HALF_WIDTH: f64 = 0.5;
const VIEW_HEIGHT: f64 = 1.5;
const FOOT_PATCH_SIZE: f64 = 0.1;

const BONE_COLOR: Color32 = Color32::LIGHT_GRAY;
const JOINT_COLOR: Color32 = Color32::from_rgb(70, 130, 230);
const FOOT_PATCH_COLOR: Color32 = Color32::from_rgba_premultiplied(64, 64, 64, 128);

/// Orthographic camera orbiting the vertical axis of the skeleton.
#[derive(Clone, Debug)]
pub(crate) struct Camera3D {
    pub(crate) yaw: f32,
    pub(crate) pitch: f32,
    pub(crate) zoom: f32,
}

impl Default for Camera3D {
    fn default() -> Self {
        Self {
            yaw: -0.6,
            pitch: 0.35,
            zoom: 1.,
        }
    }
}

impl Camera3D {
    fn project(&self, p: Point3D, rect: Rect) -> Pos2 {
        let (sy, cy) = (self.yaw as f64).sin_cos();
        let (sp, cp) = (self.pitch as f64).sin_cos();
        let right = p.x * cy - p.y * sy;
        let depth = p.x * sy + p.y * cy;
        let up = (p.z - VIEW_HEIGHT / 2.) * cp + depth * sp;
        let scale = rect.width().min(rect.height()) / (VIEW_HEIGHT as f32 * 1.2) * self.zoom;
        Pos2::new(
            rect.center().x + right as f32 * scale,
            rect.center().y - up as f32 * scale,
        )
    }
}

fn square_at(center: Point3D, half: f64) -> [Point3D; 4] {
    [
        Point3D::new(center.x - half, center.y - half, center.z),
        Point3D::new(center.x + half, center.y - half, center.z),
        Point3D::new(center.x + half, center.y + half, center.z),
        Point3D::new(center.x - half, center.y + half, center.z),
    ]
}

/// Rotatable 3D view of `pose`. `foot_patches` are drawn as flat squares under the feet.
pub(crate) fn draw_3d_skeleton(
    ui: &mut Ui,
    pose: Option<&Pose>,
    foot_patches: &[Point3D],
    cam: &mut Camera3D,
    size: Vec2,
) -> Response {
    let (resp, painter) = ui.allocate_painter(size, Sense::drag());
    let rect = resp.rect;
    painter.rect_filled(rect, 0.0, Color32::from_gray(18));

    if resp.dragged() {
        let delta = resp.drag_delta();
        cam.yaw -= delta.x * 0.008;
        cam.pitch = (cam.pitch + delta.y * 0.008).clamp(-1.5, 1.5);
    }
    if resp.hovered() {
        let scroll = ui.input(|i| i.smooth_scroll_delta.y);
        if scroll != 0.0 {
            cam.zoom = (cam.zoom * (1.0 + scroll * 0.001)).clamp(0.2, 5.0);
        }
    }

    // floor outline of the display volume
    let floor = square_at(Point3D::ORIGIN, VIEW_HALF_WIDTH);
    let grid_stroke = Stroke::new(1.0, Color32::from_gray(60));
    for i in 0..floor.len() {
        let a = cam.project(floor[i], rect);
        let b = cam.project(floor[(i + 1) % floor.len()], rect);
        painter.line_segment([a, b], grid_stroke);
    }

    for patch in foot_patches {
        let corners = square_at(*patch, FOOT_PATCH_SIZE / 2.)
            .iter()
            .map(|c| cam.project(*c, rect))
            .collect();
        painter.add(Shape::convex_polygon(
            corners,
            FOOT_PATCH_COLOR,
            Stroke::NONE,
        ));
    }

    let Some(pose) = pose else {
        painter.text(
            rect.center(),
            egui::Align2::CENTER_CENTER,
            "Load a joint file to start",
            egui::FontId::proportional(14.0),
            Color32::GRAY,
        );
        return resp;
    };

    for (start, end) in CONNECTIONS {
        if let (Some(a), Some(b)) = (pose.get(start), pose.get(end)) {
            painter.line_segment(
                [cam.project(a, rect), cam.project(b, rect)],
                Stroke::new(2.0, BONE_COLOR),
            );
        }
    }
    for joint in SKELETON_JOINTS {
        if let Some(p) = pose.get(joint) {
            painter.circle_filled(cam.project(p, rect), 4.0, JOINT_COLOR);
        }
    }

    painter.text(
        rect.min + Vec2::new(8., 6.),
        egui::Align2::LEFT_TOP,
        "Drag: rotate   Scroll: zoom",
        egui::FontId::proportional(11.0),
        Color32::from_rgba_premultiplied(200, 200, 200, 120),
    );
    resp
}

/// Side view of `pose`, x against the vertical axis.
pub(crate) fn draw_side_view(ui: &mut Ui, pose: Option<&Pose>) {
    egui_plot::Plot::new("side_view")
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .include_x(-VIEW_HALF_WIDTH)
        .include_x(VIEW_HALF_WIDTH)
        .include_y(-0.5)
        .include_y(VIEW_HEIGHT)
        .data_aspect(1.0)
        .auto_bounds(Vec2b::new(false, false))
        .show_background(false)
        .show(ui, |plot_ui| {
            let Some(pose) = pose else {
                return;
            };
            for (start, end) in CONNECTIONS {
                if let (Some(a), Some(b)) = (pose.get(start), pose.get(end)) {
                    plot_ui.line(
                        Line::new(
                            format!("{start}-{end}"),
                            PlotPoints::new(vec![[a.x, a.z], [b.x, b.z]]),
                        )
                        .color(BONE_COLOR)
                        .width(2.0),
                    );
                }
            }
            let joints: Vec<[f64; 2]> = SKELETON_JOINTS
                .iter()
                .filter_map(|j| pose.get(*j))
                .map(|p| [p.x, p.z])
                .collect();
            plot_ui.points(
                Points::new("Joints", PlotPoints::new(joints))
                    .color(JOINT_COLOR)
                    .radius(3.),
            );
            if let Some(com) = pose.get(JointName::CoM) {
                plot_ui.points(
                    Points::new("CoM", PlotPoints::new(vec![[com.x, com.z]]))
                        .color(Color32::ORANGE)
                        .radius(4.),
                );
            }
        });
}
