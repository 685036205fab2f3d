// Library interface for gaitview
// The egui front end in main.rs and the integration tests both build on these modules

pub mod config;
pub mod errors;
pub mod export;
pub mod motion;
pub mod playback;
pub mod skeleton;

// Re-export commonly used types
pub use config::AppConfig;
pub use errors::GaitViewError;
pub use motion::{JointCurves, MotionTable};
pub use playback::{PlaybackDriver, PlaybackEvent, PlaybackSnapshot, RunState};
pub use skeleton::{CONNECTIONS, JointName, Point3D, Pose, PoseSequence, SKELETON_JOINTS};
