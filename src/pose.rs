mod builder;
pub mod geometry;
mod keypoint;

pub use builder::PoseBuilder;
pub use geometry::{Line, line_between, rough_center};
pub use keypoint::{Keypoint, Pose, PoseId};
