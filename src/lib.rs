//! Per-body registry for human-pose detections.
//!
//! Detections arrive per frame from one or more sources. Each body is keyed by
//! a composite [`Guid`] built from the sender id and the detector-local pose id,
//! kept while it keeps being seen, and expired once it goes stale.

pub mod integration;
pub mod pose;
pub mod tracker;

pub use pose::{Keypoint, Pose, PoseBuilder, PoseId};
pub use tracker::{
    Clock, Guid, ManualClock, PoseTracker, PosesTracker, SharedPosesTracker, SystemClock,
    TrackerConfig, TrackerError, TrackerEvent,
};
