//! Integration module for connecting pose detection backends with the registry.
//!
//! This module provides the source trait detection backends implement, a
//! pipeline that routes their output into a shared [`PosesTracker`], and the
//! background task that expires stale trackers.
//!
//! [`PosesTracker`]: crate::tracker::PosesTracker

mod expiry;
mod pipeline;
pub mod replay;
mod source;

pub use expiry::{ExpiryTimer, lock_registry};
pub use pipeline::{PipelineError, TrackerPipeline};
pub use replay::{ReplayRecord, Replayer};
pub use source::PoseSource;
