//! TrackerPipeline for combining pose detection with the registry.

use thiserror::Error;

use crate::tracker::{Guid, SharedPosesTracker, TrackerError};

use super::PoseSource;
use super::expiry::lock_registry;

/// Failure while processing one frame.
#[derive(Debug, Error)]
pub enum PipelineError<E: std::error::Error + 'static> {
    /// The detection backend failed.
    #[error("pose source failed: {0}")]
    Source(#[source] E),
    /// The registry rejected a detection.
    #[error(transparent)]
    Tracker(#[from] TrackerError),
}

/// Bundles a `PoseSource` with a shared pose registry.
///
/// Several pipelines may feed the same registry; each reports under its own
/// source id.
pub struct TrackerPipeline<S: PoseSource> {
    source: S,
    tracker: SharedPosesTracker,
}

impl<S: PoseSource> TrackerPipeline<S> {
    /// Create a new pipeline feeding `tracker`.
    pub fn new(source: S, tracker: SharedPosesTracker) -> Self {
        Self { source, tracker }
    }

    /// Process a single frame.
    ///
    /// Polls the source and records every pose it returns.
    ///
    /// # Returns
    /// The guid of each pose in detection order, or the first error.
    pub fn process_frame(&mut self) -> Result<Vec<Guid>, PipelineError<S::Error>> {
        let poses = self.source.poll().map_err(PipelineError::Source)?;
        let from_id = self.source.source_id();

        let mut tracker = lock_registry(&self.tracker);
        let mut guids = Vec::with_capacity(poses.len());
        for pose in poses {
            guids.push(tracker.seen(from_id, pose)?);
        }
        Ok(guids)
    }

    /// Get a reference to the underlying source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Get a mutable reference to the underlying source.
    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// Get a handle to the shared registry.
    pub fn tracker(&self) -> &SharedPosesTracker {
        &self.tracker
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::pose::{Pose, PoseBuilder};
    use crate::tracker::{ManualClock, PosesTracker, TrackerConfig};

    struct MockSource {
        id: &'static str,
        frames: Vec<Vec<Pose>>,
    }

    impl PoseSource for MockSource {
        type Error = std::io::Error;

        fn source_id(&self) -> &str {
            self.id
        }

        fn poll(&mut self) -> Result<Vec<Pose>, Self::Error> {
            if self.frames.is_empty() {
                return Err(std::io::Error::other("stream ended"));
            }
            Ok(self.frames.remove(0))
        }
    }

    fn registry() -> SharedPosesTracker {
        let clock = Arc::new(ManualClock::new());
        PosesTracker::with_clock(TrackerConfig::default(), clock).into_shared()
    }

    #[test]
    fn test_tracker_pipeline() {
        let source = MockSource {
            id: "cam1",
            frames: vec![
                vec![
                    PoseBuilder::new().id(0u32).build(),
                    PoseBuilder::new().id(1u32).build(),
                ],
                vec![PoseBuilder::new().id(1u32).build()],
            ],
        };
        let mut pipeline = TrackerPipeline::new(source, registry());

        let guids = pipeline.process_frame().unwrap();
        assert_eq!(guids, vec![Guid::from("cam1-0"), Guid::from("cam1-1")]);

        let guids = pipeline.process_frame().unwrap();
        assert_eq!(guids, vec![Guid::from("cam1-1")]);
        assert_eq!(lock_registry(pipeline.tracker()).len(), 2);

        let err = pipeline.process_frame().unwrap_err();
        assert!(matches!(err, PipelineError::Source(_)));
    }

    #[test]
    fn test_pipelines_share_registry() {
        let shared = registry();
        let source = |id| MockSource {
            id,
            frames: vec![vec![PoseBuilder::new().id(5u32).build()]],
        };
        let mut a = TrackerPipeline::new(source("cam1"), shared.clone());
        let mut b = TrackerPipeline::new(source("cam2"), shared.clone());

        a.process_frame().unwrap();
        b.process_frame().unwrap();

        let tracker = lock_registry(&shared);
        assert_eq!(tracker.len(), 2);
        assert_eq!(tracker.sender_ids().len(), 2);
    }

    #[test]
    fn test_invalid_source_id() {
        let source = MockSource {
            id: "cam-1",
            frames: vec![vec![Pose::default()]],
        };
        let mut pipeline = TrackerPipeline::new(source, registry());

        let err = pipeline.process_frame().unwrap_err();
        assert!(matches!(err, PipelineError::Tracker(TrackerError::InvalidArgument(_))));
        assert!(lock_registry(pipeline.tracker()).is_empty());
    }
}
