//! Per-body tracking record.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::pose::{Pose, PoseId};
use crate::tracker::clock::Clock;
use crate::tracker::guid::Guid;
use crate::tracker::poses_tracker::TrackerConfig;
use crate::tracker::track_state::TrackState;

/// History and state of one tracked body.
#[derive(Debug, Clone)]
pub struct PoseTracker {
    from_id: String,
    pose_id: PoseId,
    guid: Guid,
    /// Current lifecycle state
    pub state: TrackState,
    last: Pose,
    last_seen: Instant,
    /// Number of observations recorded, including the first
    samples: u64,
    /// Superseded poses, oldest first; only filled with `store_intermediate`
    history: VecDeque<Pose>,
    store_intermediate: bool,
    sample_limit: usize,
    clock: Arc<dyn Clock>,
}

impl PoseTracker {
    /// Create a tracker from its first observation.
    pub fn new(from_id: &str, pose: Pose, config: &TrackerConfig, clock: Arc<dyn Clock>) -> Self {
        let pose_id = pose.pose_id();
        Self {
            from_id: from_id.to_string(),
            guid: Guid::new(from_id, &pose_id),
            pose_id,
            state: TrackState::Tracked,
            last: pose,
            last_seen: clock.now(),
            samples: 1,
            history: VecDeque::new(),
            store_intermediate: config.store_intermediate,
            sample_limit: config.sample_limit,
            clock,
        }
    }

    /// Record a new observation of this body.
    pub fn seen(&mut self, pose: Pose) {
        let previous = std::mem::replace(&mut self.last, pose);
        if self.store_intermediate && self.sample_limit > 0 {
            if self.history.len() >= self.sample_limit {
                self.history.pop_front();
            }
            self.history.push_back(previous);
        }
        self.last_seen = self.clock.now();
        self.samples += 1;
    }

    pub fn from_id(&self) -> &str {
        &self.from_id
    }

    pub fn pose_id(&self) -> &PoseId {
        &self.pose_id
    }

    pub fn guid(&self) -> &Guid {
        &self.guid
    }

    /// Most recently observed pose.
    pub fn last(&self) -> &Pose {
        &self.last
    }

    /// Time since the most recent observation.
    pub fn elapsed(&self) -> Duration {
        self.clock.now().saturating_duration_since(self.last_seen)
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed().as_millis() as u64
    }

    pub fn last_seen(&self) -> Instant {
        self.last_seen
    }

    pub fn samples(&self) -> u64 {
        self.samples
    }

    /// Intermediate poses kept before `last`, oldest first.
    pub fn history(&self) -> impl Iterator<Item = &Pose> {
        self.history.iter()
    }

    pub fn mark_expired(&mut self) {
        self.state = TrackState::Expired;
    }

    pub fn is_expired(&self) -> bool {
        self.state == TrackState::Expired
    }
}
