//! Registry of per-body pose trackers with age-based expiry.

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crossbeam_channel::Receiver;
use serde::{Deserialize, Serialize};

use crate::pose::Pose;
use crate::tracker::clock::{Clock, SystemClock};
use crate::tracker::error::TrackerError;
use crate::tracker::events::{Subscribers, TrackerEvent};
use crate::tracker::guid::{GUID_SEPARATOR, Guid};
use crate::tracker::pose_tracker::PoseTracker;

/// Configuration for the PosesTracker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Age after which an unseen body is evicted
    pub max_age_ms: u64,
    /// Reserved; has no effect
    pub reset_after_samples: u32,
    /// Maximum intermediate poses retained per body
    pub sample_limit: usize,
    /// Keep superseded poses in each tracker's history
    pub store_intermediate: bool,
    /// Period of the background expiry scan
    pub expiry_interval_ms: u64,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            max_age_ms: 10_000,
            reset_after_samples: 0,
            sample_limit: 100,
            store_intermediate: false,
            expiry_interval_ms: 1000,
        }
    }
}

impl TrackerConfig {
    /// Parse a JSON config; missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, TrackerError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, TrackerError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    pub fn validate(&self) -> Result<(), TrackerError> {
        if self.expiry_interval_ms == 0 {
            return Err(TrackerError::Config(
                "expiry_interval_ms must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn max_age(&self) -> Duration {
        Duration::from_millis(self.max_age_ms)
    }

    pub fn expiry_interval(&self) -> Duration {
        Duration::from_millis(self.expiry_interval_ms)
    }
}

/// Registry shared with a background expiry task.
pub type SharedPosesTracker = Arc<Mutex<PosesTracker>>;

/// Routes pose detections to per-body trackers and expires stale ones.
///
/// Every enumeration copies the current entries before sorting or filtering,
/// so a returned collection never reflects later mutation.
#[derive(Debug)]
pub struct PosesTracker {
    trackers: HashMap<Guid, PoseTracker>,
    config: TrackerConfig,
    clock: Arc<dyn Clock>,
    subscribers: Subscribers,
}

impl Default for PosesTracker {
    fn default() -> Self {
        Self::new(TrackerConfig::default())
    }
}

impl PosesTracker {
    pub fn new(config: TrackerConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: TrackerConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            trackers: HashMap::new(),
            config,
            clock,
            subscribers: Subscribers::default(),
        }
    }

    pub fn into_shared(self) -> SharedPosesTracker {
        Arc::new(Mutex::new(self))
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Receive `Added` and `Expired` notifications.
    pub fn subscribe(&mut self) -> Receiver<TrackerEvent> {
        self.subscribers.subscribe()
    }

    /// Number of subscribers still listening.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Record a pose detected by `from_id` and return the guid it was filed under.
    ///
    /// A new guid creates a tracker and emits [`TrackerEvent::Added`] before
    /// returning; a known guid just updates its tracker.
    pub fn seen(&mut self, from_id: &str, pose: Pose) -> Result<Guid, TrackerError> {
        if from_id.is_empty() {
            return Err(TrackerError::InvalidArgument(
                "from_id must not be empty".to_string(),
            ));
        }
        if from_id.contains(GUID_SEPARATOR) {
            return Err(TrackerError::InvalidArgument(format!(
                "from_id {from_id:?} must not contain '{GUID_SEPARATOR}'"
            )));
        }

        let guid = Guid::new(from_id, &pose.pose_id());
        match self.trackers.get_mut(&guid) {
            Some(tracker) => tracker.seen(pose),
            None => {
                let tracker = PoseTracker::new(from_id, pose, &self.config, self.clock.clone());
                log::debug!("tracking new body {guid}");
                self.trackers.insert(guid.clone(), tracker.clone());
                self.subscribers.emit(TrackerEvent::Added(tracker));
            }
        }
        Ok(guid)
    }

    /// Remove every tracker older than `max_age`, oldest first.
    ///
    /// Emits one [`TrackerEvent::Expired`] per removal, in the returned order.
    pub fn expire(&mut self) -> Vec<PoseTracker> {
        let max_age = self.config.max_age();
        let mut stale: Vec<&PoseTracker> = self
            .trackers
            .values()
            .filter(|t| t.elapsed() > max_age)
            .collect();
        stale.sort_by(|a, b| {
            a.last_seen()
                .cmp(&b.last_seen())
                .then_with(|| a.guid().cmp(b.guid()))
        });
        let stale: Vec<Guid> = stale.into_iter().map(|t| t.guid().clone()).collect();

        let mut expired = Vec::with_capacity(stale.len());
        for guid in stale {
            let Some(mut tracker) = self.trackers.remove(&guid) else {
                continue;
            };
            tracker.mark_expired();
            log::debug!("expired body {guid} after {} ms", tracker.elapsed_ms());
            self.subscribers.emit(TrackerEvent::Expired(tracker.clone()));
            expired.push(tracker);
        }
        expired
    }

    /// All trackers, freshest first.
    pub fn trackers_by_age(&self) -> Vec<PoseTracker> {
        let mut trackers = self.trackers();
        sort_by_age(&mut trackers);
        trackers
    }

    /// All trackers, in no particular order.
    pub fn trackers(&self) -> Vec<PoseTracker> {
        self.trackers.values().cloned().collect()
    }

    /// Latest pose of every tracker, freshest first.
    pub fn values_by_age(&self) -> Vec<Pose> {
        self.trackers_by_age()
            .into_iter()
            .map(|t| t.last().clone())
            .collect()
    }

    /// Latest pose of every tracker, in no particular order.
    pub fn values(&self) -> Vec<Pose> {
        self.trackers.values().map(|t| t.last().clone()).collect()
    }

    /// Trackers fed by `sender_id`.
    pub fn trackers_from_sender(&self, sender_id: &str) -> Vec<PoseTracker> {
        self.trackers
            .values()
            .filter(|t| t.from_id() == sender_id)
            .cloned()
            .collect()
    }

    /// Distinct sender ids currently present.
    pub fn sender_ids(&self) -> HashSet<String> {
        self.trackers
            .values()
            .map(|t| t.from_id().to_string())
            .collect()
    }

    /// First tracker with the detector-local `pose_id`.
    ///
    /// Ambiguous when several senders use the same pose id; prefer
    /// [`tracker_by_guid`](Self::tracker_by_guid).
    pub fn tracker_by_pose_id(&self, pose_id: &str) -> Option<PoseTracker> {
        self.trackers
            .values()
            .find(|t| t.pose_id().as_str() == pose_id)
            .cloned()
    }

    pub fn value_by_pose_id(&self, pose_id: &str) -> Option<Pose> {
        self.tracker_by_pose_id(pose_id).map(|t| t.last().clone())
    }

    pub fn guids(&self) -> Vec<Guid> {
        self.trackers.keys().cloned().collect()
    }

    pub fn tracker_by_guid(&self, guid: &Guid) -> Option<PoseTracker> {
        self.trackers.get(guid).cloned()
    }

    pub fn value_by_guid(&self, guid: &Guid) -> Option<Pose> {
        self.trackers.get(guid).map(|t| t.last().clone())
    }

    pub fn contains(&self, guid: &Guid) -> bool {
        self.trackers.contains_key(guid)
    }

    /// Drop every tracker without emitting notifications.
    pub fn clear(&mut self) {
        self.trackers.clear();
    }

    pub fn len(&self) -> usize {
        self.trackers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trackers.is_empty()
    }
}

/// Sort ascending by elapsed time, ties broken by guid.
pub fn sort_by_age(trackers: &mut [PoseTracker]) {
    trackers.sort_by(|a, b| {
        b.last_seen()
            .cmp(&a.last_seen())
            .then_with(|| a.guid().cmp(b.guid()))
    });
}
