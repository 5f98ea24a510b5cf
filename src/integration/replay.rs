//! Deterministic replay of recorded detections.
//!
//! A recording is JSON lines, one detection per line:
//! `{"t_ms": 120, "from_id": "cam1", "pose": {"id": 3, "keypoints": [...]}}`.
//! Time comes from the recording rather than the wall clock, and the expiry
//! scan runs whenever the recording crosses an `expiry_interval_ms` boundary.

use std::io::BufRead;
use std::sync::Arc;

use crossbeam_channel::Receiver;
use serde::{Deserialize, Serialize};

use crate::pose::Pose;
use crate::tracker::{
    Guid, ManualClock, PoseTracker, PosesTracker, TrackerConfig, TrackerError, TrackerEvent,
};

/// One recorded detection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplayRecord {
    /// Milliseconds since the start of the recording
    pub t_ms: u64,
    pub from_id: String,
    pub pose: Pose,
}

/// Parse JSON-lines records, skipping blank lines.
pub fn read_records<R: BufRead>(
    reader: R,
) -> impl Iterator<Item = Result<ReplayRecord, TrackerError>> {
    reader.lines().filter_map(|line| match line {
        Ok(line) if line.trim().is_empty() => None,
        Ok(line) => Some(serde_json::from_str(&line).map_err(TrackerError::from)),
        Err(e) => Some(Err(e.into())),
    })
}

/// Feeds recorded detections through a registry on simulated time.
pub struct Replayer {
    tracker: PosesTracker,
    clock: ManualClock,
    tick_ms: u64,
    next_tick_ms: u64,
}

impl Replayer {
    pub fn new(config: TrackerConfig) -> Result<Self, TrackerError> {
        config.validate()?;
        let clock = ManualClock::new();
        let tick_ms = config.expiry_interval_ms;
        Ok(Self {
            tracker: PosesTracker::with_clock(config, Arc::new(clock.clone())),
            clock,
            tick_ms,
            next_tick_ms: tick_ms,
        })
    }

    pub fn subscribe(&mut self) -> Receiver<TrackerEvent> {
        self.tracker.subscribe()
    }

    /// Advance simulated time to the record's timestamp, then record it.
    pub fn push(&mut self, record: ReplayRecord) -> Result<Guid, TrackerError> {
        self.advance_to(record.t_ms);
        self.tracker.seen(&record.from_id, record.pose)
    }

    /// Advance simulated time, running the expiry scan if a tick boundary is crossed.
    ///
    /// Nothing is recorded between two records, so only the last boundary at or
    /// before `t_ms` can expire anything; earlier ones are skipped. Returns the
    /// trackers expired in the process. Time never moves backwards.
    pub fn advance_to(&mut self, t_ms: u64) -> Vec<PoseTracker> {
        let mut expired = Vec::new();
        if self.next_tick_ms <= t_ms {
            let last_tick_ms = t_ms - t_ms % self.tick_ms;
            self.clock.set_ms(last_tick_ms);
            expired = self.tracker.expire();
            self.next_tick_ms = last_tick_ms.checked_add(self.tick_ms).unwrap_or(u64::MAX);
        }
        self.clock.set_ms(t_ms);
        expired
    }

    /// Simulated time in milliseconds.
    pub fn now_ms(&self) -> u64 {
        self.clock.elapsed_ms()
    }

    pub fn tracker(&self) -> &PosesTracker {
        &self.tracker
    }
}
