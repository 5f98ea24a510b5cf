//! Background task that periodically expires stale trackers.

use std::sync::{Arc, MutexGuard, Weak};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::tracker::{PosesTracker, SharedPosesTracker};

/// Lock a shared registry, recovering it if a previous holder panicked.
pub fn lock_registry(tracker: &SharedPosesTracker) -> MutexGuard<'_, PosesTracker> {
    tracker.lock().unwrap_or_else(|poisoned| {
        log::warn!("pose registry lock was poisoned, recovering");
        poisoned.into_inner()
    })
}

/// Cancellable repeating expiry scan over a shared registry.
///
/// Ticks every `expiry_interval_ms` of the registry's config. The task stops
/// when [`stop`](Self::stop) is called, when the timer is dropped, or once the
/// registry itself has been dropped.
#[derive(Debug)]
pub struct ExpiryTimer {
    handle: Option<JoinHandle<()>>,
}

impl ExpiryTimer {
    /// Start the scan on the current tokio runtime.
    ///
    /// # Panics
    /// Panics if called outside a tokio runtime.
    pub fn spawn(tracker: &SharedPosesTracker) -> Self {
        let period = lock_registry(tracker)
            .config()
            .expiry_interval()
            .max(Duration::from_millis(1));
        let registry = Arc::downgrade(tracker);
        let handle = tokio::spawn(run(registry, period));
        Self {
            handle: Some(handle),
        }
    }

    /// Cancel the scan. Safe to call more than once.
    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            log::debug!("expiry timer stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for ExpiryTimer {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn run(registry: Weak<std::sync::Mutex<PosesTracker>>, period: Duration) {
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately.
    ticker.tick().await;

    loop {
        ticker.tick().await;
        let Some(tracker) = registry.upgrade() else {
            log::debug!("pose registry dropped, expiry timer exiting");
            return;
        };
        let expired = lock_registry(&tracker).expire();
        if !expired.is_empty() {
            log::info!("expired {} tracker(s)", expired.len());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pose::PoseBuilder;
    use crate::tracker::{EventKind, ManualClock, TrackerConfig};

    fn shared(clock: &ManualClock) -> SharedPosesTracker {
        let config = TrackerConfig {
            max_age_ms: 1000,
            ..TrackerConfig::default()
        };
        PosesTracker::with_clock(config, Arc::new(clock.clone())).into_shared()
    }

    #[tokio::test(start_paused = true)]
    async fn test_timer_expires_stale_trackers() {
        let clock = ManualClock::new();
        let registry = shared(&clock);
        let events = {
            let mut tracker = lock_registry(&registry);
            let events = tracker.subscribe();
            tracker.seen("cam1", PoseBuilder::new().id(1u32).build()).unwrap();
            tracker.seen("cam1", PoseBuilder::new().id(2u32).build()).unwrap();
            events
        };
        assert_eq!(events.try_iter().count(), 2);

        let timer = ExpiryTimer::spawn(&registry);
        assert!(timer.is_running());

        clock.advance_ms(600);
        lock_registry(&registry)
            .seen("cam1", PoseBuilder::new().id(2u32).build())
            .unwrap();
        clock.advance_ms(600);
        tokio::time::sleep(Duration::from_millis(1100)).await;

        let expired: Vec<_> = events.try_iter().collect();
        assert_eq!(expired.len(), 1);
        assert_eq!(expired[0].kind(), EventKind::Expired);
        assert_eq!(expired[0].tracker().guid(), &"cam1-1");
        assert_eq!(lock_registry(&registry).len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timer_recovers_poisoned_registry() {
        let clock = ManualClock::new();
        let registry = shared(&clock);
        let events = {
            let mut tracker = lock_registry(&registry);
            let events = tracker.subscribe();
            tracker.seen("cam1", PoseBuilder::new().id(1u32).build()).unwrap();
            events
        };

        // Panic while holding the guard.
        let holder = Arc::clone(&registry);
        let result = std::thread::spawn(move || {
            let _guard = holder.lock().unwrap();
            panic!("detector thread crashed mid-update");
        })
        .join();
        assert!(result.is_err());
        assert!(registry.is_poisoned());

        assert_eq!(lock_registry(&registry).len(), 1);

        let timer = ExpiryTimer::spawn(&registry);
        clock.advance_ms(1500);
        tokio::time::sleep(Duration::from_millis(1100)).await;
        assert!(timer.is_running());

        let kinds: Vec<EventKind> = events.try_iter().map(|e| e.kind()).collect();
        assert_eq!(kinds, vec![EventKind::Added, EventKind::Expired]);
        assert!(lock_registry(&registry).is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stopped_timer_does_not_expire() {
        let clock = ManualClock::new();
        let registry = shared(&clock);
        lock_registry(&registry)
            .seen("cam1", PoseBuilder::new().build())
            .unwrap();

        let mut timer = ExpiryTimer::spawn(&registry);
        timer.stop();
        timer.stop();
        assert!(!timer.is_running());

        clock.advance_ms(5000);
        tokio::time::sleep(Duration::from_millis(3000)).await;
        assert_eq!(lock_registry(&registry).len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timer_exits_when_registry_dropped() {
        let clock = ManualClock::new();
        let registry = shared(&clock);
        let timer = ExpiryTimer::spawn(&registry);
        drop(registry);

        tokio::time::sleep(Duration::from_millis(2500)).await;
        assert!(!timer.is_running());
    }
}
