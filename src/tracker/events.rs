//! Registry notifications and their fan-out to subscribers.

use crossbeam_channel::{Receiver, Sender, unbounded};

use crate::tracker::pose_tracker::PoseTracker;

/// Notification emitted by the registry.
#[derive(Debug, Clone)]
pub enum TrackerEvent {
    /// A previously unseen guid was recorded. Sent before `seen` returns.
    Added(PoseTracker),
    /// A tracker exceeded the maximum age and was removed.
    Expired(PoseTracker),
}

/// Discriminant of a [`TrackerEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Added,
    Expired,
}

impl TrackerEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            Self::Added(_) => EventKind::Added,
            Self::Expired(_) => EventKind::Expired,
        }
    }

    /// The tracker this event is about.
    pub fn tracker(&self) -> &PoseTracker {
        match self {
            Self::Added(t) | Self::Expired(t) => t,
        }
    }

    pub fn into_tracker(self) -> PoseTracker {
        match self {
            Self::Added(t) | Self::Expired(t) => t,
        }
    }
}

/// Set of live subscriber channels.
#[derive(Debug, Default)]
pub(crate) struct Subscribers {
    senders: Vec<Sender<TrackerEvent>>,
}

impl Subscribers {
    pub fn subscribe(&mut self) -> Receiver<TrackerEvent> {
        let (tx, rx) = unbounded();
        self.senders.push(tx);
        rx
    }

    /// Deliver `event` to every subscriber, dropping those whose receiver is gone.
    pub fn emit(&mut self, event: TrackerEvent) {
        self.senders.retain(|tx| {
            let open = tx.send(event.clone()).is_ok();
            if !open {
                log::trace!("dropping closed event subscriber");
            }
            open
        });
    }

    pub fn len(&self) -> usize {
        self.senders.len()
    }
}
