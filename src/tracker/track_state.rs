/// Lifecycle state of a pose tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrackState {
    /// Live in the registry
    #[default]
    Tracked,
    /// Evicted for exceeding the maximum age
    Expired,
}
