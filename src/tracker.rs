mod clock;
mod error;
mod events;
mod guid;
mod pose_tracker;
mod poses_tracker;
mod track_state;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::TrackerError;
pub use events::{EventKind, TrackerEvent};
pub use guid::{GUID_SEPARATOR, Guid};
pub use pose_tracker::PoseTracker;
pub use poses_tracker::{PosesTracker, SharedPosesTracker, TrackerConfig, sort_by_age};
pub use track_state::TrackState;
