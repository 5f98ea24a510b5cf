use std::fmt;

use crate::pose::PoseId;

/// Separator between the sender id and the pose id inside a [`Guid`].
pub const GUID_SEPARATOR: char = '-';

/// Globally-unique tracker id: `from_id` and `pose_id` joined by [`GUID_SEPARATOR`].
///
/// Sender ids never contain the separator, so splitting at its first
/// occurrence recovers both parts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Guid(String);

impl Guid {
    pub fn new(from_id: &str, pose_id: &PoseId) -> Self {
        Self(format!("{from_id}{GUID_SEPARATOR}{pose_id}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Split back into `(from_id, pose_id)`.
    pub fn parts(&self) -> (&str, &str) {
        self.0
            .split_once(GUID_SEPARATOR)
            .unwrap_or((self.0.as_str(), ""))
    }
}

impl fmt::Display for Guid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Guid {
    fn from(guid: &str) -> Self {
        Self(guid.to_string())
    }
}

impl PartialEq<str> for Guid {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Guid {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guid_format() {
        let guid = Guid::new("cam1", &PoseId::from(5u32));
        assert_eq!(guid, "cam1-5");
        assert_eq!(guid.to_string(), "cam1-5");
    }

    #[test]
    fn test_guid_parts() {
        let guid = Guid::new("cam1", &PoseId::from("a-b"));
        assert_eq!(guid.parts(), ("cam1", "a-b"));
    }

    #[test]
    fn test_same_pose_id_different_senders() {
        let id = PoseId::from(5u32);
        assert_ne!(Guid::new("cam1", &id), Guid::new("cam2", &id));
    }
}
