//! Detection input types: a pose is an identified set of named keypoints.

use std::fmt;

use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// Pose id used when the detector does not supply one.
pub const DEFAULT_POSE_ID: &str = "0";

/// Detector-local pose identifier.
///
/// Not globally unique: two sources may emit the same id for different bodies.
/// Numeric ids are coerced to their decimal string form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "RawPoseId", into = "String")]
pub struct PoseId(String);

impl PoseId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for PoseId {
    fn default() -> Self {
        Self(DEFAULT_POSE_ID.to_string())
    }
}

impl fmt::Display for PoseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PoseId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for PoseId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<u32> for PoseId {
    fn from(id: u32) -> Self {
        Self(id.to_string())
    }
}

impl From<u64> for PoseId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl From<i64> for PoseId {
    fn from(id: i64) -> Self {
        Self(id.to_string())
    }
}

impl From<PoseId> for String {
    fn from(id: PoseId) -> Self {
        id.0
    }
}

/// Wire form of a pose id: detectors emit either numbers or strings.
///
/// Integral floats such as `5.0` print without a fraction, so they route to the
/// same tracker as `5`.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawPoseId {
    Int(i64),
    UInt(u64),
    Float(f64),
    Text(String),
}

impl From<RawPoseId> for PoseId {
    fn from(raw: RawPoseId) -> Self {
        match raw {
            RawPoseId::Int(id) => id.into(),
            RawPoseId::UInt(id) => id.into(),
            RawPoseId::Float(id) => id.to_string().into(),
            RawPoseId::Text(id) => id.into(),
        }
    }
}

/// A single named body landmark.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keypoint {
    /// Landmark name (e.g. "left_shoulder")
    pub name: String,
    /// Position in image or world coordinates
    pub position: Point2<f32>,
    /// Detection confidence, when the detector reports one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f32>,
}

impl Keypoint {
    pub fn new(name: impl Into<String>, x: f32, y: f32) -> Self {
        Self {
            name: name.into(),
            position: Point2::new(x, y),
            score: None,
        }
    }

    pub fn with_score(mut self, score: f32) -> Self {
        self.score = Some(score);
        self
    }
}

/// One detected body in one frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    /// Detector-local id; `None` routes as [`DEFAULT_POSE_ID`]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<PoseId>,
    /// Overall detection confidence
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f32>,
    #[serde(default)]
    pub keypoints: Vec<Keypoint>,
}

impl Pose {
    pub fn new(id: Option<PoseId>, keypoints: Vec<Keypoint>) -> Self {
        Self {
            id,
            score: None,
            keypoints,
        }
    }

    /// The id this pose is routed under, defaulting to `"0"`.
    pub fn pose_id(&self) -> PoseId {
        self.id.clone().unwrap_or_default()
    }

    /// Look up a keypoint by name.
    pub fn keypoint(&self, name: &str) -> Option<&Keypoint> {
        self.keypoints.iter().find(|k| k.name == name)
    }
}
