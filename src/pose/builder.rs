//! Builder for creating Pose objects keypoint by keypoint.

use super::{Keypoint, Pose, PoseId};

/// Builder for creating `Pose` objects.
#[derive(Debug, Clone, Default)]
pub struct PoseBuilder {
    id: Option<PoseId>,
    score: Option<f32>,
    keypoints: Vec<Keypoint>,
}

impl PoseBuilder {
    /// Create a new pose builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the detector-local pose id.
    pub fn id(mut self, id: impl Into<PoseId>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Set the overall confidence score.
    pub fn score(mut self, score: f32) -> Self {
        self.score = Some(score);
        self
    }

    /// Add a named keypoint at (x, y).
    pub fn keypoint(mut self, name: impl Into<String>, x: f32, y: f32) -> Self {
        self.keypoints.push(Keypoint::new(name, x, y));
        self
    }

    /// Add a named keypoint with its own confidence.
    pub fn scored_keypoint(mut self, name: impl Into<String>, x: f32, y: f32, score: f32) -> Self {
        self.keypoints.push(Keypoint::new(name, x, y).with_score(score));
        self
    }

    /// Build the final `Pose`.
    pub fn build(self) -> Pose {
        Pose {
            id: self.id,
            score: self.score,
            keypoints: self.keypoints,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pose_builder() {
        let pose = PoseBuilder::new()
            .id(3u32)
            .score(0.95)
            .keypoint("nose", 10.0, 20.0)
            .scored_keypoint("left_eye", 8.0, 18.0, 0.4)
            .build();

        assert_eq!(pose.pose_id().as_str(), "3");
        assert_eq!(pose.score, Some(0.95));
        assert_eq!(pose.keypoints.len(), 2);
        assert_eq!(pose.keypoint("left_eye").unwrap().score, Some(0.4));
    }
}
