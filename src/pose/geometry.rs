//! Geometry helpers over a single pose's keypoints.

use nalgebra::Point2;

use super::Pose;

/// Line segment between two points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line {
    pub start: Point2<f32>,
    pub end: Point2<f32>,
}

impl Line {
    #[inline]
    pub fn new(start: Point2<f32>, end: Point2<f32>) -> Self {
        Self { start, end }
    }

    /// Point halfway between both ends.
    #[inline]
    pub fn midpoint(&self) -> Point2<f32> {
        nalgebra::center(&self.start, &self.end)
    }

    #[inline]
    pub fn length(&self) -> f32 {
        nalgebra::distance(&self.start, &self.end)
    }
}

/// Segment between the keypoints named `a` and `b`, if both are present.
pub fn line_between(pose: &Pose, a: &str, b: &str) -> Option<Line> {
    let start = pose.keypoint(a)?;
    let end = pose.keypoint(b)?;
    Some(Line::new(start.position, end.position))
}

/// Approximate torso center.
///
/// Averages the midpoints of the two torso diagonals, `left_shoulder`-`right_hip`
/// and `right_shoulder`-`left_hip`. Returns `None` if any of the four keypoints
/// is missing.
pub fn rough_center(pose: &Pose) -> Option<Point2<f32>> {
    let a = line_between(pose, "left_shoulder", "right_hip")?.midpoint();
    let b = line_between(pose, "right_shoulder", "left_hip")?.midpoint();
    Some(Point2::from((a.coords + b.coords) / 2.0))
}
