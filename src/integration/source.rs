//! Trait for pose detection backends.

use crate::pose::Pose;

/// Trait for pose detection backends.
///
/// Implement this trait to feed any pose model into the registry. Each source
/// reports under a stable id, which becomes the sender part of every guid it
/// produces.
///
/// # Example
///
/// ```ignore
/// use posetrack_rs::integration::PoseSource;
/// use posetrack_rs::Pose;
///
/// struct Webcam {
///     // Your model here
/// }
///
/// impl PoseSource for Webcam {
///     type Error = std::io::Error;
///
///     fn source_id(&self) -> &str {
///         "webcam0"
///     }
///
///     fn poll(&mut self) -> Result<Vec<Pose>, Self::Error> {
///         // Grab a frame and run inference
///         Ok(vec![])
///     }
/// }
/// ```
pub trait PoseSource {
    /// Error type for detection failures.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Sender id this source reports under. Must not contain `'-'`.
    fn source_id(&self) -> &str;

    /// Run detection on the next frame and return the poses found.
    fn poll(&mut self) -> Result<Vec<Pose>, Self::Error>;
}
