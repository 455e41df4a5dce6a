use crate::shared::frame::GrayFrame;
use crate::shared::region::Region;

/// Domain interface for face detection.
///
/// Takes a single-channel intensity image and returns zero or more face
/// rectangles in no particular order. Implementations hold a loaded model
/// and may keep scratch buffers between calls, hence `&mut self`.
pub trait FaceDetector {
    fn detect(&mut self, gray: &GrayFrame) -> Result<Vec<Region>, Box<dyn std::error::Error>>;
}
