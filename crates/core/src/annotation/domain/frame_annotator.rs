use crate::analysis::domain::face_analyzer::FaceReading;
use crate::shared::frame::Frame;

/// Domain interface for drawing face results onto a frame.
///
/// Implementations modify the frame in-place (`&mut Frame`). Anything that
/// falls outside the frame is clipped, not an error.
pub trait FrameAnnotator {
    fn annotate(
        &self,
        frame: &mut Frame,
        faces: &[FaceReading],
    ) -> Result<(), Box<dyn std::error::Error>>;
}
