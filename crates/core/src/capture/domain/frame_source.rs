use crate::shared::frame::Frame;

/// A device or recording that yields frames one at a time.
///
/// `Ok(None)` is the "empty frame" signal: the source has nothing more to
/// give and the capture loop should stop. It is not an error.
pub trait FrameSource {
    fn read(&mut self) -> Result<Option<Frame>, Box<dyn std::error::Error>>;

    /// Releases the underlying device. Safe to call more than once.
    fn release(&mut self);
}
