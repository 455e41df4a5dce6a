use crate::shared::frame::Frame;

/// Output surface that receives each annotated frame.
pub trait FrameDisplay {
    fn show(&mut self, frame: &Frame) -> Result<(), Box<dyn std::error::Error>>;

    /// Blocks for up to `delay_ms` milliseconds and returns the key code
    /// pressed in that interval, if any.
    fn wait_key(&mut self, delay_ms: i32) -> Result<Option<i32>, Box<dyn std::error::Error>>;

    /// Tears the surface down. Safe to call more than once.
    fn close(&mut self);
}
