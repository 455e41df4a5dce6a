use opencv::highgui;

use crate::capture::domain::frame_display::FrameDisplay;
use crate::shared::frame::Frame;
use crate::shared::opencv_mat::frame_to_mat;

/// Named on-screen window via OpenCV HighGUI.
pub struct HighGuiDisplay {
    title: String,
    closed: bool,
}

impl HighGuiDisplay {
    pub fn new(title: &str) -> Result<Self, Box<dyn std::error::Error>> {
        highgui::named_window(title, highgui::WINDOW_AUTOSIZE)?;
        Ok(Self {
            title: title.to_string(),
            closed: false,
        })
    }
}

impl FrameDisplay for HighGuiDisplay {
    fn show(&mut self, frame: &Frame) -> Result<(), Box<dyn std::error::Error>> {
        let mat = frame_to_mat(frame)?;
        highgui::imshow(&self.title, &mat)?;
        Ok(())
    }

    fn wait_key(&mut self, delay_ms: i32) -> Result<Option<i32>, Box<dyn std::error::Error>> {
        let key = highgui::wait_key(delay_ms)?;
        Ok((key >= 0).then_some(key))
    }

    fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        if let Err(e) = highgui::destroy_all_windows() {
            log::warn!("Failed to destroy windows: {e}");
        }
    }
}
