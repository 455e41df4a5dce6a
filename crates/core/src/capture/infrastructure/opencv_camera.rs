use opencv::core::Mat;
use opencv::prelude::*;
use opencv::videoio::{VideoCapture, CAP_ANY};

use crate::capture::domain::capture_error::CaptureError;
use crate::capture::domain::frame_source::FrameSource;
use crate::shared::frame::Frame;
use crate::shared::opencv_mat::mat_to_frame;

/// Live camera input through OpenCV's `VideoCapture`.
///
/// A single matrix is reused for every read and fully overwritten by it.
pub struct OpenCvCamera {
    capture: VideoCapture,
    buffer: Mat,
    frame_index: usize,
    released: bool,
}

impl OpenCvCamera {
    /// Opens the device, failing immediately if it is not available.
    pub fn open(index: i32) -> Result<Self, CaptureError> {
        let unavailable = |_: opencv::Error| CaptureError::DeviceUnavailable { index };
        let capture = VideoCapture::new(index, CAP_ANY).map_err(unavailable)?;
        if !capture.is_opened().map_err(unavailable)? {
            return Err(CaptureError::DeviceUnavailable { index });
        }
        log::info!("Opened camera {index}");
        Ok(Self {
            capture,
            buffer: Mat::default(),
            frame_index: 0,
            released: false,
        })
    }
}

impl FrameSource for OpenCvCamera {
    fn read(&mut self) -> Result<Option<Frame>, Box<dyn std::error::Error>> {
        if self.released {
            return Ok(None);
        }
        if !self.capture.read(&mut self.buffer)? {
            return Ok(None);
        }
        let frame = mat_to_frame(&self.buffer, self.frame_index)?;
        if frame.is_some() {
            self.frame_index += 1;
        }
        Ok(frame)
    }

    fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        if let Err(e) = self.capture.release() {
            log::warn!("Failed to release camera: {e}");
        }
    }
}

impl Drop for OpenCvCamera {
    fn drop(&mut self) {
        self.release();
    }
}
