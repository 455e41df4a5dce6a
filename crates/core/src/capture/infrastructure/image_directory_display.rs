use std::path::{Path, PathBuf};

use crate::capture::domain::frame_display::FrameDisplay;
use crate::shared::frame::Frame;

/// Headless display that writes every shown frame as a PNG file.
///
/// There is no keyboard behind it, so `wait_key` never reports a key.
pub struct ImageDirectoryDisplay {
    dir: PathBuf,
    written: usize,
}

impl ImageDirectoryDisplay {
    pub fn new(dir: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        std::fs::create_dir_all(dir)?;
        Ok(Self {
            dir: dir.to_path_buf(),
            written: 0,
        })
    }

    pub fn written(&self) -> usize {
        self.written
    }

    fn path_for(&self, frame: &Frame) -> PathBuf {
        self.dir.join(format!("frame_{:06}.png", frame.index()))
    }
}

impl FrameDisplay for ImageDirectoryDisplay {
    fn show(&mut self, frame: &Frame) -> Result<(), Box<dyn std::error::Error>> {
        let img = image::RgbImage::from_raw(frame.width(), frame.height(), frame.to_rgb())
            .ok_or("Failed to create image from frame data")?;
        img.save(self.path_for(frame))?;
        self.written += 1;
        Ok(())
    }

    fn wait_key(&mut self, _delay_ms: i32) -> Result<Option<i32>, Box<dyn std::error::Error>> {
        Ok(None)
    }

    fn close(&mut self) {
        log::info!(
            "Wrote {} annotated frame(s) to {}",
            self.written,
            self.dir.display()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_show_writes_png_named_by_index() {
        let dir = tempfile::tempdir().unwrap();
        let mut display = ImageDirectoryDisplay::new(&dir.path().join("out")).unwrap();
        let frame = Frame::filled(12, 10, [200, 100, 50], 3);
        display.show(&frame).unwrap();

        let path = dir.path().join("out").join("frame_000003.png");
        let img = image::open(&path).unwrap().to_rgb8();
        assert_eq!(img.dimensions(), (12, 10));
        assert_eq!(img.get_pixel(0, 0).0, [50, 100, 200]);
        assert_eq!(display.written(), 1);
    }

    #[test]
    fn test_wait_key_never_reports_a_key() {
        let dir = tempfile::tempdir().unwrap();
        let mut display = ImageDirectoryDisplay::new(dir.path()).unwrap();
        assert_eq!(display.wait_key(30).unwrap(), None);
        display.close();
        display.close();
    }
}
