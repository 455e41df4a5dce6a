use std::path::{Path, PathBuf};

use crate::capture::domain::capture_error::CaptureError;
use crate::capture::domain::frame_source::FrameSource;
use crate::shared::constants::IMAGE_EXTENSIONS;
use crate::shared::frame::Frame;

/// Replays still images as a frame stream.
///
/// A directory is read in file-name order; a single image is a one-frame
/// stream. Once every file has been yielded the source reports an empty
/// frame, which ends the capture loop the same way an unplugged camera does.
pub struct ImageSequenceSource {
    paths: Vec<PathBuf>,
    next: usize,
    released: bool,
}

impl ImageSequenceSource {
    pub fn open(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let paths = if path.is_dir() {
            let mut paths: Vec<PathBuf> = std::fs::read_dir(path)?
                .filter_map(|entry| entry.ok().map(|e| e.path()))
                .filter(|p| p.is_file() && is_image(p))
                .collect();
            paths.sort();
            paths
        } else if path.is_file() && is_image(path) {
            vec![path.to_path_buf()]
        } else {
            Vec::new()
        };

        if paths.is_empty() {
            return Err(CaptureError::NoFrames {
                path: path.to_path_buf(),
            }
            .into());
        }
        log::info!("Replaying {} image(s) from {}", paths.len(), path.display());
        Ok(Self {
            paths,
            next: 0,
            released: false,
        })
    }
}

pub fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

impl FrameSource for ImageSequenceSource {
    fn read(&mut self) -> Result<Option<Frame>, Box<dyn std::error::Error>> {
        if self.released {
            return Ok(None);
        }
        let Some(path) = self.paths.get(self.next) else {
            return Ok(None);
        };
        let img = image::open(path)
            .map_err(|e| format!("failed to decode {}: {e}", path.display()))?
            .to_rgb8();
        let (width, height) = img.dimensions();
        let frame = Frame::from_rgb(img.into_raw(), width, height, self.next)?;
        self.next += 1;
        Ok(Some(frame))
    }

    fn release(&mut self) {
        self.released = true;
    }
}
