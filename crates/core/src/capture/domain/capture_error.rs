use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CaptureError {
    /// The capture device could not be opened; nothing is processed.
    #[error("camera {index} not found or could not be opened")]
    DeviceUnavailable { index: i32 },
    #[error("no readable frames at {path}")]
    NoFrames { path: PathBuf },
}
