use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DetectorError {
    /// The model file exists but could not be turned into a usable detector.
    #[error("failed to load face detection model {path}: {reason}")]
    ModelLoad { path: PathBuf, reason: String },
}
