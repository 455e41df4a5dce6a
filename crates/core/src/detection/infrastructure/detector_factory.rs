use std::path::Path;

use crate::detection::domain::detection_params::DetectionParams;
use crate::detection::domain::face_detector::FaceDetector;
use crate::shared::constants::{
    HAAR_CASCADE_NAME, HAAR_CASCADE_URL, SEETA_MODEL_NAME, SEETA_MODEL_URL,
};
use crate::shared::model_resolver::{self, ProgressFn};

use super::seeta_face_detector::SeetaFaceDetector;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DetectorBackend {
    /// Pure-Rust SeetaFace cascade.
    Seeta,
    /// OpenCV Haar cascade; needs the `opencv` feature.
    Haar,
}

impl DetectorBackend {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "seeta" => Some(Self::Seeta),
            "haar" => Some(Self::Haar),
            _ => None,
        }
    }

    pub fn is_available(self) -> bool {
        match self {
            Self::Seeta => true,
            Self::Haar => cfg!(feature = "opencv"),
        }
    }

    /// Model file name and download location.
    pub fn model_source(self) -> (&'static str, &'static str) {
        match self {
            Self::Seeta => (SEETA_MODEL_NAME, SEETA_MODEL_URL),
            Self::Haar => (HAAR_CASCADE_NAME, HAAR_CASCADE_URL),
        }
    }
}

impl Default for DetectorBackend {
    fn default() -> Self {
        if cfg!(feature = "opencv") {
            Self::Haar
        } else {
            Self::Seeta
        }
    }
}

/// Resolves the backend's model and loads it, failing fast on any problem.
pub fn create_detector(
    backend: DetectorBackend,
    model: Option<&Path>,
    params: DetectionParams,
    progress: Option<ProgressFn>,
) -> Result<Box<dyn FaceDetector>, Box<dyn std::error::Error>> {
    params.validate()?;
    let (name, url) = backend.model_source();
    let model_path = model_resolver::resolve(model, name, url, progress)?;

    match backend {
        DetectorBackend::Seeta => Ok(Box::new(SeetaFaceDetector::new(&model_path, params)?)),
        #[cfg(feature = "opencv")]
        DetectorBackend::Haar => Ok(Box::new(
            super::haar_cascade_detector::HaarCascadeDetector::new(&model_path, params)?,
        )),
        #[cfg(not(feature = "opencv"))]
        DetectorBackend::Haar => {
            Err("the haar detector requires building with the `opencv` feature".into())
        }
    }
}
