use std::path::Path;

use opencv::core::{Rect, Size, Vector};
use opencv::objdetect::CascadeClassifier;
use opencv::prelude::*;

use crate::detection::domain::detection_params::DetectionParams;
use crate::detection::domain::detector_error::DetectorError;
use crate::detection::domain::face_detector::FaceDetector;
use crate::shared::frame::GrayFrame;
use crate::shared::opencv_mat::gray_to_mat;
use crate::shared::region::Region;

/// OpenCV Viola-Jones detector over a Haar cascade definition.
pub struct HaarCascadeDetector {
    classifier: CascadeClassifier,
    params: DetectionParams,
}

impl HaarCascadeDetector {
    /// Loads the cascade and rejects it if OpenCV ends up with an empty
    /// classifier, instead of silently detecting nothing later.
    pub fn new(cascade_path: &Path, params: DetectionParams) -> Result<Self, DetectorError> {
        let load_err = |reason: String| DetectorError::ModelLoad {
            path: cascade_path.to_path_buf(),
            reason,
        };
        let path = cascade_path
            .to_str()
            .ok_or_else(|| load_err("path is not valid UTF-8".to_string()))?;
        let classifier = CascadeClassifier::new(path).map_err(|e| load_err(e.to_string()))?;
        if classifier.empty().map_err(|e| load_err(e.to_string()))? {
            return Err(load_err("cascade is empty or malformed".to_string()));
        }

        log::info!("Loaded Haar cascade from {}", cascade_path.display());
        Ok(Self { classifier, params })
    }
}

impl FaceDetector for HaarCascadeDetector {
    fn detect(&mut self, gray: &GrayFrame) -> Result<Vec<Region>, Box<dyn std::error::Error>> {
        let mat = gray_to_mat(gray)?;
        let min = self.params.min_face_size as i32;
        let mut faces = Vector::<Rect>::new();
        self.classifier.detect_multi_scale(
            &mat,
            &mut faces,
            self.params.scale_factor,
            self.params.min_neighbors,
            0,
            Size::new(min, min),
            Size::new(0, 0),
        )?;
        Ok(faces
            .iter()
            .map(|r| Region::new(r.x, r.y, r.width, r.height))
            .collect())
    }
}
