use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::detection::domain::detection_params::DetectionParams;
use crate::detection::domain::detector_error::DetectorError;
use crate::detection::domain::face_detector::FaceDetector;
use crate::shared::frame::GrayFrame;
use crate::shared::region::Region;

/// Minimum classifier score for a window to count as a face.
const SCORE_THRESHOLD: f64 = 2.0;

/// Sliding window step in pixels, both axes.
const WINDOW_STEP: u32 = 4;

/// Pure-Rust face detector backed by `rustface` (SeetaFace funnel cascade).
///
/// SeetaFace merges overlapping windows internally and exposes no neighbor
/// count, so `min_neighbors` has no effect on this backend. The pyramid
/// shrinks by `1 / scale_factor` per level.
pub struct SeetaFaceDetector {
    detector: Box<dyn rustface::Detector>,
    min_face_size: u32,
}

impl SeetaFaceDetector {
    /// Loads the model eagerly so a bad file fails at startup.
    pub fn new(model_path: &Path, params: DetectionParams) -> Result<Self, DetectorError> {
        let load_err = |reason: String| DetectorError::ModelLoad {
            path: model_path.to_path_buf(),
            reason,
        };
        let file = File::open(model_path).map_err(|e| load_err(e.to_string()))?;
        let model =
            rustface::read_model(BufReader::new(file)).map_err(|e| load_err(e.to_string()))?;

        let mut detector = rustface::create_detector_with_model(model);
        detector.set_min_face_size(params.min_face_size);
        detector.set_score_thresh(SCORE_THRESHOLD);
        detector.set_pyramid_scale_factor((1.0 / params.scale_factor) as f32);
        detector.set_slide_window_step(WINDOW_STEP, WINDOW_STEP);

        log::info!("Loaded SeetaFace model from {}", model_path.display());
        Ok(Self {
            detector,
            min_face_size: params.min_face_size,
        })
    }
}

impl FaceDetector for SeetaFaceDetector {
    fn detect(&mut self, gray: &GrayFrame) -> Result<Vec<Region>, Box<dyn std::error::Error>> {
        if gray.width() == 0 || gray.height() == 0 {
            return Ok(Vec::new());
        }
        let image = rustface::ImageData::new(gray.data(), gray.width(), gray.height());
        let faces = self.detector.detect(&image);

        let min = self.min_face_size as i32;
        Ok(faces
            .iter()
            .map(|face| {
                let bbox = face.bbox();
                Region::new(bbox.x(), bbox.y(), bbox.width() as i32, bbox.height() as i32)
            })
            .filter(|r| r.width >= min && r.height >= min)
            .collect())
    }
}
