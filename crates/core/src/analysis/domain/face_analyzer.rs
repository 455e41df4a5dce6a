use serde::Serialize;

use crate::analysis::domain::color_recommender::recommend;
use crate::analysis::domain::color_sample::ColorSample;
use crate::analysis::domain::skin_mask::SkinMaskEngine;
use crate::analysis::domain::undertone::Undertone;
use crate::analysis::domain::undertone_classifier::{ChromaReading, UndertoneClassifier};
use crate::shared::frame::Frame;
use crate::shared::region::Region;

/// Everything computed for one detected face in one frame.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FaceReading {
    pub region: Region,
    pub sample: ColorSample,
    pub chroma: ChromaReading,
    pub undertone: Undertone,
    pub palette: &'static str,
}

/// Runs skin masking, classification and palette lookup for a face.
#[derive(Clone, Copy, Debug, Default)]
pub struct FaceAnalyzer {
    engine: SkinMaskEngine,
    classifier: UndertoneClassifier,
}

impl FaceAnalyzer {
    pub fn new(engine: SkinMaskEngine, classifier: UndertoneClassifier) -> Self {
        Self { engine, classifier }
    }

    pub fn analyze(&self, frame: &Frame, region: &Region) -> FaceReading {
        let roi = frame.roi(region);
        if roi.is_empty() {
            log::warn!("Face region {region:?} has no area inside the frame");
        }
        let sample = self.engine.mean_skin_color(&roi);
        let chroma = ChromaReading::from_sample(&sample);
        let undertone = self.classifier.classify_chroma(chroma.cr);
        log::debug!(
            "Face at ({}, {}) {}x{}: y={:.1} cr={:.1} cb={:.1} -> {undertone}",
            region.x,
            region.y,
            region.width,
            region.height,
            chroma.y,
            chroma.cr,
            chroma.cb,
        );
        FaceReading {
            region: *region,
            sample,
            chroma,
            undertone,
            palette: recommend(undertone),
        }
    }
}
