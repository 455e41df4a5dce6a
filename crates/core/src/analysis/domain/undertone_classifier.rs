use serde::Serialize;

use crate::analysis::domain::color_sample::ColorSample;
use crate::analysis::domain::undertone::Undertone;
use crate::analysis::domain::ycrcb::{blue_chroma, luma, red_chroma};
use crate::shared::constants::{COOL_CR_THRESHOLD, WARM_CR_THRESHOLD};

/// Unrounded luma/chroma of a mean skin color.
///
/// `cb` is carried for logging and reports; the decision reads `cr` only.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ChromaReading {
    pub y: f64,
    pub cr: f64,
    pub cb: f64,
}

impl ChromaReading {
    pub fn from_sample(sample: &ColorSample) -> Self {
        let y = luma(sample.red, sample.green, sample.blue);
        Self {
            y,
            cr: red_chroma(sample.red, y),
            cb: blue_chroma(sample.blue, y),
        }
    }
}

/// Threshold classifier on red-difference chroma.
///
/// Warm wins at `cr >= warm_threshold`, then cool at `cr <= cool_threshold`;
/// everything strictly between is neutral.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UndertoneClassifier {
    warm_threshold: f64,
    cool_threshold: f64,
}

impl UndertoneClassifier {
    pub fn new(warm_threshold: f64, cool_threshold: f64) -> Self {
        Self {
            warm_threshold,
            cool_threshold,
        }
    }

    pub fn classify(&self, sample: &ColorSample) -> Undertone {
        self.classify_chroma(ChromaReading::from_sample(sample).cr)
    }

    pub fn classify_chroma(&self, cr: f64) -> Undertone {
        if cr >= self.warm_threshold {
            Undertone::Warm
        } else if cr <= self.cool_threshold {
            Undertone::Cool
        } else {
            Undertone::Neutral
        }
    }
}

impl Default for UndertoneClassifier {
    fn default() -> Self {
        Self::new(WARM_CR_THRESHOLD, COOL_CR_THRESHOLD)
    }
}
