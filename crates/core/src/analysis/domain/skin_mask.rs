use crate::analysis::domain::color_sample::ColorSample;
use crate::analysis::domain::ycrcb::bgr_to_ycrcb;
use crate::shared::constants::{SKIN_LOWER_YCRCB, SKIN_UPPER_YCRCB};
use crate::shared::frame::Frame;

/// Inclusive per-channel band in (Y, Cr, Cb) space.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SkinBand {
    pub lower: [u8; 3],
    pub upper: [u8; 3],
}

impl SkinBand {
    pub fn contains(&self, ycrcb: [u8; 3]) -> bool {
        (0..3).all(|c| self.lower[c] <= ycrcb[c] && ycrcb[c] <= self.upper[c])
    }
}

impl Default for SkinBand {
    fn default() -> Self {
        Self {
            lower: SKIN_LOWER_YCRCB,
            upper: SKIN_UPPER_YCRCB,
        }
    }
}

/// Binary skin membership per pixel, row-major, same size as its region.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SkinMask {
    width: u32,
    height: u32,
    bits: Vec<bool>,
}

impl SkinMask {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn get(&self, x: u32, y: u32) -> bool {
        x < self.width && y < self.height && self.bits[(y * self.width + x) as usize]
    }

    pub fn count(&self) -> usize {
        self.bits.iter().filter(|&&b| b).count()
    }
}

/// Skin segmentation and masked averaging for one face region.
#[derive(Clone, Copy, Debug, Default)]
pub struct SkinMaskEngine {
    band: SkinBand,
}

impl SkinMaskEngine {
    pub fn new(band: SkinBand) -> Self {
        Self { band }
    }

    pub fn mask(&self, roi: &Frame) -> SkinMask {
        SkinMask {
            width: roi.width(),
            height: roi.height(),
            bits: roi
                .pixels()
                .map(|px| self.band.contains(bgr_to_ycrcb(px)))
                .collect(),
        }
    }

    /// Mean BGR color of the original pixels that fall inside the band.
    ///
    /// An empty region or an empty mask yields [`ColorSample::ZERO`].
    pub fn mean_skin_color(&self, roi: &Frame) -> ColorSample {
        if roi.is_empty() {
            return ColorSample::ZERO;
        }
        let mask = self.mask(roi);
        masked_mean(roi, &mask)
    }
}

fn masked_mean(roi: &Frame, mask: &SkinMask) -> ColorSample {
    let mut sums = [0u64; 3];
    let mut count = 0u64;
    for (px, &keep) in roi.pixels().zip(&mask.bits) {
        if keep {
            for c in 0..3 {
                sums[c] += px[c] as u64;
            }
            count += 1;
        }
    }
    if count == 0 {
        return ColorSample::ZERO;
    }
    ColorSample::from_channels(sums.map(|s| s as f64 / count as f64))
}
