use crate::shared::constants::{DEFAULT_MIN_FACE_SIZE, DEFAULT_MIN_NEIGHBORS, DEFAULT_SCALE_FACTOR};

/// Multi-scale search policy shared by the detector backends.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DetectionParams {
    /// Ratio between successive pyramid levels; must exceed 1.0.
    pub scale_factor: f64,
    /// Overlapping hits required before a candidate is kept.
    pub min_neighbors: i32,
    /// Smallest face edge, in pixels, that is reported.
    pub min_face_size: u32,
}

impl DetectionParams {
    pub fn validate(&self) -> Result<(), String> {
        if !(self.scale_factor > 1.0) {
            return Err(format!(
                "Scale factor must be greater than 1.0, got {}",
                self.scale_factor
            ));
        }
        if self.min_neighbors < 0 {
            return Err(format!(
                "Minimum neighbors must not be negative, got {}",
                self.min_neighbors
            ));
        }
        if self.min_face_size == 0 {
            return Err("Minimum face size must be positive".to_string());
        }
        Ok(())
    }
}

impl Default for DetectionParams {
    fn default() -> Self {
        Self {
            scale_factor: DEFAULT_SCALE_FACTOR,
            min_neighbors: DEFAULT_MIN_NEIGHBORS,
            min_face_size: DEFAULT_MIN_FACE_SIZE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_defaults() {
        let params = DetectionParams::default();
        assert_eq!(params.scale_factor, 1.1);
        assert_eq!(params.min_neighbors, 4);
        assert_eq!(params.min_face_size, 100);
        assert!(params.validate().is_ok());
    }

    #[rstest]
    #[case::unit_scale(DetectionParams { scale_factor: 1.0, ..Default::default() })]
    #[case::nan_scale(DetectionParams { scale_factor: f64::NAN, ..Default::default() })]
    #[case::negative_neighbors(DetectionParams { min_neighbors: -1, ..Default::default() })]
    #[case::zero_size(DetectionParams { min_face_size: 0, ..Default::default() })]
    fn test_validate_rejects(#[case] params: DetectionParams) {
        assert!(params.validate().is_err());
    }
}
