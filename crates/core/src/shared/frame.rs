use ndarray::{s, ArrayView3, ShapeError};
use thiserror::Error;

use crate::shared::region::Region;

/// Number of interleaved channels in a color [`Frame`].
pub const BGR_CHANNELS: usize = 3;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FrameError {
    #[error("frame of {width}x{height} needs {expected} bytes, got {actual}")]
    SizeMismatch {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
}

/// A single captured frame: contiguous BGR bytes in row-major order.
///
/// Channel order follows the capture library convention (blue, green, red).
/// Sources that decode to another order convert at the I/O boundary; the
/// domain layer never sees RGB.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    data: Vec<u8>,
    width: u32,
    height: u32,
    index: usize,
}

impl Frame {
    /// Wraps decoded BGR bytes, rejecting a buffer whose length does not
    /// match `width * height * 3`.
    pub fn new(data: Vec<u8>, width: u32, height: u32, index: usize) -> Result<Self, FrameError> {
        let expected = (width as usize) * (height as usize) * BGR_CHANNELS;
        if data.len() != expected {
            return Err(FrameError::SizeMismatch {
                width,
                height,
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
            index,
        })
    }

    /// A frame with every pixel set to the same BGR triple.
    pub fn filled(width: u32, height: u32, bgr: [u8; 3], index: usize) -> Self {
        let pixels = (width as usize) * (height as usize);
        let mut data = Vec::with_capacity(pixels * BGR_CHANNELS);
        for _ in 0..pixels {
            data.extend_from_slice(&bgr);
        }
        Self {
            data,
            width,
            height,
            index,
        }
    }

    /// Builds a frame from RGB bytes, swapping to BGR.
    pub fn from_rgb(
        mut rgb: Vec<u8>,
        width: u32,
        height: u32,
        index: usize,
    ) -> Result<Self, FrameError> {
        for px in rgb.chunks_exact_mut(BGR_CHANNELS) {
            px.swap(0, 2);
        }
        Self::new(rgb, width, height, index)
    }

    /// Copies the pixel data out in RGB order.
    pub fn to_rgb(&self) -> Vec<u8> {
        let mut rgb = self.data.clone();
        for px in rgb.chunks_exact_mut(BGR_CHANNELS) {
            px.swap(0, 2);
        }
        rgb
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn pixels(&self) -> impl Iterator<Item = [u8; 3]> + '_ {
        self.data
            .chunks_exact(BGR_CHANNELS)
            .map(|px| [px[0], px[1], px[2]])
    }

    /// `(row, col, channel)` view over the pixel data.
    pub fn as_ndarray(&self) -> Result<ArrayView3<'_, u8>, ShapeError> {
        ArrayView3::from_shape(self.shape(), &self.data)
    }

    /// Copies the region of interest out as its own frame.
    ///
    /// The region is intersected with the frame bounds first, so the result
    /// may be empty but never panics.
    pub fn roi(&self, region: &Region) -> Frame {
        let empty = Frame {
            data: Vec::new(),
            width: 0,
            height: 0,
            index: self.index,
        };
        let r = region.clamp_to(self.width, self.height);
        if r.is_empty() {
            return empty;
        }
        let Ok(view) = self.as_ndarray() else {
            return empty;
        };
        let (x, y) = (r.x as usize, r.y as usize);
        let (w, h) = (r.width as usize, r.height as usize);
        let sub = view.slice(s![y..y + h, x..x + w, ..]);
        Frame {
            data: sub.iter().copied().collect(),
            width: w as u32,
            height: h as u32,
            index: self.index,
        }
    }

    /// Single-channel intensity image using BT.601 luma weights.
    pub fn to_gray(&self) -> GrayFrame {
        let data = self
            .pixels()
            .map(|[b, g, r]| {
                let y = 299 * r as u32 + 587 * g as u32 + 114 * b as u32;
                ((y + 500) / 1000) as u8
            })
            .collect();
        GrayFrame::new(data, self.width, self.height)
    }

    fn shape(&self) -> (usize, usize, usize) {
        (self.height as usize, self.width as usize, BGR_CHANNELS)
    }
}

/// Single-channel 8-bit intensity image, the input of face detection.
#[derive(Clone, Debug, PartialEq)]
pub struct GrayFrame {
    data: Vec<u8>,
    width: u32,
    height: u32,
}

impl GrayFrame {
    pub fn new(data: Vec<u8>, width: u32, height: u32) -> Self {
        debug_assert_eq!(
            data.len(),
            (width as usize) * (height as usize),
            "data length must equal width * height"
        );
        Self {
            data,
            width,
            height,
        }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_construction_and_accessors() {
        let data = vec![0u8; 12]; // 2x2x3
        let frame = Frame::new(data.clone(), 2, 2, 5).unwrap();
        assert_eq!(frame.width(), 2);
        assert_eq!(frame.height(), 2);
        assert_eq!(frame.index(), 5);
        assert_eq!(frame.data(), &data[..]);
        assert!(!frame.is_empty());
    }

    #[test]
    fn test_mismatched_data_length_is_rejected() {
        let err = Frame::new(vec![0u8; 10], 2, 2, 0).unwrap_err();
        assert_eq!(
            err,
            FrameError::SizeMismatch {
                width: 2,
                height: 2,
                expected: 12,
                actual: 10,
            }
        );
    }

    #[test]
    fn test_four_channel_buffer_is_rejected() {
        // a BGRA buffer of the same dimensions
        assert!(Frame::new(vec![0u8; 2 * 2 * 4], 2, 2, 0).is_err());
        assert!(Frame::from_rgb(vec![0u8; 2 * 2 * 4], 2, 2, 0).is_err());
    }

    #[test]
    fn test_filled_repeats_pixel() {
        let frame = Frame::filled(3, 2, [1, 2, 3], 0);
        assert_eq!(frame.data().len(), 18);
        assert!(frame.pixels().all(|px| px == [1, 2, 3]));
    }

    #[test]
    fn test_rgb_conversion_swaps_outer_channels() {
        let frame = Frame::from_rgb(vec![10, 20, 30], 1, 1, 0).unwrap();
        assert_eq!(frame.data(), &[30, 20, 10]);
        assert_eq!(frame.to_rgb(), vec![10, 20, 30]);
    }

    #[test]
    fn test_as_ndarray_shape() {
        let mut frame = Frame::new(vec![0u8; 24], 4, 2, 0).unwrap();
        frame.data_mut()[5] = 128; // row=0, col=1, R
        let view = frame.as_ndarray().unwrap();
        assert_eq!(view.shape(), &[2, 4, 3]);
        assert_eq!(view[[0, 1, 2]], 128);
    }

    #[test]
    fn test_roi_copies_sub_block() {
        // 3x2 frame, each pixel's blue channel holds its column index
        let mut data = Vec::new();
        for _row in 0..2 {
            for col in 0..3u8 {
                data.extend_from_slice(&[col, 0, 0]);
            }
        }
        let frame = Frame::new(data, 3, 2, 7).unwrap();
        let roi = frame.roi(&Region::new(1, 0, 2, 2));
        assert_eq!(roi.width(), 2);
        assert_eq!(roi.height(), 2);
        assert_eq!(roi.index(), 7);
        let blues: Vec<u8> = roi.pixels().map(|px| px[0]).collect();
        assert_eq!(blues, vec![1, 2, 1, 2]);
    }

    #[test]
    fn test_roi_clamps_to_frame() {
        let frame = Frame::filled(4, 4, [9, 9, 9], 0);
        let roi = frame.roi(&Region::new(2, 2, 10, 10));
        assert_eq!((roi.width(), roi.height()), (2, 2));
    }

    #[test]
    fn test_roi_zero_area_is_empty() {
        let frame = Frame::filled(4, 4, [9, 9, 9], 0);
        assert!(frame.roi(&Region::new(1, 1, 0, 3)).is_empty());
        assert!(frame.roi(&Region::new(10, 10, 5, 5)).is_empty());
    }

    #[test]
    fn test_to_gray_uses_luma_weights() {
        let frame = Frame::new(vec![0, 0, 255, 255, 255, 255, 0, 0, 0], 3, 1, 0).unwrap();
        let gray = frame.to_gray();
        assert_eq!(gray.width(), 3);
        assert_eq!(gray.height(), 1);
        assert_eq!(gray.data(), &[76, 255, 0]);
    }
}
