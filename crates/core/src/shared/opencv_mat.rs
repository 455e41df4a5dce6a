//! Conversions between the crate's frame types and OpenCV matrices.

use opencv::core::{Mat, Scalar, StsUnmatchedSizes, CV_8UC1, CV_8UC3, CV_8UC4};
use opencv::imgproc::{cvt_color, COLOR_BGRA2BGR, COLOR_GRAY2BGR};
use opencv::prelude::*;

use crate::shared::frame::{Frame, GrayFrame};

pub fn frame_to_mat(frame: &Frame) -> opencv::Result<Mat> {
    let mut mat = Mat::new_rows_cols_with_default(
        frame.height() as i32,
        frame.width() as i32,
        CV_8UC3,
        Scalar::all(0.0),
    )?;
    mat.data_bytes_mut()?.copy_from_slice(frame.data());
    Ok(mat)
}

pub fn gray_to_mat(gray: &GrayFrame) -> opencv::Result<Mat> {
    let mut mat = Mat::new_rows_cols_with_default(
        gray.height() as i32,
        gray.width() as i32,
        CV_8UC1,
        Scalar::all(0.0),
    )?;
    mat.data_bytes_mut()?.copy_from_slice(gray.data());
    Ok(mat)
}

/// Copies a capture matrix into a [`Frame`]. Empty matrices map to `None`.
///
/// Gray and BGRA matrices are converted to BGR; any other element type is
/// an error.
pub fn mat_to_frame(mat: &Mat, index: usize) -> Result<Option<Frame>, Box<dyn std::error::Error>> {
    if mat.empty() {
        return Ok(None);
    }
    let converted;
    let mat = match mat.typ() {
        CV_8UC3 if mat.is_continuous() => mat,
        CV_8UC3 => {
            converted = mat.try_clone()?;
            &converted
        }
        CV_8UC4 | CV_8UC1 => {
            let code = if mat.typ() == CV_8UC4 {
                COLOR_BGRA2BGR
            } else {
                COLOR_GRAY2BGR
            };
            let mut bgr = Mat::default();
            cvt_color(mat, &mut bgr, code, 0)?;
            converted = bgr;
            &converted
        }
        other => {
            return Err(format!("unsupported capture matrix type {other}, expected 8-bit BGR").into())
        }
    };
    let data = mat.data_bytes()?.to_vec();
    let frame = Frame::new(data, mat.cols() as u32, mat.rows() as u32, index)?;
    Ok(Some(frame))
}

/// Writes the matrix pixels back over an equally sized frame.
pub fn copy_mat_into(mat: &Mat, frame: &mut Frame) -> opencv::Result<()> {
    let bytes = mat.data_bytes()?;
    if bytes.len() != frame.data().len() {
        return Err(opencv::Error::new(
            StsUnmatchedSizes,
            format!(
                "matrix has {} bytes, frame has {}",
                bytes.len(),
                frame.data().len()
            ),
        ));
    }
    frame.data_mut().copy_from_slice(bytes);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use opencv::core::CV_32FC1;

    fn mat_of(typ: i32, fill: f64) -> Mat {
        Mat::new_rows_cols_with_default(2, 3, typ, Scalar::all(fill)).unwrap()
    }

    #[test]
    fn test_bgr_mat_round_trips() {
        let frame = Frame::filled(3, 2, [1, 2, 3], 4);
        let back = mat_to_frame(&frame_to_mat(&frame).unwrap(), 4).unwrap().unwrap();
        assert_eq!(back, frame);
    }

    #[test]
    fn test_four_channel_mat_is_converted_to_bgr() {
        let frame = mat_to_frame(&mat_of(CV_8UC4, 7.0), 0).unwrap().unwrap();
        assert_eq!((frame.width(), frame.height()), (3, 2));
        assert_eq!(frame.data().len(), 3 * 2 * 3);
        assert!(frame.pixels().all(|px| px == [7, 7, 7]));
    }

    #[test]
    fn test_gray_mat_is_converted_to_bgr() {
        let frame = mat_to_frame(&mat_of(CV_8UC1, 9.0), 0).unwrap().unwrap();
        assert_eq!(frame.data().len(), 3 * 2 * 3);
    }

    #[test]
    fn test_float_mat_is_rejected() {
        assert!(mat_to_frame(&mat_of(CV_32FC1, 0.5), 0).is_err());
    }

    #[test]
    fn test_empty_mat_is_no_frame() {
        assert!(mat_to_frame(&Mat::default(), 0).unwrap().is_none());
    }
}
