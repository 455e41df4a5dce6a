use opencv::core::{Point, Rect, Scalar};
use opencv::imgproc;

use crate::analysis::domain::face_analyzer::FaceReading;
use crate::annotation::domain::frame_annotator::FrameAnnotator;
use crate::annotation::domain::label_layout::label_lines;
use crate::shared::constants::{
    BORDER_COLOR_BGR, BORDER_THICKNESS, FONT_SCALE, TEXT_COLOR_BGR, TEXT_THICKNESS,
};
use crate::shared::frame::Frame;
use crate::shared::opencv_mat::{copy_mat_into, frame_to_mat};

/// Annotator using OpenCV's rectangle and Hershey simplex text rendering.
#[derive(Default)]
pub struct OpenCvAnnotator;

impl FrameAnnotator for OpenCvAnnotator {
    fn annotate(
        &self,
        frame: &mut Frame,
        faces: &[FaceReading],
    ) -> Result<(), Box<dyn std::error::Error>> {
        if faces.is_empty() {
            return Ok(());
        }
        let mut mat = frame_to_mat(frame)?;
        let border = scalar(BORDER_COLOR_BGR);
        let text = scalar(TEXT_COLOR_BGR);

        for face in faces {
            let r = &face.region;
            imgproc::rectangle(
                &mut mat,
                Rect::new(r.x, r.y, r.width, r.height),
                border,
                BORDER_THICKNESS,
                imgproc::LINE_8,
                0,
            )?;
            for line in label_lines(face) {
                imgproc::put_text(
                    &mut mat,
                    &line.text,
                    Point::new(line.x, line.y),
                    imgproc::FONT_HERSHEY_SIMPLEX,
                    FONT_SCALE,
                    text,
                    TEXT_THICKNESS,
                    imgproc::LINE_8,
                    false,
                )?;
            }
        }

        copy_mat_into(&mat, frame)?;
        Ok(())
    }
}

fn scalar(bgr: [u8; 3]) -> Scalar {
    Scalar::new(bgr[0] as f64, bgr[1] as f64, bgr[2] as f64, 0.0)
}
