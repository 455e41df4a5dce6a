use font8x8::{UnicodeFonts, BASIC_FONTS};

use crate::analysis::domain::face_analyzer::FaceReading;
use crate::annotation::domain::frame_annotator::FrameAnnotator;
use crate::annotation::domain::label_layout::{label_lines, TextLine};
use crate::shared::constants::{
    BORDER_COLOR_BGR, BORDER_THICKNESS, FONT_SCALE, TEXT_COLOR_BGR, TEXT_THICKNESS,
};
use crate::shared::frame::{Frame, BGR_CHANNELS};
use crate::shared::region::Region;

const GLYPH_SIZE: i32 = 8;

/// Approximate cap height of OpenCV's simplex font at scale 1.0.
const SIMPLEX_BASE_HEIGHT: f64 = 22.0;

/// Pure-Rust annotator using an 8x8 bitmap font.
///
/// Border lines are centred on the rectangle edge like OpenCV's
/// `rectangle`. Glyphs are scaled up so their height roughly matches the
/// simplex font at the same scale.
pub struct CpuAnnotator {
    border_color: [u8; 3],
    border_thickness: i32,
    text_color: [u8; 3],
    glyph_scale: i32,
}

impl CpuAnnotator {
    pub fn new(font_scale: f64) -> Self {
        Self {
            border_color: BORDER_COLOR_BGR,
            border_thickness: BORDER_THICKNESS,
            text_color: TEXT_COLOR_BGR,
            glyph_scale: glyph_scale(font_scale),
        }
    }

    fn draw_border(&self, frame: &mut Frame, region: &Region) {
        if region.is_empty() {
            return;
        }
        let half = self.border_thickness / 2;
        let (x1, y1) = (region.x, region.y);
        let (x2, y2) = (region.x + region.width - 1, region.y + region.height - 1);
        for y in (y1 - half)..=(y2 + half) {
            for x in (x1 - half)..=(x2 + half) {
                let inside = x > x1 + half && x < x2 - half && y > y1 + half && y < y2 - half;
                if !inside {
                    put_pixel(frame, x, y, self.border_color);
                }
            }
        }
    }

    fn draw_text(&self, frame: &mut Frame, line: &TextLine) {
        let s = self.glyph_scale;
        let top = line.y - GLYPH_SIZE * s;
        let mut left = line.x;
        for ch in line.text.chars() {
            let glyph = BASIC_FONTS.get(ch).unwrap_or([0; 8]);
            for (row, bits) in glyph.iter().enumerate() {
                for col in 0..GLYPH_SIZE {
                    if bits & (1 << col) == 0 {
                        continue;
                    }
                    let px = left + col * s;
                    let py = top + row as i32 * s;
                    for dy in 0..s {
                        for dx in 0..s {
                            put_pixel(frame, px + dx, py + dy, self.text_color);
                        }
                    }
                }
            }
            left += GLYPH_SIZE * s;
        }
    }
}

impl Default for CpuAnnotator {
    fn default() -> Self {
        Self::new(FONT_SCALE)
    }
}

impl FrameAnnotator for CpuAnnotator {
    fn annotate(
        &self,
        frame: &mut Frame,
        faces: &[FaceReading],
    ) -> Result<(), Box<dyn std::error::Error>> {
        for face in faces {
            self.draw_border(frame, &face.region);
            for line in label_lines(face) {
                self.draw_text(frame, &line);
            }
        }
        Ok(())
    }
}

fn glyph_scale(font_scale: f64) -> i32 {
    let scaled = (font_scale * SIMPLEX_BASE_HEIGHT / GLYPH_SIZE as f64).round() as i32;
    scaled.max(TEXT_THICKNESS / 2).max(1)
}

fn put_pixel(frame: &mut Frame, x: i32, y: i32, color: [u8; 3]) {
    if x < 0 || y < 0 || x >= frame.width() as i32 || y >= frame.height() as i32 {
        return;
    }
    let offset = (y as usize * frame.width() as usize + x as usize) * BGR_CHANNELS;
    frame.data_mut()[offset..offset + BGR_CHANNELS].copy_from_slice(&color);
}
