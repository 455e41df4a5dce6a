use crate::analysis::domain::face_analyzer::FaceReading;
use crate::shared::constants::{PALETTE_LABEL_OFFSET, TONE_LABEL_OFFSET};

/// One line of overlay text anchored at its bottom-left baseline point.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextLine {
    pub text: String,
    pub x: i32,
    pub y: i32,
}

/// The skin tone line and the palette line drawn above a face.
///
/// Anchors are not clamped, so a face at the top edge yields negative
/// baselines and text that is partly or fully off-frame.
pub fn label_lines(reading: &FaceReading) -> [TextLine; 2] {
    let r = &reading.region;
    [
        TextLine {
            text: format!("Skin Tone: {}", reading.undertone),
            x: r.x,
            y: r.y - TONE_LABEL_OFFSET,
        },
        TextLine {
            text: format!("Colors: {}", reading.palette),
            x: r.x,
            y: r.y - PALETTE_LABEL_OFFSET,
        },
    ]
}
