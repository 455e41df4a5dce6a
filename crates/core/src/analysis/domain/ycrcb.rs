//! BGR to luma/chroma conversion with 8-bit saturation.

pub const LUMA_RED: f64 = 0.299;
pub const LUMA_GREEN: f64 = 0.587;
pub const LUMA_BLUE: f64 = 0.114;
pub const CR_SCALE: f64 = 0.713;
pub const CB_SCALE: f64 = 0.564;
pub const CHROMA_OFFSET: f64 = 128.0;

pub fn luma(red: f64, green: f64, blue: f64) -> f64 {
    LUMA_RED * red + LUMA_GREEN * green + LUMA_BLUE * blue
}

pub fn red_chroma(red: f64, luma: f64) -> f64 {
    (red - luma) * CR_SCALE + CHROMA_OFFSET
}

pub fn blue_chroma(blue: f64, luma: f64) -> f64 {
    (blue - luma) * CB_SCALE + CHROMA_OFFSET
}

/// Converts one BGR pixel to `[Y, Cr, Cb]`, rounded and clamped to `0..=255`.
///
/// Chroma is taken against the already-rounded 8-bit luma, the same order
/// OpenCV's integer `BGR2YCrCb` path uses.
pub fn bgr_to_ycrcb(bgr: [u8; 3]) -> [u8; 3] {
    let [b, g, r] = bgr.map(f64::from);
    let y = luma(r, g, b).round();
    [
        saturate(y),
        saturate(red_chroma(r, y)),
        saturate(blue_chroma(b, y)),
    ]
}

fn saturate(value: f64) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}
