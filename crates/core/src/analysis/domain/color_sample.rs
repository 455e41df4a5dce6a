use serde::Serialize;

/// Per-channel mean color of a face's skin pixels, in BGR channel order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct ColorSample {
    pub blue: f64,
    pub green: f64,
    pub red: f64,
}

impl ColorSample {
    /// Mean over an empty pixel set.
    pub const ZERO: ColorSample = ColorSample {
        blue: 0.0,
        green: 0.0,
        red: 0.0,
    };

    pub fn new(blue: f64, green: f64, red: f64) -> Self {
        Self { blue, green, red }
    }

    /// Builds a sample from channel means indexed 0 = blue, 1 = green, 2 = red.
    pub fn from_channels(channels: [f64; 3]) -> Self {
        Self::new(channels[0], channels[1], channels[2])
    }
}
