//! Per-frame skin undertone pipeline: face detection, skin masking,
//! undertone classification, palette lookup and frame annotation.

pub mod analysis;
pub mod annotation;
pub mod capture;
pub mod detection;
pub mod pipeline;
pub mod shared;
