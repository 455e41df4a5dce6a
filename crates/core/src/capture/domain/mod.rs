pub mod capture_error;
pub mod frame_display;
pub mod frame_source;
