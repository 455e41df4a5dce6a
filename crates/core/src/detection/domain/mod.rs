pub mod detection_params;
pub mod detector_error;
pub mod face_detector;
