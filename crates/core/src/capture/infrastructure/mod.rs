#[cfg(feature = "ffmpeg")]
pub mod ffmpeg_video_source;
#[cfg(feature = "opencv")]
pub mod highgui_display;
pub mod image_directory_display;
pub mod image_sequence_source;
#[cfg(feature = "opencv")]
pub mod opencv_camera;
