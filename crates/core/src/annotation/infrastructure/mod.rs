pub mod cpu_annotator;
#[cfg(feature = "opencv")]
pub mod opencv_annotator;
