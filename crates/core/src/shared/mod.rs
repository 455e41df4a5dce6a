pub mod constants;
pub mod frame;
pub mod model_resolver;
#[cfg(feature = "opencv")]
pub mod opencv_mat;
pub mod region;
pub mod runtime;
