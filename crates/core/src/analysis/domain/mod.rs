pub mod color_recommender;
pub mod color_sample;
pub mod face_analyzer;
pub mod skin_mask;
pub mod undertone;
pub mod undertone_classifier;
pub mod ycrcb;
