pub mod live_skin_tone_use_case;
pub mod pipeline_logger;
