pub mod augment_pipeline;
pub mod logger;
