//! Pipeline orchestration module
//!
//! Wires decoding, parameter sampling, transformation and output layout into one
//! per-item pipeline, with optional per-step timings.

mod pipeline;
mod timing;

pub use pipeline::{AugmentPipeline, ImagePipeline, ProcessedItem};
pub use timing::{StageTimings, StepTiming, Timer};
