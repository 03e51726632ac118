//! Augmentation parameter sampling module
//!
//! Maps a configuration, a source geometry and a caller-owned random engine to one
//! concrete, reproducible set of augmentation parameters.

mod crop;
mod sampler;
pub mod types;

pub use crop::{scale_crop_size, shift_crop_box};
pub use sampler::{AugmentRng, ImageParamSampler, ParamSampler, seeded_rng};
pub use types::{AugmentParams, CropBox, Size};
