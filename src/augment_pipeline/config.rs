//! Augmentation configuration module
//!
//! Output geometry plus the distributions augmentation parameters are sampled from.
//! A configuration is validated once at construction and then shared read-only.

mod document;
pub mod types;

pub use document::{ConfigDocument, DistributionDocument};
pub use types::{AugmentConfig, AugmentConfigBuilder, LightingRange, UniformRange};
