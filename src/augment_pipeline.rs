//! Image augmentation pipeline module
//!
//! Decodes images, samples random augmentation parameters from a shared configuration,
//! applies them to every frame, and lays the result out for a training input buffer.

pub mod common;
pub mod config;
pub mod decode;
pub mod layout;
pub mod params;
pub mod preview;
pub mod stages;
pub mod transform;

pub use common::{AugmentError, Result};

pub use config::{AugmentConfig, AugmentConfigBuilder, ConfigDocument};

pub use decode::{AutoDecoder, DecodedImage, Frame, ImageCrateDecoder, MediaDecoder, TiffFrameDecoder};

pub use params::{AugmentParams, AugmentRng, CropBox, ImageParamSampler, ParamSampler, Size, seeded_rng};

pub use transform::{ImageTransformer, MediaTransformer};

pub use layout::{ChannelLayoutWriter, LayoutWriter};

pub use preview::{PreviewCompression, TiffPreviewWriter};

pub use stages::{AugmentPipeline, ImagePipeline, ProcessedItem, StageTimings, Timer};
