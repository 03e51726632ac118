//! Serialized form of the augmentation configuration.

use serde::Deserialize;

use crate::augment_pipeline::common::error::{AugmentError, Result};
use crate::augment_pipeline::config::types::AugmentConfig;

/// Configuration document as parsed from JSON.
///
/// ```json
/// {
///     "height": 224,
///     "width": 224,
///     "do_area_scale": true,
///     "distribution": { "scale": [0.08, 1.0], "flip": 0.5 }
/// }
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigDocument {
    pub height: usize,
    pub width: usize,
    pub do_area_scale: Option<bool>,
    pub channels: Option<usize>,
    pub channel_major: Option<bool>,
    #[serde(default)]
    pub distribution: DistributionDocument,
}

/// Distribution endpoints. Missing entries keep the degenerate defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DistributionDocument {
    pub angle: Option<[i32; 2]>,
    pub scale: Option<[f32; 2]>,
    /// `[mean, stddev]`
    pub lighting: Option<[f32; 2]>,
    pub aspect_ratio: Option<[f32; 2]>,
    pub photometric: Option<[f32; 2]>,
    pub crop_offset: Option<[f32; 2]>,
    /// Probability of a horizontal flip.
    pub flip: Option<f64>,
}

impl ConfigDocument {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| AugmentError::ConfigurationError(e.to_string()))
    }

    pub fn into_config(self) -> Result<AugmentConfig> {
        let mut builder = AugmentConfig::builder(self.width, self.height);

        if let Some(area) = self.do_area_scale {
            builder = builder.do_area_scale(area);
        }
        if let Some(channels) = self.channels {
            builder = builder.channels(channels);
        }
        if let Some(channel_major) = self.channel_major {
            builder = builder.channel_major(channel_major);
        }

        let dist = self.distribution;
        if let Some([low, high]) = dist.angle {
            builder = builder.angle(low, high);
        }
        if let Some([low, high]) = dist.scale {
            builder = builder.scale(low, high);
        }
        if let Some([mean, stddev]) = dist.lighting {
            builder = builder.lighting(mean, stddev);
        }
        if let Some([low, high]) = dist.aspect_ratio {
            builder = builder.aspect_ratio(low, high);
        }
        if let Some([low, high]) = dist.photometric {
            builder = builder.photometric(low, high);
        }
        if let Some([low, high]) = dist.crop_offset {
            builder = builder.crop_offset(low, high);
        }
        if let Some(probability) = dist.flip {
            builder = builder.flip(probability);
        }

        builder.build()
    }
}
