//! Augmentation configuration types

use rand_distr::{Bernoulli, Normal, Uniform};

use crate::augment_pipeline::common::error::{AugmentError, Result};
use crate::augment_pipeline::config::document::ConfigDocument;

/// Closed interval a uniform distribution samples from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UniformRange<T> {
    pub low: T,
    pub high: T,
}

impl<T: PartialEq + Copy> UniformRange<T> {
    pub const fn new(low: T, high: T) -> Self {
        Self { low, high }
    }

    /// True when every draw yields the same value.
    pub fn is_degenerate(&self) -> bool {
        self.low == self.high
    }
}

/// Normal distribution parameters for the PCA lighting coefficients.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightingRange {
    pub mean: f32,
    pub stddev: f32,
}

/// Pre-built sampling distributions, one per configured parameter.
#[derive(Debug, Clone)]
pub(crate) struct Distributions {
    pub angle: Uniform<i32>,
    pub scale: Uniform<f32>,
    pub aspect_ratio: Uniform<f32>,
    pub crop_offset: Uniform<f32>,
    pub flip: Bernoulli,
    pub lighting: Normal<f32>,
    pub photometric: Uniform<f32>,
}

/// Validated augmentation configuration.
///
/// Immutable once built; wrap it in an `Arc` to share it between workers.
#[derive(Debug, Clone)]
pub struct AugmentConfig {
    width: usize,
    height: usize,
    channels: usize,
    channel_major: bool,
    do_area_scale: bool,
    angle: UniformRange<i32>,
    scale: UniformRange<f32>,
    aspect_ratio: UniformRange<f32>,
    crop_offset: UniformRange<f32>,
    flip: f64,
    lighting: LightingRange,
    photometric: UniformRange<f32>,
    distributions: Distributions,
}

impl AugmentConfig {
    pub fn builder(width: usize, height: usize) -> AugmentConfigBuilder {
        AugmentConfigBuilder::new(width, height)
    }

    /// Parses and validates a JSON configuration document.
    pub fn from_json(json: &str) -> Result<Self> {
        ConfigDocument::from_json(json)?.into_config()
    }

    pub fn from_document(document: ConfigDocument) -> Result<Self> {
        document.into_config()
    }

    /// Output width in pixels
    pub fn width(&self) -> usize {
        self.width
    }

    /// Output height in pixels
    pub fn height(&self) -> usize {
        self.height
    }

    /// Channel count frames are decoded to (1 or 3)
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Planar (`CHW`) output when true, interleaved (`HWC`) otherwise
    pub fn channel_major(&self) -> bool {
        self.channel_major
    }

    /// Scale multiplies crop area when true, the crop's long side otherwise
    pub fn do_area_scale(&self) -> bool {
        self.do_area_scale
    }

    pub fn angle(&self) -> UniformRange<i32> {
        self.angle
    }

    pub fn scale(&self) -> UniformRange<f32> {
        self.scale
    }

    pub fn aspect_ratio(&self) -> UniformRange<f32> {
        self.aspect_ratio
    }

    pub fn crop_offset(&self) -> UniformRange<f32> {
        self.crop_offset
    }

    pub fn flip(&self) -> f64 {
        self.flip
    }

    pub fn lighting(&self) -> LightingRange {
        self.lighting
    }

    pub fn photometric(&self) -> UniformRange<f32> {
        self.photometric
    }

    pub(crate) fn distributions(&self) -> &Distributions {
        &self.distributions
    }
}

/// Builder for AugmentConfig
#[derive(Debug, Clone)]
pub struct AugmentConfigBuilder {
    width: usize,
    height: usize,
    channels: Option<usize>,
    channel_major: Option<bool>,
    do_area_scale: Option<bool>,
    angle: Option<UniformRange<i32>>,
    scale: Option<UniformRange<f32>>,
    aspect_ratio: Option<UniformRange<f32>>,
    crop_offset: Option<UniformRange<f32>>,
    flip: Option<f64>,
    lighting: Option<LightingRange>,
    photometric: Option<UniformRange<f32>>,
}

impl AugmentConfigBuilder {
    fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            channels: None,
            channel_major: None,
            do_area_scale: None,
            angle: None,
            scale: None,
            aspect_ratio: None,
            crop_offset: None,
            flip: None,
            lighting: None,
            photometric: None,
        }
    }

    pub fn channels(mut self, channels: usize) -> Self {
        self.channels = Some(channels);
        self
    }

    pub fn channel_major(mut self, channel_major: bool) -> Self {
        self.channel_major = Some(channel_major);
        self
    }

    pub fn do_area_scale(mut self, enable: bool) -> Self {
        self.do_area_scale = Some(enable);
        self
    }

    /// Rotation range in whole degrees.
    pub fn angle(mut self, low: i32, high: i32) -> Self {
        self.angle = Some(UniformRange::new(low, high));
        self
    }

    pub fn scale(mut self, low: f32, high: f32) -> Self {
        self.scale = Some(UniformRange::new(low, high));
        self
    }

    pub fn aspect_ratio(mut self, low: f32, high: f32) -> Self {
        self.aspect_ratio = Some(UniformRange::new(low, high));
        self
    }

    /// Fractional crop origin within the slack, 0.5 centers the crop.
    pub fn crop_offset(mut self, low: f32, high: f32) -> Self {
        self.crop_offset = Some(UniformRange::new(low, high));
        self
    }

    pub fn flip(mut self, probability: f64) -> Self {
        self.flip = Some(probability);
        self
    }

    pub fn lighting(mut self, mean: f32, stddev: f32) -> Self {
        self.lighting = Some(LightingRange { mean, stddev });
        self
    }

    /// Deviation range for contrast, brightness and saturation.
    pub fn photometric(mut self, low: f32, high: f32) -> Self {
        self.photometric = Some(UniformRange::new(low, high));
        self
    }

    pub fn build(self) -> Result<AugmentConfig> {
        if self.width == 0 || self.height == 0 {
            return Err(AugmentError::ConfigurationError(format!(
                "output size must be positive, got {}x{}",
                self.width, self.height
            )));
        }

        let channels = self.channels.unwrap_or(3);
        if channels != 1 && channels != 3 {
            return Err(AugmentError::ConfigurationError(format!(
                "channels must be 1 or 3, got {}",
                channels
            )));
        }

        let angle = self.angle.unwrap_or(UniformRange::new(0, 0));
        if angle.low > angle.high {
            return Err(inverted("angle", angle.low, angle.high));
        }

        let scale = checked_range("scale", self.scale.unwrap_or(UniformRange::new(1.0, 1.0)))?;
        if scale.low <= 0.0 {
            return Err(AugmentError::ConfigurationError(format!(
                "scale must be positive, got lower bound {}",
                scale.low
            )));
        }

        let aspect_ratio = checked_range(
            "aspect_ratio",
            self.aspect_ratio.unwrap_or(UniformRange::new(1.0, 1.0)),
        )?;
        if aspect_ratio.low <= 0.0 {
            return Err(AugmentError::ConfigurationError(format!(
                "aspect_ratio must be positive, got lower bound {}",
                aspect_ratio.low
            )));
        }

        let crop_offset = checked_range(
            "crop_offset",
            self.crop_offset.unwrap_or(UniformRange::new(0.5, 0.5)),
        )?;
        if crop_offset.low < 0.0 || crop_offset.high > 1.0 {
            return Err(AugmentError::ConfigurationError(format!(
                "crop_offset must lie within [0, 1], got [{}, {}]",
                crop_offset.low, crop_offset.high
            )));
        }

        let photometric = checked_range(
            "photometric",
            self.photometric.unwrap_or(UniformRange::new(0.0, 0.0)),
        )?;

        let flip = self.flip.unwrap_or(0.0);
        let flip_dist = Bernoulli::new(flip).map_err(|_| {
            AugmentError::ConfigurationError(format!(
                "flip probability must lie within [0, 1], got {}",
                flip
            ))
        })?;

        let lighting = self.lighting.unwrap_or(LightingRange {
            mean: 0.0,
            stddev: 0.0,
        });
        if !lighting.mean.is_finite() || !lighting.stddev.is_finite() || lighting.stddev < 0.0 {
            return Err(AugmentError::ConfigurationError(format!(
                "lighting needs a finite mean and non-negative stddev, got ({}, {})",
                lighting.mean, lighting.stddev
            )));
        }
        let lighting_dist = Normal::new(lighting.mean, lighting.stddev)
            .map_err(|e| AugmentError::ConfigurationError(format!("lighting: {}", e)))?;

        let distributions = Distributions {
            angle: Uniform::new_inclusive(angle.low, angle.high),
            scale: Uniform::new_inclusive(scale.low, scale.high),
            aspect_ratio: Uniform::new_inclusive(aspect_ratio.low, aspect_ratio.high),
            crop_offset: Uniform::new_inclusive(crop_offset.low, crop_offset.high),
            flip: flip_dist,
            lighting: lighting_dist,
            photometric: Uniform::new_inclusive(photometric.low, photometric.high),
        };

        Ok(AugmentConfig {
            width: self.width,
            height: self.height,
            channels,
            channel_major: self.channel_major.unwrap_or(true),
            do_area_scale: self.do_area_scale.unwrap_or(false),
            angle,
            scale,
            aspect_ratio,
            crop_offset,
            flip,
            lighting,
            photometric,
            distributions,
        })
    }
}

fn checked_range(name: &str, range: UniformRange<f32>) -> Result<UniformRange<f32>> {
    if !range.low.is_finite() || !range.high.is_finite() {
        return Err(AugmentError::ConfigurationError(format!(
            "{} bounds must be finite, got [{}, {}]",
            name, range.low, range.high
        )));
    }
    if range.low > range.high {
        return Err(inverted(name, range.low, range.high));
    }
    // Uniform scales the span up by 1 / (1 - EPSILON) and panics if that overflows
    if !((range.high - range.low) / (1.0 - f32::EPSILON)).is_finite() {
        return Err(AugmentError::ConfigurationError(format!(
            "{} span [{}, {}] is too wide to sample",
            name, range.low, range.high
        )));
    }
    Ok(range)
}

fn inverted<T: std::fmt::Display>(name: &str, low: T, high: T) -> AugmentError {
    AugmentError::ConfigurationError(format!(
        "{} lower bound {} exceeds upper bound {}",
        name, low, high
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::augment_pipeline::params::{CropBox, ImageParamSampler, Size, seeded_rng};

    #[test]
    fn test_defaults_are_degenerate() {
        let config = AugmentConfig::builder(100, 100).build().unwrap();

        assert_eq!(config.channels(), 3);
        assert!(config.channel_major());
        assert!(!config.do_area_scale());
        assert!(config.angle().is_degenerate());
        assert!(config.scale().is_degenerate());
        assert!(config.aspect_ratio().is_degenerate());
        assert!(config.photometric().is_degenerate());
        assert_eq!(config.crop_offset(), UniformRange::new(0.5, 0.5));
        assert_eq!(config.flip(), 0.0);
        assert_eq!(config.lighting().stddev, 0.0);
    }

    #[test]
    fn test_rejects_inverted_crop_offset() {
        let result = AugmentConfig::builder(64, 64).crop_offset(0.8, 0.2).build();
        assert!(matches!(result, Err(AugmentError::ConfigurationError(_))));
    }

    #[test]
    fn test_rejects_crop_offset_outside_unit_interval() {
        let result = AugmentConfig::builder(64, 64).crop_offset(0.0, 1.5).build();
        assert!(matches!(result, Err(AugmentError::ConfigurationError(_))));
    }

    #[test]
    fn test_rejects_zero_output_size() {
        assert!(AugmentConfig::builder(0, 10).build().is_err());
        assert!(AugmentConfig::builder(10, 0).build().is_err());
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(AugmentConfig::builder(8, 8).channels(4).build().is_err());
        assert!(AugmentConfig::builder(8, 8).scale(0.0, 1.0).build().is_err());
        assert!(AugmentConfig::builder(8, 8).aspect_ratio(-1.0, 1.0).build().is_err());
        assert!(AugmentConfig::builder(8, 8).angle(10, -10).build().is_err());
        assert!(AugmentConfig::builder(8, 8).flip(1.5).build().is_err());
        assert!(AugmentConfig::builder(8, 8).lighting(0.0, -0.1).build().is_err());
        assert!(AugmentConfig::builder(8, 8).photometric(f32::NAN, 0.0).build().is_err());
    }

    #[test]
    fn test_from_json_full_document() {
        let json = r#"{
            "height": 32,
            "width": 48,
            "do_area_scale": true,
            "channels": 1,
            "channel_major": false,
            "distribution": {
                "angle": [-10, 10],
                "scale": [0.5, 1.0],
                "lighting": [0.0, 0.1],
                "aspect_ratio": [0.75, 1.33],
                "photometric": [-0.2, 0.2],
                "crop_offset": [0.0, 1.0],
                "flip": 0.5
            }
        }"#;

        let config = AugmentConfig::from_json(json).unwrap();

        assert_eq!((config.width(), config.height()), (48, 32));
        assert!(config.do_area_scale());
        assert_eq!(config.channels(), 1);
        assert!(!config.channel_major());
        assert_eq!(config.angle(), UniformRange::new(-10, 10));
        assert_eq!(config.scale(), UniformRange::new(0.5, 1.0));
        assert_eq!(config.lighting(), LightingRange { mean: 0.0, stddev: 0.1 });
        assert_eq!(config.crop_offset(), UniformRange::new(0.0, 1.0));
        assert_eq!(config.flip(), 0.5);
    }

    #[test]
    fn test_from_json_requires_height_and_width() {
        let result = AugmentConfig::from_json(r#"{ "width": 10 }"#);
        assert!(matches!(result, Err(AugmentError::ConfigurationError(_))));
    }

    #[test]
    fn test_from_json_rejects_unknown_distribution() {
        let result = AugmentConfig::from_json(
            r#"{ "width": 10, "height": 10, "distribution": { "hue": [0, 1] } }"#,
        );
        assert!(matches!(result, Err(AugmentError::ConfigurationError(_))));
    }

    #[test]
    fn test_from_json_rejects_unsamplable_span() {
        let result = AugmentConfig::from_json(
            r#"{ "width": 8, "height": 8, "distribution": { "photometric": [-3e38, 3e38] } }"#,
        );
        assert!(matches!(result, Err(AugmentError::ConfigurationError(_))));

        let result = AugmentConfig::builder(8, 8).photometric(0.0, f32::MAX).build();
        assert!(matches!(result, Err(AugmentError::ConfigurationError(_))));
        assert!(AugmentConfig::builder(8, 8).photometric(-1e30, 1e30).build().is_ok());
    }

    #[test]
    fn test_sampler_follows_reported_ranges() {
        let config = std::sync::Arc::new(
            AugmentConfig::builder(10, 10)
                .scale(0.25, 0.25)
                .crop_offset(0.0, 0.0)
                .build()
                .unwrap(),
        );
        assert_eq!(config.scale(), UniformRange::new(0.25, 0.25));
        assert_eq!(config.crop_offset(), UniformRange::new(0.0, 0.0));

        let sampler = ImageParamSampler::new(config.clone());
        let params = sampler.sample_for_size(Size::new(100, 100), &mut seeded_rng(0));

        assert_eq!(params.crop_box, CropBox::new(0, 0, 25, 25));
        assert_eq!(
            params.output_size,
            Size::new(config.width(), config.height())
        );
    }

    #[test]
    fn test_from_json_validates_ranges() {
        let result = AugmentConfig::from_json(
            r#"{ "width": 10, "height": 10, "distribution": { "crop_offset": [0.9, 0.1] } }"#,
        );
        assert!(matches!(result, Err(AugmentError::ConfigurationError(_))));
    }
}
