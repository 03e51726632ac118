use std::sync::Arc;

use rand::{Rng, SeedableRng};
use rand_distr::Distribution;
use rand_pcg::Pcg64Mcg;
use tracing::debug;

use crate::augment_pipeline::config::AugmentConfig;
use crate::augment_pipeline::decode::DecodedImage;
use crate::augment_pipeline::params::crop::{scale_crop_size, shift_crop_box};
use crate::augment_pipeline::params::types::{AugmentParams, Size};

/// Reference random engine, one instance per worker.
pub type AugmentRng = Pcg64Mcg;

pub fn seeded_rng(seed: u64) -> AugmentRng {
    Pcg64Mcg::seed_from_u64(seed)
}

/// Draws the parameters for one media item from a caller-owned engine.
pub trait ParamSampler {
    type Media;
    type Params;

    fn sample<R: Rng + ?Sized>(&self, media: &Self::Media, rng: &mut R) -> Self::Params;
}

/// Samples [`AugmentParams`] for decoded images.
///
/// Every call takes its draws in this order: scale, aspect ratio, crop offset x, crop
/// offset y, angle, flip, three lighting coefficients, three photometric deviations. All
/// thirteen draws are taken even when a distribution is degenerate, so a seeded engine
/// maps each stream position to the same field on every run.
#[derive(Debug, Clone)]
pub struct ImageParamSampler {
    config: Arc<AugmentConfig>,
}

impl ImageParamSampler {
    pub fn new(config: Arc<AugmentConfig>) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AugmentConfig {
        &self.config
    }

    /// Samples parameters for a source frame of size `source`.
    ///
    /// `source` must be non-empty; decoded frames always are.
    pub fn sample_for_size<R: Rng + ?Sized>(&self, source: Size, rng: &mut R) -> AugmentParams {
        let config = &*self.config;
        let dist = config.distributions();
        let output_size = Size::new(config.width(), config.height());

        let scale = dist.scale.sample(rng);
        let aspect_ratio = dist.aspect_ratio.sample(rng);
        let x_offset = dist.crop_offset.sample(rng);
        let y_offset = dist.crop_offset.sample(rng);
        let angle = dist.angle.sample(rng);
        let flip = dist.flip.sample(rng);
        let lighting = [
            dist.lighting.sample(rng),
            dist.lighting.sample(rng),
            dist.lighting.sample(rng),
        ];
        let deviation = [
            dist.photometric.sample(rng),
            dist.photometric.sample(rng),
            dist.photometric.sample(rng),
        ];

        let crop_size = scale_crop_size(
            source,
            output_size,
            scale,
            aspect_ratio,
            config.do_area_scale(),
        );
        let crop_box = shift_crop_box(source, crop_size, x_offset, y_offset);

        debug!(
            scale,
            aspect_ratio,
            x_offset,
            y_offset,
            ?crop_box,
            angle,
            flip,
            "Sampled augmentation parameters"
        );

        AugmentParams {
            crop_box,
            output_size,
            angle,
            flip,
            lighting,
            color_noise_std: config.lighting().stddev,
            // Deviations are relative to the identity (1, 0, 1)
            photometric: [1.0 + deviation[0], deviation[1], 1.0 + deviation[2]],
        }
    }
}

impl ParamSampler for ImageParamSampler {
    type Media = DecodedImage;
    type Params = AugmentParams;

    fn sample<R: Rng + ?Sized>(&self, media: &DecodedImage, rng: &mut R) -> AugmentParams {
        self.sample_for_size(media.frame_size(), rng)
    }
}
