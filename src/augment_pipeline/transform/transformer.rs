use tracing::{debug, error};

use crate::augment_pipeline::common::error::{AugmentError, Result};
use crate::augment_pipeline::decode::{DecodedImage, Frame};
use crate::augment_pipeline::params::AugmentParams;
use crate::augment_pipeline::transform::{geometric, photometric};

/// Applies one sampled parameter set to one media item.
pub trait MediaTransformer {
    type Media;
    type Params;

    fn transform(&self, params: &Self::Params, media: Self::Media) -> Result<Self::Media>;
}

/// Image transform engine.
///
/// Every frame goes through crop, rotate, resize, flip, lighting and
/// contrast/brightness/saturation, in that order, with the same parameters.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageTransformer;

impl ImageTransformer {
    pub fn new() -> Self {
        Self
    }

    /// Transforms a single frame. The crop box is checked against the frame.
    pub fn transform_frame(&self, params: &AugmentParams, frame: &Frame) -> Result<Frame> {
        let cropped = geometric::crop(frame, params.crop_box)?;
        let rotated = geometric::rotate(&cropped, params.angle)?;
        let mut output = geometric::resize(&rotated, params.output_size)?.into_owned();

        if params.flip {
            geometric::flip_horizontal(&mut output)?;
        }
        photometric::lighting(&mut output, params.lighting, params.color_noise_std);
        photometric::contrast_brightness_saturation(&mut output, params.photometric);

        Ok(output)
    }
}

impl MediaTransformer for ImageTransformer {
    type Media = DecodedImage;
    type Params = AugmentParams;

    fn transform(&self, params: &AugmentParams, media: DecodedImage) -> Result<DecodedImage> {
        if params.output_size.is_empty() {
            return Err(AugmentError::InvalidDimensions(
                params.output_size.width,
                params.output_size.height,
            ));
        }

        let source = media.frame_size();
        if !params.crop_box.fits_within(source) {
            error!(
                crop_box = ?params.crop_box,
                width = source.width,
                height = source.height,
                "Crop box does not fit the source frame; parameters were sampled for another image"
            );
            return Err(AugmentError::GeometryError {
                x: params.crop_box.x,
                y: params.crop_box.y,
                width: params.crop_box.width,
                height: params.crop_box.height,
                frame_width: source.width,
                frame_height: source.height,
            });
        }

        debug!(frames = media.len(), ?params, "Transforming image");

        let frames = media
            .frames()
            .iter()
            .map(|frame| self.transform_frame(params, frame))
            .collect::<Result<Vec<_>>>()?;

        DecodedImage::new(frames)
    }
}
