//! Decoder for the common still-image formats (PNG, JPEG, BMP, ...) via the image crate.

use tracing::debug;

use crate::augment_pipeline::common::error::{AugmentError, Result};
use crate::augment_pipeline::config::AugmentConfig;
use crate::augment_pipeline::decode::convert::convert_channels;
use crate::augment_pipeline::decode::decoder::MediaDecoder;
use crate::augment_pipeline::decode::types::{DecodedImage, Frame};

/// Single-frame decoder backed by the `image` crate.
#[derive(Debug, Clone, Copy)]
pub struct ImageCrateDecoder {
    channels: usize,
}

impl ImageCrateDecoder {
    pub fn new(channels: usize) -> Self {
        Self { channels }
    }

    pub fn from_config(config: &AugmentConfig) -> Self {
        Self::new(config.channels())
    }
}

impl MediaDecoder for ImageCrateDecoder {
    type Media = DecodedImage;

    fn decode(&self, data: &[u8]) -> Result<DecodedImage> {
        debug!("Decoding image, {} bytes", data.len());

        let decoded =
            image::load_from_memory(data).map_err(|e| AugmentError::DecodeError(e.to_string()))?;
        let width = decoded.width() as usize;
        let height = decoded.height() as usize;

        // Always go through RGB so gray conversion uses the pipeline's own weights
        let rgb = decoded.into_rgb8().into_raw();
        let samples = convert_channels(&rgb, 3, self.channels)?;

        debug!("Decoded image: {}x{}x{}", width, height, self.channels);

        Frame::new(width, height, self.channels, samples).map(DecodedImage::from_frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn encode_png(width: u32, height: u32) -> Vec<u8> {
        let img = image::RgbImage::from_fn(width, height, |x, y| {
            image::Rgb([(x * 10) as u8, (y * 10) as u8, 128])
        });
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn test_decodes_png_as_rgb() {
        let decoded = ImageCrateDecoder::new(3).decode(&encode_png(5, 4)).unwrap();

        assert_eq!(decoded.len(), 1);
        assert_eq!((decoded.frame_size().width, decoded.frame_size().height), (5, 4));
        assert_eq!(decoded.frame(0).unwrap().pixel(2, 3), &[20, 30, 128]);
    }

    #[test]
    fn test_decodes_png_as_gray() {
        let decoded = ImageCrateDecoder::new(1).decode(&encode_png(3, 3)).unwrap();
        assert_eq!(decoded.channels(), 1);
    }

    #[test]
    fn test_rejects_garbage() {
        let result = ImageCrateDecoder::new(3).decode(b"definitely not an image");
        assert!(matches!(result, Err(AugmentError::DecodeError(_))));
    }
}
