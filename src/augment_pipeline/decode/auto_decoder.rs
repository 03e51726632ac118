use crate::augment_pipeline::common::error::Result;
use crate::augment_pipeline::config::AugmentConfig;
use crate::augment_pipeline::decode::decoder::MediaDecoder;
use crate::augment_pipeline::decode::image_decoder::ImageCrateDecoder;
use crate::augment_pipeline::decode::tiff_decoder::TiffFrameDecoder;
use crate::augment_pipeline::decode::types::DecodedImage;

/// Picks the multi-page TIFF decoder for TIFF input and the image crate otherwise.
#[derive(Debug, Clone, Copy)]
pub struct AutoDecoder {
    tiff: TiffFrameDecoder,
    still: ImageCrateDecoder,
}

impl AutoDecoder {
    pub fn new(channels: usize) -> Self {
        Self {
            tiff: TiffFrameDecoder::new(channels),
            still: ImageCrateDecoder::new(channels),
        }
    }

    pub fn from_config(config: &AugmentConfig) -> Self {
        Self::new(config.channels())
    }
}

impl MediaDecoder for AutoDecoder {
    type Media = DecodedImage;

    fn decode(&self, data: &[u8]) -> Result<DecodedImage> {
        if TiffFrameDecoder::sniff(data) {
            self.tiff.decode(data)
        } else {
            self.still.decode(data)
        }
    }
}
