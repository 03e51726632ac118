use tracing::{debug, warn};

use crate::augment_pipeline::common::error::{AugmentError, Result};
use crate::augment_pipeline::config::AugmentConfig;
use crate::augment_pipeline::decode::{DecodedImage, Frame};
use crate::augment_pipeline::layout::writer::LayoutWriter;

/// Writes frames one after another, each either planar (`CHW`) or interleaved (`HWC`).
#[derive(Debug, Clone, Copy)]
pub struct ChannelLayoutWriter {
    channel_major: bool,
}

impl ChannelLayoutWriter {
    pub fn new(channel_major: bool) -> Self {
        Self { channel_major }
    }

    pub fn from_config(config: &AugmentConfig) -> Self {
        Self::new(config.channel_major())
    }

    pub fn channel_major(&self) -> bool {
        self.channel_major
    }

    fn write_frame(&self, frame: &Frame, output: &mut [u8]) {
        let channels = frame.channels();
        if !self.channel_major || channels == 1 {
            output.copy_from_slice(frame.data());
            return;
        }

        let plane = frame.width() * frame.height();
        for (index, pixel) in frame.data().chunks_exact(channels).enumerate() {
            for (channel, &value) in pixel.iter().enumerate() {
                output[channel * plane + index] = value;
            }
        }
    }
}

impl LayoutWriter for ChannelLayoutWriter {
    type Media = DecodedImage;

    fn required_len(&self, media: &DecodedImage) -> usize {
        media.frames().iter().map(|frame| frame.data().len()).sum()
    }

    fn write(&self, media: &DecodedImage, output: &mut [u8]) -> Result<usize> {
        let needed = self.required_len(media);
        if output.len() < needed {
            warn!(needed, available = output.len(), "Output buffer too small");
            return Err(AugmentError::BufferTooSmall {
                needed,
                available: output.len(),
            });
        }

        let mut offset = 0;
        for frame in media.frames() {
            let len = frame.data().len();
            self.write_frame(frame, &mut output[offset..offset + len]);
            offset += len;
        }

        debug!(
            bytes = offset,
            frames = media.len(),
            channel_major = self.channel_major,
            "Wrote output layout"
        );
        Ok(offset)
    }
}
