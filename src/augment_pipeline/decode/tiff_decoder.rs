//! Multi-page TIFF decoder.
//!
//! Every page becomes one frame, so a TIFF stack decodes into a multi-frame sample.

use std::io::Cursor;

use tiff::ColorType;
use tiff::decoder::{Decoder, DecodingResult};
use tracing::debug;

use crate::augment_pipeline::common::error::{AugmentError, Result};
use crate::augment_pipeline::config::AugmentConfig;
use crate::augment_pipeline::decode::convert::convert_channels;
use crate::augment_pipeline::decode::decoder::MediaDecoder;
use crate::augment_pipeline::decode::types::{DecodedImage, Frame};

#[derive(Debug, Clone, Copy)]
pub struct TiffFrameDecoder {
    channels: usize,
}

impl TiffFrameDecoder {
    pub fn new(channels: usize) -> Self {
        Self { channels }
    }

    pub fn from_config(config: &AugmentConfig) -> Self {
        Self::new(config.channels())
    }

    /// True when `data` starts with a classic or BigTIFF header.
    pub fn sniff(data: &[u8]) -> bool {
        data.starts_with(b"II*\0")
            || data.starts_with(b"MM\0*")
            || data.starts_with(b"II+\0")
            || data.starts_with(b"MM\0+")
    }
}

fn decode_error(e: tiff::TiffError) -> AugmentError {
    AugmentError::DecodeError(e.to_string())
}

impl MediaDecoder for TiffFrameDecoder {
    type Media = DecodedImage;

    fn decode(&self, data: &[u8]) -> Result<DecodedImage> {
        debug!("Decoding TIFF, {} bytes", data.len());

        let mut decoder = Decoder::new(Cursor::new(data)).map_err(decode_error)?;
        let mut frames = Vec::new();

        loop {
            let (width, height) = decoder.dimensions().map_err(decode_error)?;
            let source_channels = match decoder.colortype().map_err(decode_error)? {
                ColorType::Gray(8) => 1,
                ColorType::GrayA(8) => 2,
                ColorType::RGB(8) => 3,
                ColorType::RGBA(8) => 4,
                other => {
                    return Err(AugmentError::DecodeError(format!(
                        "unsupported TIFF sample format {:?}",
                        other
                    )));
                }
            };

            let samples = match decoder.read_image().map_err(decode_error)? {
                DecodingResult::U8(samples) => samples,
                _ => {
                    return Err(AugmentError::DecodeError(
                        "expected 8-bit TIFF samples".to_string(),
                    ));
                }
            };

            let samples = convert_channels(&samples, source_channels, self.channels)?;
            frames.push(Frame::new(
                width as usize,
                height as usize,
                self.channels,
                samples,
            )?);

            if !decoder.more_images() {
                break;
            }
            decoder.next_image().map_err(decode_error)?;
        }

        debug!("Decoded {} TIFF page(s)", frames.len());

        DecodedImage::new(frames)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tiff::encoder::{TiffEncoder, colortype};

    fn encode_pages(pages: &[Vec<u8>], width: u32, height: u32) -> Vec<u8> {
        let mut bytes = Vec::new();
        let mut encoder = TiffEncoder::new(Cursor::new(&mut bytes)).unwrap();
        for page in pages {
            encoder
                .write_image::<colortype::RGB8>(width, height, page)
                .unwrap();
        }
        drop(encoder);
        bytes
    }

    #[test]
    fn test_pages_become_frames() {
        let first = vec![10u8; 4 * 3 * 3];
        let second = vec![200u8; 4 * 3 * 3];
        let bytes = encode_pages(&[first, second], 4, 3);

        assert!(TiffFrameDecoder::sniff(&bytes));

        let decoded = TiffFrameDecoder::new(3).decode(&bytes).unwrap();
        assert_eq!(decoded.len(), 2);
        assert_eq!(decoded.frame(0).unwrap().pixel(0, 0), &[10, 10, 10]);
        assert_eq!(decoded.frame(1).unwrap().pixel(3, 2), &[200, 200, 200]);
    }

    #[test]
    fn test_gray_request_collapses_rgb_pages() {
        let bytes = encode_pages(&[vec![90u8; 2 * 2 * 3]], 2, 2);
        let decoded = TiffFrameDecoder::new(1).decode(&bytes).unwrap();

        assert_eq!(decoded.channels(), 1);
        assert_eq!(decoded.frame(0).unwrap().data(), &[90, 90, 90, 90]);
    }

    #[test]
    fn test_rejects_truncated_tiff() {
        let result = TiffFrameDecoder::new(3).decode(b"II*\0garbage");
        assert!(matches!(result, Err(AugmentError::DecodeError(_))));
    }
}
