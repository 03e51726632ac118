//! TIFF preview output
//!
//! Writes augmented images as multi-page 8-bit TIFF files for inspection. One page per
//! frame, gray or RGB depending on the channel count.

use std::io::{Cursor, Write};
use std::path::Path;

use tiff::encoder::compression::DeflateLevel;
use tiff::encoder::{Compression, TiffEncoder, colortype};
use tracing::{debug, instrument};

use crate::augment_pipeline::common::error::{AugmentError, Result};
use crate::augment_pipeline::decode::DecodedImage;

/// Preview compression methods
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PreviewCompression {
    #[default]
    None,
    Lzw,
    Deflate,
}

impl PreviewCompression {
    fn encoder_compression(self) -> Compression {
        match self {
            PreviewCompression::None => Compression::Uncompressed,
            PreviewCompression::Lzw => Compression::Lzw,
            PreviewCompression::Deflate => Compression::Deflate(DeflateLevel::Balanced),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TiffPreviewWriter {
    compression: PreviewCompression,
}

impl TiffPreviewWriter {
    pub fn new(compression: PreviewCompression) -> Self {
        Self { compression }
    }

    pub fn compression(&self) -> PreviewCompression {
        self.compression
    }

    pub fn write(&self, image: &DecodedImage, output: &mut dyn Write) -> Result<()> {
        let size = image.frame_size();
        debug!(
            "Encoding TIFF preview: {}x{}x{}, {} page(s)",
            size.width,
            size.height,
            image.channels(),
            image.len()
        );

        let width = u32::try_from(size.width)
            .map_err(|_| AugmentError::InvalidDimensions(size.width, size.height))?;
        let height = u32::try_from(size.height)
            .map_err(|_| AugmentError::InvalidDimensions(size.width, size.height))?;

        let mut buffer = Vec::new();
        {
            let mut encoder = TiffEncoder::new(Cursor::new(&mut buffer))
                .map_err(|e| AugmentError::EncodeError(e.to_string()))?
                .with_compression(self.compression.encoder_compression());

            for frame in image.frames() {
                let written = match frame.channels() {
                    1 => encoder.write_image::<colortype::Gray8>(width, height, frame.data()),
                    _ => encoder.write_image::<colortype::RGB8>(width, height, frame.data()),
                };
                written.map_err(|e| AugmentError::EncodeError(e.to_string()))?;
            }
        }

        output.write_all(&buffer)?;

        debug!("TIFF preview encoding complete");
        Ok(())
    }

    #[instrument(skip(self, image, path))]
    pub fn write_file<P: AsRef<Path>>(&self, image: &DecodedImage, path: P) -> Result<()> {
        let mut file = std::fs::File::create(path.as_ref())?;
        self.write(image, &mut file)
    }
}
