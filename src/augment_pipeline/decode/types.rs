//! Decoded raster types

use crate::augment_pipeline::common::error::{AugmentError, Result};
use crate::augment_pipeline::params::types::Size;

/// One 8-bit raster, channels interleaved, rows top to bottom.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    width: usize,
    height: usize,
    channels: usize,
    data: Vec<u8>,
}

impl Frame {
    pub fn new(width: usize, height: usize, channels: usize, data: Vec<u8>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(AugmentError::InvalidDimensions(width, height));
        }
        if channels != 1 && channels != 3 {
            return Err(AugmentError::DecodeError(format!(
                "unsupported channel count {}",
                channels
            )));
        }
        if data.len() != width * height * channels {
            return Err(AugmentError::DecodeError(format!(
                "expected {} samples for {}x{}x{}, got {}",
                width * height * channels,
                width,
                height,
                channels,
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            channels,
            data,
        })
    }

    /// All-black frame. Callers guarantee non-zero geometry.
    pub(crate) fn blank(width: usize, height: usize, channels: usize) -> Self {
        Self {
            width,
            height,
            channels,
            data: vec![0; width * height * channels],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    pub fn pixel(&self, x: usize, y: usize) -> &[u8] {
        let start = (y * self.width + x) * self.channels;
        &self.data[start..start + self.channels]
    }

    pub fn pixel_mut(&mut self, x: usize, y: usize) -> &mut [u8] {
        let start = (y * self.width + x) * self.channels;
        &mut self.data[start..start + self.channels]
    }

    pub fn row(&self, y: usize) -> &[u8] {
        let stride = self.width * self.channels;
        &self.data[y * stride..(y + 1) * stride]
    }
}

/// An ordered, non-empty sequence of equally sized frames forming one sample.
///
/// Single images carry one frame; clips and multi-page files carry several.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    frames: Vec<Frame>,
}

impl DecodedImage {
    pub fn new(frames: Vec<Frame>) -> Result<Self> {
        let first = frames
            .first()
            .ok_or_else(|| AugmentError::DecodeError("image has no frames".to_string()))?;

        if let Some(odd) = frames.iter().find(|frame| {
            frame.width != first.width
                || frame.height != first.height
                || frame.channels != first.channels
        }) {
            return Err(AugmentError::InvalidDimensions(odd.width, odd.height));
        }

        Ok(Self { frames })
    }

    pub fn from_frame(frame: Frame) -> Self {
        Self {
            frames: vec![frame],
        }
    }

    /// Geometry shared by every frame.
    pub fn frame_size(&self) -> Size {
        self.frames[0].size()
    }

    pub fn channels(&self) -> usize {
        self.frames[0].channels
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn frame(&self, index: usize) -> Option<&Frame> {
        self.frames.get(index)
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn into_frames(self) -> Vec<Frame> {
        self.frames
    }
}
