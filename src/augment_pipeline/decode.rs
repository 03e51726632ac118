//! Image decoding module
//!
//! Turns encoded bytes into a [`DecodedImage`]: one or more frames sharing a single
//! geometry, converted to the channel count the configuration asks for.

mod auto_decoder;
mod convert;
mod decoder;
mod image_decoder;
mod tiff_decoder;
pub mod types;

pub use auto_decoder::AutoDecoder;
pub use convert::convert_channels;
pub use decoder::MediaDecoder;
pub use image_decoder::ImageCrateDecoder;
pub use tiff_decoder::TiffFrameDecoder;
pub use types::{DecodedImage, Frame};
