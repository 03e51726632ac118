use thiserror::Error;

#[derive(Error, Debug)]
pub enum AugmentError {
    #[error("Invalid augmentation configuration: {0}")]
    ConfigurationError(String),

    #[error("Failed to decode image: {0}")]
    DecodeError(String),

    #[error(
        "Crop box {x},{y} {width}x{height} lies outside source frame {frame_width}x{frame_height}"
    )]
    GeometryError {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
        frame_width: usize,
        frame_height: usize,
    },

    #[error("Invalid image dimensions: width={0}, height={1}")]
    InvalidDimensions(usize, usize),

    #[error("Destination buffer too small: need {needed} bytes, have {available}")]
    BufferTooSmall { needed: usize, available: usize },

    #[error("Failed to encode preview image: {0}")]
    EncodeError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, AugmentError>;
