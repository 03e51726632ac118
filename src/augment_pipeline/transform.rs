//! Transform engine module
//!
//! Applies one set of augmentation parameters to every frame of a decoded image:
//! crop, rotate, resize, flip, PCA lighting, then contrast/brightness/saturation.

pub mod geometric;
pub mod photometric;
mod transformer;

pub use transformer::{ImageTransformer, MediaTransformer};

/// Eigenvectors of the pixelwise RGB covariance, one row per channel (R, G, B),
/// one column per principal component.
pub const CPCA: [[f32; 3]; 3] = [
    [0.417_955_13, -0.712_579_45, -0.563_510_45],
    [-0.816_980_6, -0.023_541_67, -0.576_184_4],
    [0.397_311_18, 0.701_196_34, -0.592_002_96],
];

/// Square roots of the covariance eigenvalues, in 8-bit sample units.
pub const CSTD: [f32; 3] = [19.720_833, 37.093_89, 121.780_06];

/// RGB to grayscale weights.
pub const GSCL: [f32; 3] = [0.299, 0.587, 0.114];

/// Rounds and clamps a computed sample back into 8 bits.
#[inline]
pub(crate) fn saturate(value: f32) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}
