use crate::augment_pipeline::common::error::{AugmentError, Result};
use crate::augment_pipeline::transform::GSCL;

/// Converts interleaved 8-bit samples between channel layouts.
///
/// Sources may be gray, gray+alpha, RGB or RGBA; targets are gray or RGB.
/// Alpha is dropped, gray is replicated, and RGB collapses to gray through [`GSCL`].
pub fn convert_channels(samples: &[u8], from: usize, to: usize) -> Result<Vec<u8>> {
    if !(1..=4).contains(&from) || (to != 1 && to != 3) {
        return Err(AugmentError::DecodeError(format!(
            "cannot convert {} channels to {}",
            from, to
        )));
    }
    if samples.len() % from != 0 {
        return Err(AugmentError::DecodeError(format!(
            "{} samples do not divide into {}-channel pixels",
            samples.len(),
            from
        )));
    }

    let mut converted = Vec::with_capacity(samples.len() / from * to);
    for pixel in samples.chunks_exact(from) {
        match (from >= 3, to) {
            (true, 3) => converted.extend_from_slice(&pixel[..3]),
            (true, _) => {
                let gray = GSCL[0] * pixel[0] as f32
                    + GSCL[1] * pixel[1] as f32
                    + GSCL[2] * pixel[2] as f32;
                converted.push(gray.round().clamp(0.0, 255.0) as u8);
            }
            (false, 3) => converted.extend_from_slice(&[pixel[0]; 3]),
            (false, _) => converted.push(pixel[0]),
        }
    }

    Ok(converted)
}
