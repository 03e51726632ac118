//! Photometric frame operations.
//!
//! PCA lighting shifts every pixel by one correlated color offset, following the
//! ImageNet-style color augmentation. Contrast, brightness and saturation are applied
//! together in one pass, always in that order.

use crate::augment_pipeline::decode::Frame;
use crate::augment_pipeline::params::AugmentParams;
use crate::augment_pipeline::transform::{CPCA, CSTD, GSCL, saturate};

/// Color offset produced by one set of lighting coefficients, per RGB channel.
pub fn lighting_shift(coefficients: [f32; 3]) -> [f32; 3] {
    std::array::from_fn(|channel| {
        (0..3)
            .map(|component| CPCA[channel][component] * CSTD[component] * coefficients[component])
            .sum()
    })
}

/// Adds the PCA lighting offset to every pixel and renormalizes by `1 + color_noise_std`.
///
/// No-op for gray frames and when `color_noise_std` is zero.
pub fn lighting(frame: &mut Frame, coefficients: [f32; 3], color_noise_std: f32) {
    if color_noise_std == 0.0 || frame.channels() != 3 {
        return;
    }

    let shift = lighting_shift(coefficients);
    let norm = 1.0 + color_noise_std;

    for pixel in frame.data_mut().chunks_exact_mut(3) {
        for (value, offset) in pixel.iter_mut().zip(shift) {
            *value = saturate((*value as f32 + offset) / norm);
        }
    }
}

/// Mean grayscale intensity of the frame.
pub fn grayscale_mean(frame: &Frame) -> f32 {
    let channels = frame.channels();
    let pixels = frame.width() * frame.height();

    let total: f64 = if channels == 3 {
        frame
            .data()
            .chunks_exact(3)
            .map(|p| gray(p[0] as f32, p[1] as f32, p[2] as f32) as f64)
            .sum()
    } else {
        frame.data().iter().map(|&v| v as f64).sum()
    };

    (total / pixels as f64) as f32
}

/// Applies `(contrast, brightness, saturation)`.
///
/// Contrast scales each sample around the frame's grayscale mean (measured before any
/// change), brightness adds `brightness * 255`, and saturation blends each pixel toward
/// its own gray value. Saturation only applies to three-channel frames.
pub fn contrast_brightness_saturation(frame: &mut Frame, photometric: [f32; 3]) {
    if photometric == AugmentParams::IDENTITY_PHOTOMETRIC {
        return;
    }

    let [contrast, brightness, saturation] = photometric;
    let channels = frame.channels();
    let mean = grayscale_mean(frame);
    let offset = brightness * 255.0;
    let contrast_offset = (1.0 - contrast) * mean + offset;

    for pixel in frame.data_mut().chunks_exact_mut(channels) {
        if channels == 3 {
            let [r, g, b] = [pixel[0], pixel[1], pixel[2]]
                .map(|v| contrast * v as f32 + contrast_offset);
            let luma = gray(r, g, b);
            for (out, v) in pixel.iter_mut().zip([r, g, b]) {
                *out = saturate(saturation * v + (1.0 - saturation) * luma);
            }
        } else {
            pixel[0] = saturate(contrast * pixel[0] as f32 + contrast_offset);
        }
    }
}

#[inline]
fn gray(r: f32, g: f32, b: f32) -> f32 {
    GSCL[0] * r + GSCL[1] * g + GSCL[2] * b
}
