//! Crop-box geometry.
//!
//! Sizing and placement are split so each can be checked on its own: the size depends on
//! the scale and aspect-ratio draws, the origin on the two offset draws.

use crate::augment_pipeline::params::types::{CropBox, Size};

/// Crop size for a drawn scale and aspect ratio, always within `source`.
///
/// The crop's aspect ratio is the output aspect ratio multiplied by `aspect_ratio`.
/// With `area_scale` the scale is a fraction of the source area, capped at the largest
/// area that fits with that aspect ratio. Otherwise the crop's long side becomes `scale`
/// times the source's short side.
///
/// A crop larger than the source in either dimension is shrunk by the larger of the two
/// overflow ratios, which keeps its aspect ratio and brings the offending side exactly
/// onto the source bound.
pub fn scale_crop_size(
    source: Size,
    output: Size,
    scale: f32,
    aspect_ratio: f32,
    area_scale: bool,
) -> Size {
    let in_width = source.width as f32;
    let in_height = source.height as f32;
    let in_ratio = in_width / in_height;
    let crop_ratio = output.width as f32 / output.height as f32 * aspect_ratio;

    let (mut width, mut height) = if area_scale {
        let max_scale = if in_ratio > crop_ratio {
            crop_ratio / in_ratio
        } else {
            in_ratio / crop_ratio
        };
        let area = scale.min(max_scale) * in_width * in_height;
        let height = (area / crop_ratio).sqrt();
        (height * crop_ratio, height)
    } else {
        let short_side = in_width.min(in_height);
        if crop_ratio < 1.0 {
            let height = scale * short_side;
            (height * crop_ratio, height)
        } else {
            let width = scale * short_side;
            (width, width / crop_ratio)
        }
    };

    let overflow = (width / in_width).max(height / in_height);
    if overflow > 1.0 {
        width /= overflow;
        height /= overflow;
    }

    Size::new(
        round_side(width, source.width),
        round_side(height, source.height),
    )
}

/// Places a crop of size `crop` inside `source`.
///
/// Offsets are fractions of the slack left over in each dimension: 0 pins the crop to the
/// top/left edge, 0.5 centers it and 1 pins it to the bottom/right edge. The result is
/// clamped to `source` so the operation is total.
pub fn shift_crop_box(source: Size, crop: Size, x_offset: f32, y_offset: f32) -> CropBox {
    let width = crop.width.clamp(1, source.width.max(1));
    let height = crop.height.clamp(1, source.height.max(1));

    let x = position_in_slack(source.width.saturating_sub(width), x_offset);
    let y = position_in_slack(source.height.saturating_sub(height), y_offset);

    CropBox::new(x, y, width, height)
}

fn round_side(side: f32, limit: usize) -> usize {
    if side.is_finite() {
        (side.round() as usize).clamp(1, limit.max(1))
    } else {
        limit.max(1)
    }
}

fn position_in_slack(slack: usize, offset: f32) -> usize {
    let position = (slack as f32 * offset).floor();
    if position.is_finite() && position > 0.0 {
        (position as usize).min(slack)
    } else {
        0
    }
}
