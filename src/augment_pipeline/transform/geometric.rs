//! Geometric frame operations: crop, rotate, resize and flip.
//!
//! Frames are wrapped as `image` buffers for the heavy lifting. Operations that turn
//! out to be no-ops borrow their input instead of copying it.

use std::borrow::Cow;

use image::imageops::{self, FilterType};
use image::{GenericImage, ImageBuffer, Luma, Pixel, Rgb};
use imageproc::definitions::Image;
use imageproc::geometric_transformations::{Interpolation, rotate_about_center};

use crate::augment_pipeline::common::error::{AugmentError, Result};
use crate::augment_pipeline::decode::Frame;
use crate::augment_pipeline::params::{CropBox, Size};
use crate::augment_pipeline::transform::saturate;

/// Extracts `crop_box` from `frame`.
pub fn crop(frame: &Frame, crop_box: CropBox) -> Result<Cow<'_, Frame>> {
    let bounds = frame.size();
    if !crop_box.fits_within(bounds) {
        return Err(AugmentError::GeometryError {
            x: crop_box.x,
            y: crop_box.y,
            width: crop_box.width,
            height: crop_box.height,
            frame_width: bounds.width,
            frame_height: bounds.height,
        });
    }
    if crop_box == CropBox::full(bounds) {
        return Ok(Cow::Borrowed(frame));
    }

    let cropped = match frame.channels() {
        1 => into_frame(crop_pixels::<Luma<u8>>(frame, crop_box)?)?,
        _ => into_frame(crop_pixels::<Rgb<u8>>(frame, crop_box)?)?,
    };
    Ok(Cow::Owned(cropped))
}

/// Rotates `frame` counter-clockwise by `angle` degrees about its center.
///
/// The canvas keeps the input size. Pixels are interpolated bilinearly; pixels that
/// map outside the source stay black.
pub fn rotate(frame: &Frame, angle: i32) -> Result<Cow<'_, Frame>> {
    if angle.rem_euclid(360) == 0 {
        return Ok(Cow::Borrowed(frame));
    }

    // rotate_about_center turns clockwise for positive theta
    let theta = -(angle as f32).to_radians();
    let rotated = match frame.channels() {
        1 => into_frame(rotate_about_center(
            &owned::<Luma<u8>>(frame)?,
            theta,
            Interpolation::Bilinear,
            Luma([0]),
        ))?,
        _ => into_frame(rotate_about_center(
            &owned::<Rgb<u8>>(frame)?,
            theta,
            Interpolation::Bilinear,
            Rgb([0, 0, 0]),
        ))?,
    };
    Ok(Cow::Owned(rotated))
}

/// Resizes `frame` to exactly `size`.
///
/// Shrinking (by area) averages the covered source pixels, weighting partially covered
/// ones by their coverage. Enlarging interpolates linearly between pixel centers.
pub fn resize(frame: &Frame, size: Size) -> Result<Cow<'_, Frame>> {
    if frame.size() == size {
        return Ok(Cow::Borrowed(frame));
    }

    if size.area() <= frame.size().area() {
        return Ok(Cow::Owned(resize_area(frame, size)));
    }

    let (width, height) = dimensions(size)?;
    let resized = match frame.channels() {
        1 => into_frame(imageops::resize(
            &borrowed::<Luma<u8>>(frame)?,
            width,
            height,
            FilterType::Triangle,
        ))?,
        _ => into_frame(imageops::resize(
            &borrowed::<Rgb<u8>>(frame)?,
            width,
            height,
            FilterType::Triangle,
        ))?,
    };
    Ok(Cow::Owned(resized))
}

/// Mirrors `frame` left to right in place.
pub fn flip_horizontal(frame: &mut Frame) -> Result<()> {
    let (width, height) = dimensions(frame.size())?;
    let invalid = AugmentError::InvalidDimensions(frame.width(), frame.height());

    match frame.channels() {
        1 => imageops::flip_horizontal_in_place(
            &mut ImageBuffer::<Luma<u8>, _>::from_raw(width, height, frame.data_mut())
                .ok_or(invalid)?,
        ),
        _ => imageops::flip_horizontal_in_place(
            &mut ImageBuffer::<Rgb<u8>, _>::from_raw(width, height, frame.data_mut())
                .ok_or(invalid)?,
        ),
    }
    Ok(())
}

fn dimensions(size: Size) -> Result<(u32, u32)> {
    match (u32::try_from(size.width), u32::try_from(size.height)) {
        (Ok(width), Ok(height)) => Ok((width, height)),
        _ => Err(AugmentError::InvalidDimensions(size.width, size.height)),
    }
}

fn borrowed<P: Pixel<Subpixel = u8>>(frame: &Frame) -> Result<ImageBuffer<P, &[u8]>> {
    let (width, height) = dimensions(frame.size())?;
    ImageBuffer::from_raw(width, height, frame.data())
        .ok_or(AugmentError::InvalidDimensions(frame.width(), frame.height()))
}

fn owned<P: Pixel<Subpixel = u8>>(frame: &Frame) -> Result<Image<P>> {
    let (width, height) = dimensions(frame.size())?;
    ImageBuffer::from_raw(width, height, frame.data().to_vec())
        .ok_or(AugmentError::InvalidDimensions(frame.width(), frame.height()))
}

fn into_frame<P: Pixel<Subpixel = u8>>(buffer: Image<P>) -> Result<Frame> {
    let (width, height) = buffer.dimensions();
    Frame::new(
        width as usize,
        height as usize,
        P::CHANNEL_COUNT as usize,
        buffer.into_raw(),
    )
}

fn crop_pixels<P: Pixel<Subpixel = u8>>(frame: &Frame, crop_box: CropBox) -> Result<Image<P>> {
    let view = borrowed::<P>(frame)?;
    let (x, y) = dimensions(Size::new(crop_box.x, crop_box.y))?;
    let (width, height) = dimensions(crop_box.size())?;

    let region = imageops::crop_imm(&view, x, y, width, height);
    let mut cropped = ImageBuffer::new(width, height);
    cropped
        .copy_from(&*region, 0, 0)
        .map_err(|_| AugmentError::InvalidDimensions(crop_box.width, crop_box.height))?;
    Ok(cropped)
}

/// Source taps and weights for each destination index along one axis.
fn area_taps(src: usize, dst: usize) -> Vec<Vec<(usize, f32)>> {
    let scale = src as f32 / dst as f32;

    (0..dst)
        .map(|d| {
            let start = d as f32 * scale;
            let end = start + scale;
            let first = (start.floor() as usize).min(src - 1);
            let last = (end.ceil() as usize).clamp(first + 1, src);

            let taps: Vec<(usize, f32)> = (first..last)
                .filter_map(|s| {
                    let covered = end.min(s as f32 + 1.0) - start.max(s as f32);
                    (covered > 0.0).then_some((s, covered / scale))
                })
                .collect();

            if taps.is_empty() {
                vec![(first, 1.0)]
            } else {
                taps
            }
        })
        .collect()
}

// imageops::FilterType has no area-averaging filter, so shrinking stays here.
fn resize_area(frame: &Frame, size: Size) -> Frame {
    let channels = frame.channels();
    let x_taps = area_taps(frame.width(), size.width);
    let y_taps = area_taps(frame.height(), size.height);

    let mut resized = Frame::blank(size.width, size.height, channels);
    let mut acc = vec![0.0f32; channels];

    for (y, row_taps) in y_taps.iter().enumerate() {
        for (x, col_taps) in x_taps.iter().enumerate() {
            acc.iter_mut().for_each(|v| *v = 0.0);
            for &(sy, wy) in row_taps {
                for &(sx, wx) in col_taps {
                    let weight = wy * wx;
                    for (a, &v) in acc.iter_mut().zip(frame.pixel(sx, sy)) {
                        *a += v as f32 * weight;
                    }
                }
            }
            for (out, &a) in resized.pixel_mut(x, y).iter_mut().zip(&acc) {
                *out = saturate(a);
            }
        }
    }

    resized
}

#[cfg(test)]
mod tests {
    use std::ops::RangeInclusive;

    use super::*;

    fn gradient(width: usize, height: usize, channels: usize) -> Frame {
        let data = (0..width * height * channels)
            .map(|i| (i * 7 % 251) as u8)
            .collect();
        Frame::new(width, height, channels, data).unwrap()
    }

    /// Black gray frame with a 200-valued square block.
    fn block(size: usize, x: RangeInclusive<usize>, y: RangeInclusive<usize>) -> Frame {
        let mut frame = Frame::blank(size, size, 1);
        for row in y {
            for col in x.clone() {
                frame.pixel_mut(col, row)[0] = 200;
            }
        }
        frame
    }

    #[test]
    fn test_crop_extracts_region() {
        let frame = gradient(5, 4, 3);
        let cropped = crop(&frame, CropBox::new(1, 2, 3, 2)).unwrap();

        assert_eq!(cropped.size(), Size::new(3, 2));
        assert_eq!(cropped.pixel(0, 0), frame.pixel(1, 2));
        assert_eq!(cropped.pixel(2, 1), frame.pixel(3, 3));
    }

    #[test]
    fn test_crop_gray_region() {
        let frame = gradient(6, 6, 1);
        let cropped = crop(&frame, CropBox::new(2, 1, 4, 5)).unwrap();

        assert_eq!(cropped.channels(), 1);
        for y in 0..5 {
            assert_eq!(cropped.row(y), &frame.row(y + 1)[2..6]);
        }
    }

    #[test]
    fn test_crop_full_box_borrows() {
        let frame = gradient(4, 4, 1);
        let cropped = crop(&frame, CropBox::full(frame.size())).unwrap();
        assert!(matches!(cropped, Cow::Borrowed(_)));
    }

    #[test]
    fn test_crop_outside_bounds_is_geometry_error() {
        let frame = gradient(4, 4, 1);

        assert!(matches!(
            crop(&frame, CropBox::new(2, 0, 3, 4)),
            Err(AugmentError::GeometryError { frame_width: 4, .. })
        ));
        assert!(crop(&frame, CropBox::new(0, 0, 0, 4)).is_err());
        assert!(crop(&frame, CropBox::new(usize::MAX, 0, 2, 2)).is_err());
    }

    #[test]
    fn test_rotate_full_turn_is_noop() {
        let frame = gradient(6, 5, 3);
        assert!(matches!(rotate(&frame, 0).unwrap(), Cow::Borrowed(_)));
        assert_eq!(*rotate(&frame, 360).unwrap(), frame);
        assert_eq!(*rotate(&frame, -720).unwrap(), frame);
    }

    #[test]
    fn test_rotate_half_turn_moves_block_to_opposite_corner() {
        let frame = block(20, 2..=6, 2..=6);
        let rotated = rotate(&frame, 180).unwrap();

        assert_eq!(rotated.size(), frame.size());
        assert!(rotated.pixel(15, 15)[0] > 190);
        assert!(rotated.pixel(4, 4)[0] < 10);
    }

    #[test]
    fn test_rotate_quarter_turn_counter_clockwise() {
        // Block near the top edge ends up near the left edge
        let frame = block(21, 8..=12, 1..=5);
        let rotated = rotate(&frame, 90).unwrap();

        assert!(rotated.pixel(3, 10)[0] > 190);
        assert!(rotated.pixel(17, 10)[0] < 10);
        assert!(rotated.pixel(10, 3)[0] < 10);
    }

    #[test]
    fn test_rotate_fills_corners_black() {
        let frame = Frame::new(8, 8, 3, vec![200; 8 * 8 * 3]).unwrap();
        let rotated = rotate(&frame, 45).unwrap();

        assert_eq!(rotated.size(), frame.size());
        assert_eq!(rotated.channels(), 3);
        assert_eq!(rotated.pixel(0, 0), &[0, 0, 0]);
        assert!(rotated.pixel(4, 4).iter().all(|&v| v > 190));
    }

    #[test]
    fn test_resize_same_size_borrows() {
        let frame = gradient(7, 3, 3);
        let resized = resize(&frame, frame.size()).unwrap();
        assert!(matches!(resized, Cow::Borrowed(_)));
    }

    #[test]
    fn test_resize_area_averages_blocks() {
        #[rustfmt::skip]
        let data = vec![
            0, 0, 100, 100,
            0, 0, 100, 100,
            200, 200, 40, 40,
            200, 200, 40, 40,
        ];
        let frame = Frame::new(4, 4, 1, data).unwrap();
        let resized = resize(&frame, Size::new(2, 2)).unwrap();

        assert_eq!(resized.data(), &[0, 100, 200, 40]);
    }

    #[test]
    fn test_resize_area_fractional_coverage() {
        let frame = Frame::new(3, 1, 1, vec![0, 90, 180]).unwrap();
        let resized = resize(&frame, Size::new(2, 1)).unwrap();

        // Each output covers 1.5 source pixels
        assert_eq!(resized.data(), &[30, 150]);
    }

    #[test]
    fn test_resize_linear_keeps_corners() {
        let frame = Frame::new(2, 2, 1, vec![10, 20, 30, 40]).unwrap();
        let resized = resize(&frame, Size::new(4, 4)).unwrap();

        assert_eq!(resized.size(), Size::new(4, 4));
        assert_eq!(resized.pixel(0, 0), &[10]);
        assert_eq!(resized.pixel(3, 0), &[20]);
        assert_eq!(resized.pixel(0, 3), &[30]);
        assert_eq!(resized.pixel(3, 3), &[40]);
    }

    #[test]
    fn test_resize_hits_exact_output_size() {
        let frame = gradient(13, 7, 3);
        for size in [Size::new(1, 1), Size::new(5, 20), Size::new(40, 3), Size::new(13, 8)] {
            assert_eq!(resize(&frame, size).unwrap().size(), size);
        }
    }

    #[test]
    fn test_resize_constant_frame_stays_constant() {
        let frame = Frame::new(9, 5, 3, vec![77; 9 * 5 * 3]).unwrap();
        let shrunk = resize(&frame, Size::new(4, 3)).unwrap();
        let grown = resize(&frame, Size::new(20, 11)).unwrap();

        assert!(shrunk.data().iter().all(|&v| v == 77));
        assert!(grown.data().iter().all(|&v| v == 77));
    }

    #[test]
    fn test_flip_horizontal() {
        let mut frame = Frame::new(3, 1, 3, vec![1, 2, 3, 4, 5, 6, 7, 8, 9]).unwrap();
        flip_horizontal(&mut frame).unwrap();
        assert_eq!(frame.data(), &[7, 8, 9, 4, 5, 6, 1, 2, 3]);
    }

    #[test]
    fn test_flip_horizontal_gray() {
        let mut frame = Frame::new(4, 2, 1, vec![1, 2, 3, 4, 5, 6, 7, 8]).unwrap();
        flip_horizontal(&mut frame).unwrap();
        assert_eq!(frame.data(), &[4, 3, 2, 1, 8, 7, 6, 5]);
    }
}
