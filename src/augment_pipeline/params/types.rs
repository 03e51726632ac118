//! Geometry and parameter types

/// Width and height in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Size {
    pub width: usize,
    pub height: usize,
}

impl Size {
    pub const fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    pub fn area(&self) -> usize {
        self.width * self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Axis-aligned rectangle in source pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CropBox {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

impl CropBox {
    pub const fn new(x: usize, y: usize, width: usize, height: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Box covering the whole of `size`.
    pub const fn full(size: Size) -> Self {
        Self::new(0, 0, size.width, size.height)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// True when the box is non-empty and lies entirely inside `bounds`.
    pub fn fits_within(&self, bounds: Size) -> bool {
        self.width > 0
            && self.height > 0
            && self
                .x
                .checked_add(self.width)
                .is_some_and(|right| right <= bounds.width)
            && self
                .y
                .checked_add(self.height)
                .is_some_and(|bottom| bottom <= bounds.height)
    }
}

/// One concrete draw of augmentation parameters for one decoded image.
#[derive(Debug, Clone, PartialEq)]
pub struct AugmentParams {
    /// Region of the source frame to keep
    pub crop_box: CropBox,
    /// Final raster size after resize
    pub output_size: Size,
    /// Counter-clockwise rotation in degrees, applied before resize
    pub angle: i32,
    /// Horizontal mirror
    pub flip: bool,
    /// PCA lighting coefficients, one per principal component
    pub lighting: [f32; 3],
    /// Lighting strength; zero disables lighting
    pub color_noise_std: f32,
    /// Contrast factor, brightness offset (fraction of full scale), saturation factor
    pub photometric: [f32; 3],
}

impl AugmentParams {
    pub const IDENTITY_PHOTOMETRIC: [f32; 3] = [1.0, 0.0, 1.0];

    /// Parameters that leave `size` frames untouched.
    pub fn identity(size: Size) -> Self {
        Self {
            crop_box: CropBox::full(size),
            output_size: size,
            angle: 0,
            flip: false,
            lighting: [0.0; 3],
            color_noise_std: 0.0,
            photometric: Self::IDENTITY_PHOTOMETRIC,
        }
    }
}
