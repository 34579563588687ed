//! Dense real-valued sample grids and conversion to and from 8-bit images.
//!
//! Decoding and encoding image files is left to the caller; this module only
//! moves samples between an [`image::GrayImage`] and the `f32` grid every
//! stage works on.

use image::{GrayImage, ImageBuffer, Luma};
use rayon::prelude::*;

use crate::error::{CannyError, Result};

/// Row-major grid of `f32` samples. The `image` crate addresses it as
/// `(x, y) = (col, row)`.
pub type Grid = imageproc::definitions::Image<Luma<f32>>;

/// Wraps a raw row-major sample buffer.
///
/// # Examples
///
/// ```rust
/// use canny_edge::grid_from_samples;
///
/// let grid = grid_from_samples(3, 2, vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
/// assert_eq!(grid.get_pixel(2, 1)[0], 5.0);
/// assert!(grid_from_samples(3, 3, vec![0.0; 4]).is_err());
/// ```
pub fn grid_from_samples(width: u32, height: u32, samples: Vec<f32>) -> Result<Grid> {
    let expected = width as usize * height as usize;
    let actual = samples.len();
    ImageBuffer::from_raw(width, height, samples)
        .ok_or(CannyError::DimensionMismatch { expected, actual })
}

/// Widens an 8-bit grayscale image into a sample grid.
pub fn grid_from_luma(image: &GrayImage) -> Grid {
    let (width, height) = image.dimensions();
    let samples: Vec<f32> = image.as_raw().par_iter().map(|p| *p as f32).collect();
    Grid::from_raw(width, height, samples).unwrap_or_else(|| Grid::new(width, height))
}

/// Narrows a grid to 8 bits, truncating toward zero and saturating at the
/// ends of `[0, 255]`.
pub fn grid_to_luma(grid: &Grid) -> GrayImage {
    let (width, height) = grid.dimensions();
    let samples: Vec<u8> = grid
        .as_raw()
        .par_iter()
        .map(|v| v.clamp(0.0, 255.0) as u8)
        .collect();
    GrayImage::from_raw(width, height, samples).unwrap_or_else(|| GrayImage::new(width, height))
}

/// Sample at `(row, col)`.
pub(crate) fn sample(grid: &Grid, row: u32, col: u32) -> f32 {
    let Luma([v]) = *grid.get_pixel(col, row);
    v
}

/// Zero-filled grid of the given size.
pub(crate) fn zeros(width: u32, height: u32) -> Grid {
    Grid::from_pixel(width, height, Luma([0.0]))
}
