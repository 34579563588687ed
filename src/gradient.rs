//! Gradient estimation and magnitude normalisation.

use rayon::prelude::*;

use crate::grid::{zeros, Grid};
use crate::kernel::{Kernel, KernelPair};

/// Value the largest magnitude is rescaled to.
pub const MAGNITUDE_RANGE: f32 = 255.0;

/// Gradient grids of one image, all the size of the input.
#[derive(Debug, Clone)]
pub struct GradientField {
    /// Response to the column-derivative mask.
    pub gx: Grid,
    /// Response to the row-derivative mask.
    pub gy: Grid,
    /// `sqrt(gx² + gy²)`, rescaled so its maximum is [`MAGNITUDE_RANGE`].
    pub magnitude: Grid,
}

/// Convolves `pic` with both masks, then derives the normalised magnitude.
///
/// Window cells falling outside the grid contribute zero. The magnitude pass
/// finishes its global maximum before rescaling; an all-zero magnitude grid
/// is returned unscaled.
///
/// # Examples
///
/// ```rust
/// use canny_edge::{derivative_of_gaussian, gradient_field, grid_from_samples, CannyConfig};
///
/// let pic = grid_from_samples(4, 1, vec![0.0, 0.0, 255.0, 255.0]).unwrap();
/// let masks = derivative_of_gaussian(&CannyConfig::default()).unwrap();
/// let field = gradient_field(&pic, &masks);
///
/// let peak = field.magnitude.iter().cloned().fold(0.0f32, f32::max);
/// assert_eq!(peak, 255.0);
/// ```
pub fn gradient_field(pic: &Grid, masks: &KernelPair) -> GradientField {
    let (gx, gy) = convolve_pair(pic, &masks.x, &masks.y);

    debug!("gx and gy ok");

    let mut magnitude = magnitude(&gx, &gy);
    normalize_magnitude(&mut magnitude);

    GradientField { gx, gy, magnitude }
}

/// Truncated 2-D convolution of `pic` with two equally sized masks at once.
///
/// `out[i][j] = Σ pic[i+p][j+q] · mask[p+cent][q+cent]` over the window,
/// with the window clipped to the grid. Rows are processed in parallel.
pub fn convolve_pair(pic: &Grid, mask_x: &Kernel, mask_y: &Kernel) -> (Grid, Grid) {
    let (width, height) = pic.dimensions();
    let mut gx = zeros(width, height);
    let mut gy = zeros(width, height);
    if width == 0 || height == 0 {
        return (gx, gy);
    }

    let w = width as usize;
    let h = height as isize;
    let cent = mask_x.center() as isize;
    let pixels = pic.as_raw();

    gx.par_chunks_mut(w)
        .zip(gy.par_chunks_mut(w))
        .enumerate()
        .for_each(|(i, (row_x, row_y))| {
            let i = i as isize;
            for j in 0..w as isize {
                let mut sum_x = 0.0;
                let mut sum_y = 0.0;

                let (p_lo, p_hi) = ((-cent).max(-i), cent.min(h - 1 - i));
                let (q_lo, q_hi) = ((-cent).max(-j), cent.min(w as isize - 1 - j));

                for p in p_lo..=p_hi {
                    let r = (i + p) as usize;
                    let src_row = &pixels[r * w..(r + 1) * w];
                    for q in q_lo..=q_hi {
                        let sample = src_row[(j + q) as usize];
                        sum_x += sample * mask_x.at_offset(p, q);
                        sum_y += sample * mask_y.at_offset(p, q);
                    }
                }

                row_x[j as usize] = sum_x;
                row_y[j as usize] = sum_y;
            }
        });

    (gx, gy)
}

/// Per-pixel L2 norm of two gradient grids.
pub fn magnitude(gx: &Grid, gy: &Grid) -> Grid {
    let (width, height) = gx.dimensions();
    let mag: Vec<f32> = gx
        .as_raw()
        .par_iter()
        .zip(gy.as_raw().par_iter())
        .map(|(x, y)| (x * x + y * y).sqrt())
        .collect();
    Grid::from_raw(width, height, mag).unwrap_or_else(|| zeros(width, height))
}

/// Rescales `mag` in place so its maximum becomes [`MAGNITUDE_RANGE`] and
/// returns the maximum found before scaling. Leaves an all-zero grid alone.
pub fn normalize_magnitude(mag: &mut Grid) -> f32 {
    let max_val = mag.as_raw().par_iter().cloned().reduce(|| 0.0, f32::max);
    if max_val > 0.0 {
        mag.par_iter_mut()
            .for_each(|v| *v = *v / max_val * MAGNITUDE_RANGE);
    }
    debug!("magnitude ok, max before rescale:{max_val}");
    max_val
}
