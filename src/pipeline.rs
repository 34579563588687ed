//! End-to-end runs and their outputs.

use image::{buffer::ConvertBuffer, GrayImage, Luma, Rgb, RgbImage};
use imageproc::definitions::{HasBlack, HasWhite};
use rayon::prelude::*;

use crate::config::CannyConfig;
use crate::error::Result;
use crate::gradient::gradient_field;
use crate::grid::{grid_from_luma, grid_to_luma, Grid};
use crate::hysteresis::{hysteresis, ACCEPTED};
use crate::kernel::derivative_of_gaussian;
use crate::peaks::{detect_peaks, PeakSet, Point};

/// Everything one run produces.
#[derive(Debug, Clone)]
pub struct EdgeMap {
    /// Gradient magnitude rescaled to `[0, 255]`.
    pub magnitude: Grid,
    /// Non-maximum suppression survivors in row-major order.
    pub peaks: PeakSet,
    /// Binary edge grid, 0 or 255.
    pub edges: Grid,
    /// Column-derivative response.
    pub gx: Grid,
    /// Row-derivative response.
    pub gy: Grid,
}

impl EdgeMap {
    pub fn dimensions(&self) -> (u32, u32) {
        self.edges.dimensions()
    }

    /// Normalised magnitude as an 8-bit image.
    pub fn magnitude_image(&self) -> GrayImage {
        grid_to_luma(&self.magnitude)
    }

    /// White at every peak, black elsewhere.
    pub fn peak_image(&self) -> GrayImage {
        let (width, height) = self.dimensions();
        grid_to_luma(&self.peaks.indicator(width, height))
    }

    /// The final binary edge grid as an 8-bit image.
    pub fn edge_image(&self) -> GrayImage {
        let (width, height) = self.dimensions();
        GrayImage::from_fn(width, height, |x, y| {
            if self.edges.get_pixel(x, y)[0] == ACCEPTED {
                Luma::<u8>::white()
            } else {
                Luma::<u8>::black()
            }
        })
    }

    /// Accepted pixels in row-major order.
    pub fn edge_points(&self) -> Vec<Point> {
        self.edges
            .enumerate_pixels()
            .filter(|(_, _, v)| v[0] == ACCEPTED)
            .map(|(x, y, _)| Point::new(y, x))
            .collect()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.iter().filter(|v| **v == ACCEPTED).count()
    }
}

/// Runs the full Canny pipeline on one grid.
///
/// # Arguments
///
/// * `pic` - Input samples, typically intensities in `[0, 255]`
/// * `config` - Smoothing `sigma` (typically 1.0-3.0) and `high_threshold`
///   on the rescaled magnitude (typical range: 30.0-120.0)
///
/// # Returns
///
/// An [`EdgeMap`] holding the normalised magnitude, the peak set in
/// row-major order, the binary edge grid and both gradient grids, all the
/// size of `pic`.
///
/// # Errors
///
/// [`CannyError::InvalidSigma`](crate::CannyError::InvalidSigma) or
/// [`CannyError::InvalidThreshold`](crate::CannyError::InvalidThreshold),
/// returned before any grid is allocated.
///
/// # Performance
///
/// Convolution, magnitude and rescale run row- or element-parallel with
/// rayon; peak detection scans rows in parallel and merges them in order.
/// Hysteresis is sequential. Convolution cost grows with `sigma²` per pixel,
/// bounded by the image size.
///
/// # Algorithm Pipeline
///
/// 1. Derivative-of-Gaussian masks from `config.sigma`
/// 2. Truncated convolution into `gx`, `gy` and a magnitude rescaled to 255
/// 3. Four-sector non-maximum suppression
/// 4. Hysteresis with `low = 0.35 * high`
///
/// # Examples
///
/// ```rust
/// use canny_edge::{detect_edges, CannyConfig, Grid, Point};
/// use image::Luma;
///
/// let pic = Grid::from_fn(5, 5, |x, _| Luma([if x > 2 { 255.0 } else { 0.0 }]));
/// let map = detect_edges(&pic, &CannyConfig::new(50.0, 1.0).unwrap()).unwrap();
/// assert!(map.edge_points().contains(&Point::new(2, 2)));
/// ```
pub fn detect_edges(pic: &Grid, config: &CannyConfig) -> Result<EdgeMap> {
    config.validate()?;
    run(pic, config)
}

/// Pipeline body; `config` has already been validated.
fn run(pic: &Grid, config: &CannyConfig) -> Result<EdgeMap> {
    debug!(
        "start canny, {}x{}, sigma:{}, high:{}",
        pic.width(),
        pic.height(),
        config.sigma,
        config.high_threshold
    );

    let masks = derivative_of_gaussian(config)?;
    let field = gradient_field(pic, &masks);
    let peaks = detect_peaks(&field);
    let edges = hysteresis(&field.magnitude, &peaks, config);

    Ok(EdgeMap {
        magnitude: field.magnitude,
        peaks,
        edges,
        gx: field.gx,
        gy: field.gy,
    })
}

/// [`detect_edges`] on a decoded 8-bit grayscale image.
///
/// ```rust,no_run
/// use canny_edge::{detect_edges_luma, CannyConfig};
///
/// let image = image::open("input.png").unwrap().to_luma8();
/// let map = detect_edges_luma(&image, &CannyConfig::new(60.0, 1.0).unwrap()).unwrap();
/// map.edge_image().save("canny_final.png").unwrap();
/// ```
pub fn detect_edges_luma(image: &GrayImage, config: &CannyConfig) -> Result<EdgeMap> {
    config.validate()?;
    run(&grid_from_luma(image), config)
}

/// Runs independent pipelines over many grids in parallel.
///
/// # Arguments
///
/// * `pics` - Input grids; sizes may differ
/// * `config` - Parameters shared by every run
///
/// # Returns
///
/// One result per input, in input order. An invalid `config` yields the
/// same error for every entry.
///
/// # Performance
///
/// Images are distributed over the rayon pool; each run also uses the pool
/// for its own parallel stages. No state is shared between runs.
pub fn detect_edges_batch(pics: &[Grid], config: &CannyConfig) -> Vec<Result<EdgeMap>> {
    pics.par_iter().map(|pic| detect_edges(pic, config)).collect()
}

/// Overlays accepted edge pixels in red on the source image.
///
/// ```rust,no_run
/// use canny_edge::{detect_edges_luma, visualize_edges, CannyConfig};
///
/// let image = image::open("input.png").unwrap().to_luma8();
/// let map = detect_edges_luma(&image, &CannyConfig::default()).unwrap();
/// visualize_edges(&image, &map).save("edges_visualization.png").unwrap();
/// ```
pub fn visualize_edges(image: &GrayImage, map: &EdgeMap) -> RgbImage {
    let mut canvas: RgbImage = image.convert();
    let red = Rgb([255u8, 0, 0]);

    for p in map.edge_points() {
        if p.col < canvas.width() && p.row < canvas.height() {
            canvas.put_pixel(p.col, p.row, red);
        }
    }

    canvas
}
