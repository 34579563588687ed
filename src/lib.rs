//! # Canny Edge Detection Library
//!
//! This crate computes edges in grayscale raster images with the Canny method:
//! derivative-of-Gaussian gradients, non-maximum suppression along the
//! gradient direction, and hysteresis thresholding that links weak edge
//! pixels to strong ones through connected chains.
//!
//! ## Features
//!
//! - Derivative-of-Gaussian masks sized `6σ + 1`
//! - Parallel truncated convolution and magnitude normalisation
//! - Four-sector non-maximum suppression with deterministic scan order
//! - Hysteresis linking with `low = 0.35 * high`
//! - Parallel batch processing of independent images
//! - Optional debug logging (enable with `logger` feature)
//!
//! ## Basic Usage
//!
//! ```rust,no_run
//! use image::open;
//! use canny_edge::{detect_edges_luma, CannyConfig};
//!
//! let image = open("example.png").unwrap().to_luma8();
//! let config = CannyConfig::new(60.0, 1.0).unwrap();
//! let map = detect_edges_luma(&image, &config).unwrap();
//!
//! map.magnitude_image().save("canny_mag.png").unwrap();
//! map.peak_image().save("canny_peaks.png").unwrap();
//! map.edge_image().save("canny_final.png").unwrap();
//!
//! println!("Found {} edge pixels", map.edge_count());
//! ```
//!
//! ## Optional Features
//!
//! ### Logger Feature
//!
//! Enable debug logging to monitor the pipeline:
//!
//! ```toml
//! [dependencies]
//! canny-edge = { version = "0.1.0", features = ["logger"] }
//! log = "0.4"
//! env_logger = "0.11"
//! ```
//!
//! ```rust,no_run
//! use image::open;
//! use canny_edge::{detect_edges_luma, CannyConfig};
//!
//! env_logger::init();
//!
//! let image = open("example.png").unwrap().to_luma8();
//! let map = detect_edges_luma(&image, &CannyConfig::default()).unwrap();
//! // With logger feature, you'll see debug messages like:
//! // DEBUG canny_edge::kernel: derivative masks ok, dim:7
//! // DEBUG canny_edge::peaks: peaks len:1234
//! ```
//!
//! ## Running Stages Separately
//!
//! ```rust
//! use canny_edge::{
//!     derivative_of_gaussian, detect_peaks, gradient_field, hysteresis, CannyConfig, Grid,
//! };
//! use image::Luma;
//!
//! let pic = Grid::from_fn(8, 8, |x, _| Luma([if x > 3 { 255.0 } else { 0.0 }]));
//! let config = CannyConfig::new(50.0, 1.0).unwrap();
//!
//! let masks = derivative_of_gaussian(&config).unwrap();
//! let field = gradient_field(&pic, &masks);
//! let peaks = detect_peaks(&field);
//! let edges = hysteresis(&field.magnitude, &peaks, &config);
//! assert_eq!(edges.dimensions(), (8, 8));
//! ```

// Conditional logging macros
#[cfg(feature = "logger")]
macro_rules! debug {
    ($($arg:tt)*) => {
        log::debug!($($arg)*);
    };
}

#[cfg(not(feature = "logger"))]
macro_rules! debug {
    ($($arg:tt)*) => {};
}

mod config;
mod error;
mod gradient;
mod grid;
mod hysteresis;
mod kernel;
mod peaks;
mod pipeline;

pub use config::{CannyConfig, LOW_THRESHOLD_RATIO};
pub use error::{CannyError, Result};
pub use gradient::{
    convolve_pair, gradient_field, magnitude, normalize_magnitude, GradientField, MAGNITUDE_RANGE,
};
pub use grid::{grid_from_luma, grid_from_samples, grid_to_luma, Grid};
pub use hysteresis::{hysteresis, HysteresisLinker, ACCEPTED, REJECTED};
pub use kernel::{derivative_of_gaussian, Kernel, KernelPair};
pub use peaks::{detect_peaks, sector_at, PeakSet, Point, SectorAxis, GX_EPSILON, TAN_22_5, TAN_67_5};
pub use pipeline::{detect_edges, detect_edges_batch, detect_edges_luma, visualize_edges, EdgeMap};
