//! Double thresholding with hysteresis linking.
//!
//! Peaks at or above the high threshold are accepted outright and peaks below
//! the low threshold are rejected. A peak in between is accepted only when an
//! unbroken 8-connected chain of peaks, each at or above the low threshold,
//! joins it to an accepted pixel.

use std::collections::HashSet;

use image::Luma;

use crate::config::CannyConfig;
use crate::grid::{sample, Grid};
use crate::peaks::{PeakSet, Point};

/// Final value of an accepted pixel.
pub const ACCEPTED: f32 = 255.0;
/// Final value of a rejected pixel.
pub const REJECTED: f32 = 0.0;

/// One linking run over one image.
///
/// The visited set lives as long as the linker, so a pixel resolved while
/// linking one peak is never re-examined from another.
pub struct HysteresisLinker<'a> {
    magnitude: &'a Grid,
    peaks: &'a PeakSet,
    high: f32,
    low: f32,
    visited: HashSet<Point>,
    edges: Grid,
}

impl<'a> HysteresisLinker<'a> {
    pub fn new(magnitude: &'a Grid, peaks: &'a PeakSet, config: &CannyConfig) -> Self {
        let (width, height) = magnitude.dimensions();
        Self {
            magnitude,
            peaks,
            high: config.high_threshold,
            low: config.low_threshold(),
            visited: HashSet::with_capacity(peaks.len()),
            edges: Grid::from_pixel(width, height, Luma([REJECTED])),
        }
    }

    /// Classifies every peak in peak-set order and returns the binary edge
    /// grid.
    pub fn run(mut self) -> Grid {
        let peaks = self.peaks;
        for &p in peaks.iter() {
            let m = self.mag(p);
            if m >= self.high {
                self.accept(p);
                self.link(p, true);
            } else if m >= self.low {
                self.link(p, false);
            }
        }

        debug!(
            "hysteresis ok, accepted:{}",
            self.edges.iter().filter(|v| **v == ACCEPTED).count()
        );

        self.edges
    }

    /// Resolves the chain of qualifying peaks that contains `start`.
    ///
    /// Stops at once when `start` is out of bounds, below the low threshold
    /// or already visited. Otherwise the whole chain is walked depth-first
    /// with an explicit stack, every member is marked visited, and the chain
    /// is accepted if `anchored` is set or any member touches an accepted
    /// pixel or reaches the high threshold. An unanchored chain stays
    /// rejected.
    fn link(&mut self, start: Point, anchored: bool) {
        let (width, height) = self.edges.dimensions();
        if start.row >= height || start.col >= width {
            return;
        }
        if self.mag(start) < self.low || !self.visited.insert(start) {
            return;
        }

        let mut anchored = anchored;
        let mut stack = vec![start];
        let mut chain = Vec::new();

        while let Some(p) = stack.pop() {
            chain.push(p);
            if self.mag(p) >= self.high {
                anchored = true;
            }

            for n in p.neighborhood(width, height) {
                if n == p {
                    continue;
                }
                if !anchored && self.is_accepted(n) {
                    anchored = true;
                }
                if self.peaks.contains(&n) && self.mag(n) >= self.low && self.visited.insert(n) {
                    stack.push(n);
                }
            }
        }

        if anchored {
            for p in chain {
                self.accept(p);
            }
        }
    }

    fn mag(&self, p: Point) -> f32 {
        sample(self.magnitude, p.row, p.col)
    }

    fn is_accepted(&self, p: Point) -> bool {
        sample(&self.edges, p.row, p.col) == ACCEPTED
    }

    fn accept(&mut self, p: Point) {
        self.edges.put_pixel(p.col, p.row, Luma([ACCEPTED]));
    }
}

/// Runs hysteresis thresholding with a fresh visited set.
///
/// Returns a grid of [`ACCEPTED`] / [`REJECTED`] values the size of
/// `magnitude`. The result depends only on the peak set's membership, not on
/// its order.
///
/// # Examples
///
/// ```rust
/// use canny_edge::{hysteresis, CannyConfig, Grid, PeakSet, Point};
/// use image::Luma;
///
/// let mut mag = Grid::new(5, 3);
/// mag.put_pixel(1, 1, Luma([80.0]));
/// mag.put_pixel(2, 1, Luma([30.0]));
/// mag.put_pixel(3, 1, Luma([30.0]));
/// let peaks = PeakSet::from_points([Point::new(1, 1), Point::new(1, 2), Point::new(1, 3)]);
///
/// let edges = hysteresis(&mag, &peaks, &CannyConfig::new(50.0, 1.0).unwrap());
/// assert!(edges.iter().filter(|v| **v == 255.0).count() == 3);
/// ```
pub fn hysteresis(magnitude: &Grid, peaks: &PeakSet, config: &CannyConfig) -> Grid {
    HysteresisLinker::new(magnitude, peaks, config).run()
}
