//! Non-maximum suppression.
//!
//! Every interior pixel's gradient slope `gy / gx` picks one of four sector
//! axes; the pixel survives as a peak only if its magnitude is strictly
//! greater than both neighbours on that axis. The border frame is never
//! scanned, so neighbour reads stay in bounds.

use std::collections::HashSet;

use image::Luma;
use rayon::prelude::*;

use crate::gradient::GradientField;
use crate::grid::{sample, zeros, Grid};

/// Stand-in for a zero horizontal gradient so the slope stays finite.
pub const GX_EPSILON: f32 = 0.0001;

/// tan(22.5°)
pub const TAN_22_5: f32 = 0.414_213_57;
/// tan(67.5°)
pub const TAN_67_5: f32 = 2.414_213_6;

/// Pixel coordinate compared and hashed by value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Point {
    pub row: u32,
    pub col: u32,
}

impl Point {
    pub fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }

    /// The 3x3 neighbourhood around this point, itself included, clipped to
    /// a `width x height` grid.
    pub fn neighborhood(self, width: u32, height: u32) -> impl Iterator<Item = Point> {
        let rows = self.row.saturating_sub(1)..=(self.row + 1).min(height.saturating_sub(1));
        let cols = self.col.saturating_sub(1)..=(self.col + 1).min(width.saturating_sub(1));
        rows.flat_map(move |row| cols.clone().map(move |col| Point { row, col }))
    }
}

/// Neighbour pair a peak is compared against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectorAxis {
    /// `(i, j-1)` and `(i, j+1)`
    Horizontal,
    /// `(i-1, j-1)` and `(i+1, j+1)`
    Diagonal,
    /// `(i+1, j-1)` and `(i-1, j+1)`
    AntiDiagonal,
    /// `(i-1, j)` and `(i+1, j)`
    Vertical,
}

impl SectorAxis {
    /// Sector for a gradient slope `gy / gx`.
    pub fn from_slope(slope: f32) -> Self {
        if slope <= TAN_22_5 && slope > -TAN_22_5 {
            Self::Horizontal
        } else if slope <= TAN_67_5 && slope > TAN_22_5 {
            Self::Diagonal
        } else if slope <= -TAN_22_5 && slope > -TAN_67_5 {
            Self::AntiDiagonal
        } else {
            Self::Vertical
        }
    }

    /// The two neighbours of an interior point `(i, j)` along this axis.
    pub fn neighbors(self, p: Point) -> (Point, Point) {
        let Point { row: i, col: j } = p;
        match self {
            Self::Horizontal => (Point::new(i, j - 1), Point::new(i, j + 1)),
            Self::Diagonal => (Point::new(i - 1, j - 1), Point::new(i + 1, j + 1)),
            Self::AntiDiagonal => (Point::new(i + 1, j - 1), Point::new(i - 1, j + 1)),
            Self::Vertical => (Point::new(i - 1, j), Point::new(i + 1, j)),
        }
    }
}

/// Surviving peaks in row-major scan order plus a membership index.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PeakSet {
    points: Vec<Point>,
    members: HashSet<Point>,
}

impl PeakSet {
    /// Builds a set from points in the order given. Repeated points keep
    /// their first position.
    pub fn from_points<I: IntoIterator<Item = Point>>(points: I) -> Self {
        let mut set = Self::default();
        for p in points {
            if set.members.insert(p) {
                set.points.push(p);
            }
        }
        set
    }

    pub fn contains(&self, p: &Point) -> bool {
        self.members.contains(p)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Peaks in the order they were found.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Point> {
        self.points.iter()
    }

    /// Sparse indicator grid: 255 at every peak, 0 elsewhere.
    pub fn indicator(&self, width: u32, height: u32) -> Grid {
        let mut out = zeros(width, height);
        for p in &self.points {
            if p.col < width && p.row < height {
                out.put_pixel(p.col, p.row, Luma([255.0]));
            }
        }
        out
    }
}

impl<'a> IntoIterator for &'a PeakSet {
    type Item = &'a Point;
    type IntoIter = std::slice::Iter<'a, Point>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

/// Runs non-maximum suppression over a gradient field.
///
/// Rows are scanned in parallel and merged back in row order, so the result
/// is identical to a sequential row-major scan.
///
/// # Examples
///
/// ```rust
/// use canny_edge::{detect_peaks, gradient_field, derivative_of_gaussian, CannyConfig, Grid, Point};
/// use image::Luma;
///
/// let pic = Grid::from_fn(5, 5, |x, _| Luma([if x > 2 { 255.0 } else { 0.0 }]));
/// let field = gradient_field(&pic, &derivative_of_gaussian(&CannyConfig::default()).unwrap());
/// let peaks = detect_peaks(&field);
/// assert!(peaks.contains(&Point::new(2, 2)));
/// ```
pub fn detect_peaks(field: &GradientField) -> PeakSet {
    let (width, height) = field.magnitude.dimensions();
    if width < 3 || height < 3 {
        return PeakSet::default();
    }

    let rows: Vec<Vec<Point>> = (1..height - 1)
        .into_par_iter()
        .map(|i| {
            (1..width - 1)
                .map(|j| Point::new(i, j))
                .filter(|p| is_peak(field, *p))
                .collect()
        })
        .collect();

    let peaks = PeakSet::from_points(rows.into_iter().flatten());

    debug!("peaks len:{}", peaks.len());

    peaks
}

/// Sector axis chosen for interior point `p`.
pub fn sector_at(field: &GradientField, p: Point) -> SectorAxis {
    let mut gx = sample(&field.gx, p.row, p.col);
    if gx == 0.0 {
        gx = GX_EPSILON;
    }
    let gy = sample(&field.gy, p.row, p.col);
    SectorAxis::from_slope(gy / gx)
}

fn is_peak(field: &GradientField, p: Point) -> bool {
    let mag = &field.magnitude;
    let (a, b) = sector_at(field, p).neighbors(p);
    let m = sample(mag, p.row, p.col);
    m > sample(mag, a.row, a.col) && m > sample(mag, b.row, b.col)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::grid_from_samples;

    fn field(mag: Vec<f32>, gx: Vec<f32>, gy: Vec<f32>, w: u32, h: u32) -> GradientField {
        GradientField {
            gx: grid_from_samples(w, h, gx).unwrap(),
            gy: grid_from_samples(w, h, gy).unwrap(),
            magnitude: grid_from_samples(w, h, mag).unwrap(),
        }
    }

    #[test]
    fn test_point_value_identity() {
        let mut set = HashSet::new();
        set.insert(Point::new(3, 4));
        assert!(set.contains(&Point::new(3, 4)));
        assert!(!set.contains(&Point::new(4, 3)));
    }

    #[test]
    fn test_sector_boundaries() {
        assert_eq!(SectorAxis::from_slope(0.0), SectorAxis::Horizontal);
        assert_eq!(SectorAxis::from_slope(TAN_22_5), SectorAxis::Horizontal);
        assert_eq!(SectorAxis::from_slope(-TAN_22_5), SectorAxis::AntiDiagonal);
        assert_eq!(SectorAxis::from_slope(1.0), SectorAxis::Diagonal);
        assert_eq!(SectorAxis::from_slope(TAN_67_5), SectorAxis::Diagonal);
        assert_eq!(SectorAxis::from_slope(-1.0), SectorAxis::AntiDiagonal);
        assert_eq!(SectorAxis::from_slope(-TAN_67_5), SectorAxis::Vertical);
        assert_eq!(SectorAxis::from_slope(5.0), SectorAxis::Vertical);
        assert_eq!(SectorAxis::from_slope(-5.0), SectorAxis::Vertical);
    }

    #[test]
    fn test_zero_gx_uses_epsilon() {
        // gx == 0 with a positive gy yields a huge slope: vertical axis.
        let f = field(vec![0.0; 9], vec![0.0; 9], vec![1.0; 9], 3, 3);
        assert_eq!(sector_at(&f, Point::new(1, 1)), SectorAxis::Vertical);
        // gx == 0 and gy == 0 stay horizontal.
        let f = field(vec![0.0; 9], vec![0.0; 9], vec![0.0; 9], 3, 3);
        assert_eq!(sector_at(&f, Point::new(1, 1)), SectorAxis::Horizontal);
    }

    #[test]
    fn test_peak_requires_strict_maximum() {
        #[rustfmt::skip]
        let mag = vec![
            0.0, 0.0, 0.0, 0.0,
            5.0, 9.0, 9.0, 5.0,
            0.0, 0.0, 0.0, 0.0,
        ];
        let f = field(mag, vec![1.0; 12], vec![0.0; 12], 4, 3);
        let peaks = detect_peaks(&f);
        assert!(peaks.is_empty());
    }

    #[test]
    fn test_diagonal_sectors_use_their_neighbours() {
        #[rustfmt::skip]
        let mag = vec![
            1.0, 0.0, 9.0,
            0.0, 5.0, 0.0,
            9.0, 0.0, 1.0,
        ];
        // slope 1: compares (0,0) and (2,2)
        let f = field(mag.clone(), vec![1.0; 9], vec![1.0; 9], 3, 3);
        assert_eq!(detect_peaks(&f).points(), &[Point::new(1, 1)]);
        // slope -1: compares (2,0) and (0,2)
        let f = field(mag, vec![1.0; 9], vec![-1.0; 9], 3, 3);
        assert!(detect_peaks(&f).is_empty());
    }

    #[test]
    fn test_border_never_peaks_and_order_is_row_major() {
        let w = 8;
        let h = 6;
        let mut mag = vec![0.0; (w * h) as usize];
        // isolated bumps, including on the border
        for (r, c) in [(0, 3), (1, 1), (1, 5), (3, 2), (4, 6), (5, 5), (2, 7)] {
            mag[(r * w + c) as usize] = 10.0;
        }
        let f = field(mag, vec![1.0; 48], vec![0.0; 48], w, h);
        let peaks = detect_peaks(&f);
        assert_eq!(
            peaks.points(),
            &[
                Point::new(1, 1),
                Point::new(1, 5),
                Point::new(3, 2),
                Point::new(4, 6)
            ]
        );
        for p in &peaks {
            assert!(p.row > 0 && p.row < h - 1 && p.col > 0 && p.col < w - 1);
        }
        assert_eq!(detect_peaks(&f), peaks);
    }

    #[test]
    fn test_tiny_grids_have_no_peaks() {
        let f = field(vec![1.0; 4], vec![1.0; 4], vec![0.0; 4], 2, 2);
        assert!(detect_peaks(&f).is_empty());
    }

    #[test]
    fn test_indicator_marks_each_peak_once() {
        let peaks = PeakSet::from_points([Point::new(1, 1), Point::new(2, 3), Point::new(1, 1)]);
        assert_eq!(peaks.len(), 2);
        let grid = peaks.indicator(5, 4);
        assert_eq!(grid.iter().filter(|v| **v == 255.0).count(), 2);
        assert_eq!(grid.get_pixel(3, 2)[0], 255.0);
    }

    #[test]
    fn test_neighborhood_is_clipped() {
        let corner: Vec<Point> = Point::new(0, 0).neighborhood(4, 4).collect();
        assert_eq!(corner.len(), 4);
        let inner: Vec<Point> = Point::new(2, 2).neighborhood(4, 4).collect();
        assert_eq!(inner.len(), 9);
    }
}
