//! Derivative-of-Gaussian convolution masks.

use crate::config::CannyConfig;
use crate::error::Result;

/// Square, odd-sized convolution mask stored row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct Kernel {
    dim: usize,
    data: Vec<f32>,
}

impl Kernel {
    /// Side length.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Index of the centre row and column.
    pub fn center(&self) -> usize {
        self.dim / 2
    }

    /// Weight at `(row, col)`, both in `0..dim`.
    pub fn get(&self, row: usize, col: usize) -> f32 {
        self.data[row * self.dim + col]
    }

    /// Weight at signed offset `(p, q)` from the centre.
    pub fn at_offset(&self, p: isize, q: isize) -> f32 {
        let cent = self.center() as isize;
        self.get((p + cent) as usize, (q + cent) as usize)
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }
}

/// The two masks of one run: `x` differentiates along columns, `y` along rows.
#[derive(Debug, Clone, PartialEq)]
pub struct KernelPair {
    pub x: Kernel,
    pub y: Kernel,
}

/// Builds both first-derivative-of-Gaussian masks for `config.sigma`.
///
/// For offsets `(p, q)` from the centre, with `g = exp(-(p² + q²) / 2σ²)`:
///
/// ```text
/// x[p][q] = q * g
/// y[p][q] = p * g
/// ```
///
/// No normalisation is applied.
///
/// # Examples
///
/// ```rust
/// use canny_edge::{derivative_of_gaussian, CannyConfig};
///
/// let masks = derivative_of_gaussian(&CannyConfig::new(50.0, 1.0).unwrap()).unwrap();
/// assert_eq!(masks.x.dim(), 7);
/// assert_eq!(masks.x.at_offset(0, 0), 0.0);
/// assert!(masks.x.at_offset(0, 1) > 0.0);
/// ```
pub fn derivative_of_gaussian(config: &CannyConfig) -> Result<KernelPair> {
    config.validate()?;

    let sigma = config.sigma;
    let dim = config.kernel_dim();
    let cent = (dim / 2) as isize;
    let denominator = 2.0 * sigma * sigma;

    let mut x = Vec::with_capacity(dim * dim);
    let mut y = Vec::with_capacity(dim * dim);
    for p in -cent..=cent {
        for q in -cent..=cent {
            let falloff = (-((p * p + q * q) as f32) / denominator).exp();
            x.push(q as f32 * falloff);
            y.push(p as f32 * falloff);
        }
    }

    debug!("derivative masks ok, dim:{dim}");

    Ok(KernelPair {
        x: Kernel { dim, data: x },
        y: Kernel { dim, data: y },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CannyError;

    fn masks(sigma: f32) -> KernelPair {
        derivative_of_gaussian(&CannyConfig::new(50.0, sigma).unwrap()).unwrap()
    }

    #[test]
    fn test_dimension_and_zero_center() {
        for sigma in 1..5 {
            let pair = masks(sigma as f32);
            let dim = 6 * sigma + 1;
            assert_eq!(pair.x.dim(), dim);
            assert_eq!(pair.y.dim(), dim);
            assert_eq!(pair.x.as_slice().len(), dim * dim);
            let c = pair.x.center();
            assert_eq!(pair.x.get(c, c), 0.0);
            assert_eq!(pair.y.get(c, c), 0.0);
        }
    }

    #[test]
    fn test_odd_symmetry() {
        let pair = masks(2.0);
        let cent = pair.x.center() as isize;
        for p in -cent..=cent {
            for q in -cent..=cent {
                assert_eq!(pair.x.at_offset(p, q), -pair.x.at_offset(-p, -q));
                assert_eq!(pair.y.at_offset(p, q), -pair.y.at_offset(-p, -q));
            }
        }
    }

    #[test]
    fn test_masks_are_transposes() {
        let pair = masks(1.0);
        let dim = pair.x.dim();
        for r in 0..dim {
            for c in 0..dim {
                assert_eq!(pair.x.get(r, c), pair.y.get(c, r));
            }
        }
    }

    #[test]
    fn test_unnormalised_values() {
        let pair = masks(1.0);
        let expected = (-0.5f32).exp();
        assert!((pair.x.at_offset(0, 1) - expected).abs() < 1e-6);
        assert!((pair.y.at_offset(-1, 0) + expected).abs() < 1e-6);
        assert_eq!(pair.x.at_offset(3, 0), 0.0);
    }

    #[test]
    fn test_huge_sigma_fails_without_allocating() {
        let config = CannyConfig {
            sigma: 1.0e9,
            high_threshold: 50.0,
        };
        assert_eq!(
            derivative_of_gaussian(&config),
            Err(CannyError::InvalidSigma(1.0e9))
        );
    }

    #[test]
    fn test_invalid_sigma_fails() {
        let config = CannyConfig {
            sigma: 0.0,
            high_threshold: 50.0,
        };
        assert_eq!(
            derivative_of_gaussian(&config),
            Err(CannyError::InvalidSigma(0.0))
        );
    }
}
