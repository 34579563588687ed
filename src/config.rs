//! Per-run parameters.
//!
//! A [`CannyConfig`] is passed explicitly into every stage; nothing about a
//! run (smoothing, thresholds, grid dimensions) lives in shared state.

use crate::error::{CannyError, Result};

/// Ratio between the derived low threshold and the caller's high threshold.
pub const LOW_THRESHOLD_RATIO: f32 = 0.35;

/// Parameters of one edge detection run.
///
/// # Examples
///
/// ```rust
/// use canny_edge::CannyConfig;
///
/// let config = CannyConfig::new(50.0, 1.0).unwrap();
/// assert_eq!(config.low_threshold(), 17.5);
/// assert_eq!(config.kernel_dim(), 7);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CannyConfig {
    /// Standard deviation of the Gaussian whose first derivative forms the masks.
    pub sigma: f32,
    /// Magnitude at or above which a peak is accepted outright.
    pub high_threshold: f32,
}

impl Default for CannyConfig {
    fn default() -> Self {
        Self {
            sigma: 1.0,
            high_threshold: 50.0,
        }
    }
}

impl CannyConfig {
    /// Builds a validated configuration.
    pub fn new(high_threshold: f32, sigma: f32) -> Result<Self> {
        let config = Self {
            sigma,
            high_threshold,
        };
        config.validate()?;
        Ok(config)
    }

    /// Checks both parameters; called by every pipeline entry point before
    /// any grid is allocated.
    pub fn validate(&self) -> Result<()> {
        if !self.sigma.is_finite() || self.sigma <= 0.0 {
            return Err(CannyError::InvalidSigma(self.sigma));
        }
        // The mask must have an addressable cell count.
        let cells = self
            .checked_kernel_dim()
            .and_then(|dim| dim.checked_mul(dim));
        if cells.is_none() {
            return Err(CannyError::InvalidSigma(self.sigma));
        }
        if !self.high_threshold.is_finite() || self.high_threshold <= 0.0 {
            return Err(CannyError::InvalidThreshold(self.high_threshold));
        }
        Ok(())
    }

    /// Lower hysteresis bound, always `LOW_THRESHOLD_RATIO * high_threshold`.
    pub fn low_threshold(&self) -> f32 {
        LOW_THRESHOLD_RATIO * self.high_threshold
    }

    /// Side length of the square derivative masks.
    ///
    /// `6σ + 1` for integral σ. Fractional σ rounds the half-width `3σ` down so
    /// the mask always has a well-defined centre cell.
    pub fn kernel_dim(&self) -> usize {
        self.checked_kernel_dim().unwrap_or(usize::MAX)
    }

    fn checked_kernel_dim(&self) -> Option<usize> {
        let half = (3.0 * f64::from(self.sigma)).floor();
        if half >= usize::MAX as f64 {
            return None;
        }
        (half as usize).checked_mul(2)?.checked_add(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_low_threshold_is_derived() {
        let config = CannyConfig::new(100.0, 2.0).unwrap();
        assert!((config.low_threshold() - 35.0).abs() < 1e-4);
        assert!(config.low_threshold() < config.high_threshold);
    }

    #[test]
    fn test_kernel_dim_matches_six_sigma_plus_one() {
        for sigma in 1..6 {
            let config = CannyConfig::new(50.0, sigma as f32).unwrap();
            assert_eq!(config.kernel_dim(), 6 * sigma + 1);
        }
    }

    #[test]
    fn test_fractional_sigma_keeps_odd_dim() {
        let config = CannyConfig::new(50.0, 0.5).unwrap();
        assert_eq!(config.kernel_dim(), 3);
        let config = CannyConfig::new(50.0, 1.4).unwrap();
        assert_eq!(config.kernel_dim(), 9);
    }

    #[test]
    fn test_rejects_non_positive_sigma() {
        assert_eq!(
            CannyConfig::new(50.0, 0.0),
            Err(CannyError::InvalidSigma(0.0))
        );
        assert_eq!(
            CannyConfig::new(50.0, -1.0),
            Err(CannyError::InvalidSigma(-1.0))
        );
        assert!(CannyConfig::new(50.0, f32::NAN).is_err());
    }

    #[test]
    fn test_rejects_sigma_with_unaddressable_mask() {
        assert_eq!(
            CannyConfig::new(50.0, 1.0e9),
            Err(CannyError::InvalidSigma(1.0e9))
        );
        assert!(CannyConfig::new(50.0, f32::MAX).is_err());
        assert!(CannyConfig::new(50.0, 1000.0).is_ok());
    }

    #[test]
    fn test_rejects_non_positive_threshold() {
        assert_eq!(
            CannyConfig::new(0.0, 1.0),
            Err(CannyError::InvalidThreshold(0.0))
        );
        assert!(CannyConfig::new(f32::INFINITY, 1.0).is_err());
    }

    #[test]
    fn test_default_is_valid() {
        assert!(CannyConfig::default().validate().is_ok());
    }
}
