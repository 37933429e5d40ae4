//! # Trend Math
//!
//! Numeric kernels shared by the monthly forecasting engine.
//! This crate provides least-squares trend fits over an index sequence,
//! trailing window averages, and the Holt / Holt-Winters smoothing
//! recursions.

use thiserror::Error;

pub mod moving_averages;
pub mod regression;
pub mod smoothing;

pub use moving_averages::{simple_mean, trailing_window, weighted_mean};
pub use regression::{LinearFit, QuadraticFit};
pub use smoothing::{DoubleExponentialSmoothing, HoltWinters};

/// Errors that can occur in trend and smoothing calculations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    #[error("Insufficient data for calculation: {0}")]
    InsufficientData(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Calculation error: {0}")]
    CalculationError(String),
}

/// Result type for trend math operations
pub type Result<T> = std::result::Result<T, MathError>;

/// Checks that a smoothing factor lies strictly between 0 and 1
pub(crate) fn check_factor(name: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value <= 0.0 || value >= 1.0 {
        return Err(MathError::InvalidInput(format!(
            "{} must be between 0 and 1 (exclusive), got {}",
            name, value
        )));
    }
    Ok(())
}
