//! Error types for the sales_forecast crate

use crate::models::MethodId;
use thiserror::Error;
use trend_math::MathError;

/// Custom error types for the sales_forecast crate
#[derive(Debug, Error)]
pub enum ForecastError {
    /// Error related to data validation or processing
    #[error("Data error: {0}")]
    DataError(String),

    /// Error from invalid parameters
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// The method cannot produce finite values for this history
    #[error("Method {method} not applicable: {reason}")]
    NotApplicable { method: MethodId, reason: String },

    /// Error from the numeric kernels
    #[error("Math error: {0}")]
    Math(#[from] MathError),

    /// Error from IO operations
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error from CSV parsing
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    /// Error from JSON (de)serialization
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl ForecastError {
    /// Shorthand for a [`ForecastError::NotApplicable`]
    pub fn not_applicable(method: MethodId, reason: impl Into<String>) -> Self {
        ForecastError::NotApplicable {
            method,
            reason: reason.into(),
        }
    }

    /// True when the error only says a method does not fit the data
    pub fn is_not_applicable(&self) -> bool {
        matches!(self, ForecastError::NotApplicable { .. })
    }
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, ForecastError>;
