//! Tunable constants for forecasting and analytics
//!
//! The defaults reproduce the fixed constants of every method; a JSON
//! document only needs to name the fields it overrides.

use crate::calendar::YearMonth;
use crate::error::{ForecastError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Smoothing factors shared by the exponential smoothing methods
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmoothingParams {
    /// Level smoothing
    pub alpha: f64,
    /// Trend smoothing
    pub beta: f64,
    /// Seasonal smoothing
    pub gamma: f64,
}

impl Default for SmoothingParams {
    fn default() -> Self {
        Self {
            alpha: 0.3,
            beta: 0.1,
            gamma: 0.2,
        }
    }
}

/// Configuration of the forecasting methods
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastConfig {
    pub smoothing: SmoothingParams,
    /// Longest trailing window used by the moving-average methods
    pub moving_average_window: usize,
    /// Holt-Winters period, also its minimum history
    pub season_length: usize,
    /// Number of lags in the autoregressive method
    pub ar_order: usize,
    /// Most months a single forecast may produce
    pub max_horizon: usize,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            smoothing: SmoothingParams::default(),
            moving_average_window: 6,
            season_length: 12,
            ar_order: 3,
            max_horizon: 24,
        }
    }
}

impl ForecastConfig {
    /// Parse and validate a JSON document
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_json_str(&fs::read_to_string(path)?)
    }

    pub fn validate(&self) -> Result<()> {
        let SmoothingParams { alpha, beta, gamma } = self.smoothing;
        for (name, value) in [("alpha", alpha), ("beta", beta), ("gamma", gamma)] {
            if !value.is_finite() || value <= 0.0 || value >= 1.0 {
                return Err(ForecastError::InvalidParameter(format!(
                    "{} must be between 0 and 1 (exclusive), got {}",
                    name, value
                )));
            }
        }

        if self.moving_average_window == 0 {
            return Err(ForecastError::InvalidParameter(
                "Moving average window must be positive".to_string(),
            ));
        }
        if self.season_length < 2 {
            return Err(ForecastError::InvalidParameter(format!(
                "Season length must be at least 2, got {}",
                self.season_length
            )));
        }
        if self.ar_order == 0 {
            return Err(ForecastError::InvalidParameter(
                "AR order must be positive".to_string(),
            ));
        }
        if self.max_horizon == 0 {
            return Err(ForecastError::InvalidParameter(
                "Maximum horizon must be positive".to_string(),
            ));
        }

        Ok(())
    }
}

/// Configuration of the analytics summaries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    /// Only this year's historical months count towards seasonal totals
    pub reference_year: i32,
    /// Months known to be anomalous, ignored by the min/max search.
    ///
    /// The anomalous pair depends on the data set, so the caller supplies
    /// it; by default nothing is excluded.
    pub excluded_months: Vec<YearMonth>,
    /// Smallest absolute price change, in percent, that counts towards correlation
    pub correlation_threshold: f64,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            reference_year: 2024,
            excluded_months: Vec::new(),
            correlation_threshold: 0.5,
        }
    }
}

impl AnalyticsConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_json_str(&fs::read_to_string(path)?)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.correlation_threshold.is_finite() || self.correlation_threshold < 0.0 {
            return Err(ForecastError::InvalidParameter(format!(
                "Correlation threshold must be a non-negative number, got {}",
                self.correlation_threshold
            )));
        }
        Ok(())
    }

    /// True when `period` is one of the excluded months
    pub fn is_excluded(&self, period: &YearMonth) -> bool {
        self.excluded_months.contains(period)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = ForecastConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.smoothing.alpha, 0.3);
        assert_eq!(config.moving_average_window, 6);
        assert!(AnalyticsConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = ForecastConfig::from_json_str(r#"{"smoothing":{"alpha":0.5},"max_horizon":12}"#).unwrap();
        assert_eq!(config.smoothing.alpha, 0.5);
        assert_eq!(config.smoothing.beta, 0.1);
        assert_eq!(config.max_horizon, 12);
        assert_eq!(config.season_length, 12);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(matches!(
            ForecastConfig::from_json_str(r#"{"smoothing":{"gamma":1.0}}"#),
            Err(ForecastError::InvalidParameter(_))
        ));
        assert!(ForecastConfig::from_json_str(r#"{"ar_order":0}"#).is_err());
        assert!(AnalyticsConfig::from_json_str(r#"{"correlation_threshold":-1}"#).is_err());
        assert!(matches!(
            ForecastConfig::from_json_str("not json"),
            Err(ForecastError::JsonError(_))
        ));
    }

    #[test]
    fn test_excluded_months() {
        let config = AnalyticsConfig::from_json_str(
            r#"{"reference_year":2023,"excluded_months":[{"year":2023,"month":2},{"year":2023,"month":11}]}"#,
        )
        .unwrap();
        assert_eq!(config.reference_year, 2023);
        assert!(config.is_excluded(&YearMonth::new(2023, 11).unwrap()));
        assert!(!config.is_excluded(&YearMonth::new(2023, 10).unwrap()));
    }

    #[test]
    fn test_nothing_excluded_by_default() {
        let config = AnalyticsConfig::from_json_str(r#"{"reference_year":2023}"#).unwrap();
        assert!(config.excluded_months.is_empty());
        assert!(!config.is_excluded(&YearMonth::new(2023, 2).unwrap()));
    }
}
