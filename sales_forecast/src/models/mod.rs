//! Forecasting models for monthly series
//!
//! Every model follows the same two-step contract: `train` on the
//! history of one metric, then `forecast` one value per future month.
//! The horizon handed to `forecast` is the calendar walk from the last
//! observation, so `horizon[k]` lies `k + 1` months ahead.

use crate::calendar::YearMonth;
use crate::error::{ForecastError, Result};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Debug};
use std::str::FromStr;

pub mod arima;
pub mod exponential_smoothing;
pub mod moving_average;
pub mod seasonal;
pub mod trend;

/// Selectable forecasting method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MethodId {
    Linear,
    Polynomial,
    Exponential,
    Seasonal,
    MovingAverage,
    WeightedMovingAverage,
    ExponentialSmoothing,
    HoltWinters,
    Arima,
}

impl MethodId {
    /// Every method, in selector order
    pub const ALL: [MethodId; 9] = [
        MethodId::Linear,
        MethodId::Polynomial,
        MethodId::Exponential,
        MethodId::Seasonal,
        MethodId::MovingAverage,
        MethodId::WeightedMovingAverage,
        MethodId::ExponentialSmoothing,
        MethodId::HoltWinters,
        MethodId::Arima,
    ];

    /// Kebab-case tag of the method
    pub fn as_str(&self) -> &'static str {
        match self {
            MethodId::Linear => "linear",
            MethodId::Polynomial => "polynomial",
            MethodId::Exponential => "exponential",
            MethodId::Seasonal => "seasonal",
            MethodId::MovingAverage => "moving-average",
            MethodId::WeightedMovingAverage => "weighted-moving-average",
            MethodId::ExponentialSmoothing => "exponential-smoothing",
            MethodId::HoltWinters => "holt-winters",
            MethodId::Arima => "arima",
        }
    }
}

impl fmt::Display for MethodId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MethodId {
    type Err = ForecastError;

    fn from_str(s: &str) -> Result<Self> {
        MethodId::ALL
            .iter()
            .copied()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| ForecastError::InvalidParameter(format!("Unknown forecasting method: {}", s)))
    }
}

/// Observed values of one metric together with their months
#[derive(Debug, Clone, PartialEq)]
pub struct MetricHistory {
    values: Vec<f64>,
    periods: Vec<YearMonth>,
}

impl MetricHistory {
    pub fn new(values: Vec<f64>, periods: Vec<YearMonth>) -> Result<Self> {
        if values.len() != periods.len() {
            return Err(ForecastError::DataError(format!(
                "Values length ({}) doesn't match periods length ({})",
                values.len(),
                periods.len()
            )));
        }
        if values.is_empty() {
            return Err(ForecastError::DataError(
                "Empty metric history".to_string(),
            ));
        }
        Ok(Self { values, periods })
    }

    /// History over consecutive months starting at `start`
    pub fn consecutive(values: Vec<f64>, start: YearMonth) -> Result<Self> {
        let periods = (0..values.len() as u32).map(|i| start.advance(i)).collect();
        Self::new(values, periods)
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn periods(&self) -> &[YearMonth] {
        &self.periods
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// First observed value
    pub fn first(&self) -> f64 {
        self.values[0]
    }

    /// Most recent observed value
    pub fn last(&self) -> f64 {
        self.values[self.values.len() - 1]
    }
}

/// Trained forecast model
pub trait TrainedForecastModel: Debug {
    /// One value per month of `horizon`
    fn forecast(&self, horizon: &[YearMonth]) -> Result<Vec<f64>>;
}

/// Forecast model that can be trained on one metric's history
pub trait ForecastModel: Debug + Clone {
    /// The type of trained model produced
    type Trained: TrainedForecastModel;

    /// Train the model on a metric history
    fn train(&self, history: &MetricHistory) -> Result<Self::Trained>;

    /// The method this model implements
    fn method(&self) -> MethodId;
}
