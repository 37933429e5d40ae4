//! Autoregressive model for monthly forecasting
//!
//! A simplified AR(p): each coefficient is the average ratio of the value
//! `j` months back to the value being explained, and the coefficients are
//! normalised to sum to one. Forecasts roll forward, feeding each
//! prediction back in as the newest lag.

use crate::calendar::YearMonth;
use crate::error::{ForecastError, Result};
use crate::models::{ForecastModel, MetricHistory, MethodId, TrainedForecastModel};
use std::collections::VecDeque;

/// Simplified ARIMA model (AR part only)
#[derive(Debug, Clone)]
pub struct ArimaModel {
    /// AR order (p)
    p: usize,
}

/// Trained autoregressive model
#[derive(Debug, Clone)]
pub struct TrainedArimaModel {
    /// Normalised coefficients, lag 1 first
    ar_coefficients: Vec<f64>,
    /// The last p observations, oldest first
    recent: Vec<f64>,
}

impl ArimaModel {
    /// Create a new AR(p) model
    pub fn new(p: usize) -> Result<Self> {
        if p == 0 {
            return Err(ForecastError::InvalidParameter(
                "AR order must be positive".to_string(),
            ));
        }
        Ok(Self { p })
    }

    /// Smallest history this model can be trained on
    pub fn min_history(&self) -> usize {
        self.p + 1
    }
}

impl ForecastModel for ArimaModel {
    type Trained = TrainedArimaModel;

    fn train(&self, history: &MetricHistory) -> Result<Self::Trained> {
        let values = history.values();
        if values.len() < self.min_history() {
            return Err(ForecastError::DataError(format!(
                "Insufficient data for AR({}). Need at least {} observations.",
                self.p,
                self.min_history()
            )));
        }

        let samples = (values.len() - self.p) as f64;
        let mut coefficients = vec![0.0; self.p];
        for t in self.p..values.len() {
            if values[t] == 0.0 {
                return Err(ForecastError::not_applicable(
                    self.method(),
                    format!("observation {} is zero", t),
                ));
            }
            for (j, coefficient) in coefficients.iter_mut().enumerate() {
                *coefficient += values[t - j - 1] / values[t];
            }
        }
        for coefficient in coefficients.iter_mut() {
            *coefficient /= samples;
        }

        let total: f64 = coefficients.iter().sum();
        if total == 0.0 || !total.is_finite() {
            return Err(ForecastError::not_applicable(
                self.method(),
                "coefficients cannot be normalised",
            ));
        }
        for coefficient in coefficients.iter_mut() {
            *coefficient /= total;
        }

        Ok(TrainedArimaModel {
            ar_coefficients: coefficients,
            recent: values[values.len() - self.p..].to_vec(),
        })
    }

    fn method(&self) -> MethodId {
        MethodId::Arima
    }
}

impl TrainedArimaModel {
    pub fn coefficients(&self) -> &[f64] {
        &self.ar_coefficients
    }
}

impl TrainedForecastModel for TrainedArimaModel {
    fn forecast(&self, horizon: &[YearMonth]) -> Result<Vec<f64>> {
        let mut history: VecDeque<f64> = self.recent.iter().copied().collect();
        let mut forecasts = Vec::with_capacity(horizon.len());

        for _ in horizon {
            let forecast: f64 = self
                .ar_coefficients
                .iter()
                .zip(history.iter().rev())
                .map(|(coefficient, value)| coefficient * value)
                .sum();

            history.pop_front();
            history.push_back(forecast);
            forecasts.push(forecast);
        }

        Ok(forecasts)
    }
}
