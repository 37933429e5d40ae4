//! Exponential smoothing models for monthly forecasting

use crate::calendar::YearMonth;
use crate::config::SmoothingParams;
use crate::error::{ForecastError, Result};
use crate::models::{ForecastModel, MetricHistory, MethodId, TrainedForecastModel};
use trend_math::{DoubleExponentialSmoothing, HoltWinters};

/// Holt's double exponential smoothing; the final trend is held for the whole horizon
#[derive(Debug, Clone)]
pub struct ExponentialSmoothing {
    /// Level smoothing
    alpha: f64,
    /// Trend smoothing
    beta: f64,
}

/// Trained double exponential smoothing model
#[derive(Debug, Clone)]
pub struct TrainedExponentialSmoothing {
    smoother: DoubleExponentialSmoothing,
}

impl ExponentialSmoothing {
    pub fn new(alpha: f64, beta: f64) -> Result<Self> {
        // Reject bad factors up front rather than at train time
        DoubleExponentialSmoothing::new(alpha, beta)?;
        Ok(Self { alpha, beta })
    }

    pub fn from_params(params: &SmoothingParams) -> Result<Self> {
        Self::new(params.alpha, params.beta)
    }
}

impl ForecastModel for ExponentialSmoothing {
    type Trained = TrainedExponentialSmoothing;

    fn train(&self, history: &MetricHistory) -> Result<Self::Trained> {
        Ok(TrainedExponentialSmoothing {
            smoother: DoubleExponentialSmoothing::fit(self.alpha, self.beta, history.values())?,
        })
    }

    fn method(&self) -> MethodId {
        MethodId::ExponentialSmoothing
    }
}

impl TrainedExponentialSmoothing {
    pub fn level(&self) -> Result<f64> {
        Ok(self.smoother.level()?)
    }

    pub fn trend(&self) -> Result<f64> {
        Ok(self.smoother.trend()?)
    }
}

impl TrainedForecastModel for TrainedExponentialSmoothing {
    fn forecast(&self, horizon: &[YearMonth]) -> Result<Vec<f64>> {
        (1..=horizon.len())
            .map(|months_ahead| self.smoother.forecast(months_ahead).map_err(ForecastError::from))
            .collect()
    }
}

/// Holt-Winters triple exponential smoothing with seasonal ratios
#[derive(Debug, Clone)]
pub struct HoltWintersSmoothing {
    params: SmoothingParams,
    period: usize,
}

/// Trained Holt-Winters model
#[derive(Debug, Clone)]
pub struct TrainedHoltWinters {
    smoother: HoltWinters,
}

impl HoltWintersSmoothing {
    pub fn new(params: SmoothingParams, period: usize) -> Self {
        Self { params, period }
    }

    /// Seasonal period, also the minimum history length
    pub fn period(&self) -> usize {
        self.period
    }
}

impl ForecastModel for HoltWintersSmoothing {
    type Trained = TrainedHoltWinters;

    fn train(&self, history: &MetricHistory) -> Result<Self::Trained> {
        let SmoothingParams { alpha, beta, gamma } = self.params;
        Ok(TrainedHoltWinters {
            smoother: HoltWinters::fit(alpha, beta, gamma, self.period, history.values())?,
        })
    }

    fn method(&self) -> MethodId {
        MethodId::HoltWinters
    }
}

impl TrainedHoltWinters {
    pub fn seasonal(&self) -> &[f64] {
        self.smoother.seasonal()
    }
}

impl TrainedForecastModel for TrainedHoltWinters {
    fn forecast(&self, horizon: &[YearMonth]) -> Result<Vec<f64>> {
        Ok((1..=horizon.len())
            .map(|months_ahead| self.smoother.forecast(months_ahead))
            .collect())
    }
}
