//! Moving average models with a window trend

use crate::calendar::YearMonth;
use crate::error::{ForecastError, Result};
use crate::models::{ForecastModel, MetricHistory, MethodId, TrainedForecastModel};
use trend_math::{simple_mean, trailing_window, weighted_mean, LinearFit};

/// Simple Moving Average model
#[derive(Debug, Clone)]
pub struct MovingAverage {
    /// Longest window size
    window: usize,
}

/// Linearly weighted moving average model
#[derive(Debug, Clone)]
pub struct WeightedMovingAverage {
    window: usize,
}

/// Trained moving average: a base level plus a per-month slope
#[derive(Debug, Clone)]
pub struct TrainedMovingAverage {
    /// Average of the trailing window
    base: f64,
    /// Trend fitted within the same window
    slope: f64,
}

fn check_window(window: usize) -> Result<()> {
    if window == 0 {
        return Err(ForecastError::InvalidParameter(
            "Window size must be positive".to_string(),
        ));
    }
    Ok(())
}

/// Slope of the window, zero when the window is a single point
fn window_slope(window: &[f64]) -> Result<f64> {
    if window.len() < 2 {
        return Ok(0.0);
    }
    Ok(LinearFit::fit(window)?.slope)
}

impl MovingAverage {
    /// Create a new Simple Moving Average model
    pub fn new(window: usize) -> Result<Self> {
        check_window(window)?;
        Ok(Self { window })
    }

    pub fn window(&self) -> usize {
        self.window
    }
}

impl ForecastModel for MovingAverage {
    type Trained = TrainedMovingAverage;

    fn train(&self, history: &MetricHistory) -> Result<Self::Trained> {
        let window = trailing_window(history.values(), self.window);
        Ok(TrainedMovingAverage {
            base: simple_mean(window)?,
            slope: window_slope(window)?,
        })
    }

    fn method(&self) -> MethodId {
        MethodId::MovingAverage
    }
}

impl WeightedMovingAverage {
    /// Create a new weighted moving average model
    pub fn new(window: usize) -> Result<Self> {
        check_window(window)?;
        Ok(Self { window })
    }

    pub fn window(&self) -> usize {
        self.window
    }
}

impl ForecastModel for WeightedMovingAverage {
    type Trained = TrainedMovingAverage;

    fn train(&self, history: &MetricHistory) -> Result<Self::Trained> {
        let window = trailing_window(history.values(), self.window);
        Ok(TrainedMovingAverage {
            base: weighted_mean(window)?,
            slope: window_slope(window)?,
        })
    }

    fn method(&self) -> MethodId {
        MethodId::WeightedMovingAverage
    }
}

impl TrainedMovingAverage {
    pub fn base(&self) -> f64 {
        self.base
    }

    pub fn slope(&self) -> f64 {
        self.slope
    }
}

impl TrainedForecastModel for TrainedMovingAverage {
    fn forecast(&self, horizon: &[YearMonth]) -> Result<Vec<f64>> {
        Ok((1..=horizon.len())
            .map(|months_ahead| self.base + self.slope * months_ahead as f64)
            .collect())
    }
}
