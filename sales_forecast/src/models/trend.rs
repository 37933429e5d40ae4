//! Trend-following models: straight line, parabola and compound growth

use crate::calendar::YearMonth;
use crate::error::{ForecastError, Result};
use crate::models::{ForecastModel, MetricHistory, MethodId, TrainedForecastModel};
use trend_math::{LinearFit, QuadraticFit};

/// Least-squares line over the observation index
#[derive(Debug, Clone, Default)]
pub struct LinearTrend;

/// Trained linear trend
#[derive(Debug, Clone)]
pub struct TrainedLinearTrend {
    fit: LinearFit,
    /// Index of the first forecast step
    next_index: usize,
}

impl LinearTrend {
    pub fn new() -> Self {
        Self
    }
}

impl ForecastModel for LinearTrend {
    type Trained = TrainedLinearTrend;

    fn train(&self, history: &MetricHistory) -> Result<Self::Trained> {
        Ok(TrainedLinearTrend {
            fit: LinearFit::fit(history.values())?,
            next_index: history.len(),
        })
    }

    fn method(&self) -> MethodId {
        MethodId::Linear
    }
}

impl TrainedLinearTrend {
    pub fn fit(&self) -> &LinearFit {
        &self.fit
    }
}

impl TrainedForecastModel for TrainedLinearTrend {
    fn forecast(&self, horizon: &[YearMonth]) -> Result<Vec<f64>> {
        Ok((0..horizon.len())
            .map(|k| self.fit.value_at((self.next_index + k) as f64))
            .collect())
    }
}

/// Least-squares parabola over the observation index
#[derive(Debug, Clone, Default)]
pub struct PolynomialTrend;

/// Trained quadratic trend
#[derive(Debug, Clone)]
pub struct TrainedPolynomialTrend {
    fit: QuadraticFit,
    next_index: usize,
}

impl PolynomialTrend {
    pub fn new() -> Self {
        Self
    }
}

impl ForecastModel for PolynomialTrend {
    type Trained = TrainedPolynomialTrend;

    fn train(&self, history: &MetricHistory) -> Result<Self::Trained> {
        Ok(TrainedPolynomialTrend {
            fit: QuadraticFit::fit(history.values())?,
            next_index: history.len(),
        })
    }

    fn method(&self) -> MethodId {
        MethodId::Polynomial
    }
}

impl TrainedForecastModel for TrainedPolynomialTrend {
    fn forecast(&self, horizon: &[YearMonth]) -> Result<Vec<f64>> {
        Ok((0..horizon.len())
            .map(|k| self.fit.value_at((self.next_index + k) as f64))
            .collect())
    }
}

/// Compound growth from the first to the last observation.
///
/// The monthly ratio is `(last / first)^(1 / n)` and each step multiplies
/// the last observation by it once more.
#[derive(Debug, Clone, Default)]
pub struct ExponentialGrowth;

/// Trained growth model
#[derive(Debug, Clone)]
pub struct TrainedExponentialGrowth {
    last_value: f64,
    ratio: f64,
}

impl ExponentialGrowth {
    pub fn new() -> Self {
        Self
    }
}

impl ForecastModel for ExponentialGrowth {
    type Trained = TrainedExponentialGrowth;

    fn train(&self, history: &MetricHistory) -> Result<Self::Trained> {
        let first = history.first();
        if first == 0.0 {
            return Err(ForecastError::not_applicable(
                self.method(),
                "first value is zero",
            ));
        }

        let growth = history.last() / first;
        if growth < 0.0 {
            return Err(ForecastError::not_applicable(
                self.method(),
                "first and last values have opposite signs",
            ));
        }

        Ok(TrainedExponentialGrowth {
            last_value: history.last(),
            ratio: growth.powf(1.0 / history.len() as f64),
        })
    }

    fn method(&self) -> MethodId {
        MethodId::Exponential
    }
}

impl TrainedExponentialGrowth {
    /// Monthly growth ratio
    pub fn ratio(&self) -> f64 {
        self.ratio
    }
}

impl TrainedForecastModel for TrainedExponentialGrowth {
    fn forecast(&self, horizon: &[YearMonth]) -> Result<Vec<f64>> {
        Ok((1..=horizon.len())
            .map(|months_ahead| self.last_value * self.ratio.powi(months_ahead as i32))
            .collect())
    }
}
