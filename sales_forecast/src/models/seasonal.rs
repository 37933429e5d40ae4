//! Seasonal averages compounded by the overall trend

use crate::calendar::YearMonth;
use crate::error::{ForecastError, Result};
use crate::models::{ForecastModel, MetricHistory, MethodId, TrainedForecastModel};
use statrs::statistics::Statistics;
use trend_math::LinearFit;

const MONTHS_PER_YEAR: usize = 12;

/// Average of each calendar month scaled by compound trend growth.
///
/// The trend slope is expressed as a monthly growth rate relative to the
/// overall mean; a month never observed falls back to the overall mean.
#[derive(Debug, Clone, Default)]
pub struct SeasonalTrend;

/// Trained seasonal model
#[derive(Debug, Clone)]
pub struct TrainedSeasonalTrend {
    month_averages: [Option<f64>; MONTHS_PER_YEAR],
    overall_mean: f64,
    monthly_growth: f64,
}

impl SeasonalTrend {
    pub fn new() -> Self {
        Self
    }
}

impl ForecastModel for SeasonalTrend {
    type Trained = TrainedSeasonalTrend;

    fn train(&self, history: &MetricHistory) -> Result<Self::Trained> {
        let overall_mean = history.values().iter().mean();
        if overall_mean == 0.0 || !overall_mean.is_finite() {
            return Err(ForecastError::not_applicable(
                self.method(),
                "overall mean is zero",
            ));
        }

        let mut by_month: Vec<Vec<f64>> = vec![Vec::new(); MONTHS_PER_YEAR];
        for (value, period) in history.values().iter().zip(history.periods()) {
            by_month[period.month_index()].push(*value);
        }

        let mut month_averages = [None; MONTHS_PER_YEAR];
        for (average, observed) in month_averages.iter_mut().zip(&by_month) {
            if !observed.is_empty() {
                *average = Some(observed.iter().mean());
            }
        }

        let slope = LinearFit::fit(history.values())?.slope;

        Ok(TrainedSeasonalTrend {
            month_averages,
            overall_mean,
            monthly_growth: slope / overall_mean,
        })
    }

    fn method(&self) -> MethodId {
        MethodId::Seasonal
    }
}

impl TrainedSeasonalTrend {
    /// Average for a calendar month, if it was ever observed
    pub fn month_average(&self, month: u32) -> Option<f64> {
        self.month_averages
            .get((month as usize).wrapping_sub(1))
            .copied()
            .flatten()
    }

    /// Monthly growth rate as a fraction of the overall mean
    pub fn monthly_growth(&self) -> f64 {
        self.monthly_growth
    }
}

impl TrainedForecastModel for TrainedSeasonalTrend {
    fn forecast(&self, horizon: &[YearMonth]) -> Result<Vec<f64>> {
        Ok(horizon
            .iter()
            .enumerate()
            .map(|(k, period)| {
                let base = self.month_averages[period.month_index()].unwrap_or(self.overall_mean);
                base * (1.0 + self.monthly_growth).powi(k as i32 + 1)
            })
            .collect())
    }
}
