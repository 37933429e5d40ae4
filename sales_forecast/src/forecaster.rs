//! Forecast dispatch
//!
//! [`Forecaster`] checks the shared preconditions, resolves fallback
//! rules, looks the method up in [`PROJECTORS`] and turns the raw model
//! output into predicted [`SeriesPoint`]s. The same routine projects
//! `amount` and, when the history carries one, `price`.

use crate::calendar::YearMonth;
use crate::config::ForecastConfig;
use crate::data::{is_dual_metric, PointChanges, SeriesPoint};
use crate::error::{ForecastError, Result};
use crate::models::arima::ArimaModel;
use crate::models::exponential_smoothing::{ExponentialSmoothing, HoltWintersSmoothing};
use crate::models::moving_average::{MovingAverage, WeightedMovingAverage};
use crate::models::seasonal::SeasonalTrend;
use crate::models::trend::{ExponentialGrowth, LinearTrend, PolynomialTrend};
use crate::models::{ForecastModel, MethodId, MetricHistory, TrainedForecastModel};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info, warn};
use trend_math::MathError;

/// Fewer historical points than this never produce a forecast
pub const MIN_HISTORY: usize = 3;

/// Which value of a point is projected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Metric {
    Amount,
    Price,
}

impl Metric {
    pub fn extract(&self, point: &SeriesPoint) -> Option<f64> {
        match self {
            Metric::Amount => Some(point.amount),
            Metric::Price => point.price,
        }
    }
}

/// Projects one metric history over a horizon
pub type Projector = fn(&ForecastConfig, &MetricHistory, &[YearMonth]) -> Result<Vec<f64>>;

/// Method → implementation
pub const PROJECTORS: [(MethodId, Projector); 9] = [
    (MethodId::Linear, project_linear),
    (MethodId::Polynomial, project_polynomial),
    (MethodId::Exponential, project_exponential),
    (MethodId::Seasonal, project_seasonal),
    (MethodId::MovingAverage, project_moving_average),
    (MethodId::WeightedMovingAverage, project_weighted_moving_average),
    (MethodId::ExponentialSmoothing, project_exponential_smoothing),
    (MethodId::HoltWinters, project_holt_winters),
    (MethodId::Arima, project_arima),
];

/// A method that needs more history than the global minimum, and what
/// replaces it when the history is shorter
#[derive(Clone, Copy)]
pub struct FallbackRule {
    pub method: MethodId,
    pub fallback: MethodId,
    min_history: fn(&ForecastConfig) -> usize,
}

impl fmt::Debug for FallbackRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FallbackRule")
            .field("method", &self.method)
            .field("fallback", &self.fallback)
            .finish()
    }
}

impl FallbackRule {
    /// History length below which the fallback applies
    pub fn min_history(&self, config: &ForecastConfig) -> usize {
        (self.min_history)(config)
    }
}

fn holt_winters_min_history(config: &ForecastConfig) -> usize {
    config.season_length
}

fn arima_min_history(config: &ForecastConfig) -> usize {
    config.ar_order + 1
}

pub const FALLBACK_RULES: [FallbackRule; 2] = [
    FallbackRule {
        method: MethodId::HoltWinters,
        fallback: MethodId::ExponentialSmoothing,
        min_history: holt_winters_min_history,
    },
    FallbackRule {
        method: MethodId::Arima,
        fallback: MethodId::Linear,
        min_history: arima_min_history,
    },
];

/// Train `model` and forecast the horizon. Degenerate arithmetic in the
/// numeric kernels is reported as the method not being applicable.
fn run<M: ForecastModel>(model: M, history: &MetricHistory, horizon: &[YearMonth]) -> Result<Vec<f64>> {
    let method = model.method();
    let result = model.train(history).and_then(|trained| trained.forecast(horizon));
    match result {
        Err(ForecastError::Math(MathError::CalculationError(reason))) => {
            Err(ForecastError::not_applicable(method, reason))
        }
        other => other,
    }
}

fn project_linear(_: &ForecastConfig, history: &MetricHistory, horizon: &[YearMonth]) -> Result<Vec<f64>> {
    run(LinearTrend::new(), history, horizon)
}

fn project_polynomial(_: &ForecastConfig, history: &MetricHistory, horizon: &[YearMonth]) -> Result<Vec<f64>> {
    run(PolynomialTrend::new(), history, horizon)
}

fn project_exponential(_: &ForecastConfig, history: &MetricHistory, horizon: &[YearMonth]) -> Result<Vec<f64>> {
    run(ExponentialGrowth::new(), history, horizon)
}

fn project_seasonal(_: &ForecastConfig, history: &MetricHistory, horizon: &[YearMonth]) -> Result<Vec<f64>> {
    run(SeasonalTrend::new(), history, horizon)
}

fn project_moving_average(
    config: &ForecastConfig,
    history: &MetricHistory,
    horizon: &[YearMonth],
) -> Result<Vec<f64>> {
    run(MovingAverage::new(config.moving_average_window)?, history, horizon)
}

fn project_weighted_moving_average(
    config: &ForecastConfig,
    history: &MetricHistory,
    horizon: &[YearMonth],
) -> Result<Vec<f64>> {
    run(WeightedMovingAverage::new(config.moving_average_window)?, history, horizon)
}

fn project_exponential_smoothing(
    config: &ForecastConfig,
    history: &MetricHistory,
    horizon: &[YearMonth],
) -> Result<Vec<f64>> {
    run(ExponentialSmoothing::from_params(&config.smoothing)?, history, horizon)
}

fn project_holt_winters(
    config: &ForecastConfig,
    history: &MetricHistory,
    horizon: &[YearMonth],
) -> Result<Vec<f64>> {
    run(
        HoltWintersSmoothing::new(config.smoothing, config.season_length),
        history,
        horizon,
    )
}

fn project_arima(config: &ForecastConfig, history: &MetricHistory, horizon: &[YearMonth]) -> Result<Vec<f64>> {
    run(ArimaModel::new(config.ar_order)?, history, horizon)
}

/// Stateless forecast dispatcher over a fixed configuration
#[derive(Debug, Clone, Default)]
pub struct Forecaster {
    config: ForecastConfig,
}

impl Forecaster {
    /// Create a forecaster, validating the configuration
    pub fn new(config: ForecastConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ForecastConfig {
        &self.config
    }

    /// The method actually run for a history of `history_len` points
    pub fn resolve(&self, method: MethodId, history_len: usize) -> MethodId {
        FALLBACK_RULES
            .iter()
            .find(|rule| rule.method == method && history_len < rule.min_history(&self.config))
            .map(|rule| rule.fallback)
            .unwrap_or(method)
    }

    /// Run `method` (no fallback) over one metric history.
    ///
    /// Values are floored at zero; non-finite output makes the method not
    /// applicable.
    pub fn project(&self, method: MethodId, history: &MetricHistory, horizon: &[YearMonth]) -> Result<Vec<f64>> {
        let projector = PROJECTORS
            .iter()
            .find(|(id, _)| *id == method)
            .map(|(_, projector)| *projector)
            .ok_or_else(|| ForecastError::InvalidParameter(format!("No projector registered for {}", method)))?;

        let values = projector(&self.config, history, horizon)?;
        if values.len() != horizon.len() {
            return Err(ForecastError::DataError(format!(
                "{} produced {} values for {} months",
                method,
                values.len(),
                horizon.len()
            )));
        }
        if values.iter().any(|v| !v.is_finite()) {
            return Err(ForecastError::not_applicable(method, "forecast is not finite"));
        }

        Ok(values.into_iter().map(|v| v.max(0.0)).collect())
    }

    /// Predicted points from the month after the last historical point
    /// through `target` inclusive.
    ///
    /// Returns an empty sequence when the history has fewer than
    /// [`MIN_HISTORY`] points or `target` is not after the last point.
    pub fn forecast(&self, historical: &[SeriesPoint], method: MethodId, target: YearMonth) -> Result<Vec<SeriesPoint>> {
        let last = match historical.last() {
            Some(last) if historical.len() >= MIN_HISTORY => last,
            _ => {
                debug!(points = historical.len(), %method, "history too short to forecast");
                return Ok(Vec::new());
            }
        };

        let last_period = last.period();
        if target <= last_period {
            debug!(%target, last = %last_period, "target is not after the last historical month");
            return Ok(Vec::new());
        }

        let months = last_period.months_until(&target);
        if months > self.config.max_horizon as i64 {
            return Err(ForecastError::InvalidParameter(format!(
                "Forecast of {} months exceeds the maximum horizon of {}",
                months, self.config.max_horizon
            )));
        }
        let horizon = last_period.walk_to(target);

        let effective = self.resolve(method, historical.len());
        if effective != method {
            info!(
                requested = %method,
                fallback = %effective,
                points = historical.len(),
                "history too short, falling back"
            );
        }
        debug!(%effective, points = historical.len(), months = horizon.len(), "dispatching forecast");

        let periods: Vec<YearMonth> = historical.iter().map(SeriesPoint::period).collect();
        let amounts = self.project_metric(historical, &periods, Metric::Amount, effective, &horizon)?;

        let prices = if is_dual_metric(historical) {
            match self.project_metric(historical, &periods, Metric::Price, effective, &horizon) {
                Ok(prices) => Some(prices),
                Err(err) if err.is_not_applicable() => {
                    warn!(%effective, error = %err, "skipping price projection");
                    None
                }
                Err(err) => return Err(err),
            }
        } else {
            None
        };

        let mut previous = last.clone();
        let mut predicted = Vec::with_capacity(horizon.len());
        for (k, period) in horizon.into_iter().enumerate() {
            let mut point = SeriesPoint::predicted(period, amounts[k]).with_category(last.category.clone());
            if let Some(prices) = &prices {
                point.price = Some(prices[k]);
                point.changes = Some(PointChanges::between(&previous, &point));
            }
            previous = point.clone();
            predicted.push(point);
        }

        Ok(predicted)
    }

    fn project_metric(
        &self,
        historical: &[SeriesPoint],
        periods: &[YearMonth],
        metric: Metric,
        method: MethodId,
        horizon: &[YearMonth],
    ) -> Result<Vec<f64>> {
        let values = historical
            .iter()
            .map(|p| {
                metric.extract(p).ok_or_else(|| {
                    ForecastError::DataError(format!("Point {} has no {:?} value", p.period(), metric))
                })
            })
            .collect::<Result<Vec<f64>>>()?;

        let history = MetricHistory::new(values, periods.to_vec())?;
        self.project(method, &history, horizon)
    }
}

/// Forecast with the default configuration.
///
/// See [`Forecaster::forecast`].
pub fn forecast(
    historical: &[SeriesPoint],
    method: MethodId,
    target_year: i32,
    target_month: u32,
) -> Result<Vec<SeriesPoint>> {
    let target = YearMonth::new(target_year, target_month)?;
    Forecaster::default().forecast(historical, method, target)
}
