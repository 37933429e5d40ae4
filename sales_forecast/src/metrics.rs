//! Metrics for evaluating forecast accuracy

use crate::data::SeriesPoint;
use crate::error::{ForecastError, Result};
use crate::forecaster::{Forecaster, MIN_HISTORY};
use crate::models::MethodId;
use serde::Serialize;
use statrs::statistics::Statistics;
use tracing::debug;

/// Error metrics for forecast evaluation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastMetrics {
    /// Mean Absolute Error
    pub mae: f64,
    /// Mean Squared Error
    pub mse: f64,
    /// Root Mean Squared Error
    pub rmse: f64,
    /// Mean Absolute Percentage Error over non-zero actuals
    pub mape: f64,
}

/// Evaluate forecast accuracy against actual values
pub fn evaluate_forecast(forecast: &[f64], actual: &[f64]) -> Result<ForecastMetrics> {
    if forecast.len() != actual.len() || forecast.is_empty() {
        return Err(ForecastError::DataError(
            "Forecast and actual values must have the same non-zero length".to_string(),
        ));
    }

    let errors: Vec<f64> = forecast.iter().zip(actual).map(|(f, a)| a - f).collect();

    let mae = errors.iter().map(|e| e.abs()).mean();
    let mse = errors.iter().map(|e| e.powi(2)).mean();

    let percentage_errors: Vec<f64> = actual
        .iter()
        .zip(&errors)
        .filter(|(a, _)| **a != 0.0)
        .map(|(a, e)| e.abs() / a.abs() * 100.0)
        .collect();
    let mape = if percentage_errors.is_empty() {
        0.0
    } else {
        percentage_errors.iter().mean()
    };

    Ok(ForecastMetrics {
        mae,
        mse,
        rmse: mse.sqrt(),
        mape,
    })
}

/// Outcome of forecasting held-out months
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BacktestReport {
    pub method: MethodId,
    /// The method that ran after fallback rules
    pub effective_method: MethodId,
    pub predicted: Vec<SeriesPoint>,
    pub metrics: ForecastMetrics,
}

/// Forecast the last `holdout` months from the months before them and
/// score the result against what was observed
pub fn backtest(
    forecaster: &Forecaster,
    historical: &[SeriesPoint],
    method: MethodId,
    holdout: usize,
) -> Result<BacktestReport> {
    if holdout == 0 {
        return Err(ForecastError::InvalidParameter(
            "Holdout must be at least one month".to_string(),
        ));
    }
    if historical.len() < holdout + MIN_HISTORY {
        return Err(ForecastError::DataError(format!(
            "Backtesting {} months needs at least {} points, have {}",
            holdout,
            holdout + MIN_HISTORY,
            historical.len()
        )));
    }

    let (train, test) = historical.split_at(historical.len() - holdout);
    let target = test[test.len() - 1].period();
    let predicted = forecaster.forecast(train, method, target)?;

    // Compare only months present in both; the history may skip months
    let (forecast, actual): (Vec<f64>, Vec<f64>) = test
        .iter()
        .filter_map(|observed| {
            predicted
                .iter()
                .find(|p| p.period() == observed.period())
                .map(|p| (p.amount, observed.amount))
        })
        .unzip();

    let metrics = evaluate_forecast(&forecast, &actual)?;
    debug!(%method, holdout, rmse = metrics.rmse, "backtest complete");

    Ok(BacktestReport {
        method,
        effective_method: forecaster.resolve(method, train.len()),
        predicted,
        metrics,
    })
}

/// Backtest every method and order the successful ones by RMSE, best first.
///
/// Methods that are not applicable to the history are left out.
pub fn rank_methods(forecaster: &Forecaster, historical: &[SeriesPoint], holdout: usize) -> Result<Vec<BacktestReport>> {
    let mut reports = Vec::new();
    for method in MethodId::ALL {
        match backtest(forecaster, historical, method, holdout) {
            Ok(report) => reports.push(report),
            Err(err) if err.is_not_applicable() => {
                debug!(%method, error = %err, "method skipped in ranking");
            }
            Err(err) => return Err(err),
        }
    }

    reports.sort_by(|a, b| a.metrics.rmse.total_cmp(&b.metrics.rmse));
    Ok(reports)
}
