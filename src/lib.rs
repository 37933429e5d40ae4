//! # Monthly Forecast
//!
//! Umbrella crate for the monthly sales forecasting workspace.
//!
//! - [`sales_forecast`]: ingestion, aggregation, forecasting methods and analytics
//! - [`trend_math`]: regression and smoothing primitives the methods are built on
//!
//! ## Example
//!
//! ```
//! use monthly_forecast_workspace::sales_forecast::{forecast, MethodId, SeriesPoint, YearMonth};
//!
//! let start = YearMonth::new(2024, 1).unwrap();
//! let history: Vec<SeriesPoint> = [100.0, 110.0, 120.0]
//!     .iter()
//!     .enumerate()
//!     .map(|(i, &amount)| SeriesPoint::historical(start.advance(i as u32), amount))
//!     .collect();
//!
//! let predicted = forecast(&history, MethodId::Linear, 2024, 5).unwrap();
//! assert_eq!(predicted.len(), 2);
//! assert!(predicted.iter().all(|p| p.is_predicted));
//! ```

pub use sales_forecast;
pub use trend_math;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reexports_share_regression() {
        let fit = trend_math::LinearFit::fit(&[1.0, 3.0, 5.0]).unwrap();
        assert!((fit.value_at(3.0) - 7.0).abs() < 1e-9);

        let history = sales_forecast::MetricHistory::consecutive(
            vec![1.0, 3.0, 5.0],
            sales_forecast::YearMonth::new(2024, 1).unwrap(),
        )
        .unwrap();
        assert_eq!(history.len(), 3);
    }
}
