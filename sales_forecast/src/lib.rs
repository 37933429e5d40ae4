//! # Sales Forecast
//!
//! A Rust library for projecting monthly business metrics and summarising
//! them with seasonal analytics.
//!
//! ## Features
//!
//! - Aggregation of raw per-category records into one point per month
//! - Nine forecasting methods (linear, polynomial, exponential, seasonal,
//!   moving average, weighted moving average, exponential smoothing,
//!   Holt-Winters, ARIMA)
//! - Independent projection of sales amount and average price
//! - Seasonal peaks, min/max and price/sales correlation over any window
//! - Backtesting and accuracy metrics
//!
//! ## Quick Start
//!
//! ```rust
//! use sales_forecast::{aggregate, analyze, combine, forecast, CategoryFilter, MethodId, MonthlyRecord};
//!
//! let records: Vec<MonthlyRecord> = (1..=8)
//!     .map(|month| MonthlyRecord::new(2023, month, "Shoes", 100.0 + 10.0 * month as f64))
//!     .collect();
//!
//! // January and August are dropped as partial months
//! let historical = aggregate(&records, &CategoryFilter::Total)?;
//! assert_eq!(historical.len(), 6);
//!
//! let predicted = forecast(&historical, MethodId::Linear, 2023, 12)?;
//! assert_eq!(predicted.len(), 5);
//!
//! let series = combine(&historical, &predicted);
//! let report = analyze(&series);
//! assert_eq!(report.extremes.max.unwrap().month, 7);
//! # Ok::<(), sales_forecast::ForecastError>(())
//! ```

pub mod analytics;
pub mod calendar;
pub mod config;
pub mod data;
pub mod error;
pub mod forecaster;
pub mod metrics;
pub mod models;

// Re-export commonly used types
pub use crate::analytics::{analyze, analyze_with, AnalyticsReport, Season};
pub use crate::calendar::{advance, YearMonth};
pub use crate::config::{AnalyticsConfig, ForecastConfig, SmoothingParams};
pub use crate::data::{aggregate, categories, combine, window, CategoryFilter, DataLoader, MonthlyRecord, SeriesPoint};
pub use crate::error::{ForecastError, Result};
pub use crate::forecaster::{forecast, Forecaster, Metric};
pub use crate::models::{ForecastModel, MethodId, MetricHistory, TrainedForecastModel};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
