//! Summary analytics over a window of a combined series
//!
//! Three summaries are computed from the same slice:
//! - seasonal totals of one reference year
//! - the largest and smallest historical month, skipping known anomalies
//! - how often price and sales moved in opposite directions
//!
//! Predicted points never contribute to any of them.

use crate::config::AnalyticsConfig;
use crate::data::{has_price_history, PointChanges, SeriesPoint};
use serde::Serialize;
use std::fmt;

/// Meteorological season of a calendar month
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Season {
    Winter,
    Spring,
    Summer,
    Fall,
}

impl Season {
    pub const ALL: [Season; 4] = [Season::Winter, Season::Spring, Season::Summer, Season::Fall];

    /// Season of a month; `None` outside `1..=12`
    pub fn from_month(month: u32) -> Option<Season> {
        match month {
            12 | 1 | 2 => Some(Season::Winter),
            3..=5 => Some(Season::Spring),
            6..=8 => Some(Season::Summer),
            9..=11 => Some(Season::Fall),
            _ => None,
        }
    }

    fn index(&self) -> usize {
        match self {
            Season::Winter => 0,
            Season::Spring => 1,
            Season::Summer => 2,
            Season::Fall => 3,
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Season::Winter => "Winter",
            Season::Spring => "Spring",
            Season::Summer => "Summer",
            Season::Fall => "Fall",
        };
        f.write_str(name)
    }
}

/// Seasonal totals of the reference year
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeasonalSummary {
    pub reference_year: i32,
    pub totals: Vec<(Season, f64)>,
    /// Highest-total season, `None` when every total is zero
    pub peak: Option<Season>,
    /// Lowest-total season, `None` when every total is zero
    pub low: Option<Season>,
    pub message: String,
}

/// A single month's amount
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Extreme {
    pub value: f64,
    pub year: i32,
    pub month: u32,
}

/// Largest and smallest historical amounts of a window
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Extremes {
    pub max: Option<Extreme>,
    pub min: Option<Extreme>,
}

/// Direction agreement between price and sales changes
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CorrelationSummary {
    /// Months where price and sales moved in opposite directions
    pub inverse: usize,
    /// Months where they moved the same way
    pub direct: usize,
    /// Months whose price change exceeded the threshold
    pub qualifying: usize,
    /// Share of qualifying months that moved inversely, `None` when none qualify
    pub inverse_percent: Option<f64>,
    pub message: String,
}

/// Every summary of one window
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsReport {
    pub seasonal: SeasonalSummary,
    pub extremes: Extremes,
    /// Present only when every historical point of the window carries a price
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correlation: Option<CorrelationSummary>,
}

/// Analyze a window with the default configuration
pub fn analyze(window: &[SeriesPoint]) -> AnalyticsReport {
    analyze_with(window, &AnalyticsConfig::default())
}

/// Analyze a window
pub fn analyze_with(window: &[SeriesPoint], config: &AnalyticsConfig) -> AnalyticsReport {
    AnalyticsReport {
        seasonal: seasonal_totals(window, config),
        extremes: extremes(window, config),
        correlation: correlation(window, config),
    }
}

/// Sum historical amounts of the reference year by season
pub fn seasonal_totals(window: &[SeriesPoint], config: &AnalyticsConfig) -> SeasonalSummary {
    let mut totals = [0.0; 4];
    for point in window
        .iter()
        .filter(|p| !p.is_predicted && p.year == config.reference_year)
    {
        if let Some(season) = Season::from_month(point.month) {
            totals[season.index()] += point.amount;
        }
    }

    let totals: Vec<(Season, f64)> = Season::ALL.iter().map(|s| (*s, totals[s.index()])).collect();

    if totals.iter().all(|(_, total)| *total == 0.0) {
        return SeasonalSummary {
            reference_year: config.reference_year,
            totals,
            peak: None,
            low: None,
            message: format!("No seasonal data for {}", config.reference_year),
        };
    }

    // first season wins a tie
    let mut peak = totals[0];
    let mut low = totals[0];
    for &(season, total) in &totals[1..] {
        if total > peak.1 {
            peak = (season, total);
        }
        if total < low.1 {
            low = (season, total);
        }
    }

    SeasonalSummary {
        reference_year: config.reference_year,
        message: format!(
            "{} sales peak in {} ({:.2}) and are lowest in {} ({:.2})",
            config.reference_year, peak.0, peak.1, low.0, low.1
        ),
        totals,
        peak: Some(peak.0),
        low: Some(low.0),
    }
}

/// Largest and smallest historical amounts, skipping excluded months.
///
/// Ties keep the earliest point.
pub fn extremes(window: &[SeriesPoint], config: &AnalyticsConfig) -> Extremes {
    let mut max: Option<&SeriesPoint> = None;
    let mut min: Option<&SeriesPoint> = None;

    for point in window
        .iter()
        .filter(|p| !p.is_predicted && !config.is_excluded(&p.period()))
    {
        if max.map_or(true, |m| point.amount > m.amount) {
            max = Some(point);
        }
        if min.map_or(true, |m| point.amount < m.amount) {
            min = Some(point);
        }
    }

    let to_extreme = |p: &SeriesPoint| Extreme {
        value: p.amount,
        year: p.year,
        month: p.month,
    };

    Extremes {
        max: max.map(to_extreme),
        min: min.map(to_extreme),
    }
}

/// Count inverse and direct price/sales movements over historical points.
///
/// The first point of the window is skipped; points whose absolute price
/// change percentage does not exceed the threshold do not qualify.
/// Returns `None` unless every historical point carries a price.
pub fn correlation(window: &[SeriesPoint], config: &AnalyticsConfig) -> Option<CorrelationSummary> {
    if !has_price_history(window) {
        return None;
    }

    let mut inverse = 0;
    let mut direct = 0;
    let mut qualifying = 0;

    for (i, point) in window.iter().enumerate().skip(1) {
        if point.is_predicted {
            continue;
        }
        let changes = point
            .changes
            .unwrap_or_else(|| PointChanges::between(&window[i - 1], point));
        if changes.price_change_percent.abs() <= config.correlation_threshold {
            continue;
        }

        qualifying += 1;
        let agreement = changes.price_change * changes.sales_change;
        if agreement < 0.0 {
            inverse += 1;
        } else if agreement > 0.0 {
            direct += 1;
        }
    }

    let inverse_percent = (qualifying > 0).then(|| inverse as f64 / qualifying as f64 * 100.0);
    let message = match inverse_percent {
        Some(percent) => format!(
            "{:.1}% inverse correlation between price and sales ({} of {} months)",
            percent, inverse, qualifying
        ),
        None => "No correlation".to_string(),
    };

    Some(CorrelationSummary {
        inverse,
        direct,
        qualifying,
        inverse_percent,
        message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::YearMonth;
    use crate::data::combine;

    fn point(year: i32, month: u32, amount: f64) -> SeriesPoint {
        SeriesPoint::historical(YearMonth::new(year, month).unwrap(), amount)
    }

    fn config_for(year: i32) -> AnalyticsConfig {
        AnalyticsConfig {
            reference_year: year,
            ..AnalyticsConfig::default()
        }
    }

    #[test]
    fn test_season_from_month() {
        assert_eq!(Season::from_month(12), Some(Season::Winter));
        assert_eq!(Season::from_month(2), Some(Season::Winter));
        assert_eq!(Season::from_month(5), Some(Season::Spring));
        assert_eq!(Season::from_month(8), Some(Season::Summer));
        assert_eq!(Season::from_month(9), Some(Season::Fall));
        assert_eq!(Season::from_month(0), None);
    }

    #[test]
    fn test_seasonal_totals_reference_year_only() {
        let window = vec![
            point(2022, 7, 1000.0),
            point(2023, 1, 10.0),
            point(2023, 4, 30.0),
            point(2023, 7, 50.0),
            point(2023, 10, 20.0),
            SeriesPoint::predicted(YearMonth::new(2023, 11).unwrap(), 500.0),
        ];

        let summary = seasonal_totals(&window, &config_for(2023));
        assert_eq!(summary.peak, Some(Season::Summer));
        assert_eq!(summary.low, Some(Season::Winter));
        assert_eq!(summary.totals[3], (Season::Fall, 20.0));
    }

    #[test]
    fn test_seasonal_totals_no_data() {
        let window = vec![point(2022, 7, 1000.0)];
        let summary = seasonal_totals(&window, &config_for(2023));
        assert_eq!(summary.peak, None);
        assert_eq!(summary.low, None);
        assert!(summary.message.contains("No seasonal data"));
    }

    #[test]
    fn test_extremes_skip_predicted_and_excluded() {
        let config = AnalyticsConfig {
            excluded_months: vec![YearMonth::new(2023, 3).unwrap()],
            ..AnalyticsConfig::default()
        };
        let window = vec![
            point(2023, 1, 40.0),
            point(2023, 2, 10.0),
            point(2023, 3, 999.0),
            point(2023, 4, 40.0),
            SeriesPoint::predicted(YearMonth::new(2023, 5).unwrap(), 5000.0),
        ];

        let result = extremes(&window, &config);
        assert_eq!(result.max, Some(Extreme { value: 40.0, year: 2023, month: 1 }));
        assert_eq!(result.min, Some(Extreme { value: 10.0, year: 2023, month: 2 }));
    }

    #[test]
    fn test_extremes_empty_window() {
        let result = extremes(&[], &AnalyticsConfig::default());
        assert_eq!(result.max, None);
        assert_eq!(result.min, None);
    }

    #[test]
    fn test_correlation_counts_directions() {
        let raw = vec![
            point(2023, 1, 100.0).with_price(10.0),
            // price up 10%, sales down: inverse
            point(2023, 2, 90.0).with_price(11.0),
            // price up ~0.09%: below threshold
            point(2023, 3, 95.0).with_price(11.01),
            // price down, sales down: direct
            point(2023, 4, 80.0).with_price(10.0),
            // price down, sales up: inverse
            point(2023, 5, 85.0).with_price(9.0),
        ];
        let series = combine(&raw, &[]);

        let summary = correlation(&series, &AnalyticsConfig::default()).unwrap();
        assert_eq!(summary.qualifying, 3);
        assert_eq!(summary.inverse, 2);
        assert_eq!(summary.direct, 1);
        let percent = summary.inverse_percent.unwrap();
        assert!((percent - 200.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_correlation_requires_prices() {
        let window = vec![point(2023, 1, 1.0), point(2023, 2, 2.0)];
        assert!(correlation(&window, &AnalyticsConfig::default()).is_none());
    }

    #[test]
    fn test_correlation_none_qualifying() {
        let window = combine(
            &[point(2023, 1, 1.0).with_price(5.0), point(2023, 2, 2.0).with_price(5.0)],
            &[],
        );
        let summary = correlation(&window, &AnalyticsConfig::default()).unwrap();
        assert_eq!(summary.inverse_percent, None);
        assert_eq!(summary.message, "No correlation");
    }
}
