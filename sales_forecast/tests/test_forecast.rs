use approx::assert_abs_diff_eq;
use pretty_assertions::assert_eq;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use rstest::rstest;
use sales_forecast::forecaster::FALLBACK_RULES;
use sales_forecast::{combine, forecast, ForecastConfig, Forecaster, MethodId, SeriesPoint, YearMonth};

fn series_from(start: YearMonth, values: &[f64]) -> Vec<SeriesPoint> {
    values
        .iter()
        .enumerate()
        .map(|(i, v)| SeriesPoint::historical(start.advance(i as u32), *v))
        .collect()
}

fn noisy_series(seed: u64, len: usize, base: f64, slope: f64) -> Vec<SeriesPoint> {
    let mut rng = StdRng::seed_from_u64(seed);
    let noise = Normal::new(0.0, 8.0).unwrap();
    let values: Vec<f64> = (0..len)
        .map(|i| (base + slope * i as f64 + noise.sample(&mut rng)).max(1.0))
        .collect();
    series_from(YearMonth::new(2022, 3).unwrap(), &values)
}

#[rstest]
#[case(MethodId::Linear)]
#[case(MethodId::Polynomial)]
#[case(MethodId::Exponential)]
#[case(MethodId::Seasonal)]
#[case(MethodId::MovingAverage)]
#[case(MethodId::WeightedMovingAverage)]
#[case(MethodId::ExponentialSmoothing)]
#[case(MethodId::HoltWinters)]
#[case(MethodId::Arima)]
fn test_calendar_walk_is_contiguous(#[case] method: MethodId) {
    let historical = noisy_series(7, 18, 120.0, 2.0);
    let last = historical.last().unwrap().period();
    let target = YearMonth::new(2024, 2).unwrap();

    let predicted = forecast(&historical, method, target.year(), target.month()).unwrap();

    assert_eq!(predicted.len() as i64, last.months_until(&target));
    let mut expected = last;
    for point in &predicted {
        expected = expected.next();
        assert_eq!(point.period(), expected);
        assert!(point.is_predicted);
    }
    assert_eq!(predicted.last().unwrap().period(), target);
}

/// `noisy_series` with a price that falls by `price_slope` each month
fn noisy_priced_series(seed: u64, len: usize, base: f64, slope: f64, price_slope: f64) -> Vec<SeriesPoint> {
    let mut rng = StdRng::seed_from_u64(seed.wrapping_add(1000));
    let noise = Normal::new(0.0, 1.5).unwrap();
    noisy_series(seed, len, base, slope)
        .into_iter()
        .enumerate()
        .map(|(i, p)| {
            let price = (60.0 + price_slope * i as f64 + noise.sample(&mut rng)).max(0.5);
            p.with_price(price)
        })
        .collect()
}

#[rstest]
#[case(MethodId::Linear)]
#[case(MethodId::Polynomial)]
#[case(MethodId::Exponential)]
#[case(MethodId::Seasonal)]
#[case(MethodId::MovingAverage)]
#[case(MethodId::WeightedMovingAverage)]
#[case(MethodId::ExponentialSmoothing)]
#[case(MethodId::HoltWinters)]
#[case(MethodId::Arima)]
fn test_predictions_never_negative(#[case] method: MethodId) {
    for seed in 0..5 {
        // Steep decline so most methods cross zero within two years
        let plain = noisy_series(seed, 14, 300.0, -20.0);
        let priced = noisy_priced_series(seed, 14, 300.0, -20.0, -4.0);
        for historical in [plain, priced] {
            match forecast(&historical, method, 2025, 4) {
                Ok(predicted) => {
                    assert!(!predicted.is_empty());
                    assert!(predicted.iter().all(|p| p.amount >= 0.0), "{} went negative", method);
                    assert!(
                        predicted.iter().all(|p| p.price.map_or(true, |price| price >= 0.0)),
                        "{} produced a negative price",
                        method
                    );
                }
                Err(err) => assert!(err.is_not_applicable(), "{} failed: {}", method, err),
            }
        }
    }
}

#[rstest]
#[case(MethodId::Linear)]
#[case(MethodId::Polynomial)]
#[case(MethodId::MovingAverage)]
#[case(MethodId::WeightedMovingAverage)]
#[case(MethodId::ExponentialSmoothing)]
fn test_falling_price_is_floored(#[case] method: MethodId) {
    // Price falls 4 a month from 60 and crosses zero four months after the history ends
    let historical: Vec<SeriesPoint> = noisy_series(3, 12, 200.0, 5.0)
        .into_iter()
        .enumerate()
        .map(|(i, p)| p.with_price(60.0 - 4.0 * i as f64))
        .collect();
    let predicted = forecast(&historical, method, 2024, 2).unwrap();
    assert_eq!(predicted.len(), 12);

    let prices: Vec<f64> = predicted.iter().map(|p| p.price.unwrap()).collect();
    assert!(prices.iter().all(|price| *price >= 0.0));
    assert_eq!(*prices.last().unwrap(), 0.0);
}

#[rstest]
#[case(MethodId::Linear)]
#[case(MethodId::Seasonal)]
#[case(MethodId::HoltWinters)]
#[case(MethodId::Arima)]
fn test_no_op_conditions(#[case] method: MethodId) {
    let start = YearMonth::new(2023, 1).unwrap();

    let short = series_from(start, &[10.0, 20.0]);
    assert!(forecast(&short, method, 2023, 9).unwrap().is_empty());

    let historical = series_from(start, &[10.0, 20.0, 30.0, 40.0]);
    assert!(forecast(&historical, method, 2023, 4).unwrap().is_empty());
    assert!(forecast(&historical, method, 2023, 2).unwrap().is_empty());
}

#[test]
fn test_holt_winters_falls_back_to_exponential_smoothing() {
    let historical = noisy_series(42, 8, 100.0, 3.0);

    let holt_winters = forecast(&historical, MethodId::HoltWinters, 2023, 6).unwrap();
    let smoothing = forecast(&historical, MethodId::ExponentialSmoothing, 2023, 6).unwrap();

    assert!(!holt_winters.is_empty());
    assert_eq!(holt_winters, smoothing);
}

#[test]
fn test_arima_falls_back_to_linear() {
    let historical = series_from(YearMonth::new(2023, 1).unwrap(), &[100.0, 110.0, 120.0]);

    let arima = forecast(&historical, MethodId::Arima, 2023, 6).unwrap();
    let linear = forecast(&historical, MethodId::Linear, 2023, 6).unwrap();

    assert_eq!(arima, linear);
}

#[test]
fn test_fallback_rules_are_explicit() {
    let config = ForecastConfig::default();
    let rules: Vec<(MethodId, MethodId, usize)> = FALLBACK_RULES
        .iter()
        .map(|rule| (rule.method, rule.fallback, rule.min_history(&config)))
        .collect();

    assert_eq!(
        rules,
        vec![
            (MethodId::HoltWinters, MethodId::ExponentialSmoothing, 12),
            (MethodId::Arima, MethodId::Linear, 4),
        ]
    );
}

#[test]
fn test_linear_scenario() {
    let historical = series_from(YearMonth::new(2023, 1).unwrap(), &[100.0, 110.0, 120.0]);
    let predicted = forecast(&historical, MethodId::Linear, 2023, 6).unwrap();

    let months: Vec<(i32, u32)> = predicted.iter().map(|p| (p.year, p.month)).collect();
    assert_eq!(months, vec![(2023, 4), (2023, 5), (2023, 6)]);
    for (point, expected) in predicted.iter().zip([130.0, 140.0, 150.0]) {
        assert_abs_diff_eq!(point.amount, expected, epsilon = 1e-9);
        assert!(point.is_predicted);
    }
}

#[test]
fn test_seasonal_december_spike() {
    let values: Vec<f64> = (1..=12).map(|m| if m == 12 { 200.0 } else { 100.0 }).collect();
    let historical = series_from(YearMonth::new(2023, 1).unwrap(), &values);

    let predicted = forecast(&historical, MethodId::Seasonal, 2024, 12).unwrap();
    assert_eq!(predicted.len(), 12);

    let november = &predicted[10];
    let december = &predicted[11];
    assert_eq!((december.year, december.month), (2024, 12));
    assert!(december.amount > november.amount * 1.5);
}

#[test]
fn test_dual_metric_projection() {
    let start = YearMonth::new(2023, 1).unwrap();
    let historical: Vec<SeriesPoint> = (0..6u32)
        .map(|i| SeriesPoint::historical(start.advance(i), 100.0 + 10.0 * i as f64).with_price(20.0 - i as f64))
        .collect();

    let predicted = forecast(&historical, MethodId::Linear, 2023, 8).unwrap();
    assert_eq!(predicted.len(), 2);

    // amount keeps rising by 10, price keeps falling by 1
    assert_abs_diff_eq!(predicted[0].amount, 160.0, epsilon = 1e-9);
    assert_abs_diff_eq!(predicted[0].price.unwrap(), 14.0, epsilon = 1e-9);

    let changes = predicted[0].changes.unwrap();
    assert_abs_diff_eq!(changes.sales_change, 10.0, epsilon = 1e-9);
    assert_abs_diff_eq!(changes.price_change, -1.0, epsilon = 1e-9);
    assert_abs_diff_eq!(changes.price_change_percent, -100.0 / 15.0, epsilon = 1e-9);

    let combined = combine(&historical, &predicted);
    assert_eq!(combined.len(), 8);
    let first = combined[0].changes.unwrap();
    assert_eq!(first.price_change, 0.0);
    assert_eq!(first.sales_change_percent, 0.0);
    assert_eq!(combined[6].changes, predicted[0].changes);
}

#[test]
fn test_custom_config_changes_window() {
    let historical = series_from(
        YearMonth::new(2023, 1).unwrap(),
        &[10.0, 10.0, 10.0, 10.0, 40.0, 50.0],
    );
    let narrow = Forecaster::new(ForecastConfig {
        moving_average_window: 2,
        ..ForecastConfig::default()
    })
    .unwrap();

    let target = YearMonth::new(2023, 7).unwrap();
    let predicted = narrow.forecast(&historical, MethodId::MovingAverage, target).unwrap();
    // mean 45 plus slope 10
    assert_abs_diff_eq!(predicted[0].amount, 55.0, epsilon = 1e-9);
}
