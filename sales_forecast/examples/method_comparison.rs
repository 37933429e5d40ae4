use sales_forecast::metrics::rank_methods;
use sales_forecast::{aggregate, CategoryFilter, ForecastConfig, Forecaster, MonthlyRecord};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sales_forecast=warn".into()),
        )
        .init();

    println!("Sales Forecast: Method Comparison");
    println!("=================================\n");

    let records: Vec<MonthlyRecord> = (0..36u32)
        .map(|i| {
            let year = 2022 + (i / 12) as i32;
            let month = i % 12 + 1;
            let seasonal = if month == 12 { 180.0 } else { 0.0 };
            MonthlyRecord::new(year, month, "Toys", 400.0 + i as f64 * 6.0 + seasonal)
        })
        .collect();

    let historical = aggregate(&records, &CategoryFilter::Category("Toys".to_string()))?;

    let config = ForecastConfig {
        moving_average_window: 4,
        ..ForecastConfig::default()
    };
    let forecaster = Forecaster::new(config)?;

    let holdout = 6;
    println!("Backtesting the last {} of {} months\n", holdout, historical.len());
    println!("{:<26} {:>10} {:>10} {:>10}", "Method", "MAE", "RMSE", "MAPE %");

    for report in rank_methods(&forecaster, &historical, holdout)? {
        let name = if report.effective_method == report.method {
            report.method.to_string()
        } else {
            format!("{} (as {})", report.method, report.effective_method)
        };
        println!(
            "{:<26} {:>10.2} {:>10.2} {:>10.2}",
            name,
            report.metrics.mae,
            report.metrics.rmse,
            report.metrics.mape
        );
    }

    Ok(())
}
