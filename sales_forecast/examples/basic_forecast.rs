use sales_forecast::{aggregate, analyze, categories, combine, forecast, CategoryFilter, MethodId, MonthlyRecord};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sales_forecast=info".into()),
        )
        .init();

    println!("Sales Forecast: Basic Example");
    println!("=============================\n");

    let records = create_sample_records();
    println!("Loaded {} records in categories {:?}\n", records.len(), categories(&records));

    let historical = aggregate(&records, &CategoryFilter::Total)?;
    println!("Aggregated {} monthly points", historical.len());

    let predicted = forecast(&historical, MethodId::HoltWinters, 2025, 6)?;
    println!("\nHolt-Winters forecast:");
    for point in &predicted {
        println!(
            "  {}: amount {:.2}, price {}",
            point.period().label(),
            point.amount,
            point.price.map_or("-".to_string(), |p| format!("{:.2}", p))
        );
    }

    let series = combine(&historical, &predicted);
    let report = analyze(&series);

    println!("\n{}", report.seasonal.message);
    if let Some(max) = &report.extremes.max {
        println!("Best month: {}-{:02} with {:.2}", max.year, max.month, max.value);
    }
    if let Some(min) = &report.extremes.min {
        println!("Worst month: {}-{:02} with {:.2}", min.year, min.month, min.value);
    }
    if let Some(correlation) = &report.correlation {
        println!("{}", correlation.message);
    }

    println!("\nReport as JSON:\n{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

/// Two years of sales for two categories with a summer peak
fn create_sample_records() -> Vec<MonthlyRecord> {
    let mut records = Vec::new();
    for year in [2023, 2024] {
        for month in 1..=12u32 {
            let summer = (6..=8).contains(&month);
            let growth = (year - 2023) as f64 * 12.0 + month as f64;

            let shoes = if summer { 320.0 } else { 150.0 } + growth * 2.0;
            let shoe_price = if summer { 45.0 } else { 50.0 };
            records.push(MonthlyRecord::new(year, month, "Shoes", shoes).with_price(shoe_price));

            let hats = 80.0 + growth;
            records.push(MonthlyRecord::new(year, month, "Hats", hats).with_price(20.0));
        }
    }
    records
}
