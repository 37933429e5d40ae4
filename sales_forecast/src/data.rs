//! Monthly records, series points and the aggregation that turns one into the other

use crate::calendar::YearMonth;
use crate::error::{ForecastError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// Name of the filter that sums every category
pub const TOTAL_CATEGORY: &str = "Total";

/// One raw business record for a month and category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyRecord {
    pub year: i32,
    pub month: u32,
    pub category: String,
    pub amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
}

impl MonthlyRecord {
    pub fn new(year: i32, month: u32, category: impl Into<String>, amount: f64) -> Self {
        Self {
            year,
            month,
            category: category.into(),
            amount,
            price: None,
        }
    }

    /// Attach an average price to the record
    pub fn with_price(mut self, price: f64) -> Self {
        self.price = Some(price);
        self
    }

    /// Validated month of the record
    pub fn period(&self) -> Result<YearMonth> {
        YearMonth::new(self.year, self.month).map_err(|_| {
            ForecastError::DataError(format!(
                "Record for {} has invalid month {} in year {}",
                self.category, self.month, self.year
            ))
        })
    }
}

/// Change of both metrics relative to the preceding point of a series
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointChanges {
    pub price_change: f64,
    pub sales_change: f64,
    pub price_change_percent: f64,
    pub sales_change_percent: f64,
}

impl PointChanges {
    /// Changes going from `previous` to `current`; percentages are zero when
    /// the previous value is zero
    pub fn between(previous: &SeriesPoint, current: &SeriesPoint) -> Self {
        let prev_price = previous.price.unwrap_or(0.0);
        let price_change = current.price.unwrap_or(0.0) - prev_price;
        let sales_change = current.amount - previous.amount;

        Self {
            price_change,
            sales_change,
            price_change_percent: percent_of(price_change, prev_price),
            sales_change_percent: percent_of(sales_change, previous.amount),
        }
    }
}

fn percent_of(change: f64, base: f64) -> f64 {
    if base == 0.0 {
        0.0
    } else {
        change / base.abs() * 100.0
    }
}

/// One month of a historical or predicted series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesPoint {
    pub year: i32,
    pub month: u32,
    pub amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub is_predicted: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub changes: Option<PointChanges>,
}

impl SeriesPoint {
    /// A historical point
    pub fn historical(period: YearMonth, amount: f64) -> Self {
        Self {
            year: period.year(),
            month: period.month(),
            amount,
            price: None,
            category: None,
            is_predicted: false,
            changes: None,
        }
    }

    /// A predicted point
    pub fn predicted(period: YearMonth, amount: f64) -> Self {
        Self {
            is_predicted: true,
            ..Self::historical(period, amount)
        }
    }

    pub fn with_price(mut self, price: f64) -> Self {
        self.price = Some(price);
        self
    }

    pub fn with_category(mut self, category: Option<String>) -> Self {
        self.category = category;
        self
    }

    /// Month of the point
    pub fn period(&self) -> YearMonth {
        YearMonth::normalized(self.year, self.month)
    }
}

/// Which records feed an aggregated series
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    /// Sum across every category
    #[default]
    Total,
    /// Only records whose category matches exactly
    Category(String),
}

impl CategoryFilter {
    pub fn matches(&self, category: &str) -> bool {
        match self {
            CategoryFilter::Total => true,
            CategoryFilter::Category(name) => name == category,
        }
    }

    /// Category tag carried by points aggregated under this filter
    pub fn tag(&self) -> Option<String> {
        match self {
            CategoryFilter::Total => None,
            CategoryFilter::Category(name) => Some(name.clone()),
        }
    }
}

impl From<&str> for CategoryFilter {
    fn from(name: &str) -> Self {
        if name == TOTAL_CATEGORY {
            CategoryFilter::Total
        } else {
            CategoryFilter::Category(name.to_string())
        }
    }
}

/// Data loader for monthly records
#[derive(Debug)]
pub struct DataLoader;

impl DataLoader {
    /// Load records from a CSV file with `year,month,category,amount[,price]` columns
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<Vec<MonthlyRecord>> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    /// Load records from any CSV source
    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<MonthlyRecord>> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut records = Vec::new();
        for row in csv_reader.deserialize() {
            let record: MonthlyRecord = row?;
            record.period()?;
            records.push(record);
        }

        debug!(records = records.len(), "loaded monthly records");
        Ok(records)
    }
}

#[derive(Default)]
struct MonthBucket {
    amount: f64,
    price_sum: f64,
    price_count: usize,
}

/// Group records into one point per month.
///
/// Records are ordered by month, then the chronologically first and last
/// records are dropped because boundary months are assumed incomplete.
/// The survivors that pass `filter` are summed per month; prices are
/// averaged over the records that carry one.
pub fn aggregate(records: &[MonthlyRecord], filter: &CategoryFilter) -> Result<Vec<SeriesPoint>> {
    let mut ordered = records
        .iter()
        .map(|record| record.period().map(|period| (period, record)))
        .collect::<Result<Vec<_>>>()?;
    // stable, so records of the same month keep their input order
    ordered.sort_by_key(|(period, _)| *period);

    if ordered.len() <= 2 {
        debug!(records = ordered.len(), "no records left after boundary trimming");
        return Ok(Vec::new());
    }
    let interior = &ordered[1..ordered.len() - 1];

    let mut buckets: BTreeMap<YearMonth, MonthBucket> = BTreeMap::new();
    for (period, record) in interior {
        if !filter.matches(&record.category) {
            continue;
        }
        let bucket = buckets.entry(*period).or_default();
        bucket.amount += record.amount;
        if let Some(price) = record.price {
            bucket.price_sum += price;
            bucket.price_count += 1;
        }
    }

    let tag = filter.tag();
    let points: Vec<SeriesPoint> = buckets
        .into_iter()
        .map(|(period, bucket)| {
            let mut point = SeriesPoint::historical(period, bucket.amount).with_category(tag.clone());
            if bucket.price_count > 0 {
                point.price = Some(bucket.price_sum / bucket.price_count as f64);
            }
            point
        })
        .collect();

    debug!(
        records = records.len(),
        dropped = 2,
        months = points.len(),
        filter = ?filter,
        "aggregated monthly series"
    );
    Ok(points)
}

/// Sorted distinct category names present in `records`
pub fn categories(records: &[MonthlyRecord]) -> Vec<String> {
    records
        .iter()
        .map(|r| r.category.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// True when every point of a non-empty series carries a price
pub fn is_dual_metric(points: &[SeriesPoint]) -> bool {
    !points.is_empty() && points.iter().all(|p| p.price.is_some())
}

/// True when the series has historical points and every one of them
/// carries a price; predicted points are not considered
pub fn has_price_history(points: &[SeriesPoint]) -> bool {
    let mut historical = points.iter().filter(|p| !p.is_predicted).peekable();
    historical.peek().is_some() && historical.all(|p| p.price.is_some())
}

/// Fill [`PointChanges`] on every point from its predecessor.
///
/// The first point has no predecessor and gets all-zero changes.
pub fn annotate_changes(points: &mut [SeriesPoint]) {
    if let Some(first) = points.first_mut() {
        first.changes = Some(PointChanges::default());
    }
    for i in 1..points.len() {
        let changes = PointChanges::between(&points[i - 1], &points[i]);
        points[i].changes = Some(changes);
    }
}

/// Historical points followed by predicted points.
///
/// When every point carries a price the change annotations are
/// recomputed across the whole combined sequence. When only the
/// historical points are priced (the price projection was skipped) just
/// the historical prefix is annotated.
pub fn combine(historical: &[SeriesPoint], predicted: &[SeriesPoint]) -> Vec<SeriesPoint> {
    let mut combined: Vec<SeriesPoint> = historical.iter().chain(predicted).cloned().collect();
    if is_dual_metric(&combined) {
        annotate_changes(&mut combined);
    } else if is_dual_metric(historical) {
        annotate_changes(&mut combined[..historical.len()]);
    }
    combined
}

/// Inclusive slice `[lo, hi]` of a series
pub fn window(series: &[SeriesPoint], lo: usize, hi: usize) -> Result<&[SeriesPoint]> {
    if lo > hi || hi >= series.len() {
        return Err(ForecastError::InvalidParameter(format!(
            "Window [{}, {}] is outside a series of {} points",
            lo,
            hi,
            series.len()
        )));
    }
    Ok(&series[lo..=hi])
}
