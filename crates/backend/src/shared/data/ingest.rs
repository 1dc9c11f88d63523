use chrono::{Datelike, NaiveDate};
use contracts::dashboards::d402_sales_performance::FactRow;
use contracts::enums::{Product, Region};
use serde::Deserialize;
use std::collections::HashSet;
use thiserror::Error;

use super::dataset::{FactTable, COST_RATIO_RANGE, REVENUE_RANGE, UNITS_RANGE};
use super::source::SourceError;

/// Columns every external source must provide
pub const REQUIRED_COLUMNS: [&str; 6] = ["date", "region", "product", "revenue", "cost", "units_sold"];

/// Why a source row was kept out of the fact table
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RejectReason {
    #[error("malformed record: {0}")]
    Malformed(String),

    #[error("missing field: {0}")]
    MissingField(&'static str),

    #[error("unknown region: {0}")]
    UnknownRegion(String),

    #[error("unknown product: {0}")]
    UnknownProduct(String),

    #[error("invalid date {0:?}, expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("date {0} is not the last day of its month")]
    NotMonthEnd(NaiveDate),

    #[error("invalid {field}: {value:?}")]
    InvalidNumber { field: &'static str, value: String },

    #[error("revenue {0} outside [{min}, {max})", min = REVENUE_RANGE.start, max = REVENUE_RANGE.end)]
    RevenueOutOfRange(i64),

    #[error("cost {cost} is not {min}..{max} of revenue {revenue}", min = COST_RATIO_RANGE.start, max = COST_RATIO_RANGE.end)]
    CostRatioOutOfRange { cost: f64, revenue: i64 },

    #[error("units_sold {0} outside [{min}, {max})", min = UNITS_RANGE.start, max = UNITS_RANGE.end)]
    UnitsOutOfRange(i64),

    #[error("duplicate row for {month} / {region} / {product}")]
    DuplicateKey {
        month: String,
        region: Region,
        product: Product,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct RowRejection {
    /// 1-based line in the source file
    pub line: u64,
    pub reason: RejectReason,
}

/// Result of ingesting an external source
#[derive(Debug)]
pub struct IngestReport {
    pub table: FactTable,
    pub rejected: Vec<RowRejection>,
}

#[derive(Debug, Deserialize)]
struct RawRecord {
    date: Option<String>,
    region: Option<String>,
    product: Option<String>,
    revenue: Option<String>,
    cost: Option<String>,
    units_sold: Option<String>,
}

/// Parse CSV text into a fact table.
///
/// Rows violating the schema or the value domains of the synthetic table are
/// skipped and reported; only a missing header
/// or an unreadable stream fails the whole ingestion.
pub fn ingest_csv<R: std::io::Read>(input: R) -> Result<IngestReport, SourceError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(input);

    let headers = reader.headers()?.clone();
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|col| !headers.iter().any(|h| h == **col))
        .map(|col| col.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(SourceError::MissingColumns(missing));
    }

    let mut rows = Vec::new();
    let mut rejected = Vec::new();
    let mut seen = HashSet::new();

    for (index, result) in reader.records().enumerate() {
        // header is line 1
        let fallback_line = index as u64 + 2;
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                rejected.push(RowRejection {
                    line: fallback_line,
                    reason: RejectReason::Malformed(e.to_string()),
                });
                continue;
            }
        };
        let line = record.position().map(|p| p.line()).unwrap_or(fallback_line);

        let parsed = record
            .deserialize::<RawRecord>(Some(&headers))
            .map_err(|e| RejectReason::Malformed(e.to_string()))
            .and_then(validate);

        match parsed {
            Ok(row) => {
                let key = (row.month.clone(), row.region, row.product);
                if seen.insert(key) {
                    rows.push(row);
                } else {
                    rejected.push(RowRejection {
                        line,
                        reason: RejectReason::DuplicateKey {
                            month: row.month,
                            region: row.region,
                            product: row.product,
                        },
                    });
                }
            }
            Err(reason) => rejected.push(RowRejection { line, reason }),
        }
    }

    Ok(IngestReport {
        table: FactTable::from_rows(rows),
        rejected,
    })
}

fn validate(raw: RawRecord) -> Result<FactRow, RejectReason> {
    let date_str = required(raw.date, "date")?;
    let date = NaiveDate::parse_from_str(&date_str, "%Y-%m-%d")
        .map_err(|_| RejectReason::InvalidDate(date_str.clone()))?;
    if !is_month_end(date) {
        return Err(RejectReason::NotMonthEnd(date));
    }

    let region_str = required(raw.region, "region")?;
    let region = Region::from_name(&region_str).ok_or(RejectReason::UnknownRegion(region_str))?;

    let product_str = required(raw.product, "product")?;
    let product =
        Product::from_name(&product_str).ok_or(RejectReason::UnknownProduct(product_str))?;

    let revenue = parse_integer(required(raw.revenue, "revenue")?, "revenue")?;
    let cost_str = required(raw.cost, "cost")?;
    let cost = cost_str
        .parse::<f64>()
        .ok()
        .filter(|c| c.is_finite())
        .ok_or(RejectReason::InvalidNumber {
            field: "cost",
            value: cost_str,
        })?;
    let units_sold = parse_integer(required(raw.units_sold, "units_sold")?, "units_sold")?;

    if !REVENUE_RANGE.contains(&revenue) {
        return Err(RejectReason::RevenueOutOfRange(revenue));
    }
    if !COST_RATIO_RANGE.contains(&(cost / revenue as f64)) {
        return Err(RejectReason::CostRatioOutOfRange { cost, revenue });
    }
    if !UNITS_RANGE.contains(&units_sold) {
        return Err(RejectReason::UnitsOutOfRange(units_sold));
    }

    Ok(FactRow::new(date, region, product, revenue, cost, units_sold))
}

fn is_month_end(date: NaiveDate) -> bool {
    date.succ_opt().map_or(true, |next| next.month() != date.month())
}

fn required(value: Option<String>, field: &'static str) -> Result<String, RejectReason> {
    value
        .filter(|v| !v.is_empty())
        .ok_or(RejectReason::MissingField(field))
}

/// Integer column; whole-valued decimals like "1200.0" are accepted.
/// Values outside the `i64` range are rejected, never saturated.
fn parse_integer(value: String, field: &'static str) -> Result<i64, RejectReason> {
    if let Ok(n) = value.parse::<i64>() {
        return Ok(n);
    }
    match value.parse::<f64>() {
        // i64::MAX as f64 rounds up to 2^63, which is itself out of range
        Ok(f) if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 => Ok(f as i64),
        _ => Err(RejectReason::InvalidNumber { field, value }),
    }
}
