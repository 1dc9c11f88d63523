use contracts::dashboards::d402_sales_performance::FactRow;
use contracts::shared::indicators::*;
use std::collections::BTreeMap;

use crate::shared::indicators::metadata::ids;

// ---------------------------------------------------------------------------
// Internal aggregation row
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct SalesAgg {
    total_revenue: f64,
    total_profit: f64,
    margin_sum: f64,
    total_units: f64,
    row_count: usize,
}

impl SalesAgg {
    fn push(&mut self, row: &FactRow) {
        self.total_revenue += row.revenue as f64;
        self.total_profit += row.profit;
        self.margin_sum += row.margin;
        self.total_units += row.units_sold as f64;
        self.row_count += 1;
    }

    fn revenue(&self) -> Option<f64> {
        Some(self.total_revenue)
    }

    fn profit(&self) -> Option<f64> {
        Some(self.total_profit)
    }

    /// Mean of row margins; undefined over zero rows
    fn avg_margin(&self) -> Option<f64> {
        if self.row_count > 0 {
            Some(self.margin_sum / self.row_count as f64)
        } else {
            None
        }
    }

    fn units(&self) -> Option<f64> {
        Some(self.total_units)
    }
}

fn fetch_agg(rows: &[&FactRow]) -> SalesAgg {
    let mut agg = SalesAgg::default();
    for row in rows {
        agg.push(row);
    }
    agg
}

/// Aggregates per month, ascending by "YYYY-MM"
fn fetch_monthly(rows: &[&FactRow]) -> BTreeMap<String, SalesAgg> {
    let mut months: BTreeMap<String, SalesAgg> = BTreeMap::new();
    for row in rows {
        months.entry(row.month.clone()).or_default().push(row);
    }
    months
}

fn pct_change(cur: f64, prev: f64) -> Option<f64> {
    if prev.abs() < 0.01 {
        None
    } else {
        Some(((cur - prev) / prev.abs()) * 100.0)
    }
}

fn status_by_change(change: Option<f64>, higher_is_good: bool) -> IndicatorStatus {
    match change {
        Some(c) if c > 5.0 => {
            if higher_is_good {
                IndicatorStatus::Good
            } else {
                IndicatorStatus::Bad
            }
        }
        Some(c) if c < -5.0 => {
            if higher_is_good {
                IndicatorStatus::Bad
            } else {
                IndicatorStatus::Good
            }
        }
        _ => IndicatorStatus::Neutral,
    }
}

/// Whole-selection value plus latest-vs-previous month comparison
fn build_value(
    id: IndicatorId,
    rows: &[&FactRow],
    extract: fn(&SalesAgg) -> Option<f64>,
) -> IndicatorValue {
    if rows.is_empty() {
        return IndicatorValue {
            id,
            value: extract(&SalesAgg::default()),
            latest_month_value: None,
            previous_month_value: None,
            change_percent: None,
            status: IndicatorStatus::Neutral,
            subtitle: Some("No data".into()),
        };
    }

    let total = fetch_agg(rows);
    let monthly = fetch_monthly(rows);
    let mut recent = monthly.iter().rev();
    let latest = recent.next();
    let previous = recent.next();

    let latest_month_value = latest.and_then(|(_, agg)| extract(agg));
    let previous_month_value = previous.and_then(|(_, agg)| extract(agg));
    let change = match (latest_month_value, previous_month_value) {
        (Some(cur), Some(prev)) => pct_change(cur, prev),
        _ => None,
    };
    let subtitle = match (change, previous) {
        (Some(c), Some((month, _))) => Some(format!("{c:+.1}% vs {month}")),
        _ => None,
    };

    IndicatorValue {
        id,
        value: extract(&total),
        latest_month_value,
        previous_month_value,
        change_percent: change,
        status: status_by_change(change, true),
        subtitle,
    }
}

// ---------------------------------------------------------------------------
// Public compute functions
// ---------------------------------------------------------------------------

pub fn compute_total_revenue(rows: &[&FactRow]) -> IndicatorValue {
    build_value(ids::total_revenue(), rows, SalesAgg::revenue)
}

pub fn compute_total_profit(rows: &[&FactRow]) -> IndicatorValue {
    build_value(ids::total_profit(), rows, SalesAgg::profit)
}

pub fn compute_avg_margin(rows: &[&FactRow]) -> IndicatorValue {
    build_value(ids::avg_margin(), rows, SalesAgg::avg_margin)
}

pub fn compute_total_units(rows: &[&FactRow]) -> IndicatorValue {
    build_value(ids::total_units(), rows, SalesAgg::units)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use contracts::enums::{Product, Region};

    fn row(month: u32, revenue: i64, cost: f64, units: i64) -> FactRow {
        let date = NaiveDate::from_ymd_opt(2023, month, 28).unwrap();
        FactRow::new(date, Region::North, Product::ProductA, revenue, cost, units)
    }

    #[test]
    fn test_revenue_with_month_over_month_change() {
        let rows = vec![row(1, 10_000, 6_000.0, 100), row(2, 12_000, 7_000.0, 120)];
        let refs: Vec<&FactRow> = rows.iter().collect();

        let value = compute_total_revenue(&refs);
        assert_eq!(value.value, Some(22_000.0));
        assert_eq!(value.latest_month_value, Some(12_000.0));
        assert_eq!(value.previous_month_value, Some(10_000.0));
        assert!((value.change_percent.unwrap() - 20.0).abs() < 1e-9);
        assert_eq!(value.status, IndicatorStatus::Good);
        assert_eq!(value.subtitle.as_deref(), Some("+20.0% vs 2023-01"));
    }

    #[test]
    fn test_single_month_has_no_change() {
        let rows = vec![row(3, 10_000, 6_000.0, 100)];
        let refs: Vec<&FactRow> = rows.iter().collect();

        let value = compute_total_units(&refs);
        assert_eq!(value.value, Some(100.0));
        assert_eq!(value.change_percent, None);
        assert_eq!(value.status, IndicatorStatus::Neutral);
    }

    #[test]
    fn test_empty_selection() {
        let refs: Vec<&FactRow> = Vec::new();

        let revenue = compute_total_revenue(&refs);
        assert_eq!(revenue.value, Some(0.0));
        assert_eq!(revenue.subtitle.as_deref(), Some("No data"));

        let margin = compute_avg_margin(&refs);
        assert_eq!(margin.value, None);
    }

    #[test]
    fn test_avg_margin_is_mean_of_row_margins() {
        let rows = vec![row(1, 10_000, 8_000.0, 1), row(1, 20_000, 10_000.0, 1)];
        let refs: Vec<&FactRow> = rows.iter().collect();

        let value = compute_avg_margin(&refs);
        assert!((value.value.unwrap() - 0.35).abs() < 1e-12);
    }

    #[test]
    fn test_profit_drop_is_bad() {
        let rows = vec![row(1, 10_000, 5_000.0, 1), row(2, 10_000, 8_000.0, 1)];
        let refs: Vec<&FactRow> = rows.iter().collect();

        let value = compute_total_profit(&refs);
        assert_eq!(value.status, IndicatorStatus::Bad);
    }
}
