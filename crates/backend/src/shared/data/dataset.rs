use chrono::NaiveDate;
use contracts::dashboards::d402_sales_performance::FactRow;
use contracts::enums::{Product, Region};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::ops::Range;

/// First month of the synthetic table
pub const START_YEAR: i32 = 2023;
pub const START_MONTH: u32 = 1;
/// Number of consecutive months
pub const MONTHS: u32 = 18;

pub const REVENUE_RANGE: Range<i64> = 15_000..50_000;
pub const COST_RATIO_RANGE: Range<f64> = 0.55..0.8;
pub const UNITS_RANGE: Range<i64> = 200..800;

/// Immutable fact table. Shared read-only between sessions behind an `Arc`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FactTable {
    rows: Vec<FactRow>,
}

impl FactTable {
    pub fn from_rows(rows: Vec<FactRow>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[FactRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Build the synthetic table from a seed.
///
/// Same seed, same table: every draw comes from one `StdRng`.
pub fn build_dataset(seed: u64) -> FactTable {
    let mut rng = StdRng::seed_from_u64(seed);
    let table = build_dataset_with(&mut rng);
    tracing::debug!("Dataset: built {} rows for seed {}", table.len(), seed);
    table
}

/// Build the synthetic table from an explicit generator.
///
/// Rows are produced month by month, then region, then product; each row
/// draws revenue, cost ratio and units in that order.
pub fn build_dataset_with<R: Rng + ?Sized>(rng: &mut R) -> FactTable {
    let regions = Region::all();
    let products = Product::all();
    let dates = month_ends(START_YEAR, START_MONTH, MONTHS);

    let mut rows = Vec::with_capacity(dates.len() * regions.len() * products.len());
    for date in dates {
        for region in &regions {
            for product in &products {
                let revenue = rng.gen_range(REVENUE_RANGE);
                let cost_ratio = rng.gen_range(COST_RATIO_RANGE);
                let units_sold = rng.gen_range(UNITS_RANGE);

                let cost = revenue as f64 * cost_ratio;
                rows.push(FactRow::new(date, *region, *product, revenue, cost, units_sold));
            }
        }
    }

    FactTable::from_rows(rows)
}

/// Last day of `count` consecutive months starting at (`year`, `month`)
pub fn month_ends(year: i32, month: u32, count: u32) -> Vec<NaiveDate> {
    (0..count)
        .filter_map(|offset| {
            let index = month - 1 + offset;
            month_end(year + (index / 12) as i32, index % 12 + 1)
        })
        .collect()
}

fn month_end(year: i32, month: u32) -> Option<NaiveDate> {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)?.pred_opt()
}
