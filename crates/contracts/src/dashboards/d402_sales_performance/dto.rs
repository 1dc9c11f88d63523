use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::enums::{Product, Region};

// ---------------------------------------------------------------------------
// Fact rows
// ---------------------------------------------------------------------------

/// One observed business event for a (month, region, product) combination.
///
/// `profit`, `margin` and `month` are derived by [`FactRow::new`]; every data
/// source goes through it so derivation is identical regardless of origin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactRow {
    /// Last day of the month the event belongs to
    pub date: NaiveDate,
    pub region: Region,
    pub product: Product,
    pub revenue: i64,
    pub cost: f64,
    pub units_sold: i64,
    pub profit: f64,
    /// profit / revenue, fraction (0.31 = 31%)
    pub margin: f64,
    /// Grouping key in format "YYYY-MM"
    pub month: String,
}

impl FactRow {
    pub fn new(
        date: NaiveDate,
        region: Region,
        product: Product,
        revenue: i64,
        cost: f64,
        units_sold: i64,
    ) -> Self {
        let profit = revenue as f64 - cost;
        let margin = if revenue > 0 {
            profit / revenue as f64
        } else {
            0.0
        };
        Self {
            date,
            region,
            product,
            revenue,
            cost,
            units_sold,
            profit,
            margin,
            month: Self::month_key(date),
        }
    }

    /// Format a date as the "YYYY-MM" month key
    pub fn month_key(date: NaiveDate) -> String {
        date.format("%Y-%m").to_string()
    }
}

// ---------------------------------------------------------------------------
// Filter selection
// ---------------------------------------------------------------------------

/// Regions and products chosen by the user. Sets iterate in canonical order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSelection {
    pub regions: BTreeSet<Region>,
    pub products: BTreeSet<Product>,
}

impl Default for FilterSelection {
    fn default() -> Self {
        Self::all()
    }
}

impl FilterSelection {
    /// Full domain on both axes
    pub fn all() -> Self {
        Self {
            regions: Region::all().into_iter().collect(),
            products: Product::all().into_iter().collect(),
        }
    }

    pub fn new(
        regions: impl IntoIterator<Item = Region>,
        products: impl IntoIterator<Item = Product>,
    ) -> Self {
        Self {
            regions: regions.into_iter().collect(),
            products: products.into_iter().collect(),
        }
    }

    pub fn matches(&self, row: &FactRow) -> bool {
        self.regions.contains(&row.region) && self.products.contains(&row.product)
    }

    /// Why this selection can never match anything, if it can't
    pub fn empty_reason(&self) -> Option<NoDataReason> {
        if self.regions.is_empty() {
            Some(NoDataReason::NoRegionsSelected)
        } else if self.products.is_empty() {
            Some(NoDataReason::NoProductsSelected)
        } else {
            None
        }
    }
}

/// Options for the two multi-select inputs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterOptions {
    pub regions: Vec<Region>,
    pub products: Vec<Product>,
    pub default_selection: FilterSelection,
}

impl Default for FilterOptions {
    fn default() -> Self {
        Self {
            regions: Region::all(),
            products: Product::all(),
            default_selection: FilterSelection::all(),
        }
    }
}

// ---------------------------------------------------------------------------
// Views
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoDataReason {
    NoRegionsSelected,
    NoProductsSelected,
    NoMatchingRows,
}

impl NoDataReason {
    pub fn message(&self) -> &'static str {
        match self {
            NoDataReason::NoRegionsSelected => "No regions selected",
            NoDataReason::NoProductsSelected => "No products selected",
            NoDataReason::NoMatchingRows => "No data for the current selection",
        }
    }
}

/// Whether the views carry data or are an explicit empty rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DataState {
    Ready { row_count: usize },
    NoData { reason: NoDataReason },
}

impl DataState {
    pub fn no_data_reason(&self) -> Option<NoDataReason> {
        match self {
            DataState::NoData { reason } => Some(*reason),
            DataState::Ready { .. } => None,
        }
    }
}

/// Scalar KPIs over the filtered subset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiSummary {
    pub total_revenue: i64,
    pub total_profit: f64,
    /// `None` when the subset is empty (rendered "N/A")
    pub avg_margin: Option<f64>,
    pub total_units: i64,
    pub row_count: usize,
}

impl KpiSummary {
    pub fn empty() -> Self {
        Self {
            total_revenue: 0,
            total_profit: 0.0,
            avg_margin: None,
            total_units: 0,
            row_count: 0,
        }
    }

    pub fn avg_margin_label(&self) -> String {
        match self.avg_margin {
            Some(m) => format!("{:.1}%", m * 100.0),
            None => "N/A".to_string(),
        }
    }
}

/// One point of the revenue/profit trend line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    /// "YYYY-MM"
    pub month: String,
    pub revenue: i64,
    pub profit: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionProfit {
    pub region: Region,
    pub profit: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductProfit {
    pub product: Product,
    pub profit: f64,
}

/// Box-plot summary of a margin sample
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxSummary {
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
    /// Smallest value within q1 - 1.5 * IQR
    pub lower_whisker: f64,
    /// Largest value within q3 + 1.5 * IQR
    pub upper_whisker: f64,
    pub outliers: Vec<f64>,
}

/// Margin values of one product. Empty when the product has no matching rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarginDistribution {
    pub product: Product,
    pub values: Vec<f64>,
    pub summary: Option<BoxSummary>,
}

/// The three text slots of the dashboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insights {
    pub best_region: Option<RegionProfit>,
    pub worst_product: Option<ProductProfit>,
    pub best_region_text: String,
    pub worst_product_text: String,
    pub recommendation: String,
}

/// Sortable columns of the detail table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetailColumn {
    Date,
    Region,
    Product,
    Revenue,
    Cost,
    UnitsSold,
    Profit,
    Margin,
}

impl DetailColumn {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "date" => Some(DetailColumn::Date),
            "region" => Some(DetailColumn::Region),
            "product" => Some(DetailColumn::Product),
            "revenue" => Some(DetailColumn::Revenue),
            "cost" => Some(DetailColumn::Cost),
            "units_sold" | "units" => Some(DetailColumn::UnitsSold),
            "profit" => Some(DetailColumn::Profit),
            "margin" => Some(DetailColumn::Margin),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailSort {
    pub column: DetailColumn,
    pub descending: bool,
}

impl Default for DetailSort {
    /// Most profitable rows first
    fn default() -> Self {
        Self {
            column: DetailColumn::Profit,
            descending: true,
        }
    }
}

/// Everything the dashboard renders for one selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardViews {
    pub selection: FilterSelection,
    pub state: DataState,
    pub kpis: KpiSummary,
    /// Ascending by month
    pub trend: Vec<TrendPoint>,
    /// Canonical region order, only regions present in the subset
    pub region_profit: Vec<RegionProfit>,
    /// Canonical product order, only products present in the subset
    pub product_profit: Vec<ProductProfit>,
    /// One entry per selected product, canonical order
    pub margin_distribution: Vec<MarginDistribution>,
    pub detail_sort: DetailSort,
    pub detail: Vec<FactRow>,
    pub insights: Insights,
}

// ---------------------------------------------------------------------------
// API request / response
// ---------------------------------------------------------------------------

/// Body of PUT /api/d402/sessions/:id/selection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateSelectionRequest {
    pub selection: FilterSelection,
    /// Keeps the session's current sort when absent
    #[serde(default)]
    pub sort: Option<DetailSort>,
}

/// Response of POST /api/d402/sessions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionCreated {
    pub session_id: String,
    pub views: DashboardViews,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_fact_row_derivation() {
        let row = FactRow::new(date(2023, 2, 28), Region::East, Product::ProductB, 20000, 14000.0, 300);
        assert_eq!(row.profit, 6000.0);
        assert!((row.margin - 0.3).abs() < 1e-12);
        assert_eq!(row.month, "2023-02");
    }

    #[test]
    fn test_zero_revenue_margin_is_finite() {
        let row = FactRow::new(date(2023, 1, 31), Region::North, Product::ProductA, 0, 0.0, 0);
        assert_eq!(row.margin, 0.0);
    }

    #[test]
    fn test_selection_empty_reason() {
        assert_eq!(FilterSelection::all().empty_reason(), None);
        let no_regions = FilterSelection::new([], Product::all());
        assert_eq!(no_regions.empty_reason(), Some(NoDataReason::NoRegionsSelected));
        let no_products = FilterSelection::new([Region::South], []);
        assert_eq!(no_products.empty_reason(), Some(NoDataReason::NoProductsSelected));
    }

    #[test]
    fn test_avg_margin_label() {
        let mut kpis = KpiSummary::empty();
        assert_eq!(kpis.avg_margin_label(), "N/A");
        kpis.avg_margin = Some(0.3141);
        assert_eq!(kpis.avg_margin_label(), "31.4%");
    }

    #[test]
    fn test_data_state_serialization() {
        let state = DataState::NoData {
            reason: NoDataReason::NoRegionsSelected,
        };
        let json = serde_json::to_value(state).unwrap();
        assert_eq!(json["kind"], "no_data");
        assert_eq!(json["reason"], "no_regions_selected");
    }
}
