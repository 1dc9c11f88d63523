use contracts::dashboards::d402_sales_performance::{
    FactRow, KpiSummary, ProductProfit, RegionProfit, TrendPoint,
};
use contracts::enums::{Product, Region};
use std::collections::BTreeMap;

/// Revenue, profit, mean margin and units over the filtered rows
pub fn kpi_summary(rows: &[&FactRow]) -> KpiSummary {
    if rows.is_empty() {
        return KpiSummary::empty();
    }

    let mut kpis = KpiSummary::empty();
    let mut margin_sum = 0.0;
    for row in rows {
        kpis.total_revenue += row.revenue;
        kpis.total_profit += row.profit;
        kpis.total_units += row.units_sold;
        margin_sum += row.margin;
    }
    kpis.row_count = rows.len();
    kpis.avg_margin = Some(margin_sum / rows.len() as f64);
    kpis
}

/// Revenue and profit per month, ascending ("YYYY-MM" sorts chronologically)
pub fn trend(rows: &[&FactRow]) -> Vec<TrendPoint> {
    let mut by_month: BTreeMap<&str, (i64, f64)> = BTreeMap::new();
    for row in rows {
        let entry = by_month.entry(row.month.as_str()).or_insert((0, 0.0));
        entry.0 += row.revenue;
        entry.1 += row.profit;
    }

    by_month
        .into_iter()
        .map(|(month, (revenue, profit))| TrendPoint {
            month: month.to_string(),
            revenue,
            profit,
        })
        .collect()
}

/// Profit per region in canonical order; absent regions are omitted
pub fn region_profit(rows: &[&FactRow]) -> Vec<RegionProfit> {
    let mut by_region: BTreeMap<Region, f64> = BTreeMap::new();
    for row in rows {
        *by_region.entry(row.region).or_insert(0.0) += row.profit;
    }

    by_region
        .into_iter()
        .map(|(region, profit)| RegionProfit { region, profit })
        .collect()
}

/// Profit per product in canonical order; absent products are omitted
pub fn product_profit(rows: &[&FactRow]) -> Vec<ProductProfit> {
    let mut by_product: BTreeMap<Product, f64> = BTreeMap::new();
    for row in rows {
        *by_product.entry(row.product).or_insert(0.0) += row.profit;
    }

    by_product
        .into_iter()
        .map(|(product, profit)| ProductProfit { product, profit })
        .collect()
}
