use contracts::dashboards::d402_sales_performance::{
    DashboardViews, DataState, DetailSort, FilterSelection, NoDataReason,
};

use super::{aggregate, detail, distribution, filter, insights};
use crate::shared::data::FactTable;

/// All dashboard views for a selection, detail table sorted by profit descending
pub fn compute_views(table: &FactTable, selection: &FilterSelection) -> DashboardViews {
    compute_views_sorted(table, selection, DetailSort::default())
}

/// All dashboard views for a selection with an explicit detail sort.
///
/// An empty subset is not an error: every view comes back empty and `state`
/// says why.
pub fn compute_views_sorted(
    table: &FactTable,
    selection: &FilterSelection,
    sort: DetailSort,
) -> DashboardViews {
    let rows = filter::apply(table, selection);

    let state = match selection.empty_reason() {
        Some(reason) => DataState::NoData { reason },
        None if rows.is_empty() => DataState::NoData {
            reason: NoDataReason::NoMatchingRows,
        },
        None => DataState::Ready {
            row_count: rows.len(),
        },
    };

    let region_profit = aggregate::region_profit(&rows);
    let product_profit = aggregate::product_profit(&rows);
    let insights = insights::derive_insights(&region_profit, &product_profit);

    tracing::debug!(
        "D402 Dashboard: {} of {} rows match {} regions x {} products",
        rows.len(),
        table.len(),
        selection.regions.len(),
        selection.products.len()
    );

    DashboardViews {
        selection: selection.clone(),
        state,
        kpis: aggregate::kpi_summary(&rows),
        trend: aggregate::trend(&rows),
        region_profit,
        product_profit,
        margin_distribution: distribution::margin_distribution(&rows, selection),
        detail_sort: sort,
        detail: detail::sorted_detail(&rows, sort),
        insights,
    }
}
