use axum::{http::StatusCode, Json};
use contracts::shared::indicators::*;

use crate::dashboards::d402_sales_performance::filter;
use crate::shared::data::cache;
use crate::shared::indicators::{metadata, registry::IndicatorRegistry};

/// POST /api/indicators/compute
///
/// Batch-computes KPI cards for the selection in the request context.
pub async fn compute_indicators(
    Json(req): Json<ComputeIndicatorsRequest>,
) -> Result<Json<ComputeIndicatorsResponse>, StatusCode> {
    tracing::info!(
        "Indicators: computing {} indicators for {} regions x {} products",
        req.indicator_ids.len(),
        req.context.selection.regions.len(),
        req.context.selection.products.len(),
    );

    let Some(table) = cache::active() else {
        tracing::error!("Indicators: dataset not loaded");
        return Err(StatusCode::SERVICE_UNAVAILABLE);
    };

    let rows = filter::apply(&table, &req.context.selection);
    let registry = IndicatorRegistry::new();
    let values = registry.compute(&req.indicator_ids, &rows);

    tracing::info!("Indicators: returning {} values", values.len());
    Ok(Json(ComputeIndicatorsResponse { values }))
}

/// GET /api/indicators/meta
///
/// Returns the full catalogue of available indicators and sets.
pub async fn get_indicator_catalog() -> Json<IndicatorCatalogResponse> {
    Json(metadata::build_catalog())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::indicators::metadata::ids;

    #[tokio::test]
    async fn test_compute_for_default_context() {
        cache::install_active(cache::dataset_for_seed(42));

        let req = ComputeIndicatorsRequest {
            indicator_ids: vec![ids::total_revenue(), ids::avg_margin()],
            context: IndicatorContext::default(),
        };
        let Json(response) = compute_indicators(Json(req)).await.unwrap();
        assert_eq!(response.values.len(), 2);
        assert_eq!(response.values[0].id, ids::total_revenue());
        assert!(response.values[0].value.unwrap() > 0.0);
    }

    #[tokio::test]
    async fn test_catalog_lists_kpi_cards() {
        let Json(catalog) = get_indicator_catalog().await;
        assert_eq!(catalog.indicators.len(), 4);
    }
}
