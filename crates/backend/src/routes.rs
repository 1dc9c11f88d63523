use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::api::handlers;

/// Конфигурация всех роутов приложения
pub fn configure_routes() -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        // ========================================
        // D402 SALES PERFORMANCE DASHBOARD
        // ========================================
        .route(
            "/api/d402/filters",
            get(handlers::d402_sales_performance::get_filter_options),
        )
        .route(
            "/api/d402/views",
            get(handlers::d402_sales_performance::get_views),
        )
        .route(
            "/api/d402/sessions",
            post(handlers::d402_sales_performance::create_session),
        )
        .route(
            "/api/d402/sessions/:id",
            delete(handlers::d402_sales_performance::delete_session),
        )
        .route(
            "/api/d402/sessions/:id/views",
            get(handlers::d402_sales_performance::get_session_views),
        )
        .route(
            "/api/d402/sessions/:id/selection",
            put(handlers::d402_sales_performance::update_selection),
        )
        .route(
            "/api/d402/sessions/:id/export",
            get(handlers::d402_sales_performance::export_session_csv),
        )
        // ========================================
        // BI INDICATORS
        // ========================================
        .route(
            "/api/indicators/meta",
            get(handlers::indicators::get_indicator_catalog),
        )
        .route(
            "/api/indicators/compute",
            post(handlers::indicators::compute_indicators),
        )
}
