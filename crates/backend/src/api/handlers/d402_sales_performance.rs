use axum::{
    extract::{Path, Query},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use contracts::dashboards::d402_sales_performance::{
    DashboardViews, DetailColumn, DetailSort, FilterOptions, SessionCreated, UpdateSelectionRequest,
};
use once_cell::sync::Lazy;
use serde::Deserialize;
use std::sync::Arc;
use thiserror::Error;

use crate::dashboards::d402_sales_performance::{
    detail, filter, service, DashboardSession, SessionStore,
};
use crate::shared::data::{cache, FactTable};

static SESSIONS: Lazy<SessionStore> = Lazy::new(SessionStore::new);

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("session {0} not found")]
    SessionNotFound(String),

    #[error(transparent)]
    BadFilter(#[from] filter::FilterParseError),

    #[error("unknown sort column: {0}")]
    BadSortColumn(String),

    #[error("dataset not loaded")]
    DatasetNotLoaded,

    #[error("export failed: {0}")]
    Export(#[from] anyhow::Error),
}

impl DashboardError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            DashboardError::SessionNotFound(_) => StatusCode::NOT_FOUND,
            DashboardError::BadFilter(_) | DashboardError::BadSortColumn(_) => {
                StatusCode::BAD_REQUEST
            }
            DashboardError::DatasetNotLoaded => StatusCode::SERVICE_UNAVAILABLE,
            DashboardError::Export(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<DashboardError> for StatusCode {
    fn from(e: DashboardError) -> Self {
        if e.status_code().is_server_error() {
            tracing::error!("D402 Dashboard: {}", e);
        } else {
            tracing::warn!("D402 Dashboard: {}", e);
        }
        e.status_code()
    }
}

/// Query of GET /api/d402/views
#[derive(Debug, Default, Deserialize)]
pub struct ViewsQuery {
    pub regions: Option<String>,
    pub products: Option<String>,
    pub sort: Option<String>,
    pub descending: Option<bool>,
}

impl ViewsQuery {
    fn detail_sort(&self) -> Result<DetailSort, DashboardError> {
        let default = DetailSort::default();
        let column = match self.sort.as_deref() {
            None => default.column,
            Some(name) => DetailColumn::from_name(name)
                .ok_or_else(|| DashboardError::BadSortColumn(name.to_string()))?,
        };
        Ok(DetailSort {
            column,
            descending: self.descending.unwrap_or(default.descending),
        })
    }
}

fn active_dataset() -> Result<Arc<FactTable>, DashboardError> {
    cache::active().ok_or(DashboardError::DatasetNotLoaded)
}

fn session(session_id: &str) -> Result<DashboardSession, DashboardError> {
    SESSIONS
        .get(session_id)
        .ok_or_else(|| DashboardError::SessionNotFound(session_id.to_string()))
}

fn views_for_query(table: &FactTable, query: &ViewsQuery) -> Result<DashboardViews, DashboardError> {
    let selection =
        filter::selection_from_params(query.regions.as_deref(), query.products.as_deref())?;
    let sort = query.detail_sort()?;
    Ok(service::compute_views_sorted(table, &selection, sort))
}

/// Drop dashboard sessions idle for longer than `max_idle`
pub fn cleanup_idle_sessions(max_idle: chrono::Duration) -> usize {
    let removed = SESSIONS.cleanup_idle_sessions(max_idle);
    if removed > 0 {
        tracing::info!(
            "D402 Dashboard: Expired {} idle sessions ({} open)",
            removed,
            SESSIONS.len()
        );
    }
    removed
}

/// GET /api/d402/filters
pub async fn get_filter_options() -> Json<FilterOptions> {
    Json(FilterOptions::default())
}

/// GET /api/d402/views?regions=North,South&products=Product%20A&sort=revenue&descending=false
///
/// Stateless: absent `regions`/`products` select everything, empty ones select nothing.
pub async fn get_views(Query(query): Query<ViewsQuery>) -> Result<Json<DashboardViews>, StatusCode> {
    let table = active_dataset()?;
    let views = views_for_query(&table, &query)?;

    tracing::info!(
        "D402 Dashboard: Returning views for {} rows ({} detail)",
        table.len(),
        views.detail.len()
    );
    Ok(Json(views))
}

/// POST /api/d402/sessions
pub async fn create_session() -> Result<Json<SessionCreated>, StatusCode> {
    let table = active_dataset()?;
    let session = SESSIONS.create(table);
    let views = session.views();

    tracing::info!(
        "D402 Dashboard: Created session {} ({} open)",
        session.id,
        SESSIONS.len()
    );
    Ok(Json(SessionCreated {
        session_id: session.id,
        views,
    }))
}

/// GET /api/d402/sessions/:id/views
pub async fn get_session_views(
    Path(session_id): Path<String>,
) -> Result<Json<DashboardViews>, StatusCode> {
    let session = session(&session_id)?;
    Ok(Json(session.views()))
}

/// PUT /api/d402/sessions/:id/selection
pub async fn update_selection(
    Path(session_id): Path<String>,
    Json(request): Json<UpdateSelectionRequest>,
) -> Result<Json<DashboardViews>, StatusCode> {
    tracing::info!(
        "D402 Dashboard: Session {} selects {} regions, {} products",
        session_id,
        request.selection.regions.len(),
        request.selection.products.len()
    );

    let session = SESSIONS
        .update_selection(&session_id, request.selection, request.sort)
        .ok_or_else(|| DashboardError::SessionNotFound(session_id.clone()))?;
    let views = session.views();

    if let Some(reason) = views.state.no_data_reason() {
        tracing::info!("D402 Dashboard: Session {}: {}", session_id, reason.message());
    }
    Ok(Json(views))
}

/// DELETE /api/d402/sessions/:id
pub async fn delete_session(Path(session_id): Path<String>) -> StatusCode {
    if SESSIONS.remove(&session_id) {
        tracing::info!("D402 Dashboard: Closed session {}", session_id);
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    }
}

/// GET /api/d402/sessions/:id/export
///
/// Detail table of the session, in its current sort, as CSV.
pub async fn export_session_csv(Path(session_id): Path<String>) -> Result<Response, StatusCode> {
    let session = session(&session_id)?;
    let views = session.views();
    let bytes = detail::to_csv(&views.detail).map_err(DashboardError::from)?;

    tracing::info!(
        "D402 Dashboard: Exporting {} rows for session {}",
        views.detail.len(),
        session_id
    );
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"sales_detail.csv\"",
            ),
        ],
        bytes,
    )
        .into_response())
}
