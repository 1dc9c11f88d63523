use chrono::{DateTime, Duration, Utc};
use contracts::dashboards::d402_sales_performance::{DashboardViews, DetailSort, FilterSelection};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use super::service;
use crate::shared::data::FactTable;

/// One user's dashboard: own selection, shared read-only table
#[derive(Debug, Clone)]
pub struct DashboardSession {
    pub id: String,
    pub dataset: Arc<FactTable>,
    pub selection: FilterSelection,
    pub sort: DetailSort,
    pub created_at: DateTime<Utc>,
    /// Last selection change
    pub updated_at: DateTime<Utc>,
    /// Last read or write through the store
    pub last_access: DateTime<Utc>,
}

impl DashboardSession {
    pub fn new(id: String, dataset: Arc<FactTable>) -> Self {
        let now = Utc::now();
        Self {
            id,
            dataset,
            selection: FilterSelection::all(),
            sort: DetailSort::default(),
            created_at: now,
            updated_at: now,
            last_access: now,
        }
    }

    /// Recompute every view for the current selection
    pub fn views(&self) -> DashboardViews {
        service::compute_views_sorted(&self.dataset, &self.selection, self.sort)
    }
}

/// In-memory session registry.
///
/// Callers get clones of sessions, so no lock is held while views are computed.
#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<String, DashboardSession>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a session with the default (full) selection
    pub fn create(&self, dataset: Arc<FactTable>) -> DashboardSession {
        let session = DashboardSession::new(uuid::Uuid::new_v4().to_string(), dataset);
        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
        sessions.insert(session.id.clone(), session.clone());
        session
    }

    /// Snapshot of a session; counts as activity for idle expiry
    pub fn get(&self, session_id: &str) -> Option<DashboardSession> {
        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
        let session = sessions.get_mut(session_id)?;
        session.last_access = Utc::now();
        Some(session.clone())
    }

    /// Replace the selection; keeps the current sort when `sort` is `None`
    pub fn update_selection(
        &self,
        session_id: &str,
        selection: FilterSelection,
        sort: Option<DetailSort>,
    ) -> Option<DashboardSession> {
        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
        let session = sessions.get_mut(session_id)?;
        session.selection = selection;
        if let Some(sort) = sort {
            session.sort = sort;
        }
        let now = Utc::now();
        session.updated_at = now;
        session.last_access = now;
        Some(session.clone())
    }

    pub fn remove(&self, session_id: &str) -> bool {
        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
        sessions.remove(session_id).is_some()
    }

    /// Drop sessions not accessed within `max_idle`. Returns how many were removed.
    pub fn cleanup_idle_sessions(&self, max_idle: Duration) -> usize {
        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
        let now = Utc::now();
        let before = sessions.len();
        sessions.retain(|_, session| now - session.last_access < max_idle);
        before - sessions.len()
    }

    pub fn len(&self) -> usize {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
