//! Sales performance dashboard: filters the fact table by region/product and
//! derives KPIs, trend, breakdowns, margin distribution, insights and the
//! detail table in one pass per selection change.

pub mod aggregate;
pub mod detail;
pub mod distribution;
pub mod filter;
pub mod insights;
pub mod service;
pub mod session;

pub use service::compute_views;
pub use session::{DashboardSession, SessionStore};
