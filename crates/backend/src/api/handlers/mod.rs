// Dashboard handlers
pub mod d402_sales_performance;

// Shared BI indicators
pub mod indicators;
