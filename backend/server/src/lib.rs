//! Equity share calculation service.
//!
//! Exposes the pure [`share_engine`] allocation engine over a small Axum
//! REST API: a live calculation endpoint, a CSV export, and a health check.
//! The [`live`] module additionally implements the calling contract a
//! live-preview client must follow (debounced, cancel-superseded
//! recalculations), so interactive callers do not have to reinvent it.

pub mod api;
pub mod config;
pub mod errors;
pub mod export;
pub mod live;
pub mod payload;
