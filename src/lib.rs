//! NYC taxi trip analytics dashboard.
//!
//! Pulls trip records and aggregate insights from an analytics HTTP API,
//! derives the headline numbers and chart data, and renders them as a
//! terminal report, an HTML page, or JSON.

pub mod api;
pub mod cli;
pub mod config;
pub mod dashboard;
pub mod diagnostics;
pub mod insights;
pub mod render;
pub mod web;
