/// Access to the taxi analytics backend.
///
/// The backend is a black box that answers four unauthenticated GET
/// endpoints with JSON. [`AnalyticsSource`] is the seam the dashboard
/// controller talks to; [`client::BackendClient`] is the HTTP
/// implementation of it.
pub mod client;
pub mod types;

use thiserror::Error;

pub use client::BackendClient;
pub use types::{
    ApiInfo, HourlyPattern, InsightsSummary, PassengerDistribution, Trip, TripId, TripPage,
    TripQuery,
};

/// Why a single fetch failed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FetchError {
    /// Connection refused, DNS failure, broken body stream, timeout.
    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },
    /// The server answered with a non-2xx status, regardless of body.
    #[error("HTTP error! status: {status} ({url})")]
    Status { url: String, status: u16 },
    /// The body was not JSON or did not have the expected shape.
    #[error("unexpected response from {url}: {message}")]
    Malformed { url: String, message: String },
}

impl FetchError {
    /// Short machine-readable kind used in the diagnostics log.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Transport { .. } => "transport",
            Self::Status { .. } => "status",
            Self::Malformed { .. } => "malformed",
        }
    }
}

/// Anything that can answer the four analytics queries.
///
/// Implementations must be shareable across threads: the controller issues
/// the initial queries concurrently.
pub trait AnalyticsSource: Sync {
    fn insights_stats(&self) -> Result<InsightsSummary, FetchError>;
    fn trips(&self, query: &TripQuery) -> Result<TripPage, FetchError>;
    fn hourly_pattern(&self) -> Result<HourlyPattern, FetchError>;
    fn passenger_distribution(&self) -> Result<PassengerDistribution, FetchError>;
}
