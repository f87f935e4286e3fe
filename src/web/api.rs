//! Handlers for the web dashboard routes.
//!
//! Every handler runs the relevant flows against a fresh surface, so each
//! page load reflects the backend as it is right now.

use std::sync::Mutex;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::api::{AnalyticsSource, TripQuery};
use crate::dashboard::FlowReport;
use crate::render::{MemorySurface, Region, RegionContent, html};

use super::{Reply, WebState};

// ---------------------------------------------------------------------------
// JSON response types
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct FilterResponse {
    limit: u32,
    min_speed: f64,
    max_speed: Option<f64>,
}

impl From<&TripQuery> for FilterResponse {
    fn from(query: &TripQuery) -> Self {
        Self {
            limit: query.limit,
            min_speed: query.min_speed,
            max_speed: query.max_speed,
        }
    }
}

/// `GET /api/dashboard` response.
#[derive(Serialize)]
struct DashboardResponse<'a> {
    filter: FilterResponse,
    surface: &'a MemorySurface,
    reports: Vec<FlowReport>,
}

/// `GET /api/trips` response.
#[derive(Serialize)]
struct TripsResponse<'a> {
    filter: FilterResponse,
    report: FlowReport,
    table: Option<&'a RegionContent>,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn json_reply<T: Serialize>(data: &T) -> Result<Reply> {
    let body = serde_json::to_string(data).context("failed to serialize JSON response")?;
    Ok(Reply::json(200, body))
}

/// Raw value of query parameter `key`, if present and non-empty.
fn query_param<'a>(url: &'a str, key: &str) -> Option<&'a str> {
    url.split('?').nth(1)?.split('&').find_map(|pair| {
        let (k, v) = pair.split_once('=')?;
        (k == key && !v.is_empty()).then_some(v)
    })
}

/// Numeric speed filter; blank or unparseable input counts as unset.
fn parse_speed_param(url: &str, key: &str) -> Option<f64> {
    query_param(url, key)?.parse().ok()
}

fn parse_limit_param(url: &str) -> Option<u32> {
    query_param(url, "limit")?.parse().ok().filter(|n| *n > 0)
}

fn query_from_url<A: AnalyticsSource>(state: &WebState<A>, url: &str) -> TripQuery {
    let mut query = state.controller.trip_query(
        parse_speed_param(url, "min_speed"),
        parse_speed_param(url, "max_speed"),
    );
    if let Some(limit) = parse_limit_param(url) {
        query.limit = limit;
    }
    query
}

fn run_dashboard<A: AnalyticsSource>(
    state: &WebState<A>,
    query: &TripQuery,
) -> (MemorySurface, Vec<FlowReport>) {
    let surface = Mutex::new(MemorySurface::from_display_config(&state.display));
    let reports = state.controller.load_all(query, &surface);
    let surface = surface.into_inner().unwrap_or_else(|e| e.into_inner());
    (surface, reports)
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// `GET /?min_speed=&max_speed=`: the HTML dashboard.
pub fn get_index<A: AnalyticsSource>(state: &WebState<A>, url: &str) -> Result<Reply> {
    let query = query_from_url(state, url);
    let (surface, _) = run_dashboard(state, &query);
    Ok(Reply::html(html::render_page(&surface, &query)))
}

/// `GET /api/dashboard`: every region as JSON, plus per-flow outcomes.
pub fn get_dashboard<A: AnalyticsSource>(state: &WebState<A>, url: &str) -> Result<Reply> {
    let query = query_from_url(state, url);
    let (surface, reports) = run_dashboard(state, &query);
    json_reply(&DashboardResponse {
        filter: FilterResponse::from(&query),
        surface: &surface,
        reports,
    })
}

/// `GET /api/trips?min_speed=&max_speed=&limit=`: the trip table only.
pub fn get_trips<A: AnalyticsSource>(state: &WebState<A>, url: &str) -> Result<Reply> {
    let query = query_from_url(state, url);
    let surface = Mutex::new(MemorySurface::new([Region::TripTable]));
    let report = state.controller.load_trips(&query, &surface);
    let surface = surface.into_inner().unwrap_or_else(|e| e.into_inner());
    json_reply(&TripsResponse {
        filter: FilterResponse::from(&query),
        report,
        table: surface.get(Region::TripTable),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
