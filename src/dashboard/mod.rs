//! Dashboard controller: runs the fetch → derive → render flows.
//!
//! Four flows feed four regions:
//!
//! | Flow | Endpoint | Region |
//! |---|---|---|
//! | summary | `/insights/stats` | [`Region::Summary`] |
//! | trips | `/trips/` | [`Region::TripTable`] |
//! | hourly | `/insights/hourly-pattern` | [`Region::HourlyChart`] |
//! | passengers | `/insights/passenger-distribution` | [`Region::PassengerChart`] |
//!
//! Each flow is its own failure boundary: transport errors, non-2xx
//! statuses, malformed bodies, and empty data all end up as text in that
//! flow's region and never affect the others. Nothing is retried.
//!
//! Every flow carries a request generation. A response is only written if
//! no newer request for the same flow was started while it was in flight, so
//! a slow filter request can never overwrite a faster, newer one.

pub mod generation;

use std::fmt;
use std::sync::{Mutex, MutexGuard};
use std::thread;

use serde::Serialize;

use crate::api::{AnalyticsSource, BackendClient, FetchError, TripQuery};
use crate::config::schema::TaxidashConfig;
use crate::diagnostics::DiagnosticLog;
use crate::insights::trips::TripTableView;
use crate::insights::{InsightError, hourly, passengers, summary, trips};
use crate::render::{DisplaySurface, Region, RegionContent};

use generation::RequestGeneration;

/// One independent fetch → derive → render sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Flow {
    Summary,
    Trips,
    Hourly,
    Passengers,
}

impl Flow {
    pub const ALL: [Flow; 4] = [Flow::Summary, Flow::Trips, Flow::Hourly, Flow::Passengers];

    pub fn name(self) -> &'static str {
        match self {
            Self::Summary => "summary",
            Self::Trips => "trips",
            Self::Hourly => "hourly",
            Self::Passengers => "passengers",
        }
    }

    pub fn region(self) -> Region {
        match self {
            Self::Summary => Region::Summary,
            Self::Trips => Region::TripTable,
            Self::Hourly => Region::HourlyChart,
            Self::Passengers => Region::PassengerChart,
        }
    }

    fn index(self) -> usize {
        self as usize
    }

    /// What the region shows when the fetch failed.
    fn failure_content(self) -> RegionContent {
        match self {
            Self::Summary => {
                RegionContent::error("Failed to load insights. Ensure the backend is running.")
            }
            Self::Trips => RegionContent::Trips(TripTableView::error(
                "Failed to load trip data. Ensure the backend is running.",
            )),
            Self::Hourly => RegionContent::error(
                "Failed to load hourly pattern. Ensure the backend is running.",
            ),
            Self::Passengers => RegionContent::error(
                "Failed to load passenger distribution. Ensure the backend is running.",
            ),
        }
    }

    /// What the region shows when the data was empty.
    fn no_data_content(self) -> RegionContent {
        match self {
            Self::Hourly => RegionContent::no_data("No hourly data available."),
            Self::Passengers => RegionContent::no_data("No passenger data available."),
            Self::Summary | Self::Trips => RegionContent::no_data("No data available."),
        }
    }
}

impl fmt::Display for Flow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How a flow ended.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum FlowStatus {
    /// Data was fetched, derived, and written to the region.
    Rendered,
    /// The region is absent; nothing was fetched.
    Skipped,
    /// Fetch succeeded but there was nothing to analyze.
    NoData(String),
    /// Fetch or validation failed; the region shows an error.
    Failed(String),
    /// A newer request superseded this one; the response was dropped.
    Stale,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlowReport {
    pub flow: Flow,
    #[serde(flatten)]
    pub status: FlowStatus,
}

impl FlowReport {
    fn new(flow: Flow, status: FlowStatus) -> Self {
        Self { flow, status }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self.status, FlowStatus::Failed(_))
    }
}

/// Drives the four flows against an [`AnalyticsSource`].
#[derive(Debug)]
pub struct DashboardController<A> {
    source: A,
    page_size: u32,
    generations: [RequestGeneration; 4],
    diagnostics: DiagnosticLog,
}

impl<A: AnalyticsSource> DashboardController<A> {
    /// Controller with diagnostics logging switched off.
    pub fn new(source: A, page_size: u32) -> Self {
        Self {
            source,
            page_size,
            generations: Default::default(),
            diagnostics: DiagnosticLog::disabled(),
        }
    }

    pub fn with_diagnostics(mut self, diagnostics: DiagnosticLog) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    pub fn source(&self) -> &A {
        &self.source
    }

    pub fn diagnostics(&self) -> &DiagnosticLog {
        &self.diagnostics
    }

    /// Trip query at the configured page size with the given speed filters.
    pub fn trip_query(&self, min_speed: Option<f64>, max_speed: Option<f64>) -> TripQuery {
        TripQuery::new(self.page_size).with_speeds(min_speed, max_speed)
    }

    pub fn load_summary<S: DisplaySurface>(&self, surface: &Mutex<S>) -> FlowReport {
        self.run_flow(
            Flow::Summary,
            surface,
            || self.source.insights_stats(),
            |stats| Ok(RegionContent::Summary(summary::summarize(&stats))),
        )
    }

    /// Fetch one page of trips and replace every row of the table.
    pub fn load_trips<S: DisplaySurface>(&self, query: &TripQuery, surface: &Mutex<S>) -> FlowReport {
        self.run_flow(
            Flow::Trips,
            surface,
            || self.source.trips(query),
            |page| Ok(RegionContent::Trips(trips::tabulate(&page))),
        )
    }

    pub fn load_hourly<S: DisplaySurface>(&self, surface: &Mutex<S>) -> FlowReport {
        self.run_flow(
            Flow::Hourly,
            surface,
            || self.source.hourly_pattern(),
            |pattern| hourly::view(&pattern).map(RegionContent::Hourly),
        )
    }

    pub fn load_passengers<S: DisplaySurface>(&self, surface: &Mutex<S>) -> FlowReport {
        self.run_flow(
            Flow::Passengers,
            surface,
            || self.source.passenger_distribution(),
            |dist| passengers::view(&dist).map(RegionContent::Passengers),
        )
    }

    /// Run all four flows concurrently and wait for every one of them.
    ///
    /// Reports come back in [`Flow::ALL`] order. A flow that panics is
    /// reported as failed; the others are unaffected.
    pub fn load_all<S>(&self, query: &TripQuery, surface: &Mutex<S>) -> Vec<FlowReport>
    where
        S: DisplaySurface + Send,
    {
        thread::scope(|scope| {
            let handles = [
                (Flow::Summary, scope.spawn(|| self.load_summary(surface))),
                (Flow::Trips, scope.spawn(|| self.load_trips(query, surface))),
                (Flow::Hourly, scope.spawn(|| self.load_hourly(surface))),
                (Flow::Passengers, scope.spawn(|| self.load_passengers(surface))),
            ];

            handles
                .into_iter()
                .map(|(flow, handle)| {
                    handle.join().unwrap_or_else(|_| {
                        self.diagnostics.record(flow.name(), "panic", "flow panicked");
                        FlowReport::new(flow, FlowStatus::Failed("flow panicked".to_string()))
                    })
                })
                .collect()
        })
    }

    fn generation(&self, flow: Flow) -> &RequestGeneration {
        &self.generations[flow.index()]
    }

    /// The shared skeleton of every flow.
    fn run_flow<S, T, F, D>(&self, flow: Flow, surface: &Mutex<S>, fetch: F, derive: D) -> FlowReport
    where
        S: DisplaySurface,
        F: FnOnce() -> Result<T, FetchError>,
        D: FnOnce(T) -> Result<RegionContent, InsightError>,
    {
        let region = flow.region();
        if !lock_surface(surface).has_region(region) {
            return FlowReport::new(flow, FlowStatus::Skipped);
        }

        let ticket = self.generation(flow).begin();

        let (content, status) = match fetch() {
            Ok(data) => match derive(data) {
                Ok(content) => (content, FlowStatus::Rendered),
                Err(err @ InsightError::Misaligned { .. }) => {
                    self.diagnostics.record(flow.name(), "malformed", &err.to_string());
                    (flow.failure_content(), FlowStatus::Failed(err.to_string()))
                }
                Err(err) => {
                    self.diagnostics.record(flow.name(), "no-data", &err.to_string());
                    (flow.no_data_content(), FlowStatus::NoData(err.to_string()))
                }
            },
            Err(err) => {
                self.diagnostics.record(flow.name(), err.kind(), &err.to_string());
                (flow.failure_content(), FlowStatus::Failed(err.to_string()))
            }
        };

        // Check and write under one lock so a newer response can't slip in between.
        let mut guard = lock_surface(surface);
        if !self.generation(flow).is_current(ticket) {
            self.diagnostics.record(
                flow.name(),
                "stale",
                &format!("discarded response for generation {}", ticket.value()),
            );
            return FlowReport::new(flow, FlowStatus::Stale);
        }
        guard.replace(region, content);

        FlowReport::new(flow, status)
    }
}

impl DashboardController<BackendClient> {
    /// Controller talking to the configured backend, logging to the configured
    /// diagnostics file.
    pub fn from_config(config: &TaxidashConfig) -> Self {
        Self::new(BackendClient::from_config(&config.backend), config.backend.page_size)
            .with_diagnostics(DiagnosticLog::from_config(&config.diagnostics))
    }
}

/// Lock the surface, recovering from a flow that panicked mid-write.
fn lock_surface<S>(surface: &Mutex<S>) -> MutexGuard<'_, S> {
    surface.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
