//! Display surface: the regions the dashboard writes into.
//!
//! The controller only knows about [`DisplaySurface`]. [`MemorySurface`] is
//! the one implementation; it keeps the latest content per region and is
//! rendered afterwards by [`terminal`] or [`html`], or serialized to JSON.

pub mod html;
pub mod terminal;

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::config::schema::DisplayConfig;
use crate::insights::hourly::HourlyView;
use crate::insights::passengers::PassengerView;
use crate::insights::summary::SummaryView;
use crate::insights::trips::TripTableView;

/// A display region. Each flow owns exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Region {
    Summary,
    TripTable,
    HourlyChart,
    PassengerChart,
}

impl Region {
    pub const ALL: [Region; 4] = [
        Region::Summary,
        Region::TripTable,
        Region::HourlyChart,
        Region::PassengerChart,
    ];

    /// Regions switched on in the `[display]` config section.
    pub fn enabled_in(config: &DisplayConfig) -> Vec<Region> {
        Self::ALL
            .into_iter()
            .filter(|r| match r {
                Region::Summary => config.summary,
                Region::TripTable => config.trips,
                Region::HourlyChart => config.hourly_chart,
                Region::PassengerChart => config.passenger_chart,
            })
            .collect()
    }
}

/// Whatever currently fills a region.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RegionContent {
    /// Plain message: an error, or a "no data" fallback.
    Notice { text: String, error: bool },
    Summary(SummaryView),
    Trips(TripTableView),
    Hourly(HourlyView),
    Passengers(PassengerView),
}

impl RegionContent {
    pub fn error(text: impl Into<String>) -> Self {
        Self::Notice {
            text: text.into(),
            error: true,
        }
    }

    pub fn no_data(text: impl Into<String>) -> Self {
        Self::Notice {
            text: text.into(),
            error: false,
        }
    }
}

/// Where flows put their output.
pub trait DisplaySurface {
    /// Whether `region` exists on this surface. Flows for absent regions do
    /// not fetch anything.
    fn has_region(&self, region: Region) -> bool;

    /// Replace the full contents of `region`.
    fn replace(&mut self, region: Region, content: RegionContent);
}

/// In-memory surface holding the latest content of each present region.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MemorySurface {
    #[serde(skip)]
    present: BTreeSet<Region>,
    regions: BTreeMap<Region, RegionContent>,
}

impl MemorySurface {
    pub fn new(regions: impl IntoIterator<Item = Region>) -> Self {
        Self {
            present: regions.into_iter().collect(),
            regions: BTreeMap::new(),
        }
    }

    pub fn with_all_regions() -> Self {
        Self::new(Region::ALL)
    }

    pub fn from_display_config(config: &DisplayConfig) -> Self {
        Self::new(Region::enabled_in(config))
    }

    pub fn get(&self, region: Region) -> Option<&RegionContent> {
        self.regions.get(&region)
    }

    /// Present regions, in display order.
    pub fn present_regions(&self) -> impl Iterator<Item = Region> + '_ {
        self.present.iter().copied()
    }
}

impl DisplaySurface for MemorySurface {
    fn has_region(&self, region: Region) -> bool {
        self.present.contains(&region)
    }

    fn replace(&mut self, region: Region, content: RegionContent) {
        if self.present.contains(&region) {
            self.regions.insert(region, content);
        }
    }
}

/// Escape text for inclusion in HTML.
pub(crate) fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
