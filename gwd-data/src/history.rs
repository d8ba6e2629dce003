//! Per-well depth series for the station/year picker and the
//! well-over-time chart.

use gwd_core::well_record::WellRecord;
use serde::Serialize;
use std::collections::BTreeSet;

/// Headroom multiplier applied to the deepest reading for the chart axis.
pub const AXIS_PADDING: f64 = 1.1;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct YearDepth {
    pub year: i32,
    pub depth: f64,
}

/// One station's depth over time, ascending by year.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationHistory {
    pub station_id: String,
    pub years: Vec<YearDepth>,
    /// Deepest reading times [`AXIS_PADDING`]; `None` for an empty series.
    pub axis_max: Option<f64>,
}

/// Every station id, sorted and deduplicated.
pub fn station_ids(records: &[WellRecord]) -> Vec<String> {
    records
        .iter()
        .map(|r| r.station_id.as_str())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Sorted distinct years that `station_id` has a record for.
pub fn years_for_station(records: &[WellRecord], station_id: &str) -> Vec<i32> {
    records
        .iter()
        .filter(|r| r.station_id == station_id)
        .map(|r| r.year)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

impl StationHistory {
    pub fn for_station(records: &[WellRecord], station_id: &str) -> Self {
        let mut years: Vec<YearDepth> = records
            .iter()
            .filter(|r| r.station_id == station_id)
            .map(|r| YearDepth {
                year: r.year,
                depth: r.depth,
            })
            .collect();
        years.sort_by_key(|y| y.year);
        let axis_max = years
            .iter()
            .map(|y| y.depth)
            .reduce(f64::max)
            .map(|max| max * AXIS_PADDING);
        Self {
            station_id: station_id.to_string(),
            years,
            axis_max,
        }
    }
}
