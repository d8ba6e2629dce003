//! Two-year depth change per station and the distinct well locations map.

use gwd_core::{geo_point::GeoPoint, well_record::WellRecord};
use serde::Serialize;
use std::collections::HashSet;

/// Change in depth for one station between two years.
///
/// Positive `change` means the water table dropped (the well got deeper).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DepthChange {
    pub station_id: String,
    pub latitude: f64,
    pub longitude: f64,
    pub depth_from: f64,
    pub depth_to: f64,
    pub change: f64,
}

impl From<&DepthChange> for GeoPoint {
    fn from(change: &DepthChange) -> Self {
        GeoPoint {
            id: change.station_id.clone(),
            latitude: change.latitude,
            longitude: change.longitude,
            value: change.change,
        }
    }
}

/// `depth(to) - depth(from)` for every station observed in both years.
///
/// Stations missing either year are left out. If a station has several
/// records for the same year, the first one encountered is used. Output
/// follows first-seen station order.
pub fn depth_changes(records: &[WellRecord], from: i32, to: i32) -> Vec<DepthChange> {
    let changes: Vec<DepthChange> = WellRecord::group_by_station(records)
        .into_iter()
        .filter_map(|(station_id, rows)| {
            let start = rows.iter().find(|r| r.year == from)?;
            let end = rows.iter().find(|r| r.year == to)?;
            Some(DepthChange {
                station_id: station_id.to_string(),
                latitude: start.latitude,
                longitude: start.longitude,
                depth_from: start.depth,
                depth_to: end.depth,
                change: end.depth - start.depth,
            })
        })
        .collect();
    log::info!("depth change {from} -> {to}: {} stations", changes.len());
    changes
}

/// The `n` largest changes, descending. Equal changes keep input order.
pub fn top_depth_changes(changes: &[DepthChange], n: usize) -> Vec<DepthChange> {
    let mut sorted = changes.to_vec();
    sorted.sort_by(|a, b| b.change.total_cmp(&a.change));
    sorted.truncate(n);
    sorted
}

/// A distinct well position on the map.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WellLocation {
    pub station_id: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// First station seen at each distinct (latitude, longitude) pair.
pub fn unique_locations(records: &[WellRecord]) -> Vec<WellLocation> {
    let mut seen = HashSet::new();
    records
        .iter()
        .filter(|r| seen.insert((r.latitude.to_bits(), r.longitude.to_bits())))
        .map(|r| WellLocation {
            station_id: r.station_id.clone(),
            latitude: r.latitude,
            longitude: r.longitude,
        })
        .collect()
}
