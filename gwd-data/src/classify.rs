//! Point-in-polygon assignment of wells to named regions.

use geo::{Contains, Point, Rect};
use gwd_core::{
    error::{GwdError, Result},
    region::RegionGeometry,
    well_record::WellRecord,
};
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone)]
struct IndexedRegion {
    region: RegionGeometry,
    bounds: Option<Rect<f64>>,
}

impl IndexedRegion {
    fn contains(&self, point: &Point<f64>) -> bool {
        let Some(bounds) = self.bounds else {
            return false;
        };
        let (min, max) = (bounds.min(), bounds.max());
        point.x() >= min.x
            && point.x() <= max.x
            && point.y() >= min.y
            && point.y() <= max.y
            && self.region.boundary.contains(point)
    }
}

/// Linear-scan classifier over a fixed set of region boundaries.
///
/// Regions are tested in the order given and the first whose interior
/// contains the point wins. Overlapping boundaries are not expected in the
/// source data, so no other tie-break is applied.
#[derive(Debug, Clone)]
pub struct GeoClassifier {
    regions: Vec<IndexedRegion>,
}

impl GeoClassifier {
    pub fn new(regions: Vec<RegionGeometry>) -> Result<Self> {
        if regions.is_empty() {
            return Err(GwdError::MissingGeometry);
        }
        let regions = regions
            .into_iter()
            .map(|region| IndexedRegion {
                bounds: region.bounds(),
                region,
            })
            .collect();
        Ok(Self { regions })
    }

    pub fn region_count(&self) -> usize {
        self.regions.len()
    }

    /// Name of the first region containing `(latitude, longitude)`, if any.
    pub fn classify(&self, latitude: f64, longitude: f64) -> Option<&str> {
        let point = Point::new(longitude, latitude);
        self.regions
            .iter()
            .find(|indexed| indexed.contains(&point))
            .map(|indexed| indexed.region.name.as_str())
    }
}

/// Region assignment per station, classified once from each station's
/// first record.
///
/// Building this once per load and reusing it across aggregation passes
/// avoids re-running point-in-polygon tests for every decade switch.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StationRegions {
    assigned: HashMap<String, String>,
    unclassified: Vec<String>,
}

impl StationRegions {
    pub fn build(records: &[WellRecord], classifier: &GeoClassifier) -> Self {
        let mut stations = StationRegions::default();
        for (station_id, station_records) in WellRecord::group_by_station(records) {
            let first = station_records[0];
            match classifier.classify(first.latitude, first.longitude) {
                Some(region) => {
                    stations
                        .assigned
                        .insert(station_id.to_string(), region.to_string());
                }
                None => stations.unclassified.push(station_id.to_string()),
            }
        }
        if !stations.unclassified.is_empty() {
            log::info!(
                "classify: {} stations outside every region, dropped",
                stations.unclassified.len()
            );
        }
        stations
    }

    pub fn region_of(&self, station_id: &str) -> Option<&str> {
        self.assigned.get(station_id).map(String::as_str)
    }

    pub fn classified_count(&self) -> usize {
        self.assigned.len()
    }

    /// Stations whose first record fell outside every region, in input order.
    pub fn unclassified(&self) -> &[String] {
        &self.unclassified
    }
}
