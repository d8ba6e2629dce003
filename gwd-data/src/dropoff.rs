//! Per-region, per-decade mean water-table dropoff.
//!
//! A station's records are split into decade buckets; each bucket with at
//! least two observations yields one dropoff (depth at the bucket's last
//! year minus depth at its first year). Dropoffs are then averaged per
//! region and decade. Positive values mean the water table fell.

use crate::classify::{GeoClassifier, StationRegions};
use gwd_core::{
    error::{GwdError, Result},
    well_record::WellRecord,
};
use gwd_utils::{stats, years::decade_of};
use serde::Serialize;
use std::collections::BTreeMap;

/// One station's records within a single decade, in input order.
#[derive(Debug, Clone, PartialEq)]
pub struct DecadeBucket<'a> {
    pub station_id: &'a str,
    pub decade: i32,
    pub records: Vec<&'a WellRecord>,
}

impl DecadeBucket<'_> {
    pub fn min_year(&self) -> Option<i32> {
        self.records.iter().map(|r| r.year).min()
    }

    pub fn max_year(&self) -> Option<i32> {
        self.records.iter().map(|r| r.year).max()
    }

    /// Depth at the bucket's last year minus depth at its first year.
    ///
    /// `None` for a single-observation bucket. When several records share
    /// the first or last year, the first one in input order is used.
    pub fn dropoff(&self) -> Option<f64> {
        if self.records.len() < 2 {
            return None;
        }
        let (min_year, max_year) = (self.min_year()?, self.max_year()?);
        let first = self.records.iter().find(|r| r.year == min_year)?;
        let last = self.records.iter().find(|r| r.year == max_year)?;
        Some(last.depth - first.depth)
    }
}

/// A defined dropoff for one station and decade.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationDropoff {
    pub station_id: String,
    pub decade: i32,
    pub dropoff: f64,
}

/// Mean dropoff of one region/decade cell and how many stations fed it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DecadeCell {
    pub mean: f64,
    pub stations: usize,
}

/// Counters describing what an aggregation pass kept and dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AggregateReport {
    pub stations: usize,
    pub unclassified_stations: usize,
    pub buckets: usize,
    pub single_observation_buckets: usize,
    pub cells: usize,
}

/// Region name -> decade -> mean dropoff.
///
/// Absent keys mean "no data", which callers must render differently from a
/// dropoff of zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RegionDecadeAggregate {
    regions: BTreeMap<String, BTreeMap<i32, DecadeCell>>,
    report: AggregateReport,
}

impl RegionDecadeAggregate {
    pub fn get(&self, region: &str, decade: i32) -> Option<&DecadeCell> {
        self.regions.get(region)?.get(&decade)
    }

    pub fn mean(&self, region: &str, decade: i32) -> Option<f64> {
        self.get(region, decade).map(|cell| cell.mean)
    }

    pub fn region(&self, region: &str) -> Option<&BTreeMap<i32, DecadeCell>> {
        self.regions.get(region)
    }

    pub fn regions(&self) -> impl Iterator<Item = &str> {
        self.regions.keys().map(String::as_str)
    }

    /// Every decade with data in at least one region, ascending.
    pub fn decades(&self) -> Vec<i32> {
        let mut decades: Vec<i32> = self
            .regions
            .values()
            .flat_map(|by_decade| by_decade.keys().copied())
            .collect();
        decades.sort_unstable();
        decades.dedup();
        decades
    }

    pub fn report(&self) -> &AggregateReport {
        &self.report
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}

fn station_buckets<'a>(station_id: &'a str, records: &[&'a WellRecord]) -> Vec<DecadeBucket<'a>> {
    let mut by_decade: BTreeMap<i32, Vec<&'a WellRecord>> = BTreeMap::new();
    for record in records {
        by_decade
            .entry(decade_of(record.year))
            .or_default()
            .push(*record);
    }
    by_decade
        .into_iter()
        .map(|(decade, records)| DecadeBucket {
            station_id,
            decade,
            records,
        })
        .collect()
}

/// Split records into per-station decade buckets.
///
/// Stations appear in first-seen order, decades ascending within a station.
pub fn decade_buckets(records: &[WellRecord]) -> Vec<DecadeBucket<'_>> {
    WellRecord::group_by_station(records)
        .into_iter()
        .flat_map(|(station_id, station_records)| station_buckets(station_id, &station_records))
        .collect()
}

/// Every defined per-station dropoff, skipping single-observation buckets.
pub fn station_dropoffs(records: &[WellRecord]) -> Vec<StationDropoff> {
    decade_buckets(records)
        .into_iter()
        .filter_map(|bucket| {
            Some(StationDropoff {
                dropoff: bucket.dropoff()?,
                station_id: bucket.station_id.to_string(),
                decade: bucket.decade,
            })
        })
        .collect()
}

/// Classify every station, then aggregate.
pub fn aggregate(records: &[WellRecord], classifier: &GeoClassifier) -> Result<RegionDecadeAggregate> {
    if records.is_empty() {
        return Err(GwdError::EmptyRecordSet);
    }
    let stations = StationRegions::build(records, classifier);
    aggregate_with(records, &stations)
}

/// Aggregate using an existing station -> region assignment.
///
/// Stations missing from `stations` are dropped, never defaulted.
pub fn aggregate_with(records: &[WellRecord], stations: &StationRegions) -> Result<RegionDecadeAggregate> {
    if records.is_empty() {
        return Err(GwdError::EmptyRecordSet);
    }

    let mut report = AggregateReport::default();
    let mut dropoffs: BTreeMap<String, BTreeMap<i32, Vec<f64>>> = BTreeMap::new();
    for (station_id, station_records) in WellRecord::group_by_station(records) {
        report.stations += 1;
        let Some(region) = stations.region_of(station_id) else {
            report.unclassified_stations += 1;
            continue;
        };
        for bucket in station_buckets(station_id, &station_records) {
            report.buckets += 1;
            match bucket.dropoff() {
                Some(dropoff) => dropoffs
                    .entry(region.to_string())
                    .or_default()
                    .entry(bucket.decade)
                    .or_default()
                    .push(dropoff),
                None => report.single_observation_buckets += 1,
            }
        }
    }

    let regions: BTreeMap<String, BTreeMap<i32, DecadeCell>> = dropoffs
        .into_iter()
        .map(|(region, by_decade)| {
            let cells = by_decade
                .into_iter()
                .filter_map(|(decade, values)| {
                    let stations = values.len();
                    let mean = stats::mean(values)?;
                    Some((decade, DecadeCell { mean, stations }))
                })
                .collect();
            (region, cells)
        })
        .collect();
    report.cells = regions.values().map(BTreeMap::len).sum();

    log::info!(
        "dropoff: {} stations ({} unclassified), {} buckets ({} single-observation dropped), {} region/decade cells",
        report.stations,
        report.unclassified_stations,
        report.buckets,
        report.single_observation_buckets,
        report.cells
    );
    Ok(RegionDecadeAggregate { regions, report })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::tests::{record, two_squares};

    fn classifier() -> GeoClassifier {
        GeoClassifier::new(two_squares()).unwrap()
    }

    #[test]
    fn test_worked_example() {
        let records = vec![
            record("A", 35.0, -105.0, 2000, 10.0),
            record("A", 35.0, -105.0, 2005, 8.0),
            record("A", 35.0, -105.0, 2009, 14.0),
        ];
        let aggregate = aggregate(&records, &classifier()).unwrap();
        let cell = aggregate.get("West", 2000).unwrap();
        assert!((cell.mean - 4.0).abs() < f64::EPSILON);
        assert_eq!(cell.stations, 1);
        assert_eq!(aggregate.decades(), vec![2000]);
    }

    #[test]
    fn test_dropoff_ignores_record_order() {
        let forward = vec![
            record("A", 35.0, -105.0, 2001, 3.0),
            record("A", 35.0, -105.0, 2004, 9.0),
            record("A", 35.0, -105.0, 2008, 5.5),
        ];
        let mut reversed = forward.clone();
        reversed.reverse();
        let a = station_dropoffs(&forward);
        let b = station_dropoffs(&reversed);
        assert_eq!(a, b);
        assert!((a[0].dropoff - 2.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_duplicate_years_use_first_encountered() {
        let records = vec![
            record("A", 35.0, -105.0, 2000, 10.0),
            record("A", 35.0, -105.0, 2000, 99.0),
            record("A", 35.0, -105.0, 2003, 12.0),
            record("A", 35.0, -105.0, 2003, 50.0),
        ];
        let buckets = decade_buckets(&records);
        assert_eq!(buckets.len(), 1);
        assert_eq!(buckets[0].dropoff(), Some(2.0));
    }

    #[test]
    fn test_single_observation_bucket_is_excluded() {
        let records = vec![
            record("A", 35.0, -105.0, 1995, 4.0),
            record("A", 35.0, -105.0, 2001, 5.0),
            record("A", 35.0, -105.0, 2006, 7.0),
        ];
        let dropoffs = station_dropoffs(&records);
        assert_eq!(dropoffs.len(), 1);
        assert_eq!(dropoffs[0].decade, 2000);

        let aggregate = aggregate(&records, &classifier()).unwrap();
        assert_eq!(aggregate.get("West", 1990), None);
        assert_eq!(aggregate.report().single_observation_buckets, 1);
        assert_eq!(aggregate.report().buckets, 2);
    }

    #[test]
    fn test_region_mean_uses_only_its_own_stations() {
        let records = vec![
            record("W1", 35.0, -105.0, 2000, 0.0),
            record("W1", 35.0, -105.0, 2009, 2.0),
            record("W2", 33.0, -104.0, 2001, 10.0),
            record("W2", 33.0, -104.0, 2002, 16.0),
            // same decade, other region
            record("E1", 35.0, -95.0, 2000, 0.0),
            record("E1", 35.0, -95.0, 2005, -30.0),
            // same region, other decade
            record("W3", 36.0, -106.0, 2010, 0.0),
            record("W3", 36.0, -106.0, 2015, 100.0),
        ];
        let aggregate = aggregate(&records, &classifier()).unwrap();
        let west = aggregate.get("West", 2000).unwrap();
        assert!((west.mean - 4.0).abs() < f64::EPSILON);
        assert_eq!(west.stations, 2);
        assert_eq!(aggregate.mean("East", 2000), Some(-30.0));
        assert_eq!(aggregate.mean("West", 2010), Some(100.0));
        assert_eq!(aggregate.decades(), vec![2000, 2010]);
        assert_eq!(aggregate.report().cells, 3);
    }

    #[test]
    fn test_unclassified_station_never_aggregated() {
        let records = vec![
            record("OUT", 60.0, -150.0, 2000, 0.0),
            record("OUT", 60.0, -150.0, 2005, 500.0),
            record("IN", 35.0, -95.0, 2000, 1.0),
            record("IN", 35.0, -95.0, 2005, 2.0),
        ];
        let aggregate = aggregate(&records, &classifier()).unwrap();
        assert_eq!(aggregate.regions().collect::<Vec<_>>(), vec!["East"]);
        assert_eq!(aggregate.mean("East", 2000), Some(1.0));
        assert_eq!(aggregate.report().unclassified_stations, 1);
        assert_eq!(aggregate.report().stations, 2);
    }

    #[test]
    fn test_zero_dropoff_is_not_no_data() {
        let records = vec![
            record("A", 35.0, -105.0, 2000, 5.0),
            record("A", 35.0, -105.0, 2004, 5.0),
        ];
        let aggregate = aggregate(&records, &classifier()).unwrap();
        assert_eq!(aggregate.mean("West", 2000), Some(0.0));
        assert_eq!(aggregate.mean("East", 2000), None);
    }

    #[test]
    fn test_empty_records_fail() {
        assert!(matches!(
            aggregate(&[], &classifier()),
            Err(GwdError::EmptyRecordSet)
        ));
    }

    #[test]
    fn test_reused_station_regions_give_same_result() {
        let records = vec![
            record("A", 35.0, -105.0, 1990, 1.0),
            record("A", 35.0, -105.0, 1999, 4.0),
            record("B", 35.0, -95.0, 1990, 1.0),
            record("B", 35.0, -95.0, 1992, 0.0),
        ];
        let classifier = classifier();
        let stations = StationRegions::build(&records, &classifier);
        let first = aggregate_with(&records, &stations).unwrap();
        let second = aggregate_with(&records, &stations).unwrap();
        assert_eq!(first, second);
        assert_eq!(first, aggregate(&records, &classifier).unwrap());
    }

    #[test]
    fn test_negative_years_bucket_by_floor() {
        let records = vec![
            record("A", 35.0, -105.0, -5, 1.0),
            record("A", 35.0, -105.0, -1, 3.0),
        ];
        let buckets = decade_buckets(&records);
        assert_eq!(buckets[0].decade, -10);
        assert_eq!(buckets[0].min_year(), Some(-5));
        assert_eq!(buckets[0].max_year(), Some(-1));
    }
}
