//! Averaging raw measurements into station-year records and
//! cross-station yearly/monthly series.

use gwd_core::{observation::RawObservation, well_record::WellRecord};
use gwd_utils::years::{month_of, year_of};
use serde::Serialize;
use std::{collections::BTreeMap, ops::RangeInclusive};

#[derive(Debug, Default, Clone, Copy)]
struct Accumulator {
    sum: f64,
    count: usize,
}

impl Accumulator {
    fn push(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
    }

    fn mean(&self) -> f64 {
        self.sum / self.count as f64
    }
}

/// Mean depth of one year across every station-year record of that year.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearMean {
    pub year: i32,
    pub depth: f64,
    pub stations: usize,
}

/// Mean depth of one calendar month of one year.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyMean {
    pub year: i32,
    pub month: u32,
    pub depth: f64,
}

/// Collapse raw measurements into one record per (station, location, year)
/// holding that year's mean depth.
///
/// Output is ordered by station id, then year. A station reported at two
/// different coordinates yields two records for the same year.
pub fn station_year_means(observations: &[RawObservation]) -> Vec<WellRecord> {
    let mut groups: BTreeMap<(&str, i32, u64, u64), (f64, f64, Accumulator)> = BTreeMap::new();
    for obs in observations {
        let key = (
            obs.station_id.as_str(),
            year_of(&obs.date),
            obs.latitude.to_bits(),
            obs.longitude.to_bits(),
        );
        groups
            .entry(key)
            .or_insert((obs.latitude, obs.longitude, Accumulator::default()))
            .2
            .push(obs.depth);
    }

    let records: Vec<WellRecord> = groups
        .into_iter()
        .map(|((station_id, year, _, _), (latitude, longitude, acc))| WellRecord {
            station_id: station_id.to_string(),
            latitude,
            longitude,
            year,
            depth: acc.mean(),
        })
        .collect();
    log::info!(
        "yearly: {} observations averaged into {} station-years",
        observations.len(),
        records.len()
    );
    records
}

/// Mean depth per year across all station-year records, ascending by year.
pub fn overall_yearly_means(records: &[WellRecord]) -> Vec<YearMean> {
    let mut years: BTreeMap<i32, Accumulator> = BTreeMap::new();
    for record in records {
        years.entry(record.year).or_default().push(record.depth);
    }
    years
        .into_iter()
        .map(|(year, acc)| YearMean {
            year,
            depth: acc.mean(),
            stations: acc.count,
        })
        .collect()
}

/// Mean depth per (year, month) for observations inside `years`.
///
/// Each station location is first averaged within the month, then those
/// means are averaged, so a densely sampled well counts once per month. A
/// station reported at two coordinates counts once per location, as in
/// [`station_year_means`].
pub fn monthly_means(observations: &[RawObservation], years: RangeInclusive<i32>) -> Vec<MonthlyMean> {
    let mut per_station: BTreeMap<(i32, u32, &str, u64, u64), Accumulator> = BTreeMap::new();
    for obs in observations.iter().filter(|o| years.contains(&year_of(&o.date))) {
        let key = (
            year_of(&obs.date),
            month_of(&obs.date),
            obs.station_id.as_str(),
            obs.latitude.to_bits(),
            obs.longitude.to_bits(),
        );
        per_station.entry(key).or_default().push(obs.depth);
    }

    let mut months: BTreeMap<(i32, u32), Accumulator> = BTreeMap::new();
    for ((year, month, _, _, _), acc) in per_station {
        months.entry((year, month)).or_default().push(acc.mean());
    }
    months
        .into_iter()
        .map(|((year, month), acc)| MonthlyMean {
            year,
            month,
            depth: acc.mean(),
        })
        .collect()
}
