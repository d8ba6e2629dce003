//! Raw observations -> station-year CSV, plus the overall yearly and
//! monthly series.

use anyhow::Context;
use gwd_core::{observation::RawObservation, well_record::WellRecord};
use gwd_data::yearly::{self, MonthlyMean, YearMean};
use log::info;
use serde::Serialize;
use std::ops::RangeInclusive;

/// Years covered by the monthly series.
pub const MONTHLY_YEARS: RangeInclusive<i32> = 2000..=2023;

/// Output row, using the USGS export column names.
#[derive(Serialize)]
struct StationYearRow<'a> {
    station_nm: &'a str,
    dec_lat_va: f64,
    dec_long_va: f64,
    year: i32,
    water_depth_ft: f64,
}

#[derive(Debug, Serialize)]
pub struct YearlyOutput {
    #[serde(skip)]
    pub records: Vec<WellRecord>,
    pub station_years: usize,
    pub skipped_rows: usize,
    pub yearly_means: Vec<YearMean>,
    pub monthly_means: Vec<MonthlyMean>,
}

pub fn yearly_output(observations_data: &str) -> anyhow::Result<YearlyOutput> {
    let parsed = RawObservation::parse_csv(observations_data).context("failed to parse observations")?;
    let records = yearly::station_year_means(&parsed.rows);
    Ok(YearlyOutput {
        station_years: records.len(),
        skipped_rows: parsed.skipped,
        yearly_means: yearly::overall_yearly_means(&records),
        monthly_means: yearly::monthly_means(&parsed.rows, MONTHLY_YEARS),
        records,
    })
}

/// Serialize station-year records as CSV with a header row.
pub fn write_station_years<W: std::io::Write>(records: &[WellRecord], out: W) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_writer(out);
    for record in records {
        wtr.serialize(StationYearRow {
            station_nm: &record.station_id,
            dec_lat_va: record.latitude,
            dec_long_va: record.longitude,
            year: record.year,
            water_depth_ft: record.depth,
        })?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn run_yearly(observations_path: &str, output_path: &str) -> anyhow::Result<()> {
    let data = crate::read_input(observations_path)?;
    let output = yearly_output(&data)?;
    let file = std::fs::File::create(output_path).with_context(|| format!("failed to create {output_path}"))?;
    write_station_years(&output.records, file)?;
    info!(
        "Yearly averaging complete. {} station-years written to {}",
        output.station_years, output_path
    );
    crate::print_json(&output)
}

#[cfg(test)]
mod tests {
    use super::*;

    const OBSERVATIONS: &str = include_str!("../../fixtures/raw_observations.tsv");

    #[test]
    fn test_yearly_fixture() {
        let output = yearly_output(OBSERVATIONS).unwrap();
        assert_eq!(output.skipped_rows, 1);
        assert_eq!(output.station_years, 3);
        assert_eq!(output.records[0].station_id, "KS-17");
        assert!((output.records[0].depth - 42.0).abs() < f64::EPSILON);

        assert_eq!(output.yearly_means.len(), 2);
        assert!((output.yearly_means[0].depth - 27.0).abs() < f64::EPSILON);
        assert_eq!(output.monthly_means.len(), 4);
    }

    #[test]
    fn test_written_csv_reads_back_as_well_records() {
        let output = yearly_output(OBSERVATIONS).unwrap();
        let mut buf = Vec::new();
        write_station_years(&output.records, &mut buf).unwrap();
        let csv_text = String::from_utf8(buf).unwrap();
        assert!(csv_text.starts_with("station_nm,dec_lat_va,dec_long_va,year,water_depth_ft\n"));

        let reparsed = WellRecord::parse_csv(&csv_text).unwrap();
        assert_eq!(reparsed.skipped, 0);
        assert_eq!(reparsed.rows, output.records);
    }
}
