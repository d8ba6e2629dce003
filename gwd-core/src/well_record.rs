use crate::{
    error::Result,
    table::{self, ParsedRows},
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Accepted header names for each well record column.
pub const STATION_COLUMNS: &[&str] = &["station_id", "station_nm"];
pub const LATITUDE_COLUMNS: &[&str] = &["latitude", "dec_lat_va", "lat"];
pub const LONGITUDE_COLUMNS: &[&str] = &["longitude", "dec_long_va", "lon"];
pub const YEAR_COLUMNS: &[&str] = &["year"];
pub const DEPTH_COLUMNS: &[&str] = &["depth", "water_depth_ft"];

/// One station-year of groundwater depth.
///
/// `depth` is feet below land surface, so a larger value means a drier well.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WellRecord {
    pub station_id: String,
    pub latitude: f64,
    pub longitude: f64,
    pub year: i32,
    pub depth: f64,
}

impl WellRecord {
    /// Parse station-year records from a headed CSV (or TSV) string.
    ///
    /// Rows with a missing station id or a non-numeric coordinate, year, or
    /// depth are skipped and counted. Only a missing column fails the call.
    pub fn parse_csv(csv_data: &str) -> Result<ParsedRows<WellRecord>> {
        let mut rdr = table::reader(csv_data);
        let headers = rdr.headers()?.clone();
        let station_idx = table::require_column(&headers, STATION_COLUMNS)?;
        let lat_idx = table::require_column(&headers, LATITUDE_COLUMNS)?;
        let lon_idx = table::require_column(&headers, LONGITUDE_COLUMNS)?;
        let year_idx = table::require_column(&headers, YEAR_COLUMNS)?;
        let depth_idx = table::require_column(&headers, DEPTH_COLUMNS)?;

        let mut rows = Vec::new();
        let mut skipped = 0usize;
        for result in rdr.records() {
            let Ok(record) = result else {
                skipped += 1;
                continue;
            };
            let parsed = (|| {
                Some(WellRecord {
                    station_id: table::text(&record, station_idx)?.to_string(),
                    latitude: table::float(&record, lat_idx)?,
                    longitude: table::float(&record, lon_idx)?,
                    year: table::integer(&record, year_idx)?,
                    depth: table::float(&record, depth_idx)?,
                })
            })();
            match parsed {
                Some(well) => rows.push(well),
                None => skipped += 1,
            }
        }
        log::info!(
            "well records: loaded {}, skipped {} malformed",
            rows.len(),
            skipped
        );
        Ok(ParsedRows { rows, skipped })
    }

    /// Group records by station id.
    ///
    /// Stations come back in first-seen order and each station keeps its
    /// records in input order, so callers that break ties by "first
    /// encountered" stay deterministic.
    pub fn group_by_station(records: &[WellRecord]) -> Vec<(&str, Vec<&WellRecord>)> {
        let mut index: HashMap<&str, usize> = HashMap::new();
        let mut groups: Vec<(&str, Vec<&WellRecord>)> = Vec::new();
        for record in records {
            let slot = *index.entry(record.station_id.as_str()).or_insert_with(|| {
                groups.push((record.station_id.as_str(), Vec::new()));
                groups.len() - 1
            });
            groups[slot].1.push(record);
        }
        groups
    }
}
