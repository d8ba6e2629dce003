use crate::{
    error::Result,
    table::{self, ParsedRows},
    well_record::{DEPTH_COLUMNS, LATITUDE_COLUMNS, LONGITUDE_COLUMNS, STATION_COLUMNS},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Accepted header names for the observation timestamp.
pub const DATETIME_COLUMNS: &[&str] = &["datetime", "date"];

/// Date formats seen in the raw well export, tried in order against the
/// date portion of the timestamp.
const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y%m%d", "%m/%d/%Y"];

/// A single raw depth-to-water measurement, before yearly averaging.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawObservation {
    pub station_id: String,
    pub latitude: f64,
    pub longitude: f64,
    pub date: NaiveDate,
    /// Feet below land surface.
    pub depth: f64,
}

impl RawObservation {
    /// Parse raw measurements from a headed CSV or TSV string.
    ///
    /// Timestamps may carry a time of day (`2004-06-01 13:45`); only the
    /// date is kept. Rows with missing fields, unparseable dates, or
    /// non-numeric depths are skipped and counted.
    pub fn parse_csv(data: &str) -> Result<ParsedRows<RawObservation>> {
        let mut rdr = table::reader(data);
        let headers = rdr.headers()?.clone();
        let station_idx = table::require_column(&headers, STATION_COLUMNS)?;
        let lat_idx = table::require_column(&headers, LATITUDE_COLUMNS)?;
        let lon_idx = table::require_column(&headers, LONGITUDE_COLUMNS)?;
        let date_idx = table::require_column(&headers, DATETIME_COLUMNS)?;
        let depth_idx = table::require_column(&headers, DEPTH_COLUMNS)?;

        let mut rows = Vec::new();
        let mut skipped = 0usize;
        for result in rdr.records() {
            let Ok(record) = result else {
                skipped += 1;
                continue;
            };
            let parsed = (|| {
                Some(RawObservation {
                    station_id: table::text(&record, station_idx)?.to_string(),
                    latitude: table::float(&record, lat_idx)?,
                    longitude: table::float(&record, lon_idx)?,
                    date: parse_date(table::text(&record, date_idx)?)?,
                    depth: table::float(&record, depth_idx)?,
                })
            })();
            match parsed {
                Some(observation) => rows.push(observation),
                None => skipped += 1,
            }
        }
        log::info!(
            "raw observations: loaded {}, skipped {} malformed",
            rows.len(),
            skipped
        );
        Ok(ParsedRows { rows, skipped })
    }
}

/// Parse the date part of a timestamp such as `2004-06-01 13:45:00`.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let date_part = raw.split([' ', 'T']).next()?;
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(date_part, format).ok())
}

#[cfg(test)]
mod test {
    use super::{parse_date, RawObservation};
    use chrono::NaiveDate;

    const TSV_RESULT: &str = "station_nm\tdec_lat_va\tdec_long_va\tdatetime\twater_depth_ft
KS-17\t38.50\t-98.76\t2004-06-01 13:45\t41.2
KS-17\t38.50\t-98.76\t2004-09-12\t43.0
KS-17\t38.50\t-98.76\t2005-01-03\t
KS-17\t38.50\t-98.76\tsometime\t40.0
";

    #[test]
    fn test_parse_tsv_observations() {
        let parsed = RawObservation::parse_csv(TSV_RESULT).unwrap();
        assert_eq!(parsed.rows.len(), 2);
        assert_eq!(parsed.skipped, 2);
        assert_eq!(
            parsed.rows[0].date,
            NaiveDate::from_ymd_opt(2004, 6, 1).unwrap()
        );
        assert!((parsed.rows[1].depth - 43.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_parse_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2021, 3, 9).unwrap();
        assert_eq!(parse_date("2021-03-09"), Some(expected));
        assert_eq!(parse_date("2021-03-09T08:00:00"), Some(expected));
        assert_eq!(parse_date("20210309"), Some(expected));
        assert_eq!(parse_date("03/09/2021"), Some(expected));
        assert_eq!(parse_date("yesterday"), None);
    }
}
