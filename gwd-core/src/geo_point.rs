use crate::{
    error::Result,
    table::{self, ParsedRows},
    well_record::{LATITUDE_COLUMNS, LONGITUDE_COLUMNS},
};
use serde::{Deserialize, Serialize};

/// Accepted header names for a point identifier.
pub const ID_COLUMNS: &[&str] = &["station_nm", "station_id", "id"];

/// A located point carrying one numeric attribute of interest
/// (a depth change, a component score, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub id: String,
    pub latitude: f64,
    pub longitude: f64,
    pub value: f64,
}

impl GeoPoint {
    /// Parse points from a headed CSV, reading the attribute from `value_column`.
    ///
    /// When the table has no identifier column the zero-based row number is
    /// used as the id.
    pub fn parse_csv(csv_data: &str, value_column: &str) -> Result<ParsedRows<GeoPoint>> {
        let mut rdr = table::reader(csv_data);
        let headers = rdr.headers()?.clone();
        let id_idx = table::column_index(&headers, ID_COLUMNS);
        let lat_idx = table::require_column(&headers, LATITUDE_COLUMNS)?;
        let lon_idx = table::require_column(&headers, LONGITUDE_COLUMNS)?;
        let value_idx = table::require_column(&headers, &[value_column])?;

        let mut rows = Vec::new();
        let mut skipped = 0usize;
        for (row_number, result) in rdr.records().enumerate() {
            let Ok(record) = result else {
                skipped += 1;
                continue;
            };
            let id = match id_idx {
                Some(idx) => table::text(&record, idx).map(str::to_string),
                None => Some(row_number.to_string()),
            };
            let parsed = (|| {
                Some(GeoPoint {
                    id: id?,
                    latitude: table::float(&record, lat_idx)?,
                    longitude: table::float(&record, lon_idx)?,
                    value: table::float(&record, value_idx)?,
                })
            })();
            match parsed {
                Some(point) => rows.push(point),
                None => skipped += 1,
            }
        }
        log::info!(
            "points ({}): loaded {}, skipped {} malformed",
            value_column,
            rows.len(),
            skipped
        );
        Ok(ParsedRows { rows, skipped })
    }
}

#[cfg(test)]
mod tests {
    use super::GeoPoint;

    #[test]
    fn test_parse_depth_change_points() {
        let csv_data = "\
station_nm,dec_lat_va,dec_long_va,depth_2000,depth_2023,depth_change
TX-1,31.0,-100.0,20.0,32.5,12.5
TX-2,31.5,-100.5,18.0,,
";
        let parsed = GeoPoint::parse_csv(csv_data, "depth_change").unwrap();
        assert_eq!(parsed.rows.len(), 1);
        assert_eq!(parsed.skipped, 1);
        assert_eq!(parsed.rows[0].id, "TX-1");
        assert!((parsed.rows[0].value - 12.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_parse_without_id_column_uses_row_number() {
        let csv_data = "lat,lon,PC1\n40.0,-90.0,0.5\n41.0,-91.0,-0.25\n";
        let parsed = GeoPoint::parse_csv(csv_data, "PC1").unwrap();
        assert_eq!(parsed.rows.len(), 2);
        assert_eq!(parsed.rows[1].id, "1");
    }

    #[test]
    fn test_parse_missing_value_column_fails() {
        let csv_data = "lat,lon,PC1\n40.0,-90.0,0.5\n";
        assert!(GeoPoint::parse_csv(csv_data, "PC2").is_err());
    }
}
