//! Principal-component tables: per-variable loadings and per-well scores.
//!
//! Both tables carry their components as columns named `PC1`, `PC2`, ...
//! Column order in the file does not matter; components are ordered by
//! their number.

use crate::{
    error::Result,
    geo_point::ID_COLUMNS,
    table::{self, ParsedTable},
    well_record::{LATITUDE_COLUMNS, LONGITUDE_COLUMNS},
};
use csv::StringRecord;
use serde::Serialize;

/// Loadings table: one row per source variable (e.g. day of year), one
/// value per component.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComponentLoadings {
    pub names: Vec<String>,
    pub rows: Vec<Vec<f64>>,
}

/// A located entity with one score per component.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredEntity {
    pub id: String,
    pub latitude: f64,
    pub longitude: f64,
    pub scores: Vec<f64>,
}

/// Scores table: one row per entity, one value per component.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComponentScores {
    pub names: Vec<String>,
    pub entities: Vec<ScoredEntity>,
}

impl ComponentLoadings {
    pub fn component_count(&self) -> usize {
        self.names.len()
    }

    /// Parse a loadings CSV. Rows with any non-numeric component are skipped.
    pub fn parse_csv(csv_data: &str) -> Result<ParsedTable<ComponentLoadings>> {
        let mut rdr = table::reader(csv_data);
        let headers = rdr.headers()?.clone();
        let columns = component_columns(&headers);

        let mut rows = Vec::new();
        let mut skipped = 0usize;
        for result in rdr.records() {
            match result.ok().and_then(|record| component_values(&record, &columns)) {
                Some(values) => rows.push(values),
                None => skipped += 1,
            }
        }
        log::info!(
            "loadings: {} components, {} rows, skipped {} malformed",
            columns.len(),
            rows.len(),
            skipped
        );
        let names = columns.into_iter().map(|(name, _)| name).collect();
        Ok(ParsedTable {
            table: ComponentLoadings { names, rows },
            skipped,
        })
    }
}

impl ComponentScores {
    pub fn component_count(&self) -> usize {
        self.names.len()
    }

    /// Parse a scores CSV. Each row needs a latitude, a longitude, and a
    /// numeric value for every component; other rows are skipped.
    pub fn parse_csv(csv_data: &str) -> Result<ParsedTable<ComponentScores>> {
        let mut rdr = table::reader(csv_data);
        let headers = rdr.headers()?.clone();
        let columns = component_columns(&headers);
        let id_idx = table::column_index(&headers, ID_COLUMNS);
        let lat_idx = table::require_column(&headers, LATITUDE_COLUMNS)?;
        let lon_idx = table::require_column(&headers, LONGITUDE_COLUMNS)?;

        let mut entities = Vec::new();
        let mut skipped = 0usize;
        for (row_number, result) in rdr.records().enumerate() {
            let entity = result.ok().and_then(|record| {
                let id = match id_idx {
                    Some(idx) => table::text(&record, idx)?.to_string(),
                    None => row_number.to_string(),
                };
                Some(ScoredEntity {
                    id,
                    latitude: table::float(&record, lat_idx)?,
                    longitude: table::float(&record, lon_idx)?,
                    scores: component_values(&record, &columns)?,
                })
            });
            match entity {
                Some(entity) => entities.push(entity),
                None => skipped += 1,
            }
        }
        log::info!(
            "scores: {} components, {} entities, skipped {} malformed",
            columns.len(),
            entities.len(),
            skipped
        );
        let names = columns.into_iter().map(|(name, _)| name).collect();
        Ok(ParsedTable {
            table: ComponentScores { names, entities },
            skipped,
        })
    }
}

/// `(name, column index)` for every `PC<n>` header, ordered by `n`.
fn component_columns(headers: &StringRecord) -> Vec<(String, usize)> {
    let mut columns: Vec<(u32, String, usize)> = headers
        .iter()
        .enumerate()
        .filter_map(|(idx, header)| {
            let header = header.trim();
            let number = header
                .strip_prefix("PC")
                .or_else(|| header.strip_prefix("pc"))?
                .parse::<u32>()
                .ok()?;
            Some((number, header.to_string(), idx))
        })
        .collect();
    columns.sort_by_key(|(number, _, _)| *number);
    columns
        .into_iter()
        .map(|(_, name, idx)| (name, idx))
        .collect()
}

fn component_values(record: &StringRecord, columns: &[(String, usize)]) -> Option<Vec<f64>> {
    columns
        .iter()
        .map(|(_, idx)| table::float(record, *idx))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{ComponentLoadings, ComponentScores};

    #[test]
    fn test_parse_loadings_orders_components_numerically() {
        let csv_data = "day,PC10,PC2,PC1\n0,1.0,2.0,3.0\n1,-1.0,x,0.5\n2,4.0,5.0,6.0\n";
        let parsed = ComponentLoadings::parse_csv(csv_data).unwrap();
        let (loadings, skipped) = (parsed.table, parsed.skipped);
        assert_eq!(loadings.names, vec!["PC1", "PC2", "PC10"]);
        assert_eq!(loadings.rows, vec![vec![3.0, 2.0, 1.0], vec![6.0, 5.0, 4.0]]);
        assert_eq!(skipped, 1);
        assert_eq!(loadings.component_count(), 3);
    }

    #[test]
    fn test_parse_scores() {
        let csv_data = "\
station_nm,lat,lon,PC1,PC2
W1,40.0,-100.0,0.5,-0.25
W2,bad,-101.0,0.1,0.2
W3,41.0,-102.0,-1.5,2.0
";
        let parsed = ComponentScores::parse_csv(csv_data).unwrap();
        let (scores, skipped) = (parsed.table, parsed.skipped);
        assert_eq!(skipped, 1);
        assert_eq!(scores.entities.len(), 2);
        assert_eq!(scores.entities[1].id, "W3");
        assert_eq!(scores.entities[1].scores, vec![-1.5, 2.0]);
    }

    #[test]
    fn test_parse_scores_requires_coordinates() {
        let csv_data = "id,PC1\nW1,0.5\n";
        assert!(ComponentScores::parse_csv(csv_data).is_err());
    }
}
