//! Single-well depth history.

use anyhow::Context;
use gwd_core::well_record::WellRecord;
use gwd_data::history::{self, StationHistory};
use log::info;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct HistoryOutput {
    pub stations: Vec<String>,
    #[serde(flatten)]
    pub history: StationHistory,
}

/// History for `station`, or for the first station id in sorted order.
pub fn history_output(records_csv: &str, station: Option<&str>) -> anyhow::Result<HistoryOutput> {
    let parsed = WellRecord::parse_csv(records_csv).context("failed to parse well records")?;
    let stations = history::station_ids(&parsed.rows);
    let selected = match station {
        Some(id) => id.to_string(),
        None => stations.first().cloned().context("no stations in the well records")?,
    };
    if history::years_for_station(&parsed.rows, &selected).is_empty() {
        anyhow::bail!("station {selected} has no records");
    }
    Ok(HistoryOutput {
        history: StationHistory::for_station(&parsed.rows, &selected),
        stations,
    })
}

pub fn run_history(records_path: &str, station: Option<&str>) -> anyhow::Result<()> {
    let records_csv = crate::read_input(records_path)?;
    let output = history_output(&records_csv, station)?;
    info!(
        "History for {}: {} years",
        output.history.station_id,
        output.history.years.len()
    );
    crate::print_json(&output)
}
