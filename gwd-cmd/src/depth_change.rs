//! Largest depth changes between two years.

use anyhow::Context;
use gwd_core::well_record::WellRecord;
use gwd_data::depth_change::{self, DepthChange};
use log::info;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct DepthChangeOutput {
    pub from: i32,
    pub to: i32,
    /// Stations observed in both years.
    pub stations: usize,
    /// Distinct well locations in the input.
    pub locations: usize,
    pub top: Vec<DepthChange>,
}

pub fn depth_change_output(records_csv: &str, from: i32, to: i32, top: usize) -> anyhow::Result<DepthChangeOutput> {
    let parsed = WellRecord::parse_csv(records_csv).context("failed to parse well records")?;
    let changes = depth_change::depth_changes(&parsed.rows, from, to);
    Ok(DepthChangeOutput {
        from,
        to,
        stations: changes.len(),
        locations: depth_change::unique_locations(&parsed.rows).len(),
        top: depth_change::top_depth_changes(&changes, top),
    })
}

pub fn run_depth_change(records_path: &str, from: i32, to: i32, top: usize) -> anyhow::Result<()> {
    let records_csv = crate::read_input(records_path)?;
    let output = depth_change_output(&records_csv, from, to, top)?;
    info!(
        "Depth change {} -> {}: {} stations, showing {}",
        from,
        to,
        output.stations,
        output.top.len()
    );
    crate::print_json(&output)
}
