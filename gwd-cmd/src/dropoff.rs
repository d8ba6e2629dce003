//! Regional decade dropoff command.

use anyhow::Context;
use gwd_core::{region::RegionGeometry, well_record::WellRecord};
use gwd_data::{
    classify::GeoClassifier,
    dropoff::{self, AggregateReport, DecadeCell},
};
use gwd_utils::years::visible_decades;
use log::info;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Serialize)]
pub struct DropoffOutput {
    pub report: AggregateReport,
    pub skipped_rows: usize,
    /// Decades offered to the map view, after exclusions.
    pub decades: Vec<i32>,
    pub regions: BTreeMap<String, BTreeMap<i32, DecadeCell>>,
}

/// Aggregate in-memory inputs. Region cells keep every decade; only the
/// decade list honors `excluded`.
pub fn dropoff_output(records_csv: &str, regions_geojson: &str, excluded: &[i32]) -> anyhow::Result<DropoffOutput> {
    let parsed = WellRecord::parse_csv(records_csv).context("failed to parse well records")?;
    let regions = RegionGeometry::from_geojson(regions_geojson).context("failed to parse region geometry")?;
    let classifier = GeoClassifier::new(regions)?;
    info!("Classifying wells against {} regions", classifier.region_count());
    let aggregate = dropoff::aggregate(&parsed.rows, &classifier)?;
    if aggregate.is_empty() {
        log::warn!("No region has a decade with two or more observations");
    }

    let regions = aggregate
        .regions()
        .filter_map(|name| Some((name.to_string(), aggregate.region(name)?.clone())))
        .collect();
    Ok(DropoffOutput {
        report: aggregate.report().clone(),
        skipped_rows: parsed.skipped,
        decades: visible_decades(&aggregate.decades(), excluded),
        regions,
    })
}

pub fn run_dropoff(records_path: &str, regions_path: &str, excluded: &[i32]) -> anyhow::Result<()> {
    let records_csv = crate::read_input(records_path)?;
    let regions_geojson = crate::read_input(regions_path)?;
    let output = dropoff_output(&records_csv, &regions_geojson, excluded)?;
    info!(
        "Dropoff complete: {} regions, {} decades",
        output.regions.len(),
        output.decades.len()
    );
    crate::print_json(&output)
}
