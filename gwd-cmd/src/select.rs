//! Box selection statistics over projected points.

use anyhow::Context;
use gwd_core::geo_point::GeoPoint;
use gwd_data::{
    projection::AlbersUsa,
    selection::{HistogramSpec, Selection, SelectionBox, SelectionStats, SelectionSummary},
};
use log::info;

pub struct SelectOptions {
    /// `(x0, y0, x1, y1)` in projected pixels; `None` means nothing is drawn.
    pub bounds: Option<(f64, f64, f64, f64)>,
    /// `(min, max, bin_width)`
    pub histogram: (f64, f64, f64),
    pub scale: f64,
    pub translate: (f64, f64),
}

pub fn select_summary(points_csv: &str, value_column: &str, options: &SelectOptions) -> anyhow::Result<SelectionSummary> {
    let (min, max, bin_width) = options.histogram;
    let spec = HistogramSpec::new(min, max, bin_width)?;
    let parsed = GeoPoint::parse_csv(points_csv, value_column).context("failed to parse points")?;
    let projection = AlbersUsa::new(options.scale, options.translate);
    let stats = SelectionStats::new(&parsed.rows, &projection, spec);
    info!("{} of {} points on the map", stats.points().len(), parsed.rows.len());

    let selection = options
        .bounds
        .map(|(x0, y0, x1, y1)| Selection::from(SelectionBox::new(x0, y0, x1, y1)));
    Ok(stats.stats(selection.as_ref()))
}

pub fn run_select(points_path: &str, value_column: &str, options: &SelectOptions) -> anyhow::Result<()> {
    let points_csv = crate::read_input(points_path)?;
    let summary = select_summary(&points_csv, value_column, options)?;
    info!("Selection complete: {} points selected", summary.count);
    crate::print_json(&summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    const POINTS: &str = include_str!("../../fixtures/depth_change_points.csv");

    fn options(bounds: Option<(f64, f64, f64, f64)>) -> SelectOptions {
        SelectOptions {
            bounds,
            histogram: (-30.0, 30.0, 10.0),
            scale: 1200.0,
            translate: (480.0, 300.0),
        }
    }

    #[test]
    fn test_no_box_is_no_selection() {
        let summary = select_summary(POINTS, "depth_change", &options(None)).unwrap();
        assert_eq!(summary, SelectionSummary::no_selection());
    }

    #[test]
    fn test_whole_map_box() {
        // Hawaii does not project and the blank value is skipped
        let summary = select_summary(POINTS, "depth_change", &options(Some((0.0, 0.0, 960.0, 600.0)))).unwrap();
        assert_eq!(summary.count, 3);
        assert!((summary.mean.unwrap() - 2.0).abs() < f64::EPSILON);
        let counts: Vec<usize> = summary.histogram.iter().map(|b| b.count).collect();
        assert_eq!(counts, vec![0, 0, 1, 2, 0, 0]);
    }

    #[test]
    fn test_empty_box_keeps_bins() {
        let summary = select_summary(POINTS, "depth_change", &options(Some((0.0, 0.0, 1.0, 1.0)))).unwrap();
        assert_eq!(summary.count, 0);
        assert_eq!(summary.mean, None);
        assert_eq!(summary.histogram.len(), 6);
    }

    #[test]
    fn test_bad_histogram_and_column() {
        let mut bad = options(None);
        bad.histogram = (10.0, -10.0, 5.0);
        assert!(select_summary(POINTS, "depth_change", &bad).is_err());
        assert!(select_summary(POINTS, "no_such_column", &options(None)).is_err());
    }
}
