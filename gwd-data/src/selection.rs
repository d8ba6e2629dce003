//! Mean and fixed-bin histogram over an interactively drawn selection.
//!
//! Selections live in the projected plane, so points are projected once per
//! load and every selection change is a full linear rescan over them.

use crate::projection::Projection;
use geo::{Contains, Coord, LineString, Point, Polygon};
use gwd_core::{
    error::{GwdError, Result},
    geo_point::GeoPoint,
};
use gwd_utils::stats::mean;
use serde::{Deserialize, Serialize};

/// A rectangle in projected-plane coordinates. Corners may be given in any
/// order (a brush dragged up and to the left is still a valid box).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SelectionBox {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl SelectionBox {
    pub fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Inclusive on all four sides.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        let (x_lo, x_hi) = (self.x0.min(self.x1), self.x0.max(self.x1));
        let (y_lo, y_hi) = (self.y0.min(self.y1), self.y0.max(self.y1));
        x >= x_lo && x <= x_hi && y >= y_lo && y <= y_hi
    }
}

/// A drawn selection: a rectangular brush or a free-form lasso.
#[derive(Debug, Clone, PartialEq)]
pub enum Selection {
    Box(SelectionBox),
    Lasso(Polygon<f64>),
}

impl Selection {
    /// Lasso through the given projected-plane vertices; the ring is closed
    /// automatically.
    pub fn lasso(vertices: &[(f64, f64)]) -> Self {
        let ring: LineString<f64> = vertices.iter().map(|&(x, y)| Coord { x, y }).collect();
        Selection::Lasso(Polygon::new(ring, vec![]))
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        match self {
            Selection::Box(selection_box) => selection_box.contains(x, y),
            Selection::Lasso(polygon) => polygon.contains(&Point::new(x, y)),
        }
    }
}

impl From<SelectionBox> for Selection {
    fn from(selection_box: SelectionBox) -> Self {
        Selection::Box(selection_box)
    }
}

/// A point together with its position on the projected plane.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectedPoint {
    pub point: GeoPoint,
    pub x: f64,
    pub y: f64,
}

/// Project every point, dropping the ones the projection cannot place.
pub fn project_points<P: Projection>(points: &[GeoPoint], projection: &P) -> Vec<ProjectedPoint> {
    let projected: Vec<ProjectedPoint> = points
        .iter()
        .filter_map(|point| {
            let (x, y) = projection.project(point.longitude, point.latitude)?;
            Some(ProjectedPoint {
                point: point.clone(),
                x,
                y,
            })
        })
        .collect();
    if projected.len() < points.len() {
        log::info!(
            "projection: {} of {} points fall outside the map and were dropped",
            points.len() - projected.len(),
            points.len()
        );
    }
    projected
}

/// Upper bound on the number of bins a histogram may have.
pub const MAX_BINS: usize = 10_000;

/// Histogram domain and bin width. Values outside the domain are clamped
/// into the boundary bins rather than dropped.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HistogramSpec {
    min: f64,
    max: f64,
    bin_width: f64,
}

impl Default for HistogramSpec {
    fn default() -> Self {
        Self {
            min: -30.0,
            max: 30.0,
            bin_width: 10.0,
        }
    }
}

impl HistogramSpec {
    pub fn new(min: f64, max: f64, bin_width: f64) -> Result<Self> {
        let valid = min.is_finite() && max.is_finite() && bin_width.is_finite();
        let bins = ((max - min) / bin_width).ceil();
        if !valid || max <= min || bin_width <= 0.0 || !(1.0..=MAX_BINS as f64).contains(&bins) {
            return Err(GwdError::InvalidHistogram {
                min,
                max,
                bin_width,
            });
        }
        Ok(Self {
            min,
            max,
            bin_width,
        })
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn bin_width(&self) -> f64 {
        self.bin_width
    }

    pub fn bin_count(&self) -> usize {
        ((self.max - self.min) / self.bin_width).ceil() as usize
    }

    /// Empty bins covering the domain; the last bin is cut at `max`.
    pub fn empty_bins(&self) -> Vec<HistogramBin> {
        (0..self.bin_count())
            .map(|i| {
                let lower = self.min + i as f64 * self.bin_width;
                HistogramBin {
                    lower,
                    upper: (lower + self.bin_width).min(self.max),
                    count: 0,
                }
            })
            .collect()
    }

    /// Bin for `value` after clamping it into `[min, max]`. Bins are
    /// half-open except the last, which also takes `max`.
    pub fn bin_index(&self, value: f64) -> usize {
        let clamped = value.clamp(self.min, self.max);
        let idx = ((clamped - self.min) / self.bin_width).floor() as usize;
        idx.min(self.bin_count() - 1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

/// Result of one selection pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectionSummary {
    /// Points inside the selection.
    pub count: usize,
    /// `None` when nothing is selected or the selection is empty.
    pub mean: Option<f64>,
    pub histogram: Vec<HistogramBin>,
}

impl SelectionSummary {
    /// The "nothing drawn" result.
    pub fn no_selection() -> Self {
        Self {
            count: 0,
            mean: None,
            histogram: Vec::new(),
        }
    }
}

/// Mean and histogram of `value` over the points inside `selection`.
///
/// With no selection the result has no mean and an empty histogram. With a
/// selection that catches no points the mean is `None` and every bin is zero.
pub fn stats(points: &[ProjectedPoint], selection: Option<&Selection>, spec: &HistogramSpec) -> SelectionSummary {
    let Some(selection) = selection else {
        return SelectionSummary::no_selection();
    };
    let selected: Vec<f64> = points
        .iter()
        .filter(|p| selection.contains(p.x, p.y))
        .map(|p| p.point.value)
        .collect();

    let mut histogram = spec.empty_bins();
    for value in &selected {
        histogram[spec.bin_index(*value)].count += 1;
    }
    log::debug!("selection: {} of {} points", selected.len(), points.len());
    SelectionSummary {
        count: selected.len(),
        mean: mean(selected.iter().copied()),
        histogram,
    }
}

/// Projected points and histogram settings for one loaded point table.
#[derive(Debug, Clone)]
pub struct SelectionStats {
    points: Vec<ProjectedPoint>,
    spec: HistogramSpec,
}

impl SelectionStats {
    pub fn new<P: Projection>(points: &[GeoPoint], projection: &P, spec: HistogramSpec) -> Self {
        Self {
            points: project_points(points, projection),
            spec,
        }
    }

    pub fn points(&self) -> &[ProjectedPoint] {
        &self.points
    }

    pub fn stats(&self, selection: Option<&Selection>) -> SelectionSummary {
        stats(&self.points, selection, &self.spec)
    }
}
