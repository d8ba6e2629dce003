//! Magnitude scaling and draw-order ranking of principal-component scores.

use gwd_core::{
    component::{ComponentLoadings, ComponentScores, ScoredEntity},
    error::{GwdError, Result},
};
use gwd_utils::stats::{extent, max_abs};
use serde::Serialize;

/// One entity's scaled score for the active component.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedEntity {
    pub id: String,
    pub latitude: f64,
    pub longitude: f64,
    pub score: f64,
}

/// Entities in draw order (smallest magnitude first) plus the diverging
/// color domain for the active component.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ranking {
    pub component: String,
    pub order: Vec<RankedEntity>,
    /// `[max, 0, min]` of the scaled scores; `None` when there are no entities.
    pub color_domain: Option<[f64; 3]>,
}

/// Per-component scale factor: the largest absolute loading of that
/// component. A component with no loadings is left unscaled.
pub fn loading_scale_factors(loadings: &ComponentLoadings) -> Vec<f64> {
    (0..loadings.component_count())
        .map(|component| {
            max_abs(loadings.rows.iter().filter_map(|row| row.get(component).copied()))
                .unwrap_or(1.0)
        })
        .collect()
}

/// Multiply every score by its component's factor. Components without a
/// factor keep their raw score. The input table is left untouched.
pub fn scale_scores(scores: &ComponentScores, factors: &[f64]) -> Vec<ScoredEntity> {
    scores
        .entities
        .iter()
        .map(|entity| ScoredEntity {
            scores: entity
                .scores
                .iter()
                .enumerate()
                .map(|(component, score)| score * factors.get(component).copied().unwrap_or(1.0))
                .collect(),
            ..entity.clone()
        })
        .collect()
}

/// Scaled score table, computed once per load, that can be re-ranked by
/// any component without touching the raw scores.
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentRanker {
    names: Vec<String>,
    scale_factors: Vec<f64>,
    loading_extents: Vec<Option<(f64, f64)>>,
    scaled: Vec<ScoredEntity>,
}

impl ComponentRanker {
    pub fn new(loadings: &ComponentLoadings, scores: &ComponentScores) -> Self {
        if loadings.component_count() != scores.component_count() {
            log::warn!(
                "ranking: {} loading components vs {} score components",
                loadings.component_count(),
                scores.component_count()
            );
        }
        let scale_factors = loading_scale_factors(loadings);
        let loading_extents = (0..loadings.component_count())
            .map(|component| {
                extent(loadings.rows.iter().filter_map(|row| row.get(component).copied()))
                    .map(|(lo, hi)| (lo.min(0.0), hi))
            })
            .collect();
        Self {
            names: scores.names.clone(),
            scaled: scale_scores(scores, &scale_factors),
            scale_factors,
            loading_extents,
        }
    }

    pub fn component_names(&self) -> &[String] {
        &self.names
    }

    pub fn scale_factors(&self) -> &[f64] {
        &self.scale_factors
    }

    pub fn scaled_scores(&self) -> &[ScoredEntity] {
        &self.scaled
    }

    /// Rank entities by the absolute scaled score of `component` (zero-based),
    /// ascending, so the most salient points are drawn last. Ties keep table
    /// order.
    pub fn rank(&self, component: usize) -> Result<Ranking> {
        let name = self.names.get(component).ok_or(GwdError::UnknownComponent {
            index: component,
            available: self.names.len(),
        })?;
        let mut order: Vec<RankedEntity> = self
            .scaled
            .iter()
            .filter_map(|entity| {
                Some(RankedEntity {
                    score: *entity.scores.get(component)?,
                    id: entity.id.clone(),
                    latitude: entity.latitude,
                    longitude: entity.longitude,
                })
            })
            .collect();
        order.sort_by(|a, b| a.score.abs().total_cmp(&b.score.abs()));

        let color_domain = extent(order.iter().map(|e| e.score)).map(|(min, max)| [max, 0.0, min]);
        Ok(Ranking {
            component: name.clone(),
            order,
            color_domain,
        })
    }

    /// `(min(0, lowest loading), highest loading)` for the component's line
    /// plot y-axis.
    pub fn loading_extent(&self, component: usize) -> Result<Option<(f64, f64)>> {
        self.loading_extents
            .get(component)
            .copied()
            .ok_or(GwdError::UnknownComponent {
                index: component,
                available: self.loading_extents.len(),
            })
    }
}
