//! Principal-component ranking command.

use anyhow::Context;
use gwd_core::component::{ComponentLoadings, ComponentScores};
use gwd_data::ranking::{ComponentRanker, Ranking};
use log::{info, warn};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct RankOutput {
    #[serde(flatten)]
    pub ranking: Ranking,
    pub scale_factor: f64,
    pub loading_extent: Option<(f64, f64)>,
}

/// Rank by `component`, counted from 1 as the component columns are named.
pub fn rank_output(scores_csv: &str, loadings_csv: &str, component: usize) -> anyhow::Result<RankOutput> {
    let Some(index) = component.checked_sub(1) else {
        anyhow::bail!("components are numbered from 1");
    };
    let scores = ComponentScores::parse_csv(scores_csv).context("failed to parse scores")?;
    let loadings = ComponentLoadings::parse_csv(loadings_csv).context("failed to parse loadings")?;
    if scores.skipped + loadings.skipped > 0 {
        info!(
            "Skipped {} score rows and {} loading rows",
            scores.skipped, loadings.skipped
        );
    }

    let ranker = ComponentRanker::new(&loadings.table, &scores.table);
    let ranking = ranker.rank(index)?;
    let loading_extent = match ranker.loading_extent(index) {
        Ok(extent) => extent,
        Err(err) => {
            warn!("No loadings for {}: {}", ranking.component, err);
            None
        }
    };
    Ok(RankOutput {
        scale_factor: ranker.scale_factors().get(index).copied().unwrap_or(1.0),
        ranking,
        loading_extent,
    })
}

pub fn run_rank(scores_path: &str, loadings_path: &str, component: usize) -> anyhow::Result<()> {
    let scores_csv = crate::read_input(scores_path)?;
    let loadings_csv = crate::read_input(loadings_path)?;
    let output = rank_output(&scores_csv, &loadings_csv, component)?;
    info!(
        "Ranked {} wells by {}",
        output.ranking.order.len(),
        output.ranking.component
    );
    crate::print_json(&output)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCORES: &str = include_str!("../../fixtures/pca_scores.csv");
    const LOADINGS: &str = include_str!("../../fixtures/pca_loadings.csv");

    #[test]
    fn test_rank_first_component() {
        let output = rank_output(SCORES, LOADINGS, 1).unwrap();
        let ids: Vec<&str> = output.ranking.order.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "d", "a", "b"]);
        assert_eq!(output.ranking.component, "PC1");
        assert_eq!(output.ranking.color_domain, Some([2.0, 0.0, -6.0]));
        assert!((output.scale_factor - 2.0).abs() < f64::EPSILON);
        assert_eq!(output.loading_extent, Some((-2.0, 1.0)));
    }

    #[test]
    fn test_rank_second_component() {
        let output = rank_output(SCORES, LOADINGS, 2).unwrap();
        let ids: Vec<&str> = output.ranking.order.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["d", "b", "c", "a"]);
        assert_eq!(output.loading_extent, Some((-0.4, 0.2)));
    }

    #[test]
    fn test_score_component_without_loadings() {
        let loadings = "day,PC1\n1,0.5\n2,-2.0\n";
        let output = rank_output(SCORES, loadings, 2).unwrap();
        assert_eq!(output.ranking.component, "PC2");
        assert_eq!(output.loading_extent, None);
        // no loadings for PC2, so its scores stay unscaled
        assert!((output.scale_factor - 1.0).abs() < f64::EPSILON);
        assert_eq!(output.ranking.color_domain, Some([10.0, 0.0, -1.0]));
    }

    #[test]
    fn test_component_out_of_range() {
        assert!(rank_output(SCORES, LOADINGS, 0).is_err());
        assert!(rank_output(SCORES, LOADINGS, 3).is_err());
    }
}
