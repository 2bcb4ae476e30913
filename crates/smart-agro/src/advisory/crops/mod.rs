mod config;
mod rules;
pub mod views;

pub use config::{ScoringConfig, ToleranceBands};
pub use views::CropProfileView;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::advisory::criterion::{CriterionMatch, EngineError};
use crate::advisory::knowledge::CropKnowledgeBase;
use crate::advisory::observation::{Observation, ObservationField};

/// Stateless evaluator ranking crops by partial-credit suitability.
#[derive(Debug, Clone, Default)]
pub struct CropAdvisor {
    config: ScoringConfig,
}

impl CropAdvisor {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    /// Score every crop in knowledge-base order, including those below the floor.
    pub fn score_all(
        &self,
        observation: &Observation,
        knowledge_base: &CropKnowledgeBase,
    ) -> Result<Vec<CropScorecard>, EngineError> {
        knowledge_base
            .iter()
            .map(|crop| {
                let (components, score) =
                    rules::score_crop(knowledge_base.domain(), crop, observation, &self.config)
                        .map_err(|err| {
                            warn!(error = %err, "crop table misconfigured");
                            err
                        })?;

                Ok(CropScorecard {
                    name: crop.name.clone(),
                    description: crop.description.clone(),
                    score,
                    qualifies: score >= self.config.inclusion_floor,
                    components,
                })
            })
            .collect()
    }

    /// Crops meeting the inclusion floor, best first, ties kept in table order.
    ///
    /// `limit` truncates the ranking; `None` returns every qualifying crop. An empty
    /// ranking is a valid "no suitable crop" answer.
    pub fn rank(
        &self,
        observation: &Observation,
        knowledge_base: &CropKnowledgeBase,
        limit: Option<usize>,
    ) -> Result<Vec<CropRecommendation>, EngineError> {
        let mut qualifying: Vec<CropScorecard> = self
            .score_all(observation, knowledge_base)?
            .into_iter()
            .filter(|card| card.qualifies)
            .collect();

        // `sort_by` is stable, so equal scores keep knowledge-base order.
        qualifying.sort_by(|left, right| right.score.cmp(&left.score));
        if let Some(limit) = limit {
            qualifying.truncate(limit);
        }

        debug!(
            domain = knowledge_base.domain(),
            evaluated = knowledge_base.len(),
            recommended = qualifying.len(),
            "crop ranking complete"
        );

        Ok(qualifying
            .into_iter()
            .map(|card| CropRecommendation {
                name: card.name,
                description: card.description,
                score: card.score,
                components: card.components,
            })
            .collect())
    }
}

/// What a score component was awarded for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreFactor {
    Field(ObservationField),
    DroughtTolerance,
}

/// Discrete contribution to a crop score, kept for transparent audits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreComponent {
    pub factor: ScoreFactor,
    pub outcome: Option<CriterionMatch>,
    pub points: u16,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CropScorecard {
    pub name: String,
    pub description: String,
    pub score: u16,
    pub qualifies: bool,
    pub components: Vec<ScoreComponent>,
}

/// One entry of the ranked crop list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CropRecommendation {
    pub name: String,
    pub description: String,
    pub score: u16,
    pub components: Vec<ScoreComponent>,
}
