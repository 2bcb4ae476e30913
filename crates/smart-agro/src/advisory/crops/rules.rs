use super::config::ScoringConfig;
use super::{ScoreComponent, ScoreFactor};
use crate::advisory::criterion::{CriterionMatch, EngineError};
use crate::advisory::knowledge::CropRecord;
use crate::advisory::observation::Observation;

pub(crate) fn score_crop(
    domain: &str,
    crop: &CropRecord,
    observation: &Observation,
    config: &ScoringConfig,
) -> Result<(Vec<ScoreComponent>, u16), EngineError> {
    let mut components = Vec::with_capacity(crop.criteria.len() + 1);
    let mut total_score: u16 = 0;

    for criterion in &crop.criteria {
        let (field, full_points) = match criterion
            .field()
            .and_then(|field| config.full_points(field).map(|points| (field, points)))
        {
            Some(weighted) => weighted,
            None => {
                return Err(EngineError::UnweightedCriterion {
                    entity: crop.name.clone(),
                    criterion: criterion.describe(),
                })
            }
        };

        let outcome = criterion
            .evaluate(observation)
            .map_err(|source| EngineError::Criterion {
                domain: domain.to_string(),
                entity: crop.name.clone(),
                source,
            })?;

        let (points, notes) = match outcome {
            CriterionMatch::Exact => (full_points, format!("{} satisfied", criterion.describe())),
            CriterionMatch::NearMiss => (
                config.near_miss_points,
                format!("close to {}", criterion.describe()),
            ),
            CriterionMatch::Miss => (0, format!("outside {}", criterion.describe())),
        };

        total_score = total_score.saturating_add(points);
        components.push(ScoreComponent {
            factor: ScoreFactor::Field(field),
            outcome: Some(outcome),
            points,
            notes,
        });
    }

    if crop.metadata.drought_tolerant {
        total_score = total_score.saturating_add(config.drought_bonus);
        components.push(ScoreComponent {
            factor: ScoreFactor::DroughtTolerance,
            outcome: None,
            points: config.drought_bonus,
            notes: "drought-tolerant variety".to_string(),
        });
    }

    Ok((components, total_score))
}
