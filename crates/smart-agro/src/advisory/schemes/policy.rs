use serde::Serialize;

use crate::advisory::criterion::{CriterionError, EngineError};
use crate::advisory::knowledge::EntityRecord;
use crate::advisory::observation::{Observation, ObservationField};

/// All-or-nothing verdict for one record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum EligibilityVerdict {
    Eligible,
    Ineligible(IneligibilityReason),
}

impl EligibilityVerdict {
    pub fn is_eligible(&self) -> bool {
        matches!(self, EligibilityVerdict::Eligible)
    }

    pub fn summary(&self) -> String {
        match self {
            EligibilityVerdict::Eligible => "eligible".to_string(),
            EligibilityVerdict::Ineligible(reason) => reason.summary(),
        }
    }
}

/// First criterion a record failed on.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IneligibilityReason {
    pub field: Option<ObservationField>,
    pub requirement: String,
}

impl IneligibilityReason {
    pub fn summary(&self) -> String {
        format!("requires {}", self.requirement)
    }
}

/// Every field the record's criteria declare must be present before evaluation starts.
pub(crate) fn check_preconditions<M>(
    domain: &str,
    record: &EntityRecord<M>,
    observation: &Observation,
) -> Result<(), EngineError> {
    match record
        .criteria
        .iter()
        .filter_map(|criterion| criterion.field())
        .find(|field| !observation.contains(*field))
    {
        Some(field) => Err(EngineError::Criterion {
            domain: domain.to_string(),
            entity: record.name.clone(),
            source: CriterionError::MissingField(field),
        }),
        None => Ok(()),
    }
}

pub(crate) fn decide_eligibility<M>(
    domain: &str,
    record: &EntityRecord<M>,
    observation: &Observation,
) -> Result<EligibilityVerdict, EngineError> {
    check_preconditions(domain, record, observation)?;

    for criterion in &record.criteria {
        let outcome = criterion
            .evaluate(observation)
            .map_err(|source| EngineError::Criterion {
                domain: domain.to_string(),
                entity: record.name.clone(),
                source,
            })?;

        if !outcome.passed() {
            return Ok(EligibilityVerdict::Ineligible(IneligibilityReason {
                field: criterion.field(),
                requirement: criterion.describe(),
            }));
        }
    }

    Ok(EligibilityVerdict::Eligible)
}
