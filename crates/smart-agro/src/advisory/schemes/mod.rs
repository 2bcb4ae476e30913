mod policy;

pub use policy::{EligibilityVerdict, IneligibilityReason};

use serde::Serialize;
use tracing::{debug, warn};

use crate::advisory::criterion::EngineError;
use crate::advisory::knowledge::{EntityRecord, KnowledgeBase};
use crate::advisory::observation::Observation;
use policy::decide_eligibility;

/// Strict eligibility filter: a record passes only when every criterion holds.
#[derive(Debug, Clone, Copy, Default)]
pub struct SchemeMatcher;

impl SchemeMatcher {
    pub fn new() -> Self {
        Self
    }

    /// One verdict per record, in knowledge-base order.
    pub fn assess<'kb, M>(
        &self,
        observation: &Observation,
        knowledge_base: &'kb KnowledgeBase<M>,
    ) -> Result<Vec<SchemeAssessment<'kb, M>>, EngineError> {
        knowledge_base
            .iter()
            .map(|record| {
                let verdict = decide_eligibility(knowledge_base.domain(), record, observation)
                    .map_err(|err| {
                        warn!(error = %err, "eligibility table misconfigured");
                        err
                    })?;
                Ok(SchemeAssessment {
                    scheme: record,
                    verdict,
                })
            })
            .collect()
    }

    /// Records the observation satisfies, preserving knowledge-base order.
    ///
    /// An empty result is a valid "no matching scheme" answer.
    pub fn filter<'kb, M>(
        &self,
        observation: &Observation,
        knowledge_base: &'kb KnowledgeBase<M>,
    ) -> Result<Vec<&'kb EntityRecord<M>>, EngineError> {
        let eligible: Vec<_> = self
            .assess(observation, knowledge_base)?
            .into_iter()
            .filter(|assessment| assessment.verdict.is_eligible())
            .map(|assessment| assessment.scheme)
            .collect();

        debug!(
            domain = knowledge_base.domain(),
            evaluated = knowledge_base.len(),
            eligible = eligible.len(),
            "eligibility filter complete"
        );

        Ok(eligible)
    }
}

#[derive(Debug, Serialize)]
#[serde(bound(serialize = "M: Serialize"))]
pub struct SchemeAssessment<'kb, M> {
    pub scheme: &'kb EntityRecord<M>,
    pub verdict: EligibilityVerdict,
}
