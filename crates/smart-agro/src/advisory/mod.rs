//! Rule-based advisory engine: crop ranking, scheme eligibility and disaster risk.
//!
//! Each evaluator is a pure function of a normalized observation and an immutable
//! knowledge base. The free functions below are the in-process entry points; the
//! evaluator structs expose the same behavior with configurable dials.

pub mod criterion;
pub mod crops;
pub mod intake;
pub mod knowledge;
pub mod market;
pub mod observation;
pub mod risk;
pub mod schemes;

#[cfg(test)]
mod tests;

use chrono::NaiveDate;

pub use criterion::{Criterion, CriterionError, CriterionMatch, EngineError, SetMatching, Tolerance};
pub use crops::{
    CropAdvisor, CropProfileView, CropRecommendation, CropScorecard, ScoreComponent, ScoreFactor,
    ScoringConfig, ToleranceBands,
};
pub use intake::{CropConditions, FarmerProfile, FieldReport, IntakeError, IntakeGuard};
pub use knowledge::{
    AdvisoryCatalog, CropKnowledgeBase, CropRecord, CropTraits, EntityRecord, KnowledgeBase,
    KnowledgeBaseError, SchemeDetails, SchemeKnowledgeBase, SchemeRecord,
};
pub use market::{MarketDesk, MarketQuery, PriceHistory, PricePoint, PriceQuote};
pub use observation::{Observation, ObservationBuilder, ObservationField, ObservationValue};
pub use risk::{
    DailyOutlook, FieldConditions, ForecastSource, RiskAssessment, RiskAssessor, RiskConfig,
    RiskReport, Severity, SimulatedForecast, SkyCondition, SoilMoisture, WeatherForecast,
};
pub use schemes::{EligibilityVerdict, IneligibilityReason, SchemeAssessment, SchemeMatcher};

/// Rank crops with the default scoring dials.
pub fn rank_crops(
    observation: &Observation,
    knowledge_base: &CropKnowledgeBase,
    limit: Option<usize>,
) -> Result<Vec<CropRecommendation>, EngineError> {
    CropAdvisor::default().rank(observation, knowledge_base, limit)
}

pub fn filter_eligible_schemes<'kb, M>(
    observation: &Observation,
    knowledge_base: &'kb KnowledgeBase<M>,
) -> Result<Vec<&'kb EntityRecord<M>>, EngineError> {
    SchemeMatcher::new().filter(observation, knowledge_base)
}

/// Assess field risk and attach an outlook starting at `start`.
pub fn assess_disaster_risk<F: ForecastSource + ?Sized>(
    conditions: &FieldConditions,
    start: NaiveDate,
    forecast: &mut F,
) -> RiskReport {
    RiskAssessor::default().report(conditions, start, forecast)
}
