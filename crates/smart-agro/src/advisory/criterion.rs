use serde::{Deserialize, Serialize};

use super::observation::{Observation, ObservationField, ObservationValue, ValueKind};

/// Band outside a range that still earns partial credit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Tolerance {
    /// Widens both bounds by a fixed amount.
    Absolute(f64),
    /// Widens each bound by a fraction of itself.
    Relative(f64),
}

impl Tolerance {
    fn widen(self, min: f64, max: f64) -> (f64, f64) {
        match self {
            Tolerance::Absolute(delta) => (min - delta, max + delta),
            Tolerance::Relative(ratio) => (min - min.abs() * ratio, max + max.abs() * ratio),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SetMatching {
    /// Observed text equals one of the allowed values, ignoring case.
    #[default]
    Exact,
    /// One of the allowed values occurs inside the observed text.
    Contains,
}

/// Single testable predicate over one observation field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Criterion {
    Range {
        field: ObservationField,
        min: f64,
        max: f64,
        #[serde(default)]
        tolerance: Option<Tolerance>,
    },
    Set {
        field: ObservationField,
        allowed: Vec<String>,
        #[serde(default)]
        matching: SetMatching,
    },
    Flag {
        field: ObservationField,
        expected: bool,
    },
    ThresholdMax {
        field: ObservationField,
        limit: f64,
    },
    ThresholdMin {
        field: ObservationField,
        limit: f64,
    },
    AlwaysTrue {
        #[serde(default)]
        note: Option<String>,
    },
}

/// Result of testing one criterion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CriterionMatch {
    Exact,
    NearMiss,
    Miss,
}

impl CriterionMatch {
    pub fn passed(self) -> bool {
        matches!(self, CriterionMatch::Exact)
    }
}

/// Raised when an observation cannot satisfy a declared criterion's contract.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CriterionError {
    #[error("observation is missing field `{0}`")]
    MissingField(ObservationField),
    #[error("field `{field}` expected a {expected} value but found {found}")]
    TypeMismatch {
        field: ObservationField,
        expected: ValueKind,
        found: ValueKind,
    },
}

/// Configuration errors surfaced by the evaluators.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EngineError {
    #[error("entity `{entity}` in knowledge base `{domain}` cannot be evaluated: {source}")]
    Criterion {
        domain: String,
        entity: String,
        #[source]
        source: CriterionError,
    },
    #[error("entity `{entity}` declares `{criterion}`, which carries no scoring weight")]
    UnweightedCriterion { entity: String, criterion: String },
}

impl Criterion {
    pub fn range(field: ObservationField, min: f64, max: f64) -> Self {
        Criterion::Range {
            field,
            min,
            max,
            tolerance: None,
        }
    }

    pub fn set<I, S>(field: ObservationField, allowed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Criterion::Set {
            field,
            allowed: allowed.into_iter().map(Into::into).collect(),
            matching: SetMatching::Exact,
        }
    }

    pub fn with_tolerance(self, band: Tolerance) -> Self {
        match self {
            Criterion::Range {
                field, min, max, ..
            } => Criterion::Range {
                field,
                min,
                max,
                tolerance: Some(band),
            },
            other => other,
        }
    }

    pub fn with_matching(self, mode: SetMatching) -> Self {
        match self {
            Criterion::Set { field, allowed, .. } => Criterion::Set {
                field,
                allowed,
                matching: mode,
            },
            other => other,
        }
    }

    /// Field the criterion reads, `None` for universal criteria.
    pub fn field(&self) -> Option<ObservationField> {
        match self {
            Criterion::Range { field, .. }
            | Criterion::Set { field, .. }
            | Criterion::Flag { field, .. }
            | Criterion::ThresholdMax { field, .. }
            | Criterion::ThresholdMin { field, .. } => Some(*field),
            Criterion::AlwaysTrue { .. } => None,
        }
    }

    pub fn evaluate(&self, observation: &Observation) -> Result<CriterionMatch, CriterionError> {
        let outcome = match self {
            Criterion::AlwaysTrue { .. } => CriterionMatch::Exact,
            Criterion::Range {
                field,
                min,
                max,
                tolerance,
            } => {
                let value = decimal(observation, *field)?;
                if *min <= value && value <= *max {
                    CriterionMatch::Exact
                } else {
                    match tolerance.map(|band| band.widen(*min, *max)) {
                        Some((low, high))
                            if (low <= value && value < *min) || (*max < value && value <= high) =>
                        {
                            CriterionMatch::NearMiss
                        }
                        _ => CriterionMatch::Miss,
                    }
                }
            }
            Criterion::Set {
                field,
                allowed,
                matching,
            } => {
                let observed = normalize_text(text(observation, *field)?);
                let hit = allowed.iter().map(|value| normalize_text(value)).any(|value| {
                    match matching {
                        SetMatching::Exact => observed == value,
                        SetMatching::Contains => observed.contains(value.as_str()),
                    }
                });
                outcome_from(hit)
            }
            Criterion::Flag { field, expected } => {
                outcome_from(boolean(observation, *field)? == *expected)
            }
            Criterion::ThresholdMax { field, limit } => {
                outcome_from(decimal(observation, *field)? <= *limit)
            }
            Criterion::ThresholdMin { field, limit } => {
                outcome_from(decimal(observation, *field)? >= *limit)
            }
        };

        Ok(outcome)
    }

    /// Human-readable predicate for explanations and audit notes.
    pub fn describe(&self) -> String {
        match self {
            Criterion::Range {
                field, min, max, ..
            } => format!("{field} between {min} and {max}"),
            Criterion::Set { field, allowed, .. } => {
                format!("{field} in [{}]", allowed.join(", "))
            }
            Criterion::Flag { field, expected } => format!("{field} is {expected}"),
            Criterion::ThresholdMax { field, limit } => format!("{field} at most {limit}"),
            Criterion::ThresholdMin { field, limit } => format!("{field} at least {limit}"),
            Criterion::AlwaysTrue { note: Some(note) } => note.clone(),
            Criterion::AlwaysTrue { note: None } => "open to all".to_string(),
        }
    }
}

fn outcome_from(hit: bool) -> CriterionMatch {
    if hit {
        CriterionMatch::Exact
    } else {
        CriterionMatch::Miss
    }
}

pub(crate) fn normalize_text(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase()
}

fn lookup(
    observation: &Observation,
    field: ObservationField,
) -> Result<&ObservationValue, CriterionError> {
    observation
        .get(field)
        .ok_or(CriterionError::MissingField(field))
}

fn mismatch(field: ObservationField, expected: ValueKind, found: &ObservationValue) -> CriterionError {
    CriterionError::TypeMismatch {
        field,
        expected,
        found: found.kind(),
    }
}

fn decimal(observation: &Observation, field: ObservationField) -> Result<f64, CriterionError> {
    let value = lookup(observation, field)?;
    value
        .as_decimal()
        .ok_or_else(|| mismatch(field, ValueKind::Decimal, value))
}

fn text(observation: &Observation, field: ObservationField) -> Result<&str, CriterionError> {
    let value = lookup(observation, field)?;
    value
        .as_text()
        .ok_or_else(|| mismatch(field, ValueKind::Text, value))
}

fn boolean(observation: &Observation, field: ObservationField) -> Result<bool, CriterionError> {
    let value = lookup(observation, field)?;
    value
        .as_boolean()
        .ok_or_else(|| mismatch(field, ValueKind::Boolean, value))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ph(value: f64) -> Observation {
        Observation::builder()
            .decimal(ObservationField::Ph, value)
            .build()
    }

    #[test]
    fn range_awards_near_miss_only_inside_tolerance_band() {
        let criterion = Criterion::range(ObservationField::Ph, 6.0, 7.5)
            .with_tolerance(Tolerance::Absolute(0.5));

        assert_eq!(criterion.evaluate(&ph(6.0)), Ok(CriterionMatch::Exact));
        assert_eq!(criterion.evaluate(&ph(7.5)), Ok(CriterionMatch::Exact));
        assert_eq!(criterion.evaluate(&ph(5.5)), Ok(CriterionMatch::NearMiss));
        assert_eq!(criterion.evaluate(&ph(8.0)), Ok(CriterionMatch::NearMiss));
        assert_eq!(criterion.evaluate(&ph(5.4)), Ok(CriterionMatch::Miss));
        assert_eq!(criterion.evaluate(&ph(8.1)), Ok(CriterionMatch::Miss));
    }

    #[test]
    fn relative_tolerance_scales_with_the_nearest_bound() {
        let criterion = Criterion::range(ObservationField::Rainfall, 300.0, 650.0)
            .with_tolerance(Tolerance::Relative(0.2));
        let rain = |value| {
            Observation::builder()
                .decimal(ObservationField::Rainfall, value)
                .build()
        };

        assert_eq!(criterion.evaluate(&rain(241.0)), Ok(CriterionMatch::NearMiss));
        assert_eq!(criterion.evaluate(&rain(238.0)), Ok(CriterionMatch::Miss));
        assert_eq!(criterion.evaluate(&rain(779.0)), Ok(CriterionMatch::NearMiss));
        assert_eq!(criterion.evaluate(&rain(782.0)), Ok(CriterionMatch::Miss));
    }

    #[test]
    fn range_without_tolerance_never_near_misses() {
        let criterion = Criterion::range(ObservationField::Ph, 6.0, 7.5);
        assert_eq!(criterion.evaluate(&ph(5.9)), Ok(CriterionMatch::Miss));
    }

    #[test]
    fn contains_matching_finds_allowed_value_inside_observed_text() {
        let criterion = Criterion::set(ObservationField::SoilType, ["sandy", "black cotton"])
            .with_matching(SetMatching::Contains);
        let soil = |value: &str| {
            Observation::builder()
                .text(ObservationField::SoilType, value)
                .build()
        };

        assert_eq!(criterion.evaluate(&soil("Sandy Loam")), Ok(CriterionMatch::Exact));
        assert_eq!(criterion.evaluate(&soil(" black  cotton ")), Ok(CriterionMatch::Exact));
        assert_eq!(criterion.evaluate(&soil("loamy")), Ok(CriterionMatch::Miss));
    }

    #[test]
    fn exact_matching_ignores_case_only() {
        let criterion = Criterion::set(ObservationField::LandOwnership, ["own", "lease"]);
        let owned = Observation::builder()
            .text(ObservationField::LandOwnership, "OWN")
            .build();
        let landless = Observation::builder()
            .text(ObservationField::LandOwnership, "owner")
            .build();

        assert_eq!(criterion.evaluate(&owned), Ok(CriterionMatch::Exact));
        assert_eq!(criterion.evaluate(&landless), Ok(CriterionMatch::Miss));
    }

    #[test]
    fn thresholds_are_inclusive() {
        let ceiling = Criterion::ThresholdMax {
            field: ObservationField::AnnualIncome,
            limit: 150_000.0,
        };
        let at_limit = Observation::builder()
            .decimal(ObservationField::AnnualIncome, 150_000.0)
            .build();
        let above = Observation::builder()
            .decimal(ObservationField::AnnualIncome, 150_001.0)
            .build();

        assert_eq!(ceiling.evaluate(&at_limit), Ok(CriterionMatch::Exact));
        assert_eq!(ceiling.evaluate(&above), Ok(CriterionMatch::Miss));
    }

    #[test]
    fn missing_and_mistyped_fields_are_errors() {
        let flag = Criterion::Flag {
            field: ObservationField::HasBankAccount,
            expected: true,
        };

        assert_eq!(
            flag.evaluate(&Observation::default()),
            Err(CriterionError::MissingField(ObservationField::HasBankAccount))
        );

        let mistyped = Observation::builder()
            .text(ObservationField::HasBankAccount, "yes")
            .build();
        assert_eq!(
            flag.evaluate(&mistyped),
            Err(CriterionError::TypeMismatch {
                field: ObservationField::HasBankAccount,
                expected: ValueKind::Boolean,
                found: ValueKind::Text,
            })
        );
    }

    #[test]
    fn always_true_ignores_the_observation() {
        let criterion = Criterion::AlwaysTrue { note: None };
        assert_eq!(
            criterion.evaluate(&Observation::default()),
            Ok(CriterionMatch::Exact)
        );
        assert_eq!(criterion.field(), None);
    }
}
