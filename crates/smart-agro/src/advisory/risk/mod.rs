//! Narrative disaster-risk evaluation for a field under observation.
//!
//! Conditions are run through a fixed, ordered clause table. Each clause may raise the
//! severity, add a threat line and add mitigation lines; the result is folded into a
//! single assessment with capped, de-duplicated narrative lists.

mod clauses;
mod forecast;

pub use forecast::{DailyOutlook, ForecastSource, SimulatedForecast, SkyCondition};

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use clauses::run_clauses;

pub(crate) const GENERAL_MITIGATIONS: [&str; 2] = [
    "Monitor weather forecasts regularly",
    "Inspect crops frequently for signs of stress or disease",
];

pub(crate) const NO_THREATS: &str = "No immediate threats detected. Continue regular monitoring.";

/// Ordered risk scale. Escalation only ever moves to the right.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Severity {
    #[default]
    Low,
    Moderate,
    High,
}

impl Severity {
    pub fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Moderate => "Moderate",
            Self::High => "High",
        }
    }

    pub fn guidance(self) -> &'static str {
        match self {
            Self::High => {
                "Take immediate action to protect your crops. Consider consulting an agricultural expert."
            }
            Self::Moderate => {
                "Monitor conditions closely and implement preventive measures as needed."
            }
            Self::Low => "Continue with regular monitoring and maintenance.",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeatherForecast {
    #[default]
    Clear,
    PartlyCloudy,
    Cloudy,
    Rain,
    HeavyRain,
    Drought,
}

impl WeatherForecast {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Clear => "clear",
            Self::PartlyCloudy => "partly_cloudy",
            Self::Cloudy => "cloudy",
            Self::Rain => "rain",
            Self::HeavyRain => "heavy_rain",
            Self::Drought => "drought",
        }
    }
}

impl FromStr for WeatherForecast {
    type Err = UnknownCondition;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "clear" => Ok(Self::Clear),
            "partly_cloudy" => Ok(Self::PartlyCloudy),
            "cloudy" => Ok(Self::Cloudy),
            "rain" => Ok(Self::Rain),
            "heavy_rain" => Ok(Self::HeavyRain),
            "drought" => Ok(Self::Drought),
            _ => Err(UnknownCondition::new("weather_forecast", value)),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SoilMoisture {
    Dry,
    #[default]
    Normal,
    Wet,
    Waterlogged,
}

impl SoilMoisture {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Dry => "dry",
            Self::Normal => "normal",
            Self::Wet => "wet",
            Self::Waterlogged => "waterlogged",
        }
    }
}

impl FromStr for SoilMoisture {
    type Err = UnknownCondition;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "dry" => Ok(Self::Dry),
            "normal" => Ok(Self::Normal),
            "wet" => Ok(Self::Wet),
            "waterlogged" => Ok(Self::Waterlogged),
            _ => Err(UnknownCondition::new("soil_moisture", value)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {field} `{value}`")]
pub struct UnknownCondition {
    pub field: &'static str,
    pub value: String,
}

impl UnknownCondition {
    fn new(field: &'static str, value: &str) -> Self {
        Self {
            field,
            value: value.to_string(),
        }
    }
}

/// Normalized snapshot of a field for one risk assessment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldConditions {
    pub state: String,
    pub district: String,
    pub crop_type: String,
    pub growth_stage: String,
    #[serde(default)]
    pub soil_moisture: SoilMoisture,
    #[serde(default)]
    pub weather_forecast: WeatherForecast,
    pub temperature: f64,
    #[serde(default)]
    pub pest_infestation: bool,
    #[serde(default)]
    pub disease_signs: bool,
    #[serde(default)]
    pub weed_problem: bool,
    #[serde(default)]
    pub observations: Option<String>,
}

impl FieldConditions {
    pub fn location(&self) -> String {
        format!("{}, {}", self.district, self.state)
    }

    fn notes(&self) -> Option<&str> {
        self.observations
            .as_deref()
            .map(str::trim)
            .filter(|notes| !notes.is_empty())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskConfig {
    pub max_threats: usize,
    pub max_mitigations: usize,
    pub forecast_days: usize,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            max_threats: 5,
            max_mitigations: 6,
            forecast_days: 7,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub severity: Severity,
    pub threats: Vec<String>,
    pub mitigations: Vec<String>,
    pub guidance: String,
    pub triggered: Vec<String>,
    pub location: String,
    pub crop: String,
    pub growth_stage: String,
}

/// Assessment plus the cosmetic outlook. Only `assessment` is deterministic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskReport {
    pub assessment: RiskAssessment,
    pub forecast: Vec<DailyOutlook>,
}

#[derive(Debug, Clone, Default)]
pub struct RiskAssessor {
    config: RiskConfig,
}

impl RiskAssessor {
    pub fn new(config: RiskConfig) -> Self {
        Self { config }
    }

    pub fn assess(&self, conditions: &FieldConditions) -> RiskAssessment {
        let ledger = run_clauses(conditions);
        let severity = ledger.severity;
        let triggered: Vec<String> = ledger
            .triggered
            .iter()
            .map(|name| name.to_string())
            .collect();

        let mut threats = ledger.threats;
        if let Some(notes) = conditions.notes() {
            threats.push(format!("Note: {notes}"));
        }
        if threats.is_empty() {
            threats.push(NO_THREATS.to_string());
        }
        threats.truncate(self.config.max_threats);

        let mut mitigations = ledger.mitigations;
        mitigations.extend(GENERAL_MITIGATIONS.iter().map(|line| line.to_string()));
        let mut mitigations = dedupe_stable(mitigations);
        mitigations.truncate(self.config.max_mitigations);

        debug!(
            location = %conditions.location(),
            severity = %severity,
            clauses = triggered.len(),
            "risk assessment complete"
        );

        RiskAssessment {
            severity,
            threats,
            mitigations,
            guidance: severity.guidance().to_string(),
            triggered,
            location: conditions.location(),
            crop: display_label(&conditions.crop_type),
            growth_stage: display_label(&conditions.growth_stage),
        }
    }

    pub fn report<F: ForecastSource + ?Sized>(
        &self,
        conditions: &FieldConditions,
        start: NaiveDate,
        forecast: &mut F,
    ) -> RiskReport {
        RiskReport {
            assessment: self.assess(conditions),
            forecast: forecast.outlook(start, self.config.forecast_days),
        }
    }
}

/// Drop repeats, keeping the first occurrence of each line in place.
fn dedupe_stable(lines: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    lines
        .into_iter()
        .filter(|line| seen.insert(line.clone()))
        .collect()
}

/// "heavy_rain" -> "Heavy Rain"
fn display_label(raw: &str) -> String {
    raw.split(|c: char| c == '_' || c.is_whitespace())
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
