use serde::{Deserialize, Serialize};

use super::criterion::normalize_text;
use super::observation::{Observation, ObservationField};
use super::risk::{FieldConditions, SoilMoisture, UnknownCondition, WeatherForecast};

/// Validation errors raised while normalizing raw submissions.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum IntakeError {
    #[error("{field} is required")]
    Required { field: &'static str },
    #[error("{field} must be between {min} and {max} (found {found})")]
    OutOfRange {
        field: &'static str,
        min: f64,
        max: f64,
        found: f64,
    },
    #[error("unsupported {field} `{value}`")]
    Unsupported { field: &'static str, value: String },
}

impl From<UnknownCondition> for IntakeError {
    fn from(err: UnknownCondition) -> Self {
        IntakeError::Unsupported {
            field: err.field,
            value: err.value,
        }
    }
}

const LAND_OWNERSHIP: [&str; 3] = ["own", "lease", "none"];
const CASTE_CATEGORIES: [&str; 4] = ["general", "obc", "sc", "st"];

/// Soil and climate readings for a crop recommendation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CropConditions {
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub district: String,
    pub soil_type: String,
    pub ph_level: f64,
    #[serde(default)]
    pub nitrogen: u32,
    #[serde(default)]
    pub phosphorus: u32,
    #[serde(default)]
    pub potassium: u32,
    pub rainfall: f64,
    pub temperature: f64,
    #[serde(default)]
    pub humidity: Option<f64>,
}

/// Applicant details for a scheme eligibility check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FarmerProfile {
    pub name: String,
    pub age: u32,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub district: String,
    pub land_ownership: String,
    #[serde(default)]
    pub land_size: Option<f64>,
    pub annual_income: u64,
    pub caste_category: String,
    pub bank_account: bool,
    pub aadhaar_linked: bool,
}

/// Field walk notes for a disaster-risk assessment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldReport {
    pub state: String,
    pub district: String,
    pub crop_type: String,
    pub growth_stage: String,
    #[serde(default)]
    pub soil_moisture: Option<String>,
    #[serde(default)]
    pub weather_forecast: Option<String>,
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

/// Turns raw submissions into the typed records the evaluators consume.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntakeGuard;

impl IntakeGuard {
    pub fn new() -> Self {
        Self
    }

    pub fn crop_observation(&self, input: &CropConditions) -> Result<Observation, IntakeError> {
        let soil = required("soil_type", &input.soil_type)?;
        let ph = within("ph_level", input.ph_level, 0.0, 14.0)?;
        let rainfall = within("rainfall", input.rainfall, 0.0, f64::INFINITY)?;
        let temperature = finite("temperature", input.temperature)?;

        let mut builder = Observation::builder()
            .text(ObservationField::SoilType, soil)
            .decimal(ObservationField::Ph, ph)
            .decimal(ObservationField::Rainfall, rainfall)
            .decimal(ObservationField::Temperature, temperature)
            .decimal(ObservationField::Nitrogen, f64::from(input.nitrogen))
            .decimal(ObservationField::Phosphorus, f64::from(input.phosphorus))
            .decimal(ObservationField::Potassium, f64::from(input.potassium));

        if let Some(humidity) = input.humidity {
            builder = builder.decimal(
                ObservationField::Humidity,
                within("humidity", humidity, 0.0, 100.0)?,
            );
        }

        Ok(builder.build())
    }

    pub fn farmer_observation(&self, input: &FarmerProfile) -> Result<Observation, IntakeError> {
        required("name", &input.name)?;
        let age = within("age", f64::from(input.age), 18.0, 100.0)?;
        let ownership = one_of("land_ownership", &input.land_ownership, &LAND_OWNERSHIP)?;
        let caste = one_of("caste_category", &input.caste_category, &CASTE_CATEGORIES)?;
        let land_size = match input.land_size {
            Some(size) => within("land_size", size, 0.0, f64::INFINITY)?,
            None => 0.0,
        };

        Ok(Observation::builder()
            .decimal(ObservationField::Age, age)
            .decimal(ObservationField::AnnualIncome, input.annual_income as f64)
            .decimal(ObservationField::LandSize, land_size)
            .text(ObservationField::LandOwnership, ownership)
            .text(ObservationField::CasteCategory, caste)
            .boolean(ObservationField::HasBankAccount, input.bank_account)
            .boolean(ObservationField::AadhaarLinked, input.aadhaar_linked)
            .build())
    }

    pub fn field_conditions(&self, input: &FieldReport) -> Result<FieldConditions, IntakeError> {
        let soil_moisture = match input.soil_moisture.as_deref() {
            Some(raw) if !raw.trim().is_empty() => raw.parse::<SoilMoisture>()?,
            _ => SoilMoisture::default(),
        };
        let weather_forecast = match input.weather_forecast.as_deref() {
            Some(raw) if !raw.trim().is_empty() => raw.parse::<WeatherForecast>()?,
            _ => WeatherForecast::default(),
        };

        Ok(FieldConditions {
            state: required("state", &input.state)?,
            district: required("district", &input.district)?,
            crop_type: normalize_text(&required("crop_type", &input.crop_type)?),
            growth_stage: normalize_text(&required("growth_stage", &input.growth_stage)?),
            soil_moisture,
            weather_forecast,
            temperature: finite("temperature", input.temperature)?,
            pest_infestation: input.pest_infestation,
            disease_signs: input.disease_signs,
            weed_problem: input.weed_problem,
            observations: input
                .observations
                .as_deref()
                .map(str::trim)
                .filter(|notes| !notes.is_empty())
                .map(str::to_string),
        })
    }
}

fn required(field: &'static str, value: &str) -> Result<String, IntakeError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(IntakeError::Required { field });
    }
    Ok(trimmed.to_string())
}

fn finite(field: &'static str, value: f64) -> Result<f64, IntakeError> {
    within(field, value, f64::MIN, f64::MAX)
}

fn within(field: &'static str, value: f64, min: f64, max: f64) -> Result<f64, IntakeError> {
    if value.is_finite() && min <= value && value <= max {
        Ok(value)
    } else {
        Err(IntakeError::OutOfRange {
            field,
            min,
            max,
            found: value,
        })
    }
}

fn one_of(field: &'static str, value: &str, allowed: &[&str]) -> Result<String, IntakeError> {
    let normalized = normalize_text(&required(field, value)?);
    if allowed.contains(&normalized.as_str()) {
        Ok(normalized)
    } else {
        Err(IntakeError::Unsupported {
            field,
            value: value.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::advisory::observation::ObservationValue;

    fn sandy_plot() -> CropConditions {
        CropConditions {
            state: "Rajasthan".to_string(),
            district: "Jodhpur".to_string(),
            soil_type: "  Sandy ".to_string(),
            ph_level: 6.5,
            nitrogen: 40,
            phosphorus: 20,
            potassium: 30,
            rainfall: 250.0,
            temperature: 32.0,
            humidity: Some(35.0),
        }
    }

    fn applicant() -> FarmerProfile {
        FarmerProfile {
            name: "Lakshmi".to_string(),
            age: 40,
            gender: None,
            state: "Karnataka".to_string(),
            district: "Mandya".to_string(),
            land_ownership: "Own".to_string(),
            land_size: Some(2.5),
            annual_income: 90_000,
            caste_category: "obc".to_string(),
            bank_account: true,
            aadhaar_linked: true,
        }
    }

    #[test]
    fn crop_readings_become_a_typed_observation() {
        let observation = IntakeGuard::new()
            .crop_observation(&sandy_plot())
            .expect("valid readings");

        assert_eq!(
            observation.get(ObservationField::SoilType),
            Some(&ObservationValue::Text("Sandy".to_string()))
        );
        assert_eq!(
            observation.get(ObservationField::Humidity),
            Some(&ObservationValue::Decimal(35.0))
        );
        assert_eq!(observation.len(), 8);
    }

    #[test]
    fn ph_outside_the_scale_is_rejected() {
        let input = CropConditions {
            ph_level: 14.5,
            ..sandy_plot()
        };

        assert_eq!(
            IntakeGuard::new().crop_observation(&input),
            Err(IntakeError::OutOfRange {
                field: "ph_level",
                min: 0.0,
                max: 14.0,
                found: 14.5,
            })
        );
    }

    #[test]
    fn blank_soil_is_required() {
        let input = CropConditions {
            soil_type: "   ".to_string(),
            ..sandy_plot()
        };

        assert_eq!(
            IntakeGuard::new().crop_observation(&input),
            Err(IntakeError::Required { field: "soil_type" })
        );
    }

    #[test]
    fn farmer_profile_normalizes_choice_fields() {
        let observation = IntakeGuard::new()
            .farmer_observation(&applicant())
            .expect("valid profile");

        assert_eq!(
            observation.get(ObservationField::LandOwnership),
            Some(&ObservationValue::Text("own".to_string()))
        );
        assert_eq!(
            observation.get(ObservationField::AnnualIncome),
            Some(&ObservationValue::Decimal(90_000.0))
        );
        assert_eq!(
            observation.get(ObservationField::HasBankAccount),
            Some(&ObservationValue::Boolean(true))
        );
    }

    #[test]
    fn minors_and_unknown_categories_are_rejected() {
        let guard = IntakeGuard::new();

        let minor = FarmerProfile {
            age: 16,
            ..applicant()
        };
        assert!(matches!(
            guard.farmer_observation(&minor),
            Err(IntakeError::OutOfRange { field: "age", .. })
        ));

        let tenant = FarmerProfile {
            land_ownership: "sharecrop".to_string(),
            ..applicant()
        };
        assert_eq!(
            guard.farmer_observation(&tenant),
            Err(IntakeError::Unsupported {
                field: "land_ownership",
                value: "sharecrop".to_string(),
            })
        );
    }

    #[test]
    fn field_report_defaults_and_parses_conditions() {
        let report = FieldReport {
            state: "Kerala".to_string(),
            district: "Alappuzha".to_string(),
            crop_type: "rice".to_string(),
            growth_stage: "vegetative".to_string(),
            soil_moisture: None,
            weather_forecast: Some("heavy_rain".to_string()),
            temperature: 29.0,
            pest_infestation: false,
            disease_signs: true,
            weed_problem: false,
            observations: Some("   ".to_string()),
        };

        let conditions = IntakeGuard::new()
            .field_conditions(&report)
            .expect("valid report");
        assert_eq!(conditions.soil_moisture, SoilMoisture::Normal);
        assert_eq!(conditions.weather_forecast, WeatherForecast::HeavyRain);
        assert_eq!(conditions.observations, None);

        let storm = FieldReport {
            weather_forecast: Some("cyclone".to_string()),
            ..report
        };
        assert_eq!(
            IntakeGuard::new().field_conditions(&storm),
            Err(IntakeError::Unsupported {
                field: "weather_forecast",
                value: "cyclone".to_string(),
            })
        );
    }
}
