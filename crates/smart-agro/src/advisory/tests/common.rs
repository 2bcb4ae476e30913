use chrono::NaiveDate;

use crate::advisory::intake::{FarmerProfile, IntakeGuard};
use crate::advisory::observation::{Observation, ObservationField};
use crate::advisory::risk::{FieldConditions, SoilMoisture, WeatherForecast};

pub(super) fn soil_reading(soil: &str, ph: f64, rainfall: f64, temperature: f64) -> Observation {
    Observation::builder()
        .text(ObservationField::SoilType, soil)
        .decimal(ObservationField::Ph, ph)
        .decimal(ObservationField::Rainfall, rainfall)
        .decimal(ObservationField::Temperature, temperature)
        .build()
}

pub(super) fn thar_plot() -> Observation {
    soil_reading("sandy", 6.5, 250.0, 32.0)
}

pub(super) fn deccan_plot() -> Observation {
    soil_reading("loamy", 7.0, 500.0, 28.0)
}

pub(super) fn farmer(annual_income: u64) -> FarmerProfile {
    FarmerProfile {
        name: "Ramesh Patil".to_string(),
        age: 40,
        gender: Some("male".to_string()),
        state: "Maharashtra".to_string(),
        district: "Latur".to_string(),
        land_ownership: "own".to_string(),
        land_size: Some(3.0),
        annual_income,
        caste_category: "general".to_string(),
        bank_account: true,
        aadhaar_linked: true,
    }
}

pub(super) fn farmer_observation(profile: &FarmerProfile) -> Observation {
    IntakeGuard::new()
        .farmer_observation(profile)
        .expect("fixture profile is valid")
}

pub(super) fn calm_field() -> FieldConditions {
    FieldConditions {
        state: "Tamil Nadu".to_string(),
        district: "Thanjavur".to_string(),
        crop_type: "rice".to_string(),
        growth_stage: "vegetative".to_string(),
        soil_moisture: SoilMoisture::Normal,
        weather_forecast: WeatherForecast::Clear,
        temperature: 28.0,
        pest_infestation: false,
        disease_signs: false,
        weed_problem: false,
        observations: None,
    }
}

pub(super) fn season_start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 1).expect("valid date")
}

pub(super) fn names<T, F: Fn(&T) -> &str>(items: &[T], name: F) -> Vec<String> {
    items.iter().map(|item| name(item).to_string()).collect()
}
