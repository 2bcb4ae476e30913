use crate::advise::{render_profile, render_risk, render_schemes};
use crate::infra::{parse_date, today_or, Runtime};
use chrono::NaiveDate;
use clap::Args;
use smart_agro::advisory::crops::views::recommendation_views;
use smart_agro::advisory::{
    CropConditions, FarmerProfile, FieldReport, IntakeGuard, MarketDesk, MarketQuery,
    SchemeMatcher,
};
use smart_agro::error::AppError;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Reference date for the outlook and price history (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Seed for the simulated outlook and prices
    #[arg(long)]
    pub(crate) seed: Option<u64>,
    /// Skip the market price portion of the demo.
    #[arg(long)]
    pub(crate) skip_market: bool,
}

pub(crate) fn run_demo(runtime: &Runtime, args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        today,
        seed,
        skip_market,
    } = args;
    let today = today_or(today);
    let guard = IntakeGuard::new();

    println!("Smart agro advisory demo");

    let plot = demo_plot();
    println!(
        "\nCrop suitability for {}, {} ({} soil, pH {}, {}mm, {}°C)",
        plot.district, plot.state, plot.soil_type, plot.ph_level, plot.rainfall, plot.temperature
    );
    let observation = guard.crop_observation(&plot)?;
    let ranked = runtime.crop_advisor().rank(
        &observation,
        &runtime.catalog.crops,
        Some(runtime.default_limit()),
    )?;
    for (profile, recommendation) in recommendation_views(&ranked, &runtime.catalog.crops)
        .iter()
        .zip(&ranked)
    {
        render_profile(profile, Some(recommendation.score));
    }

    let applicant = demo_applicant();
    println!(
        "\nScheme eligibility for {} (income ₹{}, {} land)",
        applicant.name, applicant.annual_income, applicant.land_ownership
    );
    let observation = guard.farmer_observation(&applicant)?;
    let matcher = SchemeMatcher::new();
    let eligible = matcher.filter(&observation, &runtime.catalog.schemes)?;
    render_schemes("Eligible schemes", &eligible);
    for assessment in matcher.assess(&observation, &runtime.catalog.schemes)? {
        if !assessment.verdict.is_eligible() {
            println!(
                "  not eligible for {}: {}",
                assessment.scheme.name,
                assessment.verdict.summary()
            );
        }
    }

    println!("\nDisaster risk");
    let conditions = guard.field_conditions(&demo_field_report())?;
    let mut forecast = runtime.forecast(seed);
    let risk = runtime
        .risk_assessor()
        .report(&conditions, today, &mut forecast);
    render_risk(&risk);

    if skip_market {
        return Ok(());
    }

    let desk = MarketDesk::new();
    let query = MarketQuery {
        crop: "cotton".to_string(),
        variety: "Bt Cotton".to_string(),
        quantity: 40,
        location: "Akola".to_string(),
        harvest_date: "2024-11-15".to_string(),
    };
    let quote = desk.quote(&query);
    let history = desk.history(&query.crop, today, &mut runtime.rng(seed));
    println!(
        "\nMarket price: {} at {} (current {:.2}, {:+.1}% over six months)",
        quote.predicted_price, quote.nearest_mandi, history.current_price, history.price_change
    );

    Ok(())
}

fn demo_plot() -> CropConditions {
    CropConditions {
        state: "Rajasthan".to_string(),
        district: "Jodhpur".to_string(),
        soil_type: "sandy".to_string(),
        ph_level: 6.5,
        nitrogen: 35,
        phosphorus: 18,
        potassium: 22,
        rainfall: 250.0,
        temperature: 32.0,
        humidity: Some(28.0),
    }
}

fn demo_applicant() -> FarmerProfile {
    FarmerProfile {
        name: "Ramesh Patil".to_string(),
        age: 44,
        gender: Some("male".to_string()),
        state: "Maharashtra".to_string(),
        district: "Latur".to_string(),
        land_ownership: "own".to_string(),
        land_size: Some(3.5),
        annual_income: 200_000,
        caste_category: "obc".to_string(),
        bank_account: true,
        aadhaar_linked: true,
    }
}

fn demo_field_report() -> FieldReport {
    FieldReport {
        state: "Tamil Nadu".to_string(),
        district: "Thanjavur".to_string(),
        crop_type: "rice".to_string(),
        growth_stage: "flowering".to_string(),
        soil_moisture: Some("waterlogged".to_string()),
        weather_forecast: Some("heavy_rain".to_string()),
        temperature: 30.0,
        pest_infestation: true,
        disease_signs: true,
        weed_problem: false,
        observations: Some("Brown spots on lower leaves".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_fixtures_pass_intake() {
        let guard = IntakeGuard::new();
        assert!(guard.crop_observation(&demo_plot()).is_ok());
        assert!(guard.farmer_observation(&demo_applicant()).is_ok());
        assert!(guard.field_conditions(&demo_field_report()).is_ok());
    }
}
