use crate::infra::{parse_date, print_json, today_or, Runtime};
use chrono::NaiveDate;
use clap::Args;
use serde::Serialize;
use smart_agro::advisory::crops::views::recommendation_views;
use smart_agro::advisory::{
    CropConditions, CropProfileView, FarmerProfile, FieldReport, IntakeGuard, MarketDesk,
    MarketQuery, PriceHistory, PriceQuote, RiskReport, SchemeRecord, SchemeMatcher,
};
use smart_agro::error::AppError;

#[derive(Args, Debug)]
pub(crate) struct CropArgs {
    /// Soil type as reported (e.g. sandy, loamy, black cotton)
    #[arg(long)]
    pub(crate) soil: String,
    /// Soil pH (0-14)
    #[arg(long)]
    pub(crate) ph: f64,
    /// Annual rainfall in mm
    #[arg(long)]
    pub(crate) rainfall: f64,
    /// Average temperature in °C
    #[arg(long, allow_hyphen_values = true)]
    pub(crate) temperature: f64,
    /// Relative humidity in percent
    #[arg(long)]
    pub(crate) humidity: Option<f64>,
    #[arg(long, default_value_t = 0)]
    pub(crate) nitrogen: u32,
    #[arg(long, default_value_t = 0)]
    pub(crate) phosphorus: u32,
    #[arg(long, default_value_t = 0)]
    pub(crate) potassium: u32,
    /// Number of crops to show (defaults to APP_RECOMMENDATION_LIMIT)
    #[arg(long)]
    pub(crate) limit: Option<usize>,
    /// Emit JSON instead of text
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct SchemeArgs {
    #[arg(long)]
    pub(crate) name: String,
    #[arg(long)]
    pub(crate) age: u32,
    /// own, lease or none
    #[arg(long)]
    pub(crate) land_ownership: String,
    /// Land size in acres
    #[arg(long)]
    pub(crate) land_size: Option<f64>,
    /// Annual household income in rupees
    #[arg(long)]
    pub(crate) annual_income: u64,
    /// general, obc, sc or st
    #[arg(long)]
    pub(crate) caste_category: String,
    #[arg(long)]
    pub(crate) bank_account: bool,
    #[arg(long)]
    pub(crate) aadhaar_linked: bool,
    /// Show the failed requirement for schemes that do not apply
    #[arg(long)]
    pub(crate) explain: bool,
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct RiskArgs {
    #[arg(long)]
    pub(crate) state: String,
    #[arg(long)]
    pub(crate) district: String,
    #[arg(long)]
    pub(crate) crop_type: String,
    #[arg(long)]
    pub(crate) growth_stage: String,
    /// dry, normal, wet or waterlogged
    #[arg(long)]
    pub(crate) soil_moisture: Option<String>,
    /// clear, partly_cloudy, cloudy, rain, heavy_rain or drought
    #[arg(long)]
    pub(crate) weather_forecast: Option<String>,
    #[arg(long, allow_hyphen_values = true)]
    pub(crate) temperature: f64,
    #[arg(long)]
    pub(crate) pests: bool,
    #[arg(long)]
    pub(crate) disease: bool,
    #[arg(long)]
    pub(crate) weeds: bool,
    /// Free-text field observations
    #[arg(long)]
    pub(crate) notes: Option<String>,
    /// First outlook day (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = parse_date)]
    pub(crate) start: Option<NaiveDate>,
    /// Seed for the simulated outlook
    #[arg(long)]
    pub(crate) seed: Option<u64>,
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct MarketArgs {
    #[arg(long)]
    pub(crate) crop: String,
    #[arg(long, default_value = "Local")]
    pub(crate) variety: String,
    /// Quantity in quintals
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pub(crate) quantity: u32,
    #[arg(long)]
    pub(crate) location: String,
    #[arg(long, default_value = "")]
    pub(crate) harvest_date: String,
    /// Last month of the price history (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = parse_date)]
    pub(crate) today: Option<NaiveDate>,
    #[arg(long)]
    pub(crate) seed: Option<u64>,
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct CatalogArgs {
    /// Only list crops
    #[arg(long, conflicts_with = "schemes")]
    pub(crate) crops: bool,
    /// Only list schemes
    #[arg(long)]
    pub(crate) schemes: bool,
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Serialize)]
struct CropAdvice<'a> {
    recommendations: &'a [smart_agro::advisory::CropRecommendation],
    profiles: Vec<CropProfileView>,
}

pub(crate) fn run_crops(runtime: &Runtime, args: CropArgs) -> Result<(), AppError> {
    let readings = CropConditions {
        state: String::new(),
        district: String::new(),
        soil_type: args.soil,
        ph_level: args.ph,
        nitrogen: args.nitrogen,
        phosphorus: args.phosphorus,
        potassium: args.potassium,
        rainfall: args.rainfall,
        temperature: args.temperature,
        humidity: args.humidity,
    };

    let observation = IntakeGuard::new().crop_observation(&readings)?;
    let limit = args.limit.unwrap_or_else(|| runtime.default_limit());
    let ranked = runtime
        .crop_advisor()
        .rank(&observation, &runtime.catalog.crops, Some(limit))?;

    if args.json {
        print_json(&CropAdvice {
            recommendations: &ranked,
            profiles: recommendation_views(&ranked, &runtime.catalog.crops),
        });
        return Ok(());
    }

    if ranked.is_empty() {
        println!("No suitable crops found for these conditions.");
        return Ok(());
    }

    println!("Recommended crops");
    for (profile, recommendation) in recommendation_views(&ranked, &runtime.catalog.crops)
        .iter()
        .zip(&ranked)
    {
        render_profile(profile, Some(recommendation.score));
    }

    Ok(())
}

pub(crate) fn render_profile(profile: &CropProfileView, score: Option<u16>) {
    match score {
        Some(score) => println!("- {} (score {})", profile.name, score),
        None => println!("- {}", profile.name),
    }
    println!(
        "    soil {} | {} | {} | pH {}",
        profile.soil, profile.temperature, profile.rainfall, profile.ph_range
    );
    println!("    {}", profile.description);
}

pub(crate) fn run_schemes(runtime: &Runtime, args: SchemeArgs) -> Result<(), AppError> {
    let profile = FarmerProfile {
        name: args.name,
        age: args.age,
        gender: None,
        state: String::new(),
        district: String::new(),
        land_ownership: args.land_ownership,
        land_size: args.land_size,
        annual_income: args.annual_income,
        caste_category: args.caste_category,
        bank_account: args.bank_account,
        aadhaar_linked: args.aadhaar_linked,
    };

    let observation = IntakeGuard::new().farmer_observation(&profile)?;
    let matcher = SchemeMatcher::new();

    if args.explain {
        let assessments = matcher.assess(&observation, &runtime.catalog.schemes)?;
        if args.json {
            print_json(&assessments);
            return Ok(());
        }
        println!("Scheme eligibility for {}", profile.name);
        for assessment in &assessments {
            println!(
                "- {}: {}",
                assessment.scheme.name,
                assessment.verdict.summary()
            );
        }
        return Ok(());
    }

    let eligible = matcher.filter(&observation, &runtime.catalog.schemes)?;
    if args.json {
        print_json(&eligible);
        return Ok(());
    }

    render_schemes("Eligible schemes", &eligible);
    Ok(())
}

pub(crate) fn render_schemes(heading: &str, schemes: &[&SchemeRecord]) {
    if schemes.is_empty() {
        println!("No schemes match this profile.");
        return;
    }

    println!("{heading}");
    for scheme in schemes {
        println!("- {}", scheme.name);
        println!("    {}", scheme.description);
        println!(
            "    benefits: {} | {}",
            scheme.metadata.benefits, scheme.metadata.website
        );
    }
}

pub(crate) fn run_risk(runtime: &Runtime, args: RiskArgs) -> Result<(), AppError> {
    let report = FieldReport {
        state: args.state,
        district: args.district,
        crop_type: args.crop_type,
        growth_stage: args.growth_stage,
        soil_moisture: args.soil_moisture,
        weather_forecast: args.weather_forecast,
        temperature: args.temperature,
        pest_infestation: args.pests,
        disease_signs: args.disease,
        weed_problem: args.weeds,
        observations: args.notes,
    };

    let conditions = IntakeGuard::new().field_conditions(&report)?;
    let mut forecast = runtime.forecast(args.seed);
    let risk = runtime
        .risk_assessor()
        .report(&conditions, today_or(args.start), &mut forecast);

    if args.json {
        print_json(&risk);
    } else {
        render_risk(&risk);
    }
    Ok(())
}

pub(crate) fn render_risk(risk: &RiskReport) {
    let assessment = &risk.assessment;
    println!(
        "{} risk for {} ({}) in {}",
        assessment.severity, assessment.crop, assessment.growth_stage, assessment.location
    );
    println!("Potential threats:");
    for threat in &assessment.threats {
        println!("  - {threat}");
    }
    println!("Preventive measures:");
    for mitigation in &assessment.mitigations {
        println!("  - {mitigation}");
    }
    println!("Next steps: {}", assessment.guidance);
    println!("Outlook:");
    for day in &risk.forecast {
        println!(
            "  {} {:?} {}/{}°C rain {}% wind {} km/h",
            day.label, day.condition, day.high, day.low, day.rain_chance, day.wind_speed
        );
    }
}

#[derive(Serialize)]
struct MarketAdvice {
    quote: PriceQuote,
    history: PriceHistory,
}

pub(crate) fn run_market(runtime: &Runtime, args: MarketArgs) -> Result<(), AppError> {
    let desk = MarketDesk::new();
    let query = MarketQuery {
        crop: args.crop,
        variety: args.variety,
        quantity: args.quantity,
        location: args.location,
        harvest_date: args.harvest_date,
    };

    let quote = desk.quote(&query);
    let history = desk.history(&query.crop, today_or(args.today), &mut runtime.rng(args.seed));

    if args.json {
        print_json(&MarketAdvice { quote, history });
        return Ok(());
    }

    println!(
        "{} ({}) x {} quintals: {} at {}",
        quote.crop, quote.variety, quote.quantity, quote.predicted_price, quote.nearest_mandi
    );
    println!("Price history (₹/quintal):");
    for point in &history.points {
        println!("  {}: {:.2}", point.month, point.price);
    }
    println!(
        "Current {:.2} ({:+.1}% over six months)",
        history.current_price, history.price_change
    );
    Ok(())
}

pub(crate) fn run_catalog(runtime: &Runtime, args: CatalogArgs) -> Result<(), AppError> {
    let show_crops = args.crops || !args.schemes;
    let show_schemes = args.schemes || !args.crops;

    if args.json {
        #[derive(Serialize)]
        struct CatalogPayload<'a> {
            #[serde(skip_serializing_if = "Option::is_none")]
            crops: Option<Vec<CropProfileView>>,
            #[serde(skip_serializing_if = "Option::is_none")]
            schemes: Option<Vec<&'a SchemeRecord>>,
        }

        print_json(&CatalogPayload {
            crops: show_crops.then(|| {
                runtime
                    .catalog
                    .crops
                    .iter()
                    .map(CropProfileView::from_record)
                    .collect()
            }),
            schemes: show_schemes.then(|| runtime.catalog.schemes.iter().collect()),
        });
        return Ok(());
    }

    if show_crops {
        println!("Crops ({})", runtime.catalog.crops.len());
        for crop in runtime.catalog.crops.iter() {
            render_profile(&CropProfileView::from_record(crop), None);
        }
    }
    if show_schemes {
        let schemes: Vec<_> = runtime.catalog.schemes.iter().collect();
        render_schemes(&format!("Schemes ({})", schemes.len()), &schemes);
    }
    Ok(())
}
