use chrono::{Local, NaiveDate};
use serde::Serialize;
use smart_agro::advisory::{AdvisoryCatalog, CropAdvisor, RiskAssessor, SimulatedForecast};
use smart_agro::config::AppConfig;
use smart_agro::error::AppError;
use smart_agro::telemetry;
use tracing::info;

/// Configuration, logging and tables resolved once per invocation.
pub(crate) struct Runtime {
    pub(crate) config: AppConfig,
    pub(crate) catalog: AdvisoryCatalog,
}

impl Runtime {
    pub(crate) fn bootstrap() -> Result<Self, AppError> {
        let config = AppConfig::load()?;
        telemetry::init(&config.telemetry)?;

        let catalog = AdvisoryCatalog::load(&config.catalog)?;
        info!(
            ?config.environment,
            crops = catalog.crops.len(),
            schemes = catalog.schemes.len(),
            "smart agro advisor ready"
        );

        Ok(Self { config, catalog })
    }

    pub(crate) fn crop_advisor(&self) -> CropAdvisor {
        CropAdvisor::default()
    }

    pub(crate) fn risk_assessor(&self) -> RiskAssessor {
        RiskAssessor::default()
    }

    pub(crate) fn default_limit(&self) -> usize {
        self.config.advisory.recommendation_limit
    }

    /// A flag seed wins over `APP_FORECAST_SEED`; neither means fresh entropy.
    pub(crate) fn rng(&self, seed: Option<u64>) -> fastrand::Rng {
        match seed.or(self.config.advisory.forecast_seed) {
            Some(seed) => fastrand::Rng::with_seed(seed),
            None => fastrand::Rng::new(),
        }
    }

    pub(crate) fn forecast(&self, seed: Option<u64>) -> SimulatedForecast {
        SimulatedForecast::from_rng(self.rng(seed))
    }
}

pub(crate) fn today_or(date: Option<NaiveDate>) -> NaiveDate {
    date.unwrap_or_else(|| Local::now().date_naive())
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

pub(crate) fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{json}"),
        Err(err) => println!("JSON payload unavailable: {err}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_iso_dates() {
        assert_eq!(
            parse_date(" 2024-06-01 "),
            Ok(NaiveDate::from_ymd_opt(2024, 6, 1).expect("valid date"))
        );
        assert!(parse_date("June 1st").is_err());
    }
}
