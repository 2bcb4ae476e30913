use std::env;
use std::fmt;
use std::path::PathBuf;

use crate::advisory::crops::ToleranceBands;

/// Crops shown when neither the caller nor `APP_RECOMMENDATION_LIMIT` picks a count.
pub const DEFAULT_RECOMMENDATION_LIMIT: usize = 5;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub telemetry: TelemetryConfig,
    pub catalog: CatalogConfig,
    pub advisory: AdvisoryConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
        let ansi = env::var("APP_LOG_ANSI")
            .map(|value| matches!(value.trim(), "1" | "true" | "yes"))
            .unwrap_or(false);

        let recommendation_limit = match non_empty_var("APP_RECOMMENDATION_LIMIT") {
            Some(raw) => match raw.parse::<usize>() {
                Ok(limit) if limit >= 1 => limit,
                _ => return Err(ConfigError::InvalidRecommendationLimit),
            },
            None => DEFAULT_RECOMMENDATION_LIMIT,
        };

        let forecast_seed = non_empty_var("APP_FORECAST_SEED")
            .map(|raw| raw.parse::<u64>())
            .transpose()
            .map_err(|_| ConfigError::InvalidForecastSeed)?;

        Ok(Self {
            environment,
            telemetry: TelemetryConfig { log_level, ansi },
            catalog: CatalogConfig {
                crop_table: non_empty_var("APP_CROP_TABLE").map(PathBuf::from),
                scheme_table: non_empty_var("APP_SCHEME_TABLE").map(PathBuf::from),
                tolerances: ToleranceBands::default(),
            },
            advisory: AdvisoryConfig {
                recommendation_limit,
                forecast_seed,
            },
        })
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
    pub ansi: bool,
}

/// Where the crop and scheme tables come from. `None` selects the built-in table.
#[derive(Debug, Clone, Default)]
pub struct CatalogConfig {
    pub crop_table: Option<PathBuf>,
    pub scheme_table: Option<PathBuf>,
    pub tolerances: ToleranceBands,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdvisoryConfig {
    pub recommendation_limit: usize,
    pub forecast_seed: Option<u64>,
}

impl Default for AdvisoryConfig {
    fn default() -> Self {
        Self {
            recommendation_limit: DEFAULT_RECOMMENDATION_LIMIT,
            forecast_seed: None,
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    InvalidRecommendationLimit,
    InvalidForecastSeed,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidRecommendationLimit => {
                write!(f, "APP_RECOMMENDATION_LIMIT must be a positive integer")
            }
            ConfigError::InvalidForecastSeed => write!(f, "APP_FORECAST_SEED must be a valid u64"),
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::path::Path;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        for key in [
            "APP_ENV",
            "APP_LOG_LEVEL",
            "APP_LOG_ANSI",
            "APP_CROP_TABLE",
            "APP_SCHEME_TABLE",
            "APP_RECOMMENDATION_LIMIT",
            "APP_FORECAST_SEED",
        ] {
            env::remove_var(key);
        }
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.telemetry.log_level, "info");
        assert!(!config.telemetry.ansi);
        assert!(config.catalog.crop_table.is_none());
        assert!(config.catalog.scheme_table.is_none());
        assert_eq!(config.advisory, AdvisoryConfig::default());
        assert_eq!(config.advisory.recommendation_limit, 5);
    }

    #[test]
    fn reads_table_paths_and_seed() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_ENV", "production");
        env::set_var("APP_CROP_TABLE", "data/crops.csv");
        env::set_var("APP_SCHEME_TABLE", "  ");
        env::set_var("APP_RECOMMENDATION_LIMIT", "3");
        env::set_var("APP_FORECAST_SEED", "2024");

        let config = AppConfig::load().expect("config loads");
        reset_env();

        assert_eq!(config.environment, AppEnvironment::Production);
        assert_eq!(
            config.catalog.crop_table.as_deref(),
            Some(Path::new("data/crops.csv"))
        );
        assert!(config.catalog.scheme_table.is_none());
        assert_eq!(config.advisory.recommendation_limit, 3);
        assert_eq!(config.advisory.forecast_seed, Some(2024));
    }

    #[test]
    fn rejects_zero_recommendation_limit() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_RECOMMENDATION_LIMIT", "0");
        let result = AppConfig::load();
        reset_env();
        assert_eq!(result.err(), Some(ConfigError::InvalidRecommendationLimit));
    }

    #[test]
    fn rejects_malformed_seed() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_FORECAST_SEED", "tomorrow");
        let result = AppConfig::load();
        reset_env();
        assert_eq!(result.err(), Some(ConfigError::InvalidForecastSeed));
    }
}
