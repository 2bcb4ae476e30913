use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// Supplier of the daily weather outlook attached to a risk report.
pub trait ForecastSource {
    fn outlook(&mut self, start: NaiveDate, days: usize) -> Vec<DailyOutlook>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkyCondition {
    Sunny,
    Rainy,
}

impl SkyCondition {
    pub fn icon(self) -> &'static str {
        match self {
            Self::Sunny => "sun",
            Self::Rainy => "cloud-rain",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyOutlook {
    pub date: NaiveDate,
    pub label: String,
    pub condition: SkyCondition,
    pub icon: String,
    pub high: i32,
    pub low: i32,
    pub rain_chance: u8,
    pub wind_speed: String,
}

/// Cosmetic outlook drawn from a pseudo-random source. Not a weather model.
#[derive(Debug, Clone)]
pub struct SimulatedForecast {
    rng: fastrand::Rng,
}

impl SimulatedForecast {
    pub fn new() -> Self {
        Self {
            rng: fastrand::Rng::new(),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: fastrand::Rng::with_seed(seed),
        }
    }

    pub fn from_rng(rng: fastrand::Rng) -> Self {
        Self { rng }
    }

    fn day(&mut self, date: NaiveDate, index: usize) -> DailyOutlook {
        let condition = if index % 3 == 2 {
            SkyCondition::Rainy
        } else {
            SkyCondition::Sunny
        };
        let high = 32 + self.rng.i32(-2..=3);
        let low = 22 + self.rng.i32(-2..=3);
        let rain_chance = match condition {
            SkyCondition::Sunny => 10,
            SkyCondition::Rainy => 70 + self.rng.u8(0..=25),
        };
        let wind_speed = format!(
            "{}-{}",
            5 + self.rng.u8(0..=10),
            15 + self.rng.u8(0..=10)
        );

        DailyOutlook {
            date,
            label: date.format("%a, %b %d").to_string(),
            condition,
            icon: condition.icon().to_string(),
            high,
            low,
            rain_chance,
            wind_speed,
        }
    }
}

impl Default for SimulatedForecast {
    fn default() -> Self {
        Self::new()
    }
}

impl ForecastSource for SimulatedForecast {
    fn outlook(&mut self, start: NaiveDate, days: usize) -> Vec<DailyOutlook> {
        (0..days)
            .map_while(|index| {
                start
                    .checked_add_days(Days::new(index as u64))
                    .map(|date| (index, date))
            })
            .map(|(index, date)| self.day(date, index))
            .collect()
    }
}
