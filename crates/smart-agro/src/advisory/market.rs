//! Indicative mandi prices and a simulated six-month price trail.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::debug;

const INDICATIVE_BAND: &str = "₹4,200 - ₹4,800 per quintal";
const HISTORY_MONTHS: u64 = 6;
const MONTH_STEP_DAYS: u64 = 30;
const PRICE_VARIATION: f64 = 0.15;
const DEFAULT_BASE_PRICE: f64 = 4000.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketQuery {
    pub crop: String,
    pub variety: String,
    pub quantity: u32,
    pub location: String,
    pub harvest_date: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceQuote {
    pub predicted_price: String,
    pub nearest_mandi: String,
    pub crop: String,
    pub variety: String,
    pub quantity: u32,
    pub location: String,
    pub harvest_date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub month: String,
    pub price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceHistory {
    pub points: Vec<PricePoint>,
    pub current_price: f64,
    pub price_change: f64,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MarketDesk;

impl MarketDesk {
    pub fn new() -> Self {
        Self
    }

    pub fn quote(&self, query: &MarketQuery) -> PriceQuote {
        PriceQuote {
            predicted_price: INDICATIVE_BAND.to_string(),
            nearest_mandi: format!("{} APMC Market", query.location),
            crop: query.crop.clone(),
            variety: query.variety.clone(),
            quantity: query.quantity,
            location: query.location.clone(),
            harvest_date: query.harvest_date.clone(),
        }
    }

    /// Monthly points ending at `today`, oldest first.
    pub fn history(&self, crop: &str, today: NaiveDate, rng: &mut fastrand::Rng) -> PriceHistory {
        let base = base_price(crop);
        let points: Vec<PricePoint> = (0..HISTORY_MONTHS)
            .rev()
            .filter_map(|step| today.checked_sub_days(Days::new(step * MONTH_STEP_DAYS)))
            .map(|date| {
                let variation = (rng.f64() * 2.0 - 1.0) * PRICE_VARIATION;
                PricePoint {
                    month: date.format("%b %Y").to_string(),
                    price: round_to(base * (1.0 + variation), 2),
                }
            })
            .collect();

        let first = points.first().map_or(0.0, |point| point.price);
        let current_price = points.last().map_or(0.0, |point| point.price);
        let price_change = percent_change(first, current_price);

        debug!(crop, base, current_price, price_change, "price history simulated");

        PriceHistory {
            points,
            current_price,
            price_change,
        }
    }
}

fn base_price(crop: &str) -> f64 {
    match crop.trim().to_ascii_lowercase().as_str() {
        "rice" => 4500.0,
        "wheat" => 4000.0,
        "maize" => 3800.0,
        "sugarcane" => 3500.0,
        "cotton" => 5500.0,
        _ => DEFAULT_BASE_PRICE,
    }
}

/// Percent change rounded to one decimal; a zero starting price reports no change.
fn percent_change(first: f64, last: f64) -> f64 {
    if first == 0.0 {
        0.0
    } else {
        round_to((last - first) / first * 100.0, 1)
    }
}

fn round_to(value: f64, places: i32) -> f64 {
    let scale = 10f64.powi(places);
    (value * scale).round() / scale
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 7, 15).expect("valid date")
    }

    #[test]
    fn quote_names_the_local_mandi() {
        let quote = MarketDesk::new().quote(&MarketQuery {
            crop: "wheat".to_string(),
            variety: "Sharbati".to_string(),
            quantity: 12,
            location: "Indore".to_string(),
            harvest_date: "2024-03-20".to_string(),
        });

        assert_eq!(quote.predicted_price, "₹4,200 - ₹4,800 per quintal");
        assert_eq!(quote.nearest_mandi, "Indore APMC Market");
        assert_eq!(quote.quantity, 12);
    }

    #[test]
    fn history_spans_six_months_oldest_first() {
        let history = MarketDesk::new().history("cotton", today(), &mut fastrand::Rng::with_seed(3));

        let months: Vec<_> = history.points.iter().map(|point| point.month.as_str()).collect();
        assert_eq!(
            months,
            ["Feb 2024", "Mar 2024", "Apr 2024", "May 2024", "Jun 2024", "Jul 2024"]
        );
        for point in &history.points {
            assert!((4675.0..=6325.0).contains(&point.price), "{point:?}");
        }
        assert_eq!(history.current_price, history.points[5].price);
    }

    #[test]
    fn price_change_is_relative_to_the_first_point() {
        assert_eq!(percent_change(4000.0, 4500.0), 12.5);
        assert_eq!(percent_change(4500.0, 4050.0), -10.0);
        assert_eq!(percent_change(4321.0, 4400.0), 1.8);
        assert_eq!(percent_change(0.0, 4400.0), 0.0);
    }

    #[test]
    fn history_change_tracks_its_own_endpoints() {
        let history = MarketDesk::new().history("rice", today(), &mut fastrand::Rng::with_seed(11));
        let first = history.points[0].price;

        assert!(history.price_change.abs() <= 35.3, "{history:?}");
        if history.current_price > first {
            assert!(history.price_change >= 0.0);
        } else if history.current_price < first {
            assert!(history.price_change <= 0.0);
        }
    }

    #[test]
    fn unknown_crops_use_the_default_base() {
        assert_eq!(base_price("Millet"), DEFAULT_BASE_PRICE);
        assert_eq!(base_price(" Sugarcane "), 3500.0);
    }
}
