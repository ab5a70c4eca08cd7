// Forecast domain models - current conditions and daily summaries
use chrono::NaiveDate;

use super::compass::CompassPoint;
use super::icon::IconKey;
use super::options::UnitSystem;

#[derive(Debug, Clone, PartialEq)]
pub struct CurrentConditions {
    pub summary: String,
    pub icon: IconKey,
    /// Rounded to the nearest 10 %
    pub precip_probability: u8,
    pub precip_type: Option<String>,
    pub temperature: f64,
    pub humidity: u8,
    pub wind_speed: f64,
    pub wind_bearing: Option<f64>,
    pub wind_direction: Option<CompassPoint>,
    pub pressure: i64,
    pub cloud_cover: u8,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DailyForecast {
    pub date: NaiveDate,
    pub summary: String,
    pub icon: IconKey,
    /// `HH:MM` in the forecast location's timezone
    pub sunrise_time: String,
    pub sunset_time: String,
    pub moon_phase: f64,
    pub precip_intensity: f64,
    pub precip_probability: u8,
    pub precip_type: Option<String>,
    pub humidity: u8,
    pub pressure: i64,
    pub wind_speed: f64,
    pub wind_bearing: Option<f64>,
    pub wind_direction: Option<CompassPoint>,
    pub cloud_cover: u8,
    pub uv_index: f64,
    pub temperature_min: i64,
    pub temperature_max: i64,
}

/// Current conditions plus the daily sequence (index 0 = today)
#[derive(Debug, Clone, PartialEq)]
pub struct Forecast {
    pub current: CurrentConditions,
    pub daily: Vec<DailyForecast>,
    /// Unit system the provider actually answered in
    pub units: UnitSystem,
}

/// Scale a `[0, 1]` fraction to a rounded integer percent in `[0, 100]`
pub fn fraction_to_percent(fraction: f64) -> u8 {
    if !fraction.is_finite() {
        return 0;
    }
    (fraction * 100.0).round().clamp(0.0, 100.0) as u8
}

/// Probability as percent, rounded to the nearest multiple of 10
pub fn precip_percent(fraction: f64) -> u8 {
    if !fraction.is_finite() {
        return 0;
    }
    ((fraction * 10.0).round() * 10.0).clamp(0.0, 100.0) as u8
}

/// Round to the nearest integer, half away from zero
pub fn round_whole(value: f64) -> i64 {
    if value.is_finite() { value.round() as i64 } else { 0 }
}
