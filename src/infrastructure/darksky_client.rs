// DarkSky-compatible forecast client (Pirate Weather by default)
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, NaiveDate, Offset, Utc};
use chrono_tz::Tz;
use serde::Deserialize;

use crate::application::weather_sources::ForecastProvider;
use crate::domain::compass::CompassPoint;
use crate::domain::forecast::{
    fraction_to_percent, precip_percent, round_whole, CurrentConditions, DailyForecast, Forecast,
};
use crate::domain::icon::IconKey;
use crate::domain::options::UnitSystem;
use crate::infrastructure::config::ForecastSettings;

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    #[serde(default)]
    timezone: Option<String>,
    #[serde(default)]
    offset: f64,
    currently: DataPoint,
    daily: DataBlock,
    #[serde(default)]
    flags: Option<Flags>,
}

#[derive(Debug, Deserialize)]
struct DataBlock {
    #[serde(default)]
    data: Vec<DataPoint>,
}

#[derive(Debug, Deserialize)]
struct Flags {
    #[serde(default)]
    units: Option<String>,
}

/// Shared shape of `currently` and `daily.data[]`; absent numbers read as 0
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct DataPoint {
    time: i64,
    summary: String,
    icon: String,
    sunrise_time: Option<i64>,
    sunset_time: Option<i64>,
    moon_phase: f64,
    precip_intensity: f64,
    precip_probability: f64,
    precip_type: Option<String>,
    temperature: f64,
    temperature_min: f64,
    temperature_max: f64,
    humidity: f64,
    pressure: f64,
    wind_speed: f64,
    wind_bearing: Option<f64>,
    cloud_cover: f64,
    uv_index: f64,
}

/// Wall clock of the forecast location
#[derive(Debug, Clone, Copy)]
enum LocalClock {
    Named(Tz),
    Fixed(FixedOffset),
}

impl LocalClock {
    fn resolve(timezone: Option<&str>, offset_hours: f64) -> Self {
        if let Some(tz) = timezone.and_then(|name| name.parse::<Tz>().ok()) {
            return LocalClock::Named(tz);
        }
        let seconds = (offset_hours * 3600.0).round() as i32;
        LocalClock::Fixed(FixedOffset::east_opt(seconds).unwrap_or_else(|| Utc.fix()))
    }

    fn utc(timestamp: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(timestamp, 0).unwrap_or_default()
    }

    fn date(self, timestamp: i64) -> NaiveDate {
        match self {
            LocalClock::Named(tz) => Self::utc(timestamp).with_timezone(&tz).date_naive(),
            LocalClock::Fixed(offset) => Self::utc(timestamp).with_timezone(&offset).date_naive(),
        }
    }

    fn hhmm(self, timestamp: Option<i64>) -> String {
        let Some(timestamp) = timestamp else {
            return "--:--".to_string();
        };
        match self {
            LocalClock::Named(tz) => Self::utc(timestamp).with_timezone(&tz).format("%H:%M").to_string(),
            LocalClock::Fixed(offset) => Self::utc(timestamp).with_timezone(&offset).format("%H:%M").to_string(),
        }
    }
}

/// Map a provider response to the domain forecast.
///
/// `requested` is used for the unit labels when the response carries no `flags.units`.
/// At most `max_daily` daily entries are kept.
pub fn parse_forecast(body: &str, requested: UnitSystem, max_daily: usize) -> Result<Forecast> {
    let response: ForecastResponse =
        serde_json::from_str(body).context("Failed to parse forecast response")?;

    let clock = LocalClock::resolve(response.timezone.as_deref(), response.offset);
    let units = response
        .flags
        .and_then(|f| f.units)
        .and_then(|u| u.parse::<UnitSystem>().ok())
        .unwrap_or(requested);

    let now = response.currently;
    let current = CurrentConditions {
        icon: IconKey::from_condition(&now.icon),
        summary: now.summary,
        precip_probability: precip_percent(now.precip_probability),
        precip_type: now.precip_type,
        temperature: now.temperature,
        humidity: fraction_to_percent(now.humidity),
        wind_speed: now.wind_speed,
        wind_bearing: now.wind_bearing,
        wind_direction: now.wind_bearing.and_then(CompassPoint::from_bearing),
        pressure: round_whole(now.pressure),
        cloud_cover: fraction_to_percent(now.cloud_cover),
    };

    let daily = response
        .daily
        .data
        .into_iter()
        .take(max_daily)
        .map(|d| DailyForecast {
            date: clock.date(d.time),
            icon: IconKey::from_condition(&d.icon),
            summary: d.summary,
            sunrise_time: clock.hhmm(d.sunrise_time),
            sunset_time: clock.hhmm(d.sunset_time),
            moon_phase: d.moon_phase,
            precip_intensity: d.precip_intensity,
            precip_probability: precip_percent(d.precip_probability),
            precip_type: d.precip_type,
            humidity: fraction_to_percent(d.humidity),
            pressure: round_whole(d.pressure),
            wind_speed: d.wind_speed,
            wind_bearing: d.wind_bearing,
            wind_direction: d.wind_bearing.and_then(CompassPoint::from_bearing),
            cloud_cover: fraction_to_percent(d.cloud_cover),
            uv_index: d.uv_index,
            temperature_min: round_whole(d.temperature_min),
            temperature_max: round_whole(d.temperature_max),
        })
        .collect();

    Ok(Forecast {
        current,
        daily,
        units,
    })
}

#[derive(Debug, Clone)]
pub struct DarkSkyClient {
    client: reqwest::Client,
    settings: ForecastSettings,
}

impl DarkSkyClient {
    pub fn new(client: reqwest::Client, settings: ForecastSettings) -> Self {
        Self { client, settings }
    }

    fn build_url(&self) -> String {
        let s = &self.settings;
        format!(
            "{}/{}/{},{}?exclude=minutely,alerts&units={}&lang={}",
            s.base_url.trim_end_matches('/'),
            urlencoding::encode(&s.api_key),
            s.latitude,
            s.longitude,
            s.units.code(),
            s.language.code(),
        )
    }
}

#[async_trait]
impl ForecastProvider for DarkSkyClient {
    async fn fetch_forecast(&self) -> Result<Forecast> {
        let response = self
            .client
            .get(self.build_url())
            .header("Accept", "application/json")
            .send()
            .await
            .context("Failed to send forecast request")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Forecast request failed with status {}: {}", status, body);
        }

        let body = response
            .text()
            .await
            .context("Failed to read forecast response")?;

        // Today plus the configured number of days ahead
        let max_daily = self.settings.days.saturating_add(1);
        parse_forecast(&body, self.settings.units, max_daily)
    }
}
