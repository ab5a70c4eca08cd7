// Settings for both binaries: .env, optional config file, process environment
use std::fmt::Display;
use std::ops::RangeInclusive;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::domain::options::{Language, UnitSystem};
use crate::domain::slot::Slot;
use crate::presentation::fonts::FontCharset;

pub const DEFAULT_DARKSKY_URL: &str = "https://api.pirateweather.net/forecast";
pub const DEFAULT_TS_URL: &str = "https://api.thingspeak.com";
pub const DEFAULT_INTERVAL_SECS: u64 = 300;
pub const DEFAULT_FORECAST_DAYS: usize = 4;
/// The outlook needs today plus three days; the provider serves a week ahead
pub const FORECAST_DAYS_RANGE: RangeInclusive<usize> = 3..=7;
pub const DEFAULT_BUTTON_PINS: [u32; 4] = [5, 6, 13, 19];

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {key}")]
    Invalid { key: &'static str, value: String },
    #[error("expected {expected} button pins, got {got}")]
    ButtonCount { expected: usize, got: usize },
}

/// `RUN_ENV=test` runs a single cycle without touching hardware
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunMode {
    #[default]
    Hardware,
    Test,
}

impl RunMode {
    fn from_env_value(value: Option<&str>) -> Self {
        match value {
            Some(v) if v.trim().eq_ignore_ascii_case("test") => RunMode::Test,
            _ => RunMode::Hardware,
        }
    }

    pub fn is_test(self) -> bool {
        self == RunMode::Test
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForecastSettings {
    pub api_key: String,
    pub latitude: f64,
    pub longitude: f64,
    pub language: Language,
    pub units: UnitSystem,
    pub base_url: String,
    pub days: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FeedSettings {
    pub base_url: String,
    pub channel_id: String,
    pub read_api_key: String,
    pub write_api_key: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DisplaySettings {
    pub city: String,
    pub locale: String,
    pub forecast_title: String,
    pub font_charset: FontCharset,
    pub frame_dir: PathBuf,
    pub icon_dir: PathBuf,
    /// Slots pushed to the panel after each cycle
    pub slots: Vec<Slot>,
    pub button_pins: [u32; 4],
}

#[derive(Debug, Clone, PartialEq)]
pub struct StationConfig {
    pub forecast: ForecastSettings,
    pub feed: FeedSettings,
    pub display: DisplaySettings,
    pub run_mode: RunMode,
    pub refresh_interval: Duration,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UploaderConfig {
    pub feed: FeedSettings,
    pub upload_interval: Duration,
    pub w1_devices_dir: PathBuf,
    pub adc_raw_path: PathBuf,
    pub run_mode: RunMode,
}

/// Flat view of every recognised key, lowercased by the environment source
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawSettings {
    darksky_api_key: Option<String>,
    darksky_latitude: Option<String>,
    darksky_longitude: Option<String>,
    darksky_language: Option<String>,
    darksky_units: Option<String>,
    darksky_url: Option<String>,
    forecast_days: Option<String>,
    ts_api_key: Option<String>,
    ts_channel_id: Option<String>,
    ts_url: Option<String>,
    ts_write_api_key: Option<String>,
    locale: Option<String>,
    forecast_title: Option<String>,
    city: Option<String>,
    run_env: Option<String>,
    refresh_interval: Option<String>,
    frame_dir: Option<String>,
    icon_dir: Option<String>,
    font_charset: Option<String>,
    display_slots: Option<String>,
    button_pins: Option<String>,
    upload_interval: Option<String>,
    w1_devices_dir: Option<String>,
    adc_raw_path: Option<String>,
}

fn load_raw() -> anyhow::Result<RawSettings> {
    // A missing .env is normal on deployed devices
    dotenvy::dotenv().ok();

    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/station").required(false))
        .add_source(config::Environment::default())
        .build()?;

    Ok(settings.try_deserialize()?)
}

pub fn load_station_config() -> anyhow::Result<StationConfig> {
    Ok(StationConfig::from_raw(load_raw()?)?)
}

pub fn load_uploader_config() -> anyhow::Result<UploaderConfig> {
    Ok(UploaderConfig::from_raw(load_raw()?)?)
}

impl StationConfig {
    /// Validate an already-built `config::Config`
    pub fn from_config(settings: config::Config) -> anyhow::Result<Self> {
        Ok(Self::from_raw(settings.try_deserialize()?)?)
    }

    fn from_raw(raw: RawSettings) -> Result<Self, ConfigError> {
        let forecast = ForecastSettings {
            api_key: raw.darksky_api_key.clone().unwrap_or_default(),
            latitude: required_number("DARKSKY_LATITUDE", raw.darksky_latitude.as_deref(), 47.4979)?,
            longitude: required_number("DARKSKY_LONGITUDE", raw.darksky_longitude.as_deref(), 19.0402)?,
            language: or_default("DARKSKY_LANGUAGE", raw.darksky_language.as_deref()),
            units: or_default("DARKSKY_UNITS", raw.darksky_units.as_deref()),
            base_url: text_or(raw.darksky_url.as_deref(), DEFAULT_DARKSKY_URL),
            days: forecast_days(raw.forecast_days.as_deref()),
        };

        let display = DisplaySettings {
            city: text_or(raw.city.as_deref(), "Budapest"),
            locale: text_or(raw.locale.as_deref(), "POSIX"),
            forecast_title: text_or(raw.forecast_title.as_deref(), "Forecast"),
            font_charset: or_default("FONT_CHARSET", raw.font_charset.as_deref()),
            frame_dir: PathBuf::from(text_or(raw.frame_dir.as_deref(), ".")),
            icon_dir: PathBuf::from(text_or(raw.icon_dir.as_deref(), "icons")),
            slots: parse_slots(raw.display_slots.as_deref()),
            button_pins: parse_button_pins(raw.button_pins.as_deref())?,
        };

        Ok(Self {
            forecast,
            feed: FeedSettings::from_raw(&raw),
            display,
            run_mode: RunMode::from_env_value(raw.run_env.as_deref()),
            refresh_interval: interval("REFRESH_INTERVAL", raw.refresh_interval.as_deref()),
        })
    }
}

impl UploaderConfig {
    pub fn from_config(settings: config::Config) -> anyhow::Result<Self> {
        Ok(Self::from_raw(settings.try_deserialize()?)?)
    }

    fn from_raw(raw: RawSettings) -> Result<Self, ConfigError> {
        Ok(Self {
            feed: FeedSettings::from_raw(&raw),
            upload_interval: interval("UPLOAD_INTERVAL", raw.upload_interval.as_deref()),
            w1_devices_dir: PathBuf::from(text_or(raw.w1_devices_dir.as_deref(), "/sys/bus/w1/devices")),
            adc_raw_path: PathBuf::from(text_or(
                raw.adc_raw_path.as_deref(),
                "/sys/bus/iio/devices/iio:device0/in_voltage0_raw",
            )),
            run_mode: RunMode::from_env_value(raw.run_env.as_deref()),
        })
    }
}

impl FeedSettings {
    fn from_raw(raw: &RawSettings) -> Self {
        Self {
            base_url: text_or(raw.ts_url.as_deref(), DEFAULT_TS_URL),
            channel_id: raw.ts_channel_id.clone().unwrap_or_default(),
            read_api_key: raw.ts_api_key.clone().unwrap_or_default(),
            write_api_key: raw.ts_write_api_key.clone().unwrap_or_default(),
        }
    }
}

fn text_or(value: Option<&str>, default: &str) -> String {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => default.to_string(),
    }
}

/// Parse an optional value, logging and falling back to the default when it is invalid
fn or_default<T>(key: &'static str, value: Option<&str>) -> T
where
    T: FromStr + Default,
    T::Err: Display,
{
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => T::default(),
        Some(v) => v.parse().unwrap_or_else(|e| {
            tracing::warn!(key, error = %e, "invalid setting, using default");
            T::default()
        }),
    }
}

fn positive_or(key: &'static str, value: Option<&str>, default: usize) -> usize {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => default,
        Some(v) => match v.parse::<usize>() {
            Ok(n) if n > 0 => n,
            _ => {
                tracing::warn!(key, value = v, default, "invalid setting, using default");
                default
            }
        },
    }
}

fn forecast_days(value: Option<&str>) -> usize {
    let days = positive_or("FORECAST_DAYS", value, DEFAULT_FORECAST_DAYS);
    if FORECAST_DAYS_RANGE.contains(&days) {
        days
    } else {
        tracing::warn!(
            days,
            min = FORECAST_DAYS_RANGE.start(),
            max = FORECAST_DAYS_RANGE.end(),
            "FORECAST_DAYS out of range, using default"
        );
        DEFAULT_FORECAST_DAYS
    }
}

fn interval(key: &'static str, value: Option<&str>) -> Duration {
    Duration::from_secs(positive_or(key, value, DEFAULT_INTERVAL_SECS as usize) as u64)
}

/// Coordinates have no sensible fallback once given, so a bad value is an error
fn required_number(key: &'static str, value: Option<&str>, default: f64) -> Result<f64, ConfigError> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(default),
        Some(v) => v
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .ok_or_else(|| ConfigError::Invalid {
                key,
                value: v.to_string(),
            }),
    }
}

/// Comma separated slots; unknown entries are dropped, an empty result means overview only
fn parse_slots(value: Option<&str>) -> Vec<Slot> {
    let Some(value) = value else {
        return vec![Slot::Overview];
    };
    let mut slots: Vec<Slot> = value
        .split(',')
        .filter(|s| !s.trim().is_empty())
        .filter_map(|s| match s.parse::<Slot>() {
            Ok(slot) => Some(slot),
            Err(e) => {
                tracing::warn!(error = %e, "ignoring display slot");
                None
            }
        })
        .collect();
    slots.sort();
    slots.dedup();
    if slots.is_empty() {
        slots.push(Slot::Overview);
    }
    slots
}

fn parse_button_pins(value: Option<&str>) -> Result<[u32; 4], ConfigError> {
    let Some(value) = value.filter(|v| !v.trim().is_empty()) else {
        return Ok(DEFAULT_BUTTON_PINS);
    };
    let pins = value
        .split(',')
        .map(|p| {
            p.trim().parse::<u32>().map_err(|_| ConfigError::Invalid {
                key: "BUTTON_PINS",
                value: value.to_string(),
            })
        })
        .collect::<Result<Vec<u32>, ConfigError>>()?;
    let got = pins.len();
    pins.try_into().map_err(|_| ConfigError::ButtonCount { expected: 4, got })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(pairs: &[(&str, &str)]) -> config::Config {
        let mut builder = config::Config::builder();
        for (key, value) in pairs {
            builder = builder.set_override(*key, *value).unwrap();
        }
        builder.build().unwrap()
    }

    #[test]
    fn test_defaults() {
        let config = StationConfig::from_config(settings(&[])).unwrap();
        assert_eq!(config.forecast.language, Language::English);
        assert_eq!(config.forecast.units, UnitSystem::Si);
        assert_eq!(config.forecast.base_url, DEFAULT_DARKSKY_URL);
        assert_eq!(config.feed.base_url, DEFAULT_TS_URL);
        assert_eq!(config.refresh_interval, Duration::from_secs(300));
        assert_eq!(config.display.slots, vec![Slot::Overview]);
        assert_eq!(config.display.button_pins, [5, 6, 13, 19]);
        assert_eq!(config.display.city, "Budapest");
        assert_eq!(config.run_mode, RunMode::Hardware);
    }

    #[test]
    fn test_explicit_values() {
        let config = StationConfig::from_config(settings(&[
            ("darksky_language", "HUNGARIAN"),
            ("darksky_units", "ca"),
            ("darksky_latitude", "46.25"),
            ("refresh_interval", "600"),
            ("display_slots", "3, 1"),
            ("font_charset", "latin2"),
            ("run_env", "test"),
            ("ts_channel_id", "123456"),
        ]))
        .unwrap();
        assert_eq!(config.forecast.language, Language::Hungarian);
        assert_eq!(config.forecast.units, UnitSystem::Ca);
        assert_eq!(config.forecast.latitude, 46.25);
        assert_eq!(config.refresh_interval, Duration::from_secs(600));
        assert_eq!(config.display.slots, vec![Slot::Overview, Slot::Outlook]);
        assert_eq!(config.display.font_charset, FontCharset::Latin2);
        assert!(config.run_mode.is_test());
        assert_eq!(config.feed.channel_id, "123456");
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = StationConfig::from_config(settings(&[
            ("darksky_language", "klingon"),
            ("darksky_units", "furlongs"),
            ("refresh_interval", "soon"),
            ("display_slots", "7"),
        ]))
        .unwrap();
        assert_eq!(config.forecast.language, Language::English);
        assert_eq!(config.forecast.units, UnitSystem::Si);
        assert_eq!(config.refresh_interval, Duration::from_secs(300));
        assert_eq!(config.display.slots, vec![Slot::Overview]);

        let zero = StationConfig::from_config(settings(&[("refresh_interval", "0")])).unwrap();
        assert_eq!(zero.refresh_interval, Duration::from_secs(300));
    }

    #[test]
    fn test_forecast_days_bounds() {
        let days = |value: &str| {
            StationConfig::from_config(settings(&[("forecast_days", value)]))
                .unwrap()
                .forecast
                .days
        };
        assert_eq!(days("3"), 3);
        assert_eq!(days("7"), 7);
        assert_eq!(days("1"), DEFAULT_FORECAST_DAYS);
        assert_eq!(days("18446744073709551615"), DEFAULT_FORECAST_DAYS);
        assert_eq!(days("many"), DEFAULT_FORECAST_DAYS);
    }

    #[test]
    fn test_bad_coordinates_and_pins_are_errors() {
        assert!(StationConfig::from_config(settings(&[("darksky_longitude", "east")])).is_err());
        assert!(StationConfig::from_config(settings(&[("button_pins", "5,6")])).is_err());
        assert!(StationConfig::from_config(settings(&[("button_pins", "5,6,x,19")])).is_err());
    }

    #[test]
    fn test_uploader_config() {
        let config = UploaderConfig::from_config(settings(&[
            ("ts_write_api_key", "WRITEKEY"),
            ("upload_interval", "60"),
        ]))
        .unwrap();
        assert_eq!(config.feed.write_api_key, "WRITEKEY");
        assert_eq!(config.upload_interval, Duration::from_secs(60));
        assert_eq!(config.w1_devices_dir, PathBuf::from("/sys/bus/w1/devices"));
    }
}
