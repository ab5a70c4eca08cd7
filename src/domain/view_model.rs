// Weather view model - flattened input for the frame layouts
use anyhow::bail;

use super::compass::wind_direction;
use super::forecast::Forecast;
use super::icon::IconKey;
use super::options::UnitSystem;
use super::telemetry::TelemetryReading;

/// Number of daily columns drawn by the outlook layout
pub const OUTLOOK_DAYS: usize = 4;

#[derive(Debug, Clone, PartialEq)]
pub struct OutlookDay {
    pub condition: IconKey,
    pub condition_text: String,
    pub temp_min: i64,
    pub temp_max: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WeatherViewModel {
    pub city: String,
    pub condition_text: String,
    pub condition: IconKey,
    pub sun_rise: String,
    pub sun_set: String,
    pub pressure: i64,
    pub humidity: u8,
    pub precip: u8,
    /// From the sensor feed, not the provider
    pub current_temp: String,
    pub temp_min: i64,
    pub temp_max: i64,
    pub wind_speed: f64,
    pub wind_bearing: Option<f64>,
    pub wind_dir_text: String,
    pub days: [OutlookDay; OUTLOOK_DAYS],
    pub battery: String,
    pub units: UnitSystem,
}

impl WeatherViewModel {
    /// Merge one cycle's inputs; fails when fewer than four days are available
    pub fn build(
        forecast: &Forecast,
        telemetry: &TelemetryReading,
        city: &str,
        units: UnitSystem,
    ) -> anyhow::Result<Self> {
        if forecast.daily.len() < OUTLOOK_DAYS {
            bail!(
                "forecast has {} daily entries, {} needed",
                forecast.daily.len(),
                OUTLOOK_DAYS
            );
        }

        let current = &forecast.current;
        let today = &forecast.daily[0];
        let days = std::array::from_fn(|i| {
            let day = &forecast.daily[i];
            OutlookDay {
                condition: day.icon,
                condition_text: day.summary.clone(),
                temp_min: day.temperature_min,
                temp_max: day.temperature_max,
            }
        });

        Ok(Self {
            city: city.to_string(),
            condition_text: current.summary.clone(),
            condition: current.icon,
            sun_rise: today.sunrise_time.clone(),
            sun_set: today.sunset_time.clone(),
            pressure: current.pressure,
            humidity: current.humidity,
            precip: current.precip_probability,
            current_temp: telemetry.temperature.clone(),
            temp_min: today.temperature_min,
            temp_max: today.temperature_max,
            wind_speed: current.wind_speed,
            wind_bearing: current.wind_bearing,
            wind_dir_text: wind_direction(current.wind_bearing),
            days,
            battery: telemetry.voltage.clone(),
            units,
        })
    }

    pub fn temperature_label(&self) -> &'static str {
        self.units.temperature_label()
    }

    /// The sensor always reports Celsius, whatever units the provider answered in
    pub fn current_temp_text(&self) -> String {
        format!("{}{}", self.current_temp, UnitSystem::Si.temperature_label())
    }

    pub fn wind_speed_text(&self) -> String {
        format!("{}{}", self.wind_speed.round() as i64, self.units.wind_speed_label())
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use chrono::NaiveDate;

    use crate::domain::compass::CompassPoint;
    use crate::domain::forecast::{CurrentConditions, DailyForecast, Forecast};
    use crate::domain::icon::IconKey;
    use crate::domain::options::UnitSystem;

    pub fn daily(offset: u32, icon: IconKey, summary: &str, min: i64, max: i64) -> DailyForecast {
        DailyForecast {
            date: NaiveDate::from_ymd_opt(2024, 3, 11 + offset).unwrap_or_default(),
            summary: summary.to_string(),
            icon,
            sunrise_time: "06:05".to_string(),
            sunset_time: "17:48".to_string(),
            moon_phase: 0.05,
            precip_intensity: 0.0,
            precip_probability: 10,
            precip_type: None,
            humidity: 61,
            pressure: 1016,
            wind_speed: 12.4,
            wind_bearing: Some(220.0),
            wind_direction: Some(CompassPoint::SW),
            cloud_cover: 40,
            uv_index: 3.0,
            temperature_min: min,
            temperature_max: max,
        }
    }

    pub fn forecast() -> Forecast {
        Forecast {
            current: CurrentConditions {
                summary: "Partly cloudy until evening".to_string(),
                icon: IconKey::PartlySunny,
                precip_probability: 20,
                precip_type: Some("rain".to_string()),
                temperature: 11.7,
                humidity: 58,
                wind_speed: 14.6,
                wind_bearing: Some(315.0),
                wind_direction: Some(CompassPoint::NW),
                pressure: 1014,
                cloud_cover: 47,
            },
            daily: vec![
                daily(0, IconKey::PartlySunny, "Mostly cloudy", 3, 12),
                daily(1, IconKey::Rain, "Light rain in the afternoon", 5, 10),
                daily(2, IconKey::Cloud, "Overcast", 4, 9),
                daily(3, IconKey::Sun, "Clear", 2, 14),
                daily(4, IconKey::Snow, "Snow", -3, 1),
            ],
            units: UnitSystem::Si,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_merges_sources() {
        let telemetry = TelemetryReading::new("12.5".into(), "3.01".into(), "2024-03-11T10:00:00Z".into());
        let view = WeatherViewModel::build(&fixtures::forecast(), &telemetry, "Budapest", UnitSystem::Ca)
            .unwrap();

        assert_eq!(view.city, "Budapest");
        assert_eq!(view.current_temp, "12.5");
        assert_eq!(view.battery, "3.01");
        assert_eq!(view.condition, IconKey::PartlySunny);
        assert_eq!(view.wind_dir_text, "NW");
        assert_eq!(view.temp_min, 3);
        assert_eq!(view.temp_max, 12);
        assert_eq!(view.days[1].condition, IconKey::Rain);
        assert_eq!(view.days[3].temp_max, 14);
        assert_eq!(view.wind_speed_text(), "15km/h");
    }

    #[test]
    fn test_build_requires_four_days() {
        let mut forecast = fixtures::forecast();
        forecast.daily.truncate(3);
        let result = WeatherViewModel::build(&forecast, &TelemetryReading::fallback(), "X", UnitSystem::Si);
        assert!(result.is_err());
    }

    #[test]
    fn test_sensor_temperature_stays_celsius() {
        let mut forecast = fixtures::forecast();
        forecast.units = UnitSystem::Us;
        let telemetry = TelemetryReading::new("21.4".into(), "3.01".into(), "2024-03-11T10:00:00Z".into());
        let view = WeatherViewModel::build(&forecast, &telemetry, "Budapest", UnitSystem::Us).unwrap();

        assert_eq!(view.current_temp_text(), "21.4°C");
        assert_eq!(format!("{}{}", view.temp_max, view.temperature_label()), "12°F");
        assert_eq!(view.wind_speed_text(), "15mph");
    }
}
