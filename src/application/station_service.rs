// Station service - Use case for gathering one refresh cycle's data
use crate::application::weather_sources::{ForecastProvider, TelemetryFeed};
use crate::domain::view_model::WeatherViewModel;
use anyhow::Context;
use std::sync::Arc;

#[derive(Clone)]
pub struct StationService {
    forecast: Arc<dyn ForecastProvider>,
    telemetry: Arc<dyn TelemetryFeed>,
    city: String,
}

impl StationService {
    pub fn new(forecast: Arc<dyn ForecastProvider>, telemetry: Arc<dyn TelemetryFeed>, city: String) -> Self {
        Self {
            forecast,
            telemetry,
            city,
        }
    }

    /// Fetch both sources concurrently and merge them; fails only on the forecast side
    pub async fn fetch_view_model(&self) -> anyhow::Result<WeatherViewModel> {
        let (forecast, reading) = tokio::join!(self.forecast.fetch_forecast(), self.telemetry.latest_reading());
        let forecast = forecast.context("Failed to fetch forecast")?;

        if reading.is_fallback() {
            tracing::warn!("Sensor feed unavailable, showing zero readings");
        }

        let view = WeatherViewModel::build(&forecast, &reading, &self.city, forecast.units)?;
        tracing::debug!(?view, "Built view model");
        Ok(view)
    }
}


#[cfg(test)]
mod tests {
    use super::fakes::{FixedFeed, ScriptedForecast};
    use super::*;
    use crate::domain::telemetry::TelemetryReading;
    use crate::domain::view_model::fixtures;

    fn service(forecast: ScriptedForecast, reading: TelemetryReading) -> StationService {
        StationService::new(Arc::new(forecast), Arc::new(FixedFeed(reading)), "Budapest".to_string())
    }

    #[tokio::test]
    async fn test_fetch_merges_sources() {
        let reading = TelemetryReading::new("21.4".into(), "2.98".into(), "2024-03-11T10:00:00Z".into());
        let view = service(ScriptedForecast::always_ok(1), reading).fetch_view_model().await.unwrap();
        assert_eq!(view.current_temp, "21.4");
        assert_eq!(view.battery, "2.98");
        assert_eq!(view.city, "Budapest");
    }

    #[tokio::test]
    async fn test_telemetry_fallback_still_builds() {
        let view = service(ScriptedForecast::always_ok(1), TelemetryReading::fallback())
            .fetch_view_model()
            .await
            .unwrap();
        assert_eq!(view.current_temp, "0");
        assert_eq!(view.battery, "0");
    }

    #[tokio::test]
    async fn test_forecast_failure_is_error() {
        let result = service(ScriptedForecast::new(vec![]), TelemetryReading::fallback())
            .fetch_view_model()
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_short_forecast_is_error() {
        let mut forecast = fixtures::forecast();
        forecast.daily.truncate(2);
        let result = service(ScriptedForecast::new(vec![Ok(forecast)]), TelemetryReading::fallback())
            .fetch_view_model()
            .await;
        assert!(result.is_err());
    }
}
