// Source traits for forecast and sensor feed access
use crate::domain::forecast::Forecast;
use crate::domain::telemetry::{SensorSample, TelemetryReading};
use async_trait::async_trait;

#[async_trait]
pub trait ForecastProvider: Send + Sync {
    /// Current conditions and daily outlook for the configured location
    async fn fetch_forecast(&self) -> anyhow::Result<Forecast>;
}

#[async_trait]
pub trait TelemetryFeed: Send + Sync {
    /// Latest sensor reading; implementations return the zero fallback instead of failing
    async fn latest_reading(&self) -> TelemetryReading;
}

#[async_trait]
pub trait FeedWriter: Send + Sync {
    async fn upload(&self, sample: SensorSample) -> anyhow::Result<()>;
}
