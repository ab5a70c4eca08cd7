// Sensor uploader entry point - samples the local sensors into the feed
use std::sync::Arc;
use std::time::Duration;

use weather_station::application::sensor_uploader::SensorUploader;
use weather_station::infrastructure::config::load_uploader_config;
use weather_station::infrastructure::host_sensors::{IioAdc, TcpProbe, TimedSleep, W1Thermometer};
use weather_station::infrastructure::thingspeak_client::ThingSpeakClient;
use weather_station::{init_tracing, shutdown_signal};

const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = load_uploader_config()?;
    let http = reqwest::Client::builder().timeout(HTTP_TIMEOUT).build()?;

    let uploader = SensorUploader::new(
        Arc::new(W1Thermometer::new(config.w1_devices_dir.clone())),
        Arc::new(IioAdc::new(config.adc_raw_path.clone())),
        Arc::new(TcpProbe::for_url(&config.feed.base_url)?),
        Arc::new(TimedSleep),
        Arc::new(ThingSpeakClient::new(http, config.feed.clone())),
    )
    .with_sleep(config.upload_interval);

    if config.run_mode.is_test() {
        let outcome = uploader.with_sleep(Duration::ZERO).run_cycle().await;
        tracing::info!(?outcome, "Single upload cycle finished");
        return Ok(());
    }

    tracing::info!(interval = ?config.upload_interval, "Sensor uploader started");
    uploader.run(shutdown_signal()).await;
    Ok(())
}
