// Main entry point - Dependency injection and refresh loop setup
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;

use weather_station::application::refresh_loop::RefreshLoop;
use weather_station::application::station_service::StationService;
use weather_station::infrastructure::config::{load_station_config, StationConfig};
use weather_station::infrastructure::darksky_client::DarkSkyClient;
use weather_station::infrastructure::frame_store::FrameStore;
use weather_station::infrastructure::icon_loader::load_icons;
use weather_station::infrastructure::thingspeak_client::ThingSpeakClient;
use weather_station::presentation::composer::{parse_locale, ComposerContext, FrameComposer};
use weather_station::presentation::fonts::FontSet;
use weather_station::{init_tracing, shutdown_signal};

const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    init_tracing();

    // Load configuration
    let config = load_station_config()?;
    tokio::fs::create_dir_all(&config.display.frame_dir)
        .await
        .with_context(|| format!("Frame directory {} is not usable", config.display.frame_dir.display()))?;

    // Create clients (infrastructure layer)
    let http = reqwest::Client::builder().timeout(HTTP_TIMEOUT).build()?;
    let forecast = Arc::new(DarkSkyClient::new(http.clone(), config.forecast.clone()));
    let telemetry = Arc::new(ThingSpeakClient::new(http, config.feed.clone()));

    // Create services (application layer)
    let station = StationService::new(forecast, telemetry, config.display.city.clone());

    // Fonts and icons (presentation layer)
    let icon_dir = config.display.icon_dir.clone();
    let icons = tokio::task::spawn_blocking(move || load_icons(&icon_dir)).await?;
    let composer = FrameComposer::new(ComposerContext {
        fonts: FontSet::new(config.display.font_charset),
        icons,
        locale: parse_locale(&config.display.locale),
        forecast_title: config.display.forecast_title.clone(),
    });

    let store = FrameStore::new(config.display.frame_dir.clone());
    let refresh = RefreshLoop::new(station, composer, store.clone(), config.refresh_interval);

    if config.run_mode.is_test() {
        tracing::info!("Test mode: one cycle, no panel");
        refresh.single_cycle(true).run(shutdown_signal()).await;
        return Ok(());
    }

    run_with_panel(&config, refresh, store).await
}

#[cfg(feature = "rpi")]
async fn run_with_panel(config: &StationConfig, refresh: RefreshLoop, store: FrameStore) -> anyhow::Result<()> {
    use weather_station::application::button_handler::ButtonHandler;
    use weather_station::application::panel_service::PanelService;
    use weather_station::infrastructure::rpi;

    let (panel, worker) = PanelService::start(rpi::open_panel()?);

    let (presses_tx, presses_rx) = tokio::sync::mpsc::channel(8);
    rpi::watch_buttons(config.display.button_pins, presses_tx)?;
    let buttons = tokio::spawn(ButtonHandler::new(store, panel.clone()).run(presses_rx));

    tracing::info!(interval = ?config.refresh_interval, slots = ?config.display.slots, "Weather station started");
    refresh
        .with_panel(panel, config.display.slots.clone())
        .run(shutdown_signal())
        .await;

    // Key threads keep their senders open; stopping the task releases its panel handle
    buttons.abort();
    let _ = buttons.await;
    worker.await?
}

#[cfg(not(feature = "rpi"))]
async fn run_with_panel(_config: &StationConfig, _refresh: RefreshLoop, _store: FrameStore) -> anyhow::Result<()> {
    anyhow::bail!("built without the `rpi` feature; set RUN_ENV=test to render frames without a panel")
}
