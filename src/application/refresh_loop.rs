// Refresh loop - fetch, compose, store and push frames on a fixed interval
use crate::application::panel_service::PanelHandle;
use crate::application::station_service::StationService;
use crate::domain::slot::Slot;
use crate::domain::view_model::WeatherViewModel;
use crate::infrastructure::frame_store::FrameStore;
use crate::presentation::composer::FrameComposer;
use chrono::NaiveDateTime;
use std::future::Future;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub enum LoopState {
    Fetching,
    Composing(Box<WeatherViewModel>),
    Sleeping,
}

pub struct RefreshLoop {
    station: StationService,
    composer: FrameComposer,
    store: FrameStore,
    panel: Option<PanelHandle>,
    display_slots: Vec<Slot>,
    interval: Duration,
    single_cycle: bool,
}

impl RefreshLoop {
    pub fn new(station: StationService, composer: FrameComposer, store: FrameStore, interval: Duration) -> Self {
        Self {
            station,
            composer,
            store,
            panel: None,
            display_slots: vec![Slot::Overview],
            interval,
            single_cycle: false,
        }
    }

    /// Push the given slots to the panel after each successful cycle
    pub fn with_panel(mut self, panel: PanelHandle, display_slots: Vec<Slot>) -> Self {
        self.panel = Some(panel);
        self.display_slots = display_slots;
        self
    }

    /// Stop after the first cycle
    pub fn single_cycle(mut self, single: bool) -> Self {
        self.single_cycle = single;
        self
    }

    /// Drive the state machine until `shutdown` resolves, or after one cycle in single-cycle mode
    pub async fn run(self, shutdown: impl Future<Output = ()>) {
        tokio::pin!(shutdown);
        let mut state = LoopState::Fetching;

        loop {
            state = match state {
                LoopState::Fetching => {
                    tokio::select! {
                        _ = &mut shutdown => break,
                        next = self.fetch() => next,
                    }
                }
                LoopState::Composing(view) => self.compose(&view, chrono::Local::now().naive_local()).await,
                LoopState::Sleeping => {
                    if self.single_cycle {
                        break;
                    }
                    tracing::debug!(seconds = self.interval.as_secs(), "Sleeping until next cycle");
                    tokio::select! {
                        _ = &mut shutdown => break,
                        _ = tokio::time::sleep(self.interval) => LoopState::Fetching,
                    }
                }
            };
        }
        tracing::info!("Refresh loop stopped");
    }

    async fn fetch(&self) -> LoopState {
        match self.station.fetch_view_model().await {
            Ok(view) => LoopState::Composing(Box::new(view)),
            Err(e) => {
                tracing::error!("Skipping cycle, fetch failed: {:#}", e);
                LoopState::Sleeping
            }
        }
    }

    async fn compose(&self, view: &WeatherViewModel, now: NaiveDateTime) -> LoopState {
        if let Err(e) = self.publish(view, now).await {
            tracing::error!("Skipping cycle, frames not written: {:#}", e);
        }
        LoopState::Sleeping
    }

    /// Compose every slot in memory, then replace the files, then update the panel
    async fn publish(&self, view: &WeatherViewModel, now: NaiveDateTime) -> anyhow::Result<()> {
        let frames = self.composer.compose_all(view, now);
        self.store.save_all(&frames).await?;
        tracing::info!(dir = %self.store.dir().display(), "Frames refreshed");

        if let Some(panel) = &self.panel {
            for (slot, frame) in frames {
                if !self.display_slots.contains(&slot) {
                    continue;
                }
                // A panel failure does not undo the written files
                if let Err(e) = panel.show(frame).await {
                    tracing::error!("Failed to show {}: {:#}", slot, e);
                }
            }
        }
        Ok(())
    }
}
