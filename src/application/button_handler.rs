// Button handler - maps the four panel keys to frame pushes and a clear
use crate::application::panel_service::{PanelHandle, CLEAR_WHITE};
use crate::domain::slot::Slot;
use crate::infrastructure::frame_store::FrameStore;
use tokio::sync::mpsc;

/// Keys on the panel HAT, top to bottom
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    Key1,
    Key2,
    Key3,
    Key4,
}

impl Button {
    pub const ALL: [Button; 4] = [Button::Key1, Button::Key2, Button::Key3, Button::Key4];

    /// Frame shown by the key; the last key clears instead
    pub fn slot(self) -> Option<Slot> {
        match self {
            Button::Key1 => Some(Slot::Overview),
            Button::Key2 => Some(Slot::Compact),
            Button::Key3 => Some(Slot::Outlook),
            Button::Key4 => None,
        }
    }
}

#[derive(Clone)]
pub struct ButtonHandler {
    store: FrameStore,
    panel: PanelHandle,
}

impl ButtonHandler {
    pub fn new(store: FrameStore, panel: PanelHandle) -> Self {
        Self { store, panel }
    }

    /// Push the stored frame for the key, or clear the panel
    pub async fn handle(&self, button: Button) -> anyhow::Result<()> {
        tracing::info!(?button, "Button pressed");
        match button.slot() {
            Some(slot) => {
                // Loaded before touching the panel so a bad file leaves it as is
                let frame = self.store.load(slot).await?;
                self.panel.show(frame).await
            }
            None => self.panel.clear(CLEAR_WHITE).await,
        }
    }

    /// Serve presses until the sender side closes
    pub async fn run(self, mut presses: mpsc::Receiver<Button>) {
        while let Some(button) = presses.recv().await {
            if let Err(e) = self.handle(button).await {
                tracing::error!("Button {:?} failed: {:#}", button, e);
            }
        }
        tracing::info!("Button handler stopped");
    }
}
