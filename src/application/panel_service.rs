// Panel service - single owner of the e-paper panel, driven over a channel
use crate::presentation::frame::Frame;
use anyhow::Context;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

/// Fill byte that clears the panel to white
pub const CLEAR_WHITE: u8 = 0xFF;

/// Blocking panel operations; implemented by the hardware driver and by test fakes
pub trait Panel: Send + 'static {
    /// Native (width, height)
    fn size(&self) -> (u32, u32);
    fn init(&mut self) -> anyhow::Result<()>;
    fn clear(&mut self, fill: u8) -> anyhow::Result<()>;
    fn display(&mut self, buffer: &[u8]) -> anyhow::Result<()>;
    fn sleep(&mut self) -> anyhow::Result<()>;
}

enum PanelCommand {
    Show {
        frame: Frame,
        reply: oneshot::Sender<anyhow::Result<()>>,
    },
    Clear {
        fill: u8,
        reply: oneshot::Sender<anyhow::Result<()>>,
    },
}

/// Puts the panel to sleep however the worker exits
struct SleepGuard<P: Panel>(P);

impl<P: Panel> Drop for SleepGuard<P> {
    fn drop(&mut self) {
        match self.0.sleep() {
            Ok(()) => tracing::info!("Panel asleep"),
            Err(e) => tracing::error!("Failed to put panel to sleep: {:#}", e),
        }
    }
}

/// Cloneable sender side; the worker stops when every handle is dropped
#[derive(Clone)]
pub struct PanelHandle {
    tx: mpsc::Sender<PanelCommand>,
}

impl PanelHandle {
    pub async fn show(&self, frame: Frame) -> anyhow::Result<()> {
        let (reply, rx) = oneshot::channel();
        self.send(PanelCommand::Show { frame, reply }, rx).await
    }

    pub async fn clear(&self, fill: u8) -> anyhow::Result<()> {
        let (reply, rx) = oneshot::channel();
        self.send(PanelCommand::Clear { fill, reply }, rx).await
    }

    async fn send(
        &self,
        command: PanelCommand,
        rx: oneshot::Receiver<anyhow::Result<()>>,
    ) -> anyhow::Result<()> {
        self.tx
            .send(command)
            .await
            .map_err(|_| anyhow::anyhow!("Panel service has stopped"))?;
        rx.await.context("Panel service dropped the request")?
    }
}

pub struct PanelService;

impl PanelService {
    /// Move `panel` onto a blocking worker, initialize it and serve commands.
    ///
    /// The returned task finishes after the panel has been put to sleep.
    pub fn start<P: Panel>(panel: P) -> (PanelHandle, JoinHandle<anyhow::Result<()>>) {
        let (tx, rx) = mpsc::channel(8);
        let worker = tokio::task::spawn_blocking(move || Self::serve(panel, rx));
        (PanelHandle { tx }, worker)
    }

    fn serve<P: Panel>(panel: P, mut rx: mpsc::Receiver<PanelCommand>) -> anyhow::Result<()> {
        let mut guard = SleepGuard(panel);
        let panel = &mut guard.0;
        panel.init().context("Failed to initialize panel")?;
        tracing::info!("Panel initialized");

        while let Some(command) = rx.blocking_recv() {
            match command {
                PanelCommand::Show { frame, reply } => {
                    let (width, height) = panel.size();
                    let result = frame
                        .to_panel_buffer(width, height)
                        .map_err(anyhow::Error::from)
                        .and_then(|buffer| panel.display(&buffer));
                    let _ = reply.send(result);
                }
                PanelCommand::Clear { fill, reply } => {
                    let _ = reply.send(panel.clear(fill));
                }
            }
        }
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::fakes::{PanelCall, RecordingPanel};
    use super::*;

    #[tokio::test]
    async fn test_commands_then_sleep_on_shutdown() {
        let panel = RecordingPanel::default();
        let (handle, worker) = PanelService::start(panel.clone());

        let mut frame = Frame::landscape();
        frame.set_black(0, 0, true);
        handle.show(frame.clone()).await.unwrap();
        handle.clear(CLEAR_WHITE).await.unwrap();
        drop(handle);
        worker.await.unwrap().unwrap();

        let calls = panel.calls();
        assert_eq!(calls.len(), 4);
        assert_eq!(calls[0], PanelCall::Init);
        assert_eq!(calls[1], PanelCall::Display(frame.to_panel_buffer(176, 264).unwrap()));
        assert_eq!(calls[2], PanelCall::Clear(0xFF));
        assert_eq!(calls[3], PanelCall::Sleep);
    }

    #[tokio::test]
    async fn test_wrong_frame_size_is_reported() {
        let panel = RecordingPanel::default();
        let (handle, worker) = PanelService::start(panel.clone());
        assert!(handle.show(Frame::blank(10, 10)).await.is_err());
        drop(handle);
        worker.await.unwrap().unwrap();
        assert!(!panel.calls().iter().any(|c| matches!(c, PanelCall::Display(_))));
    }

    #[tokio::test]
    async fn test_failed_init_still_sleeps() {
        let panel = RecordingPanel {
            fail_init: true,
            ..Default::default()
        };
        let (handle, worker) = PanelService::start(panel.clone());
        assert!(worker.await.unwrap().is_err());
        assert!(handle.clear(CLEAR_WHITE).await.is_err());
        assert_eq!(panel.calls(), vec![PanelCall::Init, PanelCall::Sleep]);
    }
}
