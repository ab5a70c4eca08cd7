// Sensor uploader - wake, connect, sample, upload, sleep
use crate::application::weather_sources::FeedWriter;
use crate::domain::telemetry::SensorSample;
use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

pub const WIFI_ATTEMPTS: u32 = 10;
pub const WIFI_POLL: Duration = Duration::from_secs(1);
pub const DEFAULT_SLEEP: Duration = Duration::from_secs(300);

/// ADC reference voltage of the battery divider, and the 10-bit full scale
const REFERENCE_VOLTAGE: f64 = 3.2;
const ADC_FULL_SCALE: f64 = 1023.0;

#[async_trait]
pub trait Thermometer: Send + Sync {
    async fn read_celsius(&self) -> anyhow::Result<f64>;
}

#[async_trait]
pub trait BatteryAdc: Send + Sync {
    async fn read_raw(&self) -> anyhow::Result<u16>;
}

#[async_trait]
pub trait NetworkLink: Send + Sync {
    /// Start joining the network; completion is observed through `is_connected`
    async fn connect(&self) -> anyhow::Result<()>;
    async fn is_connected(&self) -> bool;
}

#[async_trait]
pub trait DeepSleep: Send + Sync {
    async fn deep_sleep(&self, duration: Duration);
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UploaderState {
    Boot,
    WifiConnect,
    ReadSensors,
    Upload(SensorSample),
    DeepSleep,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UploadOutcome {
    Uploaded(SensorSample),
    UploadFailed(SensorSample),
    NoNetwork,
    SensorFailed,
}

pub fn battery_volts(raw: u16) -> f64 {
    raw as f64 * REFERENCE_VOLTAGE / ADC_FULL_SCALE
}

#[derive(Clone)]
pub struct SensorUploader {
    thermometer: Arc<dyn Thermometer>,
    battery: Arc<dyn BatteryAdc>,
    link: Arc<dyn NetworkLink>,
    sleeper: Arc<dyn DeepSleep>,
    feed: Arc<dyn FeedWriter>,
    sleep_for: Duration,
}

impl SensorUploader {
    pub fn new(
        thermometer: Arc<dyn Thermometer>,
        battery: Arc<dyn BatteryAdc>,
        link: Arc<dyn NetworkLink>,
        sleeper: Arc<dyn DeepSleep>,
        feed: Arc<dyn FeedWriter>,
    ) -> Self {
        Self {
            thermometer,
            battery,
            link,
            sleeper,
            feed,
            sleep_for: DEFAULT_SLEEP,
        }
    }

    pub fn with_sleep(mut self, sleep_for: Duration) -> Self {
        self.sleep_for = sleep_for;
        self
    }

    /// Boot through DeepSleep once
    pub async fn run_cycle(&self) -> UploadOutcome {
        let mut state = UploaderState::Boot;
        let mut outcome = UploadOutcome::NoNetwork;

        loop {
            tracing::debug!(?state, "Uploader state");
            state = match state {
                UploaderState::Boot => UploaderState::WifiConnect,
                UploaderState::WifiConnect => {
                    if self.wait_for_network().await {
                        UploaderState::ReadSensors
                    } else {
                        tracing::warn!(attempts = WIFI_ATTEMPTS, "Network unavailable, sleeping early");
                        outcome = UploadOutcome::NoNetwork;
                        UploaderState::DeepSleep
                    }
                }
                UploaderState::ReadSensors => match self.sample().await {
                    Ok(sample) => UploaderState::Upload(sample),
                    Err(e) => {
                        tracing::error!("Failed to read sensors: {:#}", e);
                        outcome = UploadOutcome::SensorFailed;
                        UploaderState::DeepSleep
                    }
                },
                UploaderState::Upload(sample) => {
                    outcome = match self.feed.upload(sample).await {
                        Ok(()) => {
                            tracing::info!(temperature = sample.temperature, voltage = sample.voltage, "Sample uploaded");
                            UploadOutcome::Uploaded(sample)
                        }
                        Err(e) => {
                            tracing::warn!("Upload failed: {:#}", e);
                            UploadOutcome::UploadFailed(sample)
                        }
                    };
                    UploaderState::DeepSleep
                }
                UploaderState::DeepSleep => {
                    self.sleeper.deep_sleep(self.sleep_for).await;
                    return outcome;
                }
            };
        }
    }

    /// Repeat cycles until `shutdown` resolves
    pub async fn run(&self, shutdown: impl Future<Output = ()>) {
        tokio::pin!(shutdown);
        loop {
            tokio::select! {
                _ = &mut shutdown => break,
                outcome = self.run_cycle() => tracing::debug!(?outcome, "Upload cycle finished"),
            }
        }
        tracing::info!("Sensor uploader stopped");
    }

    async fn wait_for_network(&self) -> bool {
        if self.link.is_connected().await {
            return true;
        }
        if let Err(e) = self.link.connect().await {
            tracing::warn!("Failed to start network join: {:#}", e);
        }
        for attempt in 1..=WIFI_ATTEMPTS {
            tokio::time::sleep(WIFI_POLL).await;
            if self.link.is_connected().await {
                tracing::debug!(attempt, "Network connected");
                return true;
            }
        }
        false
    }

    async fn sample(&self) -> anyhow::Result<SensorSample> {
        let celsius = self.thermometer.read_celsius().await?;
        let raw = self.battery.read_raw().await?;
        Ok(SensorSample::new(celsius, battery_volts(raw)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
    use std::sync::Mutex;

    struct FakeThermometer {
        celsius: Option<f64>,
        reads: AtomicUsize,
    }

    #[async_trait]
    impl Thermometer for FakeThermometer {
        async fn read_celsius(&self) -> anyhow::Result<f64> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            self.celsius.ok_or_else(|| anyhow::anyhow!("no sensor on the bus"))
        }
    }

    struct FakeAdc(u16);

    #[async_trait]
    impl BatteryAdc for FakeAdc {
        async fn read_raw(&self) -> anyhow::Result<u16> {
            Ok(self.0)
        }
    }

    /// Connects after `polls_needed` polls; `None` never connects
    struct FakeLink {
        polls_needed: Option<u32>,
        polls: AtomicU32,
    }

    #[async_trait]
    impl NetworkLink for FakeLink {
        async fn connect(&self) -> anyhow::Result<()> {
            Ok(())
        }

        async fn is_connected(&self) -> bool {
            let polls = self.polls.fetch_add(1, Ordering::SeqCst) + 1;
            self.polls_needed.is_some_and(|needed| polls > needed)
        }
    }

    #[derive(Default)]
    struct FakeSleep(Mutex<Vec<Duration>>);

    #[async_trait]
    impl DeepSleep for FakeSleep {
        async fn deep_sleep(&self, duration: Duration) {
            if let Ok(mut sleeps) = self.0.lock() {
                sleeps.push(duration);
            }
        }
    }

    #[derive(Default)]
    struct FakeFeed {
        fail: bool,
        uploads: Mutex<Vec<SensorSample>>,
    }

    #[async_trait]
    impl FeedWriter for FakeFeed {
        async fn upload(&self, sample: SensorSample) -> anyhow::Result<()> {
            if let Ok(mut uploads) = self.uploads.lock() {
                uploads.push(sample);
            }
            if self.fail {
                anyhow::bail!("HTTP 500");
            }
            Ok(())
        }
    }

    struct Rig {
        thermometer: Arc<FakeThermometer>,
        link: Arc<FakeLink>,
        sleeper: Arc<FakeSleep>,
        feed: Arc<FakeFeed>,
        uploader: SensorUploader,
    }

    fn rig(celsius: Option<f64>, polls_needed: Option<u32>, feed_fails: bool) -> Rig {
        let thermometer = Arc::new(FakeThermometer {
            celsius,
            reads: AtomicUsize::new(0),
        });
        let link = Arc::new(FakeLink {
            polls_needed,
            polls: AtomicU32::new(0),
        });
        let sleeper = Arc::new(FakeSleep::default());
        let feed = Arc::new(FakeFeed {
            fail: feed_fails,
            ..Default::default()
        });
        let uploader = SensorUploader::new(
            thermometer.clone(),
            Arc::new(FakeAdc(950)),
            link.clone(),
            sleeper.clone(),
            feed.clone(),
        );
        Rig {
            thermometer,
            link,
            sleeper,
            feed,
            uploader,
        }
    }

    #[test]
    fn test_battery_conversion() {
        assert_eq!(battery_volts(0), 0.0);
        assert!((battery_volts(1023) - 3.2).abs() < 1e-9);
        assert_eq!(SensorSample::new(21.37, battery_volts(950)).voltage, 2.97);
    }

    #[tokio::test(start_paused = true)]
    async fn test_happy_path_uploads_and_sleeps() {
        let rig = rig(Some(21.37), Some(2), false);
        let outcome = rig.uploader.run_cycle().await;

        let expected = SensorSample::new(21.4, 2.97);
        assert_eq!(outcome, UploadOutcome::Uploaded(expected));
        assert_eq!(*rig.feed.uploads.lock().unwrap(), vec![expected]);
        assert_eq!(*rig.sleeper.0.lock().unwrap(), vec![Duration::from_secs(300)]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_network_sleeps_early() {
        let rig = rig(Some(21.0), None, false);
        let started = tokio::time::Instant::now();
        let outcome = rig.uploader.run_cycle().await;

        assert_eq!(outcome, UploadOutcome::NoNetwork);
        assert_eq!(started.elapsed(), WIFI_POLL * WIFI_ATTEMPTS);
        // Initial check plus one poll per attempt
        assert_eq!(rig.link.polls.load(Ordering::SeqCst), WIFI_ATTEMPTS + 1);
        assert_eq!(rig.thermometer.reads.load(Ordering::SeqCst), 0);
        assert!(rig.feed.uploads.lock().unwrap().is_empty());
        assert_eq!(rig.sleeper.0.lock().unwrap().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_upload_failure_still_sleeps() {
        let rig = rig(Some(19.96), Some(0), true);
        let outcome = rig.uploader.run_cycle().await;
        assert_eq!(outcome, UploadOutcome::UploadFailed(SensorSample::new(20.0, 2.97)));
        assert_eq!(rig.sleeper.0.lock().unwrap().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_sensor_failure_skips_upload() {
        let rig = rig(None, Some(0), false);
        assert_eq!(rig.uploader.run_cycle().await, UploadOutcome::SensorFailed);
        assert!(rig.feed.uploads.lock().unwrap().is_empty());
        assert_eq!(rig.sleeper.0.lock().unwrap().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_custom_sleep_duration() {
        let rig = rig(Some(20.0), Some(0), false);
        let uploader = rig.uploader.clone().with_sleep(Duration::from_secs(60));
        uploader.run_cycle().await;
        assert_eq!(*rig.sleeper.0.lock().unwrap(), vec![Duration::from_secs(60)]);
    }
}
