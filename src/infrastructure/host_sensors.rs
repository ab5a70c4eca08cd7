// Linux host adapters for the sensor uploader: 1-Wire, IIO ADC, TCP reachability
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;

use crate::application::sensor_uploader::{BatteryAdc, DeepSleep, NetworkLink, Thermometer};

/// DS18B20 family code in 1-Wire device names
const DS18B20_PREFIX: &str = "28-";
const PROBE_TIMEOUT: Duration = Duration::from_millis(900);

/// Parse a `w1_slave` dump: CRC line ending in `YES`, then `t=<millidegrees>`
pub fn parse_w1_slave(content: &str) -> Result<f64> {
    let mut lines = content.lines();
    let crc_line = lines.next().context("empty w1_slave")?;
    if !crc_line.trim_end().ends_with("YES") {
        anyhow::bail!("w1_slave CRC check failed: {}", crc_line.trim());
    }
    let millis = lines
        .next()
        .and_then(|line| line.split("t=").nth(1))
        .context("w1_slave has no temperature")?
        .trim()
        .parse::<i32>()
        .context("w1_slave temperature is not a number")?;
    Ok(millis as f64 / 1000.0)
}

/// First DS18B20 under the w1 sysfs bus
#[derive(Debug, Clone)]
pub struct W1Thermometer {
    devices_dir: PathBuf,
}

impl W1Thermometer {
    pub fn new(devices_dir: impl Into<PathBuf>) -> Self {
        Self {
            devices_dir: devices_dir.into(),
        }
    }

    async fn find_sensor(&self) -> Result<PathBuf> {
        let mut entries = tokio::fs::read_dir(&self.devices_dir)
            .await
            .with_context(|| format!("Failed to list {}", self.devices_dir.display()))?;
        let mut found = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            if entry.file_name().to_string_lossy().starts_with(DS18B20_PREFIX) {
                found.push(entry.path());
            }
        }
        found.sort();
        found
            .into_iter()
            .next()
            .with_context(|| format!("No DS18B20 under {}", self.devices_dir.display()))
    }
}

#[async_trait]
impl Thermometer for W1Thermometer {
    async fn read_celsius(&self) -> Result<f64> {
        let path = self.find_sensor().await?.join("w1_slave");
        let content = tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        parse_w1_slave(&content)
    }
}

/// Raw reading from an IIO `in_voltageN_raw` file
#[derive(Debug, Clone)]
pub struct IioAdc {
    path: PathBuf,
}

impl IioAdc {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl BatteryAdc for IioAdc {
    async fn read_raw(&self) -> Result<u16> {
        read_raw_value(&self.path).await
    }
}

async fn read_raw_value(path: &Path) -> Result<u16> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    content
        .trim()
        .parse()
        .with_context(|| format!("Unexpected ADC value {:?}", content.trim()))
}

/// Treats the feed host as the network: connected once a TCP handshake succeeds
#[derive(Debug, Clone)]
pub struct TcpProbe {
    host: String,
    port: u16,
}

impl TcpProbe {
    pub fn new(host: String, port: u16) -> Self {
        Self { host, port }
    }

    /// Probe the host and port of a feed base URL
    pub fn for_url(url: &str) -> Result<Self> {
        let parsed = reqwest::Url::parse(url).with_context(|| format!("Invalid feed URL {}", url))?;
        let host = parsed.host_str().context("Feed URL has no host")?.to_string();
        let port = parsed.port_or_known_default().context("Feed URL has no port")?;
        Ok(Self::new(host, port))
    }
}

#[async_trait]
impl NetworkLink for TcpProbe {
    /// The host OS owns the network; nothing to start
    async fn connect(&self) -> Result<()> {
        Ok(())
    }

    async fn is_connected(&self) -> bool {
        let connect = tokio::net::TcpStream::connect((self.host.as_str(), self.port));
        matches!(tokio::time::timeout(PROBE_TIMEOUT, connect).await, Ok(Ok(_)))
    }
}

/// Deep sleep on a host is a timed pause
#[derive(Debug, Clone, Copy, Default)]
pub struct TimedSleep;

#[async_trait]
impl DeepSleep for TimedSleep {
    async fn deep_sleep(&self, duration: Duration) {
        tracing::info!(seconds = duration.as_secs(), "Sleeping");
        tokio::time::sleep(duration).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::frame_store::scratch_dir;

    const W1_DUMP: &str = "72 01 4b 46 7f ff 0e 10 57 : crc=57 YES\n72 01 4b 46 7f ff 0e 10 57 t=23125\n";

    #[test]
    fn test_parse_w1_slave() {
        assert_eq!(parse_w1_slave(W1_DUMP).unwrap(), 23.125);
        assert_eq!(
            parse_w1_slave("ff ff : crc=00 YES\nff ff t=-1250\n").unwrap(),
            -1.25
        );
        assert!(parse_w1_slave("72 01 : crc=57 NO\n72 01 t=23125\n").is_err());
        assert!(parse_w1_slave("").is_err());
    }

    #[tokio::test]
    async fn test_w1_sensor_lookup() {
        let dir = scratch_dir("w1");
        std::fs::create_dir_all(dir.join("w1_bus_master1")).unwrap();
        std::fs::create_dir_all(dir.join("28-00000a1b2c3d")).unwrap();
        std::fs::write(dir.join("28-00000a1b2c3d/w1_slave"), W1_DUMP).unwrap();

        assert_eq!(W1Thermometer::new(&dir).read_celsius().await.unwrap(), 23.125);
        assert!(W1Thermometer::new(dir.join("missing")).read_celsius().await.is_err());
    }

    #[tokio::test]
    async fn test_iio_adc() {
        let dir = scratch_dir("iio");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("in_voltage0_raw"), "950\n").unwrap();
        std::fs::write(dir.join("bad_raw"), "n/a").unwrap();

        assert_eq!(IioAdc::new(dir.join("in_voltage0_raw")).read_raw().await.unwrap(), 950);
        assert!(IioAdc::new(dir.join("bad_raw")).read_raw().await.is_err());
    }

    #[test]
    fn test_probe_target_from_url() {
        let probe = TcpProbe::for_url("https://api.thingspeak.com").unwrap();
        assert_eq!((probe.host.as_str(), probe.port), ("api.thingspeak.com", 443));
        let probe = TcpProbe::for_url("http://192.168.1.10:3000/").unwrap();
        assert_eq!((probe.host.as_str(), probe.port), ("192.168.1.10", 3000));
        assert!(TcpProbe::for_url("not a url").is_err());
    }

    #[tokio::test]
    async fn test_probe_closed_port() {
        assert!(!TcpProbe::new("127.0.0.1".to_string(), 1).is_connected().await);
    }
}
