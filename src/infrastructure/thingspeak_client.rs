// ThingSpeak-compatible feed client - latest reading and sample upload
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;

use crate::application::weather_sources::{FeedWriter, TelemetryFeed};
use crate::domain::telemetry::{SensorSample, TelemetryReading};
use crate::infrastructure::config::FeedSettings;

#[derive(Debug, Deserialize)]
struct FeedResponse {
    #[serde(default)]
    feeds: Vec<FeedEntry>,
}

#[derive(Debug, Deserialize)]
struct FeedEntry {
    created_at: Option<String>,
    field1: Option<String>,
    field2: Option<String>,
}

/// Pull the newest entry out of a `feeds.json` body
pub fn parse_feed(body: &str) -> Result<TelemetryReading> {
    let response: FeedResponse = serde_json::from_str(body).context("Failed to parse feed response")?;
    let entry = response
        .feeds
        .into_iter()
        .next()
        .context("Feed response has no entries")?;

    Ok(TelemetryReading::new(
        entry.field1.context("Feed entry has no field1")?,
        entry.field2.context("Feed entry has no field2")?,
        entry.created_at.context("Feed entry has no created_at")?,
    ))
}

#[derive(Debug, Clone)]
pub struct ThingSpeakClient {
    client: reqwest::Client,
    settings: FeedSettings,
}

impl ThingSpeakClient {
    pub fn new(client: reqwest::Client, settings: FeedSettings) -> Self {
        Self { client, settings }
    }

    fn base_url(&self) -> &str {
        self.settings.base_url.trim_end_matches('/')
    }

    fn read_url(&self) -> String {
        format!(
            "{}/channels/{}/feeds.json?api_key={}&results=1",
            self.base_url(),
            urlencoding::encode(&self.settings.channel_id),
            urlencoding::encode(&self.settings.read_api_key),
        )
    }

    fn update_url(&self, sample: SensorSample) -> String {
        format!(
            "{}/update?api_key={}&field1={:.1}&field2={:.2}",
            self.base_url(),
            urlencoding::encode(&self.settings.write_api_key),
            sample.temperature,
            sample.voltage,
        )
    }

    async fn fetch_latest(&self) -> Result<TelemetryReading> {
        let response = self
            .client
            .get(self.read_url())
            .send()
            .await
            .context("Failed to send feed request")?;

        if !response.status().is_success() {
            anyhow::bail!("Feed request failed with status {}", response.status());
        }

        let body = response.text().await.context("Failed to read feed response")?;
        parse_feed(&body)
    }
}

#[async_trait]
impl TelemetryFeed for ThingSpeakClient {
    async fn latest_reading(&self) -> TelemetryReading {
        match self.fetch_latest().await {
            Ok(reading) => reading,
            Err(e) => {
                tracing::warn!(error = %format!("{:#}", e), "Telemetry unavailable, using fallback reading");
                TelemetryReading::fallback()
            }
        }
    }
}

#[async_trait]
impl FeedWriter for ThingSpeakClient {
    async fn upload(&self, sample: SensorSample) -> Result<()> {
        let response = self
            .client
            .get(self.update_url(sample))
            .send()
            .await
            .context("Failed to send feed update")?;

        if !response.status().is_success() {
            anyhow::bail!("Feed update failed with status {}", response.status());
        }

        // The feed answers with the new entry id, or 0 when it rejected the update
        let body = response.text().await.context("Failed to read feed update response")?;
        if body.trim() == "0" {
            anyhow::bail!("Feed rejected the update");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base_url: &str) -> ThingSpeakClient {
        ThingSpeakClient::new(
            reqwest::Client::new(),
            FeedSettings {
                base_url: base_url.to_string(),
                channel_id: "123456".to_string(),
                read_api_key: "READ".to_string(),
                write_api_key: "WRITE".to_string(),
            },
        )
    }

    #[test]
    fn test_parse_feed() {
        let body = r#"{
            "channel": {"id": 123456, "name": "balcony"},
            "feeds": [{"created_at": "2024-03-11T10:00:00Z", "entry_id": 42, "field1": "12.5", "field2": "3.01"}]
        }"#;
        let reading = parse_feed(body).unwrap();
        assert_eq!(reading.temperature, "12.5");
        assert_eq!(reading.voltage, "3.01");
        assert_eq!(reading.updated, "2024-03-11T10:00:00Z");
    }

    #[test]
    fn test_parse_feed_rejects_incomplete_entries() {
        assert!(parse_feed(r#"{"feeds": []}"#).is_err());
        assert!(parse_feed(r#"{"feeds": [{"created_at": "x", "field1": null, "field2": "3.0"}]}"#).is_err());
        assert!(parse_feed("-1").is_err());
    }

    #[test]
    fn test_urls() {
        let client = client("https://api.thingspeak.com/");
        assert_eq!(
            client.read_url(),
            "https://api.thingspeak.com/channels/123456/feeds.json?api_key=READ&results=1"
        );
        assert_eq!(
            client.update_url(SensorSample::new(21.37, 2.9812)),
            "https://api.thingspeak.com/update?api_key=WRITE&field1=21.4&field2=2.98"
        );
    }

    #[tokio::test]
    async fn test_unreachable_feed_yields_fallback() {
        let reading = client("http://127.0.0.1:1").latest_reading().await;
        assert!(reading.is_fallback());
    }

    #[tokio::test]
    async fn test_unreachable_feed_upload_is_error() {
        assert!(client("http://127.0.0.1:1").upload(SensorSample::new(20.0, 3.0)).await.is_err());
    }
}
