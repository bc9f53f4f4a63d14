//! Current air pollution from OpenWeatherMap.

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Client;
use serde_json::Value;
use url::Url;

use crate::config::AirQualityConfig;

const REQUEST_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone)]
pub struct OpenWeatherMap {
    client: Client,
    url: Url,
    api_key: String,
}

impl OpenWeatherMap {
    pub fn new(config: &AirQualityConfig) -> Result<Self> {
        if config.api_key.is_empty() {
            anyhow::bail!("An OpenWeatherMap API key is required for current air quality");
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .context("Failed to create air quality client")?;
        let url = Url::parse(&config.url).context("Invalid air quality URL")?;

        Ok(Self {
            client,
            url,
            api_key: config.api_key.clone(),
        })
    }

    /// Fetches the current pollution report for a coordinate, unmodified.
    pub async fn current(&self, latitude: f64, longitude: f64) -> Result<Value> {
        let mut url = self.url.clone();
        url.query_pairs_mut()
            .append_pair("lat", &latitude.to_string())
            .append_pair("lon", &longitude.to_string())
            .append_pair("appid", &self.api_key);

        tracing::debug!("Requesting air quality for ({}, {})", latitude, longitude);
        let report = self
            .client
            .get(url)
            .send()
            .await
            .context("Air quality request failed")?
            .error_for_status()
            .context("Air quality service returned an error")?
            .json()
            .await
            .context("Air quality response was not JSON")?;

        Ok(report)
    }
}
