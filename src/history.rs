//! Historic PM2.5 series from the AQICN dataset on DBnomics.

use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

use crate::config::HistoryConfig;

const REQUEST_TIMEOUT_SECS: u64 = 30;
const PROVIDER: &str = "AQICN";
const DATASET: &str = "AQI";

#[derive(Debug, Deserialize)]
struct SeriesResponse {
    series: SeriesPage,
}

#[derive(Debug, Deserialize)]
struct SeriesPage {
    docs: Vec<SeriesDoc>,
}

#[derive(Debug, Deserialize)]
struct SeriesDoc {
    #[serde(default)]
    period: Vec<String>,
    #[serde(default)]
    value: Vec<Value>,
}

/// One observation, as published.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Observation {
    pub original_period: String,
    /// The number, or the dataset's `NA` marker when there is none.
    pub original_value: String,
}

/// A time series of observations in period order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Series {
    pub code: String,
    pub observations: Vec<Observation>,
}

/// Series code of the median PM2.5 readings for a US city.
pub fn median_pm25_code(city_code: &str) -> String {
    format!("US.{}.pm25.median", city_code)
}

#[derive(Debug, Clone)]
pub struct DbNomics {
    client: Client,
    url: Url,
}

impl DbNomics {
    pub fn new(config: &HistoryConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .context("Failed to create history client")?;
        let url = Url::parse(&config.url).context("Invalid history URL")?;

        Ok(Self { client, url })
    }

    /// Downloads every observation of one AQICN series.
    pub async fn fetch_series(&self, series_code: &str) -> Result<Series> {
        let mut url = self.url.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow!("History URL `{}` cannot take a path", self.url))?
            .pop_if_empty()
            .extend([PROVIDER, DATASET, series_code]);
        url.query_pairs_mut().append_pair("observations", "1");

        tracing::info!("Fetching series {}/{}/{}", PROVIDER, DATASET, series_code);
        let response: SeriesResponse = self
            .client
            .get(url)
            .send()
            .await
            .context("History request failed")?
            .error_for_status()
            .context("History service returned an error")?
            .json()
            .await
            .context("History response was not understood")?;

        let doc = response
            .series
            .docs
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("Series `{}` has no data", series_code))?;

        if doc.period.len() != doc.value.len() {
            anyhow::bail!(
                "Series `{}` has {} periods but {} values",
                series_code,
                doc.period.len(),
                doc.value.len()
            );
        }

        let observations = doc
            .period
            .into_iter()
            .zip(doc.value)
            .map(|(original_period, value)| Observation {
                original_period,
                original_value: render_value(&value),
            })
            .collect::<Vec<_>>();
        tracing::debug!("Series {} has {} observations", series_code, observations.len());

        Ok(Series {
            code: series_code.to_string(),
            observations,
        })
    }
}

fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "NA".to_string(),
        other => other.to_string(),
    }
}
