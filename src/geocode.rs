//! Forward geocoding: turn free text into coordinates and an address.
//! Uses Nominatim (OpenStreetMap) - free, no API key required.

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Client;
use serde::Deserialize;
use url::Url;

use crate::config::GeocodingConfig;

const REQUEST_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
    display_name: String,
}

/// A resolved location.
#[derive(Debug, Clone, PartialEq)]
pub struct Place {
    pub latitude: f64,
    pub longitude: f64,
    /// Full address, most specific part first, e.g.
    /// "Corvallis, Benton County, Oregon, United States".
    pub address: String,
}

impl Place {
    pub fn components(&self) -> Vec<&str> {
        self.address.split(", ").collect()
    }
}

#[derive(Debug, Clone)]
pub struct Nominatim {
    client: Client,
    url: Url,
}

impl Nominatim {
    pub fn new(config: &GeocodingConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .user_agent(&config.user_agent)
            .build()
            .context("Failed to create geocoding client")?;
        let url = Url::parse(&config.url).context("Invalid geocoding URL")?;

        Ok(Self { client, url })
    }

    /// Looks up the best match for `query`, optionally within one country.
    ///
    /// `Ok(None)` means the service answered but knows no such place.
    pub async fn search(&self, query: &str, country: Option<&str>) -> Result<Option<Place>> {
        let mut url = self.url.clone();
        url.query_pairs_mut()
            .append_pair("q", query)
            .append_pair("format", "json")
            .append_pair("limit", "1");
        if let Some(country) = country {
            url.query_pairs_mut().append_pair("countrycodes", country);
        }

        tracing::debug!("Geocoding {:?}", query);
        let places: Vec<NominatimPlace> = self
            .client
            .get(url)
            .send()
            .await
            .context("Geocoding request failed")?
            .error_for_status()
            .context("Geocoding service returned an error")?
            .json()
            .await
            .context("Geocoding response was not understood")?;

        let Some(place) = places.into_iter().next() else {
            tracing::info!("No place found for {:?}", query);
            return Ok(None);
        };

        let latitude = place
            .lat
            .parse()
            .with_context(|| format!("Bad latitude {:?}", place.lat))?;
        let longitude = place
            .lon
            .parse()
            .with_context(|| format!("Bad longitude {:?}", place.lon))?;

        tracing::info!("Geocoded {:?} to: {}", query, place.display_name);
        Ok(Some(Place {
            latitude,
            longitude,
            address: place.display_name,
        }))
    }
}
