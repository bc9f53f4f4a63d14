//! Answers a location request with the current air pollution report.

use std::path::PathBuf;

use anyhow::{anyhow, Result};
use serde_json::Value;

use crate::{
    air_quality::OpenWeatherMap,
    cli::create_spinner,
    geocode::Nominatim,
    mailbox::{first_line, Mailbox, CURRENT_AQI},
};

use super::PostOffice;

/// Replaces the location in `current_aqi.txt` with the JSON report for it.
pub async fn current(office: &PostOffice) -> Result<PathBuf> {
    let provider = OpenWeatherMap::new(&office.config.air_quality)?;
    let geocoder = Nominatim::new(&office.config.geocoding)?;

    let request: Mailbox<String> = office.mailbox(CURRENT_AQI);
    let raw = office.wait(&request).await?;
    let location = first_line(&raw);
    if location.is_empty() {
        anyhow::bail!("`{}` holds no location", request.path().display());
    }

    let bar = create_spinner(format!("Looking up air quality for {}...", location));
    let place = geocoder
        .search(location, None)
        .await?
        .ok_or_else(|| anyhow!("Location {:?} could not be resolved", location))?;
    let report = provider.current(place.latitude, place.longitude).await?;
    bar.finish_and_clear();

    let reply: Mailbox<Value> = request.retype();
    reply.send(&report).await?;
    tracing::info!("Answered {:?} in {}", location, reply.path().display());

    Ok(reply.path().to_path_buf())
}
