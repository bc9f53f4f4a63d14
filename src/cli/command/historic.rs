//! Answers a location request with the city's historic PM2.5 medians.

use std::{fmt, path::PathBuf};

use anyhow::Result;

use crate::{
    cities::KnownCities,
    cli::create_spinner,
    export,
    geocode::Nominatim,
    history::{median_pm25_code, DbNomics},
    mailbox::{first_line, Mailbox, HISTORIC_AQI},
};

use super::PostOffice;

pub const NOT_RECOGNIZED: &str = "Entry not recognized. Please check for typos.";
pub const NOT_FOUND: &str = "Location not found.";

#[derive(Debug, Clone, PartialEq)]
pub enum HistoricOutcome {
    /// The series was written to `path`.
    Saved {
        city: String,
        series: String,
        path: PathBuf,
        observations: usize,
    },
    /// The request did not geocode to any place.
    NotRecognized,
    /// The place is real but has no data.
    NotFound,
}

impl fmt::Display for HistoricOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HistoricOutcome::Saved {
                city,
                series,
                path,
                observations,
            } => write!(
                f,
                "{} observations of {} for {} saved to `{}`",
                observations,
                series,
                city,
                path.display()
            ),
            HistoricOutcome::NotRecognized => f.write_str(NOT_RECOGNIZED),
            HistoricOutcome::NotFound => f.write_str(NOT_FOUND),
        }
    }
}

/// Writes the series to the output file, or an explanation back to
/// `historic_aqi.txt` when there is nothing to write.
pub async fn historic(office: &PostOffice) -> Result<HistoricOutcome> {
    let config = &office.config;
    let geocoder = Nominatim::new(&config.geocoding)?;
    let source = DbNomics::new(&config.history)?;

    let request: Mailbox<String> = office.mailbox(HISTORIC_AQI);
    let raw = office.wait(&request).await?;
    let location = first_line(&raw);

    let country = Some(config.geocoding.country_code.as_str()).filter(|c| !c.is_empty());
    let place = if location.is_empty() {
        None
    } else {
        geocoder.search(location, country).await?
    };

    let Some(place) = place else {
        request.send(&NOT_RECOGNIZED.to_string()).await?;
        return Ok(HistoricOutcome::NotRecognized);
    };

    let cities = KnownCities::load(&config.cities_path())?;
    let components = place.components();
    let Some((city, code)) = cities.find(&components) else {
        tracing::info!("{} is not a known city", place.address);
        request.send(&NOT_FOUND.to_string()).await?;
        return Ok(HistoricOutcome::NotFound);
    };

    let bar = create_spinner(format!("Fetching PM2.5 history for {}...", city));
    let series = source.fetch_series(&median_pm25_code(code)).await?;
    bar.finish_with_message("PM2.5 history fetched");

    let path = config.output_path();
    export::save_series(&series, &path)?;
    tracing::info!("Saved {} to {}", series.code, path.display());

    Ok(HistoricOutcome::Saved {
        city: city.to_string(),
        series: series.code,
        path,
        observations: series.observations.len(),
    })
}

// -- Tests -------------------------------------------------------------------
