//! Service configuration, read from a TOML file with defaults for every field.

use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::mailbox::PollOptions;

pub const API_KEY_ENV: &str = "OPENWEATHERMAP_API_KEY";

/// A single configuration problem.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigIssue {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigIssue>,
    pub warnings: Vec<ConfigIssue>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn add_error(&mut self, field: &str, message: impl Into<String>) {
        self.errors.push(ConfigIssue {
            field: field.to_string(),
            message: message.into(),
        });
    }

    fn add_warning(&mut self, field: &str, message: impl Into<String>) {
        self.warnings.push(ConfigIssue {
            field: field.to_string(),
            message: message.into(),
        });
    }

    pub fn error_summary(&self) -> String {
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub mailbox: MailboxConfig,
    pub geocoding: GeocodingConfig,
    pub air_quality: AirQualityConfig,
    pub history: HistoryConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MailboxConfig {
    /// Directory holding the mailbox files.
    pub dir: PathBuf,
    /// Seconds between checks while waiting for a request.
    pub poll_interval_secs: f64,
    /// Give up waiting after this many seconds. Unset waits forever.
    pub max_wait_secs: Option<f64>,
}

impl Default for MailboxConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
            poll_interval_secs: 2.0,
            max_wait_secs: None,
        }
    }
}

impl MailboxConfig {
    pub fn poll_options(&self) -> Result<PollOptions> {
        let interval = Duration::try_from_secs_f64(self.poll_interval_secs).with_context(|| {
            format!("Poll interval of {} seconds is out of range", self.poll_interval_secs)
        })?;
        let max_wait = self
            .max_wait_secs
            .map(|secs| {
                Duration::try_from_secs_f64(secs)
                    .with_context(|| format!("Maximum wait of {} seconds is out of range", secs))
            })
            .transpose()?;

        Ok(PollOptions { interval, max_wait })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeocodingConfig {
    /// Nominatim search endpoint.
    pub url: String,
    /// Nominatim rejects requests without an identifying user agent.
    pub user_agent: String,
    /// Country used to narrow historic lookups (ISO 3166-1 alpha-2).
    pub country_code: String,
}

impl Default for GeocodingConfig {
    fn default() -> Self {
        Self {
            url: "https://nominatim.openstreetmap.org/search".to_string(),
            user_agent: concat!("aqimail/", env!("CARGO_PKG_VERSION")).to_string(),
            country_code: "us".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AirQualityConfig {
    /// OpenWeatherMap air pollution endpoint.
    pub url: String,
    pub api_key: String,
}

impl Default for AirQualityConfig {
    fn default() -> Self {
        Self {
            url: "http://api.openweathermap.org/data/2.5/air_pollution".to_string(),
            api_key: String::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// DBnomics series endpoint.
    pub url: String,
    /// Known cities, relative to the mailbox directory unless absolute.
    ///
    /// A JSON object from city name, as the geocoder spells it, to the
    /// AQICN city code: `{"Corvallis": "corvallis"}` fetches
    /// `AQICN/AQI/US.corvallis.pm25.median`.
    pub cities_file: PathBuf,
    /// Where the historic series is written, resolved like `cities_file`.
    pub output_file: PathBuf,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            url: "https://api.db.nomics.world/v22/series".to_string(),
            cities_file: PathBuf::from("cities.json"),
            output_file: PathBuf::from("pm25py.csv"),
        }
    }
}

impl Config {
    /// Default location: `<config dir>/aqimail/config.toml`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("aqimail").join("config.toml"))
    }

    /// Loads `path`, or the default location when `path` is `None`.
    ///
    /// A missing file is not an error; defaults are used instead. The API key
    /// environment variable wins over the file.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let explicit = path.is_some();
        let path = path.map(Path::to_path_buf).or_else(Self::default_path);

        let mut config = match path {
            Some(path) if path.exists() => Self::from_file(&path)?,
            Some(path) if explicit => {
                anyhow::bail!("Config file `{}` does not exist", path.display())
            }
            _ => Self::default(),
        };

        if let Ok(key) = std::env::var(API_KEY_ENV) {
            if !key.is_empty() {
                config.air_quality.api_key = key;
            }
        }

        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file `{}`", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file `{}`", path.display()))
    }

    /// Checks the configuration, failing on errors and logging warnings.
    pub fn validated(self) -> Result<Self> {
        let validation = self.validate();

        if !validation.is_valid() {
            anyhow::bail!(
                "Configuration validation failed: {}",
                validation.error_summary()
            );
        }

        for warning in &validation.warnings {
            tracing::warn!("Config warning: {}", warning);
        }

        Ok(self)
    }

    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        let interval = Duration::try_from_secs_f64(self.mailbox.poll_interval_secs);
        if !matches!(interval, Ok(d) if !d.is_zero()) {
            result.add_error(
                "mailbox.poll_interval_secs",
                "Poll interval must be a positive number of seconds",
            );
        }

        if let Some(max_wait) = self.mailbox.max_wait_secs {
            if Duration::try_from_secs_f64(max_wait).is_err() {
                result.add_error(
                    "mailbox.max_wait_secs",
                    "Maximum wait must be a representable, non-negative number of seconds",
                );
            }
        }

        validate_url(&self.geocoding.url, "geocoding.url", &mut result);
        validate_url(&self.air_quality.url, "air_quality.url", &mut result);
        validate_url(&self.history.url, "history.url", &mut result);

        if self.geocoding.user_agent.trim().is_empty() {
            result.add_error("geocoding.user_agent", "User agent must not be empty");
        }

        if self.air_quality.api_key.is_empty() {
            result.add_warning(
                "air_quality.api_key",
                format!("No API key set; `current` needs one (or set {})", API_KEY_ENV),
            );
        }

        result
    }

    /// Resolves a path from the config against the mailbox directory.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.mailbox.dir.join(path)
        }
    }

    pub fn cities_path(&self) -> PathBuf {
        self.resolve(&self.history.cities_file)
    }

    pub fn output_path(&self) -> PathBuf {
        self.resolve(&self.history.output_file)
    }
}

fn validate_url(value: &str, field: &str, result: &mut ValidationResult) {
    match Url::parse(value) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
        Ok(url) => result.add_error(field, format!("Unsupported scheme `{}`", url.scheme())),
        Err(e) => result.add_error(field, format!("Invalid URL: {}", e)),
    }
}

// -- Tests -------------------------------------------------------------------
