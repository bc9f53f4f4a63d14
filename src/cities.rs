//! Cities with historic PM2.5 coverage in the AQICN dataset.

use std::{collections::HashMap, path::Path};

use crate::error::CitiesError;

/// Maps a city name, as it appears in a geocoded address, to its dataset code.
#[derive(Debug, Clone, Default)]
pub struct KnownCities {
    codes: HashMap<String, String>,
}

impl KnownCities {
    /// Reads a JSON object such as `{"Corvallis": "corvallis"}`.
    pub fn load(path: &Path) -> Result<Self, CitiesError> {
        let contents = std::fs::read_to_string(path).map_err(|source| CitiesError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let codes = serde_json::from_str(&contents).map_err(|source| CitiesError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(KnownCities { codes })
    }

    pub fn code(&self, name: &str) -> Option<&str> {
        self.codes.get(name).map(String::as_str)
    }

    /// Matches the first two address components, in order.
    ///
    /// Geocoders often lead with a neighbourhood or street, so the city can
    /// sit in second place. Names must match exactly.
    pub fn find<'a>(&'a self, components: &[&'a str]) -> Option<(&'a str, &'a str)> {
        components
            .iter()
            .take(2)
            .find_map(|&name| self.code(name).map(|code| (name, code)))
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for KnownCities {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        KnownCities {
            codes: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
