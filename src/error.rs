//! Error types shared by the mailbox, classifier and city table.

use std::{io, path::PathBuf, time::Duration};

use thiserror::Error;

/// Failures while exchanging a value through a mailbox file.
#[derive(Debug, Error)]
pub enum MailboxError {
    #[error("failed to access mailbox `{path}`: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("mailbox `{path}` holds an unreadable value: {reason}")]
    Decode { path: PathBuf, reason: String },

    #[error("gave up waiting for mailbox `{path}` after {waited:?}")]
    Timeout { path: PathBuf, waited: Duration },

    #[error("stopped waiting for mailbox `{path}`")]
    Cancelled { path: PathBuf },
}

/// Input that falls outside every classification band.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum ClassifyError {
    #[error("AQI category code must be 1 or greater, got {0}")]
    InvalidAqiCode(i64),

    #[error("PM2.5 concentration is not a number")]
    NotANumber,
}

/// Problems loading the known-city table.
#[derive(Debug, Error)]
pub enum CitiesError {
    #[error(
        "failed to read city table `{path}`: {source} \
         (expected a JSON object of city names to AQICN codes, such as {{\"Corvallis\": \"corvallis\"}})"
    )]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("city table `{path}` is not a JSON object of names to codes: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
