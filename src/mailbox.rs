//! Single-slot mailboxes backed by plain text files.
//!
//! A mailbox holds at most one value. Sending overwrites whatever was there,
//! and receiving reads the value without removing it, so a second receive on
//! an unchanged mailbox sees the same value again. There is no locking: a
//! reader can race a writer, and two writers race each other.

use std::{
    io::ErrorKind,
    marker::PhantomData,
    path::{Path, PathBuf},
    time::Duration,
};

use serde_json::Value;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::error::MailboxError;

pub const CURRENT_AQI: &str = "current_aqi.txt";
pub const PM25_AVG: &str = "pm25_avg.txt";
pub const RESPONSE: &str = "response.txt";
pub const HISTORIC_AQI: &str = "historic_aqi.txt";

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// A value that can travel through a mailbox file.
pub trait Message: Sized {
    fn encode(&self) -> String;
    fn decode(raw: &str) -> Result<Self, String>;
}

impl Message for String {
    fn encode(&self) -> String {
        self.clone()
    }

    fn decode(raw: &str) -> Result<Self, String> {
        Ok(raw.to_string())
    }
}

impl Message for f64 {
    fn encode(&self) -> String {
        self.to_string()
    }

    fn decode(raw: &str) -> Result<Self, String> {
        raw.trim()
            .parse()
            .map_err(|e| format!("expected a number, found {:?} ({})", raw, e))
    }
}

impl Message for i64 {
    fn encode(&self) -> String {
        self.to_string()
    }

    fn decode(raw: &str) -> Result<Self, String> {
        raw.trim()
            .parse()
            .map_err(|e| format!("expected an integer, found {:?} ({})", raw, e))
    }
}

impl Message for Value {
    fn encode(&self) -> String {
        self.to_string()
    }

    fn decode(raw: &str) -> Result<Self, String> {
        serde_json::from_str(raw).map_err(|e| format!("expected JSON ({})", e))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// How `Mailbox::receive` waits for a value to appear.
pub struct PollOptions {
    /// Pause between checks for the mailbox file.
    pub interval: Duration,
    /// Give up after this long. `None` waits forever.
    pub max_wait: Option<Duration>,
}

impl Default for PollOptions {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            max_wait: None,
        }
    }
}

/// A typed single-slot channel over one file.
#[derive(Debug)]
pub struct Mailbox<T> {
    path: PathBuf,
    _message: PhantomData<fn() -> T>,
}

impl<T> Clone for Mailbox<T> {
    fn clone(&self) -> Self {
        Self::new(self.path.clone())
    }
}

impl<T> Mailbox<T> {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Mailbox {
            path: path.into(),
            _message: PhantomData,
        }
    }

    /// Opens the mailbox called `name` inside `dir`.
    pub fn in_dir(dir: &Path, name: &str) -> Self {
        Self::new(dir.join(name))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Views the same file as a mailbox carrying a different message type.
    ///
    /// Request and reply share a file when a service answers in place.
    pub fn retype<U>(&self) -> Mailbox<U> {
        Mailbox::new(self.path.clone())
    }
}

impl<T: Message> Mailbox<T> {
    /// Replaces the mailbox contents with `value`.
    pub async fn send(&self, value: &T) -> Result<(), MailboxError> {
        tokio::fs::write(&self.path, value.encode())
            .await
            .map_err(|source| self.io_error(source))?;
        tracing::debug!("Sent to {}", self.path.display());

        Ok(())
    }

    /// Reads the mailbox once. `None` if nothing has been sent yet.
    ///
    /// An empty file counts as not sent: writers create the file before
    /// they fill it.
    pub async fn try_receive(&self) -> Result<Option<T>, MailboxError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) if raw.is_empty() => Ok(None),
            Ok(raw) => self.decode(&raw).map(Some),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(self.io_error(source)),
        }
    }

    /// Waits until the mailbox holds a value and returns it.
    ///
    /// Checks every `poll.interval`. Fails with `Timeout` once `poll.max_wait`
    /// has passed and with `Cancelled` as soon as `cancel` fires.
    pub async fn receive(
        &self,
        poll: &PollOptions,
        cancel: &CancellationToken,
    ) -> Result<T, MailboxError> {
        let started = Instant::now();

        loop {
            if let Some(value) = self.try_receive().await? {
                tracing::debug!("Received from {}", self.path.display());
                return Ok(value);
            }

            let mut pause = poll.interval;
            if let Some(max_wait) = poll.max_wait {
                let waited = started.elapsed();
                if waited >= max_wait {
                    return Err(MailboxError::Timeout {
                        path: self.path.clone(),
                        waited,
                    });
                }
                pause = pause.min(max_wait - waited);
            }

            tokio::select! {
                _ = tokio::time::sleep(pause) => {}
                _ = cancel.cancelled() => {
                    return Err(MailboxError::Cancelled {
                        path: self.path.clone(),
                    });
                }
            }
        }
    }

    fn decode(&self, raw: &str) -> Result<T, MailboxError> {
        T::decode(raw).map_err(|reason| MailboxError::Decode {
            path: self.path.clone(),
            reason,
        })
    }

    fn io_error(&self, source: std::io::Error) -> MailboxError {
        MailboxError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

/// The first line of a request, without surrounding whitespace.
pub fn first_line(raw: &str) -> &str {
    raw.lines().next().unwrap_or_default().trim()
}

// -- Tests -------------------------------------------------------------------
