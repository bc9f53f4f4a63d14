//! Command line interface.

pub mod command;

use std::{path::PathBuf, time::Duration};

use clap::{Parser, Subcommand};
use indicatif::ProgressBar;

use crate::config::Config;

#[derive(Parser)]
#[command(version, about, long_about = None)]
/// Contains the commands
pub struct Cli {
    /// Config file [default: <config dir>/aqimail/config.toml]
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory holding the mailbox files
    #[arg(long, global = true)]
    pub dir: Option<PathBuf>,

    /// Seconds between checks for a request
    #[arg(long, global = true)]
    pub poll_interval: Option<f64>,

    /// Give up after waiting this many seconds for a request
    #[arg(long, global = true)]
    pub max_wait: Option<f64>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Classify the PM2.5 average in pm25_avg.txt into response.txt
    Summary {},
    /// Answer a location in current_aqi.txt with current air quality
    Current {},
    /// Answer a location in historic_aqi.txt with historic PM2.5 data
    ///
    /// Needs cities.json next to the mailboxes: a JSON object of city names
    /// to AQICN codes, such as {"Corvallis": "corvallis"}.
    Historic {},
}

impl Cli {
    /// Command line flags win over the config file.
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(dir) = &self.dir {
            config.mailbox.dir = dir.clone();
        }
        if let Some(interval) = self.poll_interval {
            config.mailbox.poll_interval_secs = interval;
        }
        if let Some(max_wait) = self.max_wait {
            config.mailbox.max_wait_secs = Some(max_wait);
        }
    }
}

/// Creates a spinner.
pub fn create_spinner(message: String) -> ProgressBar {
    let bar = ProgressBar::new_spinner().with_message(message);
    bar.enable_steady_tick(Duration::from_millis(100));

    bar
}

// -- Tests -------------------------------------------------------------------
