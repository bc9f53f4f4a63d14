//! Air quality microservice.
//!
//! Requests and answers travel through plain text files ("mailboxes") that
//! another program writes and reads. Each subcommand waits for its request
//! file, calls one outside service, and leaves the answer in a file.

pub mod air_quality;
pub mod cities;
pub mod classify;
pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod geocode;
pub mod history;
pub mod mailbox;
