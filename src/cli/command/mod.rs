pub mod current;
pub mod historic;
pub mod summary;

use anyhow::Result;
use tokio_util::sync::CancellationToken;

pub use current::current;
pub use historic::{historic, HistoricOutcome};
pub use summary::summary;

use crate::{
    cli::create_spinner,
    config::Config,
    mailbox::{Mailbox, Message},
};

/// What every command needs: settings, and a way to stop waiting.
#[derive(Debug, Clone)]
pub struct PostOffice {
    pub config: Config,
    pub cancel: CancellationToken,
}

impl PostOffice {
    pub fn new(config: Config, cancel: CancellationToken) -> Self {
        Self { config, cancel }
    }

    pub fn mailbox<T>(&self, name: &str) -> Mailbox<T> {
        Mailbox::in_dir(&self.config.mailbox.dir, name)
    }

    /// Waits for a value in `mailbox` with the configured polling.
    pub async fn wait<T: Message>(&self, mailbox: &Mailbox<T>) -> Result<T> {
        let poll = self.config.mailbox.poll_options()?;
        let bar = create_spinner(format!("Waiting for {}...", mailbox.path().display()));
        let result = mailbox.receive(&poll, &self.cancel).await;
        bar.finish_and_clear();

        Ok(result?)
    }
}
