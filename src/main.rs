use anyhow::{Error, Result};
use aqimail::{
    cli::{
        command::{self, PostOffice},
        Cli, Commands,
    },
    config::Config,
};
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref())?;
    cli.apply_overrides(&mut config);
    let office = PostOffice::new(config.validated()?, CancellationToken::new());

    let cancel = office.cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted, no longer waiting");
            cancel.cancel();
        }
    });

    match &cli.command {
        Commands::Summary {} => {
            let category = command::summary(&office).await?;
            println!("Air quality is `{}`", category);
        }
        Commands::Current {} => {
            let path = command::current(&office).await?;
            println!("Report saved to `{}`", path.display());
        }
        Commands::Historic {} => {
            let outcome = command::historic(&office).await?;
            println!("{}", outcome);
        }
    }

    Ok(())
}
