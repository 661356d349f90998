use std::sync::Arc;

use clap::Parser;
use cli::Cli;
use directory::IamDirectory;
use log::{debug, LevelFilter};
use output::KeyWriter;
use tokio_util::sync::CancellationToken;

mod cli;
mod directory;
mod logger;
mod lookup;
mod output;
mod shutdown;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initiate logger
    let level = match cli.debug {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::max(),
    };
    logger::setup(cli.log.clone(), level)?;

    // Answer requests for other login names with an empty listing
    if !cli.permits_login() {
        debug!("Requested login name does not match the expected user");
        return Ok(());
    }

    // Turn a closed stdout pipe into a clean shutdown
    let shutdown = CancellationToken::new();
    shutdown::listen_for_closed_pipe(&shutdown);

    // Print every active key the directory holds for the candidate users
    let directory = IamDirectory::connect().await;
    let writer = KeyWriter::new(tokio::io::stdout(), shutdown.clone());
    lookup::print_authorized_keys(Arc::new(directory), writer, cli.group.as_deref(), shutdown)
        .await?;

    Ok(())
}
