use clap::Parser;
use tracing::info;

use ytaudio::cli::Cli;
use ytaudio::utils::init_logging;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Parse command line arguments
    let cli = Cli::parse();

    init_logging(cli.verbose);

    info!("Starting ytaudio v{}", env!("CARGO_PKG_VERSION"));

    cli.run().await?;

    Ok(())
}
