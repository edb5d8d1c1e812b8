use clap::Parser;
use tracing_subscriber::EnvFilter;

use bookshelf::cli::Cli;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    if let Err(err) = Cli::parse().run().await {
        tracing::error!("{err}");
        std::process::exit(1);
    }
}
