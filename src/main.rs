use clap::Parser;
use layoutkit::cli::{run, Cli};
use layoutkit::{init_logging, BUILD_DATE, VERSION};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging()?;
    tracing::debug!(version = VERSION, built = BUILD_DATE, "starting layoutkit");

    run(Cli::parse()).await
}
