use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fact_finder::cli::{interactive, run, ui::Ui, Cli, Commands, ServiceArgs};
use fact_finder::Config;

fn default_filter(verbose: u8) -> &'static str {
    match verbose {
        0 => "error",
        1 => "warn,fact_finder=info",
        _ => "info,fact_finder=debug",
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter(cli.verbose).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::from_env()?;
    let ui = Ui::new(cli.quiet);

    match cli.command {
        Some(Commands::Run(args)) => run::execute(args, config, &ui).await,
        Some(Commands::Interactive(services)) => interactive::execute(services, config, &ui).await,
        None => interactive::execute(ServiceArgs::default(), config, &ui).await,
    }
}
