use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use gh_steward::cli::{commands, Cli, Commands};
use gh_steward::config::StewardConfig;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    StewardConfig::load_env_file();
    let mut conf = StewardConfig::load(cli.config.as_deref())?;
    conf.apply_overrides(cli.owner, cli.repo, cli.token);

    let runtime = tokio::runtime::Runtime::new()?;
    match cli.command {
        Commands::Labels { file, apply } => {
            runtime.block_on(commands::labels::run(&conf, &file, apply))
        }
        Commands::Issues { except, priority } => {
            runtime.block_on(commands::issues::run(&conf, except, priority))
        }
    }
}
