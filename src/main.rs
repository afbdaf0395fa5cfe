use anyhow::Context;
use apds::{cli::config_path_from_args, config::Config, logging::init_tracing, server};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config_path = config_path_from_args()?;
    let config = Config::load(&config_path)
        .with_context(|| format!("failed to load config from {}", config_path.display()))?;

    let _logging_guard = init_tracing(&config.logging).context("failed to initialize logging")?;

    server::run(config).await
}
