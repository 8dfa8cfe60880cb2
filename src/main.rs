use std::path::PathBuf;

use clap::Parser;

use form_relay::config::{read_config, validate_config, ConfigError, RelayConfig};
use form_relay::lifecycle::startup;
use form_relay::observability::logging;

#[derive(Parser)]
#[command(name = "form-relay")]
#[command(about = "Origin-gated relay for website form submissions", long_about = None)]
struct Args {
    /// TOML configuration file; built-in defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Upstream automation backend URL, overriding the configured one.
    #[arg(long, env = "RELAY_UPSTREAM_URL")]
    upstream_url: Option<String>,

    /// Bind address, overriding the configured one.
    #[arg(long)]
    bind: Option<String>,
}

fn resolve_config(args: &Args) -> Result<RelayConfig, ConfigError> {
    let mut config = match &args.config {
        Some(path) => read_config(path)?,
        None => RelayConfig::default(),
    };

    if let Some(url) = &args.upstream_url {
        config.upstream.url = url.clone();
    }
    if let Some(bind) = &args.bind {
        config.listener.bind_address = bind.clone();
    }

    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = resolve_config(&args)?;

    logging::init(&config.observability.log_level);
    tracing::info!("form-relay v{} starting", env!("CARGO_PKG_VERSION"));

    startup::run(config).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
