use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

use utcp_discovery::config::{ConfigValidator, LogFormat};
use utcp_discovery::providers::{load_providers, register_builtin_factories, ProviderRegistry};
use utcp_discovery::startup::StartupLogger;
use utcp_discovery::web::run_server;
use utcp_discovery::Config;

#[derive(Parser)]
#[command(name = env!("CARGO_PKG_NAME"))]
#[command(about = env!("CARGO_PKG_DESCRIPTION"))]
#[command(version)]
struct Cli {
    /// Configuration file path (defaults to UTCP_CONFIG_PATH, then ./config.yaml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long)]
    log_level: Option<String>,

    /// Server host
    #[arg(long)]
    host: Option<String>,

    /// Server port
    #[arg(long)]
    port: Option<u16>,

    /// Validate the configuration and exit
    #[arg(long)]
    validate_only: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut resolution = match Config::load(cli.config.as_deref()) {
        Ok(resolution) => resolution,
        Err(e) => {
            init_logging(cli.log_level.as_deref().unwrap_or("info"), LogFormat::Text)?;
            error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    // CLI flags win over environment and file
    let server = &mut resolution.config.server;
    if let Some(host) = cli.host {
        server.host = host;
    }
    if let Some(port) = cli.port {
        server.port = port.to_string();
    }
    if let Some(log_level) = cli.log_level {
        server.log_level = log_level;
    }

    init_logging(&server.log_level, server.log_format)?;

    StartupLogger::display_startup_info(&resolution, utcp_discovery::VERSION);

    let config = resolution.config;
    StartupLogger::display_validation_results(&ConfigValidator::validate(&config));

    if let Err(e) = config.validate().and_then(|_| config.server.bind_address()) {
        error!("Invalid configuration: {}", e);
        return Err(e.into());
    }

    if cli.validate_only {
        info!("Configuration is valid");
        return Ok(());
    }

    let registry = Arc::new(ProviderRegistry::new());
    register_builtin_factories(&registry)?;

    let summary = load_providers(&registry, &config);
    StartupLogger::display_provider_status(&summary, &registry);
    StartupLogger::display_endpoints(&config.server.host, &config.server.port);

    run_server(&config, registry).await.map_err(|e| {
        error!("Server error: {}", e);
        e
    })?;

    Ok(())
}

fn init_logging(level: &str, format: LogFormat) -> Result<()> {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let registry = tracing_subscriber::registry().with(env_filter);

    match format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init(),
        LogFormat::Text => registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .try_init(),
    }
    .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}
