//! Nexus Console
//!
//! Operator console for the role-gated business dashboard.

use clap::Parser;
use nexus_console::{
    config::{AppConfig, LogFormat, load_config},
    console::{Console, HELP, Shell},
    session::{
        InMemoryBackend, ProfileStore, RestBackend, SessionProvider, SessionResolver,
        SharedProfileStore, SharedSessionProvider,
    },
    util::SecretString,
};
use std::sync::Arc;
use tokio::io::{AsyncWriteExt, BufReader};
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Nexus Console - role-gated operator console
#[derive(Parser, Debug)]
#[command(name = "nexus-console")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, env = "NEXUS_CONSOLE_CONFIG")]
    config: Option<String>,

    /// Log level (trace, debug, info, warn, error); overrides logging.level
    #[arg(long, env = "NEXUS_CONSOLE_LOG_LEVEL")]
    log_level: Option<String>,

    /// Use the built-in demo users instead of the hosted backend
    #[arg(long, env = "NEXUS_CONSOLE_OFFLINE")]
    offline: bool,

    /// Resume a session from an existing access token
    #[arg(long, env = "NEXUS_CONSOLE_ACCESS_TOKEN", hide_env_values = true)]
    access_token: Option<String>,
}

fn init_logging(level: &str, format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init(),
        LogFormat::Pretty => registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .init(),
    }
}

fn shared<B>(backend: B) -> (SharedSessionProvider, SharedProfileStore)
where
    B: SessionProvider + ProfileStore + 'static,
{
    let backend = Arc::new(backend);
    (backend.clone(), backend)
}

fn create_backend(
    config: &AppConfig,
    offline: bool,
) -> anyhow::Result<(SharedSessionProvider, SharedProfileStore)> {
    if offline {
        info!("Offline mode: using demo users");
        return Ok(shared(InMemoryBackend::demo()));
    }

    config.backend.require_connection()?;
    let backend = RestBackend::new(&config.backend)?;
    info!(url = %config.backend.url, "Using hosted backend");
    Ok(shared(backend))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Local .env is optional
    dotenvy::dotenv().ok();

    // Load configuration before logging so logging.* settings apply
    let config = load_config(args.config.as_deref())?;

    let level = args
        .log_level
        .clone()
        .unwrap_or_else(|| config.logging.level.clone());
    init_logging(&level, config.logging.format);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "Starting Nexus Console"
    );

    let (provider, profiles) = create_backend(&config, args.offline)
        .inspect_err(|e| error!(error = %e, "Failed to create backend"))?;

    let console = Console::from_config(&config)
        .inspect_err(|e| error!(error = %e, "Failed to build console state"))?;

    if let Some(token) = args.access_token
        && let Err(e) = provider.sign_in_with_token(SecretString::new(token)).await
    {
        warn!(error = %e, "Stored access token rejected");
    }

    let mut stdout = tokio::io::stdout();
    stdout.write_all(format!("{}\n\n", HELP).as_bytes()).await?;

    let shell = Shell::new(console, provider, SessionResolver::new(profiles), stdout)
        .with_prompt(config.console.prompt.clone());
    shell.run(BufReader::new(tokio::io::stdin())).await?;

    Ok(())
}
