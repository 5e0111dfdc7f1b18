use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use solar_core::config::{get_default_config_file, AppConfig};
use solar_core::{ElevenLabsClient, GeminiClient};
use solar_energy::Service;
use solar_server::http_server::{self, AppState};
use solar_server::users::{InMemoryUserStore, PostgresUserStore, UserService, UserStoreRef};
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const APP_NAME: &str = "solar-suite";

#[derive(Parser, Debug)]
#[command(
    name = "solar-daemon",
    about = "HTTP daemon for solar panel estimation",
    version
)]
struct Args {
    /// Path to config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Gemini API key
    #[arg(short = 'k', long)]
    api_key: Option<String>,

    /// Gemini model to use
    #[arg(short = 'o', long)]
    model: Option<String>,

    /// HTTP server address
    #[arg(long)]
    http_addr: Option<SocketAddr>,

    /// Postgres connection string
    #[arg(long)]
    database_url: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "SOLAR_LOG_LEVEL", default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize tracing (logging)
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level)))
        .init();

    info!("Starting solar daemon");

    let config = load_config(&args)?;

    // Initialize provider clients
    let gemini_client = GeminiClient::new(config.gemini.clone()).map_err(|e| {
        error!(error = %e, "Failed to initialize Gemini client");
        anyhow!("Failed to initialize Gemini client: {}", e)
    })?;
    info!(model = gemini_client.model_name(), "Initialized Gemini client");

    let speech_client = ElevenLabsClient::new(config.speech.clone()).map_err(|e| {
        error!(error = %e, "Failed to initialize ElevenLabs client");
        anyhow!("Failed to initialize ElevenLabs client: {}", e)
    })?;

    let store = open_user_store(config.database.url.as_deref()).await?;

    let state = AppState {
        energy: Service::new(Arc::new(gemini_client), Arc::new(speech_client)),
        users: UserService::new(store),
    };

    http_server::run_server(state, config.server.http_addr).await?;

    info!("Solar daemon shutting down");
    Ok(())
}

/// Defaults, then the config file, then `.env` and the environment, then CLI flags
fn load_config(args: &Args) -> Result<AppConfig> {
    let path = match &args.config {
        Some(path) => path.clone(),
        None => get_default_config_file(APP_NAME).context("Could not locate config file")?,
    };

    let mut config = AppConfig::load_from_file(&path)
        .with_context(|| format!("Failed to load configuration from {}", path.display()))?
        .with_env()
        .context("Invalid environment configuration")?;
    info!("Loaded configuration from {}", path.display());

    if let Some(api_key) = &args.api_key {
        config.gemini.api_key = Some(api_key.clone());
    }
    if let Some(model) = &args.model {
        config.gemini.model_name = model.clone();
    }
    if let Some(addr) = args.http_addr {
        config.server.http_addr = addr;
    }
    if let Some(url) = &args.database_url {
        config.database.url = Some(url.clone());
    }

    Ok(config)
}

async fn open_user_store(database_url: Option<&str>) -> Result<UserStoreRef> {
    match database_url {
        Some(url) => {
            let store = PostgresUserStore::connect(url)
                .await
                .context("Unable to connect to database")?;
            store
                .ensure_schema()
                .await
                .context("Failed to prepare users table")?;
            Ok(Arc::new(store))
        }
        None => {
            warn!("No database URL configured, users are kept in memory");
            Ok(Arc::new(InMemoryUserStore::new()))
        }
    }
}
