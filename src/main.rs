//! # Bill Search Server Main Driver
//!
//! ## Purpose
//! Main entry point for the bill search service. Loads configuration, reads
//! the base bill document, initializes components, and starts the web server.
//!
//! ## Architecture Flow
//! 1. Parse command line arguments and load configuration
//! 2. Initialize logging and tracing
//! 3. Load the base document from disk
//! 4. Initialize search, context selection, and answer-generation components
//! 5. Start web API server
//! 6. Handle shutdown signals gracefully

use clap::{Arg, Command};
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};

use bill_context_search::{
    api::ApiServer,
    config::Config,
    context::ContextSelector,
    document::DocumentStore,
    errors::{BillSearchError, Result},
    llm::AnswerClient,
    search::KeywordSearch,
    AppState,
};

#[tokio::main]
async fn main() -> Result<()> {
    let matches = Command::new("bill-search-server")
        .version(env!("CARGO_PKG_VERSION"))
        .author("Legislative Search Team")
        .about("Interactive legislative bill search with keyword context windows and LLM-backed question answering")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file path")
                .default_value("config.toml"),
        )
        .arg(
            Arg::new("port")
                .short('p')
                .long("port")
                .value_name("PORT")
                .help("Server port")
                .value_parser(clap::value_parser!(u16)),
        )
        .arg(
            Arg::new("document")
                .short('d')
                .long("document")
                .value_name("FILE")
                .help("Base bill document path"),
        )
        .arg(
            Arg::new("check-health")
                .long("check-health")
                .help("Validate configuration and base document, then exit")
                .action(clap::ArgAction::SetTrue),
        )
        .get_matches();

    // Load configuration
    let config_path = matches.get_one::<String>("config").unwrap();
    let mut config = Config::from_file(config_path)?;

    if let Some(port) = matches.get_one::<u16>("port") {
        config.server.port = *port;
    }
    if let Some(document) = matches.get_one::<String>("document") {
        config.document.base_path = document.into();
    }

    let config = Arc::new(config);

    init_logging(&config)?;

    info!("Starting bill search service v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration loaded from: {}", config_path);

    if matches.get_flag("check-health") {
        return run_health_checks(&config);
    }

    let app_state = initialize_components(config.clone())?;

    let server = ApiServer::new(app_state);
    let server_handle = tokio::spawn(async move {
        if let Err(e) = server.run().await {
            error!("Server error: {}", e);
        }
    });

    info!(
        "Bill search service started on {}:{}",
        config.server.host, config.server.port
    );

    tokio::select! {
        _ = signal::ctrl_c() => {
            info!("Received SIGINT, shutting down gracefully...");
        }
        _ = server_handle => {
            warn!("Server stopped unexpectedly");
        }
    }

    info!("Bill search service shut down");
    Ok(())
}

/// Initialize logging and tracing
fn init_logging(config: &Config) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    if config.logging.json_format {
        builder.json().init();
    } else {
        builder.init();
    }

    info!("Logging initialized with level: {}", config.logging.level);
    Ok(())
}

/// Initialize all application components
fn initialize_components(config: Arc<Config>) -> Result<AppState> {
    info!("Initializing application components...");

    // A missing or unreadable base document is reported but not fatal: the
    // service starts with an empty document the user can augment.
    let store = match DocumentStore::from_base_file(&config.document) {
        Ok(store) => store,
        Err(e) => {
            warn!("Base document unavailable ({}); starting with empty document", e);
            DocumentStore::empty()
        }
    };

    let searcher = KeywordSearch::new(config.search.clone());
    let selector = ContextSelector::new(config.context.clone());
    let answerer = AnswerClient::new(config.llm.clone())?;

    if config.llm.api_key.is_none() {
        warn!("No LLM API key configured; /ask requests will likely fail authentication");
    }

    info!("All components initialized successfully");

    Ok(AppState {
        config,
        store: Arc::new(tokio::sync::RwLock::new(store)),
        searcher: Arc::new(searcher),
        selector: Arc::new(selector),
        answerer: Arc::new(answerer),
    })
}

/// Run health checks and exit
fn run_health_checks(config: &Config) -> Result<()> {
    info!("Running health checks...");

    if !config.document.base_path.exists() {
        return Err(BillSearchError::DocumentLoadFailed {
            path: config.document.base_path.to_string_lossy().to_string(),
            details: "File not found".to_string(),
        });
    }
    info!("✓ Base document exists");

    if config.llm.api_key.is_none() {
        warn!("LLM API key not configured");
    } else {
        info!("✓ LLM API key configured");
    }

    info!("All health checks passed!");
    Ok(())
}
