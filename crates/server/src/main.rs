mod stats;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use barista_core::{
    validate_config, Acceptor, BrewPool, Brewer, CafeState, Config, KettleBrewer, Scheduler,
    SessionRegistry,
};

use stats::spawn_stats_ticker;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine config path
    let config_path = std::env::var("BARISTA_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.toml"));

    // Load configuration; a missing file means defaults.
    let config = if config_path.exists() {
        info!("Loading configuration from {:?}", config_path);
        barista_core::load_config(&config_path)
            .with_context(|| format!("Failed to load config from {:?}", config_path))?
    } else {
        info!("No config file at {:?}, using defaults", config_path);
        Config::default()
    };

    validate_config(&config).context("Configuration validation failed")?;
    info!("Configuration loaded successfully");

    // Shared cafe state and session registry
    let state = Arc::new(CafeState::new(&config.cafe));
    let registry = Arc::new(SessionRegistry::new());

    // Brew worker pool and scheduler
    let brewer: Arc<dyn Brewer> = Arc::new(KettleBrewer::from_config(&config.cafe));
    let pool = Arc::new(BrewPool::new(
        Arc::clone(&state),
        Arc::clone(&registry),
        brewer,
        config.cafe.brew_workers,
    ));
    let scheduler = Scheduler::new(Arc::clone(&state), Arc::clone(&pool), &config.cafe);
    scheduler.start();

    // Periodic cafe status line
    let _stats = spawn_stats_ticker(Arc::clone(&state), config.cafe.stats_interval_secs);

    // Accept customers
    let acceptor = Acceptor::new(Arc::clone(&state), Arc::clone(&registry), &config.cafe);
    let addr = SocketAddr::new(config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    tokio::select! {
        result = acceptor.run(listener) => {
            result.context("Server error")?;
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received, closing the cafe");
        }
    }

    // Drain: stop dispatching, abandon in-flight brews.
    scheduler.stop();
    pool.close();

    Ok(())
}
