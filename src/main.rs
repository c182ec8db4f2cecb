//! Audio Tài Lộc API server
//!
//! Reads configuration from TOML (~/.config/audiotailoc/config.toml by
//! default) with environment overrides, migrates the database and serves
//! the REST API until SIGINT/SIGTERM.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use sea_orm_migration::MigratorTrait;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use audiotailoc::application::seed::run_seed;
use audiotailoc::config::LoggingConfig;
use audiotailoc::domain::RepositoryProvider;
use audiotailoc::infrastructure::database::migrator::Migrator;
use audiotailoc::infrastructure::database::repositories::SeaOrmRepositoryProvider;
use audiotailoc::shared::shutdown::ShutdownCoordinator;
use audiotailoc::{
    create_api_router, default_config_path, init_database, AppConfig, AppState, DatabaseConfig,
    LocalFileStorage,
};

#[derive(Debug, Parser)]
#[command(name = "audiotailoc", version, about = "Audio Tài Lộc storefront API server")]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, env = "AUDIOTAILOC_CONFIG")]
    config: Option<PathBuf>,

    /// Override the listen port
    #[arg(short, long)]
    port: Option<u16>,

    /// Override the log filter (e.g. "debug", "audiotailoc=trace")
    #[arg(long)]
    log_level: Option<String>,

    /// Validate configuration and exit
    #[arg(long)]
    check: bool,

    /// Skip database migrations on startup
    #[arg(long)]
    no_migrate: bool,

    /// Load demo catalog and content before serving
    #[arg(long)]
    seed: bool,

    /// Load demo data and exit
    #[arg(long, conflicts_with = "seed")]
    seed_only: bool,
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&logging.level));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if logging.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn install_metrics_recorder() -> Option<PrometheusHandle> {
    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => {
            info!("Prometheus metrics recorder installed");
            Some(handle)
        }
        Err(e) => {
            warn!("Metrics disabled, recorder not installed: {}", e);
            None
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // ── Load configuration ─────────────────────────────────────
    let config_path = cli.config.clone().unwrap_or_else(default_config_path);
    let (mut config, load_error) = match AppConfig::load(&config_path) {
        Ok(cfg) => (cfg, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Some(level) = cli.log_level.clone() {
        config.logging.level = level;
    }

    init_tracing(&config.logging);
    match load_error {
        None => info!("Configuration loaded from {}", config_path.display()),
        Some(e) if cli.check => {
            error!("Failed to load config: {}", e);
            return Err(e.into());
        }
        Some(e) => error!("Failed to load config: {}. Using defaults.", e),
    }

    if let Err(e) = config.validate() {
        error!("{}", e);
        return Err(e.into());
    }
    if cli.check {
        info!("Configuration OK");
        return Ok(());
    }

    info!("Starting Audio Tài Lộc API...");

    // Must be installed before any metrics calls
    let prometheus_handle = install_metrics_recorder();

    // ── Database ───────────────────────────────────────────────
    let db_config = DatabaseConfig::from_app_config(&config);
    info!("Database: {}", db_config.url);
    let db = match init_database(&db_config).await {
        Ok(db) => db,
        Err(e) => {
            error!("Failed to connect to database: {}", e);
            return Err(e.into());
        }
    };

    if cli.no_migrate {
        warn!("Skipping database migrations");
    } else {
        info!("Running database migrations...");
        if let Err(e) = Migrator::up(&db, None).await {
            error!("Failed to run migrations: {}", e);
            return Err(e.into());
        }
        info!("Migrations completed");
    }

    if cli.seed || cli.seed_only {
        let repos: Arc<dyn RepositoryProvider> =
            Arc::new(SeaOrmRepositoryProvider::new(db.clone()));
        let report = run_seed(repos).await?;
        info!(
            languages = report.languages,
            translations = report.translations,
            categories = report.categories,
            products = report.products,
            services = report.services,
            technicians = report.technicians,
            "Seed data loaded"
        );
        if cli.seed_only {
            db.close().await?;
            return Ok(());
        }
    }

    // ── Uploads ────────────────────────────────────────────────
    tokio::fs::create_dir_all(&config.uploads.dir).await?;
    let storage = Arc::new(LocalFileStorage::new(config.uploads.dir.clone()));

    let state = AppState::build(db.clone(), &config, storage, prometheus_handle);

    match state.identity.ensure_admin_accounts().await {
        Ok(0) => {}
        Ok(created) => {
            info!("Created {} admin account(s) from configuration", created);
            warn!("Please change the default admin password immediately!");
        }
        Err(e) => error!("Failed to provision admin accounts: {}", e),
    }

    let router = create_api_router(state, &config);

    // ── Serve ──────────────────────────────────────────────────
    let shutdown = ShutdownCoordinator::new(config.server.shutdown_timeout);
    let shutdown_signal = shutdown.signal();
    shutdown.start_signal_listener();

    let addr = config.server.address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("REST API listening on http://{}", addr);
    info!("Swagger UI available at http://{}/docs/", addr);

    let server = axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(async move {
        shutdown_signal.wait().await;
        info!("REST API received shutdown signal");
    });

    if let Err(e) = server.await {
        error!("REST API server error: {}", e);
    }

    // ── Cleanup ────────────────────────────────────────────────
    shutdown.signal().trigger();
    let finished = shutdown
        .shutdown_with_cleanup(|| async move {
            if let Err(e) = db.close().await {
                warn!("Error closing database connection: {}", e);
            } else {
                info!("Database connection closed");
            }
        })
        .await;
    if !finished {
        warn!("Cleanup did not finish in time");
    }

    info!("Audio Tài Lộc API shutdown complete");
    Ok(())
}
