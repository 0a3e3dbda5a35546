use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use rolodex::api::rest::routes;
use rolodex::cache::{Cache, MemoryCache, NoopCache, RedisCache};
use rolodex::domain::service::{Service, ServiceConfig};
use rolodex::infra::storage::migrations::Migrator;
use runtime::{AppConfig, CacheConfig, CliArgs};

/// Rolodex - contact networking backend
#[derive(Parser)]
#[command(name = "rolodex-server")]
#[command(about = "Rolodex - contact networking backend")]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port for HTTP server (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Print current configuration and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the server
    Run,
    /// Check configuration
    Check,
}

/// Expand a sqlite DSN into an absolute-path DSN using a base directory.
/// Keeps "sqlite::memory:" as-is.
fn absolutize_sqlite_dsn(dsn: &str, base_dir: &Path) -> Result<String> {
    if dsn.eq_ignore_ascii_case("sqlite::memory:") || dsn.eq_ignore_ascii_case("sqlite://:memory:")
    {
        return Ok("sqlite::memory:".to_string());
    }
    let db_path = dsn
        .strip_prefix("sqlite://")
        .ok_or_else(|| anyhow!("DSN must start with sqlite:// (got: {})", dsn))?;

    let (path_str, query) = match db_path.split_once('?') {
        Some((p, q)) => (p, Some(q)),
        None => (db_path, None),
    };

    let mut p = PathBuf::from(path_str);
    if p.as_os_str().is_empty() {
        return Err(anyhow!("Empty SQLite path in DSN"));
    }
    if p.is_relative() {
        p = base_dir.join(p);
    }
    if let Some(dir) = p.parent() {
        std::fs::create_dir_all(dir)?;
    }

    let mut out = String::from("sqlite://");
    out.push_str(&p.to_string_lossy().replace('\\', "/"));
    // sqlx needs this to create the file on first run
    if let Some(q) = query {
        out.push('?');
        out.push_str(q);
    } else {
        out.push_str("?mode=rwc");
    }
    Ok(out)
}

async fn connect_database(config: &AppConfig) -> Result<DatabaseConnection> {
    let db_config = config
        .database
        .as_ref()
        .ok_or_else(|| anyhow!("Database URL not configured"))?;

    let mut dsn = db_config.url.trim().to_string();
    if dsn.is_empty() {
        return Err(anyhow!("Database URL not configured"));
    }
    if dsn.starts_with("sqlite") {
        dsn = absolutize_sqlite_dsn(&dsn, Path::new(&config.server.data_dir))?;
    }

    let mut options = ConnectOptions::new(dsn.clone());
    options
        .max_connections(db_config.max_conns.unwrap_or(10))
        .acquire_timeout(Duration::from_millis(
            db_config.acquire_timeout_ms.unwrap_or(5000),
        ))
        .sqlx_logging(false);

    tracing::info!(%dsn, "connecting to database");
    let db = Database::connect(options)
        .await
        .context("Failed to connect to database")?;

    Migrator::up(&db, None)
        .await
        .context("Failed to run database migrations")?;

    Ok(db)
}

/// Cache backend per config. A Redis that refuses connections at startup
/// degrades to the in-process cache rather than blocking boot.
async fn build_cache(config: Option<&CacheConfig>) -> Result<Arc<dyn Cache>> {
    let Some(cache_config) = config else {
        return Ok(Arc::new(NoopCache));
    };

    match cache_config.backend.as_str() {
        "memory" => Ok(Arc::new(MemoryCache::new())),
        "redis" => {
            let url = cache_config
                .url
                .as_deref()
                .ok_or_else(|| anyhow!("cache.url is required for the redis backend"))?;
            let op_timeout =
                rolodex::cache::op_timeout_from_millis(cache_config.op_timeout_ms);
            match RedisCache::connect(url, op_timeout).await {
                Ok(redis) => {
                    tracing::info!("redis cache connected");
                    Ok(Arc::new(redis))
                }
                Err(err) => {
                    tracing::warn!(error = %err, "redis unavailable, using in-memory cache");
                    Ok(Arc::new(MemoryCache::new()))
                }
            }
        }
        other => Err(anyhow!("Unsupported cache backend: {other}")),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let args = CliArgs {
        config: cli.config.as_ref().map(|p| p.to_string_lossy().to_string()),
        port: cli.port,
        print_config: cli.print_config,
        verbose: cli.verbose,
    };

    let mut config = AppConfig::load_or_default(cli.config.as_deref())?;
    config.apply_cli_overrides(&args);

    let logging_config = config
        .logging
        .clone()
        .unwrap_or_else(runtime::config::default_logging_config);
    runtime::logging::init_logging_from_config(&logging_config, Path::new(&config.server.data_dir));
    tracing::info!("Rolodex server starting");

    if cli.print_config {
        println!("{}", config.to_yaml()?);
        return Ok(());
    }

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_server(config).await,
        Commands::Check => check_config(config),
    }
}

async fn run_server(config: AppConfig) -> Result<()> {
    let db = connect_database(&config).await?;
    let cache = build_cache(config.cache.as_ref()).await?;

    let service = Arc::new(Service::with_cache(
        db,
        cache,
        ServiceConfig {
            jwt_secret: config.auth.jwt_secret.clone(),
            token_ttl_days: config.auth.token_ttl_days,
            public_url: config.server.public_url.clone(),
        },
    ));

    let mut app = routes::router(service)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());
    if config.server.timeout_sec > 0 {
        app = app.layer(TimeoutLayer::new(Duration::from_secs(
            config.server.timeout_sec,
        )));
    }

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!(%addr, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Rolodex server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => tracing::warn!(error = %err, "failed to install SIGTERM handler"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("shutdown signal received");
}

fn check_config(config: AppConfig) -> Result<()> {
    println!("Configuration check passed");
    println!("{}", config.to_yaml()?);
    Ok(())
}
