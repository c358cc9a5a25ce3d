use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;

use whitecross_dashboard::api::{start_server, ApiContext};
use whitecross_dashboard::config::{self, AppConfig};
use whitecross_dashboard::dashboard::{DashboardService, SqliteDashboardStore};
use whitecross_dashboard::db::{prune_audit_log, Database};

#[derive(Parser, Debug)]
#[command(name = "whitecross-dashboard")]
#[command(about = "School-health dashboard API server")]
struct Args {
    /// Path to a TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Address to listen on, overrides server.bind_addr
    #[arg(short, long)]
    bind: Option<SocketAddr>,

    /// SQLite database file, overrides database.path
    #[arg(short, long)]
    database: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = AppConfig::load(args.config.as_deref())?;
    if let Some(path) = args.database {
        config.database.path = path;
    }

    whitecross_dashboard::init_tracing(config.log_filter());
    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let bind_addr = match args.bind {
        Some(addr) => addr,
        None => config
            .server
            .bind_addr
            .parse()
            .with_context(|| format!("invalid server.bind_addr '{}'", config.server.bind_addr))?,
    };

    let db = Database::open(&config.database.path)
        .with_context(|| format!("cannot open database {}", config.database.path.display()))?;
    tracing::info!(path = %db.path().display(), "Database ready");

    let pruned = prune_audit_log(&db.connect()?, config.audit.retention_days)?;
    if pruned > 0 {
        tracing::info!(pruned, retention_days = config.audit.retention_days, "Pruned audit log");
    }

    let dashboard = Arc::new(DashboardService::new(
        Arc::new(SqliteDashboardStore::new(db.clone())),
        Duration::from_secs(config.dashboard.cache_ttl_secs),
    ));
    let ctx = ApiContext::new(dashboard, db, &config);
    if !ctx.auth_enabled() {
        tracing::warn!("No API tokens configured, authentication is disabled");
    }

    let server = start_server(ctx, bind_addr).await?;
    tracing::info!(addr = %server.session.server_addr, "Listening");

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for Ctrl-C")?;
    tracing::info!("Shutdown requested");
    server.stop().await;

    Ok(())
}
