//! Backend entry-point: loads settings, opens the pool, and serves the
//! user record API until a termination signal drains it.

mod server;

use actix_web::dev::ServerHandle;
use actix_web::web;
use clap::Parser;
use color_eyre::eyre::WrapErr;
#[cfg(feature = "metrics")]
use color_eyre::eyre::eyre;
use tracing::{info, warn};

use server::{ServerConfig, create_server};
use users_backend::inbound::http::health::HealthState;
use users_backend::logging::init_logging;
use users_backend::outbound::persistence::DbPool;
use users_backend::settings::AppConfig;
use users_backend::version::VersionInfo;

/// Command-line flags. Everything else is configured through the environment.
#[derive(Debug, Parser)]
#[command(name = "users-backend", about = "User record REST service")]
struct Cli {
    /// Print version, build, and tag identifiers as JSON and exit.
    #[arg(short = 'v', long = "version-info")]
    version_info: bool,
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    if cli.version_info {
        println!("{}", serde_json::to_string(&VersionInfo::current())?);
        return Ok(());
    }

    let config = AppConfig::load()?;
    init_logging(config.http.log_path())?;

    let version = VersionInfo::current();
    info!(
        version = version.version,
        build = version.build,
        git_tag = version.git_tag,
        "starting users backend"
    );

    let pool = DbPool::new(config.database.pool_config())
        .await
        .wrap_err("failed to create database pool")?;

    let server_config = ServerConfig::new(config.http.bind_addr(), pool, config.resource.routes())
        .with_missing_policy(config.resource.missing_record_policy())
        .with_timeouts(config.http.read_timeout(), config.http.shutdown_timeout());

    #[cfg(feature = "metrics")]
    let server_config = server_config.with_metrics(Some(
        server::build_metrics().map_err(|err| eyre!("configure Prometheus metrics: {err}"))?,
    ));

    let health_state = web::Data::new(HealthState::new());
    let bind_addr = config.http.bind_addr();
    let server = create_server(health_state.clone(), server_config)
        .wrap_err_with(|| format!("failed to bind {bind_addr}"))?;
    info!(%bind_addr, "listening");

    tokio::spawn(drain_on_signal(server.handle(), health_state));
    server.await?;
    info!("server stopped");
    Ok(())
}

/// Wait for SIGINT or SIGTERM, fail the probes, then stop gracefully.
async fn drain_on_signal(handle: ServerHandle, health_state: web::Data<HealthState>) {
    if let Err(err) = wait_for_signal().await {
        warn!(error = %err, "signal listener failed; stopping");
    }
    info!("shutdown signal received");
    health_state.mark_unhealthy();
    handle.stop(true).await;
}

#[cfg(unix)]
async fn wait_for_signal() -> std::io::Result<()> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut terminate = signal(SignalKind::terminate())?;
    tokio::select! {
        res = tokio::signal::ctrl_c() => res,
        _ = terminate.recv() => Ok(()),
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() -> std::io::Result<()> {
    tokio::signal::ctrl_c().await
}
