mod config;

use std::net::SocketAddr;
use std::sync::Arc;

use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use spark_api::{AppState, AppStateInner};
use spark_core::scheduler::run_reset_loop;
use spark_core::{Core, SystemClock};

use crate::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "spark_server=debug,spark_api=debug,spark_core=debug,spark_db=info,tower_http=debug".into()
            }),
        )
        .init();

    let config = Config::from_env()?;

    // Init database
    let db = spark_db::Database::open(&config.db_path)?;
    let core = Arc::new(Core::new(db, Arc::new(SystemClock), config.policy.clone()));

    info!(
        "Quota: {} swipes/day, duplicate scope {:?}, reset scope {:?}, day boundary {}",
        config.policy.daily_swipe_limit,
        config.policy.duplicate_scope,
        config.policy.reset_scope,
        config.policy.timezone
    );

    // Background quota reset at every local midnight
    tokio::spawn(run_reset_loop(core.clone()));

    let state: AppState = Arc::new(AppStateInner {
        core,
        jwt_secret: config.jwt_secret,
    });

    let app = spark_api::router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!("Spark server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();
    #[cfg(unix)]
    {
        let mut sigterm =
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
                .expect("failed to install SIGTERM handler");
        tokio::select! {
            _ = ctrl_c => info!("Received Ctrl+C, shutting down..."),
            _ = sigterm.recv() => info!("Received SIGTERM, shutting down..."),
        }
    }
    #[cfg(not(unix))]
    {
        ctrl_c.await.ok();
        info!("Received Ctrl+C, shutting down...");
    }
}
