use anyhow::Result;
use market_catalog::{
    config, db,
    routes::routes::routes,
    services::{
        product_service::ProductService,
        session_service::{MemorySessionStore, SessionStore, SqliteSessionStore},
    },
    state::AppState,
};
use std::{io::ErrorKind, sync::Arc};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // RUST_LOG drives the filter; unset means errors only.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let (cfg, migrate) = config::AppConfig::from_env_and_args()?;

    tracing::info!("Starting market-catalog with config: {:?}", cfg);

    // Connects on first use, so a dead database does not block startup.
    let pool = Arc::new(db::connect_lazy(&cfg.database_url, cfg.max_connections)?);

    if migrate {
        db::run_migrations(&pool).await?;
        tracing::info!("Database migration complete.");
        return Ok(());
    }

    let sessions: Arc<dyn SessionStore> = match db::probe(&pool).await {
        Ok(()) => Arc::new(SqliteSessionStore::new(pool.clone())),
        Err(err) => {
            tracing::warn!(
                "Database unreachable at startup ({}). Sessions fall back to memory; catalog requests will fail until it recovers",
                err
            );
            Arc::new(MemorySessionStore::new())
        }
    };

    let state = AppState::new(
        ProductService::new(pool.clone()),
        sessions,
        cfg.session_cookie.clone(),
    );
    let app = routes(state);

    // Unprivileged sandboxes may refuse a wildcard bind; retry on loopback.
    let addr = cfg.addr();
    let listener = match TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(err)
            if err.kind() == ErrorKind::PermissionDenied
                && matches!(cfg.host.as_str(), "0.0.0.0" | "::") =>
        {
            let fallback_addr = format!("127.0.0.1:{}", cfg.port);
            tracing::warn!(
                "Permission denied binding to {} ({}). Falling back to {}",
                addr,
                err,
                fallback_addr
            );
            TcpListener::bind(&fallback_addr).await?
        }
        Err(err) => return Err(err.into()),
    };

    tracing::info!("market-catalog listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
