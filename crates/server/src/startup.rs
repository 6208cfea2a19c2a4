use std::sync::Arc;

use axum::Router;
use configs::{AppConfig, ServerConfig};
use migration::MigratorTrait;
use service::events::{repo::SeaOrmEventStore, EventStore};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::routes;
use crate::state::ServerState;

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Connect the database, apply migrations when enabled, and wire the store.
async fn build_state(cfg: &AppConfig) -> anyhow::Result<ServerState> {
    let db = models::db::connect_with_config(&cfg.database).await?;
    if cfg.database.run_migrations {
        migration::Migrator::up(&db, None).await?;
        info!("database migrations applied");
    }
    let store: Arc<dyn EventStore> = Arc::new(SeaOrmEventStore { db });
    Ok(ServerState::new(store))
}

/// Bind `host:port`; the host may be a name such as `localhost`.
async fn bind_listener(server: &ServerConfig) -> anyhow::Result<TcpListener> {
    let listener = TcpListener::bind(server.bind_addr()).await?;
    info!(addr = %listener.local_addr()?, "listening");
    Ok(listener)
}

/// Public entry: build the app and run the HTTP server
pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    let state = build_state(&cfg).await?;

    let app: Router = routes::build_router(state, build_cors());

    info!(addr = %cfg.server.bind_addr(), "starting events api");
    let listener = bind_listener(&cfg.server).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
