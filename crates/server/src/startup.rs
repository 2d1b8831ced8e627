use std::future::Future;

use axum::Router;
use configs::AppConfig;
use migration::MigratorTrait;
use sea_orm::DatabaseConnection;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::routes::{self, ServerState};

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Open the pool, verify it answers and bring the schema up to date.
pub async fn prepare_database(cfg: &configs::DatabaseConfig) -> anyhow::Result<DatabaseConnection> {
    let db = models::db::connect_with_config(cfg).await?;
    db.ping().await?;
    info!("database connected");
    if cfg.run_migrations {
        migration::Migrator::up(&db, None).await?;
        info!("migrations applied");
    }
    Ok(db)
}

pub fn build_app(db: DatabaseConnection) -> Router {
    routes::build_router(ServerState { db }, build_cors())
}

/// Serve on an already bound listener until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, app: Router, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}

async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "cannot listen for Ctrl+C; running until killed");
        std::future::pending::<()>().await;
    }
    info!("received Ctrl+C, shutting down");
}

/// Public entry: build the app and run the HTTP server
pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    let db = prepare_database(&cfg.database).await?;
    let app = build_app(db);

    let addr = cfg.server.bind_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!(addr = %listener.local_addr()?, "starting user service");
    serve(listener, app, ctrl_c()).await
}
