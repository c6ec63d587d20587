use std::{net::SocketAddr, sync::Arc};

use axum::Router;
use common::utils::logging::init_logging_default;
use dotenvy::dotenv;
use migration::MigratorTrait;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::routes::{self, ServerState};
use service::{
    db::restaurant_service::DbRestaurantRepository,
    file::snapshot::FileRestaurantRepository,
    menu_service::MenuService,
    seed,
};

/// Initialize logging via shared common utils
fn init_logging() {
    init_logging_default();
}

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Public entry: build the app and run the HTTP server
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();
    init_logging();

    let cfg = configs::AppConfig::load_and_validate()?;
    common::env::ensure_env("data").await?;

    // Embedded database: connect, migrate, seed once.
    let db = models::db::connect_with_config(&cfg.database).await?;
    migration::Migrator::up(&db, None).await?;
    seed::seed_database(&db, &cfg.datasource.seed_file).await?;

    // Permanent read-only snapshot for the file adapter; degrades to an
    // empty set when unreadable.
    let file_repo = FileRestaurantRepository::load(cfg.datasource.snapshot_file.clone()).await;

    let menu = MenuService::new(cfg.datasource.strategy, DbRestaurantRepository { db }, file_repo);
    let state = ServerState { menu: Arc::new(menu) };

    // Build router
    let app: Router = routes::build_router(state, build_cors());

    // Bind and serve
    let addr: SocketAddr = format!("{}:{}", cfg.server.host, cfg.server.port).parse()?;
    info!(%addr, strategy = ?cfg.datasource.strategy, "starting menu api server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
