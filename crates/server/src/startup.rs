use std::{net::SocketAddr, sync::Arc};

use axum::Router;
use common::utils::logging::init_logging_from_env;
use configs::AppConfig;
use dotenvy::dotenv;
use migration::MigratorTrait;
use sea_orm::DatabaseConnection;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::errors::StartupError;
use crate::routes::{self, AppState};
use service::{
    notification::FcmDispatcher,
    promotion::{PromotionService, SeaOrmPromotionRepository},
    runtime,
    upload::LocalFileUploadService,
};

/// Initialize logging via shared common utils; `LOG_FORMAT=json` switches to JSON lines.
fn init_logging() {
    init_logging_from_env();
}

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

fn bind_addr(cfg: &AppConfig) -> anyhow::Result<SocketAddr> {
    Ok(format!("{}:{}", cfg.server.host, cfg.server.port).parse()?)
}

/// Wire the promotion service against Postgres, FCM and local upload storage.
pub fn build_state(cfg: &AppConfig, db: DatabaseConnection) -> Result<AppState, StartupError> {
    let dispatcher = FcmDispatcher::from_config(&cfg.notification)
        .map_err(|e| StartupError::InvalidConfig(e.to_string()))?;
    if !dispatcher.is_enabled() {
        warn!("notification.fcm_server_key not set; promotion notifications will fail with 502");
    }
    let uploads = LocalFileUploadService::new(&cfg.uploads.dir);
    info!(upload_root = %uploads.root().display(), endpoint = %cfg.notification.fcm_endpoint, "promotion service wiring");

    let promotions = PromotionService::new(
        Arc::new(SeaOrmPromotionRepository { db }),
        Arc::new(dispatcher),
        Arc::new(uploads),
    )
    .with_page_size(cfg.pagination.page_size);
    Ok(AppState { promotions: Arc::new(promotions) })
}

/// Public entry: build the app and run the HTTP server
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();
    init_logging();

    let cfg = AppConfig::load_or_default().map_err(|e| StartupError::InvalidConfig(e.to_string()))?;

    runtime::ensure_env(&cfg.uploads.dir)
        .await
        .map_err(|e| StartupError::Runtime(e.to_string()))?;

    // DB connection + schema
    let db = models::db::connect_with_config(&cfg.database).await?;
    migration::Migrator::up(&db, None).await?;

    let state = build_state(&cfg, db)?;
    let app: Router = routes::build_router(state, build_cors());

    let addr = bind_addr(&cfg)?;
    info!(%addr, "starting promotion server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
