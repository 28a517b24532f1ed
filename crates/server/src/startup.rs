use std::{net::SocketAddr, sync::Arc};

use axum::Router;
use dotenvy::dotenv;
use migration::{Migrator, MigratorTrait};
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use common::utils::logging::{init_logging_default, init_logging_json};
use configs::{AppConfig, CloudinaryConfig, LogFormat};
use service::image::host::{CloudinaryHost, ImageHost, NoopImageHost};

use crate::errors::StartupError;
use crate::routes::{self, auth::{Repositories, ServerState}};

fn init_logging(format: &LogFormat) {
    match format {
        LogFormat::Compact => init_logging_default(),
        LogFormat::Json => init_logging_json(),
    }
}

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Cloudinary when credentials are present, otherwise a host that only logs.
fn build_image_host(cfg: &CloudinaryConfig) -> Result<Arc<dyn ImageHost>, StartupError> {
    if !cfg.is_configured() {
        warn!("cloudinary credentials missing; image deletions are skipped");
        return Ok(Arc::new(NoopImageHost));
    }
    let host = CloudinaryHost::new(&cfg.cloud_name, &cfg.api_key, &cfg.api_secret)
        .map_err(|e| StartupError::ImageHost(e.to_string()))?;
    Ok(Arc::new(host))
}

fn bind_addr(cfg: &AppConfig) -> Result<SocketAddr, StartupError> {
    format!("{}:{}", cfg.server.host, cfg.server.port)
        .parse()
        .map_err(|e| StartupError::InvalidConfig(format!("server address: {e}")))
}

/// Public entry: build the app and run the HTTP server
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();
    let cfg = AppConfig::load_and_validate()?;
    init_logging(&cfg.logging.format);

    let db = models::db::connect_with_config(&cfg.database).await?;
    if cfg.database.auto_migrate {
        Migrator::up(&db, None).await?;
        info!("migrations applied");
    }

    let host = build_image_host(&cfg.cloudinary)?;
    let state = ServerState::new(
        Repositories::seaorm(db),
        host,
        &cfg.jwt,
        cfg.cloudinary.default_public_id.clone(),
    );
    let app: Router = routes::build_router(state, build_cors());

    let addr = bind_addr(&cfg)?;
    info!(%addr, "starting volta pets api");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
