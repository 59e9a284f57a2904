use std::{net::SocketAddr, sync::Arc, time::Duration};

use axum::Router;
use common::{crypto::KeyRing, utils::logging::init_logging_default};
use dotenvy::dotenv;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::auth::{ServerAuthConfig, ServerState};
use crate::errors::StartupError;
use crate::routes;

fn init_logging() {
    init_logging_default();
}

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

async fn connect_db(cfg: &configs::DatabaseConfig) -> anyhow::Result<DatabaseConnection> {
    let mut opts = ConnectOptions::new(cfg.url.clone());
    opts.max_connections(cfg.max_connections)
        .min_connections(cfg.min_connections)
        .connect_timeout(Duration::from_secs(cfg.connect_timeout_secs))
        .sqlx_logging(cfg.sqlx_logging);
    Ok(Database::connect(opts).await?)
}

fn build_keyring(cfg: &configs::EncryptionConfig) -> Result<Arc<KeyRing>, StartupError> {
    if cfg.fernet_keys.is_empty() {
        return Err(StartupError::InvalidConfig(
            "no encryption keys configured; set FERNET_KEYS (comma-separated, newest first)"
                .into(),
        ));
    }
    let ring = KeyRing::from_keys(&cfg.fernet_keys)
        .map_err(|e| StartupError::InvalidConfig(e.to_string()))?;
    Ok(Arc::new(ring))
}

/// Public entry: build the app and run the HTTP server
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();
    init_logging();

    let cfg = configs::AppConfig::load_and_validate()?;
    let keys = build_keyring(&cfg.encryption)?;
    let db = connect_db(&cfg.database).await?;

    let state = ServerState {
        db,
        auth: ServerAuthConfig {
            jwt_secret: cfg.auth.jwt_secret.clone(),
            token_ttl_hours: cfg.auth.token_ttl_hours,
        },
        keys,
    };

    let app: Router = routes::build_router(build_cors(), state);

    let addr: SocketAddr = format!("{}:{}", cfg.server.host, cfg.server.port).parse()?;
    info!(%addr, "starting server crate");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
