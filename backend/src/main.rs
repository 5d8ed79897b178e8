mod routes;
mod static_files;

use axum::{routing::get, Router};
use std::sync::Arc;
use thiserror::Error;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use routes::{config, health};

const DEFAULT_IDENTITY_PROVIDER_URL: &str = "https://identitytoolkit.googleapis.com";
const DEFAULT_APP_TITLE: &str = "Mi Comida Favorita";

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{name} is not a valid value: {value}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Clone)]
pub struct AppConfig {
    pub port: u16,
    pub app_title: String,
    pub identity_provider_url: String,
    pub identity_api_key: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let port = match lookup("PORT") {
            Some(v) => v.trim().parse::<u16>().map_err(|_| ConfigError::Invalid {
                name: "PORT",
                value: v.clone(),
            })?,
            None => 8080,
        };

        let identity_api_key = lookup("IDENTITY_API_KEY")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .ok_or(ConfigError::Missing("IDENTITY_API_KEY"))?;

        Ok(Self {
            port,
            app_title: lookup("APP_TITLE")
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_APP_TITLE.to_string()),
            identity_provider_url: lookup("IDENTITY_PROVIDER_URL")
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_IDENTITY_PROVIDER_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            identity_api_key,
        })
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Runtime settings for the frontend
        .route("/api/config", get(config::client_config))
        // Static files (frontend) - fallback for everything else
        .fallback(static_files::static_handler)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    dotenvy::dotenv().ok();

    // Set up tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "comida_login=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;
    if !static_files::assets_embedded() {
        tracing::warn!("Frontend bundle not embedded; run `cd frontend && trunk build --release`");
    }

    let addr = format!("0.0.0.0:{}", config.port);
    let app = build_router(AppState { config });

    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
