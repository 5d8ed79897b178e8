use axum::{extract::State, Json};
use shared::ClientConfig;
use std::sync::Arc;

use crate::AppState;

pub async fn client_config(State(state): State<Arc<AppState>>) -> Json<ClientConfig> {
    Json(ClientConfig {
        app_title: state.config.app_title.clone(),
        identity_provider_url: state.config.identity_provider_url.clone(),
        api_key: state.config.identity_api_key.clone(),
    })
}
