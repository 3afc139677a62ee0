use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::configuration::Settings;
use crate::routes::health_check;
use crate::server::handlers::{handle_mint, mint_page};
use crate::server::services::{MintService, MinterConfig};

#[derive(Clone)]
pub struct AppState {
    pub minter: Arc<MintService>,
}

pub async fn build_state(settings: &Settings) -> AppState {
    let minter = MintService::new(MinterConfig::from_settings(&settings.lambda)).await;
    AppState {
        minter: Arc::new(minter),
    }
}

pub fn configure_app(state: AppState) -> Router {
    Router::new()
        .route("/", get(mint_page))
        .route("/mint", post(handle_mint))
        .route("/health", get(health_check))
        .nest_service("/static", ServeDir::new("./static").precompressed_gzip())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
