pub mod chat;
pub mod config;

use axum::{Router, extract::FromRef};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{chat::Hub, config::Config};

#[derive(Clone, FromRef)]
pub struct AppState {
    pub hub: Hub,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        Self {
            hub: Hub::new(config.history_limit),
        }
    }
}

pub fn app(app_state: AppState) -> Router {
    Router::new()
        .merge(chat::router())
        .with_state(app_state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
