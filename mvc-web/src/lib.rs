use axum::Router;
use tokio::net::TcpListener;
use tracing::info;

use mvc_database::Database;

/// Controllers producing web responses.
pub mod controllers;
mod error;
/// Route tables for the HTML pages and the `/api/v1` API.
pub mod routes;

pub use error::ApiError;

/// State shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
}

impl AppState {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(routes::web::router())
        .nest("/api/v1", routes::api::router())
        .with_state(state)
}

/// Bind `address` and serve the router until the server fails.
pub async fn serve(address: &str, state: AppState) -> anyhow::Result<()> {
    let listener = TcpListener::bind(address).await?;
    info!(address = %listener.local_addr()?, "web server listening");

    axum::serve(listener, build_router(state)).await?;
    Ok(())
}
