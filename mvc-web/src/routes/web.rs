use axum::{Router, extract::Path, response::Html, routing::get};

use crate::AppState;
use crate::controllers::greet::greet_user;

const INDEX_HTML: &str = include_str!("../../resources/views/index.html");

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(home))
        .route("/healthz", get(healthz))
        .route("/:name", get(greet))
}

async fn home() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn healthz() -> &'static str {
    "ok"
}

async fn greet(Path(name): Path<String>) -> Html<String> {
    Html(greet_user(&name))
}
