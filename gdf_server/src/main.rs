//! HTTP server for the Gottesdienst formatter.
//!
//! `GET /bulletin?year=<year>&month=<month>` fetches the configured
//! ChurchDesk organizations and responds with the plain-text bulletin;
//! `POST /bulletin` formats a CSV export sent as the request body. The
//! front page is served from the `static` directory.

use std::net::SocketAddr;

use axum::{routing::get, Router};
use tower_http::services::ServeDir;
use tracing_subscriber::EnvFilter;

mod route;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .compact()
        .init();
    let app = Router::new()
        .route(
            "/bulletin",
            get(route::bulletin::fetch_handler).post(route::bulletin::upload_handler),
        )
        .fallback_service(ServeDir::new("static"));
    let addr = SocketAddr::from(([0, 0, 0, 0], 8008));
    tracing::info!(%addr, "listening");
    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .await
        .unwrap();
}
