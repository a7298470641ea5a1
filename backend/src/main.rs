use std::net::SocketAddr;
use std::sync::Arc;

use tower_http::cors::{Any, CorsLayer};
use tracing::{info, Level};

mod calendar;
mod db;
mod domain;
mod prizes;
mod rest;

use domain::WorkoutService;
use prizes::PrizeCatalog;
use rest::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .init();

    info!("Setting up database");
    let db = db::DbConnection::init().await?;

    let workout_service = WorkoutService::new(db);
    let prize_catalog = Arc::new(PrizeCatalog::with_seed(prizes::default_prizes())?);

    let state = AppState::new(workout_service, prize_catalog);

    // CORS setup to allow the frontend to make requests
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = rest::router(state).layer(cors);

    // Start the server
    let addr = SocketAddr::from(([127, 0, 0, 1], 5000));
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
