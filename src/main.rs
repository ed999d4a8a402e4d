// Main entry point - Dependency injection and server setup
mod domain;
mod application;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc};

use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::application::auth_service::AuthService;
use crate::application::geocode_service::GeocodeService;
use crate::application::route_service::RouteService;
use crate::infrastructure::config::load_app_config;
use crate::infrastructure::file_store::FileStore;
use crate::infrastructure::nominatim::NominatimClient;
use crate::infrastructure::sqlite_repository::SqliteRepository;
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    compare_routes, delete_route, get_route_dashboard, health_check, list_routes, login, register,
    reverse_geocode, upload_route,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Load configuration
    let config = load_app_config()?;

    // Create adapters (infrastructure layer)
    let repository = Arc::new(SqliteRepository::connect(&config.storage.database_path).await?);
    let files = Arc::new(FileStore::new(&config.storage.upload_dir));
    files.ensure_root().await?;
    let geocoder = Arc::new(NominatimClient::new(&config.geocoder)?);

    // Create services (application layer)
    let route_service = RouteService::new(repository.clone(), files);
    let geocode_service = GeocodeService::new(repository.clone(), geocoder);
    let auth_service = AuthService::new(repository, config.auth.clone());

    // Create application state
    let state = Arc::new(AppState {
        route_service,
        geocode_service,
        auth_service,
        auth_settings: config.auth,
    });

    // Build router (presentation layer)
    let router = Router::new()
        .route("/healthz", get(health_check))
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/routes", get(list_routes).post(upload_route))
        .route("/routes/:id", get(get_route_dashboard).delete(delete_route))
        .route("/compare", get(compare_routes))
        .route("/reverse_geocode", get(reverse_geocode))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr: SocketAddr = config.server.bind_addr.parse()?;
    println!("Starting route-telemetry service on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}
