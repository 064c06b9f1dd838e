use axum::{
    http::Method,
    routing::{get, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, Level};

mod auth;
mod db;
mod domain;
mod rest;
mod storage;

use crate::auth::{AuthUser, Role};
use crate::db::DbConnection;
use crate::rest::AppState;
use crate::storage::UserRepository;

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .init();

    info!("Setting up database");
    let db = DbConnection::init().await?;

    seed_first_admin(&db).await?;

    let state = AppState::new(db);

    // CORS setup to allow an admin frontend to make requests
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    // The schedule screen's routes, including the extra clone route
    let api_routes = Router::new()
        .route("/schedule", get(rest::list_schedules).post(rest::store))
        .route("/schedule/create", get(rest::create_form))
        .route("/schedule/:id", put(rest::update).delete(rest::destroy))
        .route("/schedule/:id/edit", get(rest::edit_form))
        .route("/schedule/:id/clone", get(rest::clone_schedule))
        .route("/children", get(rest::list_children))
        .route("/notifications", get(rest::notifications));

    let app = Router::new()
        .nest("/api", api_routes)
        .layer(cors)
        .with_state(state);

    let addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Seed a first admin user on an empty store so the service is usable out
/// of the box. User management proper belongs to a different screen.
async fn seed_first_admin(db: &DbConnection) -> anyhow::Result<()> {
    let users = UserRepository::new(db.clone());
    if users.count_users().await? == 0 {
        let admin = AuthUser {
            id: "user::admin".to_string(),
            name: "Pentadbir".to_string(),
            role: Role::Admin,
        };
        users.store_user(&admin).await?;
        info!("Seeded first admin user '{}'", admin.id);
    }
    Ok(())
}
