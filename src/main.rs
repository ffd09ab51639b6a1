mod auth;
mod chat;
mod community;
mod db;
mod error;
mod middleware;
mod routes;
mod state;
mod user;
mod websocket;

use db::{create_pool, run_migrations};
use routes::create_router;
use state::{AppState, Config};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,localhub=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Arc::new(Config::from_env());

    let database_url = std::env::var("DATABASE_URL")
        .map_err(|_| anyhow::anyhow!("DATABASE_URL environment variable is not set"))?;

    tracing::info!("Connecting to database...");
    let db = create_pool(&database_url).await?;

    tracing::info!("Running migrations...");
    run_migrations(&db).await?;

    // WebSocket connection registry
    let ws_connections = websocket::ConnectionManager::new();

    // Repositories
    let user_repository = user::UserRepository::new(db.clone());
    let community_repository = community::CommunityRepository::new(db.clone());
    let chat_repository = chat::ChatRepository::new(db.clone());

    // Services
    let auth_service = auth::AuthService::new(
        user_repository.clone(),
        config.jwt_secret.clone(),
        config.jwt_expiration_hours,
    );
    let community_service = community::CommunityService::new(community_repository.clone());
    let chat_service = chat::ChatService::new(
        chat_repository.clone(),
        user_repository.clone(),
        community_service.clone(),
    );
    let frame_gate = websocket::FrameGate::new(chat_service.clone());

    let state = AppState {
        db: db.clone(),
        config: config.clone(),
        ws_connections,
        frame_gate,
        user_repository,
        auth_service,
        community_service,
        chat_service,
    };

    let app = create_router(state);

    let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let addr = format!("{}:{}", host, port);

    tracing::info!("Server starting on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
