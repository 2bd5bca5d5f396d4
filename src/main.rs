use std::sync::Arc;

use inkpost::api::router::build_router;
use inkpost::config::AppConfig;
use inkpost::db::blog_repository::MongoBlogRepository;
use inkpost::db::user_repository::MongoUserRepository;
use inkpost::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "inkpost=info,tower_http=info".into()),
        )
        .init();

    tracing::info!("Starting inkpost server...");

    let config = AppConfig::from_env()?;

    // Connect to MongoDB. One client for the process lifetime; the driver
    // pools connections internally.
    let mongo_client = mongodb::Client::with_uri_str(&config.mongodb_uri).await?;
    let mongo_db = mongo_client.database(&config.database);

    tracing::info!("Connected to MongoDB database '{}'", config.database);

    let user_repo = MongoUserRepository::new(&mongo_db);
    user_repo.ensure_indexes().await?;

    let state = AppState {
        blog_repo: Arc::new(MongoBlogRepository::new(&mongo_db)),
        user_repo: Arc::new(user_repo),
    };

    let app = build_router(state);

    // Start the server
    let addr = config.bind_addr();
    tracing::info!("Listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}
