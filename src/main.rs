use std::net::SocketAddr;
use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use quill::config::Config;
use quill::db::{postgres, BlogStore, PgStore};
use quill::{routes, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_filter.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let pool = PgPoolOptions::new()
        .max_connections(16)
        .connect(&config.database_url)
        .await?;
    postgres::prepare_db(&pool).await?;

    let store: Arc<dyn BlogStore> = Arc::new(PgStore::new(pool));
    let state = AppState::new(store, &config.jwt_secret);
    let app = routes::generate_routes(state);

    let addr: SocketAddr = config.bind_addr.parse()?;
    tracing::info!("listening on {addr}");
    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .await?;

    Ok(())
}
