use std::sync::Arc;

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use feedback::config::Config;
use feedback::db::{self, SqliteFeedbackStore};
use feedback::router;
use feedback::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "feedback=debug,tower_http=info".to_string()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::new_from_env()?;

    let pool = db::connect(&config).await?;

    // No schema, no server.
    db::migrate(&pool).await?;

    if config.strict_validation {
        info!("strict server-side validation enabled");
    }

    let state = AppState {
        store: Arc::new(SqliteFeedbackStore::new(pool)),
        strict_validation: config.strict_validation,
    };

    let app = router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!("listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
