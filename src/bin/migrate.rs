//! Creates the feedback schema. Safe to run repeatedly.
//!
//! Pass `--dry-run` to print the statement without connecting.

use std::process::ExitCode;

use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use feedback::config::Config;
use feedback::db;

fn is_dry_run() -> bool {
    std::env::args().any(|a| a == "--dry-run")
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "feedback=info,migrate=info".to_string()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    if is_dry_run() {
        println!("[DRY RUN] Would execute:\n{}", db::CREATE_FEEDBACKS);
        return ExitCode::SUCCESS;
    }

    let config = match Config::new_from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let pool = match db::connect(&config).await {
        Ok(pool) => pool,
        Err(e) => {
            error!("could not connect to {}: {}", config.database_url, e);
            return ExitCode::FAILURE;
        }
    };

    let status = match db::migrate(&pool).await {
        Ok(()) => {
            info!("schema is up to date");
            ExitCode::SUCCESS
        }
        Err(_) => ExitCode::FAILURE,
    };

    pool.close().await;
    status
}
