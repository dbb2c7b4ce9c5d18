use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::{Router, extract::State, http::StatusCode, routing::get};
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

use crate::error::AppError;
use crate::models::*;
use crate::state::AppState;
use crate::validation;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/feedback", get(list_feedback).post(create_feedback))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    state.store.ping().await?;
    Ok(StatusCode::OK)
}

async fn list_feedback(State(state): State<AppState>) -> Result<Json<Vec<FeedbackEntry>>, AppError> {
    let latest = state.store.latest(LATEST_WINDOW).await?;
    debug!("returning {} feedback entries", latest.len());
    Ok(Json(latest))
}

/// Stores one submission and answers with the refreshed latest window.
async fn create_feedback(
    State(state): State<AppState>,
    payload: Result<Json<NewFeedbackRequest>, JsonRejection>,
) -> Result<Json<Vec<FeedbackEntry>>, AppError> {
    let Json(req) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;

    if state.strict_validation {
        validation::check_request(&req).map_err(|e| AppError::BadRequest(e.to_string()))?;
    }

    let entry = state.store.insert(&req).await?;
    info!(id = entry.id, course = %entry.course, rating = entry.rating, "feedback stored");

    let latest = state.store.latest(LATEST_WINDOW).await?;
    Ok(Json(latest))
}
