use axum::extract::State;
use axum::Json;
use std::sync::Arc;

use ember_shared::errors::{AppError, AppResult};
use ember_shared::types::auth::AuthUser;
use ember_shared::types::ApiResponse;

use crate::events::publisher;
use crate::services::coordinator::{self, SwipeRequest, SwipeResult};
use crate::AppState;

/// POST /swipe - record a swipe and report whether it completed a match
pub async fn swipe(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    Json(req): Json<SwipeRequest>,
) -> AppResult<Json<ApiResponse<SwipeResult>>> {
    let mut conn = state.db.get().map_err(|e| AppError::internal(e.to_string()))?;

    let summary = coordinator::process_swipe(&mut conn, user.id, &req)?;

    if let Some(swipe) = &summary.recorded {
        publisher::publish_swipe_recorded(&state.rabbitmq, swipe).await;
    }
    if let Some(created) = &summary.created_match {
        publisher::publish_match_created(&state.rabbitmq, created).await;
    }

    let message = if summary.result.is_match {
        "It's a match!"
    } else if summary.result.already_swiped {
        "Already swiped on this user"
    } else {
        "Swipe recorded"
    };

    Ok(Json(ApiResponse::ok_with_message(summary.result, message)))
}
