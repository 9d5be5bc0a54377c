use axum::extract::State;
use axum::Json;
use chrono::Utc;
use std::sync::Arc;

use ember_shared::errors::{AppError, AppResult};
use ember_shared::types::auth::AuthUser;
use ember_shared::types::ApiResponse;

use crate::services::ranking::{self, DiscoverSummary};
use crate::services::directory;
use crate::AppState;

/// GET /discover - bulk-scored, ranked discovery pool for the current user
pub async fn discover(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
) -> AppResult<Json<ApiResponse<DiscoverSummary>>> {
    let mut conn = state.db.get().map_err(|e| AppError::internal(e.to_string()))?;

    let viewer = directory::find_by_id(&mut conn, user.id)?;
    let summary = ranking::discover(&mut conn, &viewer, Utc::now().date_naive())?;

    Ok(Json(ApiResponse::ok(summary)))
}
