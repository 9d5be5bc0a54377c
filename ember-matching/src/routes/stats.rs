use axum::extract::State;
use axum::Json;
use diesel::prelude::*;
use serde::Serialize;
use std::sync::Arc;

use ember_shared::errors::{AppError, AppResult};
use ember_shared::types::auth::AuthUser;
use ember_shared::types::ApiResponse;

use crate::models::SwipeAction;
use crate::schema::swipes;
use crate::services::store;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct SwipeStats {
    pub total_likes: i64,
    pub total_dislikes: i64,
    pub total_swipes: i64,
    pub total_matches: i64,
    pub likes_received: i64,
    /// Matches per outbound like, as a percentage with one decimal.
    pub match_rate: f64,
}

/// GET /stats - the current user's swipe and match counters
pub async fn get_stats(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
) -> AppResult<Json<ApiResponse<SwipeStats>>> {
    let mut conn = state.db.get().map_err(|e| AppError::internal(e.to_string()))?;

    let total_likes: i64 = swipes::table
        .filter(swipes::swiper_id.eq(user.id))
        .filter(swipes::action.eq(SwipeAction::Like.as_str()))
        .count()
        .get_result(&mut conn)?;

    let total_dislikes: i64 = swipes::table
        .filter(swipes::swiper_id.eq(user.id))
        .filter(swipes::action.eq(SwipeAction::Dislike.as_str()))
        .count()
        .get_result(&mut conn)?;

    let likes_received: i64 = swipes::table
        .filter(swipes::swiped_id.eq(user.id))
        .filter(swipes::action.eq(SwipeAction::Like.as_str()))
        .count()
        .get_result(&mut conn)?;

    let total_matches = store::count_for_user(&mut conn, user.id)?;

    let match_rate = if total_likes > 0 {
        ((total_matches as f64 / total_likes as f64) * 1000.0).round() / 10.0
    } else {
        0.0
    };

    Ok(Json(ApiResponse::ok(SwipeStats {
        total_likes,
        total_dislikes,
        total_swipes: total_likes + total_dislikes,
        total_matches,
        likes_received,
        match_rate,
    })))
}
