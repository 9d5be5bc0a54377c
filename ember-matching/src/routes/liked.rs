use axum::extract::State;
use axum::Json;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use ember_shared::errors::{AppError, AppResult};
use ember_shared::types::auth::AuthUser;
use ember_shared::types::ApiResponse;

use crate::models::{Profile, PublicProfile, Swipe, SwipeAction};
use crate::schema::swipes;
use crate::services::{directory, store};
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct LikedUser {
    #[serde(flatten)]
    pub profile: PublicProfile,
    pub liked_at: DateTime<Utc>,
    pub is_match: bool,
    pub has_viewed: bool,
    pub their_action: Option<String>,
    pub status: String,
}

/// GET /liked - outbound likes that have not (yet) become matches
pub async fn list_liked(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
) -> AppResult<Json<ApiResponse<Vec<LikedUser>>>> {
    let mut conn = state.db.get().map_err(|e| AppError::internal(e.to_string()))?;

    let outbound: Vec<Swipe> = swipes::table
        .filter(swipes::swiper_id.eq(user.id))
        .filter(swipes::action.eq(SwipeAction::Like.as_str()))
        .order(swipes::created_at.desc())
        .load::<Swipe>(&mut conn)?;

    let target_ids: Vec<Uuid> = outbound.iter().map(|s| s.swiped_id).collect();
    let profiles_by_id: HashMap<Uuid, Profile> = directory::profiles_by_ids(&mut conn, &target_ids)?
        .into_iter()
        .map(|p| (p.id, p))
        .collect();

    // Their swipes back toward us, loaded in one pass
    let responses: Vec<Swipe> = swipes::table
        .filter(swipes::swiped_id.eq(user.id))
        .filter(swipes::swiper_id.eq_any(&target_ids))
        .load::<Swipe>(&mut conn)?;
    let response_by_swiper: HashMap<Uuid, Swipe> =
        responses.into_iter().map(|s| (s.swiper_id, s)).collect();

    let matched = store::matched_user_ids(&mut conn, user.id)?;

    let items: Vec<LikedUser> = outbound
        .iter()
        .filter_map(|swipe| {
            let profile = profiles_by_id.get(&swipe.swiped_id)?;
            if profile.is_admin() {
                return None;
            }
            // Confirmed matches live on the matches surface
            if matched.contains(&swipe.swiped_id) {
                return None;
            }

            let theirs = response_by_swiper.get(&swipe.swiped_id);
            let status = match theirs {
                Some(t) if !t.is_like() => "rejected",
                _ => "pending",
            };

            Some(LikedUser {
                profile: PublicProfile::from(profile),
                liked_at: swipe.created_at,
                is_match: false,
                has_viewed: theirs.is_some(),
                their_action: theirs.map(|t| t.action.clone()),
                status: status.to_string(),
            })
        })
        .collect();

    Ok(Json(ApiResponse::ok(items)))
}
