use axum::extract::State;
use axum::Json;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use uuid::Uuid;

use ember_shared::errors::{AppError, AppResult};
use ember_shared::types::auth::AuthUser;
use ember_shared::types::ApiResponse;

use crate::models::{Profile, PublicProfile, Swipe, SwipeAction};
use crate::schema::swipes;
use crate::services::directory;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct ReceivedLike {
    #[serde(flatten)]
    pub profile: PublicProfile,
    pub liked_at: DateTime<Utc>,
    pub like_type: Option<String>,
}

/// GET /received - inbound likes the current user has not answered yet
pub async fn list_received(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
) -> AppResult<Json<ApiResponse<Vec<ReceivedLike>>>> {
    let mut conn = state.db.get().map_err(|e| AppError::internal(e.to_string()))?;

    let inbound: Vec<Swipe> = swipes::table
        .filter(swipes::swiped_id.eq(user.id))
        .filter(swipes::action.eq(SwipeAction::Like.as_str()))
        .order(swipes::created_at.desc())
        .load::<Swipe>(&mut conn)?;

    let answered: HashSet<Uuid> = swipes::table
        .filter(swipes::swiper_id.eq(user.id))
        .select(swipes::swiped_id)
        .load::<Uuid>(&mut conn)?
        .into_iter()
        .collect();

    let pending: Vec<&Swipe> = inbound
        .iter()
        .filter(|s| !answered.contains(&s.swiper_id))
        .collect();

    let sender_ids: Vec<Uuid> = pending.iter().map(|s| s.swiper_id).collect();
    let profiles_by_id: HashMap<Uuid, Profile> = directory::profiles_by_ids(&mut conn, &sender_ids)?
        .into_iter()
        .map(|p| (p.id, p))
        .collect();

    let items: Vec<ReceivedLike> = pending
        .iter()
        .filter_map(|swipe| {
            let profile = profiles_by_id.get(&swipe.swiper_id)?;
            if profile.is_admin() {
                return None;
            }
            Some(ReceivedLike {
                profile: PublicProfile::from(profile),
                liked_at: swipe.created_at,
                like_type: swipe.like_type.clone(),
            })
        })
        .collect();

    Ok(Json(ApiResponse::ok(items)))
}
