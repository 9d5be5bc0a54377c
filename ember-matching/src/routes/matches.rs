use axum::extract::State;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use ember_shared::errors::{AppError, AppResult};
use ember_shared::types::auth::AuthUser;
use ember_shared::types::ApiResponse;

use crate::models::{Match, Profile, PublicProfile};
use crate::services::scoring::{self, Compatibility, ScoreGranularity};
use crate::services::{directory, store};
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct MatchItem {
    #[serde(flatten)]
    pub profile: PublicProfile,
    pub matched_at: DateTime<Utc>,
    pub your_like_type: Option<String>,
    pub their_like_type: Option<String>,
    pub is_mutual_emotion: bool,
    pub is_online: bool,
    pub last_active: DateTime<Utc>,
}

fn match_item(user_id: Uuid, m: &Match, other: &Profile) -> MatchItem {
    let (yours, theirs) = m.like_types_for(user_id);
    MatchItem {
        profile: PublicProfile::from(other),
        matched_at: m.created_at,
        your_like_type: yours.map(str::to_owned),
        their_like_type: theirs.map(str::to_owned),
        is_mutual_emotion: m.is_mutual_emotion,
        is_online: other.is_online,
        last_active: other.last_seen_at.unwrap_or(other.updated_at),
    }
}

fn presence_keys(rows: &[(Match, Profile)]) -> Vec<String> {
    rows.iter()
        .map(|(_, other)| format!("online:{}", other.id))
        .collect()
}

/// GET /matches - confirmed matches with the other party's profile populated
pub async fn list_matches(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
) -> AppResult<Json<ApiResponse<Vec<MatchItem>>>> {
    let mut conn = state.db.get().map_err(|e| AppError::internal(e.to_string()))?;

    let rows = store::list_for_user(&mut conn, user.id)?;
    let mut items: Vec<MatchItem> = rows
        .iter()
        .map(|(m, other)| match_item(user.id, m, other))
        .collect();

    // Enrich is_online from Redis (source of truth for presence)
    if let Ok(flags) = state.redis.exists_multi(&presence_keys(&rows)).await {
        for (item, online) in items.iter_mut().zip(flags) {
            if online {
                item.is_online = true;
            }
        }
    }

    Ok(Json(ApiResponse::ok(items)))
}

#[derive(Debug, Serialize)]
pub struct DetailedMatchItem {
    #[serde(flatten)]
    pub item: MatchItem,
    pub compatibility: Compatibility,
}

/// GET /matches/detailed - matches annotated with the pairwise compatibility breakdown
pub async fn list_matches_detailed(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
) -> AppResult<Json<ApiResponse<Vec<DetailedMatchItem>>>> {
    let mut conn = state.db.get().map_err(|e| AppError::internal(e.to_string()))?;

    let viewer = directory::find_by_id(&mut conn, user.id)?;
    let today = Utc::now().date_naive();

    let rows = store::list_for_user(&mut conn, user.id)?;
    let mut items: Vec<DetailedMatchItem> = rows
        .iter()
        .map(|(m, other)| DetailedMatchItem {
            item: match_item(user.id, m, other),
            compatibility: scoring::score_on(&viewer, other, ScoreGranularity::Detail, today),
        })
        .collect();

    // Enrich is_online from Redis (source of truth for presence)
    if let Ok(flags) = state.redis.exists_multi(&presence_keys(&rows)).await {
        for (item, online) in items.iter_mut().zip(flags) {
            if online {
                item.item.is_online = true;
            }
        }
    }

    Ok(Json(ApiResponse::ok(items)))
}
