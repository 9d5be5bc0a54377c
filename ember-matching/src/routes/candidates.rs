use axum::extract::{Query, State};
use axum::http::{HeaderMap, HeaderValue};
use axum::Json;
use std::sync::Arc;

use ember_shared::errors::{AppError, AppResult};
use ember_shared::types::auth::AuthUser;
use ember_shared::types::pagination::{Paginated, PaginationParams};
use ember_shared::types::ApiResponse;

use crate::models::PublicProfile;
use crate::services::feed;
use crate::AppState;

/// GET /candidates?page=1&per_page=20 - the swipeable feed
pub async fn get_candidates(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    Query(pagination): Query<PaginationParams>,
) -> AppResult<(HeaderMap, Json<ApiResponse<Paginated<PublicProfile>>>)> {
    let mut conn = state.db.get().map_err(|e| AppError::internal(e.to_string()))?;

    let page = feed::get_candidates(&mut conn, user.id, &pagination)?;

    // Pagination metadata mirrored into headers for header-driven clients
    let mut headers = HeaderMap::new();
    headers.insert("X-Total-Count", HeaderValue::from(page.total));
    headers.insert("X-Page", HeaderValue::from(page.page));
    headers.insert("X-Per-Page", HeaderValue::from(page.per_page));
    headers.insert(
        "X-Has-More",
        HeaderValue::from_static(if page.has_more { "true" } else { "false" }),
    );

    Ok((headers, Json(ApiResponse::ok(page))))
}
