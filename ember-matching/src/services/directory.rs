use std::collections::HashSet;

use diesel::pg::PgConnection;
use diesel::prelude::*;
use uuid::Uuid;

use ember_shared::errors::{AppError, AppResult, ErrorCode};
use ember_shared::types::pagination::PaginationParams;

use crate::models::Profile;
use crate::schema::profiles;

/// Read-side boundary to the user directory. Profile records are owned by
/// the user service; everything here is lookup-only.

pub fn find_by_id(conn: &mut PgConnection, id: Uuid) -> AppResult<Profile> {
    profiles::table
        .find(id)
        .first::<Profile>(conn)
        .optional()?
        .ok_or_else(|| AppError::new(ErrorCode::ProfileNotFound, "profile not found"))
}

pub fn profiles_by_ids(conn: &mut PgConnection, ids: &[Uuid]) -> AppResult<Vec<Profile>> {
    if ids.is_empty() {
        return Ok(vec![]);
    }
    let loaded = profiles::table
        .filter(profiles::id.eq_any(ids))
        .load::<Profile>(conn)?;
    Ok(loaded)
}

/// One page of non-admin profiles outside the exclusion set, with the total
/// for the same filter. Ordered by (created_at, id) so pagination is stable
/// across requests.
pub fn candidate_page(
    conn: &mut PgConnection,
    excluded: &HashSet<Uuid>,
    pagination: &PaginationParams,
) -> AppResult<(Vec<Profile>, i64)> {
    let excluded_ids: Vec<Uuid> = excluded.iter().copied().collect();

    let total = profiles::table
        .filter(profiles::role.ne("admin"))
        .filter(profiles::id.ne_all(&excluded_ids))
        .count()
        .get_result::<i64>(conn)?;

    let items = profiles::table
        .filter(profiles::role.ne("admin"))
        .filter(profiles::id.ne_all(&excluded_ids))
        .order((profiles::created_at.asc(), profiles::id.asc()))
        .offset(pagination.offset() as i64)
        .limit(pagination.limit() as i64)
        .load::<Profile>(conn)?;

    Ok((items, total))
}
