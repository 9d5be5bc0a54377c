use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::result::DatabaseErrorKind;
use uuid::Uuid;

use ember_shared::errors::{AppError, AppResult};

use crate::models::{Match, NewMatch, Profile};
use crate::schema::matches;
use crate::services::directory;

/// Canonical storage order for the unordered pair.
pub fn canonical_pair(x: Uuid, y: Uuid) -> (Uuid, Uuid) {
    if x < y { (x, y) } else { (y, x) }
}

pub fn find_for_pair(conn: &mut PgConnection, x: Uuid, y: Uuid) -> AppResult<Option<Match>> {
    let (a, b) = canonical_pair(x, y);
    let found = matches::table
        .filter(matches::user_a.eq(a))
        .filter(matches::user_b.eq(b))
        .first::<Match>(conn)
        .optional()?;
    Ok(found)
}

/// Create the match record for a pair unless one already exists.
///
/// Both sides of a reciprocal swipe race to this call; the unique index on
/// (user_a, user_b) decides the winner and the loser adopts the stored row.
pub fn create_if_absent(
    conn: &mut PgConnection,
    user_x: Uuid,
    like_type_x: Option<String>,
    user_y: Uuid,
    like_type_y: Option<String>,
    is_mutual_emotion: bool,
) -> AppResult<Match> {
    if let Some(existing) = find_for_pair(conn, user_x, user_y)? {
        return Ok(existing);
    }

    let (user_a, like_type_a, user_b, like_type_b) = if user_x < user_y {
        (user_x, like_type_x, user_y, like_type_y)
    } else {
        (user_y, like_type_y, user_x, like_type_x)
    };

    let new_match = NewMatch {
        user_a,
        user_b,
        like_type_a,
        like_type_b,
        is_mutual_emotion,
    };

    match diesel::insert_into(matches::table)
        .values(&new_match)
        .get_result::<Match>(conn)
    {
        Ok(created) => Ok(created),
        Err(diesel::result::Error::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => {
            find_for_pair(conn, user_a, user_b)?
                .ok_or_else(|| AppError::internal("match missing after unique violation"))
        }
        Err(e) => Err(e.into()),
    }
}

/// All matches containing `user_id`, newest first, with the counterpart
/// profile populated. Matches whose counterpart is gone or an admin account
/// are dropped, mirroring the directory's role filter.
pub fn list_for_user(
    conn: &mut PgConnection,
    user_id: Uuid,
) -> AppResult<Vec<(Match, Profile)>> {
    let rows: Vec<Match> = matches::table
        .filter(matches::user_a.eq(user_id).or(matches::user_b.eq(user_id)))
        .order(matches::created_at.desc())
        .load::<Match>(conn)?;

    let other_ids: Vec<Uuid> = rows.iter().map(|m| m.other_user(user_id)).collect();
    let counterparts = directory::profiles_by_ids(conn, &other_ids)?;

    let by_id: std::collections::HashMap<Uuid, Profile> =
        counterparts.into_iter().map(|p| (p.id, p)).collect();

    Ok(rows
        .into_iter()
        .filter_map(|m| {
            let other = by_id.get(&m.other_user(user_id))?;
            if other.is_admin() {
                return None;
            }
            Some((m, other.clone()))
        })
        .collect())
}

/// Ids of everyone `user_id` is matched with.
pub fn matched_user_ids(
    conn: &mut PgConnection,
    user_id: Uuid,
) -> AppResult<std::collections::HashSet<Uuid>> {
    let rows: Vec<Match> = matches::table
        .filter(matches::user_a.eq(user_id).or(matches::user_b.eq(user_id)))
        .load::<Match>(conn)?;
    Ok(rows.iter().map(|m| m.other_user(user_id)).collect())
}

pub fn count_for_user(conn: &mut PgConnection, user_id: Uuid) -> AppResult<i64> {
    let count = matches::table
        .filter(matches::user_a.eq(user_id).or(matches::user_b.eq(user_id)))
        .count()
        .get_result::<i64>(conn)?;
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_pair_is_order_independent() {
        let x = Uuid::new_v4();
        let y = Uuid::new_v4();
        assert_eq!(canonical_pair(x, y), canonical_pair(y, x));
        let (a, b) = canonical_pair(x, y);
        assert!(a < b);
    }
}
