use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::result::DatabaseErrorKind;
use uuid::Uuid;

use ember_shared::errors::{AppError, AppResult, ErrorCode};

use crate::models::{LikeType, NewSwipe, Swipe, SwipeAction};
use crate::schema::swipes;

/// Outcome of recording a swipe. `AlreadySwiped` is a success path: retries
/// and duplicate taps resolve to the stored record instead of an error.
#[derive(Debug)]
pub enum SwipeOutcome {
    Recorded(Swipe),
    AlreadySwiped(Swipe),
}

impl SwipeOutcome {
    pub fn swipe(&self) -> &Swipe {
        match self {
            SwipeOutcome::Recorded(s) | SwipeOutcome::AlreadySwiped(s) => s,
        }
    }
}

pub fn find_swipe(
    conn: &mut PgConnection,
    swiper_id: Uuid,
    swiped_id: Uuid,
) -> AppResult<Option<Swipe>> {
    let swipe = swipes::table
        .filter(swipes::swiper_id.eq(swiper_id))
        .filter(swipes::swiped_id.eq(swiped_id))
        .first::<Swipe>(conn)
        .optional()?;
    Ok(swipe)
}

/// Append a swipe to the ledger, at most one per ordered (swiper, swiped) pair.
///
/// The existence check keeps the common retry path cheap; the unique index on
/// (swiper_id, swiped_id) is what actually guards concurrent duplicates. A
/// unique violation means another request won the insert, so the stored row
/// is read back and returned as `AlreadySwiped`.
pub fn record_swipe(
    conn: &mut PgConnection,
    swiper_id: Uuid,
    swiped_id: Uuid,
    action: SwipeAction,
    like_type: Option<LikeType>,
) -> AppResult<SwipeOutcome> {
    if swiper_id == swiped_id {
        return Err(AppError::new(ErrorCode::CannotSwipeSelf, "cannot swipe on yourself"));
    }

    if let Some(existing) = find_swipe(conn, swiper_id, swiped_id)? {
        return Ok(SwipeOutcome::AlreadySwiped(existing));
    }

    let new_swipe = NewSwipe {
        swiper_id,
        swiped_id,
        action: action.to_string(),
        like_type: like_type.map(|t| t.to_string()),
    };

    match diesel::insert_into(swipes::table)
        .values(&new_swipe)
        .get_result::<Swipe>(conn)
    {
        Ok(swipe) => Ok(SwipeOutcome::Recorded(swipe)),
        Err(diesel::result::Error::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => {
            let existing = find_swipe(conn, swiper_id, swiped_id)?.ok_or_else(|| {
                AppError::internal("swipe missing after unique violation")
            })?;
            Ok(SwipeOutcome::AlreadySwiped(existing))
        }
        Err(e) => Err(e.into()),
    }
}
