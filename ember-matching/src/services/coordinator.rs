use diesel::pg::PgConnection;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use ember_shared::errors::AppResult;

use crate::models::{LikeType, Match, PublicProfile, Swipe, SwipeAction};
use crate::services::ledger::{self, SwipeOutcome};
use crate::services::{directory, store};

#[derive(Debug, Deserialize)]
pub struct SwipeRequest {
    pub target_user_id: Uuid,
    pub action: SwipeAction,
    pub like_type: Option<LikeType>,
}

#[derive(Debug, Serialize)]
pub struct SwipeResult {
    pub is_match: bool,
    pub already_swiped: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched_profile: Option<PublicProfile>,
}

/// What a swipe did, for the route layer: the client-facing result plus the
/// rows written, so events fire only for actual writes.
#[derive(Debug)]
pub struct SwipeSummary {
    pub result: SwipeResult,
    pub recorded: Option<Swipe>,
    pub created_match: Option<Match>,
}

impl SwipeSummary {
    fn no_match(recorded: Option<Swipe>, already_swiped: bool) -> Self {
        Self {
            result: SwipeResult {
                is_match: false,
                already_swiped,
                matched_profile: None,
            },
            recorded,
            created_match: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reciprocity {
    NoMatch,
    Match { mutual_emotion: bool },
}

/// Subtype agreement between two reciprocal likes: when both sides chose a
/// like subtype the subtypes must be equal; an untyped like matches any like.
pub fn reciprocity(mine: Option<LikeType>, theirs: Option<LikeType>) -> Reciprocity {
    match (mine, theirs) {
        (Some(a), Some(b)) if a == b => Reciprocity::Match { mutual_emotion: true },
        (Some(_), Some(_)) => Reciprocity::NoMatch,
        _ => Reciprocity::Match { mutual_emotion: false },
    }
}

/// Record a swipe and resolve its match outcome.
///
/// Writes at most twice (swipe ledger, then match store), each write
/// individually idempotent, so the whole operation is safe to replay.
pub fn process_swipe(
    conn: &mut PgConnection,
    swiper_id: Uuid,
    req: &SwipeRequest,
) -> AppResult<SwipeSummary> {
    let target = directory::find_by_id(conn, req.target_user_id)?;

    let outcome = ledger::record_swipe(conn, swiper_id, target.id, req.action, req.like_type)?;
    let swipe = match outcome {
        SwipeOutcome::AlreadySwiped(prior) => {
            // Replaying a like converges: a crash between the ledger write and
            // the store write heals here, since the reciprocity check re-runs.
            if prior.is_like() {
                ensure_match(conn, swiper_id, target.id, &prior)?;
            }
            return Ok(SwipeSummary::no_match(None, true));
        }
        SwipeOutcome::Recorded(swipe) => swipe,
    };

    // Dislikes never produce matches
    if req.action == SwipeAction::Dislike {
        return Ok(SwipeSummary::no_match(Some(swipe), false));
    }

    match ensure_match(conn, swiper_id, target.id, &swipe)? {
        None => Ok(SwipeSummary::no_match(Some(swipe), false)),
        Some(created) => Ok(SwipeSummary {
            result: SwipeResult {
                is_match: true,
                already_swiped: false,
                matched_profile: Some(PublicProfile::from(&target)),
            },
            recorded: Some(swipe),
            created_match: Some(created),
        }),
    }
}

/// Resolve reciprocity for a recorded like and guarantee the match row when
/// it qualifies. Returns the match, or None when no qualifying reciprocal
/// like exists.
fn ensure_match(
    conn: &mut PgConnection,
    swiper_id: Uuid,
    target_id: Uuid,
    swipe: &Swipe,
) -> AppResult<Option<Match>> {
    let reciprocal = ledger::find_swipe(conn, target_id, swiper_id)?.filter(|s| s.is_like());
    let Some(reciprocal) = reciprocal else {
        return Ok(None);
    };

    match reciprocity(swipe.like_subtype(), reciprocal.like_subtype()) {
        Reciprocity::NoMatch => Ok(None),
        Reciprocity::Match { mutual_emotion } => {
            let created = store::create_if_absent(
                conn,
                swiper_id,
                swipe.like_type.clone(),
                target_id,
                reciprocal.like_type.clone(),
                mutual_emotion,
            )?;
            Ok(Some(created))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn untyped_mutual_likes_match_without_emotion() {
        assert_eq!(
            reciprocity(None, None),
            Reciprocity::Match { mutual_emotion: false }
        );
    }

    #[test]
    fn one_typed_side_still_matches() {
        assert_eq!(
            reciprocity(Some(LikeType::Crush), None),
            Reciprocity::Match { mutual_emotion: false }
        );
        assert_eq!(
            reciprocity(None, Some(LikeType::Fun)),
            Reciprocity::Match { mutual_emotion: false }
        );
    }

    #[test]
    fn equal_subtypes_are_a_mutual_emotion() {
        assert_eq!(
            reciprocity(Some(LikeType::Crush), Some(LikeType::Crush)),
            Reciprocity::Match { mutual_emotion: true }
        );
    }

    #[test]
    fn differing_subtypes_do_not_match() {
        assert_eq!(
            reciprocity(Some(LikeType::Crush), Some(LikeType::Intrigued)),
            Reciprocity::NoMatch
        );
    }
}
