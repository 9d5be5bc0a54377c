use std::collections::HashSet;

use diesel::pg::PgConnection;
use diesel::prelude::*;
use uuid::Uuid;

use ember_shared::errors::AppResult;
use ember_shared::types::pagination::{Paginated, PaginationParams};

use crate::models::{PublicProfile, SwipeAction};
use crate::schema::{friendships, swipes};
use crate::services::directory;

/// The three named id-sets the feed exclusion rule is built from.
#[derive(Debug, Default)]
pub struct ExclusionSets {
    /// Everyone the user has swiped on, any action.
    pub swiped: HashSet<Uuid>,
    /// Current friends.
    pub friends: HashSet<Uuid>,
    /// Everyone who has liked the user, answered or not.
    pub inbound_likers: HashSet<Uuid>,
}

impl ExclusionSets {
    /// Ids that must not appear in `user_id`'s general feed: the user, every
    /// swiped id, every friend, and inbound likers still awaiting an answer.
    /// An answered inbound liker is already covered by `swiped`, so they fall
    /// back under the normal rules once the user responds.
    pub fn excluded_ids(&self, user_id: Uuid) -> HashSet<Uuid> {
        let mut excluded: HashSet<Uuid> = self.swiped.union(&self.friends).copied().collect();
        // Unanswered inbound likes belong on the "received" surface, not here
        excluded.extend(self.inbound_likers.difference(&self.swiped).copied());
        excluded.insert(user_id);
        excluded
    }
}

pub fn load_exclusions(conn: &mut PgConnection, user_id: Uuid) -> AppResult<ExclusionSets> {
    let swiped = swipes::table
        .filter(swipes::swiper_id.eq(user_id))
        .select(swipes::swiped_id)
        .load::<Uuid>(conn)?
        .into_iter()
        .collect();

    let friends = friendships::table
        .filter(friendships::user_id.eq(user_id))
        .select(friendships::friend_id)
        .load::<Uuid>(conn)?
        .into_iter()
        .collect();

    let inbound_likers = swipes::table
        .filter(swipes::swiped_id.eq(user_id))
        .filter(swipes::action.eq(SwipeAction::Like.as_str()))
        .select(swipes::swiper_id)
        .load::<Uuid>(conn)?
        .into_iter()
        .collect();

    Ok(ExclusionSets { swiped, friends, inbound_likers })
}

/// The next page of swipeable profiles for `user_id`. An empty pool is an
/// empty page, never an error.
pub fn get_candidates(
    conn: &mut PgConnection,
    user_id: Uuid,
    pagination: &PaginationParams,
) -> AppResult<Paginated<PublicProfile>> {
    let exclusions = load_exclusions(conn, user_id)?;
    let excluded = exclusions.excluded_ids(user_id);

    let (profiles, total) = directory::candidate_page(conn, &excluded, pagination)?;
    let items = profiles.iter().map(PublicProfile::from).collect();

    Ok(Paginated::new(items, total as u64, pagination))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(n: usize) -> Vec<Uuid> {
        (0..n).map(|_| Uuid::new_v4()).collect()
    }

    #[test]
    fn exclusion_always_contains_self() {
        let me = Uuid::new_v4();
        let excluded = ExclusionSets::default().excluded_ids(me);
        assert_eq!(excluded.len(), 1);
        assert!(excluded.contains(&me));
    }

    #[test]
    fn exclusion_is_the_union_of_all_sets() {
        let me = Uuid::new_v4();
        let all = ids(4);
        let sets = ExclusionSets {
            swiped: [all[0]].into(),
            friends: [all[1]].into(),
            inbound_likers: [all[2]].into(),
        };

        let excluded = sets.excluded_ids(me);
        assert!(excluded.contains(&me));
        assert!(excluded.contains(&all[0]));
        assert!(excluded.contains(&all[1]));
        assert!(excluded.contains(&all[2]));
        // Never swiped, not a friend, never liked us: stays eligible
        assert!(!excluded.contains(&all[3]));
    }

    #[test]
    fn answered_inbound_liker_is_only_excluded_as_swiped() {
        let me = Uuid::new_v4();
        let answered = Uuid::new_v4();
        let pending = Uuid::new_v4();
        let sets = ExclusionSets {
            swiped: [answered].into(),
            friends: HashSet::new(),
            inbound_likers: [answered, pending].into(),
        };

        let excluded = sets.excluded_ids(me);
        // Both are out of the feed, but for different reasons: the pending
        // liker belongs on the received surface until answered.
        assert!(excluded.contains(&answered));
        assert!(excluded.contains(&pending));

        // Once the pending one gets answered, only the swiped rule applies
        let sets = ExclusionSets {
            swiped: [answered, pending].into(),
            friends: HashSet::new(),
            inbound_likers: [answered, pending].into(),
        };
        assert_eq!(sets.excluded_ids(me).len(), 3);
    }
}
