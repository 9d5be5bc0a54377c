use chrono::{Datelike, NaiveDate};
use diesel::pg::PgConnection;
use diesel::prelude::*;
use serde::Serialize;

use ember_shared::errors::AppResult;

use crate::models::{Profile, PublicProfile};
use crate::schema::profiles;
use crate::services::scoring::{self, Compatibility, ScoreBreakdown, ScoreGranularity};

pub const MIN_QUALIFYING_SCORE: u32 = 20;
pub const MAX_RANKED_MATCHES: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MatchLevel {
    High,
    Medium,
    Low,
    Poor,
}

impl MatchLevel {
    pub fn for_score(score: u32) -> Self {
        match score {
            70.. => MatchLevel::High,
            40..=69 => MatchLevel::Medium,
            20..=39 => MatchLevel::Low,
            _ => MatchLevel::Poor,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RankedCandidate {
    #[serde(flatten)]
    pub profile: PublicProfile,
    pub match_score: u32,
    pub match_reasons: Vec<String>,
    pub detailed_scoring: ScoreBreakdown,
    pub is_high_match: bool,
    pub is_medium_match: bool,
    pub is_low_match: bool,
    pub match_level: MatchLevel,
}

#[derive(Debug, Serialize)]
pub struct DiscoverSummary {
    pub matches: Vec<RankedCandidate>,
    pub total_matches: usize,
    pub high_matches: usize,
    pub medium_matches: usize,
    pub low_matches: usize,
    pub average_score: u32,
    pub best_match: Option<RankedCandidate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Rank a scored pool: drop everything under the qualifying threshold, sort
/// by score descending, keep the top 50, and summarize the band counts.
pub fn rank(scored: Vec<(PublicProfile, Compatibility)>) -> DiscoverSummary {
    let mut qualified: Vec<RankedCandidate> = scored
        .into_iter()
        .filter(|(_, compat)| compat.total >= MIN_QUALIFYING_SCORE)
        .map(|(profile, compat)| {
            let level = MatchLevel::for_score(compat.total);
            RankedCandidate {
                profile,
                match_score: compat.total,
                match_reasons: compat.reasons,
                detailed_scoring: compat.breakdown,
                is_high_match: level == MatchLevel::High,
                is_medium_match: level == MatchLevel::Medium,
                is_low_match: level == MatchLevel::Low,
                match_level: level,
            }
        })
        .collect();

    qualified.sort_by(|a, b| b.match_score.cmp(&a.match_score));
    qualified.truncate(MAX_RANKED_MATCHES);

    let total_matches = qualified.len();
    let high_matches = qualified.iter().filter(|m| m.is_high_match).count();
    let medium_matches = qualified.iter().filter(|m| m.is_medium_match).count();
    let low_matches = qualified.iter().filter(|m| m.is_low_match).count();
    let average_score = if total_matches > 0 {
        let sum: u32 = qualified.iter().map(|m| m.match_score).sum();
        (sum as f64 / total_matches as f64).round() as u32
    } else {
        0
    };
    let best_match = qualified.first().cloned();
    let message = if total_matches == 0 {
        Some(
            "No matches found with 20% or higher compatibility. Try updating your profile preferences."
                .to_string(),
        )
    } else {
        None
    };

    DiscoverSummary {
        matches: qualified,
        total_matches,
        high_matches,
        medium_matches,
        low_matches,
        average_score,
        best_match,
        message,
    }
}

fn years_before(today: NaiveDate, years: i32) -> NaiveDate {
    today
        .with_year(today.year() - years)
        // Feb 29 in a non-leap target year
        .unwrap_or_else(|| NaiveDate::from_ymd_opt(today.year() - years, 3, 1).unwrap_or(today))
}

/// Bulk-score the discovery pool for `viewer`: candidates pre-filtered by the
/// viewer's gender preference and preferred age range (as a birth-date
/// window), then scored at feed granularity and ranked.
pub fn discover(
    conn: &mut PgConnection,
    viewer: &Profile,
    today: NaiveDate,
) -> AppResult<DiscoverSummary> {
    let mut query = profiles::table
        .filter(profiles::id.ne(viewer.id))
        .filter(profiles::role.ne("admin"))
        .into_boxed();

    if let Some(looking_for) = viewer.looking_for.as_deref() {
        if !looking_for.is_empty() && !looking_for.eq_ignore_ascii_case("everyone") {
            query = query.filter(profiles::gender.eq(looking_for.to_string()));
        }
    }

    let (min_age, max_age) = viewer.preferred_age_bounds();
    let latest_birth = years_before(today, min_age);
    let earliest_birth = years_before(today, max_age);
    query = query.filter(profiles::birth_date.between(earliest_birth, latest_birth));

    let pool = query.load::<Profile>(conn)?;
    tracing::debug!(viewer = %viewer.id, pool_size = pool.len(), "scoring discovery pool");

    let scored = pool
        .iter()
        .map(|candidate| {
            let compat = scoring::score_on(viewer, candidate, ScoreGranularity::Feed, today);
            (PublicProfile::from(candidate), compat)
        })
        .collect();

    Ok(rank(scored))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::scoring::{
        AgeScore, FactorScore, InterestsScore, LifestyleScore,
    };
    use chrono::Utc;
    use uuid::Uuid;

    fn public_profile() -> PublicProfile {
        PublicProfile {
            id: Uuid::new_v4(),
            first_name: "Test".into(),
            last_name: "User".into(),
            full_name: "Test User".into(),
            email: "test@example.com".into(),
            profile_photo_url: None,
            bio: None,
            location: None,
            birth_date: None,
            age: None,
            gender: None,
            looking_for: None,
            interests: vec![],
            relationship: None,
            orientation: None,
            smoking: None,
            alcohol: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn compat(total: u32) -> Compatibility {
        Compatibility {
            total,
            breakdown: ScoreBreakdown {
                interests: InterestsScore { score: 0, common: vec![], total: 0 },
                location: FactorScore { score: 0, matched: false },
                relationship: FactorScore { score: 0, matched: false },
                age: AgeScore { score: 0, compatible: false, age: None },
                orientation: FactorScore { score: 0, matched: false },
                lifestyle: LifestyleScore { score: 0, smoking: false, alcohol: false },
            },
            reasons: vec![],
        }
    }

    #[test]
    fn match_level_band_edges() {
        assert_eq!(MatchLevel::for_score(70), MatchLevel::High);
        assert_eq!(MatchLevel::for_score(69), MatchLevel::Medium);
        assert_eq!(MatchLevel::for_score(40), MatchLevel::Medium);
        assert_eq!(MatchLevel::for_score(39), MatchLevel::Low);
        assert_eq!(MatchLevel::for_score(20), MatchLevel::Low);
        assert_eq!(MatchLevel::for_score(19), MatchLevel::Poor);
    }

    #[test]
    fn rank_filters_sorts_and_summarizes() {
        let scored = vec![
            (public_profile(), compat(15)),
            (public_profile(), compat(85)),
            (public_profile(), compat(45)),
            (public_profile(), compat(25)),
        ];

        let summary = rank(scored);

        assert_eq!(summary.total_matches, 3);
        assert_eq!(summary.high_matches, 1);
        assert_eq!(summary.medium_matches, 1);
        assert_eq!(summary.low_matches, 1);
        let scores: Vec<u32> = summary.matches.iter().map(|m| m.match_score).collect();
        assert_eq!(scores, vec![85, 45, 25]);
        // (85 + 45 + 25) / 3 rounds to 52
        assert_eq!(summary.average_score, 52);
        assert_eq!(summary.best_match.unwrap().match_score, 85);
        assert!(summary.message.is_none());
    }

    #[test]
    fn rank_truncates_to_the_top_fifty() {
        let scored: Vec<_> = (0u32..80)
            .map(|i| (public_profile(), compat(20 + (i % 60))))
            .collect();

        let summary = rank(scored);
        assert_eq!(summary.total_matches, MAX_RANKED_MATCHES);
        assert!(summary.matches.windows(2).all(|w| w[0].match_score >= w[1].match_score));
    }

    #[test]
    fn empty_pool_reports_a_message_not_an_error() {
        let summary = rank(vec![(public_profile(), compat(5))]);
        assert_eq!(summary.total_matches, 0);
        assert!(summary.best_match.is_none());
        assert!(summary.message.is_some());
        assert_eq!(summary.average_score, 0);
    }

    #[test]
    fn years_before_handles_plain_dates() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        assert_eq!(years_before(today, 25), NaiveDate::from_ymd_opt(1999, 6, 15).unwrap());
    }

    #[test]
    fn years_before_handles_leap_day() {
        let leap = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        assert_eq!(years_before(leap, 25), NaiveDate::from_ymd_opt(1999, 3, 1).unwrap());
    }
}
