use chrono::NaiveDate;
use serde::Serialize;

use crate::models::Profile;

/// Weight tables for the two scoring surfaces. The feed table sums to 100;
/// the detail table can exceed it, so totals are capped after rounding.
#[derive(Debug, Clone, Copy)]
pub struct Weights {
    pub interests: f64,
    pub location: f64,
    pub relationship: f64,
    pub age: f64,
    pub orientation: f64,
    pub lifestyle_each: f64,
}

const FEED_WEIGHTS: Weights = Weights {
    interests: 40.0,
    location: 25.0,
    relationship: 15.0,
    age: 10.0,
    orientation: 7.0,
    lifestyle_each: 1.5,
};

const DETAIL_WEIGHTS: Weights = Weights {
    interests: 40.0,
    location: 25.0,
    relationship: 20.0,
    age: 15.0,
    orientation: 10.0,
    lifestyle_each: 2.5,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreGranularity {
    /// Bulk feed ranking.
    Feed,
    /// Pairwise detail view with per-factor flags.
    Detail,
}

impl ScoreGranularity {
    pub fn weights(&self) -> &'static Weights {
        match self {
            ScoreGranularity::Feed => &FEED_WEIGHTS,
            ScoreGranularity::Detail => &DETAIL_WEIGHTS,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct InterestsScore {
    pub score: u32,
    pub common: Vec<String>,
    pub total: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct FactorScore {
    pub score: u32,
    #[serde(rename = "match")]
    pub matched: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct AgeScore {
    pub score: u32,
    pub compatible: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<i32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LifestyleScore {
    pub score: u32,
    pub smoking: bool,
    pub alcohol: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScoreBreakdown {
    pub interests: InterestsScore,
    pub location: FactorScore,
    pub relationship: FactorScore,
    pub age: AgeScore,
    pub orientation: FactorScore,
    pub lifestyle: LifestyleScore,
}

#[derive(Debug, Clone, Serialize)]
pub struct Compatibility {
    pub total: u32,
    pub breakdown: ScoreBreakdown,
    pub reasons: Vec<String>,
}

/// Score `candidate` against `viewer`'s profile and preferences.
///
/// Pure: consumes two profile snapshots and the reference date, touches no
/// storage. Every factor is gated on both sides having the attribute
/// populated; a missing attribute contributes zero rather than erroring.
pub fn score_on(
    viewer: &Profile,
    candidate: &Profile,
    granularity: ScoreGranularity,
    today: NaiveDate,
) -> Compatibility {
    let weights = granularity.weights();
    let mut total = 0.0;
    let mut reasons = Vec::new();

    // Shared interests, normalized by the larger interest list
    let viewer_interests = viewer.interest_list();
    let candidate_interests = candidate.interest_list();
    let common: Vec<String> = viewer_interests
        .iter()
        .filter(|i| candidate_interests.contains(i))
        .cloned()
        .collect();

    let interests = if !common.is_empty() {
        let max_len = viewer_interests.len().max(candidate_interests.len());
        let raw = (common.len() as f64 / max_len as f64) * weights.interests;
        total += raw;
        let plural = if common.len() > 1 { "s" } else { "" };
        let listed: Vec<&str> = common.iter().take(3).map(String::as_str).collect();
        reasons.push(format!(
            "{} common interest{}: {}",
            common.len(),
            plural,
            listed.join(", ")
        ));
        InterestsScore {
            score: raw.round() as u32,
            total: common.len(),
            common,
        }
    } else {
        InterestsScore { score: 0, common: vec![], total: 0 }
    };

    // Location: case-insensitive substring containment, either direction
    let location_matched = match (viewer.location.as_deref(), candidate.location.as_deref()) {
        (Some(a), Some(b)) if !a.is_empty() && !b.is_empty() => {
            let (a, b) = (a.to_lowercase(), b.to_lowercase());
            a.contains(&b) || b.contains(&a)
        }
        _ => false,
    };
    let location = if location_matched {
        total += weights.location;
        reasons.push("Same location".to_string());
        FactorScore { score: weights.location.round() as u32, matched: true }
    } else {
        FactorScore { score: 0, matched: false }
    };

    // Candidate age within the viewer's preferred range, inclusive
    let candidate_age = candidate.age_on(today);
    let (min_age, max_age) = viewer.preferred_age_bounds();
    let age_compatible = candidate_age
        .map(|age| age > 0 && age >= min_age && age <= max_age)
        .unwrap_or(false);
    let age = if age_compatible {
        total += weights.age;
        reasons.push(format!("Age compatible ({})", candidate_age.unwrap_or_default()));
        AgeScore {
            score: weights.age.round() as u32,
            compatible: true,
            age: candidate_age,
        }
    } else {
        AgeScore { score: 0, compatible: false, age: candidate_age }
    };

    // Relationship goal
    let relationship = if eq_ci(viewer.relationship.as_deref(), candidate.relationship.as_deref()) {
        total += weights.relationship;
        reasons.push("Same relationship goals".to_string());
        FactorScore { score: weights.relationship.round() as u32, matched: true }
    } else {
        FactorScore { score: 0, matched: false }
    };

    // Orientation
    let orientation = if eq_ci(viewer.orientation.as_deref(), candidate.orientation.as_deref()) {
        total += weights.orientation;
        reasons.push("Compatible orientation".to_string());
        FactorScore { score: weights.orientation.round() as u32, matched: true }
    } else {
        FactorScore { score: 0, matched: false }
    };

    // Lifestyle: smoking and alcohol score independently
    let mut lifestyle_raw = 0.0;
    let smoking_matched = eq_ci(viewer.smoking.as_deref(), candidate.smoking.as_deref());
    if smoking_matched {
        lifestyle_raw += weights.lifestyle_each;
        reasons.push("Same smoking preference".to_string());
    }
    let alcohol_matched = eq_ci(viewer.alcohol.as_deref(), candidate.alcohol.as_deref());
    if alcohol_matched {
        lifestyle_raw += weights.lifestyle_each;
        reasons.push("Same drinking preference".to_string());
    }
    total += lifestyle_raw;
    let lifestyle = LifestyleScore {
        score: lifestyle_raw.round() as u32,
        smoking: smoking_matched,
        alcohol: alcohol_matched,
    };

    Compatibility {
        total: (total.round() as u32).min(100),
        breakdown: ScoreBreakdown {
            interests,
            location,
            relationship,
            age,
            orientation,
            lifestyle,
        },
        reasons,
    }
}

fn eq_ci(a: Option<&str>, b: Option<&str>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) if !a.is_empty() && !b.is_empty() => a.eq_ignore_ascii_case(b),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use uuid::Uuid;

    fn profile() -> Profile {
        Profile {
            id: Uuid::new_v4(),
            email: "test@example.com".into(),
            first_name: "Test".into(),
            last_name: "User".into(),
            birth_date: None,
            gender: None,
            looking_for: None,
            preferred_age_range: None,
            bio: None,
            location: None,
            profile_photo_url: None,
            interests: serde_json::json!([]),
            smoking: None,
            alcohol: None,
            relationship: None,
            orientation: None,
            role: "customer".into(),
            is_online: false,
            last_seen_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    #[test]
    fn interest_overlap_is_normalized_by_larger_list() {
        let mut viewer = profile();
        viewer.interests = serde_json::json!(["hiking", "art"]);
        let mut candidate = profile();
        candidate.interests = serde_json::json!(["hiking", "music"]);

        let result = score_on(&viewer, &candidate, ScoreGranularity::Feed, today());

        // 1 shared of max(2, 2) at weight 40
        assert_eq!(result.breakdown.interests.score, 20);
        assert_eq!(result.breakdown.interests.common, vec!["hiking"]);
        assert_eq!(result.total, 20);
        assert_eq!(result.reasons, vec!["1 common interest: hiking"]);
    }

    #[test]
    fn location_matches_on_substring_either_direction() {
        let mut viewer = profile();
        viewer.location = Some("Brooklyn, NY".into());
        let mut candidate = profile();
        candidate.location = Some("brooklyn".into());

        let result = score_on(&viewer, &candidate, ScoreGranularity::Feed, today());
        assert!(result.breakdown.location.matched);
        assert_eq!(result.total, 25);

        // And the reverse direction
        let result = score_on(&candidate, &viewer, ScoreGranularity::Feed, today());
        assert!(result.breakdown.location.matched);
    }

    #[test]
    fn age_within_preferred_range_inclusive() {
        let mut viewer = profile();
        viewer.preferred_age_range = Some(serde_json::json!("25-35"));
        let mut candidate = profile();
        candidate.birth_date = NaiveDate::from_ymd_opt(1994, 1, 10); // 30 on 2024-06-15

        let result = score_on(&viewer, &candidate, ScoreGranularity::Feed, today());
        assert!(result.breakdown.age.compatible);
        assert_eq!(result.breakdown.age.age, Some(30));
        assert_eq!(result.total, 10);
    }

    #[test]
    fn missing_birth_date_is_incompatible_not_an_error() {
        let viewer = profile();
        let candidate = profile();
        let result = score_on(&viewer, &candidate, ScoreGranularity::Feed, today());
        assert!(!result.breakdown.age.compatible);
        assert_eq!(result.breakdown.age.age, None);
    }

    #[test]
    fn lifestyle_factors_score_independently() {
        let mut viewer = profile();
        viewer.smoking = Some("Never".into());
        viewer.alcohol = Some("Socially".into());
        let mut candidate = profile();
        candidate.smoking = Some("never".into());
        candidate.alcohol = Some("often".into());

        let result = score_on(&viewer, &candidate, ScoreGranularity::Feed, today());
        assert!(result.breakdown.lifestyle.smoking);
        assert!(!result.breakdown.lifestyle.alcohol);
        // 1.5 rounds to 2
        assert_eq!(result.breakdown.lifestyle.score, 2);
        assert_eq!(result.total, 2);
    }

    fn fully_matched_pair() -> (Profile, Profile) {
        let mut viewer = profile();
        viewer.interests = serde_json::json!(["hiking", "art"]);
        viewer.location = Some("Berlin".into());
        viewer.preferred_age_range = Some(serde_json::json!({"min": 20, "max": 40}));
        viewer.relationship = Some("long-term".into());
        viewer.orientation = Some("straight".into());
        viewer.smoking = Some("never".into());
        viewer.alcohol = Some("socially".into());

        let mut candidate = viewer.clone();
        candidate.id = Uuid::new_v4();
        candidate.birth_date = NaiveDate::from_ymd_opt(1994, 1, 10);
        (viewer, candidate)
    }

    #[test]
    fn feed_weights_total_exactly_100_on_full_match() {
        let (viewer, candidate) = fully_matched_pair();
        let result = score_on(&viewer, &candidate, ScoreGranularity::Feed, today());
        assert_eq!(result.total, 100);
    }

    #[test]
    fn detail_total_is_capped_at_100() {
        let (viewer, candidate) = fully_matched_pair();
        // Detail weights sum to 115 on a full match; the cap keeps the contract.
        let result = score_on(&viewer, &candidate, ScoreGranularity::Detail, today());
        assert_eq!(result.total, 100);
        assert_eq!(result.breakdown.relationship.score, 20);
        assert_eq!(result.breakdown.age.score, 15);
        assert_eq!(result.breakdown.orientation.score, 10);
        assert_eq!(result.breakdown.lifestyle.score, 5);
    }

    #[test]
    fn score_bounds_hold_for_empty_profiles() {
        let result = score_on(&profile(), &profile(), ScoreGranularity::Feed, today());
        assert_eq!(result.total, 0);
        assert!(result.reasons.is_empty());
    }
}
