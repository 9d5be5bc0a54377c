use chrono::{DateTime, Datelike, NaiveDate, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::schema::{friendships, matches, profiles, swipes};

// --- Profile ---

#[derive(Debug, Queryable, Identifiable, Serialize, Clone)]
#[diesel(table_name = profiles)]
pub struct Profile {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub birth_date: Option<NaiveDate>,
    pub gender: Option<String>,
    pub looking_for: Option<String>,
    pub preferred_age_range: Option<serde_json::Value>,
    pub bio: Option<String>,
    pub location: Option<String>,
    #[serde(rename = "profile_photo")]
    pub profile_photo_url: Option<String>,
    pub interests: serde_json::Value,
    pub smoking: Option<String>,
    pub alcohol: Option<String>,
    pub relationship: Option<String>,
    pub orientation: Option<String>,
    pub role: String,
    pub is_online: bool,
    pub last_seen_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Age as of `today`; `None` when the birth date is missing.
    pub fn age_on(&self, today: NaiveDate) -> Option<i32> {
        let dob = self.birth_date?;
        let mut age = today.year() - dob.year();
        if (today.month(), today.day()) < (dob.month(), dob.day()) {
            age -= 1;
        }
        Some(age)
    }

    pub fn age(&self) -> Option<i32> {
        self.age_on(Utc::now().date_naive())
    }

    pub fn interest_list(&self) -> Vec<String> {
        self.interests
            .as_array()
            .map(|items| {
                items
                    .iter()
                    .filter_map(|v| v.as_str().map(str::to_owned))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn preferred_age_bounds(&self) -> (i32, i32) {
        PreferredAgeRange::from_value(self.preferred_age_range.as_ref())
            .map(|range| range.bounds())
            .unwrap_or((PreferredAgeRange::DEFAULT_MIN, PreferredAgeRange::DEFAULT_MAX))
    }

    pub fn is_admin(&self) -> bool {
        self.role == "admin"
    }
}

/// Preferred age range as stored: legacy profiles carry a "min-max" string,
/// newer ones a {min, max} object. Normalized through `bounds()` everywhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreferredAgeRange {
    Bounds { min: i32, max: i32 },
    Legacy(String),
}

impl PreferredAgeRange {
    pub const DEFAULT_MIN: i32 = 18;
    pub const DEFAULT_MAX: i32 = 100;

    pub fn from_value(value: Option<&serde_json::Value>) -> Option<Self> {
        match value? {
            serde_json::Value::String(text) => Some(Self::Legacy(text.clone())),
            serde_json::Value::Object(map) => Some(Self::Bounds {
                min: map
                    .get("min")
                    .and_then(|v| v.as_i64())
                    .map(|v| v as i32)
                    .unwrap_or(Self::DEFAULT_MIN),
                max: map
                    .get("max")
                    .and_then(|v| v.as_i64())
                    .map(|v| v as i32)
                    .unwrap_or(Self::DEFAULT_MAX),
            }),
            _ => None,
        }
    }

    pub fn bounds(&self) -> (i32, i32) {
        match self {
            Self::Bounds { min, max } => (*min, *max),
            Self::Legacy(text) => {
                let mut parts = text.splitn(2, '-');
                let min = parts
                    .next()
                    .and_then(|p| p.trim().parse().ok())
                    .unwrap_or(Self::DEFAULT_MIN);
                let max = parts
                    .next()
                    .and_then(|p| p.trim().parse().ok())
                    .unwrap_or(Self::DEFAULT_MAX);
                (min, max)
            }
        }
    }
}

/// Public view of a profile as returned to clients: no role/email-verification
/// internals, derived age and full name included.
#[derive(Debug, Serialize, Clone)]
pub struct PublicProfile {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    pub email: String,
    #[serde(rename = "profile_photo")]
    pub profile_photo_url: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub looking_for: Option<String>,
    pub interests: Vec<String>,
    pub relationship: Option<String>,
    pub orientation: Option<String>,
    pub smoking: Option<String>,
    pub alcohol: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Profile> for PublicProfile {
    fn from(p: &Profile) -> Self {
        Self {
            id: p.id,
            first_name: p.first_name.clone(),
            last_name: p.last_name.clone(),
            full_name: p.full_name(),
            email: p.email.clone(),
            profile_photo_url: p.profile_photo_url.clone(),
            bio: p.bio.clone(),
            location: p.location.clone(),
            birth_date: p.birth_date,
            age: p.age(),
            gender: p.gender.clone(),
            looking_for: p.looking_for.clone(),
            interests: p.interest_list(),
            relationship: p.relationship.clone(),
            orientation: p.orientation.clone(),
            smoking: p.smoking.clone(),
            alcohol: p.alcohol.clone(),
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

// --- Swipe ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SwipeAction {
    Like,
    Dislike,
}

impl SwipeAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            SwipeAction::Like => "like",
            SwipeAction::Dislike => "dislike",
        }
    }
}

impl std::fmt::Display for SwipeAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SwipeAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "like" => Ok(SwipeAction::Like),
            "dislike" => Ok(SwipeAction::Dislike),
            _ => Err(format!("unknown swipe action: {s}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LikeType {
    Crush,
    Intrigued,
    Curious,
    Fun,
}

impl LikeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            LikeType::Crush => "crush",
            LikeType::Intrigued => "intrigued",
            LikeType::Curious => "curious",
            LikeType::Fun => "fun",
        }
    }
}

impl std::fmt::Display for LikeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for LikeType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "crush" => Ok(LikeType::Crush),
            "intrigued" => Ok(LikeType::Intrigued),
            "curious" => Ok(LikeType::Curious),
            "fun" => Ok(LikeType::Fun),
            _ => Err(format!("unknown like type: {s}")),
        }
    }
}

#[derive(Debug, Queryable, Identifiable, Serialize, Clone)]
#[diesel(table_name = swipes)]
pub struct Swipe {
    pub id: Uuid,
    pub swiper_id: Uuid,
    pub swiped_id: Uuid,
    pub action: String,
    pub like_type: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Swipe {
    pub fn is_like(&self) -> bool {
        self.action == SwipeAction::Like.as_str()
    }

    pub fn like_subtype(&self) -> Option<LikeType> {
        self.like_type.as_deref().and_then(|t| t.parse().ok())
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = swipes)]
pub struct NewSwipe {
    pub swiper_id: Uuid,
    pub swiped_id: Uuid,
    pub action: String,
    pub like_type: Option<String>,
}

// --- Match ---

#[derive(Debug, Queryable, Identifiable, Serialize, Clone)]
#[diesel(table_name = matches)]
pub struct Match {
    pub id: Uuid,
    pub user_a: Uuid,
    pub user_b: Uuid,
    pub like_type_a: Option<String>,
    pub like_type_b: Option<String>,
    pub is_mutual_emotion: bool,
    pub created_at: DateTime<Utc>,
}

impl Match {
    pub fn other_user(&self, user_id: Uuid) -> Uuid {
        if self.user_a == user_id {
            self.user_b
        } else {
            self.user_a
        }
    }

    /// (your_like_type, their_like_type) from `user_id`'s perspective.
    pub fn like_types_for(&self, user_id: Uuid) -> (Option<&str>, Option<&str>) {
        if self.user_a == user_id {
            (self.like_type_a.as_deref(), self.like_type_b.as_deref())
        } else {
            (self.like_type_b.as_deref(), self.like_type_a.as_deref())
        }
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = matches)]
pub struct NewMatch {
    pub user_a: Uuid,
    pub user_b: Uuid,
    pub like_type_a: Option<String>,
    pub like_type_b: Option<String>,
    pub is_mutual_emotion: bool,
}

// --- Friendship ---

#[derive(Debug, Queryable, Identifiable, Serialize)]
#[diesel(table_name = friendships)]
pub struct Friendship {
    pub id: Uuid,
    pub user_id: Uuid,
    pub friend_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile_with_birth_date(birth_date: Option<NaiveDate>) -> Profile {
        Profile {
            id: Uuid::new_v4(),
            email: "test@example.com".into(),
            first_name: "Jane".into(),
            last_name: "Doe".into(),
            birth_date,
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

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn age_on_the_anniversary() {
        let p = profile_with_birth_date(Some(date(1994, 6, 15)));
        assert_eq!(p.age_on(date(2024, 6, 15)), Some(30));
    }

    #[test]
    fn age_one_day_before_the_anniversary() {
        let p = profile_with_birth_date(Some(date(1994, 6, 15)));
        assert_eq!(p.age_on(date(2024, 6, 14)), Some(29));
    }

    #[test]
    fn age_without_birth_date() {
        let p = profile_with_birth_date(None);
        assert_eq!(p.age_on(date(2024, 6, 15)), None);
    }

    #[test]
    fn full_name_joins_first_and_last() {
        let p = profile_with_birth_date(None);
        assert_eq!(p.full_name(), "Jane Doe");
    }

    #[test]
    fn age_range_from_legacy_string() {
        let range = PreferredAgeRange::from_value(Some(&serde_json::json!("25-35"))).unwrap();
        assert_eq!(range, PreferredAgeRange::Legacy("25-35".into()));
        assert_eq!(range.bounds(), (25, 35));
    }

    #[test]
    fn age_range_from_object() {
        let range =
            PreferredAgeRange::from_value(Some(&serde_json::json!({"min": 21, "max": 40}))).unwrap();
        assert_eq!(range.bounds(), (21, 40));
    }

    #[test]
    fn age_range_defaults_for_unparsable_input() {
        let garbage = PreferredAgeRange::from_value(Some(&serde_json::json!("whenever"))).unwrap();
        assert_eq!(garbage.bounds(), (18, 100));

        let partial = PreferredAgeRange::from_value(Some(&serde_json::json!({"min": 30}))).unwrap();
        assert_eq!(partial.bounds(), (30, 100));

        assert!(PreferredAgeRange::from_value(Some(&serde_json::json!(42))).is_none());
        assert!(PreferredAgeRange::from_value(None).is_none());
    }

    #[test]
    fn interest_list_tolerates_non_string_entries() {
        let mut p = profile_with_birth_date(None);
        p.interests = serde_json::json!(["hiking", 7, "art"]);
        assert_eq!(p.interest_list(), vec!["hiking".to_string(), "art".to_string()]);
    }

    #[test]
    fn match_perspective_mapping() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let m = Match {
            id: Uuid::new_v4(),
            user_a: a,
            user_b: b,
            like_type_a: Some("crush".into()),
            like_type_b: Some("fun".into()),
            is_mutual_emotion: false,
            created_at: Utc::now(),
        };

        assert_eq!(m.other_user(a), b);
        assert_eq!(m.other_user(b), a);
        assert_eq!(m.like_types_for(a), (Some("crush"), Some("fun")));
        assert_eq!(m.like_types_for(b), (Some("fun"), Some("crush")));
    }
}
