//! Role profiles and the account that pairs them with an identity.

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::{User, UserRole};
use crate::config::{DEFAULT_GIG_RANGE_KM, PHONE_NUMBER_LENGTH};
use crate::errors::{AppError, AppResult, FieldErrors};

static PHONE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"^\d{{{}}}$", PHONE_NUMBER_LENGTH)).expect("phone pattern is valid")
});

/// How a dater wants to be reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum CommunicationPreference {
    #[default]
    Email,
    Text,
}

text_enum!(CommunicationPreference {
    Email => "email",
    Text => "text",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum CupidStatus {
    #[default]
    Offline,
    Gigging,
    Available,
}

text_enum!(CupidStatus {
    Offline => "offline",
    Gigging => "gigging",
    Available => "available",
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DaterProfile {
    pub phone_number: String,
    /// Default budget for new gigs, in cents
    pub budget_cents: i64,
    pub communication_preference: CommunicationPreference,
    pub description: String,
    pub dating_strengths: String,
    pub dating_weaknesses: String,
    pub interests: String,
    pub past: String,
    pub nerd_type: String,
    pub relationship_goals: String,
    pub ai_degree: String,
    pub location: String,
    pub balance_cents: i64,
    pub rating_sum: i64,
    pub rating_count: i64,
    pub suspended: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CupidProfile {
    pub accepting_gigs: bool,
    pub gigs_completed: i32,
    pub gigs_failed: i32,
    pub payout: String,
    pub status: CupidStatus,
    pub balance_cents: i64,
    pub location: String,
    pub gig_range_km: f64,
    pub rating_sum: i64,
    pub rating_count: i64,
    pub suspended: bool,
}

/// Role-specific data. Managers have none.
#[derive(Debug, Clone, PartialEq)]
pub enum Profile {
    Dater(DaterProfile),
    Cupid(CupidProfile),
    Manager,
}

impl Profile {
    pub fn role(&self) -> UserRole {
        match self {
            Profile::Dater(_) => UserRole::Dater,
            Profile::Cupid(_) => UserRole::Cupid,
            Profile::Manager => UserRole::Manager,
        }
    }

    pub fn location(&self) -> Option<&str> {
        match self {
            Profile::Dater(d) => Some(&d.location),
            Profile::Cupid(c) => Some(&c.location),
            Profile::Manager => None,
        }
    }

    pub fn balance_cents(&self) -> Option<i64> {
        match self {
            Profile::Dater(d) => Some(d.balance_cents),
            Profile::Cupid(c) => Some(c.balance_cents),
            Profile::Manager => None,
        }
    }

    /// Check a stored profile against every field rule, collecting all failures.
    pub fn validate(&self) -> AppResult<()> {
        let mut fields = FieldErrors::new();
        let mut fail = |field: &str, message: &str| {
            fields
                .entry(field.to_string())
                .or_default()
                .push(message.to_string());
        };

        match self {
            Profile::Dater(d) => {
                if !PHONE_RE.is_match(&d.phone_number) {
                    fail("phone_number", "Phone number must be 10 digits");
                }
                if d.budget_cents < 0 {
                    fail("budget_cents", "Budget cannot be negative");
                }
                if d.balance_cents < 0 {
                    fail("balance_cents", "Balance cannot be negative");
                }
                check_ratings(d.rating_sum, d.rating_count, &mut fail);
            }
            Profile::Cupid(c) => {
                if !(c.gig_range_km.is_finite() && c.gig_range_km > 0.0) {
                    fail("gig_range_km", "Gig range must be positive");
                }
                if c.gigs_completed < 0 || c.gigs_failed < 0 {
                    fail("gigs", "Gig counters cannot be negative");
                }
                if c.balance_cents < 0 {
                    fail("balance_cents", "Balance cannot be negative");
                }
                check_ratings(c.rating_sum, c.rating_count, &mut fail);
            }
            Profile::Manager => {}
        }

        if fields.is_empty() {
            Ok(())
        } else {
            Err(AppError::InvalidFields(fields))
        }
    }
}

fn check_ratings(sum: i64, count: i64, fail: &mut impl FnMut(&str, &str)) {
    if count < 0 || sum < count || sum > count * 5 {
        fail("rating", "Rating totals are inconsistent");
    }
}

/// An identity together with its role profile.
#[derive(Debug, Clone)]
pub struct Account {
    pub user: User,
    pub profile: Profile,
}

impl Account {
    pub fn id(&self) -> Uuid {
        self.user.id
    }
}

/// Editable dater fields, as submitted on sign-up and profile updates.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct DaterProfileInput {
    #[validate(regex(path = *PHONE_RE, message = "Phone number must be 10 digits"))]
    #[schema(example = "4355551234")]
    pub phone_number: String,
    #[validate(range(min = 0, message = "Budget cannot be negative"))]
    #[schema(example = 5000)]
    pub budget_cents: i64,
    #[serde(default)]
    pub communication_preference: CommunicationPreference,
    #[serde(default)]
    #[validate(length(max = 2000))]
    pub description: String,
    #[serde(default)]
    #[validate(length(max = 2000))]
    pub dating_strengths: String,
    #[serde(default)]
    #[validate(length(max = 2000))]
    pub dating_weaknesses: String,
    #[serde(default)]
    #[validate(length(max = 2000))]
    pub interests: String,
    #[serde(default)]
    #[validate(length(max = 2000))]
    pub past: String,
    #[serde(default)]
    #[validate(length(max = 255))]
    pub nerd_type: String,
    #[serde(default)]
    #[validate(length(max = 2000))]
    pub relationship_goals: String,
    #[serde(default)]
    #[validate(length(max = 255))]
    pub ai_degree: String,
    #[validate(length(min = 1, max = 255, message = "Location is required"))]
    #[schema(example = "41.7370,-111.8338")]
    pub location: String,
}

impl DaterProfileInput {
    /// A fresh profile: no balance, no ratings, not suspended.
    pub fn into_profile(self) -> DaterProfile {
        DaterProfile {
            phone_number: self.phone_number,
            budget_cents: self.budget_cents,
            communication_preference: self.communication_preference,
            description: self.description,
            dating_strengths: self.dating_strengths,
            dating_weaknesses: self.dating_weaknesses,
            interests: self.interests,
            past: self.past,
            nerd_type: self.nerd_type,
            relationship_goals: self.relationship_goals,
            ai_degree: self.ai_degree,
            location: self.location,
            balance_cents: 0,
            rating_sum: 0,
            rating_count: 0,
            suspended: false,
        }
    }
}

/// Editable cupid fields.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CupidProfileInput {
    #[serde(default = "default_accepting")]
    pub accepting_gigs: bool,
    #[serde(default)]
    #[validate(length(max = 255))]
    pub payout: String,
    #[validate(length(min = 1, max = 255, message = "Location is required"))]
    #[schema(example = "41.7370,-111.8338")]
    pub location: String,
    #[validate(range(min = 0.1, max = 500.0, message = "Gig range must be between 0.1 and 500 km"))]
    pub gig_range_km: Option<f64>,
}

fn default_accepting() -> bool {
    true
}

impl CupidProfileInput {
    /// A fresh, available profile with the default range when none is given.
    pub fn into_profile(self) -> CupidProfile {
        CupidProfile {
            accepting_gigs: self.accepting_gigs,
            gigs_completed: 0,
            gigs_failed: 0,
            payout: self.payout,
            status: CupidStatus::Available,
            balance_cents: 0,
            location: self.location,
            gig_range_km: self.gig_range_km.unwrap_or(DEFAULT_GIG_RANGE_KM),
            rating_sum: 0,
            rating_count: 0,
            suspended: false,
        }
    }
}

/// Identity merged with the role profile, keyed by role.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AccountResponse {
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub id: Uuid,
    #[schema(example = "jdoe")]
    pub username: String,
    #[schema(example = "jdoe@example.com")]
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: UserRole,
    pub is_staff: bool,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dater: Option<DaterProfile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cupid: Option<CupidProfile>,
}

impl From<Account> for AccountResponse {
    fn from(account: Account) -> Self {
        let Account { user, profile } = account;
        let (dater, cupid) = match profile {
            Profile::Dater(d) => (Some(d), None),
            Profile::Cupid(c) => (None, Some(c)),
            Profile::Manager => (None, None),
        };

        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            role: user.role,
            is_staff: user.is_staff,
            created_at: user.created_at,
            dater,
            cupid,
        }
    }
}
