//! Gigs, the quests they carry, and the lifecycle rules between them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::GeoPoint;

/// Gig lifecycle: `unclaimed -> claimed -> complete`, with `claimed -> unclaimed`
/// (or `dropped`) when the cupid walks away.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum GigStatus {
    Unclaimed,
    Claimed,
    Complete,
    Dropped,
}

text_enum!(GigStatus {
    Unclaimed => "unclaimed",
    Claimed => "claimed",
    Complete => "complete",
    Dropped => "dropped",
});

impl GigStatus {
    /// Statuses in which a cupid is attached to the gig
    pub fn has_cupid(&self) -> bool {
        matches!(self, GigStatus::Claimed | GigStatus::Complete)
    }
}

/// Where a dropped gig goes next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DropPolicy {
    /// Back to the pool for another cupid
    #[default]
    Reopen,
    /// Retired as `dropped`
    Terminal,
}

text_enum!(DropPolicy {
    Reopen => "reopen",
    Terminal => "terminal",
});

impl DropPolicy {
    pub fn released_status(&self) -> GigStatus {
        match self {
            DropPolicy::Reopen => GigStatus::Unclaimed,
            DropPolicy::Terminal => GigStatus::Dropped,
        }
    }
}

/// The errand itself. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Quest {
    pub id: Uuid,
    pub budget_cents: i64,
    pub items_requested: String,
    pub pickup_location: String,
    /// Resolved coordinates of the pickup location, if the geocoder found any
    pub pickup: Option<GeoPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Gig {
    pub id: Uuid,
    pub status: GigStatus,
    pub dater_id: Uuid,
    pub cupid_id: Option<Uuid>,
    pub quest: Quest,
    pub requested_at: DateTime<Utc>,
    pub claimed_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub accept_count: i32,
    pub drop_count: i32,
}

impl Gig {
    pub fn is_assigned_to(&self, cupid_id: Uuid) -> bool {
        self.cupid_id == Some(cupid_id)
    }

    /// The gig's dater or its assigned cupid
    pub fn is_party(&self, user_id: Uuid) -> bool {
        self.dater_id == user_id || self.is_assigned_to(user_id)
    }

    /// A cupid is attached exactly when the status says one should be.
    pub fn assignment_is_consistent(&self) -> bool {
        self.status.has_cupid() == self.cupid_id.is_some()
    }
}

/// Quest fields submitted with a gig request.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct NewQuest {
    #[validate(range(min = 0, message = "Budget cannot be negative"))]
    #[schema(example = 2500)]
    pub budget_cents: i64,
    #[validate(length(min = 1, max = 500, message = "Items requested cannot be empty"))]
    #[schema(example = "A dozen red roses")]
    pub items_requested: String,
    #[validate(length(min = 1, max = 255, message = "Pickup location is required"))]
    #[schema(example = "123 Main St")]
    pub pickup_location: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn gig(status: GigStatus, cupid_id: Option<Uuid>) -> Gig {
        Gig {
            id: Uuid::new_v4(),
            status,
            dater_id: Uuid::new_v4(),
            cupid_id,
            quest: Quest {
                id: Uuid::new_v4(),
                budget_cents: 1_000,
                items_requested: "flowers".into(),
                pickup_location: "123 Main St".into(),
                pickup: None,
            },
            requested_at: Utc::now(),
            claimed_at: None,
            completed_at: None,
            accept_count: 0,
            drop_count: 0,
        }
    }

    #[test]
    fn test_drop_policy_targets() {
        assert_eq!(DropPolicy::Reopen.released_status(), GigStatus::Unclaimed);
        assert_eq!(DropPolicy::Terminal.released_status(), GigStatus::Dropped);
        assert_eq!(DropPolicy::from_str("terminal").unwrap(), DropPolicy::Terminal);
        assert!(DropPolicy::from_str("forever").is_err());
    }

    #[test]
    fn test_assignment_consistency() {
        let cupid = Uuid::new_v4();
        assert!(gig(GigStatus::Unclaimed, None).assignment_is_consistent());
        assert!(gig(GigStatus::Claimed, Some(cupid)).assignment_is_consistent());
        assert!(gig(GigStatus::Complete, Some(cupid)).assignment_is_consistent());
        assert!(!gig(GigStatus::Claimed, None).assignment_is_consistent());
        assert!(!gig(GigStatus::Dropped, Some(cupid)).assignment_is_consistent());
    }

    #[test]
    fn test_parties() {
        let cupid = Uuid::new_v4();
        let g = gig(GigStatus::Claimed, Some(cupid));
        assert!(g.is_party(g.dater_id));
        assert!(g.is_party(cupid));
        assert!(!g.is_party(Uuid::new_v4()));
    }

    #[test]
    fn test_new_quest_validation() {
        let quest = NewQuest {
            budget_cents: -5,
            items_requested: String::new(),
            pickup_location: "somewhere".into(),
        };
        let errors = quest.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("budget_cents"));
        assert!(errors.field_errors().contains_key("items_requested"));
    }
}
