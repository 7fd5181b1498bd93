//! Calendar service - the dates a dater has lined up.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::domain::{NewOuting, Outing, Principal, UserRole};
use crate::errors::AppResult;
use crate::infra::UnitOfWork;

#[async_trait]
pub trait CalendarService: Send + Sync {
    async fn dates(&self, principal: Principal, dater_id: Uuid) -> AppResult<Vec<Outing>>;

    /// Put a date on the caller's own calendar
    async fn schedule(&self, principal: Principal, outing: NewOuting) -> AppResult<Outing>;
}

pub struct CalendarManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> CalendarManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> CalendarService for CalendarManager<U> {
    async fn dates(&self, principal: Principal, dater_id: Uuid) -> AppResult<Vec<Outing>> {
        principal.require_self_or_staff(dater_id)?;
        self.uow.calendar().list_for_dater(dater_id).await
    }

    async fn schedule(&self, principal: Principal, outing: NewOuting) -> AppResult<Outing> {
        principal.require_role(UserRole::Dater)?;
        outing.validate()?;

        let outing = self.uow.calendar().create(principal.user_id, outing).await?;
        tracing::debug!(dater_id = %principal.user_id, outing_id = %outing.id, "Date scheduled");
        Ok(outing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::OutingStatus;
    use crate::errors::AppError;
    use crate::infra::repositories::MockCalendarRepository;
    use crate::services::test_support::TestUnitOfWork;
    use chrono::Utc;

    fn with_calendar(calendar: MockCalendarRepository) -> CalendarManager<TestUnitOfWork> {
        CalendarManager::new(Arc::new(TestUnitOfWork {
            calendar: Arc::new(calendar),
            ..Default::default()
        }))
    }

    fn outing() -> NewOuting {
        NewOuting {
            scheduled_at: Utc::now(),
            location: "Riverwoods".into(),
            description: "Picnic".into(),
            status: OutingStatus::Planned,
            budget_cents: 4_000,
        }
    }

    #[tokio::test]
    async fn test_schedule_goes_on_callers_calendar() {
        let dater_id = Uuid::new_v4();
        let mut calendar = MockCalendarRepository::new();
        calendar
            .expect_create()
            .withf(move |id, _| *id == dater_id)
            .returning(|id, new| {
                Ok(Outing {
                    id: Uuid::new_v4(),
                    dater_id: id,
                    scheduled_at: new.scheduled_at,
                    location: new.location,
                    description: new.description,
                    status: new.status,
                    budget_cents: new.budget_cents,
                })
            });

        let caller = Principal::new(dater_id, UserRole::Dater, false);
        let saved = with_calendar(calendar).schedule(caller, outing()).await.unwrap();
        assert_eq!(saved.dater_id, dater_id);
        assert_eq!(saved.location, "Riverwoods");
    }

    #[tokio::test]
    async fn test_cupids_have_no_calendar() {
        let caller = Principal::new(Uuid::new_v4(), UserRole::Cupid, false);
        assert!(matches!(
            with_calendar(MockCalendarRepository::new())
                .schedule(caller, outing())
                .await,
            Err(AppError::Forbidden)
        ));
    }

    #[tokio::test]
    async fn test_other_daters_calendar_is_private() {
        let caller = Principal::new(Uuid::new_v4(), UserRole::Dater, false);
        assert!(matches!(
            with_calendar(MockCalendarRepository::new())
                .dates(caller, Uuid::new_v4())
                .await,
            Err(AppError::Forbidden)
        ));
    }
}
