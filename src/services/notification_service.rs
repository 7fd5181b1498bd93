//! Notification service - reach a user over their preferred channel.

use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::NOTIFICATION_SUBJECT;
use crate::domain::{CommunicationPreference, Profile};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::{EmailSender, SmsSender, UnitOfWork};

/// Channel a notification went out on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Email,
    Text,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct NotificationReceipt {
    pub channel: Channel,
    /// Provider message id for texts
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

#[cfg_attr(any(test, feature = "test-utils"), mockall::automock)]
#[async_trait]
pub trait NotificationService: Send + Sync {
    /// Send `message` to the user. Daters choose email or text; cupids are emailed.
    async fn notify(&self, user_id: Uuid, message: String) -> AppResult<NotificationReceipt>;
}

pub struct Notifier<U: UnitOfWork> {
    uow: Arc<U>,
    email: Arc<dyn EmailSender>,
    sms: Arc<dyn SmsSender>,
}

impl<U: UnitOfWork> Notifier<U> {
    pub fn new(uow: Arc<U>, email: Arc<dyn EmailSender>, sms: Arc<dyn SmsSender>) -> Self {
        Self { uow, email, sms }
    }
}

#[async_trait]
impl<U: UnitOfWork> NotificationService for Notifier<U> {
    async fn notify(&self, user_id: Uuid, message: String) -> AppResult<NotificationReceipt> {
        let account = self
            .uow
            .accounts()
            .find_account(user_id)
            .await?
            .ok_or_not_found()?;

        let text_to = match &account.profile {
            Profile::Dater(d) if d.communication_preference == CommunicationPreference::Text => {
                Some(d.phone_number.clone())
            }
            Profile::Dater(_) | Profile::Cupid(_) => None,
            Profile::Manager => {
                return Err(AppError::bad_request("Managers do not receive notifications"))
            }
        };

        match text_to {
            Some(phone) => {
                let sid = self.sms.send(&phone, &message).await?;
                tracing::info!(user_id = %user_id, sid = %sid, "Text notification sent");
                Ok(NotificationReceipt {
                    channel: Channel::Text,
                    reference: Some(sid),
                })
            }
            None => {
                self.email
                    .send(&account.user.email, NOTIFICATION_SUBJECT, &message)
                    .await?;
                tracing::info!(user_id = %user_id, "Email notification sent");
                Ok(NotificationReceipt {
                    channel: Channel::Email,
                    reference: None,
                })
            }
        }
    }
}

/// Send in the background; failures are logged and never reach the caller.
pub fn dispatch(notifier: Arc<dyn NotificationService>, user_id: Uuid, message: String) {
    tokio::spawn(async move {
        if let Err(e) = notifier.notify(user_id, message).await {
            tracing::warn!(user_id = %user_id, error = %e, "Notification failed");
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Account, DaterProfile, User, UserRole};
    use crate::infra::clients::{ClientError, MockEmailSender, MockSmsSender};
    use crate::infra::repositories::MockAccountRepository;
    use crate::services::test_support::TestUnitOfWork;
    use chrono::Utc;

    fn dater_account(id: Uuid, preference: CommunicationPreference) -> Account {
        let now = Utc::now();
        Account {
            user: User {
                id,
                username: "jo".into(),
                email: "jo@example.com".into(),
                password_hash: String::new(),
                first_name: "Jo".into(),
                last_name: "Dater".into(),
                role: UserRole::Dater,
                is_active: true,
                is_staff: false,
                created_at: now,
                updated_at: now,
            },
            profile: Profile::Dater(DaterProfile {
                phone_number: "4355551234".into(),
                budget_cents: 0,
                communication_preference: preference,
                description: String::new(),
                dating_strengths: String::new(),
                dating_weaknesses: String::new(),
                interests: String::new(),
                past: String::new(),
                nerd_type: String::new(),
                relationship_goals: String::new(),
                ai_degree: String::new(),
                location: String::new(),
                balance_cents: 0,
                rating_sum: 0,
                rating_count: 0,
                suspended: false,
            }),
        }
    }

    fn notifier(
        preference: CommunicationPreference,
        email: MockEmailSender,
        sms: MockSmsSender,
    ) -> (Notifier<TestUnitOfWork>, Uuid) {
        let id = Uuid::new_v4();
        let mut accounts = MockAccountRepository::new();
        accounts
            .expect_find_account()
            .returning(move |_| Ok(Some(dater_account(id, preference))));

        let service = Notifier::new(
            Arc::new(TestUnitOfWork::with_accounts(accounts)),
            Arc::new(email),
            Arc::new(sms),
        );
        (service, id)
    }

    #[tokio::test]
    async fn test_email_preference_sends_email() {
        let mut email = MockEmailSender::new();
        email
            .expect_send()
            .withf(|to, subject, body| {
                to == "jo@example.com" && subject == NOTIFICATION_SUBJECT && body == "hi"
            })
            .times(1)
            .returning(|_, _, _| Ok(()));

        let (service, id) = notifier(CommunicationPreference::Email, email, MockSmsSender::new());
        let receipt = service.notify(id, "hi".into()).await.unwrap();
        assert_eq!(receipt.channel, Channel::Email);
    }

    #[tokio::test]
    async fn test_text_preference_sends_sms() {
        let mut sms = MockSmsSender::new();
        sms.expect_send()
            .withf(|to, _| to == "4355551234")
            .times(1)
            .returning(|_, _| Ok("SM123".to_string()));

        let (service, id) = notifier(CommunicationPreference::Text, MockEmailSender::new(), sms);
        let receipt = service.notify(id, "hi".into()).await.unwrap();
        assert_eq!(receipt.channel, Channel::Text);
        assert_eq!(receipt.reference.as_deref(), Some("SM123"));
    }

    #[tokio::test]
    async fn test_upstream_failure_surfaces() {
        let mut sms = MockSmsSender::new();
        sms.expect_send()
            .returning(|_, _| Err(ClientError::HttpStatus(503)));

        let (service, id) = notifier(CommunicationPreference::Text, MockEmailSender::new(), sms);
        assert!(matches!(
            service.notify(id, "hi".into()).await,
            Err(AppError::Upstream(_))
        ));
    }
}
