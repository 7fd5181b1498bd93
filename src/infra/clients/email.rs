//! Outbound email over SMTP.

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use super::{ClientError, RetryPolicy};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), ClientError>;
}

/// Writes the email to the log instead of sending it.
pub struct LogEmailSender;

#[async_trait]
impl EmailSender for LogEmailSender {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), ClientError> {
        tracing::info!(to, subject, body_len = body.len(), "SMTP not configured, email logged");
        Ok(())
    }
}

pub struct SmtpEmailSender {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from: String,
    retry: RetryPolicy,
}

impl SmtpEmailSender {
    pub fn new(
        host: &str,
        port: u16,
        credentials: Option<(String, String)>,
        from: impl Into<String>,
        retry: RetryPolicy,
    ) -> Result<Self, ClientError> {
        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)
            .map_err(|e| ClientError::Email(e.to_string()))?
            .port(port);

        if let Some((user, password)) = credentials {
            builder = builder.credentials(Credentials::new(user, password));
        }

        Ok(Self {
            mailer: builder.build(),
            from: from.into(),
            retry,
        })
    }

    fn build(&self, to: &str, subject: &str, body: &str) -> Result<Message, ClientError> {
        let from = self
            .from
            .parse()
            .map_err(|e: lettre::address::AddressError| ClientError::Email(e.to_string()))?;
        let to = to
            .parse()
            .map_err(|e: lettre::address::AddressError| ClientError::Email(e.to_string()))?;

        Message::builder()
            .from(from)
            .to(to)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())
            .map_err(|e| ClientError::Email(e.to_string()))
    }
}

#[async_trait]
impl EmailSender for SmtpEmailSender {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), ClientError> {
        let message = self.build(to, subject, body)?;

        self.retry
            .run("smtp", || async {
                self.mailer
                    .send(message.clone())
                    .await
                    .map(|_| ())
                    .map_err(|e| ClientError::Transport(e.to_string()))
            })
            .await?;

        tracing::info!(to, subject, "Notification email sent");
        Ok(())
    }
}
