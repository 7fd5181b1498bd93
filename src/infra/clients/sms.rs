//! Outbound text messages.

use async_trait::async_trait;
use serde::Deserialize;

use super::{ClientError, RetryPolicy};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait SmsSender: Send + Sync {
    /// Send `body` to `to` and return the provider's message id.
    async fn send(&self, to: &str, body: &str) -> Result<String, ClientError>;
}

pub struct LogSmsSender;

#[async_trait]
impl SmsSender for LogSmsSender {
    async fn send(&self, to: &str, body: &str) -> Result<String, ClientError> {
        tracing::info!(to, body_len = body.len(), "SMS not configured, text logged");
        Ok(format!("logged-{}", uuid::Uuid::new_v4()))
    }
}

/// Twilio-style messages endpoint: form POST with basic auth.
pub struct TwilioSmsSender {
    client: reqwest::Client,
    url: String,
    account_sid: String,
    auth_token: String,
    from: String,
    country_code: String,
    retry: RetryPolicy,
}

#[derive(Debug, Deserialize)]
struct SentMessage {
    sid: String,
}

impl TwilioSmsSender {
    pub fn new(
        client: reqwest::Client,
        url: impl Into<String>,
        account_sid: impl Into<String>,
        auth_token: impl Into<String>,
        from: impl Into<String>,
        country_code: impl Into<String>,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            client,
            url: url.into(),
            account_sid: account_sid.into(),
            auth_token: auth_token.into(),
            from: from.into(),
            country_code: country_code.into(),
            retry,
        }
    }

    /// Ten-digit local numbers get the configured country code.
    fn e164(&self, number: &str) -> String {
        if number.starts_with('+') {
            number.to_string()
        } else {
            format!("{}{}", self.country_code, number)
        }
    }

    async fn post(&self, to: &str, body: &str) -> Result<SentMessage, ClientError> {
        let response = self
            .client
            .post(&self.url)
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .form(&[("To", to), ("From", self.from.as_str()), ("Body", body)])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ClientError::HttpStatus(response.status().as_u16()));
        }
        Ok(response.json().await?)
    }
}

#[async_trait]
impl SmsSender for TwilioSmsSender {
    async fn send(&self, to: &str, body: &str) -> Result<String, ClientError> {
        let to = self.e164(to);
        let sent = self.retry.run("sms", || self.post(&to, body)).await?;
        tracing::info!(sid = %sent.sid, "Text message sent");
        Ok(sent.sid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_numbers_get_country_code() {
        let sender = TwilioSmsSender::new(
            reqwest::Client::new(),
            "http://localhost/messages",
            "sid",
            "token",
            "+15550000000",
            "+1",
            RetryPolicy::default(),
        );
        assert_eq!(sender.e164("8015551234"), "+18015551234");
        assert_eq!(sender.e164("+448015551234"), "+448015551234");
    }
}
