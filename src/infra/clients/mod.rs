//! External service adapters.
//!
//! Each concern sits behind a single-method trait so services can be wired
//! with the HTTP/SMTP implementation, a fallback, or a test double. Calls run
//! outside database transactions and go through [`RetryPolicy`].

mod ai;
mod email;
mod geocoder;
mod places;
mod retry;
mod sms;

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

use crate::config::ClientConfig;

pub use ai::{
    ChatResponder, HttpTranscriber, OpenAiChatResponder, Transcriber, UnconfiguredChat,
    UnconfiguredTranscriber,
};
pub use email::{EmailSender, LogEmailSender, SmtpEmailSender};
pub use geocoder::{CoordinateGeocoder, Geocoder, HttpGeocoder};
pub use places::{Place, PlacesLookup, UnconfiguredPlaces, YelpPlaces};
pub use retry::RetryPolicy;
pub use sms::{LogSmsSender, SmsSender, TwilioSmsSender};

#[cfg(any(test, feature = "test-utils"))]
pub use ai::{MockChatResponder, MockTranscriber};
#[cfg(any(test, feature = "test-utils"))]
pub use email::MockEmailSender;
#[cfg(any(test, feature = "test-utils"))]
pub use geocoder::MockGeocoder;
#[cfg(any(test, feature = "test-utils"))]
pub use places::MockPlacesLookup;
#[cfg(any(test, feature = "test-utils"))]
pub use sms::MockSmsSender;

/// Error type for adapter failures.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The underlying HTTP request failed (network, DNS, timeout, body).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The remote server returned a non-2xx status code.
    #[error("upstream returned HTTP {0}")]
    HttpStatus(u16),

    /// SMTP transport failure.
    #[error("SMTP transport error: {0}")]
    Transport(String),

    /// The email could not be addressed or assembled.
    #[error("email build error: {0}")]
    Email(String),

    #[error("{0} service is not configured")]
    NotConfigured(&'static str),

    #[error("unexpected upstream response: {0}")]
    Decode(String),
}

impl ClientError {
    /// Transient failures worth another attempt.
    pub fn is_retryable(&self) -> bool {
        match self {
            ClientError::Request(e) => !e.is_decode() && !e.is_builder(),
            ClientError::HttpStatus(status) => *status >= 500 || *status == 429,
            ClientError::Transport(_) => true,
            ClientError::Email(_) | ClientError::NotConfigured(_) | ClientError::Decode(_) => {
                false
            }
        }
    }
}

/// Every adapter the services need, chosen from configuration.
#[derive(Clone)]
pub struct Adapters {
    pub geocoder: Arc<dyn Geocoder>,
    pub places: Arc<dyn PlacesLookup>,
    pub email: Arc<dyn EmailSender>,
    pub sms: Arc<dyn SmsSender>,
    pub transcriber: Arc<dyn Transcriber>,
    pub chat: Arc<dyn ChatResponder>,
}

impl Adapters {
    /// HTTP/SMTP adapters for configured services, fallbacks for the rest.
    pub fn from_config(config: &ClientConfig) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        let retry = RetryPolicy::new(config.retry_attempts, config.retry_backoff_ms);

        let geocoder: Arc<dyn Geocoder> = match &config.geocoder_url {
            Some(url) => Arc::new(HttpGeocoder::new(client.clone(), url, retry)),
            None => Arc::new(CoordinateGeocoder),
        };

        let places: Arc<dyn PlacesLookup> = match (&config.places_url, &config.places_api_key) {
            (Some(url), Some(key)) => Arc::new(YelpPlaces::new(client.clone(), url, key, retry)),
            _ => Arc::new(UnconfiguredPlaces),
        };

        let email: Arc<dyn EmailSender> = match (&config.smtp_host, &config.smtp_from) {
            (Some(host), Some(from)) => {
                let credentials = config
                    .smtp_username
                    .clone()
                    .zip(config.smtp_password.clone());
                Arc::new(SmtpEmailSender::new(
                    host,
                    config.smtp_port,
                    credentials,
                    from,
                    retry,
                )?)
            }
            _ => Arc::new(LogEmailSender),
        };

        let sms: Arc<dyn SmsSender> = match (
            &config.sms_url,
            &config.sms_account_sid,
            &config.sms_auth_token,
            &config.sms_from,
        ) {
            (Some(url), Some(sid), Some(token), Some(from)) => Arc::new(TwilioSmsSender::new(
                client.clone(),
                url,
                sid,
                token,
                from,
                &config.sms_country_code,
                retry,
            )),
            _ => Arc::new(LogSmsSender),
        };

        let transcriber: Arc<dyn Transcriber> = match &config.stt_url {
            Some(url) => Arc::new(HttpTranscriber::new(
                client.clone(),
                url,
                config.stt_api_key.clone(),
                retry,
            )),
            None => Arc::new(UnconfiguredTranscriber),
        };

        let chat: Arc<dyn ChatResponder> = match &config.ai_url {
            Some(url) => Arc::new(OpenAiChatResponder::new(
                client,
                url,
                config.ai_api_key.clone(),
                &config.ai_model,
                retry,
            )),
            None => Arc::new(UnconfiguredChat),
        };

        tracing::debug!(?config, "External adapters configured");

        Ok(Self {
            geocoder,
            places,
            email,
            sms,
            transcriber,
            chat,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_statuses() {
        assert!(ClientError::HttpStatus(503).is_retryable());
        assert!(ClientError::HttpStatus(429).is_retryable());
        assert!(!ClientError::HttpStatus(404).is_retryable());
        assert!(!ClientError::NotConfigured("ai").is_retryable());
    }

    #[tokio::test]
    async fn test_unconfigured_uses_fallbacks() {
        let adapters = Adapters::from_config(&ClientConfig::unconfigured()).unwrap();
        assert!(adapters.email.send("a@b.com", "s", "b").await.is_ok());
        assert!(adapters.sms.send("8015551234", "hi").await.is_ok());
        assert!(matches!(
            adapters.chat.respond("hi").await,
            Err(ClientError::NotConfigured(_))
        ));
    }
}
