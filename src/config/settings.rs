//! Application settings loaded from environment variables.

use std::env;
use std::str::FromStr;

use super::constants::{
    DEFAULT_AI_MODEL, DEFAULT_DATABASE_URL, DEFAULT_JWT_EXPIRATION_HOURS,
    DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_RETRY_ATTEMPTS, DEFAULT_RETRY_BACKOFF_MS,
    DEFAULT_SERVER_HOST, DEFAULT_SERVER_PORT, DEFAULT_SMS_COUNTRY_CODE, DEFAULT_SMTP_PORT,
    MIN_JWT_SECRET_LENGTH,
};
use crate::domain::DropPolicy;

/// Application configuration
#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    jwt_secret: String,
    pub jwt_expiration_hours: i64,
    pub server_host: String,
    pub server_port: u16,
    /// What happens to a gig its cupid drops
    pub gig_drop_policy: DropPolicy,
    pub clients: ClientConfig,
}

/// Endpoints and credentials of the external services.
///
/// Every service is optional: an unset URL selects the fallback adapter.
#[derive(Clone, Default)]
pub struct ClientConfig {
    pub retry_attempts: u32,
    pub retry_backoff_ms: u64,
    pub request_timeout_secs: u64,

    pub geocoder_url: Option<String>,

    pub places_url: Option<String>,
    pub places_api_key: Option<String>,

    pub ai_url: Option<String>,
    pub ai_api_key: Option<String>,
    pub ai_model: String,

    pub stt_url: Option<String>,
    pub stt_api_key: Option<String>,

    pub sms_url: Option<String>,
    pub sms_account_sid: Option<String>,
    pub sms_auth_token: Option<String>,
    pub sms_from: Option<String>,
    pub sms_country_code: String,

    pub smtp_host: Option<String>,
    pub smtp_port: u16,
    pub smtp_username: Option<String>,
    pub smtp_password: Option<String>,
    pub smtp_from: Option<String>,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &"[REDACTED]")
            .field("jwt_secret", &"[REDACTED]")
            .field("jwt_expiration_hours", &self.jwt_expiration_hours)
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .field("gig_drop_policy", &self.gig_drop_policy)
            .field("clients", &self.clients)
            .finish()
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let configured = |v: &Option<String>| if v.is_some() { "[SET]" } else { "[UNSET]" };

        f.debug_struct("ClientConfig")
            .field("retry_attempts", &self.retry_attempts)
            .field("retry_backoff_ms", &self.retry_backoff_ms)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("geocoder_url", &self.geocoder_url)
            .field("places_url", &self.places_url)
            .field("places_api_key", &configured(&self.places_api_key))
            .field("ai_url", &self.ai_url)
            .field("ai_api_key", &configured(&self.ai_api_key))
            .field("ai_model", &self.ai_model)
            .field("stt_url", &self.stt_url)
            .field("stt_api_key", &configured(&self.stt_api_key))
            .field("sms_url", &self.sms_url)
            .field("sms_account_sid", &configured(&self.sms_account_sid))
            .field("sms_auth_token", &configured(&self.sms_auth_token))
            .field("smtp_host", &self.smtp_host)
            .field("smtp_password", &configured(&self.smtp_password))
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Panics
    /// Panics if JWT_SECRET is not set or is too short (security requirement).
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let jwt_secret = env::var("JWT_SECRET").unwrap_or_else(|_| {
            if cfg!(debug_assertions) {
                tracing::warn!("JWT_SECRET not set, using insecure default for development");
                "dev-secret-key-minimum-32-chars!!".to_string()
            } else {
                panic!("JWT_SECRET environment variable must be set in production");
            }
        });

        if jwt_secret.len() < MIN_JWT_SECRET_LENGTH {
            panic!(
                "JWT_SECRET must be at least {} characters long",
                MIN_JWT_SECRET_LENGTH
            );
        }

        let gig_drop_policy = match env::var("GIG_DROP_POLICY") {
            Ok(raw) => DropPolicy::from_str(&raw).unwrap_or_else(|_| {
                tracing::warn!(value = %raw, "Unknown GIG_DROP_POLICY, falling back to reopen");
                DropPolicy::default()
            }),
            Err(_) => DropPolicy::default(),
        };

        Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
            jwt_secret,
            jwt_expiration_hours: parsed("JWT_EXPIRATION_HOURS", DEFAULT_JWT_EXPIRATION_HOURS),
            server_host: env::var("SERVER_HOST")
                .unwrap_or_else(|_| DEFAULT_SERVER_HOST.to_string()),
            server_port: parsed("SERVER_PORT", DEFAULT_SERVER_PORT),
            gig_drop_policy,
            clients: ClientConfig::from_env(),
        }
    }

    /// Build a configuration with defaults for everything but the store and signing key.
    ///
    /// No external services are configured; the fallback adapters apply.
    pub fn new(database_url: impl Into<String>, jwt_secret: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            jwt_secret: jwt_secret.into(),
            jwt_expiration_hours: DEFAULT_JWT_EXPIRATION_HOURS,
            server_host: DEFAULT_SERVER_HOST.to_string(),
            server_port: DEFAULT_SERVER_PORT,
            gig_drop_policy: DropPolicy::default(),
            clients: ClientConfig::unconfigured(),
        }
    }

    /// Get JWT secret bytes for token signing/verification.
    pub fn jwt_secret_bytes(&self) -> &[u8] {
        self.jwt_secret.as_bytes()
    }

    /// Get the full server address.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

impl ClientConfig {
    fn from_env() -> Self {
        Self {
            retry_attempts: parsed("ADAPTER_RETRY_ATTEMPTS", DEFAULT_RETRY_ATTEMPTS),
            retry_backoff_ms: parsed("ADAPTER_RETRY_BACKOFF_MS", DEFAULT_RETRY_BACKOFF_MS),
            request_timeout_secs: parsed("ADAPTER_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS),
            geocoder_url: optional("GEOCODER_URL"),
            places_url: optional("PLACES_URL"),
            places_api_key: optional("PLACES_API_KEY"),
            ai_url: optional("AI_URL"),
            ai_api_key: optional("AI_API_KEY"),
            ai_model: env::var("AI_MODEL").unwrap_or_else(|_| DEFAULT_AI_MODEL.to_string()),
            stt_url: optional("STT_URL"),
            stt_api_key: optional("STT_API_KEY"),
            sms_url: optional("SMS_URL"),
            sms_account_sid: optional("SMS_ACCOUNT_SID"),
            sms_auth_token: optional("SMS_AUTH_TOKEN"),
            sms_from: optional("SMS_FROM"),
            sms_country_code: env::var("SMS_COUNTRY_CODE")
                .unwrap_or_else(|_| DEFAULT_SMS_COUNTRY_CODE.to_string()),
            smtp_host: optional("SMTP_HOST"),
            smtp_port: parsed("SMTP_PORT", DEFAULT_SMTP_PORT),
            smtp_username: optional("SMTP_USERNAME"),
            smtp_password: optional("SMTP_PASSWORD"),
            smtp_from: optional("SMTP_FROM"),
        }
    }

    /// Settings with every external service left unset.
    pub fn unconfigured() -> Self {
        Self {
            retry_attempts: DEFAULT_RETRY_ATTEMPTS,
            retry_backoff_ms: DEFAULT_RETRY_BACKOFF_MS,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            ai_model: DEFAULT_AI_MODEL.to_string(),
            sms_country_code: DEFAULT_SMS_COUNTRY_CODE.to_string(),
            smtp_port: DEFAULT_SMTP_PORT,
            ..Default::default()
        }
    }
}

fn optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parsed<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_secrets() {
        let mut config = Config::new("postgres://user:pw@db/app", "a".repeat(40));
        config.clients.ai_api_key = Some("sk-live-secret".to_string());

        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("user:pw"));
        assert!(!rendered.contains("sk-live-secret"));
        assert!(rendered.contains("[SET]"));
    }

    #[test]
    fn test_new_uses_defaults() {
        let config = Config::new("sqlite::memory:", "a".repeat(40));
        assert_eq!(config.gig_drop_policy, DropPolicy::Reopen);
        assert_eq!(config.clients.retry_attempts, DEFAULT_RETRY_ATTEMPTS);
        assert!(config.clients.ai_url.is_none());
        assert_eq!(config.server_addr(), format!("0.0.0.0:{}", DEFAULT_SERVER_PORT));
    }
}
