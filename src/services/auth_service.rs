//! Authentication service - accounts, sign-in and request authentication.
//!
//! Passwords are handled by the domain `Password` value object. Every bearer
//! token carries the id of a session row, and a token is only honoured while
//! that row exists and has not expired.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::config::{Config, SECONDS_PER_HOUR, TOKEN_TYPE_BEARER};
use crate::domain::{
    Account, AccountResponse, CupidProfileInput, DaterProfileInput, NewUser, Password, Principal,
    Profile, User, UserRole,
};
use crate::errors::{AppError, AppResult};
use crate::infra::UnitOfWork;
use crate::with_transaction;

/// JWT claims payload
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    /// Session row backing this token
    pub sid: Uuid,
    pub email: String,
    pub role: String,
    pub exp: i64,
    pub iat: i64,
}

/// Token returned after sign-in
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TokenResponse {
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub access_token: String,
    #[schema(example = "Bearer")]
    pub token_type: String,
    /// Seconds until the token expires
    #[schema(example = 86400)]
    pub expires_in: i64,
}

/// Merged account plus the bearer token for it.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SignInResponse {
    #[serde(flatten)]
    pub account: AccountResponse,
    pub token: TokenResponse,
}

/// Everything needed to open a dater or cupid account.
#[derive(Debug, Clone)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub first_name: String,
    pub last_name: String,
    pub role: UserRole,
    pub dater: Option<DaterProfileInput>,
    pub cupid: Option<CupidProfileInput>,
}

/// A resolved caller and, for bearer tokens, their session.
#[derive(Debug, Clone, Copy)]
pub struct Authenticated {
    pub principal: Principal,
    pub session_id: Option<Uuid>,
}

#[async_trait]
pub trait AuthService: Send + Sync {
    /// Create the identity and its role profile atomically.
    async fn register(&self, registration: Registration) -> AppResult<Account>;

    /// Check credentials, open a session and issue a token for it.
    async fn sign_in(&self, email: &str, password: &str) -> AppResult<SignInResponse>;

    async fn sign_out(&self, session_id: Option<Uuid>) -> AppResult<()>;

    fn verify_token(&self, token: &str) -> AppResult<Claims>;

    async fn authenticate_bearer(&self, token: &str) -> AppResult<Authenticated>;

    async fn authenticate_basic(&self, email: &str, password: &str) -> AppResult<Authenticated>;

    /// Create a staff manager identity (no profile).
    async fn create_manager(
        &self,
        username: String,
        email: String,
        password: String,
        first_name: String,
        last_name: String,
    ) -> AppResult<User>;
}

fn generate_token(user: &User, session_id: Uuid, config: &Config) -> AppResult<TokenResponse> {
    let now = Utc::now();
    let expires_at = now + Duration::hours(config.jwt_expiration_hours);

    let claims = Claims {
        sub: user.id,
        sid: session_id,
        email: user.email.clone(),
        role: user.role.to_string(),
        exp: expires_at.timestamp(),
        iat: now.timestamp(),
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret_bytes()),
    )?;

    Ok(TokenResponse {
        access_token: token,
        token_type: TOKEN_TYPE_BEARER.to_string(),
        expires_in: config.jwt_expiration_hours * SECONDS_PER_HOUR,
    })
}

fn verify_token_internal(token: &str, config: &Config) -> AppResult<Claims> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret_bytes()),
        &Validation::default(),
    )?;

    Ok(token_data.claims)
}

/// Concrete implementation of AuthService using Unit of Work.
pub struct Authenticator<U: UnitOfWork> {
    uow: Arc<U>,
    config: Config,
}

impl<U: UnitOfWork> Authenticator<U> {
    pub fn new(uow: Arc<U>, config: Config) -> Self {
        Self { uow, config }
    }

    async fn ensure_unique(&self, email: &str, username: &str) -> AppResult<()> {
        let accounts = self.uow.accounts();
        if accounts.find_user_by_email(email).await?.is_some() {
            return Err(AppError::validation("A user with that email already exists"));
        }
        if accounts.find_user_by_username(username).await?.is_some() {
            return Err(AppError::validation("A user with that username already exists"));
        }
        Ok(())
    }

    async fn principal_for(&self, user_id: Uuid) -> AppResult<Principal> {
        let user = self
            .uow
            .accounts()
            .find_user_by_id(user_id)
            .await?
            .ok_or(AppError::Unauthorized)?;

        if !user.is_active {
            return Err(AppError::Unauthorized);
        }
        Ok(Principal::new(user.id, user.role, user.is_staff))
    }
}

#[async_trait]
impl<U: UnitOfWork> AuthService for Authenticator<U> {
    async fn register(&self, registration: Registration) -> AppResult<Account> {
        let Registration {
            username,
            email,
            password,
            confirm_password,
            first_name,
            last_name,
            role,
            dater,
            cupid,
        } = registration;

        if !role.has_profile() {
            return Err(AppError::validation("invalid user type"));
        }

        let password = Password::confirmed(&password, &confirm_password)?;
        self.ensure_unique(&email, &username).await?;

        let new_user = NewUser {
            username,
            email,
            password_hash: password.into_string(),
            first_name,
            last_name,
            role,
            is_staff: false,
        };

        // Profile input is checked after the identity insert so that a bad
        // profile rolls the identity back with it.
        let account = with_transaction!(self.uow, |ctx| {
            let accounts = ctx.accounts();
            let user = accounts.insert_user(new_user).await?;

            let profile = match role {
                UserRole::Dater => {
                    let input =
                        dater.ok_or_else(|| AppError::validation("Dater profile is required"))?;
                    input.validate()?;
                    let profile = input.into_profile();
                    accounts.insert_dater(user.id, &profile).await?;
                    Profile::Dater(profile)
                }
                UserRole::Cupid => {
                    let input =
                        cupid.ok_or_else(|| AppError::validation("Cupid profile is required"))?;
                    input.validate()?;
                    let profile = input.into_profile();
                    accounts.insert_cupid(user.id, &profile).await?;
                    Profile::Cupid(profile)
                }
                UserRole::Manager => return Err(AppError::validation("invalid user type")),
            };

            Ok(Account { user, profile })
        })?;

        tracing::info!(user_id = %account.id(), role = %account.user.role, "Account created");
        Ok(account)
    }

    async fn sign_in(&self, email: &str, password: &str) -> AppResult<SignInResponse> {
        let accounts = self.uow.accounts();
        let user = accounts
            .find_user_by_email(email)
            .await?
            .ok_or_else(|| AppError::SignIn("User not found".into()))?;

        if !Password::from_hash(user.password_hash.clone()).verify(password) {
            return Err(AppError::SignIn("Incorrect password".into()));
        }
        if !user.is_active {
            return Err(AppError::SignIn("User is inactive".into()));
        }

        let account = accounts.find_account(user.id).await?.ok_or(AppError::NotFound)?;

        let expires_at = Utc::now() + Duration::hours(self.config.jwt_expiration_hours);
        let session_id = accounts.create_session(user.id, expires_at).await?;
        let token = generate_token(&account.user, session_id, &self.config)?;

        tracing::info!(user_id = %user.id, %session_id, "User signed in");
        Ok(SignInResponse {
            account: AccountResponse::from(account),
            token,
        })
    }

    async fn sign_out(&self, session_id: Option<Uuid>) -> AppResult<()> {
        if let Some(session_id) = session_id {
            self.uow.accounts().delete_session(session_id).await?;
            tracing::info!(%session_id, "Session closed");
        }
        Ok(())
    }

    fn verify_token(&self, token: &str) -> AppResult<Claims> {
        verify_token_internal(token, &self.config)
    }

    async fn authenticate_bearer(&self, token: &str) -> AppResult<Authenticated> {
        let claims = self.verify_token(token)?;

        if !self
            .uow
            .accounts()
            .session_is_active(claims.sid, claims.sub)
            .await?
        {
            return Err(AppError::Unauthorized);
        }

        Ok(Authenticated {
            principal: self.principal_for(claims.sub).await?,
            session_id: Some(claims.sid),
        })
    }

    async fn authenticate_basic(&self, email: &str, password: &str) -> AppResult<Authenticated> {
        let user = self
            .uow
            .accounts()
            .find_user_by_email(email)
            .await?
            .ok_or(AppError::Unauthorized)?;

        if !user.is_active || !Password::from_hash(user.password_hash.clone()).verify(password) {
            return Err(AppError::Unauthorized);
        }

        Ok(Authenticated {
            principal: Principal::new(user.id, user.role, user.is_staff),
            session_id: None,
        })
    }

    async fn create_manager(
        &self,
        username: String,
        email: String,
        password: String,
        first_name: String,
        last_name: String,
    ) -> AppResult<User> {
        let password = Password::new(&password)?;
        self.ensure_unique(&email, &username).await?;

        let user = self
            .uow
            .accounts()
            .create_user(NewUser {
                username,
                email,
                password_hash: password.into_string(),
                first_name,
                last_name,
                role: UserRole::Manager,
                is_staff: true,
            })
            .await?;

        tracing::info!(user_id = %user.id, "Manager created");
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::TestUnitOfWork;
    use crate::infra::repositories::MockAccountRepository;

    fn config() -> Config {
        Config::new("sqlite::memory:", "test-secret-key-for-testing-only-32chars")
    }

    fn user(email: &str, password: &str) -> User {
        User {
            id: Uuid::new_v4(),
            username: "jdoe".into(),
            email: email.into(),
            password_hash: Password::new(password).unwrap().into_string(),
            first_name: "Jo".into(),
            last_name: "Doe".into(),
            role: UserRole::Dater,
            is_active: true,
            is_staff: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn registration(role: UserRole) -> Registration {
        Registration {
            username: "jdoe".into(),
            email: "jdoe@example.com".into(),
            password: "password123".into(),
            confirm_password: "password123".into(),
            first_name: "Jo".into(),
            last_name: "Doe".into(),
            role,
            dater: None,
            cupid: None,
        }
    }

    #[tokio::test]
    async fn test_sign_in_unknown_email() {
        let mut accounts = MockAccountRepository::new();
        accounts.expect_find_user_by_email().returning(|_| Ok(None));

        let auth = Authenticator::new(Arc::new(TestUnitOfWork::with_accounts(accounts)), config());
        match auth.sign_in("nobody@example.com", "password123").await {
            Err(AppError::SignIn(reason)) => assert_eq!(reason, "User not found"),
            other => panic!("expected sign-in failure, got {:?}", other.map(|_| ())),
        }
    }

    #[tokio::test]
    async fn test_sign_in_wrong_password() {
        let stored = user("jdoe@example.com", "password123");
        let mut accounts = MockAccountRepository::new();
        accounts
            .expect_find_user_by_email()
            .returning(move |_| Ok(Some(stored.clone())));

        let auth = Authenticator::new(Arc::new(TestUnitOfWork::with_accounts(accounts)), config());
        match auth.sign_in("jdoe@example.com", "wrong-password").await {
            Err(AppError::SignIn(reason)) => assert_eq!(reason, "Incorrect password"),
            other => panic!("expected sign-in failure, got {:?}", other.map(|_| ())),
        }
    }

    #[tokio::test]
    async fn test_register_rejects_manager() {
        let auth = Authenticator::new(Arc::new(TestUnitOfWork::default()), config());
        let err = auth.register(registration(UserRole::Manager)).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(msg) if msg == "invalid user type"));
    }

    #[tokio::test]
    async fn test_register_rejects_mismatched_passwords() {
        let auth = Authenticator::new(Arc::new(TestUnitOfWork::default()), config());
        let mut r = registration(UserRole::Dater);
        r.confirm_password = "different123".into();
        assert!(matches!(
            auth.register(r).await,
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_register_rejects_duplicate_email() {
        let existing = user("jdoe@example.com", "password123");
        let mut accounts = MockAccountRepository::new();
        accounts
            .expect_find_user_by_email()
            .returning(move |_| Ok(Some(existing.clone())));

        let auth = Authenticator::new(Arc::new(TestUnitOfWork::with_accounts(accounts)), config());
        let err = auth.register(registration(UserRole::Dater)).await.unwrap_err();
        assert_eq!(err.status(), axum::http::StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_basic_auth_resolves_principal() {
        let stored = user("jdoe@example.com", "password123");
        let id = stored.id;
        let mut accounts = MockAccountRepository::new();
        accounts
            .expect_find_user_by_email()
            .returning(move |_| Ok(Some(stored.clone())));

        let auth = Authenticator::new(Arc::new(TestUnitOfWork::with_accounts(accounts)), config());
        let authenticated = auth
            .authenticate_basic("jdoe@example.com", "password123")
            .await
            .unwrap();
        assert_eq!(authenticated.principal.user_id, id);
        assert!(authenticated.session_id.is_none());

        assert!(matches!(
            auth.authenticate_basic("jdoe@example.com", "nope-nope").await,
            Err(AppError::Unauthorized)
        ));
    }

    #[test]
    fn test_token_round_trip_carries_session() {
        let config = config();
        let stored = user("jdoe@example.com", "password123");
        let session_id = Uuid::new_v4();

        let token = generate_token(&stored, session_id, &config).unwrap();
        let claims = verify_token_internal(&token.access_token, &config).unwrap();
        assert_eq!(claims.sub, stored.id);
        assert_eq!(claims.sid, session_id);
        assert_eq!(claims.role, "dater");
    }
}
