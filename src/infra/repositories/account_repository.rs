//! Identities, role profiles and sessions.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use super::entities::{cupid, dater, session, user};
use crate::domain::{
    Account, CupidProfile, CupidProfileInput, CupidStatus, DaterProfile, DaterProfileInput,
    NewUser, Profile, RatingTarget, User, UserRole,
};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Account repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait AccountRepository: Send + Sync {
    async fn find_user_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>>;

    async fn find_user_by_username(&self, username: &str) -> AppResult<Option<User>>;

    /// Identity plus role profile
    async fn find_account(&self, id: Uuid) -> AppResult<Option<Account>>;

    async fn find_dater(&self, user_id: Uuid) -> AppResult<Option<DaterProfile>>;

    async fn find_cupid(&self, user_id: Uuid) -> AppResult<Option<CupidProfile>>;

    /// One page of accounts holding `role`, with the total for that role.
    async fn list_accounts(
        &self,
        role: UserRole,
        offset: u64,
        limit: u64,
    ) -> AppResult<(Vec<Account>, u64)>;

    /// Create an identity with no profile (managers).
    async fn create_user(&self, new_user: NewUser) -> AppResult<User>;

    /// Write the dater's editable fields. False if there is no dater profile.
    async fn update_dater_details(&self, user_id: Uuid, input: DaterProfileInput) -> AppResult<bool>;

    /// Write the cupid's editable fields. False if there is no cupid profile.
    async fn update_cupid_details(&self, user_id: Uuid, input: CupidProfileInput) -> AppResult<bool>;

    async fn create_session(&self, user_id: Uuid, expires_at: DateTime<Utc>) -> AppResult<Uuid>;

    /// True while the session exists, belongs to `user_id` and has not expired.
    async fn session_is_active(&self, session_id: Uuid, user_id: Uuid) -> AppResult<bool>;

    async fn delete_session(&self, session_id: Uuid) -> AppResult<()>;
}

/// Concrete implementation of AccountRepository
pub struct AccountStore {
    db: DatabaseConnection,
}

impl AccountStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AccountRepository for AccountStore {
    async fn find_user_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        find_user(&self.db, id).await
    }

    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>> {
        user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await?
            .map(User::try_from)
            .transpose()
    }

    async fn find_user_by_username(&self, username: &str) -> AppResult<Option<User>> {
        user::Entity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await?
            .map(User::try_from)
            .transpose()
    }

    async fn find_account(&self, id: Uuid) -> AppResult<Option<Account>> {
        find_account(&self.db, id).await
    }

    async fn find_dater(&self, user_id: Uuid) -> AppResult<Option<DaterProfile>> {
        find_dater(&self.db, user_id).await
    }

    async fn find_cupid(&self, user_id: Uuid) -> AppResult<Option<CupidProfile>> {
        find_cupid(&self.db, user_id).await
    }

    async fn list_accounts(
        &self,
        role: UserRole,
        offset: u64,
        limit: u64,
    ) -> AppResult<(Vec<Account>, u64)> {
        match role {
            UserRole::Dater => {
                let total = dater::Entity::find().count(&self.db).await?;
                let rows = dater::Entity::find()
                    .find_also_related(user::Entity)
                    .order_by_asc(user::Column::CreatedAt)
                    .offset(offset)
                    .limit(limit)
                    .all(&self.db)
                    .await?;

                let accounts = rows
                    .into_iter()
                    .map(|(profile, identity)| -> AppResult<Account> {
                        let identity = identity
                            .ok_or_else(|| AppError::internal("dater row without a user"))?;
                        Ok(Account {
                            user: User::try_from(identity)?,
                            profile: Profile::Dater(DaterProfile::try_from(profile)?),
                        })
                    })
                    .collect::<AppResult<Vec<_>>>()?;
                Ok((accounts, total))
            }
            UserRole::Cupid => {
                let total = cupid::Entity::find().count(&self.db).await?;
                let rows = cupid::Entity::find()
                    .find_also_related(user::Entity)
                    .order_by_asc(user::Column::CreatedAt)
                    .offset(offset)
                    .limit(limit)
                    .all(&self.db)
                    .await?;

                let accounts = rows
                    .into_iter()
                    .map(|(profile, identity)| -> AppResult<Account> {
                        let identity = identity
                            .ok_or_else(|| AppError::internal("cupid row without a user"))?;
                        Ok(Account {
                            user: User::try_from(identity)?,
                            profile: Profile::Cupid(CupidProfile::try_from(profile)?),
                        })
                    })
                    .collect::<AppResult<Vec<_>>>()?;
                Ok((accounts, total))
            }
            UserRole::Manager => {
                let query = user::Entity::find()
                    .filter(user::Column::Role.eq(UserRole::Manager.as_str()));
                let total = query.clone().count(&self.db).await?;
                let accounts = query
                    .order_by_asc(user::Column::CreatedAt)
                    .offset(offset)
                    .limit(limit)
                    .all(&self.db)
                    .await?
                    .into_iter()
                    .map(|identity| -> AppResult<Account> {
                        Ok(Account {
                            user: User::try_from(identity)?,
                            profile: Profile::Manager,
                        })
                    })
                    .collect::<AppResult<Vec<_>>>()?;
                Ok((accounts, total))
            }
        }
    }

    async fn create_user(&self, new_user: NewUser) -> AppResult<User> {
        insert_user(&self.db, new_user).await
    }

    async fn update_dater_details(&self, user_id: Uuid, input: DaterProfileInput) -> AppResult<bool> {
        let result = dater::Entity::update_many()
            .set(dater::details_model(&input))
            .filter(dater::Column::UserId.eq(user_id))
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected > 0)
    }

    async fn update_cupid_details(&self, user_id: Uuid, input: CupidProfileInput) -> AppResult<bool> {
        let result = cupid::Entity::update_many()
            .set(cupid::details_model(&input))
            .filter(cupid::Column::UserId.eq(user_id))
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected > 0)
    }

    async fn create_session(&self, user_id: Uuid, expires_at: DateTime<Utc>) -> AppResult<Uuid> {
        let id = Uuid::new_v4();
        session::ActiveModel {
            id: Set(id),
            user_id: Set(user_id),
            created_at: Set(Utc::now()),
            expires_at: Set(expires_at),
        }
        .insert(&self.db)
        .await?;

        Ok(id)
    }

    async fn session_is_active(&self, session_id: Uuid, user_id: Uuid) -> AppResult<bool> {
        let count = session::Entity::find()
            .filter(session::Column::Id.eq(session_id))
            .filter(session::Column::UserId.eq(user_id))
            .filter(session::Column::ExpiresAt.gte(Utc::now()))
            .count(&self.db)
            .await?;
        Ok(count > 0)
    }

    async fn delete_session(&self, session_id: Uuid) -> AppResult<()> {
        session::Entity::delete_by_id(session_id)
            .exec(&self.db)
            .await?;
        Ok(())
    }
}

/// Transaction-scoped account operations.
pub struct TxAccountRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TxAccountRepository<'a> {
    pub(crate) fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }

    pub async fn insert_user(&self, new_user: NewUser) -> AppResult<User> {
        insert_user(self.txn, new_user).await
    }

    pub async fn insert_dater(&self, user_id: Uuid, profile: &DaterProfile) -> AppResult<()> {
        dater::active_model(user_id, profile).insert(self.txn).await?;
        Ok(())
    }

    pub async fn insert_cupid(&self, user_id: Uuid, profile: &CupidProfile) -> AppResult<()> {
        cupid::active_model(user_id, profile).insert(self.txn).await?;
        Ok(())
    }

    pub async fn find_account(&self, id: Uuid) -> AppResult<Option<Account>> {
        find_account(self.txn, id).await
    }

    /// Delete a user; profile and owned rows go with it. False if absent.
    pub async fn delete_user(&self, id: Uuid) -> AppResult<bool> {
        let result = user::Entity::delete_by_id(id).exec(self.txn).await?;
        Ok(result.rows_affected > 0)
    }

    pub async fn find_dater(&self, user_id: Uuid) -> AppResult<Option<DaterProfile>> {
        find_dater(self.txn, user_id).await
    }

    pub async fn find_cupid(&self, user_id: Uuid) -> AppResult<Option<CupidProfile>> {
        find_cupid(self.txn, user_id).await
    }

    /// Set the moderation flag on a dater or cupid profile. False if absent.
    pub async fn set_suspended(
        &self,
        role: UserRole,
        user_id: Uuid,
        suspended: bool,
    ) -> AppResult<bool> {
        let rows = match role {
            UserRole::Dater => {
                dater::Entity::update_many()
                    .col_expr(dater::Column::Suspended, Expr::value(suspended))
                    .filter(dater::Column::UserId.eq(user_id))
                    .exec(self.txn)
                    .await?
                    .rows_affected
            }
            UserRole::Cupid => {
                cupid::Entity::update_many()
                    .col_expr(cupid::Column::Suspended, Expr::value(suspended))
                    .filter(cupid::Column::UserId.eq(user_id))
                    .exec(self.txn)
                    .await?
                    .rows_affected
            }
            UserRole::Manager => 0,
        };
        Ok(rows > 0)
    }

    /// Add one rating to the target's accumulators in a single statement.
    pub async fn add_rating(
        &self,
        target: RatingTarget,
        user_id: Uuid,
        stars: i32,
    ) -> AppResult<bool> {
        let stars = i64::from(stars);
        let rows = match target {
            RatingTarget::Dater => {
                dater::Entity::update_many()
                    .col_expr(
                        dater::Column::RatingSum,
                        Expr::col(dater::Column::RatingSum).add(stars),
                    )
                    .col_expr(
                        dater::Column::RatingCount,
                        Expr::col(dater::Column::RatingCount).add(1i64),
                    )
                    .filter(dater::Column::UserId.eq(user_id))
                    .exec(self.txn)
                    .await?
                    .rows_affected
            }
            RatingTarget::Cupid => {
                cupid::Entity::update_many()
                    .col_expr(
                        cupid::Column::RatingSum,
                        Expr::col(cupid::Column::RatingSum).add(stars),
                    )
                    .col_expr(
                        cupid::Column::RatingCount,
                        Expr::col(cupid::Column::RatingCount).add(1i64),
                    )
                    .filter(cupid::Column::UserId.eq(user_id))
                    .exec(self.txn)
                    .await?
                    .rows_affected
            }
        };
        Ok(rows > 0)
    }

    pub async fn credit_dater(&self, user_id: Uuid, amount_cents: i64) -> AppResult<bool> {
        let result = dater::Entity::update_many()
            .col_expr(
                dater::Column::BalanceCents,
                Expr::col(dater::Column::BalanceCents).add(amount_cents),
            )
            .filter(dater::Column::UserId.eq(user_id))
            .exec(self.txn)
            .await?;
        Ok(result.rows_affected > 0)
    }

    /// Zero a cupid's balance, but only if it still equals `expected_cents`.
    pub async fn drain_cupid(&self, user_id: Uuid, expected_cents: i64) -> AppResult<bool> {
        let result = cupid::Entity::update_many()
            .col_expr(cupid::Column::BalanceCents, Expr::value(0i64))
            .filter(cupid::Column::UserId.eq(user_id))
            .filter(cupid::Column::BalanceCents.eq(expected_cents))
            .exec(self.txn)
            .await?;
        Ok(result.rows_affected > 0)
    }

    pub async fn set_cupid_status(&self, user_id: Uuid, status: CupidStatus) -> AppResult<bool> {
        let result = cupid::Entity::update_many()
            .col_expr(cupid::Column::Status, Expr::value(status.as_str()))
            .filter(cupid::Column::UserId.eq(user_id))
            .exec(self.txn)
            .await?;
        Ok(result.rows_affected > 0)
    }

    /// Count a finished gig against the cupid and make them available again.
    pub async fn record_cupid_outcome(&self, user_id: Uuid, completed: bool) -> AppResult<bool> {
        let counter = if completed {
            cupid::Column::GigsCompleted
        } else {
            cupid::Column::GigsFailed
        };

        let result = cupid::Entity::update_many()
            .col_expr(counter, Expr::col(counter).add(1))
            .col_expr(
                cupid::Column::Status,
                Expr::value(CupidStatus::Available.as_str()),
            )
            .filter(cupid::Column::UserId.eq(user_id))
            .exec(self.txn)
            .await?;
        Ok(result.rows_affected > 0)
    }
}

async fn find_user<C: ConnectionTrait>(conn: &C, id: Uuid) -> AppResult<Option<User>> {
    user::Entity::find_by_id(id)
        .one(conn)
        .await?
        .map(User::try_from)
        .transpose()
}

async fn find_dater<C: ConnectionTrait>(conn: &C, user_id: Uuid) -> AppResult<Option<DaterProfile>> {
    dater::Entity::find_by_id(user_id)
        .one(conn)
        .await?
        .map(DaterProfile::try_from)
        .transpose()
}

async fn find_cupid<C: ConnectionTrait>(conn: &C, user_id: Uuid) -> AppResult<Option<CupidProfile>> {
    cupid::Entity::find_by_id(user_id)
        .one(conn)
        .await?
        .map(CupidProfile::try_from)
        .transpose()
}

async fn find_account<C: ConnectionTrait>(conn: &C, id: Uuid) -> AppResult<Option<Account>> {
    let Some(user) = find_user(conn, id).await? else {
        return Ok(None);
    };

    let profile = match user.role {
        UserRole::Dater => Profile::Dater(
            find_dater(conn, id)
                .await?
                .ok_or_else(|| AppError::internal(format!("dater {} has no profile", id)))?,
        ),
        UserRole::Cupid => Profile::Cupid(
            find_cupid(conn, id)
                .await?
                .ok_or_else(|| AppError::internal(format!("cupid {} has no profile", id)))?,
        ),
        UserRole::Manager => Profile::Manager,
    };

    Ok(Some(Account { user, profile }))
}

async fn insert_user<C: ConnectionTrait>(conn: &C, new_user: NewUser) -> AppResult<User> {
    let now = Utc::now();
    let model = user::ActiveModel {
        id: Set(Uuid::new_v4()),
        username: Set(new_user.username),
        email: Set(new_user.email),
        password_hash: Set(new_user.password_hash),
        first_name: Set(new_user.first_name),
        last_name: Set(new_user.last_name),
        role: Set(new_user.role.to_string()),
        is_active: Set(true),
        is_staff: Set(new_user.is_staff),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(conn)
    .await?;

    User::try_from(model)
}
