//! Ledger entity. `(user_id, idempotency_key)` is unique.

use sea_orm::entity::prelude::*;

use super::parse_column;
use crate::domain::LedgerEntry;
use crate::errors::AppError;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "ledger_entries")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub kind: String,
    pub amount_cents: i64,
    pub instrument_id: Uuid,
    pub idempotency_key: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for LedgerEntry {
    type Error = AppError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(LedgerEntry {
            kind: parse_column(&model.kind, "ledger_entries.kind")?,
            id: model.id,
            user_id: model.user_id,
            amount_cents: model.amount_cents,
            instrument_id: model.instrument_id,
            idempotency_key: model.idempotency_key,
            created_at: model.created_at,
        })
    }
}
