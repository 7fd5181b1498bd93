use sea_orm::entity::prelude::*;

use crate::domain::BankAccount;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "bank_accounts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub routing_number: String,
    pub account_last_four: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for BankAccount {
    fn from(model: Model) -> Self {
        BankAccount {
            id: model.id,
            user_id: model.user_id,
            routing_number: model.routing_number,
            account_last_four: model.account_last_four,
            created_at: model.created_at,
        }
    }
}
