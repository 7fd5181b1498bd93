use sea_orm::entity::prelude::*;

use crate::domain::PaymentCard;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "payment_cards")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub name_on_card: String,
    pub last_four: String,
    pub expiration: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for PaymentCard {
    fn from(model: Model) -> Self {
        PaymentCard {
            id: model.id,
            user_id: model.user_id,
            name_on_card: model.name_on_card,
            last_four: model.last_four,
            expiration: model.expiration,
            created_at: model.created_at,
        }
    }
}
