//! Migration: quests, gigs, and the feedback left on them.

use sea_orm_migration::prelude::*;

use super::m20240301_000001_create_accounts::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Quests::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Quests::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Quests::BudgetCents).big_integer().not_null())
                    .col(ColumnDef::new(Quests::ItemsRequested).text().not_null())
                    .col(ColumnDef::new(Quests::PickupLocation).string().not_null())
                    .col(ColumnDef::new(Quests::PickupLat).double().null())
                    .col(ColumnDef::new(Quests::PickupLng).double().null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Gigs::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Gigs::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Gigs::Status).string().not_null())
                    .col(ColumnDef::new(Gigs::DaterId).uuid().not_null())
                    .col(ColumnDef::new(Gigs::CupidId).uuid().null())
                    .col(ColumnDef::new(Gigs::QuestId).uuid().not_null().unique_key())
                    .col(ColumnDef::new(Gigs::RequestedAt).timestamp_with_time_zone().not_null())
                    .col(ColumnDef::new(Gigs::ClaimedAt).timestamp_with_time_zone().null())
                    .col(ColumnDef::new(Gigs::CompletedAt).timestamp_with_time_zone().null())
                    .col(ColumnDef::new(Gigs::AcceptCount).integer().not_null().default(0))
                    .col(ColumnDef::new(Gigs::DropCount).integer().not_null().default(0))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_gigs_dater")
                            .from(Gigs::Table, Gigs::DaterId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_gigs_cupid")
                            .from(Gigs::Table, Gigs::CupidId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_gigs_quest")
                            .from(Gigs::Table, Gigs::QuestId)
                            .to(Quests::Table, Quests::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_gigs_status_requested_at")
                    .table(Gigs::Table)
                    .col(Gigs::Status)
                    .col(Gigs::RequestedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Feedback::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Feedback::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Feedback::OwnerId).uuid().not_null())
                    .col(ColumnDef::new(Feedback::TargetId).uuid().not_null())
                    .col(ColumnDef::new(Feedback::GigId).uuid().not_null())
                    .col(ColumnDef::new(Feedback::Message).text().not_null())
                    .col(ColumnDef::new(Feedback::StarRating).integer().not_null())
                    .col(ColumnDef::new(Feedback::CreatedAt).timestamp_with_time_zone().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_feedback_owner")
                            .from(Feedback::Table, Feedback::OwnerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_feedback_target")
                            .from(Feedback::Table, Feedback::TargetId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_feedback_gig")
                            .from(Feedback::Table, Feedback::GigId)
                            .to(Gigs::Table, Gigs::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_feedback_target")
                    .table(Feedback::Table)
                    .col(Feedback::TargetId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Feedback::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Gigs::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Quests::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Quests {
    Table,
    Id,
    BudgetCents,
    ItemsRequested,
    PickupLocation,
    PickupLat,
    PickupLng,
}

#[derive(Iden)]
enum Gigs {
    Table,
    Id,
    Status,
    DaterId,
    CupidId,
    QuestId,
    RequestedAt,
    ClaimedAt,
    CompletedAt,
    AcceptCount,
    DropCount,
}

#[derive(Iden)]
enum Feedback {
    Table,
    Id,
    OwnerId,
    TargetId,
    GigId,
    Message,
    StarRating,
    CreatedAt,
}
