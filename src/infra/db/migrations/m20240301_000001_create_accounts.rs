//! Migration: users, their role profiles, and sign-in sessions.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Users::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Users::Username).string().not_null().unique_key())
                    .col(ColumnDef::new(Users::Email).string().not_null().unique_key())
                    .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                    .col(ColumnDef::new(Users::FirstName).string().not_null())
                    .col(ColumnDef::new(Users::LastName).string().not_null())
                    .col(ColumnDef::new(Users::Role).string().not_null())
                    .col(ColumnDef::new(Users::IsActive).boolean().not_null().default(true))
                    .col(ColumnDef::new(Users::IsStaff).boolean().not_null().default(false))
                    .col(ColumnDef::new(Users::CreatedAt).timestamp_with_time_zone().not_null())
                    .col(ColumnDef::new(Users::UpdatedAt).timestamp_with_time_zone().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Daters::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Daters::UserId).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Daters::PhoneNumber).string().not_null())
                    .col(ColumnDef::new(Daters::BudgetCents).big_integer().not_null().default(0))
                    .col(ColumnDef::new(Daters::CommunicationPreference).string().not_null())
                    .col(ColumnDef::new(Daters::Description).text().not_null())
                    .col(ColumnDef::new(Daters::DatingStrengths).text().not_null())
                    .col(ColumnDef::new(Daters::DatingWeaknesses).text().not_null())
                    .col(ColumnDef::new(Daters::Interests).text().not_null())
                    .col(ColumnDef::new(Daters::Past).text().not_null())
                    .col(ColumnDef::new(Daters::NerdType).string().not_null())
                    .col(ColumnDef::new(Daters::RelationshipGoals).text().not_null())
                    .col(ColumnDef::new(Daters::AiDegree).string().not_null())
                    .col(ColumnDef::new(Daters::Location).string().not_null())
                    .col(ColumnDef::new(Daters::BalanceCents).big_integer().not_null().default(0))
                    .col(ColumnDef::new(Daters::RatingSum).big_integer().not_null().default(0))
                    .col(ColumnDef::new(Daters::RatingCount).big_integer().not_null().default(0))
                    .col(ColumnDef::new(Daters::Suspended).boolean().not_null().default(false))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_daters_user")
                            .from(Daters::Table, Daters::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Cupids::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Cupids::UserId).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Cupids::AcceptingGigs).boolean().not_null().default(true))
                    .col(ColumnDef::new(Cupids::GigsCompleted).integer().not_null().default(0))
                    .col(ColumnDef::new(Cupids::GigsFailed).integer().not_null().default(0))
                    .col(ColumnDef::new(Cupids::Payout).string().not_null())
                    .col(ColumnDef::new(Cupids::Status).string().not_null())
                    .col(ColumnDef::new(Cupids::BalanceCents).big_integer().not_null().default(0))
                    .col(ColumnDef::new(Cupids::Location).string().not_null())
                    .col(ColumnDef::new(Cupids::GigRangeKm).double().not_null().default(10.0))
                    .col(ColumnDef::new(Cupids::RatingSum).big_integer().not_null().default(0))
                    .col(ColumnDef::new(Cupids::RatingCount).big_integer().not_null().default(0))
                    .col(ColumnDef::new(Cupids::Suspended).boolean().not_null().default(false))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_cupids_user")
                            .from(Cupids::Table, Cupids::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Sessions::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Sessions::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Sessions::UserId).uuid().not_null())
                    .col(ColumnDef::new(Sessions::CreatedAt).timestamp_with_time_zone().not_null())
                    .col(ColumnDef::new(Sessions::ExpiresAt).timestamp_with_time_zone().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_sessions_user")
                            .from(Sessions::Table, Sessions::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_sessions_expires_at")
                    .table(Sessions::Table)
                    .col(Sessions::ExpiresAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Sessions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Cupids::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Daters::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub(super) enum Users {
    Table,
    Id,
    Username,
    Email,
    PasswordHash,
    FirstName,
    LastName,
    Role,
    IsActive,
    IsStaff,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Daters {
    Table,
    UserId,
    PhoneNumber,
    BudgetCents,
    CommunicationPreference,
    Description,
    DatingStrengths,
    DatingWeaknesses,
    Interests,
    Past,
    NerdType,
    RelationshipGoals,
    AiDegree,
    Location,
    BalanceCents,
    RatingSum,
    RatingCount,
    Suspended,
}

#[derive(Iden)]
enum Cupids {
    Table,
    UserId,
    AcceptingGigs,
    GigsCompleted,
    GigsFailed,
    Payout,
    Status,
    BalanceCents,
    Location,
    GigRangeKm,
    RatingSum,
    RatingCount,
    Suspended,
}

#[derive(Iden)]
enum Sessions {
    Table,
    Id,
    UserId,
    CreatedAt,
    ExpiresAt,
}
