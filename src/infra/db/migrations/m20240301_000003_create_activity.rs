//! Migration: chat log, wallet instruments, ledger, and calendar dates.

use sea_orm_migration::prelude::*;

use super::m20240301_000001_create_accounts::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Owner column referencing `users.id`, removed with the user
fn owned_by<T: Iden + 'static>(table: T, column: T, name: &str) -> ForeignKeyCreateStatement {
    ForeignKey::create()
        .name(name)
        .from(table, column)
        .to(Users::Table, Users::Id)
        .on_delete(ForeignKeyAction::Cascade)
        .to_owned()
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Messages::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Messages::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Messages::OwnerId).uuid().not_null())
                    .col(ColumnDef::new(Messages::Text).text().not_null())
                    .col(ColumnDef::new(Messages::FromAi).boolean().not_null().default(false))
                    .col(ColumnDef::new(Messages::CreatedAt).timestamp_with_time_zone().not_null())
                    .foreign_key(&mut owned_by(Messages::Table, Messages::OwnerId, "fk_messages_owner"))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_messages_owner_created")
                    .table(Messages::Table)
                    .col(Messages::OwnerId)
                    .col(Messages::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PaymentCards::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(PaymentCards::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(PaymentCards::UserId).uuid().not_null())
                    .col(ColumnDef::new(PaymentCards::NameOnCard).string().not_null())
                    .col(ColumnDef::new(PaymentCards::LastFour).string_len(4).not_null())
                    .col(ColumnDef::new(PaymentCards::Expiration).string_len(5).not_null())
                    .col(ColumnDef::new(PaymentCards::CreatedAt).timestamp_with_time_zone().not_null())
                    .foreign_key(&mut owned_by(
                        PaymentCards::Table,
                        PaymentCards::UserId,
                        "fk_payment_cards_user",
                    ))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(BankAccounts::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(BankAccounts::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(BankAccounts::UserId).uuid().not_null())
                    .col(ColumnDef::new(BankAccounts::RoutingNumber).string_len(9).not_null())
                    .col(ColumnDef::new(BankAccounts::AccountLastFour).string_len(4).not_null())
                    .col(ColumnDef::new(BankAccounts::CreatedAt).timestamp_with_time_zone().not_null())
                    .foreign_key(&mut owned_by(
                        BankAccounts::Table,
                        BankAccounts::UserId,
                        "fk_bank_accounts_user",
                    ))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(LedgerEntries::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(LedgerEntries::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(LedgerEntries::UserId).uuid().not_null())
                    .col(ColumnDef::new(LedgerEntries::Kind).string().not_null())
                    .col(ColumnDef::new(LedgerEntries::AmountCents).big_integer().not_null())
                    .col(ColumnDef::new(LedgerEntries::InstrumentId).uuid().not_null())
                    .col(ColumnDef::new(LedgerEntries::IdempotencyKey).string().not_null())
                    .col(ColumnDef::new(LedgerEntries::CreatedAt).timestamp_with_time_zone().not_null())
                    .foreign_key(&mut owned_by(
                        LedgerEntries::Table,
                        LedgerEntries::UserId,
                        "fk_ledger_entries_user",
                    ))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_ledger_entries_user_key")
                    .table(LedgerEntries::Table)
                    .col(LedgerEntries::UserId)
                    .col(LedgerEntries::IdempotencyKey)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Dates::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Dates::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Dates::DaterId).uuid().not_null())
                    .col(ColumnDef::new(Dates::ScheduledAt).timestamp_with_time_zone().not_null())
                    .col(ColumnDef::new(Dates::Location).string().not_null())
                    .col(ColumnDef::new(Dates::Description).text().not_null())
                    .col(ColumnDef::new(Dates::Status).string().not_null())
                    .col(ColumnDef::new(Dates::BudgetCents).big_integer().not_null().default(0))
                    .foreign_key(&mut owned_by(Dates::Table, Dates::DaterId, "fk_dates_dater"))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Dates::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(LedgerEntries::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(BankAccounts::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PaymentCards::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Messages::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Messages {
    Table,
    Id,
    OwnerId,
    Text,
    FromAi,
    CreatedAt,
}

#[derive(Iden)]
enum PaymentCards {
    Table,
    Id,
    UserId,
    NameOnCard,
    LastFour,
    Expiration,
    CreatedAt,
}

#[derive(Iden)]
enum BankAccounts {
    Table,
    Id,
    UserId,
    RoutingNumber,
    AccountLastFour,
    CreatedAt,
}

#[derive(Iden)]
enum LedgerEntries {
    Table,
    Id,
    UserId,
    Kind,
    AmountCents,
    InstrumentId,
    IdempotencyKey,
    CreatedAt,
}

#[derive(Iden)]
enum Dates {
    Table,
    Id,
    DaterId,
    ScheduledAt,
    Location,
    Description,
    Status,
    BudgetCents,
}
