//! Initial schema migration - creates all tables from scratch.
//!
//! It creates the complete schema for Paghetta:
//!
//! - `reward_types`: what a family hands out (money, time, points)
//! - `accounts`: one balance per (child, reward type) pair
//! - `transactions`: the append-only ledger of balance changes
//!
//! Family and child ids are opaque references owned by the provisioning
//! side, so they are plain indexed columns without foreign keys.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// ─────────────────────────────────────────────────────────────────────────────
// Table identifiers
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Iden)]
enum RewardTypes {
    Table,
    Id,
    FamilyId,
    Name,
    UnitKind,
    UnitLabel,
    CreatedAt,
}

#[derive(Iden)]
enum Accounts {
    Table,
    Id,
    FamilyId,
    ChildId,
    RewardTypeId,
    Balance,
    CreatedAt,
}

#[derive(Iden)]
enum Transactions {
    Table,
    Id,
    AccountId,
    Kind,
    Value,
    Note,
    CreatedBy,
    IdempotencyKey,
    CreatedAt,
}

// ─────────────────────────────────────────────────────────────────────────────
// Migration implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ───────────────────────────────────────────────────────────────────
        // 1. Reward types
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(RewardTypes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(RewardTypes::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(RewardTypes::FamilyId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(RewardTypes::Name).string().not_null())
                    .col(ColumnDef::new(RewardTypes::UnitKind).string().not_null())
                    .col(ColumnDef::new(RewardTypes::UnitLabel).string())
                    .col(
                        ColumnDef::new(RewardTypes::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-reward_types-family_id-name-unique")
                    .table(RewardTypes::Table)
                    .col(RewardTypes::FamilyId)
                    .col(RewardTypes::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 2. Accounts
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Accounts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Accounts::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Accounts::FamilyId).big_integer().not_null())
                    .col(ColumnDef::new(Accounts::ChildId).big_integer().not_null())
                    .col(
                        ColumnDef::new(Accounts::RewardTypeId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Accounts::Balance)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Accounts::CreatedAt).timestamp().not_null())
                    .to_owned(),
            )
            .await?;

        // One account per (child, reward type); concurrent first-time
        // creators are split by this index.
        manager
            .create_index(
                Index::create()
                    .name("idx-accounts-child_id-reward_type_id-unique")
                    .table(Accounts::Table)
                    .col(Accounts::ChildId)
                    .col(Accounts::RewardTypeId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-accounts-family_id")
                    .table(Accounts::Table)
                    .col(Accounts::FamilyId)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 3. Transactions
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Transactions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Transactions::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Transactions::AccountId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Transactions::Kind).string().not_null())
                    .col(ColumnDef::new(Transactions::Value).big_integer().not_null())
                    .col(ColumnDef::new(Transactions::Note).string())
                    .col(
                        ColumnDef::new(Transactions::CreatedBy)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Transactions::IdempotencyKey).string())
                    .col(
                        ColumnDef::new(Transactions::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-transactions-account_id")
                            .from(Transactions::Table, Transactions::AccountId)
                            .to(Accounts::Table, Accounts::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-transactions-account_id")
                    .table(Transactions::Table)
                    .col(Transactions::AccountId)
                    .to_owned(),
            )
            .await?;

        // Write-time dedup: a retried request loses the insert here and
        // falls back to re-reading the winner. NULL keys are exempt.
        manager
            .create_index(
                Index::create()
                    .name("idx-transactions-idempotency_key-unique")
                    .table(Transactions::Table)
                    .col(Transactions::IdempotencyKey)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-transactions-created_by")
                    .table(Transactions::Table)
                    .col(Transactions::CreatedBy)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop in reverse order of creation (respecting FK dependencies)
        manager
            .drop_table(Table::drop().table(Transactions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Accounts::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(RewardTypes::Table).to_owned())
            .await?;
        Ok(())
    }
}
