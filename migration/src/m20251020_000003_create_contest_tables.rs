use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Contests::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Contests::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Contests::CreatorId).integer().not_null())
                    .col(ColumnDef::new(Contests::Title).string().not_null())
                    .col(
                        ColumnDef::new(Contests::Description)
                            .text()
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(Contests::ContestType).string().not_null())
                    .col(
                        ColumnDef::new(Contests::EntryFeeCents)
                            .big_integer()
                            .not_null()
                            .check(
                                Expr::col(Contests::EntryFeeCents)
                                    .gte(75)
                                    .and(Expr::col(Contests::EntryFeeCents).lte(500)),
                            ),
                    )
                    .col(
                        ColumnDef::new(Contests::PlatformFeeBp)
                            .integer()
                            .not_null()
                            .check(
                                Expr::col(Contests::PlatformFeeBp)
                                    .gte(1000)
                                    .and(Expr::col(Contests::PlatformFeeBp).lte(3000)),
                            ),
                    )
                    .col(
                        ColumnDef::new(Contests::Status)
                            .string()
                            .not_null()
                            .default("active"),
                    )
                    .col(
                        ColumnDef::new(Contests::TotalPotCents)
                            .big_integer()
                            .not_null()
                            .default(0)
                            .check(Expr::col(Contests::TotalPotCents).gte(0)),
                    )
                    .col(ColumnDef::new(Contests::Chain).string().not_null())
                    .col(
                        ColumnDef::new(Contests::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Contests::EndsAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_contests_creator_id")
                            .from(Contests::Table, Contests::CreatorId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_contests_status")
                    .table(Contests::Table)
                    .col(Contests::Status)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ContestEntries::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ContestEntries::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ContestEntries::ContestId).integer().not_null())
                    .col(ColumnDef::new(ContestEntries::UserId).integer().not_null())
                    .col(ColumnDef::new(ContestEntries::PaymentId).integer().not_null())
                    .col(ColumnDef::new(ContestEntries::ContentType).string().not_null())
                    .col(ColumnDef::new(ContestEntries::Content).text().not_null())
                    .col(
                        ColumnDef::new(ContestEntries::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_contest_entries_contest_id")
                            .from(ContestEntries::Table, ContestEntries::ContestId)
                            .to(Contests::Table, Contests::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_contest_entries_user_id")
                            .from(ContestEntries::Table, ContestEntries::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_contest_entries_payment_id")
                            .from(ContestEntries::Table, ContestEntries::PaymentId)
                            .to(Payments::Table, Payments::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // One entry per user per contest
        manager
            .create_index(
                Index::create()
                    .unique()
                    .name("idx_contest_entries_contest_user_unique")
                    .table(ContestEntries::Table)
                    .col(ContestEntries::ContestId)
                    .col(ContestEntries::UserId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        // A payment funds a single entry
        manager
            .create_index(
                Index::create()
                    .unique()
                    .name("idx_contest_entries_payment_unique")
                    .table(ContestEntries::Table)
                    .col(ContestEntries::PaymentId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Votes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Votes::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Votes::ContestId).integer().not_null())
                    .col(ColumnDef::new(Votes::VoterId).integer().not_null())
                    .col(ColumnDef::new(Votes::EntryId).integer().not_null())
                    .col(
                        ColumnDef::new(Votes::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_votes_contest_id")
                            .from(Votes::Table, Votes::ContestId)
                            .to(Contests::Table, Contests::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_votes_entry_id")
                            .from(Votes::Table, Votes::EntryId)
                            .to(ContestEntries::Table, ContestEntries::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // One vote per voter per contest
        manager
            .create_index(
                Index::create()
                    .unique()
                    .name("idx_votes_contest_voter_unique")
                    .table(Votes::Table)
                    .col(Votes::ContestId)
                    .col(Votes::VoterId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_votes_entry_id")
                    .table(Votes::Table)
                    .col(Votes::EntryId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Votes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ContestEntries::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Contests::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
}

#[derive(Iden)]
enum Payments {
    Table,
    Id,
}

/// Contests table definition
#[derive(Iden)]
enum Contests {
    Table,
    Id,
    CreatorId,
    Title,
    Description,
    ContestType,
    EntryFeeCents,
    PlatformFeeBp,
    Status,
    TotalPotCents,
    Chain,
    CreatedAt,
    EndsAt,
}

/// Contest entries table definition
#[derive(Iden)]
enum ContestEntries {
    Table,
    Id,
    ContestId,
    UserId,
    PaymentId,
    ContentType,
    Content,
    CreatedAt,
}

/// Votes table definition
#[derive(Iden)]
enum Votes {
    Table,
    Id,
    ContestId,
    VoterId,
    EntryId,
    CreatedAt,
}
