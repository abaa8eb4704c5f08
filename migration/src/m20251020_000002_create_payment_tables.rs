use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Payments: one row per on-chain transaction hash
        manager
            .create_table(
                Table::create()
                    .table(Payments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Payments::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Payments::UserId).integer().not_null())
                    .col(ColumnDef::new(Payments::Chain).string().not_null())
                    .col(
                        ColumnDef::new(Payments::TxHash)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Payments::TokenSymbol).string().not_null())
                    .col(ColumnDef::new(Payments::Amount).string().not_null())
                    .col(
                        ColumnDef::new(Payments::UsdEquivCents)
                            .big_integer()
                            .not_null()
                            .check(
                                Expr::col(Payments::UsdEquivCents)
                                    .gte(75)
                                    .and(Expr::col(Payments::UsdEquivCents).lte(500)),
                            ),
                    )
                    .col(ColumnDef::new(Payments::FeatureType).string().not_null())
                    .col(
                        ColumnDef::new(Payments::Status)
                            .string()
                            .not_null()
                            .default("pending"),
                    )
                    .col(
                        ColumnDef::new(Payments::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_payments_user_id")
                            .from(Payments::Table, Payments::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_payments_user_id")
                    .table(Payments::Table)
                    .col(Payments::UserId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        // Referrals: at most one code per user
        manager
            .create_table(
                Table::create()
                    .table(Referrals::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Referrals::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Referrals::UserId)
                            .integer()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Referrals::Code)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Referrals::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_referrals_user_id")
                            .from(Referrals::Table, Referrals::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(RefEarnings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(RefEarnings::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(RefEarnings::ReferrerId).integer().not_null())
                    .col(ColumnDef::new(RefEarnings::ReferredId).integer().not_null())
                    .col(ColumnDef::new(RefEarnings::PaymentId).integer().not_null())
                    .col(
                        ColumnDef::new(RefEarnings::AmountCents)
                            .big_integer()
                            .not_null()
                            .check(Expr::col(RefEarnings::AmountCents).gte(0)),
                    )
                    .col(
                        ColumnDef::new(RefEarnings::PaidOut)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(RefEarnings::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_ref_earnings_referrer_id")
                            .from(RefEarnings::Table, RefEarnings::ReferrerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_ref_earnings_referred_id")
                            .from(RefEarnings::Table, RefEarnings::ReferredId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_ref_earnings_payment_id")
                            .from(RefEarnings::Table, RefEarnings::PaymentId)
                            .to(Payments::Table, Payments::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_ref_earnings_referrer_id")
                    .table(RefEarnings::Table)
                    .col(RefEarnings::ReferrerId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(RefEarnings::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Referrals::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Payments::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
}

/// Payments table definition
#[derive(Iden)]
enum Payments {
    Table,
    Id,
    UserId,
    Chain,
    TxHash,
    TokenSymbol,
    Amount,
    UsdEquivCents,
    FeatureType,
    Status,
    CreatedAt,
}

/// Referrals table definition
#[derive(Iden)]
enum Referrals {
    Table,
    Id,
    UserId,
    Code,
    CreatedAt,
}

/// Referral earnings table definition
#[derive(Iden)]
enum RefEarnings {
    Table,
    Id,
    ReferrerId,
    ReferredId,
    PaymentId,
    AmountCents,
    PaidOut,
    CreatedAt,
}
