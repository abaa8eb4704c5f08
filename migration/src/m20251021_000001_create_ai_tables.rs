use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AiJobs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AiJobs::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(AiJobs::UserId).integer().not_null())
                    .col(
                        ColumnDef::new(AiJobs::PaymentId)
                            .integer()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(AiJobs::FeatureType).string().not_null())
                    .col(ColumnDef::new(AiJobs::ModelUsed).string().not_null())
                    .col(ColumnDef::new(AiJobs::InputPrompt).text().not_null())
                    .col(ColumnDef::new(AiJobs::OutputRef).text().not_null())
                    .col(
                        ColumnDef::new(AiJobs::PriceCents)
                            .big_integer()
                            .not_null()
                            .check(
                                Expr::col(AiJobs::PriceCents)
                                    .gte(75)
                                    .and(Expr::col(AiJobs::PriceCents).lte(500)),
                            ),
                    )
                    .col(
                        ColumnDef::new(AiJobs::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_ai_jobs_user_id")
                            .from(AiJobs::Table, AiJobs::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_ai_jobs_payment_id")
                            .from(AiJobs::Table, AiJobs::PaymentId)
                            .to(Payments::Table, Payments::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_ai_jobs_user_id")
                    .table(AiJobs::Table)
                    .col(AiJobs::UserId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(MemePacks::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MemePacks::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(MemePacks::UserId).integer().not_null())
                    .col(ColumnDef::new(MemePacks::Category).string().not_null())
                    .col(ColumnDef::new(MemePacks::Title).string().not_null())
                    .col(ColumnDef::new(MemePacks::Data).json_binary().not_null())
                    .col(
                        ColumnDef::new(MemePacks::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_meme_packs_user_id")
                            .from(MemePacks::Table, MemePacks::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(MemePacks::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(AiJobs::Table).to_owned())
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

/// AI jobs table definition
#[derive(Iden)]
enum AiJobs {
    Table,
    Id,
    UserId,
    PaymentId,
    FeatureType,
    ModelUsed,
    InputPrompt,
    OutputRef,
    PriceCents,
    CreatedAt,
}

/// Meme packs table definition
#[derive(Iden)]
enum MemePacks {
    Table,
    Id,
    UserId,
    Category,
    Title,
    Data,
    CreatedAt,
}
