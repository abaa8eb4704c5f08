pub use sea_orm_migration::prelude::*;

mod m20251020_000001_create_users_table;
mod m20251020_000002_create_payment_tables;
mod m20251020_000003_create_contest_tables;
mod m20251021_000001_create_ai_tables;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20251020_000001_create_users_table::Migration),
            Box::new(m20251020_000002_create_payment_tables::Migration),
            Box::new(m20251020_000003_create_contest_tables::Migration),
            Box::new(m20251021_000001_create_ai_tables::Migration),
        ]
    }
}
