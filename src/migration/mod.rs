//! SeaORM database migrations.
//!
//! Written with the schema builder so the same migrations run on PostgreSQL
//! in production and SQLite in tests.

pub use sea_orm_migration::prelude::*;

mod m20250301_000001_create_areas;
mod m20250301_000002_create_machines;
mod m20250301_000003_create_oems;
mod m20250301_000004_create_parts;
mod m20250301_000005_create_users;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_areas::Migration),
            Box::new(m20250301_000002_create_machines::Migration),
            Box::new(m20250301_000003_create_oems::Migration),
            Box::new(m20250301_000004_create_parts::Migration),
            Box::new(m20250301_000005_create_users::Migration),
        ]
    }
}
