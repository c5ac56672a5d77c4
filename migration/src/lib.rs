pub use sea_orm_migration::prelude::*;

pub mod entities;
mod m20250601_000001_listings;
mod m20250601_000002_listing_views;
mod m20250601_000003_daily_analytics;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250601_000001_listings::Migration),
            Box::new(m20250601_000002_listing_views::Migration),
            Box::new(m20250601_000003_daily_analytics::Migration),
        ]
    }
}
