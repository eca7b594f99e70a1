pub use sea_orm_migration::prelude::*;

pub mod entities;
pub mod expiry_text;
mod m20250601_000001_mappings_table;
mod m20250615_000001_wechat_columns;
mod m20250615_000002_mapping_indexes;
mod m20250701_000001_normalize_expiry;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250601_000001_mappings_table::Migration),
            Box::new(m20250615_000001_wechat_columns::Migration),
            Box::new(m20250615_000002_mapping_indexes::Migration),
            Box::new(m20250701_000001_normalize_expiry::Migration),
        ]
    }
}
