//! Migrator registering table migrations in foreign-key order.
//! Indexes and catalog seed rows are applied last.
pub use sea_orm_migration::prelude::*;

mod m20240301_000001_create_catalogs;
mod m20240301_000002_create_usuario;
mod m20240301_000003_create_mascota;
mod m20240301_000004_add_indexes;
mod m20240301_000005_seed_catalogs;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240301_000001_create_catalogs::Migration),
            Box::new(m20240301_000002_create_usuario::Migration),
            Box::new(m20240301_000003_create_mascota::Migration),
            Box::new(m20240301_000004_add_indexes::Migration),
            Box::new(m20240301_000005_seed_catalogs::Migration),
        ]
    }
}
