//! Database migrations.
//!
//! Each migration is a separate module following SeaORM conventions.
//! Migration names follow the pattern: m{YYYYMMDD}_{NNNNNN}_{description}

use sea_orm_migration::prelude::*;

mod m20250101_000001_create_users_table;
mod m20250101_000002_create_products_table;
mod m20250102_000001_create_orders_table;
mod m20250103_000001_create_contact_messages_table;
mod m20250103_000002_create_wishlist_items_table;
mod m20250104_000001_add_order_tracking;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250101_000001_create_users_table::Migration),
            Box::new(m20250101_000002_create_products_table::Migration),
            Box::new(m20250102_000001_create_orders_table::Migration),
            Box::new(m20250103_000001_create_contact_messages_table::Migration),
            Box::new(m20250103_000002_create_wishlist_items_table::Migration),
            Box::new(m20250104_000001_add_order_tracking::Migration),
        ]
    }
}
