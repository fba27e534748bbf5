//! Database configuration module.
//!
//! This module handles `SQLite` database connection and table creation using `SeaORM`.
//! Tables are generated from the entity definitions with
//! `Schema::create_table_from_entity`, so the schema always matches the Rust
//! structs without hand-written SQL.

use crate::entities::{
    Department, Product, ProductLocation, PurchaseOrder, Sales, Staff, Store, Supplier,
};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};

/// Establishes a connection to the database at `database_url`.
pub async fn create_connection(database_url: &str) -> Result<DatabaseConnection> {
    Database::connect(database_url).await.map_err(Into::into)
}

/// Creates all necessary database tables from the entity definitions.
///
/// Tables that already exist are left untouched, so this is safe to call on
/// every startup.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let mut statements = vec![
        schema.create_table_from_entity(Department),
        schema.create_table_from_entity(Staff),
        schema.create_table_from_entity(Supplier),
        schema.create_table_from_entity(Product),
        schema.create_table_from_entity(Store),
        schema.create_table_from_entity(ProductLocation),
        schema.create_table_from_entity(PurchaseOrder),
        schema.create_table_from_entity(Sales),
    ];

    for statement in &mut statements {
        db.execute(builder.build(statement.if_not_exists())).await?;
    }

    Ok(())
}

/// Connects to the database and makes sure all tables exist.
pub async fn init_db(database_url: &str) -> Result<DatabaseConnection> {
    let db = create_connection(database_url).await?;
    create_tables(&db).await?;
    Ok(db)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{DepartmentModel, SalesModel, StoreModel};
    use sea_orm::{EntityTrait, QuerySelect};

    #[tokio::test]
    async fn test_create_tables() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;

        // Test that tables exist by querying them
        let _: Vec<DepartmentModel> = Department::find().limit(1).all(&db).await?;
        let _: Vec<StoreModel> = Store::find().limit(1).all(&db).await?;
        let _: Vec<SalesModel> = Sales::find().limit(1).all(&db).await?;
        Ok(())
    }

    #[tokio::test]
    async fn test_create_tables_is_idempotent() -> Result<()> {
        let db = init_db("sqlite::memory:").await?;
        create_tables(&db).await?;
        Ok(())
    }
}
