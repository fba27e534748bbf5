//! Shared test utilities for the retail backend.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test entities with sensible defaults.
#![allow(clippy::expect_used)]

use crate::{
    core::{department, product, sales, staff, store, supplier},
    entities,
    errors::Result,
};
use chrono::NaiveDate;
use sea_orm::DatabaseConnection;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Shorthand for a calendar date in tests.
pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid test date")
}

/// Creates a test department with a budget of 1000.
pub async fn create_test_department(
    db: &DatabaseConnection,
    name: &str,
) -> Result<entities::department::Model> {
    department::create_department(db, name.to_string(), 1000).await
}

/// Creates a test staff member with sensible defaults.
///
/// # Defaults
/// * `role`: "Cashier"
/// * `salary`: 30000
/// * `department_id`: None
pub async fn create_test_staff(
    db: &DatabaseConnection,
    name: &str,
) -> Result<entities::staff::Model> {
    create_custom_staff(db, name, 30_000).await
}

/// Creates a test staff member with a custom salary.
pub async fn create_custom_staff(
    db: &DatabaseConnection,
    name: &str,
    salary: i64,
) -> Result<entities::staff::Model> {
    staff::create_staff(db, name.to_string(), "Cashier".to_string(), salary, None).await
}

/// Creates a test supplier.
pub async fn create_test_supplier(
    db: &DatabaseConnection,
    name: &str,
) -> Result<entities::supplier::Model> {
    supplier::create_supplier(
        db,
        name.to_string(),
        "orders@example.com".to_string(),
        "Leeds".to_string(),
        "Net 30".to_string(),
    )
    .await
}

/// Creates a test product with sensible defaults.
///
/// # Defaults
/// * `product_type`: "grocery"
/// * `price`: 10.0
/// * `order_limit`: 50
pub async fn create_test_product(
    db: &DatabaseConnection,
    name: &str,
    supplier_id: Option<i64>,
) -> Result<entities::product::Model> {
    product::create_product(db, name.to_string(), "grocery".to_string(), 10.0, 50, supplier_id)
        .await
}

/// Creates a test store open 8 hours a day with no manager.
pub async fn create_test_store(
    db: &DatabaseConnection,
    name: &str,
) -> Result<entities::store::Model> {
    store::create_store(
        db,
        name.to_string(),
        format!("{name} Road"),
        "+441234567".to_string(),
        None,
        8,
    )
    .await
}

/// Records a test sale paid by card.
pub async fn create_test_sale(
    db: &DatabaseConnection,
    store_id: i64,
    product_id: Option<i64>,
    staff_id: Option<i64>,
    amount: f64,
    sale_date: NaiveDate,
) -> Result<entities::sales::Model> {
    sales::record_sale(
        db,
        sales::NewSale {
            store_id,
            product_id,
            staff_id,
            payment_method: "card".to_string(),
            total_amount: amount,
            sale_date,
        },
    )
    .await
}

/// Sets up a complete test environment with a product and a store.
/// Returns (db, product, store) for stock-related tests.
pub async fn setup_with_product_and_store() -> Result<(
    DatabaseConnection,
    entities::product::Model,
    entities::store::Model,
)> {
    let db = setup_test_db().await?;
    let product = create_test_product(&db, "Test Product", None).await?;
    let store = create_test_store(&db, "Main Street Store").await?;
    Ok((db, product, store))
}
