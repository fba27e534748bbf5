//! Store business logic - Handles all store-related operations.
//!
//! Provides functions for creating, retrieving, updating and deleting stores,
//! listing the stock they hold and reporting simple performance figures.
//! Updates go through [`StoreUpdate`], which only carries the fields a store
//! may change after creation.

use crate::{
    entities::{Product, ProductLocation, Sales, Staff, Store, product, product_location, sales, store},
    errors::{Error, Result},
};
use sea_orm::{
    FromQueryResult, QueryOrder, QuerySelect, Set, TransactionTrait, prelude::*, sea_query::Expr,
};
use serde::{Deserialize, Deserializer, Serialize};

const MAX_CONTACT_NUMBER_LEN: usize = 15;

/// Maps a present field to `Some`, so an explicit `null` is kept apart from an absent field.
fn deserialize_present<'de, D>(deserializer: D) -> std::result::Result<Option<Option<i64>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<i64>::deserialize(deserializer).map(Some)
}

/// Fields of a store that can be edited. `None` leaves the field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StoreUpdate {
    /// New store name
    pub name: Option<String>,
    /// New location
    pub location: Option<String>,
    /// New contact number
    pub contact_number: Option<String>,
    /// Staff member to assign as manager; `Some(None)` (JSON `null`) removes the manager
    #[serde(default, deserialize_with = "deserialize_present")]
    pub manager_id: Option<Option<i64>>,
    /// New daily operating hours (1-24)
    pub operating_hours: Option<i32>,
}

impl StoreUpdate {
    const fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.location.is_none()
            && self.contact_number.is_none()
            && self.manager_id.is_none()
            && self.operating_hours.is_none()
    }
}

/// A product held at a store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromQueryResult)]
pub struct StockListing {
    /// Name of the product
    pub product_name: String,
    /// Units on hand at the store
    pub quantity: i64,
}

/// Headline performance figures for a store.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StorePerformance {
    /// Running sales total
    pub total_sales: f64,
    /// Sales total divided by daily operating hours
    pub average_sales_per_hour: f64,
}

/// Validates a contact number: digits with optional `+` signs, at most 15 characters.
pub fn validate_contact_number(contact_number: &str) -> Result<()> {
    let digits = contact_number.replace('+', "");
    if digits.is_empty()
        || !digits.chars().all(|c| c.is_ascii_digit())
        || contact_number.len() > MAX_CONTACT_NUMBER_LEN
    {
        return Err(Error::validation("Invalid contact number format"));
    }
    Ok(())
}

/// Validates daily operating hours, which must be between 1 and 24.
pub fn validate_operating_hours(hours: i32) -> Result<()> {
    if !(1..=24).contains(&hours) {
        return Err(Error::validation("Operating hours must be between 1 and 24"));
    }
    Ok(())
}

/// Creates a new store, performing input validation.
///
/// The store starts with a zero sales total.
///
/// # Errors
/// Returns an error if:
/// - The store name is empty or whitespace-only
/// - The contact number is malformed
/// - The operating hours are outside 1-24
/// - The manager does not exist or already manages another store
pub async fn create_store(
    db: &DatabaseConnection,
    name: String,
    location: String,
    contact_number: String,
    manager_id: Option<i64>,
    operating_hours: i32,
) -> Result<store::Model> {
    if name.trim().is_empty() {
        return Err(Error::validation("Store name cannot be empty"));
    }
    validate_contact_number(&contact_number)?;
    validate_operating_hours(operating_hours)?;

    if let Some(manager_id) = manager_id {
        ensure_manager_available(db, manager_id, None).await?;
    }

    let store = store::ActiveModel {
        name: Set(name.trim().to_string()),
        location: Set(location),
        contact_number: Set(contact_number),
        manager_id: Set(manager_id),
        total_sales: Set(0.0),
        operating_hours: Set(operating_hours),
        ..Default::default()
    };
    store.insert(db).await.map_err(Into::into)
}

/// Retrieves a specific store by its unique ID.
pub async fn get_store_by_id(db: &DatabaseConnection, store_id: i64) -> Result<Option<store::Model>> {
    Store::find_by_id(store_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Lists every product stocked at this store with its quantity, by product name.
pub async fn get_all_products(db: &DatabaseConnection, store_id: i64) -> Result<Vec<StockListing>> {
    ProductLocation::find()
        .select_only()
        .column_as(product::Column::Name, "product_name")
        .column(product_location::Column::Quantity)
        .inner_join(Product)
        .filter(product_location::Column::StoreId.eq(store_id))
        .order_by_asc(product::Column::Name)
        .into_model::<StockListing>()
        .all(db)
        .await
        .map_err(Into::into)
}

/// Returns the store's running sales total and average sales per operating hour.
pub async fn view_store_performance(
    db: &DatabaseConnection,
    store_id: i64,
) -> Result<StorePerformance> {
    let store = find_store(db, store_id).await?;
    Ok(performance_of(&store))
}

fn performance_of(store: &store::Model) -> StorePerformance {
    let average_sales_per_hour = if store.operating_hours == 0 {
        0.0
    } else {
        store.total_sales / f64::from(store.operating_hours)
    };

    StorePerformance {
        total_sales: store.total_sales,
        average_sales_per_hour,
    }
}

/// Applies a validated partial update to a store.
///
/// # Errors
/// Returns an error if:
/// - No field is set
/// - The new name is empty, the contact number is malformed or the hours are outside 1-24
/// - The new manager does not exist or already manages another store
/// - The store does not exist
pub async fn edit_store_data(
    db: &DatabaseConnection,
    store_id: i64,
    update: StoreUpdate,
) -> Result<store::Model> {
    if update.is_empty() {
        return Err(Error::validation("No valid fields provided for update"));
    }
    if let Some(name) = &update.name {
        if name.trim().is_empty() {
            return Err(Error::validation("Store name cannot be empty"));
        }
    }
    if let Some(contact_number) = &update.contact_number {
        validate_contact_number(contact_number)?;
    }
    if let Some(hours) = update.operating_hours {
        validate_operating_hours(hours)?;
    }

    let mut store: store::ActiveModel = find_store(db, store_id).await?.into();

    match update.manager_id {
        Some(Some(manager_id)) => {
            ensure_manager_available(db, manager_id, Some(store_id)).await?;
            store.manager_id = Set(Some(manager_id));
        }
        Some(None) => store.manager_id = Set(None),
        None => {}
    }
    if let Some(name) = update.name {
        store.name = Set(name.trim().to_string());
    }
    if let Some(location) = update.location {
        store.location = Set(location);
    }
    if let Some(contact_number) = update.contact_number {
        store.contact_number = Set(contact_number);
    }
    if let Some(hours) = update.operating_hours {
        store.operating_hours = Set(hours);
    }

    store.update(db).await.map_err(Into::into)
}

/// Deletes a store together with its stock records and sales.
pub async fn delete_store(db: &DatabaseConnection, store_id: i64) -> Result<()> {
    let txn = db.begin().await?;

    let store = Store::find_by_id(store_id)
        .one(&txn)
        .await?
        .ok_or(Error::NotFound {
            entity: "Store",
            id: store_id,
        })?;

    ProductLocation::delete_many()
        .filter(product_location::Column::StoreId.eq(store_id))
        .exec(&txn)
        .await?;

    Sales::delete_many()
        .filter(sales::Column::StoreId.eq(store_id))
        .exec(&txn)
        .await?;

    store.delete(&txn).await?;
    txn.commit().await?;
    Ok(())
}

/// Adds `amount` to a store's running sales total with a single SQL statement:
/// `UPDATE stores SET total_sales = total_sales + amount WHERE id = ?`
pub(crate) async fn add_to_total_sales<C>(db: &C, store_id: i64, amount: f64) -> Result<store::Model>
where
    C: ConnectionTrait,
{
    let result = Store::update_many()
        .col_expr(
            store::Column::TotalSales,
            Expr::col(store::Column::TotalSales).add(amount),
        )
        .filter(store::Column::Id.eq(store_id))
        .exec(db)
        .await?;

    if result.rows_affected == 0 {
        return Err(Error::NotFound {
            entity: "Store",
            id: store_id,
        });
    }

    Store::find_by_id(store_id)
        .one(db)
        .await?
        .ok_or(Error::NotFound {
            entity: "Store",
            id: store_id,
        })
}

async fn find_store(db: &DatabaseConnection, store_id: i64) -> Result<store::Model> {
    Store::find_by_id(store_id)
        .one(db)
        .await?
        .ok_or(Error::NotFound {
            entity: "Store",
            id: store_id,
        })
}

/// Checks that the staff member exists and manages no store other than `store_id`.
async fn ensure_manager_available(
    db: &DatabaseConnection,
    manager_id: i64,
    store_id: Option<i64>,
) -> Result<()> {
    Staff::find_by_id(manager_id)
        .one(db)
        .await?
        .ok_or(Error::NotFound {
            entity: "Staff",
            id: manager_id,
        })?;

    let managed = Store::find()
        .filter(store::Column::ManagerId.eq(manager_id))
        .one(db)
        .await?;

    match managed {
        Some(other) if Some(other.id) != store_id => Err(Error::validation(format!(
            "Staff {manager_id} already manages store {}",
            other.id
        ))),
        _ => Ok(()),
    }
}
