//! Stock location business logic - quantities of a product held at a store.
//!
//! Every quantity change goes through [`update_quantity_atomic`], which applies
//! the delta as a single guarded SQL `UPDATE` so that a location can never be
//! driven below zero, even when requests interleave.

use crate::{
    entities::{ProductLocation, product_location},
    errors::{Error, Result},
};
use sea_orm::{Set, prelude::*};

/// Creates the stock record for a product at a store.
///
/// # Errors
/// Returns an error if:
/// - The quantity is negative
/// - The product already has a stock record at this store
/// - The product or store does not exist (foreign key violation)
pub async fn create_product_location(
    db: &DatabaseConnection,
    product_id: i64,
    store_id: i64,
    quantity: i64,
) -> Result<product_location::Model> {
    if quantity < 0 {
        return Err(Error::validation("Stock quantity cannot be negative"));
    }

    if get_product_location(db, product_id, store_id)
        .await?
        .is_some()
    {
        return Err(Error::validation(format!(
            "Product {product_id} is already stocked at store {store_id}"
        )));
    }

    insert_location(db, product_id, store_id, quantity).await
}

pub(crate) async fn insert_location<C>(
    db: &C,
    product_id: i64,
    store_id: i64,
    quantity: i64,
) -> Result<product_location::Model>
where
    C: ConnectionTrait,
{
    let location = product_location::ActiveModel {
        product_id: Set(product_id),
        store_id: Set(store_id),
        quantity: Set(quantity),
        created_at: Set(chrono::Utc::now().naive_utc()),
        ..Default::default()
    };
    location.insert(db).await.map_err(Into::into)
}

/// Finds the stock record for a product at a specific store.
pub async fn get_product_location<C>(
    db: &C,
    product_id: i64,
    store_id: i64,
) -> Result<Option<product_location::Model>>
where
    C: ConnectionTrait,
{
    ProductLocation::find()
        .filter(product_location::Column::ProductId.eq(product_id))
        .filter(product_location::Column::StoreId.eq(store_id))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Retrieves a stock record by its unique ID.
pub async fn get_product_location_by_id(
    db: &DatabaseConnection,
    location_id: i64,
) -> Result<Option<product_location::Model>> {
    ProductLocation::find_by_id(location_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Adjusts the stock quantity of a location by a signed delta.
///
/// Positive values increase stock, negative values decrease it. The
/// adjustment is rejected, and the quantity left unchanged, if it would
/// make the quantity negative.
///
/// # Errors
/// Returns an error if:
/// - The location does not exist
/// - The resulting quantity would be negative
pub async fn adjust_stock(
    db: &DatabaseConnection,
    location_id: i64,
    delta: i64,
) -> Result<product_location::Model> {
    update_quantity_atomic(db, location_id, delta).await
}

/// Adds `delta` to a location's quantity with a single SQL statement:
/// `UPDATE product_locations SET quantity = quantity + delta WHERE id = ? AND quantity >= -delta`
///
/// The result must stay within `0..=i64::MAX`. Removing more than is held is
/// [`Error::InsufficientStock`]; adding past `i64::MAX` is
/// [`Error::InvalidQuantity`].
///
/// # Arguments
/// * `db` - Database connection or transaction
/// * `location_id` - ID of the stock record to update
/// * `delta` - Amount to add (negative to remove stock)
///
/// # Returns
/// The updated stock record
pub(crate) async fn update_quantity_atomic<C>(
    db: &C,
    location_id: i64,
    delta: i64,
) -> Result<product_location::Model>
where
    C: ConnectionTrait,
{
    use sea_orm::sea_query::Expr;

    let location = ProductLocation::find_by_id(location_id)
        .one(db)
        .await?
        .ok_or(Error::NotFound {
            entity: "Product location",
            id: location_id,
        })?;

    let rejection = |available: i64| {
        if delta < 0 {
            Error::InsufficientStock {
                available,
                requested: delta.saturating_neg(),
            }
        } else {
            Error::InvalidQuantity { quantity: delta }
        }
    };

    match location.quantity.checked_add(delta) {
        Some(quantity) if quantity >= 0 => {}
        _ => return Err(rejection(location.quantity)),
    }

    let mut update = ProductLocation::update_many()
        .col_expr(
            product_location::Column::Quantity,
            Expr::col(product_location::Column::Quantity).add(delta),
        )
        .filter(product_location::Column::Id.eq(location_id));
    // Re-checked in SQL so a concurrent change cannot push the row out of range
    update = if delta < 0 {
        update.filter(product_location::Column::Quantity.gte(delta.saturating_neg()))
    } else {
        update.filter(product_location::Column::Quantity.lte(i64::MAX - delta))
    };
    let result = update.exec(db).await?;

    if result.rows_affected == 0 {
        let available = ProductLocation::find_by_id(location_id)
            .one(db)
            .await?
            .map_or(location.quantity, |current| current.quantity);
        return Err(rejection(available));
    }

    ProductLocation::find_by_id(location_id)
        .one(db)
        .await?
        .ok_or(Error::NotFound {
            entity: "Product location",
            id: location_id,
        })
}
