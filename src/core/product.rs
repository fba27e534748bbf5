//! Product business logic - Handles all product-related operations.
//!
//! This module provides functions for creating, retrieving, updating and deleting
//! catalog products, computing their stock across stores, and moving stock between
//! stores. Stock itself lives in `product_locations`; see
//! [`crate::core::product_location`] for per-location adjustments.

use crate::{
    core::product_location::{get_product_location, insert_location, update_quantity_atomic},
    entities::{
        Product, ProductLocation, PurchaseOrder, Sales, Store, Supplier, product, product_location,
        purchase_order, sales, store,
    },
    errors::{Error, Result},
};
use sea_orm::{
    FromQueryResult, QueryOrder, QuerySelect, Set, TransactionTrait, prelude::*, sea_query::Expr,
};
use serde::Serialize;

/// A store holding a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromQueryResult)]
pub struct StoreListing {
    /// Name of the store
    pub store_name: String,
    /// Location of the store
    pub location: String,
}

/// Both sides of a completed stock transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockTransfer {
    /// Source stock record after the transfer
    pub source: product_location::Model,
    /// Destination stock record after the transfer
    pub destination: product_location::Model,
}

/// Creates a new product, performing input validation.
///
/// # Errors
/// Returns an error if:
/// - The product name is empty or whitespace-only
/// - The price is negative or not finite (NaN, infinity)
/// - The order limit is negative
/// - The supplier does not exist
/// - The database insert operation fails
pub async fn create_product(
    db: &DatabaseConnection,
    name: String,
    product_type: String,
    price: f64,
    order_limit: i64,
    supplier_id: Option<i64>,
) -> Result<product::Model> {
    if name.trim().is_empty() {
        return Err(Error::validation("Product name cannot be empty"));
    }

    if !price.is_finite() || price < 0.0 {
        return Err(Error::validation(format!(
            "Price must be a non-negative number, got {price}"
        )));
    }

    if order_limit < 0 {
        return Err(Error::validation(
            "Order limit must be a non-negative integer.",
        ));
    }

    if let Some(supplier_id) = supplier_id {
        Supplier::find_by_id(supplier_id)
            .one(db)
            .await?
            .ok_or(Error::NotFound {
                entity: "Supplier",
                id: supplier_id,
            })?;
    }

    let product = product::ActiveModel {
        name: Set(name.trim().to_string()),
        product_type: Set(product_type),
        price: Set(price),
        order_limit: Set(order_limit),
        last_purchase_date: Set(None),
        supplier_id: Set(supplier_id),
        ..Default::default()
    };
    product.insert(db).await.map_err(Into::into)
}

/// Retrieves a specific product by its unique ID.
pub async fn get_product_by_id(
    db: &DatabaseConnection,
    product_id: i64,
) -> Result<Option<product::Model>> {
    Product::find_by_id(product_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Lists every store that holds a stock record for this product, by store name.
pub async fn get_all_stores(db: &DatabaseConnection, product_id: i64) -> Result<Vec<StoreListing>> {
    ProductLocation::find()
        .select_only()
        .column_as(store::Column::Name, "store_name")
        .column_as(store::Column::Location, "location")
        .inner_join(Store)
        .filter(product_location::Column::ProductId.eq(product_id))
        .order_by_asc(store::Column::Name)
        .into_model::<StoreListing>()
        .all(db)
        .await
        .map_err(Into::into)
}

/// Returns the total stock for this product across all stores, 0 if it is
/// not stocked anywhere.
pub async fn get_stock_amount<C>(db: &C, product_id: i64) -> Result<i64>
where
    C: ConnectionTrait,
{
    let total = ProductLocation::find()
        .select_only()
        .column_as(Expr::col(product_location::Column::Quantity).sum(), "total_stock")
        .filter(product_location::Column::ProductId.eq(product_id))
        .into_tuple::<Option<i64>>()
        .one(db)
        .await?;

    Ok(total.flatten().unwrap_or(0))
}

/// Moves `quantity` units of a product from one store to another.
///
/// The source record is decremented and the destination record is either
/// incremented or created. Both writes happen in one database transaction:
/// on any failure neither location changes.
///
/// # Errors
/// Returns an error if:
/// - `quantity` is zero or negative
/// - Source and destination are the same store
/// - The product or the destination store does not exist
/// - The source store has no stock record or holds less than `quantity`
pub async fn transfer_stock(
    db: &DatabaseConnection,
    product_id: i64,
    from_store_id: i64,
    to_store_id: i64,
    quantity: i64,
) -> Result<StockTransfer> {
    if quantity <= 0 {
        return Err(Error::InvalidQuantity { quantity });
    }

    if from_store_id == to_store_id {
        return Err(Error::validation(
            "Source and destination stores must differ",
        ));
    }

    let txn = db.begin().await?;

    Product::find_by_id(product_id)
        .one(&txn)
        .await?
        .ok_or(Error::NotFound {
            entity: "Product",
            id: product_id,
        })?;

    Store::find_by_id(to_store_id)
        .one(&txn)
        .await?
        .ok_or(Error::NotFound {
            entity: "Store",
            id: to_store_id,
        })?;

    let source = match get_product_location(&txn, product_id, from_store_id).await? {
        Some(location) if location.quantity >= quantity => location,
        other => {
            return Err(Error::InsufficientStock {
                available: other.map_or(0, |location| location.quantity),
                requested: quantity,
            });
        }
    };

    let source = update_quantity_atomic(&txn, source.id, -quantity).await?;

    let destination = match get_product_location(&txn, product_id, to_store_id).await? {
        Some(existing) => update_quantity_atomic(&txn, existing.id, quantity).await?,
        None => insert_location(&txn, product_id, to_store_id, quantity).await?,
    };

    txn.commit().await?;

    tracing::info!(
        product_id,
        from_store_id,
        to_store_id,
        quantity,
        "Transferred stock between stores"
    );

    Ok(StockTransfer {
        source,
        destination,
    })
}

/// Updates the reorder level for this product.
///
/// # Errors
/// Returns an error if the new limit is negative or the product does not exist.
pub async fn edit_order_limit(
    db: &DatabaseConnection,
    product_id: i64,
    new_order_limit: i64,
) -> Result<product::Model> {
    if new_order_limit < 0 {
        return Err(Error::validation(
            "Order limit must be a non-negative integer.",
        ));
    }

    let mut product: product::ActiveModel = Product::find_by_id(product_id)
        .one(db)
        .await?
        .ok_or(Error::NotFound {
            entity: "Product",
            id: product_id,
        })?
        .into();

    product.order_limit = Set(new_order_limit);
    product.update(db).await.map_err(Into::into)
}

/// Deletes a product together with its stock records and purchase orders.
///
/// Sales of the product are kept, with their product reference cleared.
///
/// # Errors
/// Returns an error if the product does not exist or a database operation fails.
pub async fn delete_product(db: &DatabaseConnection, product_id: i64) -> Result<()> {
    let txn = db.begin().await?;

    let product = Product::find_by_id(product_id)
        .one(&txn)
        .await?
        .ok_or(Error::NotFound {
            entity: "Product",
            id: product_id,
        })?;

    Sales::update_many()
        .col_expr(sales::Column::ProductId, Expr::value(Option::<i64>::None))
        .filter(sales::Column::ProductId.eq(product_id))
        .exec(&txn)
        .await?;

    ProductLocation::delete_many()
        .filter(product_location::Column::ProductId.eq(product_id))
        .exec(&txn)
        .await?;

    PurchaseOrder::delete_many()
        .filter(purchase_order::Column::ProductId.eq(product_id))
        .exec(&txn)
        .await?;

    product.delete(&txn).await?;
    txn.commit().await?;
    Ok(())
}
