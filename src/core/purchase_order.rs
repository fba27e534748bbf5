//! Purchase order business logic - creating restock orders and moving them
//! through their lifecycle.
//!
//! An order is created `Pending` (or with an explicit status) and may move
//! once, to `Delivered` or `Cancelled`. Delivering an order stamps the
//! product's last purchase date.

use crate::{
    entities::{Product, PurchaseOrder, PurchaseOrderStatus, product, purchase_order},
    errors::{Error, Result},
};
use chrono::{NaiveDate, Utc};
use sea_orm::{Set, TransactionTrait, prelude::*};
use serde::Deserialize;

/// Fields of a purchase order that can be edited. `None` leaves the field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PurchaseOrderUpdate {
    /// New total cost, must be non-negative
    pub full_cost: Option<f64>,
    /// New delivery date
    pub delivery_date: Option<NaiveDate>,
    /// New status
    pub status: Option<PurchaseOrderStatus>,
}

fn validate_cost(full_cost: f64) -> Result<()> {
    if !full_cost.is_finite() || full_cost < 0.0 {
        return Err(Error::validation(format!(
            "Full cost must be a non-negative number, got {full_cost}"
        )));
    }
    Ok(())
}

/// Creates a purchase order for a product, dated today.
///
/// Accepts any connection so the restock flow can create the order inside
/// its own transaction.
///
/// # Errors
/// Returns an error if the cost is negative or not finite, or the product
/// does not exist.
pub async fn create_purchase_order<C>(
    db: &C,
    product_id: i64,
    full_cost: f64,
    delivery_date: Option<NaiveDate>,
    status: PurchaseOrderStatus,
) -> Result<purchase_order::Model>
where
    C: ConnectionTrait,
{
    validate_cost(full_cost)?;

    Product::find_by_id(product_id)
        .one(db)
        .await?
        .ok_or(Error::NotFound {
            entity: "Product",
            id: product_id,
        })?;

    let order = purchase_order::ActiveModel {
        full_cost: Set(full_cost),
        product_id: Set(product_id),
        order_date: Set(Utc::now().date_naive()),
        delivery_date: Set(delivery_date),
        status: Set(status),
        ..Default::default()
    };
    order.insert(db).await.map_err(Into::into)
}

/// Retrieves a specific purchase order by its unique ID.
pub async fn get_purchase_order_by_id(
    db: &DatabaseConnection,
    order_id: i64,
) -> Result<Option<purchase_order::Model>> {
    PurchaseOrder::find_by_id(order_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Returns the current status of a purchase order.
pub async fn get_purchase_order_status(
    db: &DatabaseConnection,
    order_id: i64,
) -> Result<PurchaseOrderStatus> {
    get_purchase_order_by_id(db, order_id)
        .await?
        .map(|order| order.status)
        .ok_or(Error::NotFound {
            entity: "Purchase order",
            id: order_id,
        })
}

/// Applies a partial update to a purchase order.
///
/// Only `Pending` orders may change status. When an order becomes
/// `Delivered`, its product's `last_purchase_date` is set to the delivery
/// date (today if none is recorded).
///
/// # Errors
/// Returns an error if:
/// - No field is set or the cost is invalid
/// - The order is not `Pending` and a different status is requested
/// - The order does not exist
pub async fn set_purchase_order(
    db: &DatabaseConnection,
    order_id: i64,
    update: PurchaseOrderUpdate,
) -> Result<purchase_order::Model> {
    if update.full_cost.is_none() && update.delivery_date.is_none() && update.status.is_none() {
        return Err(Error::validation("No valid fields provided for update"));
    }
    if let Some(full_cost) = update.full_cost {
        validate_cost(full_cost)?;
    }

    let txn = db.begin().await?;

    let existing = PurchaseOrder::find_by_id(order_id)
        .one(&txn)
        .await?
        .ok_or(Error::NotFound {
            entity: "Purchase order",
            id: order_id,
        })?;

    let delivered_now = match update.status {
        Some(status) if status != existing.status => {
            if existing.status != PurchaseOrderStatus::Pending {
                return Err(Error::validation(format!(
                    "Purchase order {order_id} is {:?} and can no longer change status",
                    existing.status
                )));
            }
            status == PurchaseOrderStatus::Delivered
        }
        _ => false,
    };

    let delivery_date = update.delivery_date.or(existing.delivery_date);
    let product_id = existing.product_id;

    let mut order: purchase_order::ActiveModel = existing.into();
    if let Some(full_cost) = update.full_cost {
        order.full_cost = Set(full_cost);
    }
    if let Some(date) = update.delivery_date {
        order.delivery_date = Set(Some(date));
    }
    if let Some(status) = update.status {
        order.status = Set(status);
    }
    let order = order.update(&txn).await?;

    if delivered_now {
        let purchase_date = delivery_date.unwrap_or_else(|| Utc::now().date_naive());
        let mut product: product::ActiveModel = Product::find_by_id(product_id)
            .one(&txn)
            .await?
            .ok_or(Error::NotFound {
                entity: "Product",
                id: product_id,
            })?
            .into();
        product.last_purchase_date = Set(Some(purchase_date));
        product.update(&txn).await?;

        tracing::info!(order_id, product_id, %purchase_date, "Purchase order delivered");
    }

    txn.commit().await?;
    Ok(order)
}
