//! Cross-entity operations exposed over HTTP.
//!
//! [`restock_product`] compares a product's stock with its order limit and
//! raises a purchase order when it runs low. [`get_store_performance`]
//! breaks sales down per store and per product.

use crate::{
    core::{
        product::get_stock_amount, purchase_order::create_purchase_order, sales::within_dates,
    },
    entities::{Product, PurchaseOrderStatus, Sales, Store, Supplier, product, purchase_order, sales, store},
    errors::{Error, Result},
};
use chrono::NaiveDate;
use sea_orm::{
    FromQueryResult, QueryOrder, QuerySelect, TransactionTrait, prelude::*, sea_query::Expr,
};
use serde::Serialize;

/// Result of a restock check. None of these is a failure.
#[derive(Debug, Clone, PartialEq)]
pub enum RestockOutcome {
    /// Stock was below the order limit and a pending order was raised
    Ordered {
        /// Product that was checked
        product_id: i64,
        /// The order that was raised
        purchase_order: purchase_order::Model,
        /// Units ordered to reach the order limit
        quantity: i64,
    },
    /// Stock is at or above the order limit
    StockSufficient {
        /// Product that was checked
        product_id: i64,
        /// Total units across all stores
        current_stock: i64,
    },
    /// Stock is low but the product has no supplier to order from
    NoSupplier {
        /// Product that was checked
        product_id: i64,
    },
}

impl RestockOutcome {
    /// Human-readable summary, returned to HTTP callers.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::Ordered {
                product_id,
                purchase_order,
                quantity,
            } => format!(
                "Purchase order {} created for product ID {product_id} with quantity {quantity}.",
                purchase_order.id
            ),
            Self::StockSufficient {
                product_id,
                current_stock,
            } => format!(
                "Stock level ({current_stock}) for product ID {product_id} is sufficient. No purchase order needed."
            ),
            Self::NoSupplier { product_id } => {
                format!("No supplier found for product ID {product_id}.")
            }
        }
    }
}

/// Sales total of one store.
#[derive(Debug, Clone, PartialEq, Serialize, FromQueryResult)]
pub struct StoreSales {
    /// Name of the store
    pub store_name: String,
    /// Sum of sale amounts in the period
    pub total_sales: f64,
}

/// Sales total of one product at one store. `product_name` is `None` for
/// sales whose product has since been deleted.
#[derive(Debug, Clone, PartialEq, Serialize, FromQueryResult)]
pub struct ProductSales {
    /// Name of the store
    pub store_name: String,
    /// Name of the product, if it still exists
    pub product_name: Option<String>,
    /// Sum of sale amounts in the period
    pub total_sales: f64,
}

/// Per-store and per-product sales breakdown.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StorePerformanceReport {
    /// Totals per store, by store name
    pub store_sales: Vec<StoreSales>,
    /// Totals per product and store, by product name
    pub product_sales: Vec<ProductSales>,
}

/// Checks a product's total stock against its order limit and, when it is
/// below, raises a `Pending` purchase order for the shortfall at the
/// product's price.
///
/// # Errors
/// Returns [`Error::NotFound`] if the product does not exist, or a database
/// error.
pub async fn restock_product(db: &DatabaseConnection, product_id: i64) -> Result<RestockOutcome> {
    let txn = db.begin().await?;

    let product = Product::find_by_id(product_id)
        .one(&txn)
        .await?
        .ok_or(Error::NotFound {
            entity: "Product",
            id: product_id,
        })?;

    let current_stock = get_stock_amount(&txn, product_id).await?;
    if current_stock >= product.order_limit {
        txn.commit().await?;
        tracing::debug!(product_id, current_stock, "Stock sufficient, no restock");
        return Ok(RestockOutcome::StockSufficient {
            product_id,
            current_stock,
        });
    }

    let supplier = match product.supplier_id {
        Some(supplier_id) => Supplier::find_by_id(supplier_id).one(&txn).await?,
        None => None,
    };
    if supplier.is_none() {
        txn.commit().await?;
        tracing::warn!(product_id, current_stock, "Stock low but product has no supplier");
        return Ok(RestockOutcome::NoSupplier { product_id });
    }

    let quantity = product.order_limit - current_stock;
    #[allow(clippy::cast_precision_loss)]
    let full_cost = quantity as f64 * product.price;

    let purchase_order =
        create_purchase_order(&txn, product_id, full_cost, None, PurchaseOrderStatus::Pending)
            .await?;
    txn.commit().await?;

    tracing::info!(
        product_id,
        purchase_order_id = purchase_order.id,
        quantity,
        full_cost,
        "Created restock purchase order"
    );

    Ok(RestockOutcome::Ordered {
        product_id,
        purchase_order,
        quantity,
    })
}

/// Totals sales between `start` and `end` (inclusive, open when `None`)
/// per store, ordered by store name, and per product within each store,
/// ordered by product name.
pub async fn get_store_performance(
    db: &DatabaseConnection,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Result<StorePerformanceReport> {
    let total_amount = Expr::col((sales::Entity, sales::Column::TotalAmount)).sum();

    let store_query = Sales::find()
        .select_only()
        .column_as(store::Column::Name, "store_name")
        .column_as(total_amount.clone(), "total_sales")
        .inner_join(Store)
        .group_by(store::Column::Id)
        .group_by(store::Column::Name)
        .order_by_asc(store::Column::Name);

    let store_sales = within_dates(store_query, start, end)
        .into_model::<StoreSales>()
        .all(db)
        .await?;

    let product_query = Sales::find()
        .select_only()
        .column_as(store::Column::Name, "store_name")
        .column_as(product::Column::Name, "product_name")
        .column_as(total_amount, "total_sales")
        .inner_join(Store)
        .left_join(Product)
        .group_by(store::Column::Id)
        .group_by(store::Column::Name)
        .group_by(sales::Column::ProductId)
        .group_by(product::Column::Name)
        .order_by_asc(product::Column::Name)
        .order_by_asc(store::Column::Name);

    let product_sales = within_dates(product_query, start, end)
        .into_model::<ProductSales>()
        .all(db)
        .await?;

    Ok(StorePerformanceReport {
        store_sales,
        product_sales,
    })
}
