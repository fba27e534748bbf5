//! Supplier business logic - vendors, the products they supply and how
//! their delivered orders add up.

use crate::{
    entities::{Product, PurchaseOrder, PurchaseOrderStatus, Supplier, product, purchase_order, supplier},
    errors::{Error, Result},
};
use chrono::{Days, NaiveDate, Utc};
use sea_orm::{
    FromQueryResult, QueryOrder, QuerySelect, Set, TransactionTrait, prelude::*, sea_query::Expr,
};
use serde::{Deserialize, Serialize};

/// Fields of a supplier that can be edited. `None` leaves the field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SupplierUpdate {
    /// New name
    pub name: Option<String>,
    /// New contact details
    pub contact_details: Option<String>,
    /// New location
    pub location: Option<String>,
    /// New contract terms
    pub contract_terms: Option<String>,
}

/// Delivered purchase orders of a supplier's products over a window of days.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SupplierPerformance {
    /// Supplier name
    pub supplier_name: String,
    /// Number of delivered orders
    pub delivered_orders: i64,
    /// Combined cost of the delivered orders
    pub delivered_amount: f64,
    /// Delivered amount divided by the number of orders
    pub average_order_value: f64,
}

#[derive(Debug, FromQueryResult)]
struct DeliveryTotals {
    amount: Option<f64>,
    orders: i64,
}

/// Creates a new supplier.
///
/// # Errors
/// Returns an error if the name is empty or whitespace-only.
pub async fn create_supplier(
    db: &DatabaseConnection,
    name: String,
    contact_details: String,
    location: String,
    contract_terms: String,
) -> Result<supplier::Model> {
    if name.trim().is_empty() {
        return Err(Error::validation("Supplier name cannot be empty"));
    }

    let supplier = supplier::ActiveModel {
        name: Set(name.trim().to_string()),
        contact_details: Set(contact_details),
        location: Set(location),
        contract_terms: Set(contract_terms),
        ..Default::default()
    };
    supplier.insert(db).await.map_err(Into::into)
}

/// Retrieves a specific supplier by its unique ID.
pub async fn get_supplier_by_id(
    db: &DatabaseConnection,
    supplier_id: i64,
) -> Result<Option<supplier::Model>> {
    Supplier::find_by_id(supplier_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Lists the products supplied by this supplier, ordered by name.
pub async fn get_supplier_products(
    db: &DatabaseConnection,
    supplier_id: i64,
) -> Result<Vec<product::Model>> {
    Product::find()
        .filter(product::Column::SupplierId.eq(supplier_id))
        .order_by_asc(product::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Summarises delivered orders over the `date_range` days ending today.
pub async fn get_supplier_performance(
    db: &DatabaseConnection,
    supplier_id: i64,
    date_range: u32,
) -> Result<SupplierPerformance> {
    get_supplier_performance_until(db, supplier_id, Utc::now().date_naive(), date_range).await
}

/// Summarises orders for the supplier's products that were delivered
/// within the `date_range` days ending on `end_date` (inclusive).
pub async fn get_supplier_performance_until(
    db: &DatabaseConnection,
    supplier_id: i64,
    end_date: NaiveDate,
    date_range: u32,
) -> Result<SupplierPerformance> {
    let supplier = find_supplier(db, supplier_id).await?;
    let start_date = end_date
        .checked_sub_days(Days::new(u64::from(date_range)))
        .unwrap_or(NaiveDate::MIN);

    let totals = PurchaseOrder::find()
        .select_only()
        .column_as(
            Expr::col((purchase_order::Entity, purchase_order::Column::FullCost)).sum(),
            "amount",
        )
        .column_as(
            Expr::col((purchase_order::Entity, purchase_order::Column::Id)).count(),
            "orders",
        )
        .inner_join(Product)
        .filter(product::Column::SupplierId.eq(supplier_id))
        .filter(purchase_order::Column::Status.eq(PurchaseOrderStatus::Delivered))
        .filter(purchase_order::Column::DeliveryDate.between(start_date, end_date))
        .into_model::<DeliveryTotals>()
        .one(db)
        .await?;

    let (amount, orders) = totals.map_or((0.0, 0), |t| (t.amount.unwrap_or(0.0), t.orders));

    #[allow(clippy::cast_precision_loss)]
    let average_order_value = if orders == 0 {
        0.0
    } else {
        amount / orders as f64
    };

    Ok(SupplierPerformance {
        supplier_name: supplier.name,
        delivered_orders: orders,
        delivered_amount: amount,
        average_order_value,
    })
}

/// Applies a partial update to a supplier.
///
/// # Errors
/// Returns an error if no field is set, the new name is empty, or the
/// supplier does not exist.
pub async fn edit_supplier_data(
    db: &DatabaseConnection,
    supplier_id: i64,
    update: SupplierUpdate,
) -> Result<supplier::Model> {
    let SupplierUpdate {
        name,
        contact_details,
        location,
        contract_terms,
    } = update;

    if name.is_none() && contact_details.is_none() && location.is_none() && contract_terms.is_none()
    {
        return Err(Error::validation("No valid fields provided for update"));
    }
    if name.as_ref().is_some_and(|name| name.trim().is_empty()) {
        return Err(Error::validation("Supplier name cannot be empty"));
    }

    let mut supplier: supplier::ActiveModel = find_supplier(db, supplier_id).await?.into();
    if let Some(name) = name {
        supplier.name = Set(name.trim().to_string());
    }
    if let Some(contact_details) = contact_details {
        supplier.contact_details = Set(contact_details);
    }
    if let Some(location) = location {
        supplier.location = Set(location);
    }
    if let Some(contract_terms) = contract_terms {
        supplier.contract_terms = Set(contract_terms);
    }
    supplier.update(db).await.map_err(Into::into)
}

/// Deletes a supplier. Its products stay in the catalog without a supplier.
pub async fn delete_supplier(db: &DatabaseConnection, supplier_id: i64) -> Result<()> {
    let txn = db.begin().await?;

    let supplier = Supplier::find_by_id(supplier_id)
        .one(&txn)
        .await?
        .ok_or(Error::NotFound {
            entity: "Supplier",
            id: supplier_id,
        })?;

    Product::update_many()
        .col_expr(product::Column::SupplierId, Expr::value(Option::<i64>::None))
        .filter(product::Column::SupplierId.eq(supplier_id))
        .exec(&txn)
        .await?;

    supplier.delete(&txn).await?;
    txn.commit().await?;
    Ok(())
}

async fn find_supplier(db: &DatabaseConnection, supplier_id: i64) -> Result<supplier::Model> {
    Supplier::find_by_id(supplier_id)
        .one(db)
        .await?
        .ok_or(Error::NotFound {
            entity: "Supplier",
            id: supplier_id,
        })
}
