//! Sales business logic - recording sales and aggregating them by date.
//!
//! Date bounds are optional and inclusive on both ends. A sale keeps the
//! store's running `total_sales` in step: both writes share one transaction.

use crate::{
    core::store::add_to_total_sales,
    entities::{Product, Sales, Staff, Store, sales},
    errors::{Error, Result},
};
use chrono::NaiveDate;
use sea_orm::{
    FromQueryResult, QueryOrder, QuerySelect, Set, TransactionTrait, prelude::*, sea_query::Expr,
};
use serde::Serialize;

/// A sale with its store and staff member resolved to names.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalesData {
    /// Sale ID
    pub id: i64,
    /// Payment method used
    pub payment_method: String,
    /// Amount of the sale
    pub total_amount: f64,
    /// Day of the sale
    pub sale_date: NaiveDate,
    /// Name of the store where the sale happened
    pub store_name: String,
    /// Product sold, if still in the catalog
    pub product_id: Option<i64>,
    /// Name of the staff member handling the sale, if known
    pub staff_name: Option<String>,
}

/// Sales total for one day.
#[derive(Debug, Clone, PartialEq, Serialize, FromQueryResult)]
pub struct DailySales {
    /// The day
    pub sale_date: NaiveDate,
    /// Sum of sale amounts on that day
    pub total_sales: f64,
}

/// Details of a sale to record.
#[derive(Debug, Clone, PartialEq)]
pub struct NewSale {
    /// Store where the sale happened
    pub store_id: i64,
    /// Product sold, if recorded
    pub product_id: Option<i64>,
    /// Staff member handling the sale, if recorded
    pub staff_id: Option<i64>,
    /// Payment method used (e.g., "card", "cash")
    pub payment_method: String,
    /// Amount of the sale, must be non-negative
    pub total_amount: f64,
    /// Day of the sale
    pub sale_date: NaiveDate,
}

/// Restricts a sales query to `[start, end]`; a missing bound is open.
pub(crate) fn within_dates<Q>(query: Q, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Q
where
    Q: QueryFilter,
{
    let query = match start {
        Some(start) => query.filter(sales::Column::SaleDate.gte(start)),
        None => query,
    };
    match end {
        Some(end) => query.filter(sales::Column::SaleDate.lte(end)),
        None => query,
    }
}

/// Records a sale and adds its amount to the store's running total.
///
/// # Errors
/// Returns an error if:
/// - The amount is negative or not finite
/// - The store, product or staff member does not exist
pub async fn record_sale(db: &DatabaseConnection, sale: NewSale) -> Result<sales::Model> {
    if !sale.total_amount.is_finite() || sale.total_amount < 0.0 {
        return Err(Error::validation(format!(
            "Sale amount must be a non-negative number, got {}",
            sale.total_amount
        )));
    }

    let txn = db.begin().await?;

    if let Some(product_id) = sale.product_id {
        Product::find_by_id(product_id)
            .one(&txn)
            .await?
            .ok_or(Error::NotFound {
                entity: "Product",
                id: product_id,
            })?;
    }
    if let Some(staff_id) = sale.staff_id {
        Staff::find_by_id(staff_id)
            .one(&txn)
            .await?
            .ok_or(Error::NotFound {
                entity: "Staff",
                id: staff_id,
            })?;
    }

    add_to_total_sales(&txn, sale.store_id, sale.total_amount).await?;

    let record = sales::ActiveModel {
        payment_method: Set(sale.payment_method),
        total_amount: Set(sale.total_amount),
        store_id: Set(sale.store_id),
        product_id: Set(sale.product_id),
        staff_id: Set(sale.staff_id),
        sale_date: Set(sale.sale_date),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;

    tracing::debug!(
        sale_id = record.id,
        store_id = record.store_id,
        amount = record.total_amount,
        "Recorded sale"
    );
    Ok(record)
}

/// Retrieves a specific sale by its unique ID.
pub async fn get_sales_by_id(db: &DatabaseConnection, sale_id: i64) -> Result<Option<sales::Model>> {
    Sales::find_by_id(sale_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Returns the sale together with the names of its store and staff member.
pub async fn get_sales_data(db: &DatabaseConnection, sale_id: i64) -> Result<SalesData> {
    let (sale, store) = Sales::find_by_id(sale_id)
        .find_also_related(Store)
        .one(db)
        .await?
        .ok_or(Error::NotFound {
            entity: "Sale",
            id: sale_id,
        })?;
    let store = store.ok_or(Error::NotFound {
        entity: "Store",
        id: sale.store_id,
    })?;
    let staff = sale.find_related(Staff).one(db).await?;

    Ok(SalesData {
        id: sale.id,
        payment_method: sale.payment_method,
        total_amount: sale.total_amount,
        sale_date: sale.sale_date,
        store_name: store.name,
        product_id: sale.product_id,
        staff_name: staff.map(|s| s.name),
    })
}

/// Sums the amounts of all sales between `start` and `end`, 0 if there are none.
pub async fn calculate_total_sales(
    db: &DatabaseConnection,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Result<f64> {
    let query = Sales::find()
        .select_only()
        .column_as(Expr::col(sales::Column::TotalAmount).sum(), "total_sales");

    let total = within_dates(query, start, end)
        .into_tuple::<Option<f64>>()
        .one(db)
        .await?;

    Ok(total.flatten().unwrap_or(0.0))
}

/// Daily sales totals between `start` and `end`, ordered by date.
pub async fn get_sales_graph(
    db: &DatabaseConnection,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Result<Vec<DailySales>> {
    let query = Sales::find()
        .select_only()
        .column(sales::Column::SaleDate)
        .column_as(Expr::col(sales::Column::TotalAmount).sum(), "total_sales")
        .group_by(sales::Column::SaleDate)
        .order_by_asc(sales::Column::SaleDate);

    within_dates(query, start, end)
        .into_model::<DailySales>()
        .all(db)
        .await
        .map_err(Into::into)
}
