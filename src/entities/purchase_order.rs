//! Purchase order entity - A restock request for a product.
//!
//! Orders start as `Pending` and end as either `Delivered` or `Cancelled`.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Lifecycle status of a purchase order
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum PurchaseOrderStatus {
    /// Ordered but not yet received
    #[sea_orm(string_value = "Pending")]
    Pending,
    /// Received from the supplier
    #[sea_orm(string_value = "Delivered")]
    Delivered,
    /// Called off before delivery
    #[sea_orm(string_value = "Cancelled")]
    Cancelled,
}

/// Purchase order database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "purchase_orders")]
pub struct Model {
    /// Unique identifier for the purchase order
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Total monetary amount of the order
    pub full_cost: f64,
    /// Product being ordered
    pub product_id: i64,
    /// Date the order was created
    pub order_date: Date,
    /// Date the order was (or is expected to be) delivered
    pub delivery_date: Option<Date>,
    /// Current status
    pub status: PurchaseOrderStatus,
}

/// Defines relationships between `PurchaseOrder` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Removed together with its product
    #[sea_orm(
        belongs_to = "super::product::Entity",
        from = "Column::ProductId",
        to = "super::product::Column::Id",
        on_delete = "Cascade"
    )]
    Product,
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
