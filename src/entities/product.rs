//! Product entity - A catalog item with price, order limit and optional supplier.
//!
//! Stock is not stored on the product itself. Quantities live in
//! `product_locations`, one row per store holding the product.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Product database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "products")]
pub struct Model {
    /// Unique identifier for the product
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Name of the product (e.g., "Espresso Beans 1kg")
    pub name: String,
    /// Product type used for grouping (e.g., "grocery")
    pub product_type: String,
    /// Unit price
    pub price: f64,
    /// Total stock level below which the product should be reordered
    pub order_limit: i64,
    /// Date of the last purchase of the product
    pub last_purchase_date: Option<Date>,
    /// Supplier of the product, if any
    pub supplier_id: Option<i64>,
}

/// Defines relationships between Product and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each product has at most one supplier
    #[sea_orm(
        belongs_to = "super::supplier::Entity",
        from = "Column::SupplierId",
        to = "super::supplier::Column::Id",
        on_delete = "SetNull"
    )]
    Supplier,
    /// One product is held at many store locations
    #[sea_orm(has_many = "super::product_location::Entity")]
    ProductLocations,
    /// One product has many purchase orders
    #[sea_orm(has_many = "super::purchase_order::Entity")]
    PurchaseOrders,
    /// One product appears in many sales
    #[sea_orm(has_many = "super::sales::Entity")]
    Sales,
}

impl Related<super::supplier::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Supplier.def()
    }
}

impl Related<super::product_location::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProductLocations.def()
    }
}

impl Related<super::purchase_order::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PurchaseOrders.def()
    }
}

impl Related<super::sales::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Sales.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
