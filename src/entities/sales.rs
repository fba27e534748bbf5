//! Sales entity - A single sale recorded at a store.
//!
//! The product and staff references are optional so that history survives
//! the deletion of either party.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Sales database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "sales")]
pub struct Model {
    /// Unique identifier for the sale
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Payment method used (e.g., "card", "cash")
    pub payment_method: String,
    /// Total amount of the sale
    pub total_amount: f64,
    /// Store where the sale happened
    pub store_id: i64,
    /// Product sold, if still in the catalog
    pub product_id: Option<i64>,
    /// Staff member handling the sale, if still employed
    pub staff_id: Option<i64>,
    /// Date of the sale
    pub sale_date: Date,
}

/// Defines relationships between Sales and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Removed together with its store
    #[sea_orm(
        belongs_to = "super::store::Entity",
        from = "Column::StoreId",
        to = "super::store::Column::Id",
        on_delete = "Cascade"
    )]
    Store,
    /// Cleared when the product is deleted
    #[sea_orm(
        belongs_to = "super::product::Entity",
        from = "Column::ProductId",
        to = "super::product::Column::Id",
        on_delete = "SetNull"
    )]
    Product,
    /// Cleared when the staff member is deleted
    #[sea_orm(
        belongs_to = "super::staff::Entity",
        from = "Column::StaffId",
        to = "super::staff::Column::Id",
        on_delete = "SetNull"
    )]
    Staff,
}

impl Related<super::store::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Store.def()
    }
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl Related<super::staff::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Staff.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
