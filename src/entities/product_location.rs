//! Product location entity - Quantity of one product held at one store.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Product location database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "product_locations")]
pub struct Model {
    /// Unique identifier for the stock record
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Product being stocked
    pub product_id: i64,
    /// Store holding the stock
    pub store_id: i64,
    /// Units on hand, never negative
    pub quantity: i64,
    /// When the stock record was created
    pub created_at: DateTime,
}

/// Defines relationships between `ProductLocation` and other entities
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
    /// Removed together with its store
    #[sea_orm(
        belongs_to = "super::store::Entity",
        from = "Column::StoreId",
        to = "super::store::Column::Id",
        on_delete = "Cascade"
    )]
    Store,
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl Related<super::store::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Store.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
