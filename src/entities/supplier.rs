//! Supplier entity - A vendor of products.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Supplier database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "suppliers")]
pub struct Model {
    /// Unique identifier for the supplier
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Name of the supplier
    pub name: String,
    /// Contact information (phone, email or both)
    pub contact_details: String,
    /// Location of the supplier
    pub location: String,
    /// Terms of the supply contract
    pub contract_terms: String,
}

/// Defines relationships between Supplier and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One supplier provides many products
    #[sea_orm(has_many = "super::product::Entity")]
    Products,
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Products.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
