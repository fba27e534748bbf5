//! Store entity - A physical sales location.
//!
//! Each store has contact details, an optional manager, a running sales total
//! and a daily operating window between 1 and 24 hours.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Store database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "stores")]
pub struct Model {
    /// Unique identifier for the store
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Name of the store
    pub name: String,
    /// Address or area of the store
    pub location: String,
    /// Contact phone number, digits with an optional `+`
    pub contact_number: String,
    /// Staff member managing this store; a staff member manages at most one store
    #[sea_orm(unique)]
    pub manager_id: Option<i64>,
    /// Running total of sales recorded at this store
    pub total_sales: f64,
    /// Number of hours the store operates per day
    pub operating_hours: i32,
}

/// Defines relationships between Store and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// The manager is cleared when the staff record is deleted
    #[sea_orm(
        belongs_to = "super::staff::Entity",
        from = "Column::ManagerId",
        to = "super::staff::Column::Id",
        on_delete = "SetNull"
    )]
    Manager,
    /// One store holds many product locations
    #[sea_orm(has_many = "super::product_location::Entity")]
    ProductLocations,
    /// One store records many sales
    #[sea_orm(has_many = "super::sales::Entity")]
    Sales,
}

impl Related<super::product_location::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProductLocations.def()
    }
}

impl Related<super::sales::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Sales.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
