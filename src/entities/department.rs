//! Department entity - An organizational unit with a budget and an optional manager.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Department database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "departments")]
pub struct Model {
    /// Unique identifier for the department
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Name of the department (e.g., "Logistics")
    pub name: String,
    /// Staff member managing this department; a staff member manages at most one department
    #[sea_orm(unique)]
    pub manager_id: Option<i64>,
    /// Department budget, never negative
    pub budget: i64,
}

/// Defines relationships between Department and other entities
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
}

impl ActiveModelBehavior for ActiveModel {}
