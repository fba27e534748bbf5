//! Staff entity - An employee record with role, salary and optional department.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Staff database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "staff")]
pub struct Model {
    /// Unique identifier for the staff member
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Full name of the staff member
    pub name: String,
    /// Job role (e.g., "Cashier", "Store Manager")
    pub role: String,
    /// Salary, never negative
    pub salary: i64,
    /// Department the staff member belongs to, if any
    pub department_id: Option<i64>,
}

/// Defines relationships between Staff and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each staff member belongs to at most one department
    #[sea_orm(
        belongs_to = "super::department::Entity",
        from = "Column::DepartmentId",
        to = "super::department::Column::Id",
        on_delete = "SetNull"
    )]
    Department,
    /// One staff member handles many sales
    #[sea_orm(has_many = "super::sales::Entity")]
    Sales,
}

impl Related<super::department::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Department.def()
    }
}

impl Related<super::sales::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Sales.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
