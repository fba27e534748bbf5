//! Department business logic - budgets, managers and membership.

use crate::{
    entities::{Department, Staff, department, staff},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*, sea_query::Expr};

/// Creates a new department with a non-negative budget and no manager.
///
/// # Errors
/// Returns an error if the name is empty or the budget is negative.
pub async fn create_department(
    db: &DatabaseConnection,
    name: String,
    budget: i64,
) -> Result<department::Model> {
    if name.trim().is_empty() {
        return Err(Error::validation("Department name cannot be empty"));
    }
    validate_budget(budget)?;

    let department = department::ActiveModel {
        name: Set(name.trim().to_string()),
        manager_id: Set(None),
        budget: Set(budget),
        ..Default::default()
    };
    department.insert(db).await.map_err(Into::into)
}

/// Retrieves a specific department by its unique ID.
pub async fn get_department_by_id(
    db: &DatabaseConnection,
    department_id: i64,
) -> Result<Option<department::Model>> {
    Department::find_by_id(department_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Retrieves all staff members of the department, ordered by name.
pub async fn get_department_staff(
    db: &DatabaseConnection,
    department_id: i64,
) -> Result<Vec<staff::Model>> {
    Staff::find()
        .filter(staff::Column::DepartmentId.eq(department_id))
        .order_by_asc(staff::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Returns the current budget of the department.
pub async fn get_department_budget(db: &DatabaseConnection, department_id: i64) -> Result<i64> {
    Ok(find_department(db, department_id).await?.budget)
}

/// Sets a new budget for the department.
///
/// # Errors
/// Returns an error if the budget is negative or the department does not exist.
pub async fn set_department_budget(
    db: &DatabaseConnection,
    department_id: i64,
    budget: i64,
) -> Result<department::Model> {
    validate_budget(budget)?;

    let mut department: department::ActiveModel =
        find_department(db, department_id).await?.into();
    department.budget = Set(budget);
    department.update(db).await.map_err(Into::into)
}

/// Makes a staff member the manager of the department.
///
/// # Errors
/// Returns an error if the department or staff member does not exist, or the
/// staff member already manages a different department.
pub async fn assign_department_manager(
    db: &DatabaseConnection,
    department_id: i64,
    staff_id: i64,
) -> Result<department::Model> {
    let department = find_department(db, department_id).await?;

    Staff::find_by_id(staff_id)
        .one(db)
        .await?
        .ok_or(Error::NotFound {
            entity: "Staff",
            id: staff_id,
        })?;

    if let Some(other) = Department::find()
        .filter(department::Column::ManagerId.eq(staff_id))
        .filter(department::Column::Id.ne(department_id))
        .one(db)
        .await?
    {
        return Err(Error::validation(format!(
            "Staff {staff_id} already manages department '{}'",
            other.name
        )));
    }

    let mut department: department::ActiveModel = department.into();
    department.manager_id = Set(Some(staff_id));
    department.update(db).await.map_err(Into::into)
}

/// Deletes a department. Its staff are kept with no department.
pub async fn delete_department(db: &DatabaseConnection, department_id: i64) -> Result<()> {
    let txn = db.begin().await?;

    let department = Department::find_by_id(department_id)
        .one(&txn)
        .await?
        .ok_or(Error::NotFound {
            entity: "Department",
            id: department_id,
        })?;

    Staff::update_many()
        .col_expr(staff::Column::DepartmentId, Expr::value(Option::<i64>::None))
        .filter(staff::Column::DepartmentId.eq(department_id))
        .exec(&txn)
        .await?;

    department.delete(&txn).await?;
    txn.commit().await?;
    Ok(())
}

fn validate_budget(budget: i64) -> Result<()> {
    if budget < 0 {
        return Err(Error::validation("Budget must be a non-negative integer."));
    }
    Ok(())
}

async fn find_department(
    db: &DatabaseConnection,
    department_id: i64,
) -> Result<department::Model> {
    Department::find_by_id(department_id)
        .one(db)
        .await?
        .ok_or(Error::NotFound {
            entity: "Department",
            id: department_id,
        })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::core::staff::{assign_department, get_staff_by_id};
    use crate::test_utils::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn test_create_department_validation() -> Result<()> {
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();

        let result = create_department(&db, String::new(), 100).await;
        assert!(matches!(result.unwrap_err(), Error::Validation { message: _ }));

        let result = create_department(&db, "Finance".to_string(), -1).await;
        assert!(matches!(result.unwrap_err(), Error::Validation { message: _ }));

        Ok(())
    }

    #[tokio::test]
    async fn test_set_department_budget_round_trips() -> Result<()> {
        let db = setup_test_db().await?;
        let department = create_test_department(&db, "Finance").await?;

        for budget in [0, 1, 25_000, i64::from(i32::MAX) * 4] {
            let updated = set_department_budget(&db, department.id, budget).await?;
            assert_eq!(updated.budget, budget);
            assert_eq!(get_department_budget(&db, department.id).await?, budget);
        }

        Ok(())
    }

    #[tokio::test]
    async fn test_set_negative_budget_rejected() -> Result<()> {
        let db = setup_test_db().await?;
        let department = create_test_department(&db, "Finance").await?;

        let result = set_department_budget(&db, department.id, -500).await;
        assert!(matches!(result.unwrap_err(), Error::Validation { message: _ }));

        // Budget is unchanged
        assert_eq!(
            get_department_budget(&db, department.id).await?,
            department.budget
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_set_budget_unknown_department() -> Result<()> {
        let db = setup_test_db().await?;

        let result = set_department_budget(&db, 999, 10).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::NotFound {
                entity: "Department",
                id: 999
            }
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_department_staff_and_manager() -> Result<()> {
        let db = setup_test_db().await?;
        let department = create_test_department(&db, "Operations").await?;
        let other_department = create_test_department(&db, "Marketing").await?;
        let zoe = create_test_staff(&db, "Zoe").await?;
        let ben = create_test_staff(&db, "Ben").await?;
        assign_department(&db, zoe.id, department.id).await?;
        assign_department(&db, ben.id, department.id).await?;

        let members = get_department_staff(&db, department.id).await?;
        let names: Vec<&str> = members.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Ben", "Zoe"]);

        let managed = assign_department_manager(&db, department.id, zoe.id).await?;
        assert_eq!(managed.manager_id, Some(zoe.id));

        let result = assign_department_manager(&db, other_department.id, zoe.id).await;
        assert!(matches!(result.unwrap_err(), Error::Validation { message: _ }));

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_department_keeps_staff() -> Result<()> {
        let db = setup_test_db().await?;
        let department = create_test_department(&db, "Operations").await?;
        let staff = create_test_staff(&db, "Zoe").await?;
        assign_department(&db, staff.id, department.id).await?;

        delete_department(&db, department.id).await?;

        assert!(get_department_by_id(&db, department.id).await?.is_none());
        let retrieved = get_staff_by_id(&db, staff.id).await?.unwrap();
        assert_eq!(retrieved.department_id, None);

        Ok(())
    }
}
