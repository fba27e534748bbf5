//! Staff business logic - Handles all staff-related operations.
//!
//! Provides functions for creating, retrieving, editing and deleting staff
//! records, assigning them to departments and analysing their sales
//! performance over a trailing window of days.

use crate::{
    entities::{Department, Sales, Staff, Store, department, sales, staff, store},
    errors::{Error, Result},
};
use chrono::{Days, NaiveDate, Utc};
use sea_orm::{
    FromQueryResult, QuerySelect, Set, TransactionTrait, prelude::*, sea_query::Expr,
};
use serde::{Deserialize, Serialize};

/// Default analysis window for performance figures, in days
pub const DEFAULT_PERFORMANCE_WINDOW_DAYS: u32 = 30;

/// Fields of a staff record that can be edited. `None` leaves the field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StaffUpdate {
    /// New name
    pub name: Option<String>,
    /// New role
    pub role: Option<String>,
    /// New salary, must be non-negative
    pub salary: Option<i64>,
}

/// A staff record with its department resolved to a name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StaffData {
    /// Staff ID
    pub id: i64,
    /// Staff name
    pub name: String,
    /// Job role
    pub role: String,
    /// Salary
    pub salary: i64,
    /// Name of the department, if assigned
    pub department: Option<String>,
}

/// Sales performance of a staff member over a window of days.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StaffPerformance {
    /// Staff name
    pub staff_name: String,
    /// Sum of sales handled in the window
    pub period_total_sales: f64,
    /// Average amount per sale
    pub average_sale_amount: f64,
    /// Number of sales handled
    pub total_transactions: i64,
    /// Period total divided by the window length
    pub sales_per_day: f64,
    /// Period total normalised by salary
    pub performance_index: f64,
}

#[derive(Debug, FromQueryResult)]
struct SalesTotals {
    total: Option<f64>,
    transactions: i64,
}

/// Creates a new staff record.
///
/// # Errors
/// Returns an error if:
/// - The name is empty or whitespace-only
/// - The salary is negative
/// - The department does not exist
pub async fn create_staff(
    db: &DatabaseConnection,
    name: String,
    role: String,
    salary: i64,
    department_id: Option<i64>,
) -> Result<staff::Model> {
    if name.trim().is_empty() {
        return Err(Error::validation("Staff name cannot be empty"));
    }
    validate_salary(salary)?;

    if let Some(department_id) = department_id {
        find_department(db, department_id).await?;
    }

    let staff = staff::ActiveModel {
        name: Set(name.trim().to_string()),
        role: Set(role),
        salary: Set(salary),
        department_id: Set(department_id),
        ..Default::default()
    };
    staff.insert(db).await.map_err(Into::into)
}

/// Retrieves a specific staff member by unique ID.
pub async fn get_staff_by_id(db: &DatabaseConnection, staff_id: i64) -> Result<Option<staff::Model>> {
    Staff::find_by_id(staff_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Returns the staff record together with its department name.
pub async fn get_staff_data(db: &DatabaseConnection, staff_id: i64) -> Result<StaffData> {
    let (staff, department) = Staff::find_by_id(staff_id)
        .find_also_related(Department)
        .one(db)
        .await?
        .ok_or(Error::NotFound {
            entity: "Staff",
            id: staff_id,
        })?;

    Ok(StaffData {
        id: staff.id,
        name: staff.name,
        role: staff.role,
        salary: staff.salary,
        department: department.map(|d| d.name),
    })
}

/// Applies a validated partial update to a staff record.
///
/// # Errors
/// Returns an error if no field is set, the name is empty, the salary is
/// negative, or the staff member does not exist.
pub async fn edit_staff_data(
    db: &DatabaseConnection,
    staff_id: i64,
    update: StaffUpdate,
) -> Result<staff::Model> {
    if update.name.is_none() && update.role.is_none() && update.salary.is_none() {
        return Err(Error::validation("No valid fields provided for update"));
    }
    if update.name.as_ref().is_some_and(|name| name.trim().is_empty()) {
        return Err(Error::validation("Staff name cannot be empty"));
    }
    if let Some(salary) = update.salary {
        validate_salary(salary)?;
    }

    let mut staff: staff::ActiveModel = find_staff(db, staff_id).await?.into();
    if let Some(name) = update.name {
        staff.name = Set(name.trim().to_string());
    }
    if let Some(role) = update.role {
        staff.role = Set(role);
    }
    if let Some(salary) = update.salary {
        staff.salary = Set(salary);
    }
    staff.update(db).await.map_err(Into::into)
}

/// Assigns the staff member to a department.
///
/// # Errors
/// Returns an error if the staff member or the department does not exist.
pub async fn assign_department(
    db: &DatabaseConnection,
    staff_id: i64,
    department_id: i64,
) -> Result<staff::Model> {
    let department = find_department(db, department_id).await?;
    let mut staff: staff::ActiveModel = find_staff(db, staff_id).await?.into();
    staff.department_id = Set(Some(department.id));
    staff.update(db).await.map_err(Into::into)
}

/// Analyses the staff member's sales over the `date_range` days ending today.
pub async fn get_performance_data(
    db: &DatabaseConnection,
    staff_id: i64,
    date_range: u32,
) -> Result<StaffPerformance> {
    get_performance_data_until(db, staff_id, Utc::now().date_naive(), date_range).await
}

/// Analyses the staff member's sales over the `date_range` days ending on `end_date`
/// (both ends inclusive).
///
/// All ratios are zero when there are no sales, the window is empty, or the
/// salary is zero.
pub async fn get_performance_data_until(
    db: &DatabaseConnection,
    staff_id: i64,
    end_date: NaiveDate,
    date_range: u32,
) -> Result<StaffPerformance> {
    let staff = find_staff(db, staff_id).await?;
    let start_date = end_date
        .checked_sub_days(Days::new(u64::from(date_range)))
        .unwrap_or(NaiveDate::MIN);

    let totals = Sales::find()
        .select_only()
        .column_as(Expr::col(sales::Column::TotalAmount).sum(), "total")
        .column_as(Expr::col(sales::Column::Id).count(), "transactions")
        .filter(sales::Column::StaffId.eq(staff_id))
        .filter(sales::Column::SaleDate.between(start_date, end_date))
        .into_model::<SalesTotals>()
        .one(db)
        .await?;

    let (total, transactions) =
        totals.map_or((0.0, 0), |t| (t.total.unwrap_or(0.0), t.transactions));

    #[allow(clippy::cast_precision_loss)]
    let average_sale_amount = if transactions == 0 {
        0.0
    } else {
        total / transactions as f64
    };
    let sales_per_day = if date_range == 0 {
        0.0
    } else {
        total / f64::from(date_range)
    };
    #[allow(clippy::cast_precision_loss)]
    let performance_index = if staff.salary == 0 {
        0.0
    } else {
        total / staff.salary as f64
    };

    Ok(StaffPerformance {
        staff_name: staff.name,
        period_total_sales: total,
        average_sale_amount,
        total_transactions: transactions,
        sales_per_day,
        performance_index,
    })
}

/// Deletes a staff record.
///
/// Departments and stores managed by the staff member lose their manager,
/// and sales handled by them are kept with the staff reference cleared.
pub async fn delete_staff(db: &DatabaseConnection, staff_id: i64) -> Result<()> {
    let txn = db.begin().await?;

    let staff = Staff::find_by_id(staff_id)
        .one(&txn)
        .await?
        .ok_or(Error::NotFound {
            entity: "Staff",
            id: staff_id,
        })?;

    Department::update_many()
        .col_expr(department::Column::ManagerId, Expr::value(Option::<i64>::None))
        .filter(department::Column::ManagerId.eq(staff_id))
        .exec(&txn)
        .await?;

    Store::update_many()
        .col_expr(store::Column::ManagerId, Expr::value(Option::<i64>::None))
        .filter(store::Column::ManagerId.eq(staff_id))
        .exec(&txn)
        .await?;

    Sales::update_many()
        .col_expr(sales::Column::StaffId, Expr::value(Option::<i64>::None))
        .filter(sales::Column::StaffId.eq(staff_id))
        .exec(&txn)
        .await?;

    staff.delete(&txn).await?;
    txn.commit().await?;
    Ok(())
}

fn validate_salary(salary: i64) -> Result<()> {
    if salary < 0 {
        return Err(Error::validation("Salary must be a non-negative integer."));
    }
    Ok(())
}

async fn find_staff(db: &DatabaseConnection, staff_id: i64) -> Result<staff::Model> {
    Staff::find_by_id(staff_id)
        .one(db)
        .await?
        .ok_or(Error::NotFound {
            entity: "Staff",
            id: staff_id,
        })
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
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::core::department::assign_department_manager;
    use crate::test_utils::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn test_create_staff_validation() -> Result<()> {
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();

        let result = create_staff(&db, " ".to_string(), "Cashier".to_string(), 100, None).await;
        assert!(matches!(result.unwrap_err(), Error::Validation { message: _ }));

        let result = create_staff(&db, "Sam".to_string(), "Cashier".to_string(), -1, None).await;
        assert!(matches!(result.unwrap_err(), Error::Validation { message: _ }));

        Ok(())
    }

    #[tokio::test]
    async fn test_get_staff_data_includes_department() -> Result<()> {
        let db = setup_test_db().await?;
        let department = create_test_department(&db, "Sales Floor").await?;
        let staff = create_test_staff(&db, "Sam").await?;

        let data = get_staff_data(&db, staff.id).await?;
        assert_eq!(data.department, None);

        assign_department(&db, staff.id, department.id).await?;
        let data = get_staff_data(&db, staff.id).await?;
        assert_eq!(data.name, "Sam");
        assert_eq!(data.department.as_deref(), Some("Sales Floor"));

        Ok(())
    }

    #[tokio::test]
    async fn test_assign_unknown_department() -> Result<()> {
        let db = setup_test_db().await?;
        let staff = create_test_staff(&db, "Sam").await?;

        let result = assign_department(&db, staff.id, 999).await;
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
    async fn test_edit_staff_data() -> Result<()> {
        let db = setup_test_db().await?;
        let staff = create_test_staff(&db, "Sam").await?;

        let update = StaffUpdate {
            role: Some("Supervisor".to_string()),
            salary: Some(41_000),
            ..Default::default()
        };
        let updated = edit_staff_data(&db, staff.id, update).await?;
        assert_eq!(updated.role, "Supervisor");
        assert_eq!(updated.salary, 41_000);
        assert_eq!(updated.name, "Sam");

        let update = StaffUpdate {
            salary: Some(-5),
            ..Default::default()
        };
        let result = edit_staff_data(&db, staff.id, update).await;
        assert!(matches!(result.unwrap_err(), Error::Validation { message: _ }));

        let result = edit_staff_data(&db, staff.id, StaffUpdate::default()).await;
        assert!(matches!(result.unwrap_err(), Error::Validation { message: _ }));

        assert!(serde_json::from_str::<StaffUpdate>(r#"{"department_id": 3}"#).is_err());

        Ok(())
    }

    #[tokio::test]
    async fn test_performance_data_over_window() -> Result<()> {
        let db = setup_test_db().await?;
        let store = create_test_store(&db, "Main Street Store").await?;
        let staff = create_custom_staff(&db, "Sam", 1000).await?;
        let other = create_test_staff(&db, "Kim").await?;
        let end = date(2024, 6, 30);

        create_test_sale(&db, store.id, None, Some(staff.id), 100.0, date(2024, 6, 30)).await?;
        create_test_sale(&db, store.id, None, Some(staff.id), 200.0, date(2024, 6, 1)).await?;
        // Outside the 30-day window
        create_test_sale(&db, store.id, None, Some(staff.id), 999.0, date(2024, 5, 30)).await?;
        // Another staff member
        create_test_sale(&db, store.id, None, Some(other.id), 50.0, date(2024, 6, 15)).await?;

        let performance = get_performance_data_until(&db, staff.id, end, 30).await?;
        assert_eq!(performance.staff_name, "Sam");
        assert_eq!(performance.period_total_sales, 300.0);
        assert_eq!(performance.total_transactions, 2);
        assert_eq!(performance.average_sale_amount, 150.0);
        assert_eq!(performance.sales_per_day, 10.0);
        assert_eq!(performance.performance_index, 0.3);

        Ok(())
    }

    #[tokio::test]
    async fn test_performance_data_without_sales() -> Result<()> {
        let db = setup_test_db().await?;
        let staff = create_custom_staff(&db, "Sam", 0).await?;

        let performance = get_performance_data(&db, staff.id, DEFAULT_PERFORMANCE_WINDOW_DAYS).await?;
        assert_eq!(performance.period_total_sales, 0.0);
        assert_eq!(performance.total_transactions, 0);
        assert_eq!(performance.average_sale_amount, 0.0);
        assert_eq!(performance.sales_per_day, 0.0);
        assert_eq!(performance.performance_index, 0.0);

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_staff_clears_references() -> Result<()> {
        let db = setup_test_db().await?;
        let department = create_test_department(&db, "Operations").await?;
        let store = create_test_store(&db, "Main Street Store").await?;
        let staff = create_test_staff(&db, "Sam").await?;
        assign_department_manager(&db, department.id, staff.id).await?;
        let sale =
            create_test_sale(&db, store.id, None, Some(staff.id), 12.0, date(2024, 2, 2)).await?;

        delete_staff(&db, staff.id).await?;

        assert!(get_staff_by_id(&db, staff.id).await?.is_none());
        let department = Department::find_by_id(department.id).one(&db).await?.unwrap();
        assert_eq!(department.manager_id, None);
        let sale = Sales::find_by_id(sale.id).one(&db).await?.unwrap();
        assert_eq!(sale.staff_id, None);

        Ok(())
    }
}
