//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod department;
pub mod product;
pub mod product_location;
pub mod purchase_order;
pub mod sales;
pub mod staff;
pub mod store;
pub mod supplier;

// Re-export specific types to avoid conflicts
pub use department::{
    Column as DepartmentColumn, Entity as Department, Model as DepartmentModel,
};
pub use product::{Column as ProductColumn, Entity as Product, Model as ProductModel};
pub use product_location::{
    Column as ProductLocationColumn, Entity as ProductLocation, Model as ProductLocationModel,
};
pub use purchase_order::{
    Column as PurchaseOrderColumn, Entity as PurchaseOrder, Model as PurchaseOrderModel,
    PurchaseOrderStatus,
};
pub use sales::{Column as SalesColumn, Entity as Sales, Model as SalesModel};
pub use staff::{Column as StaffColumn, Entity as Staff, Model as StaffModel};
pub use store::{Column as StoreColumn, Entity as Store, Model as StoreModel};
pub use supplier::{Column as SupplierColumn, Entity as Supplier, Model as SupplierModel};
