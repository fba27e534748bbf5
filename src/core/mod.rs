//! Core business logic - framework-agnostic operations over the retail
//! entities. Every function takes a database connection and returns the
//! crate [`Result`](crate::errors::Result).

/// Departments, budgets and managers
pub mod department;
/// Operations spanning several entities (restocking, performance reports)
pub mod facade;
/// Catalog products and stock transfers
pub mod product;
/// Per-store stock quantities
pub mod product_location;
/// Purchase orders and their lifecycle
pub mod purchase_order;
/// Sales recording and aggregation
pub mod sales;
/// Staff records and performance
pub mod staff;
/// Stores and their performance
pub mod store;
/// Suppliers and delivered order performance
pub mod supplier;
