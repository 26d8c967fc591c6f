//! Ledger Types
//!
//! Domain records and request payloads for the customer ledger. The wire
//! format uses the Portuguese field names of the public API (`nome`,
//! `cliente_id`, `valor_compra`, ...) while the Rust side uses English names.

pub mod customer;
pub mod error;
pub mod purchase;

pub use customer::{Customer, CustomerInput, CustomerWithPurchases, NewCustomer};
pub use error::ValidationError;
pub use purchase::{
    CreatePurchaseInput, NewPurchase, Purchase, PurchaseChanges, UpdatePurchaseInput,
};

/// Row id of a customer
pub type CustomerId = i64;

/// Row id of a purchase
pub type PurchaseId = i64;
