//! Storage layer
//!
//! A single SQLite file holding the `clientes` and `compras` tables.

pub mod db;

pub use db::Database;
