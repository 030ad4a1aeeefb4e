//! PostgreSQL adapters for the application ports.

#![forbid(unsafe_code)]

mod postgres_table_catalog;

pub use postgres_table_catalog::PostgresTableCatalog;
