//! Application services and ports.

#![forbid(unsafe_code)]

mod retention_ports;
mod retention_service;

pub use retention_ports::{PruneExecutor, TableCatalog, TableRetentionConfig};
pub use retention_service::RetentionService;
