//! Parameter store: durable, append-oriented table of non-secret site
//! parameters.
//!
//! This module provides:
//! - The `SiteRecord` row type and its column mapping (`record`)
//! - The CSV-backed `ParameterStore` with atomic saves (`table`)

pub mod record;
pub mod table;

// Re-export the most commonly used items.
pub use record::{SiteRecord, COLUMNS, DATE_FORMAT};
pub use table::ParameterStore;
