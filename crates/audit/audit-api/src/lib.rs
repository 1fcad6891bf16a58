//! Audit API
//!
//! Configuration types, defaults and builders for the transaction audit
//! analyzers.

mod config;

pub use config::*;

// Re-export SPI types
pub use audit_spi::{AuditError, Result};
