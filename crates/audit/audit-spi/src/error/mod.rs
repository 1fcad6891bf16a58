//! Error types for the audit toolkit.
//!
//! This module contains error types and the Result alias.

mod audit_error;

pub use audit_error::{AuditError, Result};
