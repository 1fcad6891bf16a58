//! Audit Facade
//!
//! Unified re-exports for the audit toolkit.
//!
//! This facade provides a single entry point to all audit functionality:
//! - `DigitAnalyzer` / `OutlierDetector` traits, dataset and result types from SPI
//! - Configuration types and policy constants from API
//! - `BenfordAnalyzer`, `IsolationForest`, `MonetaryColumn` and `Auditor` from Core

// Re-export everything from SPI
pub use audit_spi::*;

// Re-export everything from API
pub use audit_api::*;

// Re-export everything from Core
pub use audit_core::*;
