//! # audit
//!
//! Transaction audit toolkit.
//! Checks a monetary column for first-digit anomalies (Benford's Law) and
//! isolates outlying amounts with an isolation forest.

pub use audit_facade::*;
