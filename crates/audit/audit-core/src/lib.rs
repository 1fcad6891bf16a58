//! Audit Core
//!
//! Implementations of the transaction audit analyzers: first-digit analysis
//! against Benford's Law, isolation forest outlier detection, monetary column
//! selection and the pipeline tying them together.

mod auditor;
mod benford;
mod isolation;
mod selection;

pub use auditor::*;
pub use benford::*;
pub use isolation::*;
pub use selection::*;
