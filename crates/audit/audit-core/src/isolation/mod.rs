//! Isolation-based outlier detection.

mod forest;
mod tree;

pub use forest::{IsolationForest, AUTO_THRESHOLD};
pub use tree::{average_path_length, IsolationTree};
