//! Contract definitions for the audit toolkit.
//!
//! This module contains trait definitions that analyzers must implement.

mod digit_analyzer;
mod outlier_detector;

pub use digit_analyzer::DigitAnalyzer;
pub use outlier_detector::{Detection, OutlierDetector};
