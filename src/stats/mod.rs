//! Session and viewer statistics

pub mod metrics;

pub use metrics::{SessionStats, ViewerStats};
