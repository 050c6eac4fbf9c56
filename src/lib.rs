//! Attendance percentage calculators for university coursework: plain
//! attended/total, weighted L-T-P-S components, and recovery projections,
//! with a small persisted history of weighted results.

pub mod attendance;
pub mod config;
pub mod error;
pub mod models;
pub mod projection;
pub mod report;
pub mod store;
pub mod weighted;

pub use error::ValidationError;
