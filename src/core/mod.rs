//! Core business logic abstractions

pub mod config;
pub mod currency;
pub mod dashboard;
pub mod log;
pub mod metrics;
pub mod rates;

// Re-export main types for cleaner imports
pub use currency::Currency;
pub use metrics::{DateStyle, DerivedMetrics, Direction, DisplayPoint};
pub use rates::{RateProvider, RateRecord, RateWindow};
