//! Contract template engine for the property management dashboard.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod templates;
