pub mod config;
pub mod engine;
pub mod error;
pub mod layer;
pub mod metrics;
pub mod report;
pub mod severity;
pub mod types;
