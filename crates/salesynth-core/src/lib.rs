pub mod aggregate;
pub mod assemble;
pub mod config;
pub mod dataset;
pub mod error;
pub mod generate;
pub mod record;
pub mod stats;

#[cfg(test)]
mod fixtures;

// Re-export key types for convenience
pub use config::GenerateConfig;
pub use error::{Result, SaleSynthError};
pub use record::Order;
