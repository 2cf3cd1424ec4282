//! # Error Types
//!
//! Defines `SaleSynthError`, the unified error enum for every failure mode in
//! the salesynth pipeline. Every variant includes enough context (file path,
//! column name, row counts) to debug immediately without digging through logs.

use thiserror::Error;

/// All errors that can occur in salesynth operations.
#[derive(Error, Debug)]
pub enum SaleSynthError {
    #[error("Input file not found: {path}\n  salesynth expects a delimited order history (see `salesynth expand --help`)")]
    InputNotFound { path: String },

    #[error("Failed to read {path}: {source}")]
    InputRead {
        path: String,
        #[source]
        source: csv::Error,
    },

    #[error("Order history is empty after cleaning ({dropped} malformed rows dropped) — there are no segments to sample from.\n  Provide a history with at least one parseable row, or lower --rows to skip generation.")]
    EmptyHistory { dropped: usize },

    #[error("Cannot build a weighted distribution for '{context}': total weight is {total}")]
    DegenerateDistribution { context: String, total: f64 },

    #[error("Invalid calendar date {year}-{month:02}-{day:02} produced during sampling")]
    InvalidDate { year: i32, month: u32, day: u32 },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Output error: {message}: {source}")]
    Output {
        message: String,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV serialization failed: {source}")]
    CsvWrite {
        #[source]
        source: csv::Error,
    },

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, SaleSynthError>;
