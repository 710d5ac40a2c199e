//! Sparkify ETL Library
//!
//! Loads song metadata and user activity logs, stored as newline-delimited
//! JSON files, into a SQLite star schema of song plays.

pub mod config;
pub mod discovery;
pub mod error;
pub mod pipeline;
pub mod records;
pub mod sqlite_persistence;
pub mod transform;
pub mod warehouse;

// Re-export commonly used types for convenience
pub use config::{EtlConfig, ParseErrorPolicy};
pub use error::EtlError;
pub use pipeline::{DatasetSummary, FileProcessor, Pipeline, RunSummary};
pub use warehouse::{LoadTarget, SqliteWarehouse};
