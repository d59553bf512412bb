//! scoreline-core — Data model, aggregation engine, and record store traits.
//!
//! This crate defines the record types, the pure statistics functions, and
//! the storage seam that the rest of the scoreline workspace builds on.

pub mod engine;
pub mod error;
pub mod model;
pub mod parser;
pub mod report;
pub mod stats;
pub mod store;
