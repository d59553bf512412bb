//! scoreline-store — Record store backends and app configuration.
//!
//! Implements the `RecordStore` trait from `scoreline-core` with an
//! in-memory backing (tests, dry-run imports) and a JSON-file backing
//! (persistent CLI use), plus TOML configuration loading.

pub mod config;
pub mod json;
pub mod memory;

pub use json::JsonStore;
pub use memory::MemoryStore;
