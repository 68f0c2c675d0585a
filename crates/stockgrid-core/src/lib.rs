//! Stockgrid Core - Shared types for the tabular data engine
//!
//! This crate provides the leaf types that every other stockgrid crate
//! depends on:
//!
//! - `Value` / `Row` - Dynamically typed cells and keyed rows
//! - `ColumnRegistry` - Per-grid column descriptors with declared types
//! - `parse` - Type-specific parsing (numbers, calendar dates)
//! - `GridError` - Validation errors shared across the engines

mod column;
mod error;
pub mod parse;
mod types;

pub use column::*;
pub use error::*;
pub use types::*;
