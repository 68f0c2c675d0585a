//! Sorting module for the grid
//!
//! Provides single-column sorting with missing values kept last.

mod single_sort;

pub use single_sort::{compare_values, SortDirection, SortEngine, SortState};
