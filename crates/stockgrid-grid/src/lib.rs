//! Stockgrid Grid - Filter, sort and pagination engine for list views
//!
//! This crate composes three engines behind one orchestrator:
//!
//! ```text
//! raw rows → Filter Engine → Sort Engine → Pagination Engine → visible rows
//! ```
//!
//! # Modules
//!
//! - [`filter_types`] - Operators, validated predicates and the filter set
//! - [`sorting`] - Single-column sort state and the type-aware comparator
//! - [`pagination`] - Client windowing and server-authoritative page metadata
//! - [`editor`] - Per-column filter editor drafts
//! - [`filter_presets`] - Named filter sets persisted in a key-value store
//! - [`server`] - Sequenced, abortable page requests for server mode
//! - [`DataGrid`] - The orchestrator that keeps all of the above consistent
//!
//! # Design Principles
//!
//! 1. **No UI dependencies** - Presentation layers subscribe to [`GridEvent`]s
//! 2. **No globals** - Each grid owns its state; many grids can coexist
//! 3. **Validate at the edge** - Rejected operations never change state

pub mod editor;
mod events;
mod filtering;
pub mod filter_presets;
pub mod filter_types;
mod grid;
pub mod pagination;
pub mod server;
pub mod sorting;
mod summary;

pub use editor::{EditorOutcome, EditorTab, FilterDraft};
pub use events::{EventEmitter, GridEvent, SubscriptionId};
pub use filter_presets::{FilterPresetManager, SavedFilterSet};
pub use filter_types::{FilterArgs, FilterOperator, FilterSet, Predicate};
pub use grid::{DataGrid, GridConfig};
pub use pagination::{
    PageLink, PageLinks, PageMeta, PageWindow, PaginationMode, PaginationState, RecordsInfo,
};
pub use server::{PageFetcher, PageRequest, PageResponse, PendingPageRequest};
pub use sorting::{SortDirection, SortState};
pub use summary::FilterSummary;

pub use stockgrid_core::{
    ColumnDescriptor, ColumnRegistry, ColumnType, GridError, Result, Row, Value,
};
