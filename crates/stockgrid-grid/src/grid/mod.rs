//! The grid orchestrator
//
// `DataGrid` holds the fields only; behavior is split across the
// submodules below, each extending `impl DataGrid`.

use std::ops::Range;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use stockgrid_core::{ColumnDescriptor, ColumnRegistry, GridError, Result, Row, Value};
use stockgrid_storage::KeyValueStore;
use tracing::{debug, info, warn};

use crate::editor::{distinct_values, EditorOutcome, EditorState, FilterDraft, MAX_DISTINCT_VALUES};
use crate::events::{EventEmitter, GridEvent, SubscriptionId};
use crate::filter_presets::{FilterPresetManager, SavedFilterSet};
use crate::filter_types::{FilterArgs, FilterOperator, FilterSet, Predicate};
use crate::pagination::{
    PageLinks, PaginationEngine, PaginationMode, PaginationState, RecordsInfo, DEFAULT_MAX_PAGE_LINKS,
    DEFAULT_PAGE_SIZE,
};
use crate::server::{fetch_abortable, PageFetcher, PageRequest, PageResponse, PendingPageRequest, RequestSequencer};
use crate::sorting::{SortEngine, SortState};
use crate::summary::FilterSummary;

mod editing;
mod filters;
mod paging;
mod pipeline;
mod sort;

use pipeline::Stage;

pub const DEFAULT_STORAGE_KEY: &str = "saved_filters";

/// Everything needed to build a [`DataGrid`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridConfig {
    pub columns: Vec<ColumnDescriptor>,
    #[serde(default)]
    pub default_sort: SortState,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    #[serde(default)]
    pub mode: PaginationMode,
    /// Key the grid's saved filter sets live under
    #[serde(default)]
    pub storage_key: Option<String>,
    #[serde(default = "default_max_distinct_values")]
    pub max_distinct_values: usize,
    #[serde(default = "default_max_page_links")]
    pub max_page_links: usize,
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

fn default_max_distinct_values() -> usize {
    MAX_DISTINCT_VALUES
}

fn default_max_page_links() -> usize {
    DEFAULT_MAX_PAGE_LINKS
}

impl GridConfig {
    pub fn new(columns: Vec<ColumnDescriptor>) -> Self {
        Self {
            columns,
            default_sort: SortState::none(),
            page_size: DEFAULT_PAGE_SIZE,
            mode: PaginationMode::Client,
            storage_key: None,
            max_distinct_values: MAX_DISTINCT_VALUES,
            max_page_links: DEFAULT_MAX_PAGE_LINKS,
        }
    }

    pub fn with_default_sort(mut self, sort: SortState) -> Self {
        self.default_sort = sort;
        self
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_mode(mut self, mode: PaginationMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = Some(key.into());
        self
    }
}

/// Filter, sort and pagination state over one set of rows.
///
/// Every mutation re-runs the pipeline from the stage it affects, so the
/// visible window is always consistent with the current state.
pub struct DataGrid {
    registry: ColumnRegistry,
    rows: Vec<Row>,
    filters: FilterSet,
    sort: SortEngine,
    pagination: PaginationEngine,
    editor: EditorState,
    events: EventEmitter,
    sequencer: RequestSequencer,
    presets: Option<FilterPresetManager>,
    storage_key: String,
    max_distinct_values: usize,
    max_page_links: usize,
    /// Indices into `rows` that pass the filters, in sorted order
    filtered_row_indices: Vec<usize>,
    /// Range of `filtered_row_indices` on the current page
    visible: Range<usize>,
}

impl DataGrid {
    pub fn new(config: GridConfig) -> Result<Self> {
        let registry = ColumnRegistry::new(config.columns)?;
        let mut default_sort = config.default_sort;
        if let Some(column) = default_sort.column.as_deref() {
            if !registry.require(column)?.sortable {
                warn!(column, "Default sort column is not sortable, using insertion order");
                default_sort = SortState::none();
            }
        }
        let pagination = PaginationEngine::new(config.mode, config.page_size)?;

        let mut grid = Self {
            registry,
            rows: Vec::new(),
            filters: FilterSet::new(),
            sort: SortEngine::new(default_sort),
            pagination,
            editor: EditorState::Closed,
            events: EventEmitter::new(),
            sequencer: RequestSequencer::new(),
            presets: None,
            storage_key: config
                .storage_key
                .unwrap_or_else(|| DEFAULT_STORAGE_KEY.to_string()),
            max_distinct_values: config.max_distinct_values,
            max_page_links: config.max_page_links,
            filtered_row_indices: Vec::new(),
            visible: 0..0,
        };
        grid.run_pipeline(Stage::Filter);
        Ok(grid)
    }

    /// Attach the store saved filter sets are kept in
    pub fn with_store(mut self, store: Arc<dyn KeyValueStore>) -> Self {
        self.presets = Some(FilterPresetManager::new(store, self.storage_key.clone()));
        self
    }

    /// Replace the rows: the full dataset in client mode, the current page in
    /// server mode. Client mode returns to page 1.
    pub fn set_data(&mut self, rows: Vec<Row>) {
        let page_before = self.pagination.page();
        self.rows = rows;
        if self.pagination.mode() == PaginationMode::Client {
            self.pagination.reset_page();
        }
        self.run_pipeline(Stage::Filter);
        self.notify_page_change(page_before);
    }

    pub fn columns(&self) -> &ColumnRegistry {
        &self.registry
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Rows on the current page, after filtering and sorting
    pub fn visible_rows(&self) -> Vec<&Row> {
        self.filtered_row_indices[self.visible.clone()]
            .iter()
            .map(|&i| &self.rows[i])
            .collect()
    }

    /// Every row passing the filters, in sorted order
    pub fn filtered_rows(&self) -> Vec<&Row> {
        self.filtered_row_indices
            .iter()
            .map(|&i| &self.rows[i])
            .collect()
    }

    pub fn filtered_len(&self) -> usize {
        self.filtered_row_indices.len()
    }

    pub fn total_len(&self) -> usize {
        self.rows.len()
    }

    pub fn filters(&self) -> &FilterSet {
        &self.filters
    }

    pub fn summaries(&self) -> Vec<FilterSummary> {
        self.filters.summaries(&self.registry)
    }

    pub fn sort_state(&self) -> &SortState {
        self.sort.state()
    }

    pub fn page_info(&self) -> PaginationState {
        self.pagination.state()
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&GridEvent) + 'static) -> SubscriptionId {
        self.events.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.events.unsubscribe(id)
    }

    fn emit(&mut self, event: GridEvent) {
        self.events.emit(&event);
    }
}

impl std::fmt::Debug for DataGrid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataGrid")
            .field("columns", &self.registry.len())
            .field("rows", &self.rows.len())
            .field("filters", &self.filters.len())
            .field("sort", self.sort.state())
            .field("pagination", &self.pagination.state())
            .finish()
    }
}
