//! Common test fixtures and mocks

#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use stockgrid_grid::sorting::SortEngine;
use stockgrid_grid::{
    ColumnDescriptor, ColumnRegistry, DataGrid, FilterSet, GridConfig, PageFetcher, PageMeta,
    PageRequest, PageResponse, PaginationMode, Row,
};
use tokio::sync::Notify;

pub fn catalog_columns() -> Vec<ColumnDescriptor> {
    vec![
        ColumnDescriptor::text("sku", "SKU"),
        ColumnDescriptor::text("name", "Name"),
        ColumnDescriptor::text("category", "Category"),
        ColumnDescriptor::number("stock", "Stock"),
        ColumnDescriptor::number("price", "Price"),
        ColumnDescriptor::date("updated", "Updated"),
        ColumnDescriptor::text("notes", "Notes").sortable(false).filterable(false),
    ]
}

pub fn product(sku: &str, name: &str, category: &str, stock: i64, price: f64, updated: &str) -> Row {
    Row::new()
        .with("sku", sku)
        .with("name", name)
        .with("category", category)
        .with("stock", stock)
        .with("price", price)
        .with("updated", updated)
}

/// Eight products across three categories
pub fn catalog_rows() -> Vec<Row> {
    vec![
        product("A-100", "Hammer", "tools", 50, 12.5, "2024-03-01"),
        product("A-101", "Screwdriver", "tools", 150, 4.0, "2024-01-15"),
        product("B-200", "Rake", "garden", 5, 18.0, "2023-11-30"),
        product("B-201", "Hose", "garden", 0, 25.0, "2024-02-10"),
        product("C-300", "Primer", "paint", 320, 9.9, "2024-03-20"),
        product("C-301", "Brush", "paint", 75, 3.5, "2024-03-05"),
        product("A-102", "Saw", "tools", 12, 22.0, "2023-12-24"),
        product("B-202", "Shovel", "garden", 101, 30.0, "2024-01-02"),
    ]
}

pub fn catalog_grid(page_size: usize) -> DataGrid {
    let config = GridConfig::new(catalog_columns()).with_page_size(page_size);
    let mut grid = DataGrid::new(config).expect("catalog grid");
    grid.set_data(catalog_rows());
    grid
}

pub fn server_grid(page_size: usize) -> DataGrid {
    let config = GridConfig::new(catalog_columns())
        .with_mode(PaginationMode::Server)
        .with_page_size(page_size);
    DataGrid::new(config).expect("server grid")
}

pub fn skus(rows: &[&Row]) -> Vec<String> {
    rows.iter().map(|r| r.get("sku").to_text()).collect()
}

/// Server stand-in that filters, sorts and pages a fixed dataset.
pub struct MockFetcher {
    pub rows: Vec<Row>,
    pub registry: ColumnRegistry,
    pub should_fail: bool,
    /// Every request received, for assertion in tests
    pub query_log: Arc<parking_lot::Mutex<Vec<PageRequest>>>,
}

impl MockFetcher {
    pub fn new(rows: Vec<Row>) -> Self {
        Self {
            rows,
            registry: ColumnRegistry::new(catalog_columns()).expect("registry"),
            should_fail: false,
            query_log: Arc::new(parking_lot::Mutex::new(Vec::new())),
        }
    }

    pub fn with_failure(mut self) -> Self {
        self.should_fail = true;
        self
    }

    pub fn query_count(&self) -> usize {
        self.query_log.lock().len()
    }

    pub fn query_log(&self) -> Vec<PageRequest> {
        self.query_log.lock().clone()
    }
}

#[async_trait]
impl PageFetcher for MockFetcher {
    async fn fetch_page(&self, request: &PageRequest) -> anyhow::Result<PageResponse> {
        self.query_log.lock().push(request.clone());
        if self.should_fail {
            anyhow::bail!("mock server unavailable");
        }

        let filters: FilterSet = request.filters.iter().cloned().collect();
        let mut matching: Vec<Row> = self
            .rows
            .iter()
            .filter(|row| filters.evaluate(row, &self.registry))
            .cloned()
            .collect();
        SortEngine::new(request.sort.clone()).sort_rows(&mut matching, &self.registry);

        let total_items = matching.len();
        let total_pages = total_items.div_ceil(request.page_size).max(1);
        let page = request.page.clamp(1, total_pages);
        let data = matching
            .into_iter()
            .skip((page - 1) * request.page_size)
            .take(request.page_size)
            .collect();

        Ok(PageResponse {
            data,
            meta: PageMeta {
                page,
                page_size: request.page_size,
                total_items,
                total_pages,
            },
        })
    }
}

/// Fetcher that waits for `release` before answering
pub struct GatedFetcher {
    pub inner: MockFetcher,
    pub gate: Arc<Notify>,
}

impl GatedFetcher {
    pub fn new(inner: MockFetcher) -> Self {
        Self {
            inner,
            gate: Arc::new(Notify::new()),
        }
    }

    pub fn release(&self) {
        self.gate.notify_waiters();
    }
}

#[async_trait]
impl PageFetcher for GatedFetcher {
    async fn fetch_page(&self, request: &PageRequest) -> anyhow::Result<PageResponse> {
        self.gate.notified().await;
        self.inner.fetch_page(request).await
    }
}
