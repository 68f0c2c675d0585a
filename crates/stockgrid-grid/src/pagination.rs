//! Pagination state for the grid
//!
//! In client mode the engine windows the locally filtered rows and derives
//! the totals. In server mode the totals come from the last [`PageMeta`] and
//! are kept as given.

use std::ops::Range;

use serde::{Deserialize, Serialize};
use stockgrid_core::{GridError, Result};
use tracing::warn;

pub const DEFAULT_PAGE_SIZE: usize = 20;
pub const DEFAULT_MAX_PAGE_LINKS: usize = 5;

/// Where paging happens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaginationMode {
    /// The grid holds the full dataset and slices it locally
    #[default]
    Client,
    /// Each page is fetched; the server reports the totals
    Server,
}

impl PaginationMode {
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Client => "Client",
            Self::Server => "Server",
        }
    }
}

/// Page metadata reported by a server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub page: usize,
    pub page_size: usize,
    pub total_items: usize,
    pub total_pages: usize,
}

/// Pagination state of a grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationState {
    pub mode: PaginationMode,
    /// Current page number (1-indexed)
    pub page: usize,
    pub page_size: usize,
    pub total_items: usize,
    pub total_pages: usize,
}

impl PaginationState {
    /// Index of the first item of the current page within the full result
    pub fn offset(&self) -> usize {
        (self.page.max(1) - 1) * self.page_size
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}

/// One page of items cut from a client-side dataset
#[derive(Debug, Clone, PartialEq)]
pub struct PageWindow<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub page_size: usize,
    pub total_items: usize,
    pub total_pages: usize,
    pub start_index: usize,
    pub end_index: usize,
}

/// An entry of the page-button strip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PageLink {
    Page { number: usize, current: bool },
    Ellipsis,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageLinks {
    pub previous: Option<usize>,
    pub next: Option<usize>,
    pub links: Vec<PageLink>,
}

/// Numbers for the "showing X-Y of N" footer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordsInfo {
    pub showing_from: usize,
    pub showing_to: usize,
    pub total_items: usize,
    pub unfiltered_total: usize,
}

impl RecordsInfo {
    pub fn is_filtered(&self) -> bool {
        self.total_items != self.unfiltered_total
    }
}

#[derive(Debug, Clone)]
pub struct PaginationEngine {
    state: PaginationState,
}

impl PaginationEngine {
    pub fn new(mode: PaginationMode, page_size: usize) -> Result<Self> {
        if page_size == 0 {
            return Err(GridError::InvalidPageSize(page_size));
        }
        Ok(Self {
            state: PaginationState {
                mode,
                page: 1,
                page_size,
                total_items: 0,
                total_pages: match mode {
                    PaginationMode::Client => 1,
                    PaginationMode::Server => 0,
                },
            },
        })
    }

    pub fn state(&self) -> PaginationState {
        self.state
    }

    pub fn mode(&self) -> PaginationMode {
        self.state.mode
    }

    pub fn page(&self) -> usize {
        self.state.page
    }

    pub fn page_size(&self) -> usize {
        self.state.page_size
    }

    pub fn total_items(&self) -> usize {
        self.state.total_items
    }

    pub fn total_pages(&self) -> usize {
        self.state.total_pages
    }

    /// Switch mode; the page returns to 1 and totals are forgotten.
    pub fn set_mode(&mut self, mode: PaginationMode) -> bool {
        if self.state.mode == mode {
            return false;
        }
        self.state.mode = mode;
        self.state.page = 1;
        self.state.total_items = 0;
        self.state.total_pages = 0;
        true
    }

    /// Returns true when the size changed, which also resets the page to 1
    pub fn set_page_size(&mut self, page_size: usize) -> Result<bool> {
        if page_size == 0 {
            return Err(GridError::InvalidPageSize(page_size));
        }
        if page_size == self.state.page_size {
            return Ok(false);
        }
        self.state.page_size = page_size;
        self.state.page = 1;
        if self.state.mode == PaginationMode::Client {
            self.state.total_pages = client_total_pages(self.state.total_items, page_size);
        }
        Ok(true)
    }

    /// Record a requested page and return the effective one.
    ///
    /// The page is at least 1 and never past the last known page.
    pub fn go_to_page(&mut self, page: usize) -> usize {
        let mut page = page.max(1);
        if self.state.total_pages > 0 {
            page = page.min(self.state.total_pages);
        }
        self.state.page = page;
        page
    }

    pub fn reset_page(&mut self) {
        self.state.page = 1;
    }

    /// Range of the current page over `len` locally held items.
    ///
    /// Client mode recomputes the totals from `len` and stores the clamped
    /// page. Server mode leaves the reported totals alone and covers every
    /// local item.
    pub fn window_range(&mut self, len: usize) -> Range<usize> {
        match self.state.mode {
            PaginationMode::Server => 0..len,
            PaginationMode::Client => {
                let total_pages = client_total_pages(len, self.state.page_size);
                let page = self.state.page.clamp(1, total_pages);
                self.state.total_items = len;
                self.state.total_pages = total_pages;
                self.state.page = page;

                let start = ((page - 1) * self.state.page_size).min(len);
                let end = (start + self.state.page_size).min(len);
                start..end
            }
        }
    }

    pub fn window<T: Clone>(&mut self, items: &[T]) -> PageWindow<T> {
        let range = self.window_range(items.len());
        PageWindow {
            items: items[range.clone()].to_vec(),
            page: self.state.page,
            page_size: self.state.page_size,
            total_items: self.state.total_items,
            total_pages: self.state.total_pages,
            start_index: range.start,
            end_index: range.end,
        }
    }

    /// Store server-reported metadata as given, except that page 0 reads as 1
    pub fn apply_page(&mut self, meta: PageMeta) {
        if meta.page_size == 0 {
            warn!(page = meta.page, "Server page metadata has a zero page size, keeping {}", self.state.page_size);
        } else {
            self.state.page_size = meta.page_size;
        }
        self.state.page = meta.page.max(1);
        self.state.total_items = meta.total_items;
        self.state.total_pages = meta.total_pages;
    }

    /// The page-button strip centered on the current page
    pub fn page_links(&self, max_visible: usize) -> PageLinks {
        let total = self.state.total_pages;
        // Server metadata may report a page past the last one.
        let current = self.state.page.clamp(1, total.max(1));
        let span = max_visible.max(1) - 1;

        let mut links = Vec::new();
        if total > 0 {
            let mut start = current.saturating_sub(span / 2).max(1);
            let end = (start + span).min(total);
            if end - start < span {
                start = end.saturating_sub(span).max(1);
            }

            if start > 1 {
                links.push(PageLink::Page { number: 1, current: current == 1 });
                if start > 2 {
                    links.push(PageLink::Ellipsis);
                }
            }
            for number in start..=end {
                links.push(PageLink::Page { number, current: number == current });
            }
            if end < total {
                if end < total - 1 {
                    links.push(PageLink::Ellipsis);
                }
                links.push(PageLink::Page { number: total, current: current == total });
            }
        }

        PageLinks {
            previous: (current > 1).then(|| current - 1),
            next: (current < total).then(|| current + 1),
            links,
        }
    }

    pub fn records_info(&self, unfiltered_total: usize) -> RecordsInfo {
        let total_items = self.state.total_items;
        let offset = self.state.offset();
        let (showing_from, showing_to) = if total_items == 0 || offset >= total_items {
            (0, 0)
        } else {
            (offset + 1, (offset + self.state.page_size).min(total_items))
        };
        RecordsInfo {
            showing_from,
            showing_to,
            total_items,
            unfiltered_total,
        }
    }
}

impl Default for PaginationEngine {
    fn default() -> Self {
        Self {
            state: PaginationState {
                mode: PaginationMode::Client,
                page: 1,
                page_size: DEFAULT_PAGE_SIZE,
                total_items: 0,
                total_pages: 1,
            },
        }
    }
}

fn client_total_pages(total_items: usize, page_size: usize) -> usize {
    total_items.div_ceil(page_size).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn client(page_size: usize) -> PaginationEngine {
        PaginationEngine::new(PaginationMode::Client, page_size).unwrap()
    }

    fn numbers(links: &PageLinks) -> Vec<Option<usize>> {
        links
            .links
            .iter()
            .map(|link| match link {
                PageLink::Page { number, .. } => Some(*number),
                PageLink::Ellipsis => None,
            })
            .collect()
    }

    #[test]
    fn test_window_five_rows_page_size_two() {
        let rows = vec!['a', 'b', 'c', 'd', 'e'];
        let mut engine = client(2);

        let first = engine.window(&rows);
        assert_eq!(first.items, vec!['a', 'b']);
        assert_eq!(first.total_pages, 3);

        engine.go_to_page(3);
        let last = engine.window(&rows);
        assert_eq!(last.items, vec!['e']);
        assert_eq!((last.start_index, last.end_index), (4, 5));
    }

    #[test]
    fn test_empty_dataset_has_one_page() {
        let mut engine = client(10);
        let window = engine.window::<u8>(&[]);
        assert_eq!(window.total_pages, 1);
        assert_eq!(window.page, 1);
        assert!(window.items.is_empty());
    }

    #[test]
    fn test_out_of_range_page_is_clamped() {
        let mut engine = client(2);
        engine.window(&[1, 2, 3]);
        assert_eq!(engine.go_to_page(99), 2);
        assert_eq!(engine.go_to_page(0), 1);
    }

    #[test]
    fn test_shrinking_data_clamps_stored_page() {
        let mut engine = client(2);
        engine.window(&[1, 2, 3, 4, 5, 6]);
        engine.go_to_page(3);
        let window = engine.window(&[1, 2]);
        assert_eq!(window.page, 1);
        assert_eq!(engine.page(), 1);
    }

    #[test]
    fn test_page_size_zero_is_rejected() {
        let mut engine = client(2);
        engine.window(&[1, 2, 3, 4, 5]);
        engine.go_to_page(2);
        assert!(matches!(engine.set_page_size(0), Err(GridError::InvalidPageSize(0))));
        assert_eq!(engine.page(), 2);

        assert!(engine.set_page_size(5).unwrap());
        assert_eq!(engine.page(), 1);
        assert!(!engine.set_page_size(5).unwrap());
    }

    #[test]
    fn test_server_meta_is_kept_verbatim() {
        let mut engine = PaginationEngine::new(PaginationMode::Server, 20).unwrap();
        engine.apply_page(PageMeta {
            page: 2,
            page_size: 20,
            total_items: 412,
            total_pages: 21,
        });

        assert_eq!(engine.window_range(3), 0..3);
        assert_eq!(engine.total_items(), 412);
        assert_eq!(engine.total_pages(), 21);
        assert_eq!(engine.go_to_page(40), 21);
    }

    #[test]
    fn test_server_without_meta_accepts_any_page() {
        let mut engine = PaginationEngine::new(PaginationMode::Server, 20).unwrap();
        assert_eq!(engine.go_to_page(7), 7);
    }

    #[test]
    fn test_server_page_past_the_end_still_links() {
        let mut engine = PaginationEngine::new(PaginationMode::Server, 10).unwrap();
        engine.apply_page(PageMeta {
            page: 10,
            page_size: 10,
            total_items: 15,
            total_pages: 2,
        });
        assert_eq!(engine.page(), 10);

        let links = engine.page_links(5);
        assert_eq!(numbers(&links), vec![Some(1), Some(2)]);
        assert!(links.links.contains(&PageLink::Page { number: 2, current: true }));
        assert_eq!(links.previous, Some(1));
        assert_eq!(links.next, None);
    }

    #[test]
    fn test_server_page_zero_reads_as_first() {
        let mut engine = PaginationEngine::new(PaginationMode::Server, 10).unwrap();
        engine.apply_page(PageMeta {
            page: 0,
            page_size: 10,
            total_items: 0,
            total_pages: 0,
        });
        assert_eq!(engine.page(), 1);

        let links = engine.page_links(5);
        assert!(links.links.is_empty());
        assert_eq!((links.previous, links.next), (None, None));
    }

    #[test]
    fn test_page_links_in_the_middle() {
        let mut engine = client(1);
        engine.window(&[0; 20]);
        engine.go_to_page(10);

        let links = engine.page_links(5);
        assert_eq!(
            numbers(&links),
            vec![Some(1), None, Some(8), Some(9), Some(10), Some(11), Some(12), None, Some(20)]
        );
        assert_eq!(links.previous, Some(9));
        assert_eq!(links.next, Some(11));
        assert!(links.links.contains(&PageLink::Page { number: 10, current: true }));
    }

    #[test]
    fn test_page_links_at_the_edges() {
        let mut engine = client(1);
        engine.window(&[0; 20]);

        let first = engine.page_links(5);
        assert_eq!(
            numbers(&first),
            vec![Some(1), Some(2), Some(3), Some(4), Some(5), None, Some(20)]
        );
        assert_eq!(first.previous, None);

        engine.go_to_page(20);
        let last = engine.page_links(5);
        assert_eq!(
            numbers(&last),
            vec![Some(1), None, Some(16), Some(17), Some(18), Some(19), Some(20)]
        );
        assert_eq!(last.next, None);
    }

    #[test]
    fn test_page_links_few_pages() {
        let mut engine = client(2);
        engine.window(&[0; 5]);
        assert_eq!(numbers(&engine.page_links(5)), vec![Some(1), Some(2), Some(3)]);
    }

    #[test]
    fn test_records_info() {
        let mut engine = client(10);
        engine.window(&[0; 25]);
        engine.go_to_page(3);
        engine.window(&[0; 25]);

        assert_eq!(
            engine.records_info(40),
            RecordsInfo {
                showing_from: 21,
                showing_to: 25,
                total_items: 25,
                unfiltered_total: 40,
            }
        );
        assert_eq!(client(10).records_info(0).showing_from, 0);
    }
}
