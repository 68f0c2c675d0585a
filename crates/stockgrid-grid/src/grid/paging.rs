use super::*;

impl DataGrid {
    /// Move to `page` and return the effective page.
    ///
    /// Client mode clamps into the known pages. Server mode records the
    /// request so the caller can fetch it.
    pub fn go_to_page(&mut self, page: usize) -> usize {
        let page_before = self.pagination.page();
        self.pagination.go_to_page(page);
        self.run_pipeline(Stage::Window);
        self.notify_page_change(page_before);
        self.pagination.page()
    }

    pub fn next_page(&mut self) -> usize {
        self.go_to_page(self.pagination.page() + 1)
    }

    pub fn previous_page(&mut self) -> usize {
        self.go_to_page(self.pagination.page().saturating_sub(1))
    }

    /// Change the page size; a new size returns to page 1
    pub fn set_page_size(&mut self, page_size: usize) -> Result<()> {
        let page_before = self.pagination.page();
        if self.pagination.set_page_size(page_size)? {
            self.run_pipeline(Stage::Window);
            self.notify_page_change(page_before);
        }
        Ok(())
    }

    pub fn set_mode(&mut self, mode: PaginationMode) {
        let page_before = self.pagination.page();
        if self.pagination.set_mode(mode) {
            info!(mode = mode.display_name(), "Pagination mode changed");
            self.run_pipeline(Stage::Window);
            self.notify_page_change(page_before);
        }
    }

    pub fn page_links(&self) -> PageLinks {
        self.pagination.page_links(self.max_page_links)
    }

    pub fn records_info(&self) -> RecordsInfo {
        let unfiltered_total = match self.pagination.mode() {
            PaginationMode::Client => self.rows.len(),
            PaginationMode::Server => self.pagination.total_items(),
        };
        self.pagination.records_info(unfiltered_total)
    }

    /// Install a server page: its rows and its metadata, kept as reported
    pub fn apply_server_page(&mut self, response: PageResponse) {
        if self.pagination.mode() != PaginationMode::Server {
            warn!("Ignoring server page while in client pagination mode");
            return;
        }
        self.rows = response.data;
        self.pagination.apply_page(response.meta);
        self.run_pipeline(Stage::Filter);
    }

    /// Describe the page to fetch next and abort any request still in flight
    pub fn begin_page_request(&mut self) -> PendingPageRequest {
        let (sequence, registration) = self.sequencer.begin();
        let request = PageRequest {
            sequence,
            page: self.pagination.page(),
            page_size: self.pagination.page_size(),
            filters: self.filters.to_vec(),
            sort: self.sort.state().clone(),
        };
        debug!(sequence, page = request.page, "Starting page request");
        PendingPageRequest {
            request,
            registration,
        }
    }

    /// Apply the outcome of request `sequence`.
    ///
    /// Superseded responses are discarded and failures keep the current
    /// rows. Returns true only when a page was applied.
    pub fn complete_page_request(
        &mut self,
        sequence: u64,
        result: anyhow::Result<PageResponse>,
    ) -> bool {
        if !self.sequencer.finish(sequence) {
            warn!(
                sequence,
                latest = self.sequencer.latest(),
                "Discarding stale page response"
            );
            return false;
        }
        match result {
            Ok(response) => {
                self.apply_server_page(response);
                true
            }
            Err(e) => {
                warn!(sequence, "Page request failed: {:#}", e);
                false
            }
        }
    }

    /// Fetch the current page through `fetcher` and apply it
    pub async fn refresh_page(&mut self, fetcher: &dyn PageFetcher) -> bool {
        let pending = self.begin_page_request();
        let sequence = pending.sequence();
        match fetch_abortable(fetcher, &pending.request, pending.registration).await {
            Some(result) => self.complete_page_request(sequence, result),
            None => false,
        }
    }
}
