use super::*;

/// Pipeline stages; running a stage also runs every later one
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum Stage {
    Filter,
    Sort,
    Window,
}

impl DataGrid {
    pub(crate) fn run_pipeline(&mut self, from: Stage) {
        if from <= Stage::Filter {
            let (rows, filters, registry) = (&self.rows, &self.filters, &self.registry);
            self.filtered_row_indices = (0..rows.len())
                .filter(|&i| filters.evaluate(&rows[i], registry))
                .collect();
        }
        if from <= Stage::Sort {
            self.sort
                .sort_indices(&self.rows, &mut self.filtered_row_indices, &self.registry);
        }
        self.visible = self.pagination.window_range(self.filtered_row_indices.len());

        debug!(
            stage = ?from,
            rows = self.rows.len(),
            filtered = self.filtered_row_indices.len(),
            page = self.pagination.page(),
            visible = self.visible.len(),
            "Recomputed grid pipeline"
        );
    }

    /// Emit `PageChange` if the effective page moved away from `before`
    pub(crate) fn notify_page_change(&mut self, before: usize) {
        let page = self.pagination.page();
        if page != before {
            self.emit(GridEvent::PageChange(page));
        }
    }
}
