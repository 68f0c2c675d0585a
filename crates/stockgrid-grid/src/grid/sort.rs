use super::*;

impl DataGrid {
    /// Sort by `column`, flipping direction if it already holds the sort.
    ///
    /// Returns false for non-sortable columns. The page is kept.
    pub fn toggle_sort(&mut self, column: &str) -> Result<bool> {
        let descriptor = self.registry.require(column)?;
        if !self.sort.toggle(descriptor) {
            debug!(column, "Ignoring sort on non-sortable column");
            return Ok(false);
        }
        self.apply_sort_change();
        Ok(true)
    }

    /// Restore an explicit sort state.
    ///
    /// Returns false when nothing changed or the column is not sortable.
    pub fn set_sort(&mut self, state: SortState) -> Result<bool> {
        if let Some(column) = state.column.as_deref() {
            if !self.registry.require(column)?.sortable {
                return Ok(false);
            }
        }
        if !self.sort.set(state) {
            return Ok(false);
        }
        self.apply_sort_change();
        Ok(true)
    }

    fn apply_sort_change(&mut self) {
        let page_before = self.pagination.page();
        self.run_pipeline(Stage::Sort);
        self.emit(GridEvent::SortChange(self.sort.state().clone()));
        self.notify_page_change(page_before);
    }
}
