use super::*;

impl DataGrid {
    /// Apply a predicate, replacing the column's current one in place.
    ///
    /// Rejected predicates leave the grid untouched.
    pub fn apply_predicate(&mut self, predicate: Predicate) -> Result<()> {
        let column = self.registry.require(predicate.column())?;
        if !column.filterable {
            return Err(GridError::NotFilterable(column.key.clone()));
        }
        predicate.validate_for(column)?;

        let page_before = self.pagination.page();
        self.filters.upsert(predicate);
        self.pagination.reset_page();
        self.run_pipeline(Stage::Filter);
        self.notify_filter_change();
        self.notify_page_change(page_before);
        Ok(())
    }

    pub fn apply_filter(&mut self, column: &str, operator: FilterOperator, args: FilterArgs) -> Result<()> {
        self.registry.require(column)?;
        self.apply_predicate(Predicate::new(column, operator, args)?)
    }

    /// Remove the column's predicate; returns whether one was active
    pub fn clear_predicate(&mut self, column: &str) -> Result<bool> {
        self.registry.require(column)?;
        let page_before = self.pagination.page();
        let removed = self.filters.remove(column).is_some();
        self.pagination.reset_page();
        self.run_pipeline(if removed { Stage::Filter } else { Stage::Window });
        if removed {
            self.notify_filter_change();
        }
        self.notify_page_change(page_before);
        Ok(removed)
    }

    /// Remove the chip at `index` in display order
    pub fn remove_predicate_at(&mut self, index: usize) -> Option<Predicate> {
        let page_before = self.pagination.page();
        let removed = self.filters.remove_at(index)?;
        self.pagination.reset_page();
        self.run_pipeline(Stage::Filter);
        self.notify_filter_change();
        self.notify_page_change(page_before);
        Some(removed)
    }

    /// Drop every predicate and return to the declared default sort
    pub fn clear_all(&mut self) {
        let page_before = self.pagination.page();
        let had_filters = !self.filters.is_empty();
        self.filters.clear();
        let sort_changed = self.sort.reset();
        self.pagination.reset_page();
        self.run_pipeline(Stage::Filter);

        if had_filters {
            self.notify_filter_change();
        }
        if sort_changed {
            self.emit(GridEvent::SortChange(self.sort.state().clone()));
        }
        self.notify_page_change(page_before);
    }

    /// Save the active predicates under `name`
    pub fn save_filters_as(&mut self, name: &str) -> Result<SavedFilterSet> {
        let presets = self.presets.as_ref().ok_or(GridError::StorageUnavailable)?;
        presets.save(name, self.filters.as_slice())
    }

    /// Replace the active predicates with a saved set.
    ///
    /// Predicates for columns that are gone, or that no longer suit the
    /// column, are skipped.
    pub fn load_saved_filters(&mut self, name: &str) -> Result<()> {
        let presets = self.presets.as_ref().ok_or(GridError::StorageUnavailable)?;
        let saved = presets
            .get(name)?
            .ok_or_else(|| GridError::NotFound(name.to_string()))?;

        let mut filters = FilterSet::new();
        for predicate in saved.predicates {
            match self.check_predicate(&predicate) {
                Ok(()) => {
                    filters.upsert(predicate);
                }
                Err(e) => warn!(set = name, column = predicate.column(), "Skipping saved predicate: {}", e),
            }
        }

        let page_before = self.pagination.page();
        self.filters = filters;
        self.pagination.reset_page();
        self.run_pipeline(Stage::Filter);
        info!(name, predicates = self.filters.len(), "Loaded saved filter set");
        self.notify_filter_change();
        self.notify_page_change(page_before);
        Ok(())
    }

    pub fn delete_saved_filters(&mut self, name: &str) -> Result<bool> {
        let presets = self.presets.as_ref().ok_or(GridError::StorageUnavailable)?;
        presets.delete(name)
    }

    pub fn saved_filter_sets(&self) -> Result<Vec<SavedFilterSet>> {
        let presets = self.presets.as_ref().ok_or(GridError::StorageUnavailable)?;
        presets.list()
    }

    fn check_predicate(&self, predicate: &Predicate) -> Result<()> {
        let column = self.registry.require(predicate.column())?;
        if !column.filterable {
            return Err(GridError::NotFilterable(column.key.clone()));
        }
        predicate.validate_for(column)
    }

    fn notify_filter_change(&mut self) {
        self.emit(GridEvent::FilterChange(self.filters.to_vec()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use std::rc::Rc;
    use stockgrid_storage::MemoryStore;

    fn grid() -> DataGrid {
        let config = GridConfig::new(vec![
            ColumnDescriptor::text("name", "Name"),
            ColumnDescriptor::number("stock", "Stock"),
            ColumnDescriptor::text("notes", "Notes").filterable(false),
        ])
        .with_page_size(2);
        let mut grid = DataGrid::new(config).unwrap();
        grid.set_data(
            [("a", 5), ("b", 50), ("c", 150), ("d", 500), ("e", 0)]
                .into_iter()
                .map(|(name, stock)| Row::new().with("name", name).with("stock", stock))
                .collect(),
        );
        grid
    }

    fn gte(value: i64) -> Predicate {
        Predicate::compare("stock", FilterOperator::GreaterThanOrEqual, value).unwrap()
    }

    #[test]
    fn test_rejections_leave_state_untouched() {
        let mut grid = grid();
        grid.go_to_page(2);

        assert!(matches!(
            grid.apply_predicate(Predicate::compare("price", FilterOperator::Equal, 1).unwrap()),
            Err(GridError::UnknownColumn(_))
        ));
        assert!(matches!(
            grid.apply_predicate(Predicate::compare("notes", FilterOperator::Contains, "x").unwrap()),
            Err(GridError::NotFilterable(_))
        ));
        assert!(matches!(
            grid.apply_predicate(Predicate::compare("stock", FilterOperator::Contains, "5").unwrap()),
            Err(GridError::InvalidOperator { .. })
        ));
        assert!(matches!(
            grid.apply_filter("stock", FilterOperator::GreaterThan, FilterArgs::Single("many".into())),
            Err(GridError::InvalidPredicate(_))
        ));

        assert!(grid.filters().is_empty());
        assert_eq!(grid.page_info().page, 2);
    }

    #[test]
    fn test_apply_filter_checks_column_first() {
        let mut grid = grid();
        let err = grid
            .apply_filter("price", FilterOperator::Equal, FilterArgs::List(vec![]))
            .unwrap_err();
        assert!(matches!(err, GridError::UnknownColumn(_)));
    }

    #[test]
    fn test_apply_emits_filter_then_page_change() {
        let mut grid = grid();
        grid.go_to_page(3);
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = events.clone();
        grid.subscribe(move |event| sink.borrow_mut().push(event.clone()));

        grid.apply_predicate(gte(100)).unwrap();

        assert_eq!(
            *events.borrow(),
            vec![GridEvent::FilterChange(vec![gte(100)]), GridEvent::PageChange(1)]
        );
    }

    #[test]
    fn test_clear_predicate_only_notifies_when_removed() {
        let mut grid = grid();
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = events.clone();
        grid.subscribe(move |event: &GridEvent| sink.borrow_mut().push(event.name()));

        assert!(!grid.clear_predicate("stock").unwrap());
        assert!(events.borrow().is_empty());

        grid.apply_predicate(gte(100)).unwrap();
        assert!(grid.clear_predicate("stock").unwrap());
        assert_eq!(*events.borrow(), vec!["filter-change", "filter-change"]);
        assert_eq!(grid.filtered_len(), 5);
        assert!(matches!(grid.clear_predicate("price"), Err(GridError::UnknownColumn(_))));
    }

    #[test]
    fn test_remove_predicate_at() {
        let mut grid = grid();
        grid.apply_predicate(Predicate::compare("name", FilterOperator::NotEqual, "a").unwrap())
            .unwrap();
        grid.apply_predicate(gte(100)).unwrap();

        let removed = grid.remove_predicate_at(0).unwrap();
        assert_eq!(removed.column(), "name");
        assert_eq!(grid.filtered_len(), 2);
        assert!(grid.remove_predicate_at(3).is_none());
    }

    #[test]
    fn test_clear_all_restores_default_sort() {
        let config = GridConfig::new(vec![ColumnDescriptor::number("stock", "Stock")])
            .with_default_sort(SortState::descending("stock"));
        let mut grid = DataGrid::new(config).unwrap();
        grid.toggle_sort("stock").unwrap();
        grid.apply_predicate(gte(1)).unwrap();

        grid.clear_all();
        assert!(grid.filters().is_empty());
        assert_eq!(grid.sort_state(), &SortState::descending("stock"));
    }

    #[test]
    fn test_saved_filters_need_a_store() {
        let mut grid = grid();
        grid.apply_predicate(gte(100)).unwrap();
        assert!(matches!(grid.save_filters_as("x"), Err(GridError::StorageUnavailable)));
        assert!(matches!(grid.load_saved_filters("x"), Err(GridError::StorageUnavailable)));
        assert!(matches!(grid.saved_filter_sets(), Err(GridError::StorageUnavailable)));
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let mut grid = grid().with_store(store.clone());
        grid.apply_predicate(gte(100)).unwrap();
        grid.save_filters_as("big").unwrap();
        grid.clear_all();

        grid.load_saved_filters("big").unwrap();
        assert_eq!(grid.filters().as_slice(), &[gte(100)]);
        assert_eq!(grid.filtered_len(), 2);
        assert!(matches!(grid.load_saved_filters("nope"), Err(GridError::NotFound(_))));

        assert!(grid.delete_saved_filters("big").unwrap());
        assert!(grid.saved_filter_sets().unwrap().is_empty());
    }

    #[test]
    fn test_load_skips_predicates_for_unknown_columns() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let manager = FilterPresetManager::new(store.clone(), DEFAULT_STORAGE_KEY);
        manager
            .save(
                "legacy",
                &[
                    Predicate::compare("supplier", FilterOperator::Contains, "acme").unwrap(),
                    gte(100),
                ],
            )
            .unwrap();

        let mut grid = grid().with_store(store);
        grid.load_saved_filters("legacy").unwrap();
        assert_eq!(grid.filters().as_slice(), &[gte(100)]);
    }
}
