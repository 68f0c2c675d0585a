use super::*;

impl DataGrid {
    /// Open the filter editor for `column`, cancelling any other open editor
    pub fn open_editor(&mut self, column: &str) -> Result<&mut FilterDraft> {
        let descriptor = self.registry.require(column)?;
        if !descriptor.filterable {
            return Err(GridError::NotFilterable(descriptor.key.clone()));
        }

        if let EditorState::Open(previous) = &self.editor {
            debug!(column = previous.column(), "Cancelling open filter editor");
        }
        let draft = FilterDraft::new(
            descriptor,
            self.filters.get(column),
            self.distinct_values(column),
        );
        self.editor = EditorState::Open(draft);
        self.editor_mut().ok_or(GridError::EditorNotOpen)
    }

    pub fn editor(&self) -> Option<&FilterDraft> {
        match &self.editor {
            EditorState::Open(draft) => Some(draft),
            EditorState::Closed => None,
        }
    }

    pub fn editor_mut(&mut self) -> Option<&mut FilterDraft> {
        match &mut self.editor {
            EditorState::Open(draft) => Some(draft),
            EditorState::Closed => None,
        }
    }

    pub fn is_editor_open(&self) -> bool {
        matches!(self.editor, EditorState::Open(_))
    }

    /// Resolve the open draft into a predicate or a clear.
    ///
    /// A draft the column rejects keeps the editor open.
    pub fn apply_editor(&mut self) -> Result<EditorOutcome> {
        let EditorState::Open(draft) = std::mem::take(&mut self.editor) else {
            return Err(GridError::EditorNotOpen);
        };

        let resolved = draft
            .resolve()
            .and_then(|predicate| match predicate {
                Some(predicate) => self.apply_predicate(predicate).map(|()| EditorOutcome::Applied),
                None => self
                    .clear_predicate(draft.column())
                    .map(|_| EditorOutcome::Cleared),
            });
        if resolved.is_err() {
            self.editor = EditorState::Open(draft);
        }
        resolved
    }

    /// Remove the column's predicate and close the editor
    pub fn clear_editor(&mut self) -> Result<EditorOutcome> {
        let EditorState::Open(draft) = std::mem::take(&mut self.editor) else {
            return Err(GridError::EditorNotOpen);
        };
        self.clear_predicate(draft.column())?;
        Ok(EditorOutcome::Cleared)
    }

    /// Close the editor without changing anything
    pub fn cancel_editor(&mut self) -> Result<EditorOutcome> {
        match std::mem::take(&mut self.editor) {
            EditorState::Open(_) => Ok(EditorOutcome::Cancelled),
            EditorState::Closed => Err(GridError::EditorNotOpen),
        }
    }

    /// Distinct values of `column` among rows passing every other predicate
    pub fn distinct_values(&self, column: &str) -> Vec<Value> {
        let values = self
            .rows
            .iter()
            .filter(|row| {
                self.filters
                    .evaluate_except(row, &self.registry, Some(column))
            })
            .map(|row| row.get(column));
        distinct_values(values, self.max_distinct_values)
    }
}
