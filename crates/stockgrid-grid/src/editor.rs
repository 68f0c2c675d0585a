//! Per-column filter editor
//!
//! A draft holds the in-progress input of the one open editor: a list of
//! distinct values to pick from, and a condition (operator plus one or two
//! inputs). [`FilterDraft::resolve`] turns it into a predicate or a clear.

use std::cmp::Ordering;

use stockgrid_core::{parse::parse_number, ColumnDescriptor, ColumnType, GridError, Result, Value};

use crate::filter_types::{Condition, FilterOperator, Predicate};

pub const MAX_DISTINCT_VALUES: usize = 100;

/// Which half of the editor is in use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditorTab {
    #[default]
    Values,
    Condition,
}

/// How an open editor was closed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorOutcome {
    Applied,
    Cleared,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FilterDraft {
    column: String,
    column_type: ColumnType,
    pub tab: EditorTab,
    pub operator: FilterOperator,
    pub value: String,
    pub value2: String,
    /// Narrows [`FilterDraft::visible_values`]
    pub search: String,
    available_values: Vec<Value>,
    selected: Vec<bool>,
}

impl FilterDraft {
    pub(crate) fn new(
        column: &ColumnDescriptor,
        existing: Option<&Predicate>,
        available_values: Vec<Value>,
    ) -> Self {
        let mut draft = Self {
            column: column.key.clone(),
            column_type: column.column_type,
            tab: EditorTab::Values,
            operator: FilterOperator::default_for(column.column_type),
            value: String::new(),
            value2: String::new(),
            search: String::new(),
            selected: vec![false; available_values.len()],
            available_values,
        };

        match existing.map(Predicate::condition) {
            Some(Condition::InList { values }) => {
                for value in values {
                    draft.set_selected(value, true);
                }
            }
            Some(Condition::Compare { operator, value }) => {
                draft.tab = EditorTab::Condition;
                draft.operator = *operator;
                draft.value = value.to_text();
            }
            Some(Condition::Range {
                negated,
                lower,
                upper,
            }) => {
                draft.tab = EditorTab::Condition;
                draft.operator = if *negated {
                    FilterOperator::IsNotBetween
                } else {
                    FilterOperator::IsBetween
                };
                draft.value = lower.as_ref().map(Value::to_text).unwrap_or_default();
                draft.value2 = upper.as_ref().map(Value::to_text).unwrap_or_default();
            }
            None => {}
        }
        draft
    }

    /// The column this draft edits, fixed for the editor's lifetime
    pub fn column(&self) -> &str {
        &self.column
    }

    pub fn column_type(&self) -> ColumnType {
        self.column_type
    }

    pub fn available_values(&self) -> &[Value] {
        &self.available_values
    }

    /// Available values whose text contains the search, case-insensitively
    pub fn visible_values(&self) -> impl Iterator<Item = &Value> {
        let needle = self.search.to_lowercase();
        self.available_values
            .iter()
            .filter(move |v| v.to_text().to_lowercase().contains(&needle))
    }

    pub fn selected_values(&self) -> Vec<Value> {
        self.available_values
            .iter()
            .zip(&self.selected)
            .filter(|(_, selected)| **selected)
            .map(|(value, _)| value.clone())
            .collect()
    }

    pub fn is_selected(&self, value: &Value) -> bool {
        self.position(value).is_some_and(|i| self.selected[i])
    }

    /// Operators offered for this column's type
    pub fn operators(&self) -> &'static [FilterOperator] {
        FilterOperator::for_type(self.column_type)
    }

    pub fn set_operator(&mut self, operator: FilterOperator) -> Result<()> {
        if operator.is_list() || !operator.is_valid_for(self.column_type) {
            return Err(GridError::InvalidOperator {
                column: self.column.clone(),
                operator: operator.key().to_string(),
                column_type: self.column_type,
            });
        }
        self.operator = operator;
        Ok(())
    }

    /// Switch tabs, discarding the input of the tab being left
    pub fn switch_tab(&mut self, tab: EditorTab) {
        self.tab = tab;
        match tab {
            EditorTab::Values => {
                self.value.clear();
                self.value2.clear();
            }
            EditorTab::Condition => self.selected.fill(false),
        }
    }

    /// Returns false if the value is not among the available values
    pub fn set_selected(&mut self, value: &Value, selected: bool) -> bool {
        match self.position(value) {
            Some(index) => {
                self.selected[index] = selected;
                true
            }
            None => false,
        }
    }

    pub fn toggle_value(&mut self, value: &Value) -> bool {
        let selected = !self.is_selected(value);
        self.set_selected(value, selected)
    }

    /// Check or uncheck every value matching the current search
    pub fn select_all(&mut self, selected: bool) {
        let needle = self.search.to_lowercase();
        for (value, slot) in self.available_values.iter().zip(self.selected.iter_mut()) {
            if value.to_text().to_lowercase().contains(&needle) {
                *slot = selected;
            }
        }
    }

    /// Turn the draft into a predicate, or `None` when the column's filter
    /// should be cleared.
    pub fn resolve(&self) -> Result<Option<Predicate>> {
        let value = self.value.trim();
        let value2 = self.value2.trim();

        if self.operator.requires_two_values() {
            if value.is_empty() && value2.is_empty() {
                return Ok(None);
            }
            return Predicate::range(&self.column, self.operator, value, value2).map(Some);
        }

        let selected = self.selected_values();
        let all_selected = !self.selected.is_empty() && selected.len() == self.selected.len();
        if all_selected {
            Ok(None)
        } else if !selected.is_empty() {
            Predicate::in_list(&self.column, selected).map(Some)
        } else if !value.is_empty() {
            Predicate::compare(&self.column, self.operator, value).map(Some)
        } else {
            Ok(None)
        }
    }

    fn position(&self, value: &Value) -> Option<usize> {
        let text = value.to_text();
        self.available_values.iter().position(|v| v.to_text() == text)
    }
}

/// Open/closed state of a grid's single editor
#[derive(Debug, Clone, Default, PartialEq)]
pub enum EditorState {
    #[default]
    Closed,
    Open(FilterDraft),
}

/// Non-blank values de-duplicated by text, ordered numeric-aware and capped
pub fn distinct_values<'a>(values: impl IntoIterator<Item = &'a Value>, limit: usize) -> Vec<Value> {
    let mut seen = std::collections::HashSet::new();
    let mut distinct: Vec<Value> = values
        .into_iter()
        .filter(|v| !v.is_blank())
        .filter(|v| seen.insert(v.to_text()))
        .cloned()
        .collect();
    distinct.sort_by(natural_cmp);
    distinct.truncate(limit);
    distinct
}

/// Numbers before text, numbers by value, text case-insensitively
fn natural_cmp(a: &Value, b: &Value) -> Ordering {
    match (parse_number(a), parse_number(b)) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => {
            let (x, y) = (a.to_text(), b.to_text());
            x.to_lowercase().cmp(&y.to_lowercase()).then_with(|| x.cmp(&y))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn category() -> ColumnDescriptor {
        ColumnDescriptor::text("category", "Category")
    }

    fn values(items: &[&str]) -> Vec<Value> {
        items.iter().map(|s| Value::from(*s)).collect()
    }

    #[test]
    fn test_distinct_values_sorted_numeric_aware() {
        let raw = vec![
            Value::from("10"),
            Value::Int(9),
            Value::from("b"),
            Value::Null,
            Value::from(""),
            Value::from("A"),
            Value::from("10"),
        ];
        assert_eq!(
            distinct_values(&raw, 100),
            vec![Value::Int(9), Value::from("10"), Value::from("A"), Value::from("b")]
        );
        assert_eq!(distinct_values(&raw, 2).len(), 2);
    }

    #[test]
    fn test_new_draft_defaults() {
        let draft = FilterDraft::new(&category(), None, values(&["A", "B"]));
        assert_eq!(draft.operator, FilterOperator::Contains);
        assert_eq!(draft.tab, EditorTab::Values);
        assert!(draft.selected_values().is_empty());

        let stock = ColumnDescriptor::number("stock", "Stock");
        assert_eq!(FilterDraft::new(&stock, None, vec![]).operator, FilterOperator::Equal);
    }

    #[test]
    fn test_draft_loads_existing_predicate() {
        let existing = Predicate::in_list("category", ["B"]).unwrap();
        let draft = FilterDraft::new(&category(), Some(&existing), values(&["A", "B"]));
        assert_eq!(draft.selected_values(), values(&["B"]));

        let range = Predicate::between("stock", 5, "").unwrap();
        let stock = ColumnDescriptor::number("stock", "Stock");
        let draft = FilterDraft::new(&stock, Some(&range), vec![]);
        assert_eq!(draft.tab, EditorTab::Condition);
        assert_eq!(draft.operator, FilterOperator::IsBetween);
        assert_eq!((draft.value.as_str(), draft.value2.as_str()), ("5", ""));
    }

    #[test]
    fn test_resolve_some_values_selected() {
        let mut draft = FilterDraft::new(&category(), None, values(&["A", "B", "C"]));
        draft.toggle_value(&Value::from("A"));
        draft.toggle_value(&Value::from("C"));

        let predicate = draft.resolve().unwrap().unwrap();
        assert_eq!(predicate, Predicate::in_list("category", ["A", "C"]).unwrap());
    }

    #[test]
    fn test_resolve_all_values_selected_clears() {
        let mut draft = FilterDraft::new(&category(), None, values(&["A", "B"]));
        draft.select_all(true);
        assert_eq!(draft.resolve().unwrap(), None);
    }

    #[test]
    fn test_select_all_respects_search() {
        let mut draft = FilterDraft::new(&category(), None, values(&["Apple", "Pear", "Grape"]));
        draft.search = "ap".into();
        draft.select_all(true);
        assert_eq!(draft.selected_values(), values(&["Apple", "Grape"]));
        assert_eq!(draft.visible_values().count(), 2);
    }

    #[test]
    fn test_resolve_condition_value() {
        let mut draft = FilterDraft::new(&category(), None, values(&["A"]));
        draft.switch_tab(EditorTab::Condition);
        draft.set_operator(FilterOperator::BeginsWith).unwrap();
        draft.value = "  wid ".into();

        let predicate = draft.resolve().unwrap().unwrap();
        assert_eq!(
            predicate,
            Predicate::compare("category", FilterOperator::BeginsWith, "wid").unwrap()
        );
    }

    #[test]
    fn test_resolve_empty_draft_clears() {
        let draft = FilterDraft::new(&category(), None, values(&["A"]));
        assert_eq!(draft.resolve().unwrap(), None);
    }

    #[test]
    fn test_resolve_empty_range_clears() {
        let stock = ColumnDescriptor::number("stock", "Stock");
        let mut draft = FilterDraft::new(&stock, None, vec![]);
        draft.set_operator(FilterOperator::IsNotBetween).unwrap();
        assert_eq!(draft.resolve().unwrap(), None);

        draft.value2 = "40".into();
        let predicate = draft.resolve().unwrap().unwrap();
        assert_eq!(predicate.operator(), FilterOperator::IsNotBetween);
    }

    #[test]
    fn test_switch_tab_discards_other_input() {
        let mut draft = FilterDraft::new(&category(), None, values(&["A", "B"]));
        draft.toggle_value(&Value::from("A"));
        draft.switch_tab(EditorTab::Condition);
        assert!(draft.selected_values().is_empty());

        draft.value = "x".into();
        draft.switch_tab(EditorTab::Values);
        assert!(draft.value.is_empty());
    }

    #[test]
    fn test_set_operator_rejects_wrong_type() {
        let mut draft = FilterDraft::new(&category(), None, vec![]);
        assert!(matches!(
            draft.set_operator(FilterOperator::GreaterThan),
            Err(GridError::InvalidOperator { .. })
        ));
        assert_eq!(draft.operator, FilterOperator::Contains);
    }
}
