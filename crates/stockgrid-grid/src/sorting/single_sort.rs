//! Single-column sorting with type-aware keys
//!
//! Null, blank and unparseable cells sort after every present value in both
//! directions. Descending reverses only the comparison of present values.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use stockgrid_core::{parse::numeric_key, ColumnDescriptor, ColumnRegistry, ColumnType, Row, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortDirection {
    #[default]
    #[serde(rename = "asc")]
    Ascending,
    #[serde(rename = "desc")]
    Descending,
}

impl SortDirection {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Ascending => "asc",
            Self::Descending => "desc",
        }
    }

    pub fn toggle(&self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }
}

/// The column the grid is ordered by, if any
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SortState {
    pub column: Option<String>,
    #[serde(default)]
    pub direction: SortDirection,
}

impl SortState {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn new(column: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            column: Some(column.into()),
            direction,
        }
    }

    pub fn ascending(column: impl Into<String>) -> Self {
        Self::new(column, SortDirection::Ascending)
    }

    pub fn descending(column: impl Into<String>) -> Self {
        Self::new(column, SortDirection::Descending)
    }

    pub fn is_active(&self) -> bool {
        self.column.is_some()
    }

    pub fn is_sorted_by(&self, column: &str) -> bool {
        self.column.as_deref() == Some(column)
    }
}

#[derive(Debug, Clone, PartialEq)]
enum SortKey {
    Number(f64),
    Text(String),
}

impl SortKey {
    fn from_value(value: &Value, column_type: ColumnType) -> Option<Self> {
        match column_type {
            ColumnType::Text if value.is_blank() => None,
            ColumnType::Text => Some(Self::Text(value.to_text().to_lowercase())),
            ColumnType::Number | ColumnType::Date => {
                numeric_key(column_type, value).map(Self::Number)
            }
        }
    }

    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Number(a), Self::Number(b)) => a.total_cmp(b),
            (Self::Text(a), Self::Text(b)) => a.cmp(b),
            (Self::Number(_), Self::Text(_)) => Ordering::Less,
            (Self::Text(_), Self::Number(_)) => Ordering::Greater,
        }
    }
}

fn compare_keys(a: Option<&SortKey>, b: Option<&SortKey>, direction: SortDirection) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) => {
            let ordering = a.cmp(b);
            match direction {
                SortDirection::Ascending => ordering,
                SortDirection::Descending => ordering.reverse(),
            }
        }
    }
}

/// Compare two cells of a column
pub fn compare_values(
    a: &Value,
    b: &Value,
    column_type: ColumnType,
    direction: SortDirection,
) -> Ordering {
    compare_keys(
        SortKey::from_value(a, column_type).as_ref(),
        SortKey::from_value(b, column_type).as_ref(),
        direction,
    )
}

/// Holds the current and declared default sort
#[derive(Debug, Clone, Default)]
pub struct SortEngine {
    state: SortState,
    default_state: SortState,
}

impl SortEngine {
    pub fn new(default_state: SortState) -> Self {
        Self {
            state: default_state.clone(),
            default_state,
        }
    }

    pub fn state(&self) -> &SortState {
        &self.state
    }

    pub fn default_state(&self) -> &SortState {
        &self.default_state
    }

    /// Flip direction when already sorted by `column`, else sort ascending by it.
    ///
    /// Returns false without changing anything for non-sortable columns.
    pub fn toggle(&mut self, column: &ColumnDescriptor) -> bool {
        if !column.sortable {
            return false;
        }
        self.state = if self.state.is_sorted_by(&column.key) {
            SortState::new(column.key.clone(), self.state.direction.toggle())
        } else {
            SortState::ascending(column.key.clone())
        };
        true
    }

    /// Returns true when the state changed
    pub fn set(&mut self, state: SortState) -> bool {
        if self.state == state {
            return false;
        }
        self.state = state;
        true
    }

    /// Restore the declared default
    pub fn reset(&mut self) -> bool {
        self.set(self.default_state.clone())
    }

    pub fn compare_rows(&self, a: &Row, b: &Row, registry: &ColumnRegistry) -> Ordering {
        let Some(column) = self.state.column.as_deref() else {
            return Ordering::Equal;
        };
        let column_type = registry.get(column).map(|c| c.column_type).unwrap_or_default();
        compare_values(a.get(column), b.get(column), column_type, self.state.direction)
    }

    /// Stable sort of row indices.
    ///
    /// Without an active sort the indices are restored to data order.
    pub fn sort_indices(&self, rows: &[Row], indices: &mut Vec<usize>, registry: &ColumnRegistry) {
        let Some(column) = self.state.column.as_deref() else {
            indices.sort_unstable();
            return;
        };
        let column_type = registry.get(column).map(|c| c.column_type).unwrap_or_default();

        let mut keyed: Vec<(usize, Option<SortKey>)> = indices
            .iter()
            .map(|&i| (i, SortKey::from_value(rows[i].get(column), column_type)))
            .collect();
        keyed.sort_by(|(ia, a), (ib, b)| {
            compare_keys(a.as_ref(), b.as_ref(), self.state.direction).then(ia.cmp(ib))
        });

        indices.clear();
        indices.extend(keyed.into_iter().map(|(i, _)| i));
    }

    /// Sort rows in place
    pub fn sort_rows(&self, rows: &mut [Row], registry: &ColumnRegistry) {
        if !self.state.is_active() {
            return;
        }
        rows.sort_by(|a, b| self.compare_rows(a, b, registry));
    }
}
