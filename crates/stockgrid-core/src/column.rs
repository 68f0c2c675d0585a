//! Column registry
//!
//! The static, per-grid list of column descriptors. Every engine resolves
//! column keys through the registry, so an unknown key is rejected before
//! any state is touched.

use serde::{Deserialize, Serialize};

use crate::{GridError, Result};

/// Declared type of a column, which selects operators and comparison rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    #[default]
    Text,
    Number,
    Date,
}

impl ColumnType {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Number => "number",
            Self::Date => "date",
        }
    }
}

impl std::fmt::Display for ColumnType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

fn default_true() -> bool {
    true
}

/// A single column of a grid
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    /// Key used to read the cell out of each row
    pub key: String,
    /// Human-readable header
    pub label: String,
    #[serde(rename = "type", default)]
    pub column_type: ColumnType,
    #[serde(default = "default_true")]
    pub sortable: bool,
    #[serde(default = "default_true")]
    pub filterable: bool,
}

impl ColumnDescriptor {
    /// Create a sortable, filterable column
    pub fn new(key: impl Into<String>, label: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            column_type,
            sortable: true,
            filterable: true,
        }
    }

    pub fn text(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(key, label, ColumnType::Text)
    }

    pub fn number(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(key, label, ColumnType::Number)
    }

    pub fn date(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(key, label, ColumnType::Date)
    }

    pub fn sortable(mut self, sortable: bool) -> Self {
        self.sortable = sortable;
        self
    }

    pub fn filterable(mut self, filterable: bool) -> Self {
        self.filterable = filterable;
        self
    }
}

/// Immutable set of column descriptors for one grid
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnRegistry {
    columns: Vec<ColumnDescriptor>,
}

impl ColumnRegistry {
    /// Build a registry, rejecting duplicate keys
    pub fn new(columns: Vec<ColumnDescriptor>) -> Result<Self> {
        for (idx, column) in columns.iter().enumerate() {
            if columns[..idx].iter().any(|c| c.key == column.key) {
                return Err(GridError::DuplicateColumn(column.key.clone()));
            }
        }
        Ok(Self { columns })
    }

    /// Look up a column by key
    pub fn get(&self, key: &str) -> Option<&ColumnDescriptor> {
        self.columns.iter().find(|c| c.key == key)
    }

    /// Look up a column by key, failing with `UnknownColumn`
    pub fn require(&self, key: &str) -> Result<&ColumnDescriptor> {
        self.get(key)
            .ok_or_else(|| GridError::UnknownColumn(key.to_string()))
    }

    /// Label for a key, falling back to the key itself
    pub fn label_of<'a>(&'a self, key: &'a str) -> &'a str {
        self.get(key).map(|c| c.label.as_str()).unwrap_or(key)
    }

    pub fn columns(&self) -> &[ColumnDescriptor] {
        &self.columns
    }

    pub fn iter(&self) -> impl Iterator<Item = &ColumnDescriptor> {
        self.columns.iter()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}
