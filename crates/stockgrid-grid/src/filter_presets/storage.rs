//! Persisted shapes of predicates and saved filter sets

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use stockgrid_core::{GridError, Value};
use tracing::warn;

use crate::filter_types::{Condition, FilterArgs, FilterOperator, Predicate};

/// Flat record a predicate is persisted as.
///
/// Converting back into a [`Predicate`] validates the operator and the
/// argument shape again.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredPredicate {
    pub column: String,
    pub operator: String,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub value: Value,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub value2: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<Value>>,
}

impl From<&Predicate> for StoredPredicate {
    fn from(predicate: &Predicate) -> Self {
        let mut stored = Self {
            column: predicate.column().to_string(),
            operator: predicate.operator().key().to_string(),
            value: Value::Null,
            value2: Value::Null,
            values: None,
        };
        match predicate.condition() {
            Condition::Compare { value, .. } => stored.value = value.clone(),
            Condition::Range { lower, upper, .. } => {
                stored.value = lower.clone().unwrap_or_default();
                stored.value2 = upper.clone().unwrap_or_default();
            }
            Condition::InList { values } => stored.values = Some(values.clone()),
        }
        stored
    }
}

impl From<Predicate> for StoredPredicate {
    fn from(predicate: Predicate) -> Self {
        Self::from(&predicate)
    }
}

impl TryFrom<StoredPredicate> for Predicate {
    type Error = GridError;

    fn try_from(stored: StoredPredicate) -> Result<Self, Self::Error> {
        let operator = FilterOperator::from_key(&stored.operator).ok_or_else(|| {
            GridError::InvalidPredicate(format!("unknown operator '{}'", stored.operator))
        })?;
        let args = if operator.is_list() {
            FilterArgs::List(stored.values.unwrap_or_default())
        } else if operator.requires_two_values() {
            FilterArgs::Range {
                lower: stored.value,
                upper: stored.value2,
            }
        } else {
            FilterArgs::Single(stored.value)
        };
        Predicate::new(stored.column, operator, args)
    }
}

/// A named filter set
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedFilterSet {
    pub name: String,
    pub predicates: Vec<Predicate>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct StoredFilterSet {
    pub name: String,
    #[serde(default)]
    pub predicates: Vec<StoredPredicate>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl From<&SavedFilterSet> for StoredFilterSet {
    fn from(set: &SavedFilterSet) -> Self {
        Self {
            name: set.name.clone(),
            predicates: set.predicates.iter().map(StoredPredicate::from).collect(),
            created_at: set.created_at,
        }
    }
}

impl StoredFilterSet {
    /// Convert, dropping predicates that no longer form a valid shape
    pub fn to_saved_filter_set(&self) -> SavedFilterSet {
        let predicates = self
            .predicates
            .iter()
            .cloned()
            .filter_map(|stored| {
                let column = stored.column.clone();
                match Predicate::try_from(stored) {
                    Ok(predicate) => Some(predicate),
                    Err(e) => {
                        warn!(set = %self.name, column = %column, "Dropping stored predicate: {}", e);
                        None
                    }
                }
            })
            .collect();

        SavedFilterSet {
            name: self.name.clone(),
            predicates,
            created_at: self.created_at,
        }
    }
}
