//! Human readable chips for the active filters

use serde::Serialize;
use stockgrid_core::{ColumnRegistry, Value};

use crate::filter_types::{Condition, FilterSet, Predicate};

const LIST_PREVIEW: usize = 2;
const OPEN_BOUND: &str = "∞";

/// One chip per active predicate, in display order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterSummary {
    pub column: String,
    pub label: String,
    pub operator_label: String,
    pub display_value: String,
    pub negated: bool,
}

impl FilterSummary {
    pub fn from_predicate(predicate: &Predicate, registry: &ColumnRegistry) -> Self {
        let column_type = registry
            .get(predicate.column())
            .map(|c| c.column_type)
            .unwrap_or_default();
        let operator = predicate.operator();

        Self {
            column: predicate.column().to_string(),
            label: registry.label_of(predicate.column()).to_string(),
            operator_label: operator.label(column_type).to_string(),
            display_value: display_value(predicate.condition()),
            negated: operator.is_negated(),
        }
    }
}

impl FilterSet {
    pub fn summaries(&self, registry: &ColumnRegistry) -> Vec<FilterSummary> {
        self.iter()
            .map(|p| FilterSummary::from_predicate(p, registry))
            .collect()
    }
}

fn display_value(condition: &Condition) -> String {
    match condition {
        Condition::Compare { value, .. } => format!("\"{}\"", value.to_text()),
        Condition::Range { lower, upper, .. } => {
            format!("{} and {}", bound_text(lower.as_ref()), bound_text(upper.as_ref()))
        }
        Condition::InList { values } => {
            let texts: Vec<String> = values.iter().map(Value::to_text).collect();
            if texts.len() <= LIST_PREVIEW {
                texts.join(", ")
            } else {
                format!(
                    "{}... (+{})",
                    texts[..LIST_PREVIEW].join(", "),
                    texts.len() - LIST_PREVIEW
                )
            }
        }
    }
}

fn bound_text(value: Option<&Value>) -> String {
    value.map_or_else(|| OPEN_BOUND.to_string(), Value::to_text)
}
