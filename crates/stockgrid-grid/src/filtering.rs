//! Row evaluation against predicates
//!
//! Text columns compare case-insensitively with nulls read as empty text.
//! Number and date columns compare parsed keys; a cell that does not parse
//! fails every operator, negated ones included.

use stockgrid_core::{parse::numeric_key, ColumnRegistry, ColumnType, Row, Value};

use crate::filter_types::{Condition, FilterOperator, FilterSet, Predicate};

impl Predicate {
    /// Test one cell against this predicate
    pub fn matches_value(&self, cell: &Value, column_type: ColumnType) -> bool {
        match self.condition() {
            Condition::InList { values } => {
                let cell = cell.to_text().to_lowercase();
                values.iter().any(|v| v.to_text().to_lowercase() == cell)
            }
            Condition::Range {
                negated,
                lower,
                upper,
            } => {
                let Some(key) = numeric_key(column_type, cell) else {
                    return false;
                };
                let lower = bound(column_type, lower.as_ref()).unwrap_or(f64::NEG_INFINITY);
                let upper = bound(column_type, upper.as_ref()).unwrap_or(f64::INFINITY);
                let inside = key >= lower && key <= upper;
                inside != *negated
            }
            Condition::Compare { operator, value } => match column_type {
                ColumnType::Text => evaluate_text(
                    *operator,
                    &cell.to_text().to_lowercase(),
                    &value.to_text().to_lowercase(),
                ),
                ColumnType::Number | ColumnType::Date => {
                    match (numeric_key(column_type, cell), numeric_key(column_type, value)) {
                        (Some(cell), Some(target)) => evaluate_ordered(*operator, cell, target),
                        _ => false,
                    }
                }
            },
        }
    }

    /// Test a row; a missing cell reads as null
    pub fn matches(&self, row: &Row, column_type: ColumnType) -> bool {
        self.matches_value(row.get(self.column()), column_type)
    }
}

impl FilterSet {
    /// Conjunction of every predicate
    pub fn evaluate(&self, row: &Row, registry: &ColumnRegistry) -> bool {
        self.evaluate_except(row, registry, None)
    }

    /// Conjunction of every predicate except the one on `skip`
    pub fn evaluate_except(&self, row: &Row, registry: &ColumnRegistry, skip: Option<&str>) -> bool {
        self.iter()
            .filter(|p| Some(p.column()) != skip)
            .all(|p| {
                let column_type = registry
                    .get(p.column())
                    .map(|c| c.column_type)
                    .unwrap_or_default();
                p.matches(row, column_type)
            })
    }
}

fn bound(column_type: ColumnType, value: Option<&Value>) -> Option<f64> {
    value.and_then(|v| numeric_key(column_type, v))
}

fn evaluate_text(operator: FilterOperator, cell: &str, target: &str) -> bool {
    match operator {
        FilterOperator::Contains => cell.contains(target),
        FilterOperator::DoesNotContain => !cell.contains(target),
        FilterOperator::Equal => cell == target,
        FilterOperator::NotEqual => cell != target,
        FilterOperator::BeginsWith => cell.starts_with(target),
        FilterOperator::DoesNotBeginWith => !cell.starts_with(target),
        FilterOperator::EndsWith => cell.ends_with(target),
        FilterOperator::DoesNotEndWith => !cell.ends_with(target),
        _ => false,
    }
}

fn evaluate_ordered(operator: FilterOperator, cell: f64, target: f64) -> bool {
    match operator {
        FilterOperator::Equal => cell == target,
        FilterOperator::NotEqual => cell != target,
        FilterOperator::GreaterThan => cell > target,
        FilterOperator::GreaterThanOrEqual => cell >= target,
        FilterOperator::LessThan => cell < target,
        FilterOperator::LessThanOrEqual => cell <= target,
        _ => false,
    }
}
