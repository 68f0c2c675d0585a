//! Filter types for the grid
//!
//! Operators, validated predicates and the ordered set of active predicates.

use serde::{Deserialize, Serialize};
use stockgrid_core::{parse::numeric_key, ColumnDescriptor, ColumnType, GridError, Result, Value};

use crate::filter_presets::StoredPredicate;

/// Filter operators understood by the evaluator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FilterOperator {
    // String operators
    #[serde(rename = "contains")]
    Contains,
    #[serde(rename = "not_contains")]
    DoesNotContain,
    #[serde(rename = "starts")]
    BeginsWith,
    #[serde(rename = "not_starts")]
    DoesNotBeginWith,
    #[serde(rename = "ends")]
    EndsWith,
    #[serde(rename = "not_ends")]
    DoesNotEndWith,

    // Equality operators
    #[serde(rename = "eq")]
    Equal,
    #[serde(rename = "neq")]
    NotEqual,

    // Comparison operators
    #[serde(rename = "gt")]
    GreaterThan,
    #[serde(rename = "gte")]
    GreaterThanOrEqual,
    #[serde(rename = "lt")]
    LessThan,
    #[serde(rename = "lte")]
    LessThanOrEqual,

    // Range operators
    #[serde(rename = "between")]
    IsBetween,
    #[serde(rename = "not_between")]
    IsNotBetween,

    // List operators
    #[serde(rename = "in")]
    IsInList,
}

const TEXT_OPERATORS: &[FilterOperator] = &[
    FilterOperator::Contains,
    FilterOperator::DoesNotContain,
    FilterOperator::Equal,
    FilterOperator::NotEqual,
    FilterOperator::BeginsWith,
    FilterOperator::DoesNotBeginWith,
    FilterOperator::EndsWith,
    FilterOperator::DoesNotEndWith,
];

const NUMBER_OPERATORS: &[FilterOperator] = &[
    FilterOperator::Equal,
    FilterOperator::NotEqual,
    FilterOperator::GreaterThan,
    FilterOperator::GreaterThanOrEqual,
    FilterOperator::LessThan,
    FilterOperator::LessThanOrEqual,
    FilterOperator::IsBetween,
    FilterOperator::IsNotBetween,
];

impl FilterOperator {
    /// The persisted key of the operator
    pub fn key(&self) -> &'static str {
        match self {
            Self::Contains => "contains",
            Self::DoesNotContain => "not_contains",
            Self::BeginsWith => "starts",
            Self::DoesNotBeginWith => "not_starts",
            Self::EndsWith => "ends",
            Self::DoesNotEndWith => "not_ends",
            Self::Equal => "eq",
            Self::NotEqual => "neq",
            Self::GreaterThan => "gt",
            Self::GreaterThanOrEqual => "gte",
            Self::LessThan => "lt",
            Self::LessThanOrEqual => "lte",
            Self::IsBetween => "between",
            Self::IsNotBetween => "not_between",
            Self::IsInList => "in",
        }
    }

    /// Parse an operator from its persisted key
    pub fn from_key(key: &str) -> Option<Self> {
        Self::all().iter().copied().find(|op| op.key() == key)
    }

    /// Human readable label, worded for the column type
    pub fn label(&self, column_type: ColumnType) -> &'static str {
        let date = column_type == ColumnType::Date;
        match self {
            Self::Contains => "contains",
            Self::DoesNotContain => "does not contain",
            Self::BeginsWith => "starts with",
            Self::DoesNotBeginWith => "does not start with",
            Self::EndsWith => "ends with",
            Self::DoesNotEndWith => "does not end with",
            Self::Equal => "equals",
            Self::NotEqual if column_type == ColumnType::Text => "does not equal",
            Self::NotEqual => "is different from",
            Self::GreaterThan if date => "after",
            Self::GreaterThan => "greater than",
            Self::GreaterThanOrEqual if date => "on or after",
            Self::GreaterThanOrEqual => "greater than or equal to",
            Self::LessThan if date => "before",
            Self::LessThan => "less than",
            Self::LessThanOrEqual if date => "on or before",
            Self::LessThanOrEqual => "less than or equal to",
            Self::IsBetween => "between",
            Self::IsNotBetween => "not between",
            Self::IsInList => "is one of",
        }
    }

    /// Returns true for operators whose result is the negation of a positive test
    pub fn is_negated(&self) -> bool {
        matches!(
            self,
            Self::DoesNotContain
                | Self::DoesNotBeginWith
                | Self::DoesNotEndWith
                | Self::NotEqual
                | Self::IsNotBetween
        )
    }

    /// Returns true if this operator takes two bounds
    pub fn requires_two_values(&self) -> bool {
        matches!(self, Self::IsBetween | Self::IsNotBetween)
    }

    /// Returns true if this operator takes a list of values
    pub fn is_list(&self) -> bool {
        matches!(self, Self::IsInList)
    }

    /// Operators offered for a column type, in display order.
    ///
    /// `in` is accepted for every type but is picked through the values list
    /// rather than offered here.
    pub fn for_type(column_type: ColumnType) -> &'static [FilterOperator] {
        match column_type {
            ColumnType::Text => TEXT_OPERATORS,
            ColumnType::Number | ColumnType::Date => NUMBER_OPERATORS,
        }
    }

    pub fn is_valid_for(&self, column_type: ColumnType) -> bool {
        self.is_list() || Self::for_type(column_type).contains(self)
    }

    /// The operator a fresh editor starts with
    pub fn default_for(column_type: ColumnType) -> Self {
        match column_type {
            ColumnType::Text => Self::Contains,
            ColumnType::Number | ColumnType::Date => Self::Equal,
        }
    }

    /// Get all operators
    pub fn all() -> &'static [FilterOperator] {
        &[
            Self::Contains,
            Self::DoesNotContain,
            Self::BeginsWith,
            Self::DoesNotBeginWith,
            Self::EndsWith,
            Self::DoesNotEndWith,
            Self::Equal,
            Self::NotEqual,
            Self::GreaterThan,
            Self::GreaterThanOrEqual,
            Self::LessThan,
            Self::LessThanOrEqual,
            Self::IsBetween,
            Self::IsNotBetween,
            Self::IsInList,
        ]
    }
}

impl std::fmt::Display for FilterOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// Raw arguments handed to [`Predicate::new`]
#[derive(Debug, Clone, PartialEq)]
pub enum FilterArgs {
    Single(Value),
    /// Bounds of a range; a null or blank bound is open
    Range { lower: Value, upper: Value },
    List(Vec<Value>),
}

impl FilterArgs {
    fn kind(&self) -> &'static str {
        match self {
            Self::Single(_) => "a single value",
            Self::Range { .. } => "a range",
            Self::List(_) => "a list of values",
        }
    }
}

/// The operator together with the argument shape it requires
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Compare {
        operator: FilterOperator,
        value: Value,
    },
    Range {
        negated: bool,
        lower: Option<Value>,
        upper: Option<Value>,
    },
    InList {
        values: Vec<Value>,
    },
}

impl Condition {
    pub fn operator(&self) -> FilterOperator {
        match self {
            Self::Compare { operator, .. } => *operator,
            Self::Range { negated: false, .. } => FilterOperator::IsBetween,
            Self::Range { negated: true, .. } => FilterOperator::IsNotBetween,
            Self::InList { .. } => FilterOperator::IsInList,
        }
    }
}

/// A single filter on one column.
///
/// Construction guarantees the argument shape matches the operator; a
/// predicate is checked against a column's type with [`Predicate::validate_for`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "StoredPredicate", into = "StoredPredicate")]
pub struct Predicate {
    column: String,
    condition: Condition,
}

impl Predicate {
    /// Validate the argument shape. Date operands are kept in their
    /// canonical string form so saved predicates reload unchanged.
    pub fn new(column: impl Into<String>, operator: FilterOperator, args: FilterArgs) -> Result<Self> {
        let column = column.into();
        let condition = match (operator, args) {
            (FilterOperator::IsInList, FilterArgs::List(values)) => Condition::InList {
                values: values
                    .into_iter()
                    .filter(|v| !v.is_null())
                    .map(Value::into_canonical)
                    .collect(),
            },
            (op, FilterArgs::Range { lower, upper }) if op.requires_two_values() => {
                let lower = Some(lower.into_canonical()).filter(|v| !v.is_blank());
                let upper = Some(upper.into_canonical()).filter(|v| !v.is_blank());
                if lower.is_none() && upper.is_none() {
                    return Err(GridError::InvalidPredicate(format!(
                        "{} on '{}' needs at least one bound",
                        op, column
                    )));
                }
                Condition::Range {
                    negated: op.is_negated(),
                    lower,
                    upper,
                }
            }
            (op, FilterArgs::Single(value)) if !op.is_list() && !op.requires_two_values() => {
                if value.is_blank() {
                    return Err(GridError::InvalidPredicate(format!(
                        "{} on '{}' needs a value",
                        op, column
                    )));
                }
                Condition::Compare {
                    operator: op,
                    value: value.into_canonical(),
                }
            }
            (op, args) => {
                return Err(GridError::InvalidPredicate(format!(
                    "{} does not accept {}",
                    op,
                    args.kind()
                )));
            }
        };

        Ok(Self { column, condition })
    }

    pub fn compare(
        column: impl Into<String>,
        operator: FilterOperator,
        value: impl Into<Value>,
    ) -> Result<Self> {
        Self::new(column, operator, FilterArgs::Single(value.into()))
    }

    pub fn between(
        column: impl Into<String>,
        lower: impl Into<Value>,
        upper: impl Into<Value>,
    ) -> Result<Self> {
        Self::range(column, FilterOperator::IsBetween, lower, upper)
    }

    pub fn range(
        column: impl Into<String>,
        operator: FilterOperator,
        lower: impl Into<Value>,
        upper: impl Into<Value>,
    ) -> Result<Self> {
        Self::new(
            column,
            operator,
            FilterArgs::Range {
                lower: lower.into(),
                upper: upper.into(),
            },
        )
    }

    pub fn in_list<V: Into<Value>>(
        column: impl Into<String>,
        values: impl IntoIterator<Item = V>,
    ) -> Result<Self> {
        Self::new(
            column,
            FilterOperator::IsInList,
            FilterArgs::List(values.into_iter().map(Into::into).collect()),
        )
    }

    pub fn column(&self) -> &str {
        &self.column
    }

    pub fn operator(&self) -> FilterOperator {
        self.condition.operator()
    }

    pub fn condition(&self) -> &Condition {
        &self.condition
    }

    /// Check the operator and arguments against the column they filter
    pub fn validate_for(&self, column: &ColumnDescriptor) -> Result<()> {
        let operator = self.operator();
        if !operator.is_valid_for(column.column_type) {
            return Err(GridError::InvalidOperator {
                column: column.key.clone(),
                operator: operator.key().to_string(),
                column_type: column.column_type,
            });
        }

        if column.column_type == ColumnType::Text {
            return Ok(());
        }

        let operands: Vec<&Value> = match &self.condition {
            Condition::Compare { value, .. } => vec![value],
            Condition::Range { lower, upper, .. } => lower.iter().chain(upper.iter()).collect(),
            Condition::InList { .. } => Vec::new(),
        };
        for value in operands {
            if numeric_key(column.column_type, value).is_none() {
                return Err(GridError::InvalidPredicate(format!(
                    "'{}' is not a valid {} for column '{}'",
                    value.to_text(),
                    column.column_type,
                    column.key
                )));
            }
        }
        Ok(())
    }
}

/// The active predicates of a grid, at most one per column, in the order
/// they were first applied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterSet {
    predicates: Vec<Predicate>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a predicate, replacing the existing one for the same column in
    /// place. Returns the replaced predicate.
    pub fn upsert(&mut self, predicate: Predicate) -> Option<Predicate> {
        match self
            .predicates
            .iter_mut()
            .find(|p| p.column == predicate.column)
        {
            Some(slot) => Some(std::mem::replace(slot, predicate)),
            None => {
                self.predicates.push(predicate);
                None
            }
        }
    }

    pub fn remove(&mut self, column: &str) -> Option<Predicate> {
        let index = self.predicates.iter().position(|p| p.column == column)?;
        Some(self.predicates.remove(index))
    }

    /// Remove by display position
    pub fn remove_at(&mut self, index: usize) -> Option<Predicate> {
        (index < self.predicates.len()).then(|| self.predicates.remove(index))
    }

    pub fn clear(&mut self) {
        self.predicates.clear();
    }

    pub fn get(&self, column: &str) -> Option<&Predicate> {
        self.predicates.iter().find(|p| p.column == column)
    }

    pub fn contains(&self, column: &str) -> bool {
        self.get(column).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Predicate> {
        self.predicates.iter()
    }

    pub fn as_slice(&self) -> &[Predicate] {
        &self.predicates
    }

    pub fn to_vec(&self) -> Vec<Predicate> {
        self.predicates.clone()
    }

    pub fn len(&self) -> usize {
        self.predicates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }
}

impl FromIterator<Predicate> for FilterSet {
    fn from_iter<I: IntoIterator<Item = Predicate>>(iter: I) -> Self {
        let mut set = Self::new();
        for predicate in iter {
            set.upsert(predicate);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operator_keys_round_trip() {
        for op in FilterOperator::all() {
            assert_eq!(FilterOperator::from_key(op.key()), Some(*op));
        }
        assert_eq!(FilterOperator::from_key("like"), None);
    }

    #[test]
    fn test_operator_serde_uses_keys() {
        let json = serde_json::to_string(&FilterOperator::IsNotBetween).unwrap();
        assert_eq!(json, "\"not_between\"");
        let op: FilterOperator = serde_json::from_str("\"gte\"").unwrap();
        assert_eq!(op, FilterOperator::GreaterThanOrEqual);
    }

    #[test]
    fn test_operators_per_type() {
        assert!(FilterOperator::Contains.is_valid_for(ColumnType::Text));
        assert!(!FilterOperator::GreaterThan.is_valid_for(ColumnType::Text));
        assert!(!FilterOperator::Contains.is_valid_for(ColumnType::Number));
        assert!(FilterOperator::IsBetween.is_valid_for(ColumnType::Date));
        assert!(FilterOperator::IsInList.is_valid_for(ColumnType::Number));
        assert_eq!(FilterOperator::default_for(ColumnType::Text), FilterOperator::Contains);
        assert_eq!(FilterOperator::default_for(ColumnType::Date), FilterOperator::Equal);
    }

    #[test]
    fn test_date_labels() {
        assert_eq!(FilterOperator::LessThan.label(ColumnType::Date), "before");
        assert_eq!(FilterOperator::LessThan.label(ColumnType::Number), "less than");
        assert_eq!(FilterOperator::GreaterThanOrEqual.label(ColumnType::Date), "on or after");
    }

    #[test]
    fn test_range_needs_a_bound() {
        let err = Predicate::between("price", "", Value::Null).unwrap_err();
        assert!(matches!(err, GridError::InvalidPredicate(_)));

        let open = Predicate::between("price", 10, "").unwrap();
        assert_eq!(
            open.condition(),
            &Condition::Range {
                negated: false,
                lower: Some(Value::Int(10)),
                upper: None,
            }
        );
    }

    #[test]
    fn test_argument_shape_must_match_operator() {
        let err = Predicate::new("price", FilterOperator::Equal, FilterArgs::List(vec![])).unwrap_err();
        assert!(matches!(err, GridError::InvalidPredicate(_)));

        let err = Predicate::compare("name", FilterOperator::Contains, "  ").unwrap_err();
        assert!(matches!(err, GridError::InvalidPredicate(_)));
    }

    #[test]
    fn test_validate_for_column() {
        let stock = ColumnDescriptor::number("stock", "Stock");
        let name = ColumnDescriptor::text("name", "Name");

        let contains = Predicate::compare("stock", FilterOperator::Contains, "5").unwrap();
        assert!(matches!(
            contains.validate_for(&stock),
            Err(GridError::InvalidOperator { .. })
        ));

        let not_a_number = Predicate::compare("stock", FilterOperator::GreaterThan, "abc").unwrap();
        assert!(matches!(
            not_a_number.validate_for(&stock),
            Err(GridError::InvalidPredicate(_))
        ));

        let gt = Predicate::compare("stock", FilterOperator::GreaterThan, "10").unwrap();
        assert!(gt.validate_for(&stock).is_ok());

        let listed = Predicate::in_list("name", ["A", "B"]).unwrap();
        assert!(listed.validate_for(&name).is_ok());
    }

    #[test]
    fn test_upsert_replaces_in_place() {
        let mut set = FilterSet::new();
        set.upsert(Predicate::compare("name", FilterOperator::Contains, "a").unwrap());
        set.upsert(Predicate::compare("stock", FilterOperator::GreaterThan, 1).unwrap());

        let replaced = set.upsert(Predicate::compare("name", FilterOperator::EndsWith, "z").unwrap());
        assert!(replaced.is_some());
        assert_eq!(set.len(), 2);
        assert_eq!(set.as_slice()[0].operator(), FilterOperator::EndsWith);
        assert_eq!(set.as_slice()[1].column(), "stock");
    }

    #[test]
    fn test_remove_at_position() {
        let mut set: FilterSet = [
            Predicate::compare("a", FilterOperator::Equal, "1").unwrap(),
            Predicate::compare("b", FilterOperator::Equal, "2").unwrap(),
        ]
        .into_iter()
        .collect();

        assert_eq!(set.remove_at(5), None);
        assert_eq!(set.remove_at(0).map(|p| p.column().to_string()), Some("a".to_string()));
        assert!(set.contains("b"));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_date_operands_are_canonical_strings() {
        let cutoff = chrono::NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let predicate = Predicate::between("updated", cutoff, "").unwrap();
        assert_eq!(
            predicate.condition(),
            &Condition::Range {
                negated: false,
                lower: Some(Value::from("2024-03-01")),
                upper: None,
            }
        );

        let json = serde_json::to_value(&predicate).unwrap();
        let reloaded: Predicate = serde_json::from_value(json).unwrap();
        assert_eq!(reloaded, predicate);
    }
}
