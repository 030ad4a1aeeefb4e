use std::str::FromStr;

use chrono::Duration;
use prunewell_core::{AppError, AppResult, SqlIdentifier};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Comparison operator allowed in condition-based retention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComparisonOperator {
    /// Equality comparison.
    #[serde(rename = "=")]
    Eq,
    /// Inequality comparison.
    #[serde(rename = "!=")]
    Neq,
    /// Less-than comparison.
    #[serde(rename = "<")]
    Lt,
    /// Greater-than comparison.
    #[serde(rename = ">")]
    Gt,
    /// Less-than-or-equal comparison.
    #[serde(rename = "<=")]
    Lte,
    /// Greater-than-or-equal comparison.
    #[serde(rename = ">=")]
    Gte,
}

impl ComparisonOperator {
    /// Returns the SQL spelling of the operator.
    #[must_use]
    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Neq => "!=",
            Self::Lt => "<",
            Self::Gt => ">",
            Self::Lte => "<=",
            Self::Gte => ">=",
        }
    }
}

impl FromStr for ComparisonOperator {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "=" => Ok(Self::Eq),
            "!=" | "<>" => Ok(Self::Neq),
            "<" => Ok(Self::Lt),
            ">" => Ok(Self::Gt),
            "<=" => Ok(Self::Lte),
            ">=" => Ok(Self::Gte),
            _ => Err(AppError::Validation(format!(
                "unknown comparison operator '{value}'"
            ))),
        }
    }
}

/// One row-matching condition in a condition-based retention policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    column: SqlIdentifier,
    operator: ComparisonOperator,
    value: Value,
}

impl Condition {
    /// Creates a validated condition.
    ///
    /// Only scalar JSON values are accepted; the executor binds them as
    /// statement parameters, so nulls, arrays, and objects have no meaningful
    /// comparison semantics here.
    pub fn new(
        column: impl Into<String>,
        operator: ComparisonOperator,
        value: Value,
    ) -> AppResult<Self> {
        let column = column.into();
        if !matches!(value, Value::String(_) | Value::Number(_) | Value::Bool(_)) {
            return Err(AppError::Validation(format!(
                "condition value for '{column}' must be a string, number, or boolean"
            )));
        }

        Ok(Self {
            column: SqlIdentifier::new(column)?,
            operator,
            value,
        })
    }

    /// Returns the condition column.
    #[must_use]
    pub fn column(&self) -> &SqlIdentifier {
        &self.column
    }

    /// Returns the comparison operator.
    #[must_use]
    pub fn operator(&self) -> ComparisonOperator {
        self.operator
    }

    /// Returns the bound comparison value.
    #[must_use]
    pub fn value(&self) -> &Value {
        &self.value
    }
}

/// Time-based retention: partitions older than the window are dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRetention {
    target_column: SqlIdentifier,
    retention_seconds: i64,
}

impl TimeRetention {
    /// Creates a validated time-retention window.
    pub fn new(target_column: impl Into<String>, retention_seconds: i64) -> AppResult<Self> {
        if retention_seconds < 0 {
            return Err(AppError::Validation(
                "retention_seconds must not be negative".to_owned(),
            ));
        }

        Ok(Self {
            target_column: SqlIdentifier::new(target_column)?,
            retention_seconds,
        })
    }

    /// Returns the timestamp column the window is measured against.
    #[must_use]
    pub fn target_column(&self) -> &SqlIdentifier {
        &self.target_column
    }

    /// Returns the retention window length.
    ///
    /// A window too large for time arithmetic saturates to the maximum
    /// representable span; subtracting that from any instant overflows, so
    /// callers treat it as "nothing has expired yet".
    #[must_use]
    pub fn retention(&self) -> Duration {
        Duration::try_seconds(self.retention_seconds).unwrap_or(Duration::MAX)
    }

    /// Returns the configured window in seconds.
    #[must_use]
    pub fn retention_seconds(&self) -> i64 {
        self.retention_seconds
    }
}

/// Non-empty ordered set of row-matching conditions.
///
/// The field stays private so an empty set cannot be constructed around the
/// shape validation; deserialization funnels through the same check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Condition>", into = "Vec<Condition>")]
pub struct ConditionSet(Vec<Condition>);

impl ConditionSet {
    /// Creates a validated, non-empty condition set.
    pub fn new(conditions: Vec<Condition>) -> AppResult<Self> {
        if conditions.is_empty() {
            return Err(AppError::Validation(
                "condition set must include at least one condition".to_owned(),
            ));
        }

        Ok(Self(conditions))
    }

    /// Returns the conditions in declaration order.
    #[must_use]
    pub fn conditions(&self) -> &[Condition] {
        &self.0
    }
}

impl TryFrom<Vec<Condition>> for ConditionSet {
    type Error = AppError;

    fn try_from(value: Vec<Condition>) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ConditionSet> for Vec<Condition> {
    fn from(value: ConditionSet) -> Self {
        value.0
    }
}

/// Retention policy for one table: exactly one strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RetentionPolicy {
    /// Drop time-partitions older than the retention window.
    TimeRetention(TimeRetention),
    /// Delete rows matching all conditions.
    Conditions(ConditionSet),
}

impl RetentionPolicy {
    /// Builds a policy from the raw optional pair an API request carries.
    ///
    /// This is the single shape checkpoint: neither part set fails as missing,
    /// both set fails as ambiguous, and an empty condition list counts as
    /// absent. Callers past this point hold a well-formed policy by type.
    pub fn from_parts(
        timeretention: Option<TimeRetention>,
        conditions: Option<Vec<Condition>>,
    ) -> AppResult<Self> {
        let conditions = conditions.filter(|list| !list.is_empty());
        match (timeretention, conditions) {
            (Some(_), Some(_)) => Err(AppError::Validation(
                "retention policy is ambiguous: only one of timeretention or conditions may be provided"
                    .to_owned(),
            )),
            (None, None) => Err(AppError::Validation(
                "retention policy is missing: either timeretention or conditions must be provided"
                    .to_owned(),
            )),
            (Some(time), None) => Ok(Self::TimeRetention(time)),
            (None, Some(list)) => ConditionSet::new(list).map(Self::Conditions),
        }
    }
}
