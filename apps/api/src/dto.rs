//! Request/response payloads for the prune API.

use std::str::FromStr;

use prunewell_application::TableRetentionConfig;
use prunewell_core::{AppError, AppResult};
use prunewell_domain::{
    ComparisonOperator, Condition, PruneOutcome, RetentionPolicy, TableRef, TimeRetention,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Health response payload.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub database_accessible: bool,
}

/// Time-retention part of a request policy.
#[derive(Debug, Deserialize)]
pub struct TimeRetentionRequest {
    pub dt_target_column: String,
    pub retention_seconds: i64,
}

/// One condition in a request policy.
#[derive(Debug, Deserialize)]
pub struct ConditionRequest {
    pub column: String,
    pub operator: String,
    pub value: Value,
}

/// Raw retention policy shape as submitted; validated into a domain policy.
#[derive(Debug, Deserialize)]
pub struct RetentionPolicyRequest {
    #[serde(default)]
    pub timeretention: Option<TimeRetentionRequest>,
    #[serde(default)]
    pub conditions: Option<Vec<ConditionRequest>>,
}

/// One table entry in a prune request.
#[derive(Debug, Deserialize)]
pub struct TableConfigRequest {
    pub table_name: String,
    pub schema_name: String,
    #[serde(default)]
    pub retention_policy: Option<RetentionPolicyRequest>,
}

/// Prune request body.
#[derive(Debug, Deserialize)]
pub struct PruneRequest {
    pub tables: Vec<TableConfigRequest>,
}

/// One table's result in a prune response.
#[derive(Debug, Serialize)]
pub struct PruneResultResponse {
    pub table_name: String,
    pub schema_name: String,
    pub status: String,
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
}

/// Prune response body.
#[derive(Debug, Serialize)]
pub struct PruneResponse {
    pub results: Vec<PruneResultResponse>,
}

impl TableConfigRequest {
    /// Parses the table reference; failure rejects the whole request shape.
    pub fn table_ref(&self) -> AppResult<TableRef> {
        TableRef::new(self.schema_name.as_str(), self.table_name.as_str()).map_err(|error| {
            AppError::Validation(format!(
                "invalid table reference '{}'.'{}': {error}",
                self.schema_name, self.table_name
            ))
        })
    }

    /// Converts the optional raw policy into a validated domain policy.
    pub fn domain_policy(self) -> AppResult<Option<RetentionPolicy>> {
        let Some(policy) = self.retention_policy else {
            return Ok(None);
        };

        let timeretention = policy
            .timeretention
            .map(|time| TimeRetention::new(time.dt_target_column, time.retention_seconds))
            .transpose()?;
        let conditions = policy
            .conditions
            .map(|list| {
                list.into_iter()
                    .map(|condition| {
                        let operator = ComparisonOperator::from_str(condition.operator.as_str())?;
                        Condition::new(condition.column, operator, condition.value)
                    })
                    .collect::<AppResult<Vec<_>>>()
            })
            .transpose()?;

        RetentionPolicy::from_parts(timeretention, conditions).map(Some)
    }
}

impl From<PruneOutcome> for PruneResultResponse {
    fn from(outcome: PruneOutcome) -> Self {
        Self {
            table_name: outcome.table().table().as_str().to_owned(),
            schema_name: outcome.table().schema().as_str().to_owned(),
            status: outcome.status().as_str().to_owned(),
            message: outcome.message().to_owned(),
            notes: outcome.notes().to_vec(),
        }
    }
}

/// One converted request entry: ready for the engine or already settled.
#[derive(Debug)]
pub enum BatchEntry {
    /// Valid entry to hand to the retention service.
    Ready(TableRetentionConfig),
    /// Conversion failed; the table settles as an `invalid` result.
    Invalid(PruneOutcome),
}
