//! One-shot batch pruning runner.
//!
//! Reads a JSON batch file naming tables and retention policies, runs a single
//! pruning pass against the configured database, and logs one outcome line per
//! table. Partial failure is normal and does not affect the exit code; only a
//! batch that cannot run at all (unreadable config, unreachable database)
//! exits nonzero.

#![forbid(unsafe_code)]

use std::str::FromStr;
use std::sync::Arc;
use std::{env, fs};

use prunewell_application::{RetentionService, TableRetentionConfig};
use prunewell_core::{AppError, AppResult};
use prunewell_domain::{
    ComparisonOperator, Condition, PruneStatus, RetentionPolicy, TableRef, TimeRetention,
};
use prunewell_infrastructure::PostgresTableCatalog;
use serde::Deserialize;
use serde_json::Value;
use sqlx::postgres::PgPoolOptions;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Deserialize)]
struct BatchFile {
    tables: Vec<TableEntry>,
}

#[derive(Debug, Deserialize)]
struct TableEntry {
    table_name: String,
    schema_name: String,
    #[serde(default)]
    retention_policy: Option<PolicyEntry>,
}

#[derive(Debug, Deserialize)]
struct PolicyEntry {
    #[serde(default)]
    timeretention: Option<TimeRetentionEntry>,
    #[serde(default)]
    conditions: Option<Vec<ConditionEntry>>,
}

#[derive(Debug, Deserialize)]
struct TimeRetentionEntry {
    dt_target_column: String,
    retention_seconds: i64,
}

#[derive(Debug, Deserialize)]
struct ConditionEntry {
    column: String,
    operator: String,
    value: Value,
}

impl TableEntry {
    fn into_config(self) -> AppResult<TableRetentionConfig> {
        let table = TableRef::new(self.schema_name, self.table_name)?;
        let policy = match self.retention_policy {
            None => None,
            Some(policy) => {
                let timeretention = policy
                    .timeretention
                    .map(|time| TimeRetention::new(time.dt_target_column, time.retention_seconds))
                    .transpose()?;
                let conditions = policy
                    .conditions
                    .map(|list| {
                        list.into_iter()
                            .map(|condition| {
                                let operator =
                                    ComparisonOperator::from_str(condition.operator.as_str())?;
                                Condition::new(condition.column, operator, condition.value)
                            })
                            .collect::<AppResult<Vec<_>>>()
                    })
                    .transpose()?;

                Some(RetentionPolicy::from_parts(timeretention, conditions)?)
            }
        };

        Ok(TableRetentionConfig { table, policy })
    }
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let batch_path = env::args()
        .nth(1)
        .ok_or_else(|| AppError::Validation("usage: prunewell-cli <batch.json>".to_owned()))?;
    let database_url = env::var("DATABASE_URL")
        .map_err(|_| AppError::Validation("DATABASE_URL is required".to_owned()))?;

    let raw = fs::read_to_string(&batch_path).map_err(|error| {
        AppError::Validation(format!("failed to read batch file '{batch_path}': {error}"))
    })?;
    let batch_file: BatchFile = serde_json::from_str(&raw).map_err(|error| {
        AppError::Validation(format!("failed to parse batch file '{batch_path}': {error}"))
    })?;

    let mut batch = Vec::with_capacity(batch_file.tables.len());
    for entry in batch_file.tables {
        let label = format!("{}.{}", entry.schema_name, entry.table_name);
        match entry.into_config() {
            Ok(config) => batch.push(config),
            Err(error) => {
                warn!(table = %label, status = PruneStatus::Invalid.as_str(), %error);
            }
        }
    }

    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&database_url)
        .await
        .map_err(|error| AppError::Internal(format!("failed to connect to database: {error}")))?;

    let catalog = PostgresTableCatalog::new(pool);
    let service = RetentionService::new(Arc::new(catalog.clone()), Arc::new(catalog));

    info!(tables = batch.len(), "starting pruning pass");
    let outcomes = service.run_batch(&batch).await?;

    for outcome in &outcomes {
        match outcome.status() {
            PruneStatus::Error => warn!(
                table = %outcome.table(),
                status = outcome.status().as_str(),
                message = outcome.message(),
            ),
            _ => info!(
                table = %outcome.table(),
                status = outcome.status().as_str(),
                message = outcome.message(),
            ),
        }
        for note in outcome.notes() {
            info!(table = %outcome.table(), %note);
        }
    }

    info!("pruning pass completed");
    Ok(())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}
