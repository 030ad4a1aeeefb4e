use std::sync::Arc;

use chrono::{DateTime, Utc};
use prunewell_core::{AppResult, SqlIdentifier};
use prunewell_domain::{
    Condition, PruneOutcome, PruneStatus, RetentionPolicy, TableRef, TimeRetention,
    decode_partition_name,
};

use crate::retention_ports::{PruneExecutor, TableCatalog, TableRetentionConfig};

/// Application service enforcing retention policies against tables.
///
/// Runs one pruning pass per table: validation, partition discovery, cutoff
/// decision, and drop/delete execution. A pass never escapes as an error; it
/// always settles into a [`PruneOutcome`].
#[derive(Clone)]
pub struct RetentionService {
    catalog: Arc<dyn TableCatalog>,
    executor: Arc<dyn PruneExecutor>,
}

struct TimePassTally {
    dropped: usize,
    retained: usize,
    skipped: usize,
    failed: usize,
    notes: Vec<String>,
}

impl RetentionService {
    /// Creates a retention service from catalog and executor implementations.
    #[must_use]
    pub fn new(catalog: Arc<dyn TableCatalog>, executor: Arc<dyn PruneExecutor>) -> Self {
        Self { catalog, executor }
    }

    /// Runs a pruning pass over every table in the batch.
    ///
    /// Connectivity is checked once up front; a dead database fails the whole
    /// batch before any table is touched. Past that point tables are processed
    /// sequentially in input order and each one settles into its own outcome,
    /// so one bad table never aborts the rest.
    pub async fn run_batch(
        &self,
        batch: &[TableRetentionConfig],
    ) -> AppResult<Vec<PruneOutcome>> {
        self.run_batch_at(batch, Utc::now()).await
    }

    /// Runs a batch pass with an explicit evaluation instant.
    pub async fn run_batch_at(
        &self,
        batch: &[TableRetentionConfig],
        now: DateTime<Utc>,
    ) -> AppResult<Vec<PruneOutcome>> {
        self.catalog.ping().await?;

        let mut outcomes = Vec::with_capacity(batch.len());
        for config in batch {
            outcomes.push(
                self.prune_table_at(&config.table, config.policy.as_ref(), now)
                    .await,
            );
        }

        Ok(outcomes)
    }

    /// Runs one table's pruning pass with the current time as cutoff anchor.
    pub async fn prune_table(
        &self,
        table: &TableRef,
        policy: Option<&RetentionPolicy>,
    ) -> PruneOutcome {
        self.prune_table_at(table, policy, Utc::now()).await
    }

    /// Runs one table's pruning pass with an explicit evaluation instant.
    pub async fn prune_table_at(
        &self,
        table: &TableRef,
        policy: Option<&RetentionPolicy>,
        now: DateTime<Utc>,
    ) -> PruneOutcome {
        match self.catalog.table_exists(table).await {
            Ok(true) => {}
            Ok(false) => {
                return PruneOutcome::new(
                    table.clone(),
                    PruneStatus::Error,
                    format!("table {table} does not exist"),
                );
            }
            Err(error) => {
                return PruneOutcome::new(table.clone(), PruneStatus::Error, error.to_string());
            }
        }

        let Some(policy) = policy else {
            return PruneOutcome::new(
                table.clone(),
                PruneStatus::Skipped,
                "no retention policy configured, nothing to prune",
            );
        };

        match policy {
            RetentionPolicy::TimeRetention(retention) => {
                self.prune_partitions(table, retention, now).await
            }
            RetentionPolicy::Conditions(conditions) => {
                self.delete_matching_rows(table, conditions.conditions()).await
            }
        }
    }

    /// Time path: drops discovered partitions older than the cutoff.
    ///
    /// Partitions are independent units, so both decode failures and
    /// individual drop failures are recorded as notes and the pass keeps
    /// going with the remaining partitions.
    async fn prune_partitions(
        &self,
        table: &TableRef,
        retention: &TimeRetention,
        now: DateTime<Utc>,
    ) -> PruneOutcome {
        let partitions = match self.catalog.list_child_partitions(table).await {
            Ok(partitions) => partitions,
            Err(error) => {
                return PruneOutcome::new(table.clone(), PruneStatus::Error, error.to_string());
            }
        };

        // A window too large to subtract from `now` means nothing has expired.
        let cutoff = now.checked_sub_signed(retention.retention());
        let mut tally = TimePassTally {
            dropped: 0,
            retained: 0,
            skipped: 0,
            failed: 0,
            notes: Vec::new(),
        };

        for partition in &partitions {
            let represented = match decode_partition_name(partition.name(), table.table().as_str())
            {
                Ok(instant) => instant,
                Err(error) => {
                    tally.skipped += 1;
                    tally.notes.push(format!("skipped: {error}"));
                    continue;
                }
            };

            // Tie rule: a partition exactly at the cutoff is retained.
            let expired = cutoff.is_some_and(|cutoff| represented < cutoff);
            if !expired {
                tally.retained += 1;
                continue;
            }

            let partition_name = match SqlIdentifier::new(partition.name()) {
                Ok(name) => name,
                Err(error) => {
                    tally.skipped += 1;
                    tally.notes.push(format!(
                        "skipped partition '{}': {error}",
                        partition.name()
                    ));
                    continue;
                }
            };

            match self
                .executor
                .drop_partition(table.schema(), &partition_name)
                .await
            {
                Ok(()) => tally.dropped += 1,
                Err(error) => {
                    tally.failed += 1;
                    tally.notes.push(format!(
                        "failed to drop partition '{}': {error}",
                        partition.name()
                    ));
                }
            }
        }

        let mut message = format!(
            "dropped {} partition(s), retained {}, skipped {}",
            tally.dropped, tally.retained, tally.skipped
        );
        if tally.failed > 0 {
            message.push_str(&format!(", failed to drop {}", tally.failed));
        }

        let status = if tally.dropped > 0 {
            PruneStatus::Pruned
        } else {
            PruneStatus::Exists
        };

        PruneOutcome::with_notes(table.clone(), status, message, tally.notes)
    }

    /// Condition path: one atomic parameterized delete against the table.
    async fn delete_matching_rows(
        &self,
        table: &TableRef,
        conditions: &[Condition],
    ) -> PruneOutcome {
        let columns = match self.catalog.list_columns(table).await {
            Ok(columns) => columns,
            Err(error) => {
                return PruneOutcome::new(table.clone(), PruneStatus::Error, error.to_string());
            }
        };

        for condition in conditions {
            if !columns
                .iter()
                .any(|column| column == condition.column().as_str())
            {
                return PruneOutcome::new(
                    table.clone(),
                    PruneStatus::Error,
                    format!(
                        "condition column '{}' does not exist in table {table}",
                        condition.column()
                    ),
                );
            }
        }

        match self.executor.delete_rows(table, conditions).await {
            Ok(0) => PruneOutcome::new(
                table.clone(),
                PruneStatus::Exists,
                "no rows matched retention conditions",
            ),
            Ok(rows) => PruneOutcome::new(
                table.clone(),
                PruneStatus::Pruned,
                format!("deleted {rows} row(s)"),
            ),
            Err(error) => {
                PruneOutcome::new(table.clone(), PruneStatus::Error, error.to_string())
            }
        }
    }
}
