use serde::{Deserialize, Serialize};

use crate::table::TableRef;

/// Terminal status of one table's pruning pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PruneStatus {
    /// Table exists and was examined; nothing was eligible for removal.
    Exists,
    /// Retention policy failed shape validation.
    Invalid,
    /// Pass committed and removed at least one partition or row.
    Pruned,
    /// No retention policy configured; nothing to prune.
    Skipped,
    /// Pass failed: table absent, catalog unreachable, or statement failure.
    Error,
}

impl PruneStatus {
    /// Returns stable wire value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Exists => "exists",
            Self::Invalid => "invalid",
            Self::Pruned => "pruned",
            Self::Skipped => "skipped",
            Self::Error => "error",
        }
    }
}

/// Result of one table's pruning pass.
///
/// Exactly one outcome is produced per table per run; per-partition incidents
/// (format mismatches, individual drop failures) are recovered into `notes`
/// rather than failing the table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PruneOutcome {
    table: TableRef,
    status: PruneStatus,
    message: String,
    notes: Vec<String>,
}

impl PruneOutcome {
    /// Creates an outcome with no per-partition notes.
    #[must_use]
    pub fn new(table: TableRef, status: PruneStatus, message: impl Into<String>) -> Self {
        Self::with_notes(table, status, message, Vec::new())
    }

    /// Creates an outcome carrying per-partition notes.
    #[must_use]
    pub fn with_notes(
        table: TableRef,
        status: PruneStatus,
        message: impl Into<String>,
        notes: Vec<String>,
    ) -> Self {
        Self {
            table,
            status,
            message: message.into(),
            notes,
        }
    }

    /// Returns the table this outcome belongs to.
    #[must_use]
    pub fn table(&self) -> &TableRef {
        &self.table
    }

    /// Returns the terminal status.
    #[must_use]
    pub fn status(&self) -> PruneStatus {
        self.status
    }

    /// Returns the human-readable summary message.
    #[must_use]
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Returns per-partition notes recorded during the pass.
    #[must_use]
    pub fn notes(&self) -> &[String] {
        &self.notes
    }
}
