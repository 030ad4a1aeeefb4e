use async_trait::async_trait;
use prunewell_core::{AppResult, SqlIdentifier};
use prunewell_domain::{Condition, PartitionDescriptor, RetentionPolicy, TableRef};

/// One table's entry in a pruning batch.
#[derive(Debug, Clone, PartialEq)]
pub struct TableRetentionConfig {
    /// Target table.
    pub table: TableRef,
    /// Optional retention policy; absence means nothing to prune.
    pub policy: Option<RetentionPolicy>,
}

/// Read-only catalog introspection port.
#[async_trait]
pub trait TableCatalog: Send + Sync {
    /// Probes database connectivity before a batch touches any table.
    async fn ping(&self) -> AppResult<()>;

    /// Returns whether the table exists; an absent table is `Ok(false)`.
    async fn table_exists(&self, table: &TableRef) -> AppResult<bool>;

    /// Lists the inheritance/partition children of the table.
    ///
    /// A non-partitioned table yields an empty list, not an error.
    async fn list_child_partitions(
        &self,
        table: &TableRef,
    ) -> AppResult<Vec<PartitionDescriptor>>;

    /// Lists the column names of the table.
    async fn list_columns(&self, table: &TableRef) -> AppResult<Vec<String>>;
}

/// Mutation port executing drops and deletes decided by the engine.
#[async_trait]
pub trait PruneExecutor: Send + Sync {
    /// Drops one partition table in the given schema.
    async fn drop_partition(
        &self,
        schema: &SqlIdentifier,
        partition: &SqlIdentifier,
    ) -> AppResult<()>;

    /// Deletes rows matching all conditions in one atomic statement.
    ///
    /// Returns the number of rows removed.
    async fn delete_rows(&self, table: &TableRef, conditions: &[Condition]) -> AppResult<u64>;
}
