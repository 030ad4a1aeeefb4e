use async_trait::async_trait;
use serde_json::Value;
use sqlx::{FromRow, PgPool};
use tracing::debug;

use prunewell_application::{PruneExecutor, TableCatalog};
use prunewell_core::{AppError, AppResult, SqlIdentifier};
use prunewell_domain::{Condition, PartitionDescriptor, TableRef};

/// PostgreSQL-backed catalog introspection and prune execution.
///
/// Implements both application ports over one connection pool: reads go to
/// `information_schema`/`pg_inherits`, mutations are `DROP TABLE` and a single
/// parameterized `DELETE`. All interpolated identifiers are [`SqlIdentifier`]
/// validated; all condition values are bound parameters.
#[derive(Clone)]
pub struct PostgresTableCatalog {
    pool: PgPool,
}

impl PostgresTableCatalog {
    /// Creates a catalog with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct PartitionRow {
    partition_name: String,
}

#[async_trait]
impl TableCatalog for PostgresTableCatalog {
    async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|error| {
                AppError::Unavailable(format!("database connection unavailable: {error}"))
            })?;

        Ok(())
    }

    async fn table_exists(&self, table: &TableRef) -> AppResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1
                FROM information_schema.tables
                WHERE table_name = $1 AND table_schema = $2
            )
            "#,
        )
        .bind(table.table().as_str())
        .bind(table.schema().as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|error| {
            AppError::Unavailable(format!("failed to check existence of {table}: {error}"))
        })?;

        Ok(exists)
    }

    async fn list_child_partitions(
        &self,
        table: &TableRef,
    ) -> AppResult<Vec<PartitionDescriptor>> {
        let rows = sqlx::query_as::<_, PartitionRow>(
            r#"
            SELECT child.relname AS partition_name
            FROM pg_inherits
                JOIN pg_class parent ON pg_inherits.inhparent = parent.oid
                JOIN pg_class child ON pg_inherits.inhrelid = child.oid
            WHERE parent.relname = $1
                AND parent.relnamespace = (
                    SELECT oid FROM pg_namespace WHERE nspname = $2
                )
            ORDER BY child.relname
            "#,
        )
        .bind(table.table().as_str())
        .bind(table.schema().as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Unavailable(format!("failed to list partitions of {table}: {error}"))
        })?;

        Ok(rows
            .into_iter()
            .map(|row| PartitionDescriptor::new(row.partition_name, table.clone()))
            .collect())
    }

    async fn list_columns(&self, table: &TableRef) -> AppResult<Vec<String>> {
        sqlx::query_scalar::<_, String>(
            r#"
            SELECT column_name
            FROM information_schema.columns
            WHERE table_schema = $1 AND table_name = $2
            ORDER BY ordinal_position
            "#,
        )
        .bind(table.schema().as_str())
        .bind(table.table().as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Unavailable(format!("failed to list columns of {table}: {error}"))
        })
    }
}

#[async_trait]
impl PruneExecutor for PostgresTableCatalog {
    async fn drop_partition(
        &self,
        schema: &SqlIdentifier,
        partition: &SqlIdentifier,
    ) -> AppResult<()> {
        let statement = format!("DROP TABLE IF EXISTS {schema}.{partition}");
        sqlx::query(statement.as_str())
            .execute(&self.pool)
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to drop {schema}.{partition}: {error}"))
            })?;

        debug!(%schema, %partition, "dropped partition");
        Ok(())
    }

    async fn delete_rows(&self, table: &TableRef, conditions: &[Condition]) -> AppResult<u64> {
        if conditions.is_empty() {
            return Err(AppError::Validation(
                "row deletion requires at least one condition".to_owned(),
            ));
        }

        let predicate = conditions
            .iter()
            .enumerate()
            .map(|(index, condition)| {
                format!(
                    "{} {} ${}",
                    condition.column(),
                    condition.operator().as_sql(),
                    index + 1
                )
            })
            .collect::<Vec<_>>()
            .join(" AND ");
        let statement = format!("DELETE FROM {} WHERE {predicate}", table.qualified());

        let mut query = sqlx::query(statement.as_str());
        for condition in conditions {
            query = match condition.value() {
                Value::String(text) => query.bind(text.clone()),
                Value::Bool(flag) => query.bind(*flag),
                Value::Number(number) => match number.as_i64() {
                    Some(integer) => query.bind(integer),
                    None => query.bind(number.as_f64().unwrap_or_default()),
                },
                other => {
                    return Err(AppError::Validation(format!(
                        "unsupported condition value {other} for column '{}'",
                        condition.column()
                    )));
                }
            };
        }

        let result = query.execute(&self.pool).await.map_err(|error| {
            AppError::Internal(format!("failed to delete rows from {table}: {error}"))
        })?;

        debug!(table = %table, rows = result.rows_affected(), "deleted rows");
        Ok(result.rows_affected())
    }
}
