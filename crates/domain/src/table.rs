use std::fmt::{Display, Formatter};

use prunewell_core::{AppResult, SqlIdentifier};
use serde::{Deserialize, Serialize};

/// Reference to a logical (possibly partitioned) table.
///
/// Both parts are validated identifiers, so a `TableRef` is always safe to
/// interpolate into a statement as `schema.table`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TableRef {
    schema: SqlIdentifier,
    table: SqlIdentifier,
}

impl TableRef {
    /// Creates a validated table reference.
    pub fn new(schema: impl Into<String>, table: impl Into<String>) -> AppResult<Self> {
        Ok(Self {
            schema: SqlIdentifier::new(schema)?,
            table: SqlIdentifier::new(table)?,
        })
    }

    /// Returns the schema name.
    #[must_use]
    pub fn schema(&self) -> &SqlIdentifier {
        &self.schema
    }

    /// Returns the table name.
    #[must_use]
    pub fn table(&self) -> &SqlIdentifier {
        &self.table
    }

    /// Returns the schema-qualified form used in statements and log lines.
    #[must_use]
    pub fn qualified(&self) -> String {
        format!("{}.{}", self.schema, self.table)
    }
}

impl Display for TableRef {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}.{}", self.schema, self.table)
    }
}

/// A child partition discovered under a parent table during one pruning pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionDescriptor {
    name: String,
    parent: TableRef,
}

impl PartitionDescriptor {
    /// Creates a partition descriptor from catalog metadata.
    #[must_use]
    pub fn new(name: impl Into<String>, parent: TableRef) -> Self {
        Self {
            name: name.into(),
            parent,
        }
    }

    /// Returns the partition relation name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the parent table reference.
    #[must_use]
    pub fn parent(&self) -> &TableRef {
        &self.parent
    }
}

#[cfg(test)]
mod tests {
    use super::TableRef;

    #[test]
    fn table_ref_formats_schema_qualified() {
        let table = TableRef::new("public", "events");
        assert!(table.is_ok());
        assert_eq!(
            table.unwrap_or_else(|_| unreachable!()).qualified(),
            "public.events"
        );
    }

    #[test]
    fn table_ref_rejects_unsafe_parts() {
        assert!(TableRef::new("", "events").is_err());
        assert!(TableRef::new("public", "events;--").is_err());
    }
}
