//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod outcome;
mod partition_name;
mod policy;
mod table;

pub use outcome::{PruneOutcome, PruneStatus};
pub use partition_name::{decode_partition_name, encode_partition_name};
pub use policy::{ComparisonOperator, Condition, ConditionSet, RetentionPolicy, TimeRetention};
pub use table::{PartitionDescriptor, TableRef};
