use axum::Json;
use axum::extract::State;
use prunewell_application::{TableCatalog, TableRetentionConfig};
use prunewell_domain::{PruneOutcome, PruneStatus};
use tracing::info;

use crate::dto::{
    BatchEntry, HealthResponse, PruneRequest, PruneResponse, PruneResultResponse,
    TableConfigRequest,
};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let database_accessible = state.catalog.ping().await.is_ok();

    Json(HealthResponse {
        status: "healthy",
        database_accessible,
    })
}

pub async fn prune_handler(
    State(state): State<AppState>,
    Json(payload): Json<PruneRequest>,
) -> ApiResult<Json<PruneResponse>> {
    info!(tables = payload.tables.len(), "received prune request");

    let entries = convert_entries(payload.tables)?;

    let batch: Vec<TableRetentionConfig> = entries
        .iter()
        .filter_map(|entry| match entry {
            BatchEntry::Ready(config) => Some(config.clone()),
            BatchEntry::Invalid(_) => None,
        })
        .collect();

    let engine_outcomes = state.retention_service.run_batch(&batch).await?;

    Ok(Json(PruneResponse {
        results: merge_outcomes(entries, engine_outcomes),
    }))
}

/// Converts request entries into batch entries.
///
/// Malformed table references reject the whole request; policy shape errors
/// settle as per-table `invalid` results without reaching the database.
fn convert_entries(tables: Vec<TableConfigRequest>) -> ApiResult<Vec<BatchEntry>> {
    let mut entries = Vec::with_capacity(tables.len());
    for table_config in tables {
        let table = table_config.table_ref()?;
        match table_config.domain_policy() {
            Ok(policy) => entries.push(BatchEntry::Ready(TableRetentionConfig { table, policy })),
            Err(error) => entries.push(BatchEntry::Invalid(PruneOutcome::new(
                table,
                PruneStatus::Invalid,
                error.to_string(),
            ))),
        }
    }

    Ok(entries)
}

/// Re-interleaves engine outcomes with already-settled invalid entries,
/// preserving the request's table order.
fn merge_outcomes(
    entries: Vec<BatchEntry>,
    engine_outcomes: Vec<PruneOutcome>,
) -> Vec<PruneResultResponse> {
    let mut engine_outcomes = engine_outcomes.into_iter();
    let mut results = Vec::with_capacity(entries.len());
    for entry in entries {
        let outcome = match entry {
            BatchEntry::Ready(_) => match engine_outcomes.next() {
                Some(outcome) => outcome,
                None => continue,
            },
            BatchEntry::Invalid(outcome) => outcome,
        };
        results.push(outcome.into());
    }

    results
}

#[cfg(test)]
mod tests {
    use prunewell_domain::{PruneOutcome, PruneStatus, TableRef};
    use serde_json::json;

    use crate::dto::{
        BatchEntry, ConditionRequest, RetentionPolicyRequest, TableConfigRequest,
        TimeRetentionRequest,
    };

    use super::{convert_entries, merge_outcomes};

    fn table_request(table_name: &str, policy: Option<RetentionPolicyRequest>) -> TableConfigRequest {
        TableConfigRequest {
            table_name: table_name.to_owned(),
            schema_name: "public".to_owned(),
            retention_policy: policy,
        }
    }

    fn time_policy_request() -> RetentionPolicyRequest {
        RetentionPolicyRequest {
            timeretention: Some(TimeRetentionRequest {
                dt_target_column: "mtime".to_owned(),
                retention_seconds: 15,
            }),
            conditions: None,
        }
    }

    fn ambiguous_policy_request() -> RetentionPolicyRequest {
        RetentionPolicyRequest {
            timeretention: Some(TimeRetentionRequest {
                dt_target_column: "mtime".to_owned(),
                retention_seconds: 15,
            }),
            conditions: Some(vec![ConditionRequest {
                column: "status".to_owned(),
                operator: "=".to_owned(),
                value: json!("archived"),
            }]),
        }
    }

    #[test]
    fn ambiguous_policy_settles_as_invalid_without_reaching_engine() {
        let entries = convert_entries(vec![
            table_request("events", Some(time_policy_request())),
            table_request("sessions", Some(ambiguous_policy_request())),
            table_request("audits", None),
        ]);
        assert!(entries.is_ok());
        let entries = entries.unwrap_or_default();

        assert_eq!(entries.len(), 3);
        assert!(matches!(entries[0], BatchEntry::Ready(_)));
        match &entries[1] {
            BatchEntry::Invalid(outcome) => {
                assert_eq!(outcome.status(), PruneStatus::Invalid);
                assert!(outcome.message().contains("ambiguous"));
            }
            BatchEntry::Ready(_) => panic!("ambiguous policy must not reach the engine"),
        }
        assert!(matches!(entries[2], BatchEntry::Ready(_)));
    }

    #[test]
    fn merge_preserves_request_order_around_invalid_entries() {
        let entries = convert_entries(vec![
            table_request("events", Some(time_policy_request())),
            table_request("sessions", Some(ambiguous_policy_request())),
            table_request("audits", None),
        ]);
        assert!(entries.is_ok());

        let engine_outcomes = vec![
            PruneOutcome::new(
                TableRef::new("public", "events").unwrap_or_else(|_| unreachable!()),
                PruneStatus::Pruned,
                "dropped 1 partition(s), retained 0, skipped 0",
            ),
            PruneOutcome::new(
                TableRef::new("public", "audits").unwrap_or_else(|_| unreachable!()),
                PruneStatus::Skipped,
                "no retention policy configured, nothing to prune",
            ),
        ];

        let results = merge_outcomes(entries.unwrap_or_default(), engine_outcomes);

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].table_name, "events");
        assert_eq!(results[0].status, "pruned");
        assert_eq!(results[1].table_name, "sessions");
        assert_eq!(results[1].status, "invalid");
        assert_eq!(results[2].table_name, "audits");
        assert_eq!(results[2].status, "skipped");
    }

    #[test]
    fn malformed_table_reference_rejects_the_request() {
        let entries = convert_entries(vec![table_request(
            "events; DROP TABLE users",
            Some(time_policy_request()),
        )]);
        assert!(entries.is_err());
    }
}
