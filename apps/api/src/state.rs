use prunewell_application::RetentionService;
use prunewell_infrastructure::PostgresTableCatalog;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub retention_service: RetentionService,
    pub catalog: PostgresTableCatalog,
}
