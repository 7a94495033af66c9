//! GetHistoryHandler - Query handler for the session's past queries.

use std::sync::Arc;

use crate::application::registry::SessionRegistry;
use crate::domain::foundation::UserId;
use crate::domain::session::SessionError;
use crate::domain::vehicle::VehicleQuery;

/// Query for a user's past vehicle queries.
#[derive(Debug, Clone)]
pub struct GetHistoryQuery {
    pub user_id: UserId,
}

/// History snapshot, most recent first.
#[derive(Debug, Clone)]
pub struct GetHistoryResult {
    pub active: Option<VehicleQuery>,
    pub past: Vec<VehicleQuery>,
}

/// Handler for history lookups.
pub struct GetHistoryHandler {
    registry: Arc<SessionRegistry>,
}

impl GetHistoryHandler {
    pub fn new(registry: Arc<SessionRegistry>) -> Self {
        Self { registry }
    }

    pub async fn handle(&self, query: GetHistoryQuery) -> Result<GetHistoryResult, SessionError> {
        let cell = self.registry.get_or_create(&query.user_id).await?;
        let cell = cell.lock().await;

        Ok(GetHistoryResult {
            active: cell.session.active_query().cloned(),
            past: cell.session.history_snapshot(),
        })
    }
}
