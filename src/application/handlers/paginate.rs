//! PaginateHandler - Command handler for page navigation.

use std::sync::Arc;

use chrono::Utc;

use crate::application::registry::SessionRegistry;
use crate::domain::foundation::UserId;
use crate::domain::pagination::PageDirection;
use crate::domain::session::{PageView, SessionError};

/// Command to move the page cursor over the filtered view.
#[derive(Debug, Clone)]
pub struct PaginateCommand {
    pub user_id: UserId,
    pub direction: PageDirection,
}

/// Result of a page move.
#[derive(Debug, Clone)]
pub struct PaginateResult {
    pub page: PageView,
}

/// Handler for pagination.
pub struct PaginateHandler {
    registry: Arc<SessionRegistry>,
}

impl PaginateHandler {
    pub fn new(registry: Arc<SessionRegistry>) -> Self {
        Self { registry }
    }

    pub async fn handle(&self, cmd: PaginateCommand) -> Result<PaginateResult, SessionError> {
        let today = Utc::now().date_naive();
        let cell = self.registry.get_or_create(&cmd.user_id).await?;
        let mut cell = cell.lock().await;

        let page = cell.session.paginate(cmd.direction, today)?;
        Ok(PaginateResult { page })
    }
}
