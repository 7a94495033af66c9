//! StartQueryHandler - Command handler for starting a vehicle query.

use std::sync::Arc;

use chrono::Utc;
use tracing::debug;

use crate::application::registry::SessionRegistry;
use crate::domain::foundation::UserId;
use crate::domain::session::{PageView, SessionError};
use crate::domain::vehicle::{ValuationReport, VehicleQuery};
use crate::ports::ValuationClient;

/// Command to start (or replace) the active query.
#[derive(Debug, Clone)]
pub struct StartQueryCommand {
    pub user_id: UserId,
    pub query: VehicleQuery,
}

/// Result of a started query.
#[derive(Debug, Clone)]
pub struct StartQueryResult {
    pub query: VehicleQuery,
    pub report: ValuationReport,
    pub page: PageView,
    /// False when the query matched the active one and no fetch happened.
    pub fetched: bool,
}

/// Handler for starting queries.
pub struct StartQueryHandler {
    registry: Arc<SessionRegistry>,
    client: Arc<dyn ValuationClient>,
}

impl StartQueryHandler {
    pub fn new(registry: Arc<SessionRegistry>, client: Arc<dyn ValuationClient>) -> Self {
        Self { registry, client }
    }

    pub async fn handle(&self, cmd: StartQueryCommand) -> Result<StartQueryResult, SessionError> {
        let today = Utc::now().date_naive();
        let cell = self.registry.get_or_create(&cmd.user_id).await?;

        // 1. Repeating the active query is a no-op; serve the cached report.
        let ticket = {
            let mut cell = cell.lock().await;
            if cell.session.is_active_query(&cmd.query) {
                if let Some(report) = cell.session.report() {
                    return Ok(StartQueryResult {
                        query: cmd.query,
                        report: report.clone(),
                        page: cell.session.current_page(today),
                        fetched: false,
                    });
                }
            }
            cell.begin_fetch()
        };

        // 2. Fetch without holding the session lock.
        debug!(user_id = %cmd.user_id, query = %cmd.query, "Fetching valuation report");
        let fetched = self.client.fetch(&cmd.query).await;

        // 3. Install the result, unless a newer fetch has superseded it.
        let mut cell = cell.lock().await;
        if !cell.is_current(ticket) {
            debug!(user_id = %cmd.user_id, query = %cmd.query, "Discarding stale fetch result");
            return Err(SessionError::Stale);
        }
        match fetched {
            Ok(report) => {
                cell.session.install_report(cmd.query.clone(), report.clone());
                Ok(StartQueryResult {
                    query: cmd.query,
                    report,
                    page: cell.session.current_page(today),
                    fetched: true,
                })
            }
            Err(err) => {
                cell.session.settle();
                Err(err.into())
            }
        }
    }
}
