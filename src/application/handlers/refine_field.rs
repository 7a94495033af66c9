//! RefineFieldHandler - Command handler for refining the active query.

use std::sync::Arc;

use chrono::Utc;
use tracing::debug;

use crate::application::registry::SessionRegistry;
use crate::domain::foundation::UserId;
use crate::domain::refine::ParameterValidator;
use crate::domain::session::{PageView, SessionError};
use crate::domain::vehicle::{ValuationReport, VehicleQuery};
use crate::ports::ValuationClient;

/// Command to merge one refinement field into the active query.
///
/// `field` and `value` arrive as raw user input and go through the
/// parameter validator before touching the session.
#[derive(Debug, Clone)]
pub struct RefineFieldCommand {
    pub user_id: UserId,
    pub field: String,
    pub value: String,
}

/// Result of a completed refinement.
#[derive(Debug, Clone)]
pub struct RefineFieldResult {
    pub query: VehicleQuery,
    pub report: ValuationReport,
    pub page: PageView,
}

/// Handler for refining queries.
pub struct RefineFieldHandler {
    registry: Arc<SessionRegistry>,
    client: Arc<dyn ValuationClient>,
}

impl RefineFieldHandler {
    pub fn new(registry: Arc<SessionRegistry>, client: Arc<dyn ValuationClient>) -> Self {
        Self { registry, client }
    }

    pub async fn handle(&self, cmd: RefineFieldCommand) -> Result<RefineFieldResult, SessionError> {
        let today = Utc::now().date_naive();

        // 1. Validate the raw field before touching session state.
        let field = ParameterValidator::validate(&cmd.field, &cmd.value, today)?;

        let cell = self.registry.get_or_create(&cmd.user_id).await?;

        // 2. Merge into the active query; an unchanged signature is a no-op.
        let (merged, ticket) = {
            let mut cell = cell.lock().await;
            let merged = match cell.session.active_query() {
                Some(active) => active.refined(field),
                None => return Err(SessionError::NoActiveQuery),
            };
            if cell.session.is_active_query(&merged) {
                if let Some(report) = cell.session.report() {
                    return Ok(RefineFieldResult {
                        query: merged,
                        report: report.clone(),
                        page: cell.session.current_page(today),
                    });
                }
            }
            cell.session.begin_refining()?;
            (merged, cell.begin_fetch())
        };

        // 3. Re-fetch under the new signature without holding the lock.
        debug!(user_id = %cmd.user_id, query = %merged, "Refining query");
        let fetched = self.client.fetch(&merged).await;

        // 4. Install, unless a newer fetch has superseded this one.
        let mut cell = cell.lock().await;
        if !cell.is_current(ticket) {
            debug!(user_id = %cmd.user_id, query = %merged, "Discarding stale refinement result");
            return Err(SessionError::Stale);
        }
        match fetched {
            Ok(report) => {
                cell.session.install_report(merged.clone(), report.clone());
                Ok(RefineFieldResult {
                    query: merged,
                    report,
                    page: cell.session.current_page(today),
                })
            }
            Err(err) => {
                cell.session.settle();
                Err(err.into())
            }
        }
    }
}
