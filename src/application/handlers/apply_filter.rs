//! ApplyFilterHandler - Command handler for filtering the current report.

use std::sync::Arc;

use chrono::Utc;

use crate::application::registry::SessionRegistry;
use crate::domain::filter::FilterCriteria;
use crate::domain::foundation::UserId;
use crate::domain::session::{PageView, SessionError};

/// Command to replace the active filter.
#[derive(Debug, Clone)]
pub struct ApplyFilterCommand {
    pub user_id: UserId,
    pub criteria: FilterCriteria,
}

/// Result of applying a filter.
#[derive(Debug, Clone)]
pub struct ApplyFilterResult {
    pub criteria: FilterCriteria,
    /// First page of the newly filtered view.
    pub page: PageView,
    /// Unfiltered transaction count, for "N of M match" rendering.
    pub raw_total: usize,
}

/// Handler for applying filters.
///
/// Filtering is a purely local operation over the cached report; the
/// valuation provider is never contacted.
pub struct ApplyFilterHandler {
    registry: Arc<SessionRegistry>,
}

impl ApplyFilterHandler {
    pub fn new(registry: Arc<SessionRegistry>) -> Self {
        Self { registry }
    }

    pub async fn handle(&self, cmd: ApplyFilterCommand) -> Result<ApplyFilterResult, SessionError> {
        let today = Utc::now().date_naive();
        let cell = self.registry.get_or_create(&cmd.user_id).await?;
        let mut cell = cell.lock().await;

        cell.session.apply_filter(cmd.criteria)?;

        let raw_total = cell
            .session
            .report()
            .map(|r| r.transactions.len())
            .unwrap_or(0);
        Ok(ApplyFilterResult {
            criteria: cell.session.filter().clone(),
            page: cell.session.current_page(today),
            raw_total,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::Grade;
    use crate::domain::vehicle::{LookupKey, TransactionRecord, ValuationReport, VehicleQuery, Vin};

    fn vin_query() -> VehicleQuery {
        VehicleQuery::new(
            LookupKey::for_vin(Vin::new("WBA3C1C5XFP853102").unwrap(), None, None).unwrap(),
        )
    }

    fn graded_tx(price: f64, grade: f64) -> TransactionRecord {
        let mut tx = TransactionRecord::with_price(price);
        tx.condition_grade = Some(Grade::try_new(grade).unwrap());
        tx
    }

    async fn registry_with_report(transactions: Vec<TransactionRecord>) -> Arc<SessionRegistry> {
        let registry = Arc::new(SessionRegistry::new(5, 10));
        let cell = registry.get_or_create(&UserId::from(7)).await.unwrap();
        cell.lock().await.session.install_report(
            vin_query(),
            ValuationReport {
                transactions,
                ..ValuationReport::default()
            },
        );
        registry
    }

    fn min_grade(value: f64) -> FilterCriteria {
        let mut criteria = FilterCriteria::default();
        criteria.min_grade = Some(Grade::try_new(value).unwrap());
        criteria
    }

    #[tokio::test]
    async fn narrows_the_view_and_reports_both_counts() {
        let registry = registry_with_report(vec![
            graded_tx(10_000.0, 3.0),
            graded_tx(11_000.0, 4.0),
            graded_tx(12_000.0, 4.5),
        ])
        .await;
        let handler = ApplyFilterHandler::new(registry);

        let result = handler
            .handle(ApplyFilterCommand {
                user_id: UserId::from(7),
                criteria: min_grade(4.0),
            })
            .await
            .unwrap();

        assert_eq!(result.page.total_items, 2);
        assert_eq!(result.raw_total, 3);
        assert_eq!(result.page.page_index, 0);
    }

    #[tokio::test]
    async fn replaces_rather_than_accumulates_criteria() {
        let registry = registry_with_report(vec![
            graded_tx(10_000.0, 3.0),
            graded_tx(11_000.0, 4.5),
        ])
        .await;
        let handler = ApplyFilterHandler::new(Arc::clone(&registry));

        handler
            .handle(ApplyFilterCommand {
                user_id: UserId::from(7),
                criteria: min_grade(4.0),
            })
            .await
            .unwrap();

        // An empty criteria set clears the previous one entirely.
        let result = handler
            .handle(ApplyFilterCommand {
                user_id: UserId::from(7),
                criteria: FilterCriteria::default(),
            })
            .await
            .unwrap();

        assert_eq!(result.page.total_items, 2);
        assert!(result.criteria.is_empty());
    }

    #[tokio::test]
    async fn requires_an_active_query() {
        let registry = Arc::new(SessionRegistry::new(5, 10));
        let handler = ApplyFilterHandler::new(registry);

        let result = handler
            .handle(ApplyFilterCommand {
                user_id: UserId::from(7),
                criteria: min_grade(4.0),
            })
            .await;

        assert!(matches!(result, Err(SessionError::NoActiveQuery)));
    }
}
