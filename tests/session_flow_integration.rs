//! Integration tests for the conversation flow across handlers.
//!
//! These tests verify the end-to-end session lifecycle:
//! 1. StartQueryHandler fetches a report and installs it
//! 2. ApplyFilterHandler narrows the cached view without re-fetching
//! 3. PaginateHandler walks the filtered view
//! 4. RefineFieldHandler re-fetches under the merged query signature,
//!    clearing the filter and pushing the old query into history
//! 5. RequestForecastHandler projects prices over the raw report
//! 6. GetHistoryHandler exposes the active query and the trail
//!
//! Uses scripted in-memory port implementations; no network involved.

use async_trait::async_trait;
use std::sync::Arc;

use lanescout::adapters::manheim::MockValuationClient;
use lanescout::application::handlers::{
    ApplyFilterCommand, ApplyFilterHandler, GetHistoryHandler, GetHistoryQuery, PaginateCommand,
    PaginateHandler, RefineFieldCommand, RefineFieldHandler, RequestForecastCommand,
    RequestForecastHandler, StartQueryCommand, StartQueryHandler,
};
use lanescout::application::registry::SessionRegistry;
use lanescout::domain::filter::FilterCriteria;
use lanescout::domain::foundation::{Grade, Mileage, Region, UserId};
use lanescout::domain::pagination::PageDirection;
use lanescout::domain::refine::RefineField;
use lanescout::domain::trend::TrendForecast;
use lanescout::domain::vehicle::{
    LookupKey, TransactionRecord, ValuationReport, VehicleQuery, Vin,
};
use lanescout::ports::{ChartArtifact, ChartError, ChartRenderer, ValuationClient};

// =============================================================================
// Test Infrastructure
// =============================================================================

struct StubChartRenderer;

#[async_trait]
impl ChartRenderer for StubChartRenderer {
    async fn render(&self, _forecast: &TrendForecast) -> Result<ChartArtifact, ChartError> {
        Ok(ChartArtifact::Url("https://charts.test/c.png".to_string()))
    }
}

fn tx(price: f64, date: &str, grade: f64, region: Region) -> TransactionRecord {
    TransactionRecord {
        sale_date: Some(date.parse().unwrap()),
        odometer: Some(Mileage::new(40_000)),
        condition_grade: Some(Grade::try_new(grade).unwrap()),
        region: Some(region),
        ..TransactionRecord::with_price(price)
    }
}

/// Twelve sales over three months; grades alternate 3.5 / 4.5 so a
/// `grade >= 4.0` filter keeps exactly half.
fn full_report() -> ValuationReport {
    ValuationReport {
        transactions: vec![
            tx(17_000.0, "2025-01-05", 3.5, Region::Northeast),
            tx(17_200.0, "2025-01-12", 4.5, Region::West),
            tx(17_400.0, "2025-01-19", 3.5, Region::Northeast),
            tx(17_600.0, "2025-01-26", 4.5, Region::West),
            tx(18_000.0, "2025-02-05", 3.5, Region::Northeast),
            tx(18_200.0, "2025-02-12", 4.5, Region::West),
            tx(18_400.0, "2025-02-19", 3.5, Region::Northeast),
            tx(18_600.0, "2025-02-26", 4.5, Region::West),
            tx(19_000.0, "2025-03-05", 3.5, Region::Northeast),
            tx(19_200.0, "2025-03-12", 4.5, Region::West),
            tx(19_400.0, "2025-03-19", 3.5, Region::Northeast),
            tx(19_600.0, "2025-03-26", 4.5, Region::West),
        ],
        ..ValuationReport::default()
    }
}

/// What the provider returns once the query carries `region=NE`.
fn regional_report() -> ValuationReport {
    ValuationReport {
        transactions: vec![
            tx(17_000.0, "2025-01-05", 3.5, Region::Northeast),
            tx(17_400.0, "2025-01-19", 3.5, Region::Northeast),
            tx(18_000.0, "2025-02-05", 3.5, Region::Northeast),
            tx(19_000.0, "2025-03-05", 3.5, Region::Northeast),
        ],
        ..ValuationReport::default()
    }
}

fn base_query() -> VehicleQuery {
    VehicleQuery::new(
        LookupKey::for_vin(Vin::new("WBA3C1C5XFP853102").unwrap(), None, None).unwrap(),
    )
}

fn grade_filter(min: f64) -> FilterCriteria {
    FilterCriteria {
        min_grade: Some(Grade::try_new(min).unwrap()),
        ..FilterCriteria::default()
    }
}

struct Handlers {
    registry: Arc<SessionRegistry>,
    client: MockValuationClient,
    start_query: StartQueryHandler,
    refine_field: RefineFieldHandler,
    apply_filter: ApplyFilterHandler,
    paginate: PaginateHandler,
    request_forecast: RequestForecastHandler,
    get_history: GetHistoryHandler,
}

fn handlers(page_size: usize, client: MockValuationClient) -> Handlers {
    let registry = Arc::new(SessionRegistry::new(page_size, 10));
    let valuation: Arc<dyn ValuationClient> = Arc::new(client.clone());
    Handlers {
        registry: Arc::clone(&registry),
        client,
        start_query: StartQueryHandler::new(Arc::clone(&registry), Arc::clone(&valuation)),
        refine_field: RefineFieldHandler::new(Arc::clone(&registry), Arc::clone(&valuation)),
        apply_filter: ApplyFilterHandler::new(Arc::clone(&registry)),
        paginate: PaginateHandler::new(Arc::clone(&registry)),
        request_forecast: RequestForecastHandler::new(
            Arc::clone(&registry),
            Arc::new(StubChartRenderer),
        ),
        get_history: GetHistoryHandler::new(registry),
    }
}

fn user() -> UserId {
    UserId::from(42)
}

// =============================================================================
// Integration Tests
// =============================================================================

/// Tests the full conversation: lookup, filter without re-fetch, page
/// through the filtered view, refine with re-fetch, inspect history.
#[tokio::test]
async fn lookup_filter_page_refine_history_flow() {
    let client = MockValuationClient::new()
        .with_report(full_report())
        .with_report(regional_report());
    let h = handlers(5, client);

    // 1. VIN lookup fetches and installs the report.
    let started = h
        .start_query
        .handle(StartQueryCommand {
            user_id: user(),
            query: base_query(),
        })
        .await
        .unwrap();

    assert!(started.fetched);
    assert_eq!(h.client.call_count(), 1);
    assert_eq!(started.report.transaction_count(), 12);
    assert_eq!(started.page.total_items, 12);
    assert_eq!(started.page.items.len(), 5);

    // 2. Filtering narrows the cached view; the provider is not called.
    let filtered = h
        .apply_filter
        .handle(ApplyFilterCommand {
            user_id: user(),
            criteria: grade_filter(4.0),
        })
        .await
        .unwrap();

    assert_eq!(h.client.call_count(), 1);
    assert_eq!(filtered.raw_total, 12);
    assert_eq!(filtered.page.total_items, 6);
    assert_eq!(filtered.page.page_index, 0);
    assert!(filtered
        .page
        .items
        .iter()
        .all(|t| t.condition_grade.unwrap() >= Grade::try_new(4.0).unwrap()));

    // 3. Paging walks the filtered view with continuous numbering.
    let next = h
        .paginate
        .handle(PaginateCommand {
            user_id: user(),
            direction: PageDirection::Next,
        })
        .await
        .unwrap();

    assert_eq!(next.page.page_index, 1);
    assert_eq!(next.page.start_index, 5);
    assert_eq!(next.page.items.len(), 1);

    // 4. Refinement changes the query signature, so the provider is hit
    //    again and the narrower report replaces the cached one.
    let refined = h
        .refine_field
        .handle(RefineFieldCommand {
            user_id: user(),
            field: "region".to_string(),
            value: "NE".to_string(),
        })
        .await
        .unwrap();

    let expected = base_query().refined(RefineField::Region(Region::Northeast));
    assert_eq!(refined.query, expected);
    assert_eq!(h.client.calls(), vec![base_query(), expected.clone()]);
    assert_eq!(refined.report.transaction_count(), 4);

    // The filter from step 2 does not carry over to the new report.
    assert_eq!(refined.page.total_items, 4);
    assert_eq!(refined.page.page_index, 0);

    // 5. History holds the superseded query, most recent first.
    let history = h
        .get_history
        .handle(GetHistoryQuery { user_id: user() })
        .await
        .unwrap();

    assert_eq!(history.active, Some(expected));
    assert_eq!(history.past, vec![base_query()]);
}

/// Tests that repeating the active query signature reuses the cached
/// report instead of calling the provider again. The script holds only
/// one report, so an unexpected second fetch would fail the lookup.
#[tokio::test]
async fn repeated_lookup_reuses_the_cached_report() {
    let h = handlers(5, MockValuationClient::new().with_report(full_report()));

    let first = h
        .start_query
        .handle(StartQueryCommand {
            user_id: user(),
            query: base_query(),
        })
        .await
        .unwrap();
    assert!(first.fetched);

    let second = h
        .start_query
        .handle(StartQueryCommand {
            user_id: user(),
            query: base_query(),
        })
        .await
        .unwrap();

    assert!(!second.fetched);
    assert_eq!(h.client.call_count(), 1);
    assert_eq!(second.report.transaction_count(), 12);
}

/// Tests that forecasting works over the raw report even while a filter
/// is active, and that the chart renderer output is attached.
#[tokio::test]
async fn forecast_covers_the_raw_report_despite_filters() {
    let h = handlers(5, MockValuationClient::new().with_report(full_report()));

    h.start_query
        .handle(StartQueryCommand {
            user_id: user(),
            query: base_query(),
        })
        .await
        .unwrap();

    // Narrow the view to half the sales first.
    h.apply_filter
        .handle(ApplyFilterCommand {
            user_id: user(),
            criteria: grade_filter(4.0),
        })
        .await
        .unwrap();

    let result = h
        .request_forecast
        .handle(RequestForecastCommand {
            user_id: user(),
            horizon: 2,
        })
        .await
        .unwrap();

    // All three months appear, with all four sales of each month.
    assert_eq!(result.forecast.history.len(), 3);
    assert!(result
        .forecast
        .history
        .iter()
        .all(|stats| stats.sample_count == 4));
    assert_eq!(result.forecast.projection.len(), 2);
    assert_eq!(
        result.chart,
        Some(ChartArtifact::Url("https://charts.test/c.png".to_string()))
    );

    // Prices rose month over month, so the projection keeps climbing.
    let last_history = result.forecast.history.last().unwrap().average_price;
    assert!(result.forecast.projection[0].predicted_price > last_history);
}

/// Tests that different users get isolated sessions.
#[tokio::test]
async fn sessions_are_isolated_per_user() {
    let h = handlers(5, MockValuationClient::new().with_report(full_report()));

    h.start_query
        .handle(StartQueryCommand {
            user_id: UserId::from(1),
            query: base_query(),
        })
        .await
        .unwrap();

    h.apply_filter
        .handle(ApplyFilterCommand {
            user_id: UserId::from(1),
            criteria: grade_filter(4.0),
        })
        .await
        .unwrap();

    // The second user has no active query at all.
    let result = h
        .apply_filter
        .handle(ApplyFilterCommand {
            user_id: UserId::from(2),
            criteria: grade_filter(4.0),
        })
        .await;
    assert!(result.is_err());

    assert_eq!(h.registry.len().await, 2);
}

/// Tests that clearing the filter restores the full view and resets the
/// page cursor.
#[tokio::test]
async fn clearing_the_filter_restores_the_full_view() {
    let h = handlers(5, MockValuationClient::new().with_report(full_report()));

    h.start_query
        .handle(StartQueryCommand {
            user_id: user(),
            query: base_query(),
        })
        .await
        .unwrap();

    h.apply_filter
        .handle(ApplyFilterCommand {
            user_id: user(),
            criteria: grade_filter(4.0),
        })
        .await
        .unwrap();

    h.paginate
        .handle(PaginateCommand {
            user_id: user(),
            direction: PageDirection::Next,
        })
        .await
        .unwrap();

    let cleared = h
        .apply_filter
        .handle(ApplyFilterCommand {
            user_id: user(),
            criteria: FilterCriteria::default(),
        })
        .await
        .unwrap();

    assert!(cleared.criteria.is_empty());
    assert_eq!(cleared.page.total_items, 12);
    assert_eq!(cleared.page.page_index, 0);
    assert_eq!(h.client.call_count(), 1);
}
