//! Session aggregate entity.
//!
//! A session is the single source of truth for one user's conversation
//! state: the active query, its raw valuation report, the filter layered
//! on top, the page cursor, and the trail of past queries.
//!
//! # Invariants
//!
//! - Pagination always operates over the filtered view, never the raw
//!   transaction list.
//! - Replacing the query clears the filter and resets the page cursor;
//!   replacing the filter resets the page cursor without a re-fetch.
//! - Forecasting reads the raw transactions, unaffected by the filter.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::filter::{FilterCriteria, FilterEngine};
use crate::domain::foundation::{SessionId, StateMachine, Timestamp, UserId, ValidationError};
use crate::domain::pagination::{PageDirection, Paginator};
use crate::domain::session::errors::SessionError;
use crate::domain::session::history::QueryHistory;
use crate::domain::session::phase::SessionPhase;
use crate::domain::trend::{TrendAnalyzer, TrendError, TrendForecast, MIN_TREND_PERIODS};
use crate::domain::vehicle::{TransactionRecord, ValuationReport, VehicleQuery};

/// One page of the filtered transaction view, ready for rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageView {
    /// Zero-based index of this page.
    pub page_index: usize,
    /// Total pages in the filtered view.
    pub page_count: usize,
    /// Total transactions in the filtered view.
    pub total_items: usize,
    /// Zero-based position of the first item on this page within the
    /// filtered view, for numbering that continues across pages.
    pub start_index: usize,
    /// Transactions on this page, in provider order.
    pub items: Vec<TransactionRecord>,
}

/// Session aggregate - per-user conversation state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Unique identifier for this session.
    id: SessionId,

    /// User this session belongs to.
    user_id: UserId,

    /// Current lifecycle phase.
    phase: SessionPhase,

    /// The query whose report is currently loaded.
    active_query: Option<VehicleQuery>,

    /// Raw report from the last successful fetch.
    report: Option<ValuationReport>,

    /// Filter layered over the report's transactions.
    filter: FilterCriteria,

    /// Page cursor over the filtered view.
    paginator: Paginator,

    /// Previously active queries, most recent first.
    history: QueryHistory,

    /// When the session was created.
    created_at: Timestamp,

    /// When the user last touched the session.
    last_activity: Timestamp,
}

impl Session {
    /// Create a new idle session.
    ///
    /// # Errors
    ///
    /// - `OutOfRange` if `page_size` or `history_capacity` is zero
    pub fn new(
        id: SessionId,
        user_id: UserId,
        page_size: usize,
        history_capacity: usize,
    ) -> Result<Self, ValidationError> {
        let now = Timestamp::now();
        Ok(Self {
            id,
            user_id,
            phase: SessionPhase::Idle,
            active_query: None,
            report: None,
            filter: FilterCriteria::default(),
            paginator: Paginator::new(page_size)?,
            history: QueryHistory::new(history_capacity)?,
            created_at: now,
            last_activity: now,
        })
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    /// Returns the session ID.
    pub fn id(&self) -> &SessionId {
        &self.id
    }

    /// Returns the owning user's ID.
    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// Returns the current phase.
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Returns the active query, if any.
    pub fn active_query(&self) -> Option<&VehicleQuery> {
        self.active_query.as_ref()
    }

    /// Returns the raw report from the last successful fetch.
    pub fn report(&self) -> Option<&ValuationReport> {
        self.report.as_ref()
    }

    /// Returns the active filter criteria.
    pub fn filter(&self) -> &FilterCriteria {
        &self.filter
    }

    /// Returns the page cursor.
    pub fn paginator(&self) -> &Paginator {
        &self.paginator
    }

    /// Returns when the session was created.
    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    /// Returns when the user last touched the session.
    pub fn last_activity(&self) -> &Timestamp {
        &self.last_activity
    }

    /// Returns true if `query` matches the active query signature.
    ///
    /// Used to skip the fetch when a user repeats the exact lookup.
    pub fn is_active_query(&self, query: &VehicleQuery) -> bool {
        self.active_query.as_ref() == Some(query)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Query lifecycle
    // ─────────────────────────────────────────────────────────────────────────

    /// Marks the session as refining while a re-fetch is in flight.
    ///
    /// # Errors
    ///
    /// - `NoActiveQuery` if there is nothing to refine
    /// - `InvalidState` if another operation is mid-flight
    pub fn begin_refining(&mut self) -> Result<(), SessionError> {
        self.require_query()?;
        self.enter(SessionPhase::Refining)
    }

    /// Installs a freshly fetched report as the active query result.
    ///
    /// The previous query (if different) is pushed onto history, the
    /// filter is cleared, and the page cursor returns to page 0.
    pub fn install_report(&mut self, query: VehicleQuery, report: ValuationReport) {
        if let Some(previous) = self.active_query.take() {
            if previous != query {
                self.history.push(previous);
            }
        }
        self.active_query = Some(query);
        self.report = Some(report);
        self.filter = FilterCriteria::default();
        self.paginator.reset();
        self.phase = SessionPhase::QueryActive;
        self.touch();
    }

    /// Returns the session to its resting phase after a failed or
    /// abandoned operation, leaving query, filter, and page untouched.
    pub fn settle(&mut self) {
        self.phase = if self.active_query.is_some() {
            SessionPhase::QueryActive
        } else {
            SessionPhase::Idle
        };
        self.touch();
    }

    /// Clears all query state and returns to idle.
    ///
    /// History survives the reset; only the active query, its report,
    /// the filter, and the page cursor are dropped.
    pub fn reset(&mut self) {
        self.active_query = None;
        self.report = None;
        self.filter = FilterCriteria::default();
        self.paginator.reset();
        self.phase = SessionPhase::Idle;
        self.touch();
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Refinement operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Replaces the active filter and resets pagination.
    ///
    /// Does not touch the raw report; no re-fetch happens.
    ///
    /// # Errors
    ///
    /// - `NoActiveQuery` if no query is active
    /// - `InvalidState` if another operation is mid-flight
    pub fn apply_filter(&mut self, criteria: FilterCriteria) -> Result<(), SessionError> {
        self.require_query()?;
        self.enter(SessionPhase::Filtering)?;
        self.filter = criteria;
        self.paginator.reset();
        self.phase = SessionPhase::QueryActive;
        self.touch();
        Ok(())
    }

    /// Moves the page cursor and returns the resulting page.
    ///
    /// # Errors
    ///
    /// - `NoActiveQuery` if no query is active
    /// - `InvalidState` if another operation is mid-flight
    pub fn paginate(
        &mut self,
        direction: PageDirection,
        today: NaiveDate,
    ) -> Result<PageView, SessionError> {
        self.require_query()?;
        self.enter(SessionPhase::Paginating)?;
        let filtered = self.filtered_view(today);
        match direction {
            PageDirection::First => self.paginator.go_to_first(),
            PageDirection::Next => self.paginator.next(filtered.len()),
            PageDirection::Previous => self.paginator.previous(),
        }
        let view = self.page_view_of(filtered);
        self.phase = SessionPhase::QueryActive;
        self.touch();
        Ok(view)
    }

    /// Forecasts future prices from the raw transactions.
    ///
    /// The filter does not apply here; trends are computed over the
    /// full report.
    ///
    /// # Errors
    ///
    /// - `NoActiveQuery` if no query is active
    /// - `InvalidState` if another operation is mid-flight
    /// - `InvalidHorizon` / `InsufficientData` from the analyzer
    pub fn forecast(&mut self, horizon: u32) -> Result<TrendForecast, SessionError> {
        self.require_query()?;
        self.enter(SessionPhase::Forecasting)?;
        let result = match &self.report {
            Some(report) => TrendAnalyzer::forecast(&report.transactions, horizon),
            None => Err(TrendError::InsufficientData {
                required: MIN_TREND_PERIODS,
                actual: 0,
            }),
        };
        self.phase = SessionPhase::QueryActive;
        self.touch();
        result.map_err(SessionError::from)
    }

    /// Returns past queries, most recent first.
    pub fn history_snapshot(&self) -> Vec<VehicleQuery> {
        self.history.snapshot()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Views
    // ─────────────────────────────────────────────────────────────────────────

    /// Returns the raw transactions with the active filter applied.
    pub fn filtered_view(&self, today: NaiveDate) -> Vec<TransactionRecord> {
        match &self.report {
            Some(report) => FilterEngine::apply(&report.transactions, &self.filter, today),
            None => Vec::new(),
        }
    }

    /// Returns the current page of the filtered view without moving
    /// the cursor.
    pub fn current_page(&self, today: NaiveDate) -> PageView {
        self.page_view_of(self.filtered_view(today))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Private helpers
    // ─────────────────────────────────────────────────────────────────────────

    fn page_view_of(&self, filtered: Vec<TransactionRecord>) -> PageView {
        let total_items = filtered.len();
        let page_count = self.paginator.page_count(total_items);
        let page_index = self.paginator.current_page();
        let items = self.paginator.page_of(&filtered).to_vec();
        PageView {
            page_index,
            page_count,
            total_items,
            start_index: page_index * self.paginator.page_size(),
            items,
        }
    }

    fn require_query(&self) -> Result<(), SessionError> {
        if self.active_query.is_some() {
            Ok(())
        } else {
            Err(SessionError::NoActiveQuery)
        }
    }

    fn enter(&mut self, phase: SessionPhase) -> Result<(), SessionError> {
        self.phase
            .transition_to(phase)
            .map_err(|e| SessionError::invalid_state(e.to_string()))?;
        self.phase = phase;
        Ok(())
    }

    fn touch(&mut self) {
        self.last_activity = Timestamp::now();
    }
}
