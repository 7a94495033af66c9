//! Session phase state machine.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::StateMachine;

/// Lifecycle phase of a valuation session.
///
/// `Idle` is the only initial phase. Each refinement-style operation
/// passes through its own transient phase and returns to `QueryActive`
/// when it completes; there are no nested operations. Sessions have no
/// terminal phase (idle reclamation removes the session outright), but
/// a fatal internal failure resets the phase to `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    #[default]
    Idle,
    QueryActive,
    Refining,
    Filtering,
    Paginating,
    Forecasting,
}

impl SessionPhase {
    /// Returns true once a query has been established.
    pub fn has_active_query(&self) -> bool {
        !matches!(self, SessionPhase::Idle)
    }
}

impl StateMachine for SessionPhase {
    fn can_transition_to(&self, target: &Self) -> bool {
        use SessionPhase::*;
        matches!(
            (self, target),
            // starting (or restarting) a query
            (Idle, QueryActive)
                | (QueryActive, QueryActive)
                // one operation at a time, each returning to QueryActive
                | (QueryActive, Refining)
                | (QueryActive, Filtering)
                | (QueryActive, Paginating)
                | (QueryActive, Forecasting)
                | (Refining, QueryActive)
                | (Filtering, QueryActive)
                | (Paginating, QueryActive)
                | (Forecasting, QueryActive)
                // fatal reset
                | (QueryActive, Idle)
                | (Refining, Idle)
                | (Filtering, Idle)
                | (Paginating, Idle)
                | (Forecasting, Idle)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use SessionPhase::*;
        match self {
            Idle => vec![QueryActive],
            QueryActive => vec![QueryActive, Refining, Filtering, Paginating, Forecasting, Idle],
            Refining | Filtering | Paginating | Forecasting => vec![QueryActive, Idle],
        }
    }
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SessionPhase::Idle => "Idle",
            SessionPhase::QueryActive => "QueryActive",
            SessionPhase::Refining => "Refining",
            SessionPhase::Filtering => "Filtering",
            SessionPhase::Paginating => "Paginating",
            SessionPhase::Forecasting => "Forecasting",
        };
        write!(f, "{}", s)
    }
}
