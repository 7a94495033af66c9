//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Every user action maps to exactly one handler; the registry owns the
//! session table the handlers operate on.

pub mod handlers;
pub mod registry;

pub use handlers::{
    ApplyFilterCommand, ApplyFilterHandler, ApplyFilterResult,
    GetHistoryHandler, GetHistoryQuery, GetHistoryResult,
    PaginateCommand, PaginateHandler, PaginateResult,
    RefineFieldCommand, RefineFieldHandler, RefineFieldResult,
    RequestForecastCommand, RequestForecastHandler, RequestForecastResult,
    StartQueryCommand, StartQueryHandler, StartQueryResult,
};
pub use registry::{SessionCell, SessionRegistry};
