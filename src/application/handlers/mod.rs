//! Application handlers.
//!
//! Command and query handlers that orchestrate session operations.

mod apply_filter;
mod get_history;
mod paginate;
mod refine_field;
mod request_forecast;
mod start_query;

pub use apply_filter::{ApplyFilterCommand, ApplyFilterHandler, ApplyFilterResult};
pub use get_history::{GetHistoryHandler, GetHistoryQuery, GetHistoryResult};
pub use paginate::{PaginateCommand, PaginateHandler, PaginateResult};
pub use refine_field::{RefineFieldCommand, RefineFieldHandler, RefineFieldResult};
pub use request_forecast::{
    RequestForecastCommand, RequestForecastHandler, RequestForecastResult,
};
pub use start_query::{StartQueryCommand, StartQueryHandler, StartQueryResult};
