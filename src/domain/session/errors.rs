//! Session-specific error types.

use crate::domain::foundation::{ErrorCode, ValidationError};
use crate::domain::trend::TrendError;
use crate::ports::ValuationError;

/// Session-specific errors.
#[derive(Debug, Clone)]
pub enum SessionError {
    /// Input failed validation.
    Validation(ValidationError),
    /// Operation requires an active query.
    NoActiveQuery,
    /// Valuation fetch failed.
    Fetch(ValuationError),
    /// Trend forecasting failed.
    Trend(TrendError),
    /// Invalid state for operation.
    InvalidState(String),
    /// A newer fetch superseded this result.
    Stale,
    /// Infrastructure error.
    Internal(String),
}

impl SessionError {
    pub fn invalid_state(message: impl Into<String>) -> Self {
        SessionError::InvalidState(message.into())
    }
    pub fn internal(message: impl Into<String>) -> Self {
        SessionError::Internal(message.into())
    }
    pub fn code(&self) -> ErrorCode {
        match self {
            SessionError::Validation(e) => match e {
                ValidationError::EmptyField { .. } => ErrorCode::EmptyField,
                ValidationError::OutOfRange { .. } => ErrorCode::OutOfRange,
                ValidationError::InvalidFormat { .. } => ErrorCode::InvalidFormat,
            },
            SessionError::NoActiveQuery => ErrorCode::NoActiveQuery,
            SessionError::Fetch(e) => match e {
                ValuationError::Authentication => ErrorCode::AuthenticationFailed,
                ValuationError::RateLimited => ErrorCode::RateLimited,
                ValuationError::NotFound { .. } => ErrorCode::VehicleNotFound,
                ValuationError::Network(_) => ErrorCode::UpstreamUnavailable,
                ValuationError::Parse(_) => ErrorCode::MalformedResponse,
            },
            SessionError::Trend(e) => match e {
                TrendError::InvalidHorizon => ErrorCode::InvalidHorizon,
                TrendError::InsufficientData { .. } => ErrorCode::InsufficientData,
            },
            SessionError::InvalidState(_) => ErrorCode::InvalidStateTransition,
            SessionError::Stale => ErrorCode::StaleResult,
            SessionError::Internal(_) => ErrorCode::InternalError,
        }
    }
    /// User-facing description of the failure.
    pub fn message(&self) -> String {
        match self {
            SessionError::Validation(e) => e.to_string(),
            SessionError::NoActiveQuery => {
                "No active query. Look up a vehicle first.".to_string()
            }
            SessionError::Fetch(e) => match e {
                ValuationError::Authentication => {
                    "Could not authenticate with the valuation service.".to_string()
                }
                ValuationError::RateLimited => {
                    "The valuation service is throttling requests. Try again shortly.".to_string()
                }
                ValuationError::NotFound { query } => {
                    format!("No valuation data found for {}.", query)
                }
                ValuationError::Network(_) => {
                    "Could not reach the valuation service.".to_string()
                }
                ValuationError::Parse(_) => {
                    "The valuation service returned an unexpected response.".to_string()
                }
            },
            SessionError::Trend(e) => e.to_string(),
            SessionError::InvalidState(msg) => format!("Invalid state: {}", msg),
            SessionError::Stale => "Result superseded by a newer request".to_string(),
            SessionError::Internal(msg) => format!("Error: {}", msg),
        }
    }
    /// Fatal errors reset the session to idle.
    pub fn is_fatal(&self) -> bool {
        matches!(self, SessionError::Internal(_))
    }
    /// Silent errors are discarded without notifying the user.
    pub fn is_silent(&self) -> bool {
        matches!(self, SessionError::Stale)
    }
}

impl std::fmt::Display for SessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for SessionError {}

impl From<ValidationError> for SessionError {
    fn from(err: ValidationError) -> Self {
        SessionError::Validation(err)
    }
}

impl From<ValuationError> for SessionError {
    fn from(err: ValuationError) -> Self {
        SessionError::Fetch(err)
    }
}

impl From<TrendError> for SessionError {
    fn from(err: TrendError) -> Self {
        SessionError::Trend(err)
    }
}
