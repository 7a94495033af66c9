//! VIN value object.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::ValidationError;

/// Length of a post-1981 Vehicle Identification Number.
pub const VIN_LENGTH: usize = 17;

/// Vehicle Identification Number, normalized to upper-case.
///
/// # Invariants
///
/// - Exactly 17 ASCII alphanumeric characters
/// - Never contains I, O, or Q (excluded from the VIN alphabet)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Vin(String);

impl Vin {
    /// Creates a Vin, returning error if the input is not a valid VIN.
    pub fn new(raw: impl Into<String>) -> Result<Self, ValidationError> {
        let normalized = raw.into().trim().to_ascii_uppercase();
        if normalized.is_empty() {
            return Err(ValidationError::empty_field("vin"));
        }
        if normalized.len() != VIN_LENGTH {
            return Err(ValidationError::invalid_format(
                "vin",
                format!("expected {} characters, got {}", VIN_LENGTH, normalized.len()),
            ));
        }
        if let Some(bad) = normalized
            .chars()
            .find(|c| !c.is_ascii_alphanumeric() || matches!(c, 'I' | 'O' | 'Q'))
        {
            return Err(ValidationError::invalid_format(
                "vin",
                format!("character '{}' is not allowed", bad),
            ));
        }
        Ok(Self(normalized))
    }

    /// Returns the inner string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Vin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Vin {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}
