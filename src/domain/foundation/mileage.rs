//! Odometer mileage value object.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ValidationError;

/// Odometer reading in miles. Never negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Mileage(u32);

impl Mileage {
    /// Creates a new Mileage.
    pub fn new(miles: u32) -> Self {
        Self(miles)
    }

    /// Creates a Mileage from a signed integer, returning error if negative
    /// or beyond the representable range.
    pub fn try_from_i64(value: i64) -> Result<Self, ValidationError> {
        if value < 0 || value > u32::MAX as i64 {
            return Err(ValidationError::out_of_range(
                "odometer",
                0.0,
                u32::MAX as f64,
                value as f64,
            ));
        }
        Ok(Self(value as u32))
    }

    /// Returns the value in miles.
    pub fn miles(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for Mileage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} mi", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mileage_try_from_i64_accepts_non_negative() {
        assert_eq!(Mileage::try_from_i64(0).unwrap().miles(), 0);
        assert_eq!(Mileage::try_from_i64(68_500).unwrap().miles(), 68_500);
    }

    #[test]
    fn mileage_try_from_i64_rejects_negative() {
        let result = Mileage::try_from_i64(-1);
        assert!(result.is_err());
        match result {
            Err(ValidationError::OutOfRange { field, .. }) => assert_eq!(field, "odometer"),
            _ => panic!("Expected OutOfRange error"),
        }
    }

    #[test]
    fn mileage_try_from_i64_rejects_overflow() {
        assert!(Mileage::try_from_i64(u32::MAX as i64 + 1).is_err());
    }

    #[test]
    fn mileage_displays_with_unit() {
        assert_eq!(format!("{}", Mileage::new(42_000)), "42000 mi");
    }

    #[test]
    fn mileage_ordering_works() {
        assert!(Mileage::new(10_000) < Mileage::new(50_000));
    }

    #[test]
    fn mileage_serializes_to_json() {
        let json = serde_json::to_string(&Mileage::new(68_500)).unwrap();
        assert_eq!(json, "68500");
    }
}
