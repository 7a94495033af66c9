//! Condition grade value object (0.0-5.0 scale).

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ValidationError;

/// Auction condition grade: 0.0 (inoperable) to 5.0 (like new).
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Grade(f64);

impl Grade {
    /// Lowest assignable grade.
    pub const MIN: Self = Self(0.0);

    /// Highest assignable grade.
    pub const MAX: Self = Self(5.0);

    /// Creates a Grade, returning error if out of range or not finite.
    pub fn try_new(value: f64) -> Result<Self, ValidationError> {
        if !(0.0..=5.0).contains(&value) {
            return Err(ValidationError::out_of_range("grade", 0.0, 5.0, value));
        }
        Ok(Self(value))
    }

    /// Returns the value as f64.
    pub fn value(&self) -> f64 {
        self.0
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grade_try_new_accepts_valid_values() {
        assert!(Grade::try_new(0.0).is_ok());
        assert!(Grade::try_new(2.5).is_ok());
        assert!(Grade::try_new(5.0).is_ok());
    }

    #[test]
    fn grade_try_new_rejects_out_of_range() {
        let result = Grade::try_new(5.5);
        assert!(result.is_err());
        match result {
            Err(ValidationError::OutOfRange { field, min, max, actual }) => {
                assert_eq!(field, "grade");
                assert_eq!(min, 0.0);
                assert_eq!(max, 5.0);
                assert_eq!(actual, 5.5);
            }
            _ => panic!("Expected OutOfRange error"),
        }
        assert!(Grade::try_new(-0.1).is_err());
    }

    #[test]
    fn grade_try_new_rejects_nan() {
        assert!(Grade::try_new(f64::NAN).is_err());
    }

    #[test]
    fn grade_displays_with_one_decimal() {
        assert_eq!(format!("{}", Grade::try_new(4.0).unwrap()), "4.0");
        assert_eq!(format!("{}", Grade::try_new(3.25).unwrap()), "3.2");
    }

    #[test]
    fn grade_ordering_works() {
        let g1 = Grade::try_new(2.5).unwrap();
        let g2 = Grade::try_new(4.0).unwrap();
        assert!(g1 < g2);
        assert!(g2 > g1);
    }

    #[test]
    fn grade_serializes_to_json() {
        let grade = Grade::try_new(4.2).unwrap();
        let json = serde_json::to_string(&grade).unwrap();
        assert_eq!(json, "4.2");
    }

    #[test]
    fn grade_deserializes_from_json() {
        let grade: Grade = serde_json::from_str("3.5").unwrap();
        assert_eq!(grade.value(), 3.5);
    }
}
