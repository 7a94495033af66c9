//! Refinement input validation.

use chrono::NaiveDate;
use once_cell::sync::Lazy;

use crate::domain::foundation::{Grade, Mileage, Region, ValidationError};

use super::RefineField;

/// Oldest sale date the valuation provider carries transaction data for.
/// Refinement dates must be strictly after this.
pub static EARLIEST_SALE_DATE: Lazy<NaiveDate> =
    Lazy::new(|| NaiveDate::from_ymd_opt(2018, 10, 8).unwrap());

/// Validates raw `key=value` refinement input into typed fields.
///
/// Pure: no side effects, no clock access. The caller supplies `today`
/// so that future-date rejection is decided at one place.
pub struct ParameterValidator;

impl ParameterValidator {
    /// Validates a single refinement field.
    ///
    /// Keys are matched case-insensitively; unknown keys are rejected so
    /// that user typos surface immediately instead of being dropped.
    pub fn validate(key: &str, value: &str, today: NaiveDate) -> Result<RefineField, ValidationError> {
        match key.to_ascii_lowercase().as_str() {
            "color" => Self::validate_color(value),
            "grade" => Self::validate_grade(value),
            "odometer" => Self::validate_odometer(value),
            "region" => Self::validate_region(value),
            "date" => Self::validate_date(value, today),
            _ => Err(ValidationError::invalid_format(
                key,
                "unknown refinement field (expected color, grade, odometer, region, or date)",
            )),
        }
    }

    fn validate_color(value: &str) -> Result<RefineField, ValidationError> {
        let color = value.trim().to_ascii_uppercase();
        if color.is_empty() {
            return Err(ValidationError::empty_field("color"));
        }
        Ok(RefineField::Color(color))
    }

    fn validate_grade(value: &str) -> Result<RefineField, ValidationError> {
        let parsed: f64 = value.trim().parse().map_err(|_| {
            ValidationError::invalid_format("grade", "expected a decimal number")
        })?;
        Ok(RefineField::Grade(Grade::try_new(parsed)?))
    }

    fn validate_odometer(value: &str) -> Result<RefineField, ValidationError> {
        let parsed: i64 = value.trim().parse().map_err(|_| {
            ValidationError::invalid_format("odometer", "expected a whole number of miles")
        })?;
        Ok(RefineField::Odometer(Mileage::try_from_i64(parsed)?))
    }

    fn validate_region(value: &str) -> Result<RefineField, ValidationError> {
        Ok(RefineField::Region(value.trim().parse()?))
    }

    fn validate_date(value: &str, today: NaiveDate) -> Result<RefineField, ValidationError> {
        let date = NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
            ValidationError::invalid_format("date", "expected YYYY-MM-DD")
        })?;
        if date <= *EARLIEST_SALE_DATE {
            return Err(ValidationError::invalid_format(
                "date",
                format!("must be after {}", EARLIEST_SALE_DATE.format("%Y-%m-%d")),
            ));
        }
        if date > today {
            return Err(ValidationError::invalid_format(
                "date",
                "cannot be in the future",
            ));
        }
        Ok(RefineField::SaleDate(date))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()
    }

    #[test]
    fn validate_color_normalizes_to_uppercase() {
        let field = ParameterValidator::validate("color", "white", today()).unwrap();
        assert_eq!(field, RefineField::Color("WHITE".to_string()));
    }

    #[test]
    fn validate_color_rejects_empty_value() {
        let result = ParameterValidator::validate("color", "  ", today());
        match result {
            Err(ValidationError::EmptyField { field }) => assert_eq!(field, "color"),
            _ => panic!("Expected EmptyField error"),
        }
    }

    #[test]
    fn validate_grade_accepts_boundaries() {
        assert!(ParameterValidator::validate("grade", "0.0", today()).is_ok());
        assert!(ParameterValidator::validate("grade", "5.0", today()).is_ok());
    }

    #[test]
    fn validate_grade_rejects_out_of_range() {
        assert!(ParameterValidator::validate("grade", "5.1", today()).is_err());
        assert!(ParameterValidator::validate("grade", "-1", today()).is_err());
    }

    #[test]
    fn validate_grade_rejects_non_numeric() {
        let result = ParameterValidator::validate("grade", "mint", today());
        match result {
            Err(ValidationError::InvalidFormat { field, .. }) => assert_eq!(field, "grade"),
            _ => panic!("Expected InvalidFormat error"),
        }
    }

    #[test]
    fn validate_odometer_accepts_zero() {
        let field = ParameterValidator::validate("odometer", "0", today()).unwrap();
        assert_eq!(field, RefineField::Odometer(Mileage::new(0)));
    }

    #[test]
    fn validate_odometer_rejects_negative() {
        assert!(ParameterValidator::validate("odometer", "-100", today()).is_err());
    }

    #[test]
    fn validate_region_is_case_insensitive_and_normalizes() {
        let field = ParameterValidator::validate("region", "ne", today()).unwrap();
        assert_eq!(field, RefineField::Region(Region::Northeast));
    }

    #[test]
    fn validate_region_rejects_unknown_code() {
        assert!(ParameterValidator::validate("region", "EU", today()).is_err());
    }

    #[test]
    fn validate_date_rejects_the_cutoff_itself() {
        assert!(ParameterValidator::validate("date", "2018-10-08", today()).is_err());
    }

    #[test]
    fn validate_date_accepts_day_after_cutoff() {
        let field = ParameterValidator::validate("date", "2018-10-09", today()).unwrap();
        assert_eq!(
            field,
            RefineField::SaleDate(NaiveDate::from_ymd_opt(2018, 10, 9).unwrap())
        );
    }

    #[test]
    fn validate_date_rejects_future_dates() {
        assert!(ParameterValidator::validate("date", "2025-06-16", today()).is_err());
    }

    #[test]
    fn validate_date_accepts_today() {
        assert!(ParameterValidator::validate("date", "2025-06-15", today()).is_ok());
    }

    #[test]
    fn validate_date_rejects_malformed_input() {
        assert!(ParameterValidator::validate("date", "06/15/2024", today()).is_err());
    }

    #[test]
    fn validate_rejects_unknown_keys() {
        let result = ParameterValidator::validate("colr", "WHITE", today());
        match result {
            Err(ValidationError::InvalidFormat { field, .. }) => assert_eq!(field, "colr"),
            _ => panic!("Expected InvalidFormat error"),
        }
    }

    #[test]
    fn validate_matches_keys_case_insensitively() {
        assert!(ParameterValidator::validate("Grade", "4.0", today()).is_ok());
        assert!(ParameterValidator::validate("REGION", "SW", today()).is_ok());
    }
}
