//! Refinement parameter types.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{Grade, Mileage, Region};

/// One validated refinement action, tagged by the field it narrows.
#[derive(Debug, Clone, PartialEq)]
pub enum RefineField {
    Color(String),
    Grade(Grade),
    Odometer(Mileage),
    Region(Region),
    SaleDate(NaiveDate),
}

impl RefineField {
    /// Canonical field name, as accepted in `key=value` refinement input.
    pub fn key(&self) -> &'static str {
        match self {
            RefineField::Color(_) => "color",
            RefineField::Grade(_) => "grade",
            RefineField::Odometer(_) => "odometer",
            RefineField::Region(_) => "region",
            RefineField::SaleDate(_) => "date",
        }
    }
}

/// Accumulated refinement parameters attached to a vehicle query.
///
/// Each field is independent; absent fields leave the query unconstrained
/// on that dimension. Two parameter sets compare equal only when every
/// field matches, which is what makes the query signature comparison in
/// the session layer work.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RefinementParameters {
    pub color: Option<String>,
    pub grade: Option<Grade>,
    pub odometer: Option<Mileage>,
    pub region: Option<Region>,
    pub sale_date: Option<NaiveDate>,
}

impl RefinementParameters {
    /// Returns true when no field is set.
    pub fn is_empty(&self) -> bool {
        self.color.is_none()
            && self.grade.is_none()
            && self.odometer.is_none()
            && self.region.is_none()
            && self.sale_date.is_none()
    }

    /// Merges one validated field into the set, replacing any prior value
    /// for that field.
    pub fn apply(&mut self, field: RefineField) {
        match field {
            RefineField::Color(color) => self.color = Some(color),
            RefineField::Grade(grade) => self.grade = Some(grade),
            RefineField::Odometer(odometer) => self.odometer = Some(odometer),
            RefineField::Region(region) => self.region = Some(region),
            RefineField::SaleDate(date) => self.sale_date = Some(date),
        }
    }

    /// Canonical `(key, value)` pairs for the fields that are set, in
    /// declaration order. Used both for provider query strings and for
    /// echoing the active parameters back to the user.
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(color) = &self.color {
            pairs.push(("color", color.clone()));
        }
        if let Some(grade) = &self.grade {
            pairs.push(("grade", grade.to_string()));
        }
        if let Some(odometer) = &self.odometer {
            pairs.push(("odometer", odometer.miles().to_string()));
        }
        if let Some(region) = &self.region {
            pairs.push(("region", region.code().to_string()));
        }
        if let Some(date) = &self.sale_date {
            pairs.push(("date", date.format("%Y-%m-%d").to_string()));
        }
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_parameters_are_empty() {
        assert!(RefinementParameters::default().is_empty());
    }

    #[test]
    fn apply_sets_the_targeted_field() {
        let mut params = RefinementParameters::default();
        params.apply(RefineField::Region(Region::Northeast));

        assert!(!params.is_empty());
        assert_eq!(params.region, Some(Region::Northeast));
        assert!(params.color.is_none());
    }

    #[test]
    fn apply_replaces_prior_value_for_same_field() {
        let mut params = RefinementParameters::default();
        params.apply(RefineField::Grade(Grade::try_new(3.0).unwrap()));
        params.apply(RefineField::Grade(Grade::try_new(4.5).unwrap()));

        assert_eq!(params.grade, Some(Grade::try_new(4.5).unwrap()));
    }

    #[test]
    fn to_query_pairs_emits_only_set_fields() {
        let mut params = RefinementParameters::default();
        params.apply(RefineField::Color("WHITE".to_string()));
        params.apply(RefineField::Odometer(Mileage::new(20_000)));

        let pairs = params.to_query_pairs();
        assert_eq!(
            pairs,
            vec![
                ("color", "WHITE".to_string()),
                ("odometer", "20000".to_string()),
            ]
        );
    }

    #[test]
    fn to_query_pairs_formats_grade_region_and_date() {
        let mut params = RefinementParameters::default();
        params.apply(RefineField::Grade(Grade::try_new(4.0).unwrap()));
        params.apply(RefineField::Region(Region::West));
        params.apply(RefineField::SaleDate(
            NaiveDate::from_ymd_opt(2023, 6, 1).unwrap(),
        ));

        let pairs = params.to_query_pairs();
        assert_eq!(
            pairs,
            vec![
                ("grade", "4.0".to_string()),
                ("region", "W".to_string()),
                ("date", "2023-06-01".to_string()),
            ]
        );
    }

    #[test]
    fn parameter_sets_with_same_fields_compare_equal() {
        let mut a = RefinementParameters::default();
        a.apply(RefineField::Region(Region::Northeast));
        let mut b = RefinementParameters::default();
        b.apply(RefineField::Region(Region::Northeast));

        assert_eq!(a, b);

        b.apply(RefineField::Color("BLUE".to_string()));
        assert_ne!(a, b);
    }

    #[test]
    fn refine_field_key_names_match_input_keys() {
        assert_eq!(RefineField::Color("WHITE".to_string()).key(), "color");
        assert_eq!(
            RefineField::SaleDate(NaiveDate::from_ymd_opt(2023, 1, 1).unwrap()).key(),
            "date"
        );
    }
}
