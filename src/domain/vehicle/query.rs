//! Vehicle query identity.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::ValidationError;
use crate::domain::refine::{RefineField, RefinementParameters};

use super::Vin;

/// Lookup identifier for a valuation: either a specific VIN or a
/// coarser year/make/model triple.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LookupKey {
    Vin {
        vin: Vin,
        subseries: Option<String>,
        transmission: Option<String>,
    },
    YearMakeModel {
        year: u16,
        make: String,
        model: String,
        trim: Option<String>,
    },
}

impl LookupKey {
    /// Creates a VIN lookup key.
    ///
    /// A transmission qualifier is only meaningful under a subseries, so
    /// supplying one without the other is rejected.
    pub fn for_vin(
        vin: Vin,
        subseries: Option<String>,
        transmission: Option<String>,
    ) -> Result<Self, ValidationError> {
        if transmission.is_some() && subseries.is_none() {
            return Err(ValidationError::invalid_format(
                "transmission",
                "requires a subseries to be specified",
            ));
        }
        Ok(LookupKey::Vin {
            vin,
            subseries,
            transmission,
        })
    }

    /// Creates a year/make/model lookup key.
    pub fn for_ymm(
        year: u16,
        make: impl Into<String>,
        model: impl Into<String>,
        trim: Option<String>,
    ) -> Result<Self, ValidationError> {
        if !(1900..=2100).contains(&year) {
            return Err(ValidationError::out_of_range(
                "year",
                1900.0,
                2100.0,
                year as f64,
            ));
        }
        let make = make.into();
        if make.trim().is_empty() {
            return Err(ValidationError::empty_field("make"));
        }
        let model = model.into();
        if model.trim().is_empty() {
            return Err(ValidationError::empty_field("model"));
        }
        Ok(LookupKey::YearMakeModel {
            year,
            make,
            model,
            trim,
        })
    }
}

impl fmt::Display for LookupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LookupKey::Vin {
                vin,
                subseries,
                transmission,
            } => {
                write!(f, "VIN {}", vin)?;
                if let Some(subseries) = subseries {
                    write!(f, " {}", subseries)?;
                }
                if let Some(transmission) = transmission {
                    write!(f, " {}", transmission)?;
                }
                Ok(())
            }
            LookupKey::YearMakeModel {
                year,
                make,
                model,
                trim,
            } => {
                write!(f, "{} {} {}", year, make, model)?;
                if let Some(trim) = trim {
                    write!(f, " {}", trim)?;
                }
                Ok(())
            }
        }
    }
}

/// A complete query signature: lookup key plus accumulated refinement
/// parameters.
///
/// Equality over the whole signature decides whether a new lookup can
/// reuse the cached provider response or must re-fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleQuery {
    key: LookupKey,
    params: RefinementParameters,
}

impl VehicleQuery {
    /// Creates a query with no refinement parameters.
    pub fn new(key: LookupKey) -> Self {
        Self {
            key,
            params: RefinementParameters::default(),
        }
    }

    /// Creates a query with an initial parameter set.
    pub fn with_params(key: LookupKey, params: RefinementParameters) -> Self {
        Self { key, params }
    }

    /// Returns the lookup key.
    pub fn key(&self) -> &LookupKey {
        &self.key
    }

    /// Returns the refinement parameters.
    pub fn params(&self) -> &RefinementParameters {
        &self.params
    }

    /// Returns a new query with one refinement field merged in. The
    /// original query is left untouched so it can move into history.
    pub fn refined(&self, field: RefineField) -> Self {
        let mut params = self.params.clone();
        params.apply(field);
        Self {
            key: self.key.clone(),
            params,
        }
    }
}

impl fmt::Display for VehicleQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key)?;
        let pairs = self.params.to_query_pairs();
        if !pairs.is_empty() {
            let rendered: Vec<String> =
                pairs.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
            write!(f, " [{}]", rendered.join(" "))?;
        }
        Ok(())
    }
}
