//! Sale region value object.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ValidationError;

/// Auction sale region, one of the five Manheim market regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Region {
    #[serde(rename = "NE")]
    Northeast,
    #[serde(rename = "SE")]
    Southeast,
    #[serde(rename = "MW")]
    Midwest,
    #[serde(rename = "SW")]
    Southwest,
    #[serde(rename = "W")]
    West,
}

impl Region {
    /// All regions in display order.
    pub const ALL: [Region; 5] = [
        Region::Northeast,
        Region::Southeast,
        Region::Midwest,
        Region::Southwest,
        Region::West,
    ];

    /// Returns the two-letter wire code (W is a single letter).
    pub fn code(&self) -> &'static str {
        match self {
            Region::Northeast => "NE",
            Region::Southeast => "SE",
            Region::Midwest => "MW",
            Region::Southwest => "SW",
            Region::West => "W",
        }
    }

    /// Returns the display label.
    pub fn label(&self) -> &'static str {
        match self {
            Region::Northeast => "Northeast",
            Region::Southeast => "Southeast",
            Region::Midwest => "Midwest",
            Region::Southwest => "Southwest",
            Region::West => "West",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Region {
    type Err = ValidationError;

    /// Parses a region code, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "NE" => Ok(Region::Northeast),
            "SE" => Ok(Region::Southeast),
            "MW" => Ok(Region::Midwest),
            "SW" => Ok(Region::Southwest),
            "W" => Ok(Region::West),
            _ => Err(ValidationError::invalid_format(
                "region",
                format!("unknown region code '{}'", s),
            )),
        }
    }
}
