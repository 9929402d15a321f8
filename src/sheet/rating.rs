//! Die ratings
//!
//! Every trait on the sheet is rated with a die size. Stored values that are
//! missing or unrecognised fall back to the default of the component they
//! belong to rather than failing the whole record.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SheetError;

/// A die size used as a trait rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DieRating {
    D4,
    D6,
    D8,
    D10,
    D12,
}

impl DieRating {
    /// All ratings from weakest to strongest.
    pub const ALL: [DieRating; 5] = [
        DieRating::D4,
        DieRating::D6,
        DieRating::D8,
        DieRating::D10,
        DieRating::D12,
    ];

    /// Default rating for distinctions and values.
    pub const TRAIT_DEFAULT: DieRating = DieRating::D8;

    /// Default rating for approaches and roles.
    pub const SKILL_DEFAULT: DieRating = DieRating::D6;

    /// Number of faces on the die.
    pub fn sides(self) -> u8 {
        match self {
            DieRating::D4 => 4,
            DieRating::D6 => 6,
            DieRating::D8 => 8,
            DieRating::D10 => 10,
            DieRating::D12 => 12,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DieRating::D4 => "d4",
            DieRating::D6 => "d6",
            DieRating::D8 => "d8",
            DieRating::D10 => "d10",
            DieRating::D12 => "d12",
        }
    }

    /// Parse a stored rating, falling back to `default` for anything unknown.
    pub fn parse_or(value: &str, default: DieRating) -> DieRating {
        value.parse().unwrap_or(default)
    }
}

impl FromStr for DieRating {
    type Err = SheetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "d4" => Ok(DieRating::D4),
            "d6" => Ok(DieRating::D6),
            "d8" => Ok(DieRating::D8),
            "d10" => Ok(DieRating::D10),
            "d12" => Ok(DieRating::D12),
            _ => Err(SheetError::InvalidRating {
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for DieRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
