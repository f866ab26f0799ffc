//! Distance units and their conversion factors relative to kilometers.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Unit a distance is reported in. The wire tokens are the variant names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Unit {
    /// Meters.
    M,
    /// Statute miles.
    MI,
    /// Kilometers.
    #[default]
    KM,
}

impl Unit {
    pub const ALL: [Unit; 3] = [Unit::M, Unit::MI, Unit::KM];

    /// Multiplier that turns a kilometer value into this unit.
    pub fn conversion_factor(self) -> Decimal {
        match self {
            Self::M => Decimal::new(1000, 0),
            Self::MI => Decimal::new(62137, 5),
            Self::KM => Decimal::ONE,
        }
    }

    pub fn convert(self, kilometers: Decimal) -> Decimal {
        kilometers * self.conversion_factor()
    }

    pub fn token(self) -> &'static str {
        match self {
            Self::M => "M",
            Self::MI => "MI",
            Self::KM => "KM",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// A unit token that is not one of `M`, `MI` or `KM`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown unit '{0}'. Use 'M', 'MI' or 'KM'.")]
pub struct UnknownUnit(pub String);

impl FromStr for Unit {
    type Err = UnknownUnit;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "M" => Ok(Self::M),
            "MI" => Ok(Self::MI),
            "KM" => Ok(Self::KM),
            other => Err(UnknownUnit(other.to_string())),
        }
    }
}
