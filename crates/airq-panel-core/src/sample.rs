//! Raw fixed-point sensor samples and their physical units.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Physical unit attached to a sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitTag {
    /// Relative humidity, percent.
    Percent,
    /// Degrees Celsius.
    Celsius,
    /// Pascal.
    Pascal,
    /// Grams per cubic meter.
    #[serde(rename = "gpm3")]
    GramsPerCubicMeter,
    /// Any unit the panel has no policy for.
    #[default]
    Other,
}

impl UnitTag {
    /// Returns the suffix shown after a value in a label.
    pub fn suffix(&self) -> &'static str {
        match self {
            UnitTag::Percent => "%",
            UnitTag::Celsius => "C",
            UnitTag::Pascal => "Pa",
            UnitTag::GramsPerCubicMeter => "g/m^3",
            UnitTag::Other => "",
        }
    }
}

impl FromStr for UnitTag {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "percent" | "%" => Ok(UnitTag::Percent),
            "celsius" | "c" => Ok(UnitTag::Celsius),
            "pascal" | "pa" => Ok(UnitTag::Pascal),
            "gpm3" | "g/m^3" | "g/m3" => Ok(UnitTag::GramsPerCubicMeter),
            "other" => Ok(UnitTag::Other),
            _ => Err(Error::InvalidUnit(s.to_string())),
        }
    }
}

impl std::fmt::Display for UnitTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnitTag::Percent => write!(f, "percent"),
            UnitTag::Celsius => write!(f, "celsius"),
            UnitTag::Pascal => write!(f, "pascal"),
            UnitTag::GramsPerCubicMeter => write!(f, "gpm3"),
            UnitTag::Other => write!(f, "other"),
        }
    }
}

/// One sensor reading: `mantissa × 10^scale` in `unit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawSample {
    pub mantissa: i32,
    pub scale: i8,
    pub unit: UnitTag,
}

impl RawSample {
    /// Creates a new sample.
    pub const fn new(mantissa: i32, scale: i8, unit: UnitTag) -> Self {
        Self {
            mantissa,
            scale,
            unit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_suffix() {
        assert_eq!(UnitTag::Percent.suffix(), "%");
        assert_eq!(UnitTag::Celsius.suffix(), "C");
        assert_eq!(UnitTag::Pascal.suffix(), "Pa");
        assert_eq!(UnitTag::GramsPerCubicMeter.suffix(), "g/m^3");
        assert_eq!(UnitTag::Other.suffix(), "");
    }

    #[test]
    fn test_unit_from_str() {
        assert_eq!("percent".parse::<UnitTag>().unwrap(), UnitTag::Percent);
        assert_eq!("Pa".parse::<UnitTag>().unwrap(), UnitTag::Pascal);
        assert_eq!(
            "gpm3".parse::<UnitTag>().unwrap(),
            UnitTag::GramsPerCubicMeter
        );
        assert!("kelvin".parse::<UnitTag>().is_err());
    }

    #[test]
    fn test_unit_display_parses_back() {
        for unit in [
            UnitTag::Percent,
            UnitTag::Celsius,
            UnitTag::Pascal,
            UnitTag::GramsPerCubicMeter,
            UnitTag::Other,
        ] {
            assert_eq!(unit.to_string().parse::<UnitTag>().unwrap(), unit);
        }
    }
}
