//! Unit handling for loop input
//!
//! The external CAD/PDF converter states its unit per loop set; everything
//! downstream of the normalizer works in decimal inches.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Millimeters per inch
pub const MM_PER_INCH: f64 = 25.4;

/// Source unit of a loop set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    /// Decimal inches
    In,
    /// Millimeters
    Mm,
}

impl Unit {
    /// Convert a value in this unit to inches
    pub fn to_inches(&self, value: f64) -> f64 {
        match self {
            Unit::In => value,
            Unit::Mm => value / MM_PER_INCH,
        }
    }

    /// Unit label as it appears on the wire ("in" or "mm")
    pub fn label(&self) -> &'static str {
        match self {
            Unit::In => "in",
            Unit::Mm => "mm",
        }
    }
}

impl Default for Unit {
    fn default() -> Self {
        Self::In
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for Unit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "in" | "inch" | "inches" => Ok(Self::In),
            "mm" | "millimeter" | "millimeters" => Ok(Self::Mm),
            _ => Err(format!("Unknown unit: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mm_conversion() {
        assert_eq!(Unit::Mm.to_inches(25.4), 1.0);
        assert_eq!(Unit::Mm.to_inches(12.7), 0.5);
        assert_eq!(Unit::In.to_inches(2.5), 2.5);
    }

    #[test]
    fn test_labels_round_trip() {
        assert_eq!(Unit::In.label(), "in");
        assert_eq!(Unit::Mm.label(), "mm");
        assert_eq!("mm".parse::<Unit>().unwrap(), Unit::Mm);
        assert_eq!("inches".parse::<Unit>().unwrap(), Unit::In);
        assert!("furlong".parse::<Unit>().is_err());
    }

    #[test]
    fn test_serde_wire_names() {
        assert_eq!(serde_json::to_string(&Unit::In).unwrap(), "\"in\"");
        assert_eq!(serde_json::from_str::<Unit>("\"mm\"").unwrap(), Unit::Mm);
    }
}
