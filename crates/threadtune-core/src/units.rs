//! Unit conversion utilities
//!
//! Thread parameters are entered in millimeters or inches. The modeling
//! kernel works in centimeters, so every linear value is scaled by
//! [`LengthUnit::kernel_scale`] before it enters the geometry pipeline.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Millimeters per inch.
pub const MM_PER_INCH: f64 = 25.4;

/// Unit of the user-facing linear parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LengthUnit {
    /// Metric (mm)
    Millimeter,
    /// English (inch)
    Inch,
}

impl Default for LengthUnit {
    fn default() -> Self {
        Self::Millimeter
    }
}

impl LengthUnit {
    /// Factor converting a value in this unit into kernel centimeters.
    pub fn kernel_scale(self) -> f64 {
        match self {
            Self::Millimeter => 0.1,
            Self::Inch => 2.54,
        }
    }

    /// Convert a user value into kernel units.
    pub fn to_kernel(self, value: f64) -> f64 {
        value * self.kernel_scale()
    }

    /// Convert a kernel value back into this unit.
    pub fn from_kernel(self, value: f64) -> f64 {
        value / self.kernel_scale()
    }

    /// Convert a value in this unit to millimeters.
    pub fn to_mm(self, value: f64) -> f64 {
        match self {
            Self::Millimeter => value,
            Self::Inch => value * MM_PER_INCH,
        }
    }

    /// Short suffix used in body names and messages.
    pub fn suffix(self) -> &'static str {
        match self {
            Self::Millimeter => "mm",
            Self::Inch => "in",
        }
    }
}

impl fmt::Display for LengthUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Millimeter => write!(f, "Metric"),
            Self::Inch => write!(f, "English"),
        }
    }
}

impl FromStr for LengthUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "m" | "mm" | "metric" => Ok(Self::Millimeter),
            "e" | "in" | "inch" | "english" | "imperial" => Ok(Self::Inch),
            _ => Err(format!("Unknown length unit: {}", s)),
        }
    }
}
