//! Thread parameter record and its closed enumerations.
//!
//! A [`ThreadSpec`] holds every engineering input in user units. The geometry
//! crate only ever sees it through [`ThreadSpec::validate`] and
//! [`ThreadSpec::kernel_dims`].

use crate::error::{SpecError, SpecResult};
use crate::units::LengthUnit;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Flank angles must stay strictly inside this magnitude (degrees).
pub const MAX_FLANK_ANGLE: f64 = 90.0;

/// Minimum number of spline points per revolution.
pub const MIN_SPLINE_POINTS: u32 = 3;

/// How the sweep path is laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GuideMode {
    /// Full-length helix.
    Helix,
    /// Full-length helix swept as one continuous spline.
    LongHelix,
    /// One revolution swept, then patterned along the axis.
    Pattern,
}

impl GuideMode {
    /// Label used in generated body names.
    pub fn label(self) -> &'static str {
        match self {
            Self::Helix => "Helix",
            Self::LongHelix => "LongHelix",
            Self::Pattern => "Pattern",
        }
    }
}

impl fmt::Display for GuideMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Curve that steers the profile orientation during the sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GuideRail {
    /// Helix at the crest radius, following the path.
    #[default]
    OuterHelix,
    /// Vertical line on the thread axis. Only offered with [`GuideMode::Helix`].
    Centerline,
}

/// Thread handedness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Handedness {
    Right,
    Left,
}

impl Handedness {
    /// +1 for right-hand, -1 for left-hand threads.
    pub fn sign(self) -> f64 {
        match self {
            Self::Right => 1.0,
            Self::Left => -1.0,
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            Self::Right => Self::Left,
            Self::Left => Self::Right,
        }
    }

    /// Single-letter code used in body names.
    pub fn code(self) -> char {
        match self {
            Self::Right => 'R',
            Self::Left => 'L',
        }
    }
}

/// Number of thread starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StartCount {
    One,
    Two,
    Four,
}

impl StartCount {
    pub fn count(self) -> u32 {
        match self {
            Self::One => 1,
            Self::Two => 2,
            Self::Four => 4,
        }
    }

    /// Map a raw start count onto the supported set.
    pub fn from_count(count: u32) -> Option<Self> {
        match count {
            1 => Some(Self::One),
            2 => Some(Self::Two),
            4 => Some(Self::Four),
            _ => None,
        }
    }
}

/// Which half of a mating pair is being generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ThreadPass {
    /// Male thread (bolt).
    External,
    /// Female thread (nut), cut with clearance.
    Internal,
}

impl fmt::Display for ThreadPass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::External => write!(f, "external"),
            Self::Internal => write!(f, "internal"),
        }
    }
}

/// What the user asked to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ThreadSelection {
    /// External thread only.
    External,
    /// Internal thread cutter only.
    Internal,
    /// External thread with a bolt head.
    Bolt,
    /// Nut body with an internal thread.
    Nut,
    /// Bolt and nut as a mating pair.
    BoltAndNut,
}

impl ThreadSelection {
    /// Numeric code used by the parameter record (1..=5).
    pub fn code(self) -> u8 {
        match self {
            Self::External => 1,
            Self::Internal => 2,
            Self::Bolt => 3,
            Self::Nut => 4,
            Self::BoltAndNut => 5,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Self::External),
            2 => Some(Self::Internal),
            3 => Some(Self::Bolt),
            4 => Some(Self::Nut),
            5 => Some(Self::BoltAndNut),
            _ => None,
        }
    }

    /// Passes to compute, in build order.
    pub fn passes(self) -> Vec<ThreadPass> {
        match self {
            Self::External | Self::Bolt => vec![ThreadPass::External],
            Self::Internal | Self::Nut => vec![ThreadPass::Internal],
            Self::BoltAndNut => vec![ThreadPass::External, ThreadPass::Internal],
        }
    }

    pub fn has_bolt_head(self) -> bool {
        matches!(self, Self::Bolt | Self::BoltAndNut)
    }

    pub fn has_nut_body(self) -> bool {
        matches!(self, Self::Nut | Self::BoltAndNut)
    }
}

/// Regular polygon prism dimensions (bolt head or nut) in user units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PolygonDims {
    pub sides: u32,
    pub across_flats: f64,
    pub height: f64,
}

/// Thread parameters in user units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreadSpec {
    pub unit: LengthUnit,
    /// Major (outer) diameter.
    pub diameter: f64,
    pub pitch: f64,
    /// Axial advance per revolution of one start.
    pub helix_pitch: f64,
    /// Axial thread length.
    pub height: f64,
    /// Signed top flank angle in degrees, 0 = square.
    pub angle_top: f64,
    /// Signed bottom flank angle in degrees, 0 = square.
    pub angle_bottom: f64,
    /// Spline points per revolution.
    pub spline_points: u32,
    pub guide: GuideMode,
    pub rail: GuideRail,
    pub hand: Handedness,
    pub starts: StartCount,
    /// Radial mating clearance.
    pub gap: f64,
    /// Chamfer width, when chamfering is enabled.
    pub chamfer: Option<f64>,
    /// Cut the internal thread with a true offset profile instead of a grown diameter.
    pub real_offset: bool,
}

impl Default for ThreadSpec {
    fn default() -> Self {
        Self {
            unit: LengthUnit::Millimeter,
            diameter: 6.0,
            pitch: 1.0,
            helix_pitch: 1.0,
            height: 5.0,
            angle_top: 30.0,
            angle_bottom: 30.0,
            spline_points: 18,
            guide: GuideMode::Helix,
            rail: GuideRail::OuterHelix,
            hand: Handedness::Right,
            starts: StartCount::One,
            gap: 0.3,
            chamfer: None,
            real_offset: false,
        }
    }
}

/// Linear parameters converted to kernel units (cm).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KernelDims {
    pub diameter: f64,
    pub pitch: f64,
    pub helix_pitch: f64,
    pub height: f64,
    pub gap: f64,
    pub chamfer: Option<f64>,
}

impl ThreadSpec {
    /// Check every invariant the geometry stages rely on.
    pub fn validate(&self) -> SpecResult<()> {
        let linear = [
            ("diameter", self.diameter),
            ("pitch", self.pitch),
            ("helix_pitch", self.helix_pitch),
            ("height", self.height),
        ];
        for (name, value) in linear {
            require_finite(name, value)?;
            if value <= 0.0 {
                return Err(SpecError::out_of_range(name, value, 0.0, f64::INFINITY));
            }
        }

        require_finite("gap", self.gap)?;
        if self.gap < 0.0 {
            return Err(SpecError::out_of_range("gap", self.gap, 0.0, f64::INFINITY));
        }

        for (name, value) in [
            ("angle_top", self.angle_top),
            ("angle_bottom", self.angle_bottom),
        ] {
            require_finite(name, value)?;
            if value.abs() >= MAX_FLANK_ANGLE {
                return Err(SpecError::out_of_range(
                    name,
                    value,
                    -MAX_FLANK_ANGLE,
                    MAX_FLANK_ANGLE,
                ));
            }
        }

        if self.spline_points < MIN_SPLINE_POINTS {
            return Err(SpecError::out_of_range(
                "spline_points",
                f64::from(self.spline_points),
                f64::from(MIN_SPLINE_POINTS),
                f64::from(u32::MAX),
            ));
        }

        if self.rail == GuideRail::Centerline && self.guide != GuideMode::Helix {
            return Err(SpecError::invalid(
                "rail",
                format!("centerline rail requires the Helix guide mode, got {}", self.guide),
            ));
        }

        if let Some(width) = self.chamfer {
            require_finite("chamfer", width)?;
            if width <= 0.0 {
                return Err(SpecError::out_of_range("chamfer", width, 0.0, f64::INFINITY));
            }
        }

        Ok(())
    }

    /// Linear dimensions scaled into kernel units.
    pub fn kernel_dims(&self) -> KernelDims {
        let k = |v: f64| self.unit.to_kernel(v);
        KernelDims {
            diameter: k(self.diameter),
            pitch: k(self.pitch),
            helix_pitch: k(self.helix_pitch),
            height: k(self.height),
            gap: k(self.gap),
            chamfer: self.chamfer.map(k),
        }
    }

    /// The same thread mirrored axially: flank angles swapped, hand flipped.
    pub fn mirrored(&self) -> Self {
        Self {
            angle_top: self.angle_bottom,
            angle_bottom: self.angle_top,
            hand: self.hand.flipped(),
            ..self.clone()
        }
    }
}

fn require_finite(name: &str, value: f64) -> SpecResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(SpecError::invalid(name, format!("must be finite, got {}", value)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_spec_is_valid() {
        assert!(ThreadSpec::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_non_positive_pitch() {
        let spec = ThreadSpec {
            pitch: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            spec.validate(),
            Err(SpecError::OutOfRange { ref name, .. }) if name == "pitch"
        ));
    }

    #[test]
    fn test_validate_rejects_right_angle_flank() {
        let spec = ThreadSpec {
            angle_bottom: -90.0,
            ..Default::default()
        };
        assert!(spec.validate().is_err());

        let spec = ThreadSpec {
            angle_bottom: -89.0,
            ..Default::default()
        };
        assert!(spec.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_nan() {
        let spec = ThreadSpec {
            gap: f64::NAN,
            ..Default::default()
        };
        assert!(matches!(spec.validate(), Err(SpecError::InvalidValue { .. })));
    }

    #[test]
    fn test_validate_spline_points_and_chamfer() {
        let spec = ThreadSpec {
            spline_points: 2,
            ..Default::default()
        };
        assert!(spec.validate().is_err());

        let spec = ThreadSpec {
            chamfer: Some(0.0),
            ..Default::default()
        };
        assert!(spec.validate().is_err());
    }

    #[test]
    fn test_centerline_rail_only_with_helix_mode() {
        let spec = ThreadSpec {
            rail: GuideRail::Centerline,
            ..Default::default()
        };
        assert!(spec.validate().is_ok());

        let spec = ThreadSpec {
            rail: GuideRail::Centerline,
            guide: GuideMode::LongHelix,
            ..Default::default()
        };
        assert!(matches!(
            spec.validate(),
            Err(SpecError::InvalidValue { ref name, .. }) if name == "rail"
        ));
    }

    #[test]
    fn test_kernel_dims() {
        let dims = ThreadSpec::default().kernel_dims();
        assert!((dims.diameter - 0.6).abs() < 1e-12);
        assert!((dims.height - 0.5).abs() < 1e-12);
        assert!((dims.gap - 0.03).abs() < 1e-12);
        assert_eq!(dims.chamfer, None);

        let inch = ThreadSpec {
            unit: LengthUnit::Inch,
            diameter: 0.25,
            ..Default::default()
        };
        assert!((inch.kernel_dims().diameter - 0.635).abs() < 1e-12);
    }

    #[test]
    fn test_mirrored() {
        let spec = ThreadSpec {
            angle_top: 10.0,
            angle_bottom: 40.0,
            ..Default::default()
        };
        let m = spec.mirrored();
        assert_eq!(m.angle_top, 40.0);
        assert_eq!(m.angle_bottom, 10.0);
        assert_eq!(m.hand, Handedness::Left);
        assert_eq!(m.mirrored(), spec);
    }

    #[test]
    fn test_selection_codes() {
        for code in 1..=5u8 {
            let sel = ThreadSelection::from_code(code).unwrap();
            assert_eq!(sel.code(), code);
        }
        assert_eq!(ThreadSelection::from_code(0), None);
        assert_eq!(
            ThreadSelection::BoltAndNut.passes(),
            vec![ThreadPass::External, ThreadPass::Internal]
        );
        assert!(ThreadSelection::Nut.has_nut_body());
        assert!(!ThreadSelection::Nut.has_bolt_head());
    }

    #[test]
    fn test_start_count() {
        assert_eq!(StartCount::from_count(4), Some(StartCount::Four));
        assert_eq!(StartCount::from_count(3), None);
        assert_eq!(StartCount::Two.count(), 2);
    }
}
