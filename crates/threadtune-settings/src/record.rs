//! # Parameter Record
//!
//! The dialog state is persisted as a single comma-separated line. The
//! current layout has 22 fields:
//!
//! ```text
//! diameter, pitch, helix_pitch, height, angle_top, angle_bottom,
//! spline_points, guide(H|C|L|P), hand(R|L), starts(1|2|4), selection(1..5),
//! bolt_sides, bolt_flat, bolt_head_height, nut_sides, nut_flat, nut_height,
//! gap, chamfer_width, chamfer(Y|N), real_offset(Y|N), unit(M|E)
//! ```
//!
//! Guide `C` is the full-length helix swept along the axis line.
//!
//! Older 16-field records are migrated on read. A line is only taken as
//! legacy when its guide and trailing flag fields carry legacy codes, so a
//! truncated current record is read as current. Any field that is missing,
//! malformed or out of range is replaced by its default and reported as a
//! [`Substitution`].

use serde::{Deserialize, Serialize};
use std::fmt;
use threadtune_core::{
    GuideMode, GuideRail, Handedness, LengthUnit, PolygonDims, StartCount, ThreadSelection, ThreadSpec,
    MAX_FLANK_ANGLE, MIN_SPLINE_POINTS,
};

/// Number of fields in the current record layout.
pub const FIELD_COUNT: usize = 22;

/// Number of fields in the legacy layout.
pub const LEGACY_FIELD_COUNT: usize = 16;

const FIELD_NAMES: [&str; FIELD_COUNT] = [
    "diameter",
    "pitch",
    "helix_pitch",
    "height",
    "angle_top",
    "angle_bottom",
    "spline_points",
    "guide",
    "hand",
    "starts",
    "selection",
    "bolt_sides",
    "bolt_flat",
    "bolt_head_height",
    "nut_sides",
    "nut_flat",
    "nut_height",
    "gap",
    "chamfer_width",
    "chamfer",
    "real_offset",
    "unit",
];

const LEGACY_FIELD_NAMES: [&str; LEGACY_FIELD_COUNT] = [
    "diameter",
    "pitch",
    "height",
    "angle_top",
    "angle_bottom",
    "spline_points",
    "guide",
    "hand",
    "bolt_sides",
    "bolt_flat",
    "bolt_head_height",
    "nut_sides",
    "nut_flat",
    "nut_height",
    "gap",
    "draw_bolt_nut",
];

/// A field that could not be used as written and was replaced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Substitution {
    pub field: String,
    /// Raw text, empty when the field was missing.
    pub raw: String,
    pub reason: String,
}

impl fmt::Display for Substitution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = '{}': {}", self.field, self.raw, self.reason)
    }
}

/// Everything the parameter dialog stores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreadRecord {
    pub spec: ThreadSpec,
    pub selection: ThreadSelection,
    pub bolt_head: PolygonDims,
    pub nut: PolygonDims,
    /// Remembered chamfer width, kept even while chamfering is off.
    pub chamfer_width: f64,
}

impl Default for ThreadRecord {
    fn default() -> Self {
        Self {
            spec: ThreadSpec::default(),
            selection: ThreadSelection::BoltAndNut,
            bolt_head: PolygonDims {
                sides: 6,
                across_flats: 10.0,
                height: 4.0,
            },
            nut: PolygonDims {
                sides: 6,
                across_flats: 10.0,
                height: 5.0,
            },
            chamfer_width: 0.5,
        }
    }
}

/// Result of parsing a record line.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedRecord {
    pub record: ThreadRecord,
    pub substitutions: Vec<Substitution>,
    /// True when the line used the legacy layout.
    pub migrated: bool,
}

fn guide_code(guide: GuideMode, rail: GuideRail) -> char {
    match (guide, rail) {
        (GuideMode::Helix, GuideRail::Centerline) => 'C',
        (GuideMode::Helix, GuideRail::OuterHelix) => 'H',
        (GuideMode::LongHelix, _) => 'L',
        (GuideMode::Pattern, _) => 'P',
    }
}

fn parse_guide(code: &str) -> Option<(GuideMode, GuideRail)> {
    match code {
        "H" => Some((GuideMode::Helix, GuideRail::OuterHelix)),
        "C" => Some((GuideMode::Helix, GuideRail::Centerline)),
        "L" => Some((GuideMode::LongHelix, GuideRail::OuterHelix)),
        "P" => Some((GuideMode::Pattern, GuideRail::OuterHelix)),
        _ => None,
    }
}

fn parse_legacy_guide(code: &str) -> Option<(GuideMode, GuideRail)> {
    match code {
        "P" => None,
        other => parse_guide(other),
    }
}

fn parse_hand(code: &str) -> Option<Handedness> {
    match code {
        "R" => Some(Handedness::Right),
        "L" => Some(Handedness::Left),
        _ => None,
    }
}

fn parse_unit(code: &str) -> Option<LengthUnit> {
    match code {
        "M" => Some(LengthUnit::Millimeter),
        "E" => Some(LengthUnit::Inch),
        _ => None,
    }
}

fn parse_flag(code: &str) -> Option<bool> {
    match code {
        "Y" => Some(true),
        "N" => Some(false),
        _ => None,
    }
}

fn flag_code(flag: bool) -> char {
    if flag {
        'Y'
    } else {
        'N'
    }
}

/// Legacy lines have exactly 16 fields, a guide code at field 6 and a
/// draw-both flag at field 15. A current line cut short to 16 fields has a
/// spline count at field 6 instead.
fn is_legacy(fields: &[&str]) -> bool {
    fields.len() == LEGACY_FIELD_COUNT
        && parse_legacy_guide(&fields[6].to_ascii_uppercase()).is_some()
        && parse_flag(&fields[15].to_ascii_uppercase()).is_some()
}

/// Walks the fields of one line, substituting defaults as it goes.
struct FieldReader<'a> {
    fields: Vec<&'a str>,
    names: &'static [&'static str],
    substitutions: Vec<Substitution>,
}

impl<'a> FieldReader<'a> {
    fn new(fields: Vec<&'a str>, names: &'static [&'static str]) -> Self {
        Self {
            fields,
            names,
            substitutions: Vec::new(),
        }
    }

    fn substitute<T>(&mut self, index: usize, raw: &str, reason: impl Into<String>, default: T) -> T {
        self.substitutions.push(Substitution {
            field: self.names[index].to_string(),
            raw: raw.to_string(),
            reason: reason.into(),
        });
        default
    }

    /// Raw text of a field, or `None` (flagged) when it is missing.
    fn raw(&mut self, index: usize) -> Option<&'a str> {
        match self.fields.get(index).copied() {
            Some(s) if !s.is_empty() => Some(s),
            _ => {
                self.substitute(index, "", "missing", ());
                None
            }
        }
    }

    fn number(&mut self, index: usize, default: f64, valid: impl Fn(f64) -> bool, rule: &str) -> f64 {
        let Some(raw) = self.raw(index) else {
            return default;
        };
        match raw.parse::<f64>() {
            Ok(v) if v.is_finite() && valid(v) => v,
            Ok(_) => self.substitute(index, raw, format!("must be {}", rule), default),
            Err(_) => self.substitute(index, raw, "not a number", default),
        }
    }

    fn positive(&mut self, index: usize, default: f64) -> f64 {
        self.number(index, default, |v| v > 0.0, "positive")
    }

    fn angle(&mut self, index: usize, default: f64) -> f64 {
        self.number(
            index,
            default,
            |v| v.abs() < MAX_FLANK_ANGLE,
            "strictly between -90 and 90 degrees",
        )
    }

    /// Negative heights are taken as their magnitude.
    fn height(&mut self, index: usize, default: f64) -> f64 {
        let value = self.number(index, default, |v| v != 0.0, "non-zero");
        if value < 0.0 {
            let raw = self.fields[index];
            self.substitute(index, raw, "negative height taken as absolute value", -value)
        } else {
            value
        }
    }

    fn integer(&mut self, index: usize, default: u32, min: u32) -> u32 {
        let Some(raw) = self.raw(index) else {
            return default;
        };
        match raw.parse::<u32>() {
            Ok(v) if v >= min => v,
            Ok(_) => self.substitute(index, raw, format!("must be at least {}", min), default),
            Err(_) => self.substitute(index, raw, "not a whole number", default),
        }
    }

    fn code<T>(&mut self, index: usize, default: T, parse: impl Fn(&str) -> Option<T>) -> T {
        let Some(raw) = self.raw(index) else {
            return default;
        };
        match parse(&raw.to_ascii_uppercase()) {
            Some(v) => v,
            None => self.substitute(index, raw, "unrecognized code", default),
        }
    }
}

impl ThreadRecord {
    /// Parse a record line. Never fails; see [`ParsedRecord::substitutions`].
    pub fn parse(line: &str) -> ParsedRecord {
        let fields: Vec<&str> = line.trim().split(',').map(str::trim).collect();
        if is_legacy(&fields) {
            Self::parse_legacy(fields)
        } else {
            Self::parse_current(fields)
        }
    }

    fn parse_current(fields: Vec<&str>) -> ParsedRecord {
        let d = Self::default();
        let mut r = FieldReader::new(fields, &FIELD_NAMES);

        let diameter = r.positive(0, d.spec.diameter);
        let pitch = r.positive(1, d.spec.pitch);
        let helix_pitch = r.positive(2, d.spec.helix_pitch);
        let height = r.height(3, d.spec.height);
        let angle_top = r.angle(4, d.spec.angle_top);
        let angle_bottom = r.angle(5, d.spec.angle_bottom);
        let spline_points = r.integer(6, d.spec.spline_points, MIN_SPLINE_POINTS);
        let (guide, rail) = r.code(7, (d.spec.guide, d.spec.rail), parse_guide);
        let hand = r.code(8, d.spec.hand, parse_hand);
        let starts = r.code(9, d.spec.starts, |s| {
            s.parse::<u32>().ok().and_then(StartCount::from_count)
        });
        let selection = r.code(10, d.selection, |s| {
            s.parse::<u8>().ok().and_then(ThreadSelection::from_code)
        });
        let bolt_head = PolygonDims {
            sides: r.integer(11, d.bolt_head.sides, 3),
            across_flats: r.positive(12, d.bolt_head.across_flats),
            height: r.positive(13, d.bolt_head.height),
        };
        let nut = PolygonDims {
            sides: r.integer(14, d.nut.sides, 3),
            across_flats: r.positive(15, d.nut.across_flats),
            height: r.positive(16, d.nut.height),
        };
        let gap = r.number(17, d.spec.gap, |v| v >= 0.0, "non-negative");
        let chamfer_width = r.positive(18, d.chamfer_width);
        let chamfer = r.code(19, d.spec.chamfer.is_some(), parse_flag);
        let real_offset = r.code(20, d.spec.real_offset, parse_flag);
        let unit = r.code(21, d.spec.unit, parse_unit);

        ParsedRecord {
            record: ThreadRecord {
                spec: ThreadSpec {
                    unit,
                    diameter,
                    pitch,
                    helix_pitch,
                    height,
                    angle_top,
                    angle_bottom,
                    spline_points,
                    guide,
                    rail,
                    hand,
                    starts,
                    gap,
                    chamfer: chamfer.then_some(chamfer_width),
                    real_offset,
                },
                selection,
                bolt_head,
                nut,
                chamfer_width,
            },
            substitutions: r.substitutions,
            migrated: false,
        }
    }

    fn parse_legacy(fields: Vec<&str>) -> ParsedRecord {
        let d = Self::default();
        let mut r = FieldReader::new(fields, &LEGACY_FIELD_NAMES);

        let diameter = r.positive(0, d.spec.diameter);
        let pitch = r.positive(1, d.spec.pitch);
        let height = r.height(2, d.spec.height);
        let angle_top = r.angle(3, d.spec.angle_top);
        let angle_bottom = r.angle(4, d.spec.angle_bottom);
        let spline_points = r.integer(5, d.spec.spline_points, MIN_SPLINE_POINTS);
        let (guide, rail) = r.code(6, (d.spec.guide, d.spec.rail), parse_legacy_guide);
        let hand = r.code(7, d.spec.hand, parse_hand);
        let bolt_head = PolygonDims {
            sides: r.integer(8, d.bolt_head.sides, 3),
            across_flats: r.positive(9, d.bolt_head.across_flats),
            height: r.positive(10, d.bolt_head.height),
        };
        let nut = PolygonDims {
            sides: r.integer(11, d.nut.sides, 3),
            across_flats: r.positive(12, d.nut.across_flats),
            height: r.positive(13, d.nut.height),
        };
        let gap = r.number(14, d.spec.gap, |v| v >= 0.0, "non-negative");
        let both = r.code(15, true, parse_flag);

        ParsedRecord {
            record: ThreadRecord {
                spec: ThreadSpec {
                    diameter,
                    pitch,
                    helix_pitch: pitch,
                    height,
                    angle_top,
                    angle_bottom,
                    spline_points,
                    guide,
                    rail,
                    hand,
                    starts: StartCount::One,
                    gap,
                    ..d.spec
                },
                selection: if both {
                    ThreadSelection::BoltAndNut
                } else {
                    ThreadSelection::External
                },
                bolt_head,
                nut,
                chamfer_width: d.chamfer_width,
            },
            substitutions: r.substitutions,
            migrated: true,
        }
    }
}

impl fmt::Display for ThreadRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = &self.spec;
        write!(
            f,
            "{},{},{},{},{},{},{},{},{},{},{},{},{},{},{},{},{},{},{},{},{},{}",
            s.diameter,
            s.pitch,
            s.helix_pitch,
            s.height,
            s.angle_top,
            s.angle_bottom,
            s.spline_points,
            guide_code(s.guide, s.rail),
            s.hand.code(),
            s.starts.count(),
            self.selection.code(),
            self.bolt_head.sides,
            self.bolt_head.across_flats,
            self.bolt_head.height,
            self.nut.sides,
            self.nut.across_flats,
            self.nut.height,
            s.gap,
            s.chamfer.unwrap_or(self.chamfer_width),
            flag_code(s.chamfer.is_some()),
            flag_code(s.real_offset),
            match s.unit {
                LengthUnit::Millimeter => 'M',
                LengthUnit::Inch => 'E',
            }
        )
    }
}
