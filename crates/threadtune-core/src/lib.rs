//! # ThreadTune Core
//!
//! Core types and utilities shared by the ThreadTune crates.
//! Provides the thread parameter record, its closed enumerations,
//! unit conversion into kernel units, and parameter validation errors.

pub mod error;
pub mod spec;
pub mod units;

pub use error::{SpecError, SpecResult};
pub use spec::{
    GuideMode, GuideRail, Handedness, KernelDims, PolygonDims, StartCount, ThreadPass,
    ThreadSelection, ThreadSpec, MAX_FLANK_ANGLE, MIN_SPLINE_POINTS,
};
pub use units::LengthUnit;
