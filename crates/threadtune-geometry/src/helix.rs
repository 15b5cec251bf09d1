//! # Helix Path Generator
//!
//! Samples the helical sweep path at a fixed number of points per
//! revolution. The inner sequence runs at the core radius; the outer guide
//! sequence runs at the crest radius unless the sweep is steered by the
//! thread axis instead.

use crate::error::{GeometryError, GeometryResult};
use crate::CENTERLINE_EXTENSION;
use nalgebra::Point3;
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;
use threadtune_core::{GuideMode, GuideRail, Handedness, MIN_SPLINE_POINTS};

/// Upper bound on the samples of one helix sequence.
pub const MAX_HELIX_POINTS: u32 = 1_000_000;

/// Inputs of [`generate_helix`], all lengths in kernel units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HelixParams {
    pub inner_radius: f64,
    pub outer_radius: f64,
    /// Axial advance per revolution.
    pub lead: f64,
    pub revolutions: u32,
    pub points_per_revolution: u32,
    pub hand: Handedness,
    pub guide: GuideMode,
    pub rail: GuideRail,
    /// Thread height; the centerline ends slightly above it.
    pub height: f64,
}

impl HelixParams {
    /// Number of sampling steps; points emitted are `steps + 1`.
    /// `None` when the count does not fit in a `u32`.
    pub fn steps(&self) -> Option<u32> {
        match self.guide {
            GuideMode::Pattern => Some(self.points_per_revolution),
            GuideMode::Helix | GuideMode::LongHelix => {
                self.points_per_revolution.checked_mul(self.revolutions)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HelixPath {
    pub inner: Vec<Point3<f64>>,
    /// Crest-radius guide rail; absent for centerline-guided sweeps.
    pub outer: Option<Vec<Point3<f64>>>,
    pub centerline: [Point3<f64>; 2],
    pub revolutions: u32,
    pub guide: GuideMode,
}

impl HelixPath {
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Height of the last sample.
    pub fn end_z(&self) -> f64 {
        self.inner.last().map_or(0.0, |p| p.z)
    }
}

/// Revolutions needed to cover `height`, plus one for the trimmed run-out.
pub fn revolutions_for(height: f64, lead: f64) -> GeometryResult<u32> {
    if !lead.is_finite() || lead <= 0.0 {
        return Err(GeometryError::invalid(
            "lead",
            format!("must be positive, got {}", lead),
        ));
    }
    if !height.is_finite() || height < 0.0 {
        return Err(GeometryError::invalid(
            "height",
            format!("must be non-negative, got {}", height),
        ));
    }
    // Tolerate float noise such as 0.5 / 0.1.
    let exact = (height / lead - 1e-9).ceil().max(0.0);
    if exact >= f64::from(MAX_HELIX_POINTS) {
        return Err(GeometryError::invalid(
            "height",
            format!("{} revolutions of lead {} exceed the helix sample limit", exact, lead),
        ));
    }
    Ok(exact as u32 + 1)
}

pub fn generate_helix(params: &HelixParams) -> GeometryResult<HelixPath> {
    if params.points_per_revolution < MIN_SPLINE_POINTS {
        return Err(GeometryError::TooFewSplinePoints {
            count: params.points_per_revolution,
            min: MIN_SPLINE_POINTS,
        });
    }
    if params.revolutions == 0 {
        return Err(GeometryError::invalid("revolutions", "must be at least 1"));
    }
    if !params.lead.is_finite() || params.lead <= 0.0 {
        return Err(GeometryError::invalid(
            "lead",
            format!("must be positive, got {}", params.lead),
        ));
    }
    if [params.inner_radius, params.outer_radius]
        .iter()
        .any(|r| !r.is_finite() || *r <= 0.0)
    {
        return Err(GeometryError::invalid("radius", "helix radii must be positive"));
    }

    let spts = f64::from(params.points_per_revolution);
    let d_theta = params.hand.sign() * TAU / spts;
    let d_z = params.lead / spts;
    let steps = params
        .steps()
        .filter(|&n| n < MAX_HELIX_POINTS)
        .ok_or_else(|| {
            GeometryError::invalid(
                "spline_points",
                format!(
                    "{} points over {} revolutions exceed {} samples",
                    params.points_per_revolution, params.revolutions, MAX_HELIX_POINTS
                ),
            )
        })?;

    let sample = |radius: f64| -> Vec<Point3<f64>> {
        (0..=steps)
            .map(|i| {
                let i = f64::from(i);
                let theta = i * d_theta;
                Point3::new(radius * theta.cos(), radius * theta.sin(), i * d_z)
            })
            .collect()
    };

    let outer = match params.rail {
        GuideRail::OuterHelix => Some(sample(params.outer_radius)),
        GuideRail::Centerline => None,
    };

    Ok(HelixPath {
        inner: sample(params.inner_radius),
        outer,
        centerline: [
            Point3::origin(),
            Point3::new(0.0, 0.0, params.height + CENTERLINE_EXTENSION),
        ],
        revolutions: params.revolutions,
        guide: params.guide,
    })
}
