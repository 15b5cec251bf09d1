//! # Chamfer Profiles
//!
//! Closed profiles in (radius, z) that are revolved 360° about the thread
//! axis and cut from the body: a 45° wedge at the bolt crest, and a conical
//! countersink at each nut face.

use crate::error::{GeometryError, GeometryResult};
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// Margin that pushes chamfer cutters past the faces they trim (cm).
pub const CHAMFER_MARGIN: f64 = 0.01;

/// Which nut face a chamfer sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NutFace {
    /// Lower face; the nut lies above it.
    Bottom,
    /// Upper face; the nut lies below it.
    Top,
}

impl NutFace {
    /// Axial direction pointing into the nut material.
    pub fn inward(self) -> f64 {
        match self {
            Self::Bottom => 1.0,
            Self::Top => -1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ChamferAnchor {
    Crest { radius: f64, z: f64 },
    NutFace { face: NutFace, z: f64 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChamferProfile {
    pub points: Vec<Point2<f64>>,
    pub anchor: ChamferAnchor,
    /// True when the countersink reached the axis and was cut off at `x = 0`.
    pub clipped: bool,
}

fn check_positive(name: &str, value: f64) -> GeometryResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(GeometryError::invalid(
            name,
            format!("must be positive, got {}", value),
        ))
    }
}

/// 45° wedge that breaks the crest edge at the bolt end `end_z`.
pub fn crest_chamfer(crest_radius: f64, end_z: f64, width: f64) -> GeometryResult<ChamferProfile> {
    check_positive("width", width)?;
    check_positive("crest_radius", crest_radius)?;

    let m = CHAMFER_MARGIN;
    Ok(ChamferProfile {
        points: vec![
            Point2::new(crest_radius - width, end_z),
            Point2::new(crest_radius + m, end_z),
            Point2::new(crest_radius + m, end_z - width - m),
        ],
        anchor: ChamferAnchor::Crest {
            radius: crest_radius,
            z: end_z,
        },
        clipped: false,
    })
}

/// Countersink at a nut face, from `root_radius + width` on the face down
/// to `minor_radius - width` at 45°.
pub fn nut_face_chamfer(
    root_radius: f64,
    minor_radius: f64,
    face_z: f64,
    face: NutFace,
    width: f64,
) -> GeometryResult<ChamferProfile> {
    check_positive("width", width)?;
    check_positive("root_radius", root_radius)?;
    check_positive("minor_radius", minor_radius)?;

    let s = face.inward();
    let m = CHAMFER_MARGIN;
    let outer = root_radius + width;
    let xi = minor_radius - width;

    let v0 = Point2::new(outer, face_z);
    let v3 = Point2::new(outer, face_z - s * m);

    let (points, clipped) = if xi < 0.0 {
        // Both edges meet the axis before reaching xi.
        let i1 = Point2::new(0.0, face_z + s * outer);
        let i2 = Point2::new(0.0, face_z - s * m);
        (vec![v0, i1, i2, v3], true)
    } else {
        let v1 = Point2::new(xi, face_z + s * (outer - xi));
        let v2 = Point2::new(xi, face_z - s * m);
        (vec![v0, v1, v2, v3], false)
    };

    Ok(ChamferProfile {
        points,
        anchor: ChamferAnchor::NutFace { face, z: face_z },
        clipped,
    })
}
