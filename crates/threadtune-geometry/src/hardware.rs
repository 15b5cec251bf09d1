//! # Hardware
//!
//! Regular-polygon bolt heads and nuts. A polygon is given by its distance
//! across flats; vertices are rotated half a sector so a flat faces +x.

use crate::error::{GeometryError, GeometryResult};
use nalgebra::Point2;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use threadtune_core::{LengthUnit, PolygonDims, ThreadSpec};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegularPolygon {
    pub sides: u32,
    pub across_flats: f64,
}

impl RegularPolygon {
    pub fn new(sides: u32, across_flats: f64) -> GeometryResult<Self> {
        if sides < 3 {
            return Err(GeometryError::invalid(
                "sides",
                format!("a polygon needs at least 3 sides, got {}", sides),
            ));
        }
        if !across_flats.is_finite() || across_flats <= 0.0 {
            return Err(GeometryError::invalid(
                "across_flats",
                format!("must be positive, got {}", across_flats),
            ));
        }
        Ok(Self {
            sides,
            across_flats,
        })
    }

    /// Circumradius.
    pub fn vertex_radius(&self) -> f64 {
        (self.across_flats / 2.0) / (PI / f64::from(self.sides)).cos()
    }

    pub fn vertices(&self) -> Vec<Point2<f64>> {
        let n = f64::from(self.sides);
        let r = self.vertex_radius();
        (0..self.sides)
            .map(|i| {
                let a = PI / n + f64::from(i) * 2.0 * PI / n;
                Point2::new(r * a.cos(), r * a.sin())
            })
            .collect()
    }
}

fn check_height(height: f64) -> GeometryResult<()> {
    if height.is_finite() && height > 0.0 {
        Ok(())
    } else {
        Err(GeometryError::invalid(
            "height",
            format!("must be positive, got {}", height),
        ))
    }
}

/// Bolt head, extruded downward from `z = 0` and joined to the thread.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoltHead {
    pub polygon: RegularPolygon,
    pub height: f64,
}

impl BoltHead {
    /// Build from user-unit dimensions.
    pub fn from_dims(dims: &PolygonDims, unit: LengthUnit) -> GeometryResult<Self> {
        let height = unit.to_kernel(dims.height);
        check_height(height)?;
        Ok(Self {
            polygon: RegularPolygon::new(dims.sides, unit.to_kernel(dims.across_flats))?,
            height,
        })
    }
}

/// Nut body, extruded upward from one pitch above the sketch origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NutBody {
    pub polygon: RegularPolygon,
    pub height: f64,
    pub plane_offset: f64,
}

impl NutBody {
    pub fn from_dims(dims: &PolygonDims, spec: &ThreadSpec) -> GeometryResult<Self> {
        let height = spec.unit.to_kernel(dims.height);
        check_height(height)?;
        Ok(Self {
            polygon: RegularPolygon::new(dims.sides, spec.unit.to_kernel(dims.across_flats))?,
            height,
            plane_offset: spec.unit.to_kernel(spec.pitch),
        })
    }
}

/// Thread spec for the internal pass through a nut: one pitch of run-out
/// beyond each face.
pub fn nut_thread_spec(spec: &ThreadSpec, nut: &PolygonDims) -> ThreadSpec {
    ThreadSpec {
        height: nut.height.abs() + 2.0 * spec.pitch,
        ..spec.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hexagon_vertex_radius() {
        let hex = RegularPolygon::new(6, 1.0).unwrap();
        assert!((hex.vertex_radius() - 0.5 / (PI / 6.0).cos()).abs() < 1e-12);
        let v = hex.vertices();
        assert_eq!(v.len(), 6);
        // Flat faces +x: the two vertices nearest +x share the same x.
        assert!((v[0].x - v[5].x).abs() < 1e-12);
        assert!((v[0].x - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_square_polygon() {
        let sq = RegularPolygon::new(4, 2.0).unwrap();
        for p in sq.vertices() {
            assert!((p.x.abs() - 1.0).abs() < 1e-12);
            assert!((p.y.abs() - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_invalid_polygon() {
        assert!(RegularPolygon::new(2, 1.0).is_err());
        assert!(RegularPolygon::new(6, 0.0).is_err());
    }

    #[test]
    fn test_nut_body_geometry() {
        let spec = ThreadSpec::default();
        let dims = PolygonDims {
            sides: 6,
            across_flats: 10.0,
            height: 5.0,
        };
        let nut = NutBody::from_dims(&dims, &spec).unwrap();
        assert!((nut.plane_offset - 0.1).abs() < 1e-12);
        assert!((nut.height - 0.5).abs() < 1e-12);

        let internal = nut_thread_spec(&spec, &dims);
        assert_eq!(internal.height, 7.0);
    }
}
