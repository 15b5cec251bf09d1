//! # Tooth Profile
//!
//! Derives the seven-point tooth profile in the radial/axial sketch plane
//! (x = radius, y = axial position) from signed flank angles.
//!
//! The tooth is bounded by the bottom flank `P1 → P2`, the crest `P2 → P3`
//! and the top flank `P3 → P4`. `P1` and `P4` sit on the minor radius, `P2`
//! and `P3` on the crest radius. `P00` and `P6` close the sketch onto the core
//! radius, which is slightly inside the minor radius so the sweep fuses with
//! the core cylinder. `P5` is the next revolution's `P1`.

use crate::error::{GeometryError, GeometryResult};
use crate::geom2d::{signed_area, EPSILON};
use crate::CORE_OVERLAP;
use nalgebra::Point2;
use serde::{Deserialize, Serialize};
use threadtune_core::{ThreadPass, ThreadSpec};

/// Reference flank angle (degrees) used when a square flank controls the depth.
pub const REFERENCE_ANGLE: f64 = 30.0;

/// Axial offsets of the flank endpoints relative to the tooth center line.
///
/// `yb_*` is measured at the minor radius, `ys_*` at the crest.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlankOffsets {
    pub yb_bottom: f64,
    pub ys_bottom: f64,
    pub yb_top: f64,
    pub ys_top: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToothProfile {
    pub p00: Point2<f64>,
    pub p1: Point2<f64>,
    pub p2: Point2<f64>,
    pub p3: Point2<f64>,
    pub p4: Point2<f64>,
    pub p5: Point2<f64>,
    pub p6: Point2<f64>,
    /// Minor radius `R_min`.
    pub minor_radius: f64,
    /// Core radius `X0 = R_min - 0.01`.
    pub core_radius: f64,
    /// Crest radius `OD/2`.
    pub crest_radius: f64,
    pub pitch: f64,
    /// Signed controlling angle in degrees.
    pub controlling_angle: f64,
    /// Fundamental triangle height `H`.
    pub thread_height: f64,
    pub flanks: FlankOffsets,
}

impl ToothProfile {
    /// Closed sketch outline `P00 → P1 → P2 → P3 → P4 → P6`.
    pub fn outline(&self) -> Vec<Point2<f64>> {
        vec![self.p00, self.p1, self.p2, self.p3, self.p4, self.p6]
    }

    /// The four tooth vertices `P1..P4`.
    pub fn tooth(&self) -> [Point2<f64>; 4] {
        [self.p1, self.p2, self.p3, self.p4]
    }

    /// Axial length of the land between this tooth and the next revolution.
    pub fn land_length(&self) -> f64 {
        self.p4.y - self.p5.y
    }

    /// Area of the tooth quad `P1..P4`.
    pub fn tooth_area(&self) -> f64 {
        signed_area(&self.tooth()).abs()
    }
}

/// The controlling angle: the smaller flank magnitude, the more negative
/// flank when both are undercut, and the reference angle for a square flank.
pub fn controlling_angle(angle_top: f64, angle_bottom: f64) -> f64 {
    if angle_top < 0.0 && angle_bottom < 0.0 {
        return angle_top.min(angle_bottom);
    }
    let ang = angle_top.abs().min(angle_bottom.abs());
    if ang == 0.0 {
        REFERENCE_ANGLE
    } else {
        ang
    }
}

/// Half-width of a square flank from the tooth center: 3/8 of the pitch,
/// less the clearance on the external pass.
fn square_half_width(pitch: f64, gap: f64, pass: ThreadPass) -> f64 {
    let h3 = 0.375 * pitch;
    match pass {
        ThreadPass::External => h3 - gap,
        ThreadPass::Internal => h3,
    }
}

/// Reject a clearance that swallows a square flank of the external tooth.
///
/// Past that point `P1` and `P4` trade sides and the tooth turns inside
/// out, wider than the pitch.
pub fn check_square_clearance(spec: &ThreadSpec, pass: ThreadPass) -> GeometryResult<()> {
    if spec.angle_top != 0.0 && spec.angle_bottom != 0.0 {
        return Ok(());
    }
    let dims = spec.kernel_dims();
    let half = square_half_width(dims.pitch, dims.gap, pass);
    if half <= EPSILON {
        return Err(GeometryError::invalid(
            "gap",
            format!(
                "clearance {} cm leaves no square flank (half-width {} cm at pitch {} cm)",
                dims.gap, half, dims.pitch
            ),
        ));
    }
    Ok(())
}

/// Compute the tooth profile for one pass in kernel units.
///
/// The internal pass without a true offset grows the diameter by twice the
/// clearance. Square flanks of the external pass are pulled in by the
/// clearance. Input is assumed validated.
pub fn calculate_profile(spec: &ThreadSpec, pass: ThreadPass) -> ToothProfile {
    let dims = spec.kernel_dims();
    let pitch = dims.pitch;
    let diameter = match pass {
        ThreadPass::Internal if !spec.real_offset => dims.diameter + 2.0 * dims.gap,
        _ => dims.diameter,
    };

    let ang = controlling_angle(spec.angle_top, spec.angle_bottom);
    let tan_ang = ang.to_radians().tan();

    let h_thread = (1.0 / tan_ang) * pitch / 2.0;
    let h8 = h_thread / 8.0;
    let h5h8 = 5.0 * h_thread / 8.0;

    let r_min = (diameter - 2.0 * h5h8.abs()) / 2.0;
    let x0 = r_min - CORE_OVERLAP;
    let crest = diameter / 2.0;

    let tan_bot = spec.angle_bottom.to_radians().tan();
    let tan_top = spec.angle_top.to_radians().tan();
    let flanks = FlankOffsets {
        yb_bottom: (h5h8 + h8) * tan_bot,
        ys_bottom: h8 * tan_bot,
        yb_top: (h5h8 + h8) * tan_top,
        ys_top: h8 * tan_top,
    };

    let h3_square = square_half_width(pitch, dims.gap, pass);

    let FlankOffsets {
        yb_bottom,
        ys_bottom,
        yb_top,
        ys_top,
    } = flanks;

    let (p1, p2, p3, p4) = if spec.angle_top < 0.0 && spec.angle_bottom > 0.0 {
        // Lean: both flanks follow the positive bottom flank.
        let w = yb_bottom.abs() + yb_top.abs();
        (
            Point2::new(r_min, yb_bottom),
            Point2::new(crest, ys_bottom),
            Point2::new(crest, ys_bottom - w),
            Point2::new(r_min, yb_bottom - w),
        )
    } else if spec.angle_bottom < 0.0 && spec.angle_top > 0.0 {
        let w = yb_bottom.abs() + yb_top.abs();
        (
            Point2::new(r_min, -yb_top + w),
            Point2::new(crest, -ys_top + w),
            Point2::new(crest, -ys_top),
            Point2::new(r_min, -yb_top),
        )
    } else {
        let (p1, p2) = if spec.angle_bottom > 0.0 {
            (Point2::new(r_min, yb_bottom), Point2::new(crest, ys_bottom))
        } else if spec.angle_bottom == 0.0 {
            (Point2::new(r_min, h3_square), Point2::new(crest, h3_square))
        } else {
            (Point2::new(r_min, ys_bottom), Point2::new(crest, yb_bottom))
        };
        let (p3, p4) = if spec.angle_top > 0.0 {
            (Point2::new(crest, -ys_top), Point2::new(r_min, -yb_top))
        } else if spec.angle_top == 0.0 {
            (Point2::new(crest, -h3_square), Point2::new(r_min, -h3_square))
        } else {
            (Point2::new(crest, -yb_top), Point2::new(r_min, -ys_top))
        };
        (p1, p2, p3, p4)
    };

    ToothProfile {
        p00: Point2::new(x0, p1.y),
        p1,
        p2,
        p3,
        p4,
        p5: Point2::new(r_min, p1.y - pitch),
        p6: Point2::new(x0, p4.y),
        minor_radius: r_min,
        core_radius: x0,
        crest_radius: crest,
        pitch,
        controlling_angle: ang,
        thread_height: h_thread,
        flanks,
    }
}
