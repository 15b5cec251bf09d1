//! # Offset/Intersection Engine
//!
//! Grows the tooth by the mating clearance with a true parallel offset so an
//! internal thread clears the external one along every flank, not just
//! radially.
//!
//! The offset chain is the previous land, bottom flank, crest, top flank and
//! land (segment indices 0..=4). Every segment is moved outward by the gap and
//! consecutive offset lines are re-intersected to give the new `P1..P4`.
//!
//! When the clearance eats the whole land, the next revolution's bottom flank
//! meets this revolution's top flank. The meeting point becomes a shared
//! vertex and an [`OverlapWarning`] is attached. Parallel flanks never meet,
//! so both are moved onto the line halfway between them instead.

use crate::error::{GeometryError, GeometryResult};
use crate::geom2d::{signed_area, Line2, EPSILON};
use crate::profile::ToothProfile;
use nalgebra::{Point2, Vector2};
use serde::{Deserialize, Serialize};

/// Non-fatal: adjacent revolutions of the cutter touch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OverlapWarning {
    /// Axial land length after offsetting; zero or negative means overlap.
    pub land_length: f64,
    /// Vertex shared by this revolution's top flank and the next one's bottom flank.
    pub shared_vertex: Point2<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OffsetProfile {
    pub p1: Point2<f64>,
    pub p2: Point2<f64>,
    pub p3: Point2<f64>,
    pub p4: Point2<f64>,
    /// Core anchor `(X0, P1'.y)`.
    pub core_start: Point2<f64>,
    /// Core anchor `(X0, P4'.y)`.
    pub core_end: Point2<f64>,
    pub core_radius: f64,
    pub pitch: f64,
    pub gap: f64,
    pub overlap: Option<OverlapWarning>,
}

impl OffsetProfile {
    /// Closed cutter outline `(X0, P1'.y) → P1' → P2' → P3' → P4' → (X0, P4'.y)`.
    pub fn outline(&self) -> Vec<Point2<f64>> {
        vec![
            self.core_start,
            self.p1,
            self.p2,
            self.p3,
            self.p4,
            self.core_end,
        ]
    }

    pub fn tooth(&self) -> [Point2<f64>; 4] {
        [self.p1, self.p2, self.p3, self.p4]
    }

    pub fn crest_radius(&self) -> f64 {
        self.p2.x.max(self.p3.x)
    }
}

const PREV_LAND: usize = 0;
const BOTTOM_FLANK: usize = 1;
const CREST: usize = 2;
const TOP_FLANK: usize = 3;
const LAND: usize = 4;

fn meet(lines: &[Line2; 5], first: usize, second: usize) -> GeometryResult<Point2<f64>> {
    lines[first]
        .intersect(&lines[second])
        .ok_or(GeometryError::ParallelSegments { first, second })
}

fn meet_line(a: &Line2, b: &Line2, first: usize, second: usize) -> GeometryResult<Point2<f64>> {
    a.intersect(b)
        .ok_or(GeometryError::ParallelSegments { first, second })
}

/// Offset the tooth of `profile` outward by `gap` (kernel units).
pub fn offset_profile(profile: &ToothProfile, gap: f64) -> GeometryResult<OffsetProfile> {
    if !gap.is_finite() || gap < 0.0 {
        return Err(GeometryError::invalid(
            "gap",
            format!("must be non-negative, got {}", gap),
        ));
    }

    let pitch = profile.p1.y - profile.p5.y;
    let land = profile.land_length();
    if land < -EPSILON {
        // The tooth is already wider than one pitch.
        return Err(GeometryError::UnresolvedOverlap { land_length: land });
    }

    let pitch_up = Vector2::new(0.0, pitch);
    let chain = [
        profile.p4 + pitch_up,
        profile.p1,
        profile.p2,
        profile.p3,
        profile.p4,
        profile.p5,
    ];

    let mut lines = [Line2 {
        origin: Point2::origin(),
        direction: Vector2::x(),
    }; 5];
    for (index, line) in lines.iter_mut().enumerate() {
        *line = Line2::through(chain[index], chain[index + 1])
            .ok_or(GeometryError::DegenerateSegment { index })?;
    }

    let area = signed_area(&profile.tooth());
    if area.abs() < EPSILON * EPSILON {
        return Err(GeometryError::ZeroArea);
    }
    // Clockwise tooth: the cutter lies to the right of each segment.
    let side = if area < 0.0 { 1.0 } else { -1.0 };
    let offsets = lines.map(|l| l.translated(l.left_normal() * (side * gap)));

    let mut p1 = meet(&offsets, PREV_LAND, BOTTOM_FLANK)?;
    let mut p2 = meet(&offsets, BOTTOM_FLANK, CREST)?;
    let mut p3 = meet(&offsets, CREST, TOP_FLANK)?;
    let mut p4 = meet(&offsets, TOP_FLANK, LAND)?;

    let land_length = p4.y - (p1.y - pitch);
    let mut overlap = None;

    if land_length <= EPSILON {
        let land_x = offsets[LAND].origin.x;
        let crest_x = offsets[CREST].origin.x;
        let (lo, hi) = (land_x.min(crest_x), land_x.max(crest_x));

        let next_bottom = offsets[BOTTOM_FLANK].translated(-pitch_up);
        let shared = match offsets[TOP_FLANK].intersect(&next_bottom) {
            Some(x) => {
                p4 = x;
                p1 = x + pitch_up;
                x
            }
            None => {
                let top = offsets[TOP_FLANK];
                let d = top.signed_distance(next_bottom.origin);
                let mid_top = top.translated(top.left_normal() * (d / 2.0));
                let mid_bottom = mid_top.translated(pitch_up);

                p1 = meet_line(&offsets[PREV_LAND], &mid_bottom, PREV_LAND, BOTTOM_FLANK)?;
                p2 = meet_line(&mid_bottom, &offsets[CREST], BOTTOM_FLANK, CREST)?;
                p3 = meet_line(&offsets[CREST], &mid_top, CREST, TOP_FLANK)?;
                p4 = meet_line(&mid_top, &offsets[LAND], TOP_FLANK, LAND)?;
                p4
            }
        };

        if shared.x < lo - EPSILON || shared.x > hi + EPSILON {
            return Err(GeometryError::UnresolvedOverlap { land_length });
        }

        overlap = Some(OverlapWarning {
            land_length,
            shared_vertex: shared,
        });
    }

    let core_radius = profile.core_radius;
    Ok(OffsetProfile {
        p1,
        p2,
        p3,
        p4,
        core_start: Point2::new(core_radius, p1.y),
        core_end: Point2::new(core_radius, p4.y),
        core_radius,
        pitch,
        gap,
        overlap,
    })
}
