//! # Thread Geometry Pipeline
//!
//! Runs every geometry stage for one pass and collects the results a kernel
//! needs: sketch outline, sweep path, chamfers, trim cylinders, pattern and
//! multi-start parameters.

use crate::chamfer::{crest_chamfer, nut_face_chamfer, ChamferProfile, NutFace};
use crate::error::{GeometryError, GeometryResult};
use crate::geom2d::{dedup_closed, segments_intersect, signed_area, EPSILON};
use crate::helix::{generate_helix, revolutions_for, HelixParams, HelixPath};
use crate::multi_start::rotation_angles;
use crate::offset::{offset_profile, OffsetProfile, OverlapWarning};
use crate::profile::{calculate_profile, check_square_clearance, ToothProfile};
use crate::CORE_OVERLAP;
use nalgebra::Point2;
use serde::{Deserialize, Serialize};
use std::fmt;
use threadtune_core::{GuideMode, GuideRail, KernelDims, ThreadPass, ThreadSpec};

/// Recoverable conditions reported alongside a successful result.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GeometryWarning {
    Overlap(OverlapWarning),
}

impl fmt::Display for GeometryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Overlap(w) => write!(
                f,
                "Adjacent thread revolutions touch (land {:.4} cm at r = {:.4} cm); increase the lead or reduce the clearance",
                w.land_length, w.shared_vertex.x
            ),
        }
    }
}

/// Cylinders that cap the swept thread: a core joined over the thread height
/// and two cutters that remove the run-out below `z = 0` and above the height.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrimPlan {
    pub core_radius: f64,
    pub core_height: f64,
    pub trim_radius: f64,
    /// Extrusion depth of the bottom cutter below `z = 0`.
    pub bottom_depth: f64,
    /// Extrusion height of the top cutter above the thread.
    pub top_height: f64,
}

/// Axial pattern of a single swept revolution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PatternPlan {
    pub count: u32,
    pub spacing: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreadGeometry {
    pub pass: ThreadPass,
    pub dims: KernelDims,
    pub profile: ToothProfile,
    /// True-offset cutter, internal pass with real offset only.
    pub cutter: Option<OffsetProfile>,
    /// Closed sketch outline handed to the sweep.
    pub outline: Vec<Point2<f64>>,
    pub helix: HelixPath,
    pub chamfers: Vec<ChamferProfile>,
    pub trim: TrimPlan,
    pub pattern: Option<PatternPlan>,
    pub start_angles: Vec<f64>,
    pub body_name: String,
    pub warnings: Vec<GeometryWarning>,
}

impl ThreadGeometry {
    /// Radius of the thread root as cut into the nut.
    pub fn root_radius(&self) -> f64 {
        self.cutter
            .as_ref()
            .map_or(self.profile.crest_radius, OffsetProfile::crest_radius)
    }

    /// Bore radius left by the pass; the core cylinder is built at this radius.
    pub fn bore_radius(&self) -> f64 {
        self.trim.core_radius
    }
}

/// Reject outlines that enclose no area or whose non-adjacent edges touch.
pub fn check_outline(points: &[Point2<f64>]) -> GeometryResult<()> {
    let pts = dedup_closed(points);
    if pts.len() < 3 || signed_area(&pts).abs() < EPSILON * EPSILON {
        return Err(GeometryError::ZeroArea);
    }

    let n = pts.len();
    for i in 0..n {
        for j in (i + 2)..n {
            // First and last edges share a vertex.
            if i == 0 && j == n - 1 {
                continue;
            }
            if segments_intersect(pts[i], pts[(i + 1) % n], pts[j], pts[(j + 1) % n]) {
                return Err(GeometryError::SelfIntersecting {
                    first: i,
                    second: j,
                });
            }
        }
    }
    Ok(())
}

/// `M{OD}_{pitch}Px{Ht}mm_{hand}_{top}D_{bot}D_{sPts}spts_{guide}_Guide`
pub fn body_name(spec: &ThreadSpec) -> String {
    let guide = match spec.rail {
        GuideRail::Centerline => "Centerline",
        GuideRail::OuterHelix => spec.guide.label(),
    };
    format!(
        "M{}_{}Px{}{}_{}_{}D_{}D_{}spts_{}_Guide",
        spec.diameter,
        spec.pitch,
        spec.height,
        spec.unit.suffix(),
        spec.hand.code(),
        spec.angle_top,
        spec.angle_bottom,
        spec.spline_points,
        guide
    )
}

pub fn nut_body_name(spec: &ThreadSpec) -> String {
    format!("M{}_Nut", spec.diameter)
}

/// `core_radius` is the bore the pass leaves: the minor radius, or the
/// offset land when a true-offset cutter is used.
fn trim_plan(profile: &ToothProfile, dims: &KernelDims, core_radius: f64) -> TrimPlan {
    TrimPlan {
        core_radius,
        core_height: dims.height,
        trim_radius: dims.diameter / 2.0 + CORE_OVERLAP,
        bottom_depth: 2.0 * profile.flanks.yb_bottom.abs() + 2.0 * dims.pitch,
        top_height: 2.0 * profile.flanks.yb_top.abs() + 2.0 * dims.pitch,
    }
}

/// Compute all geometry for one pass of `spec`, in kernel units.
pub fn compute_thread_geometry(
    spec: &ThreadSpec,
    pass: ThreadPass,
) -> GeometryResult<ThreadGeometry> {
    spec.validate()?;
    check_square_clearance(spec, pass)?;
    let dims = spec.kernel_dims();

    let profile = calculate_profile(spec, pass);

    let mut warnings = Vec::new();
    let cutter = match pass {
        ThreadPass::Internal if spec.real_offset => {
            let cutter = offset_profile(&profile, dims.gap)?;
            if let Some(w) = cutter.overlap {
                warnings.push(GeometryWarning::Overlap(w));
            }
            Some(cutter)
        }
        _ => None,
    };

    let outline = match &cutter {
        Some(c) => c.outline(),
        None => profile.outline(),
    };
    check_outline(&outline)?;

    let revolutions = revolutions_for(dims.height, dims.helix_pitch)?;
    let outer_radius = cutter
        .as_ref()
        .map_or(profile.crest_radius, OffsetProfile::crest_radius);
    let helix = generate_helix(&HelixParams {
        inner_radius: profile.core_radius,
        outer_radius,
        lead: dims.helix_pitch,
        revolutions,
        points_per_revolution: spec.spline_points,
        hand: spec.hand,
        guide: spec.guide,
        rail: spec.rail,
        height: dims.height,
    })?;

    let pattern = match spec.guide {
        GuideMode::Pattern => Some(PatternPlan {
            count: revolutions,
            spacing: dims.helix_pitch,
        }),
        GuideMode::Helix | GuideMode::LongHelix => None,
    };

    let bore = profile.minor_radius + cutter.as_ref().map_or(0.0, |c| c.gap);
    let mut geometry = ThreadGeometry {
        pass,
        dims,
        trim: trim_plan(&profile, &dims, bore),
        profile,
        cutter,
        outline,
        helix,
        chamfers: Vec::new(),
        pattern,
        start_angles: rotation_angles(spec.starts),
        body_name: match pass {
            ThreadPass::External => body_name(spec),
            ThreadPass::Internal => format!("{}_Internal", body_name(spec)),
        },
        warnings,
    };

    if let Some(width) = dims.chamfer {
        geometry.chamfers = match pass {
            ThreadPass::External => vec![crest_chamfer(
                geometry.profile.crest_radius,
                dims.height,
                width,
            )?],
            ThreadPass::Internal => {
                let root = geometry.root_radius();
                let bore = geometry.bore_radius();
                vec![
                    nut_face_chamfer(root, bore, dims.pitch, NutFace::Bottom, width)?,
                    nut_face_chamfer(root, bore, dims.height - dims.pitch, NutFace::Top, width)?,
                ]
            }
        };
    }

    Ok(geometry)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_outline_accepts_rectangle() {
        let pts = [
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(0.0, 1.0),
        ];
        assert!(check_outline(&pts).is_ok());
    }

    #[test]
    fn test_check_outline_rejects_bowtie() {
        let pts = [
            Point2::new(0.0, 0.0),
            Point2::new(2.0, 1.0),
            Point2::new(2.0, 0.0),
            Point2::new(0.0, 2.0),
        ];
        assert_eq!(
            check_outline(&pts),
            Err(GeometryError::SelfIntersecting { first: 0, second: 2 })
        );
    }

    #[test]
    fn test_check_outline_rejects_flat() {
        let pts = [
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(2.0, 0.0),
        ];
        assert_eq!(check_outline(&pts), Err(GeometryError::ZeroArea));
    }

    #[test]
    fn test_body_name() {
        assert_eq!(
            body_name(&ThreadSpec::default()),
            "M6_1Px5mm_R_30D_30D_18spts_Helix_Guide"
        );
        assert_eq!(nut_body_name(&ThreadSpec::default()), "M6_Nut");

        let centerline = ThreadSpec {
            rail: GuideRail::Centerline,
            ..Default::default()
        };
        assert_eq!(
            body_name(&centerline),
            "M6_1Px5mm_R_30D_30D_18spts_Centerline_Guide"
        );
    }
}
