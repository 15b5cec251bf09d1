//! # Thread Builder
//!
//! Turns computed [`ThreadGeometry`] into solids through a
//! [`GeometryKernel`]. The external pass builds the bolt thread, the internal
//! pass builds a cutter and subtracts it from the nut. A mating pair hides the
//! bolt while the nut is cut so the bolt is not consumed by the subtraction.

use crate::chamfer::ChamferProfile;
use crate::error::{BuildResult, KernelResult};
use crate::hardware::{nut_thread_spec, BoltHead, NutBody, RegularPolygon};
use crate::kernel::{BodyId, FeatureOp, GeometryKernel, PlaneKind};
use crate::pipeline::{
    compute_thread_geometry, nut_body_name, GeometryWarning, PatternPlan, ThreadGeometry, TrimPlan,
};
use serde::{Deserialize, Serialize};
use threadtune_core::{PolygonDims, ThreadPass, ThreadSelection, ThreadSpec};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuiltBody {
    pub name: String,
    pub body: BodyId,
    pub pass: ThreadPass,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BuildReport {
    pub bodies: Vec<BuiltBody>,
    pub warnings: Vec<GeometryWarning>,
    /// Set when the core join had to be retried after the end trims.
    pub core_join_retried: bool,
}

impl BuildReport {
    pub fn merge(&mut self, other: BuildReport) {
        self.bodies.extend(other.bodies);
        self.warnings.extend(other.warnings);
        self.core_join_retried |= other.core_join_retried;
    }

    pub fn body(&self, pass: ThreadPass) -> Option<BodyId> {
        self.bodies.iter().find(|b| b.pass == pass).map(|b| b.body)
    }
}

pub struct ThreadBuilder<K: GeometryKernel> {
    kernel: K,
}

impl<K: GeometryKernel> ThreadBuilder<K> {
    pub fn new(kernel: K) -> Self {
        Self { kernel }
    }

    pub fn kernel(&self) -> &K {
        &self.kernel
    }

    pub fn into_kernel(self) -> K {
        self.kernel
    }

    /// Build whatever `selection` asks for.
    pub fn build_selection(
        &mut self,
        spec: &ThreadSpec,
        selection: ThreadSelection,
        bolt_head: &PolygonDims,
        nut: &PolygonDims,
    ) -> BuildResult<BuildReport> {
        info!(?selection, "Building thread selection");
        match selection {
            ThreadSelection::External => self.build_external(spec, None),
            ThreadSelection::Bolt => self.build_external(spec, Some(bolt_head)),
            ThreadSelection::Internal => self.build_internal(spec, None),
            ThreadSelection::Nut => self.build_internal(spec, Some(nut)),
            ThreadSelection::BoltAndNut => self.build_mating_pair(spec, Some(bolt_head), nut),
        }
    }

    /// Bolt thread: sweep, pattern, core and end trims, crest chamfer,
    /// multi-start copies, optional head.
    pub fn build_external(
        &mut self,
        spec: &ThreadSpec,
        head: Option<&PolygonDims>,
    ) -> BuildResult<BuildReport> {
        let geometry = compute_thread_geometry(spec, ThreadPass::External)?;
        let head = head
            .map(|dims| BoltHead::from_dims(dims, spec.unit))
            .transpose()?;
        info!(name = %geometry.body_name, "Building external thread");

        let mut body = self.sweep_outline(&geometry)?;
        body = self.apply_pattern(geometry.pattern, body)?;

        let mut retried = false;
        body = match self.join_core(&geometry.trim, body) {
            Ok(joined) => self.trim_ends(&geometry.trim, joined)?,
            Err(err) => {
                warn!(error = %err, "Core join failed; retrying with end trims first");
                retried = true;
                let trimmed = self.trim_ends(&geometry.trim, body)?;
                self.join_core(&geometry.trim, trimmed)?
            }
        };

        body = self.cut_chamfers(&geometry.chamfers, body)?;
        body = self.compose_starts(&geometry.start_angles, body)?;

        if let Some(head) = head {
            debug!(sides = head.polygon.sides, height = head.height, "Adding bolt head");
            body = self.polygon_prism(&head.polygon, 0.0, -head.height, FeatureOp::Join(body))?;
        }

        Ok(BuildReport {
            bodies: vec![BuiltBody {
                name: geometry.body_name,
                body,
                pass: ThreadPass::External,
            }],
            warnings: geometry.warnings,
            core_join_retried: retried,
        })
    }

    /// Internal thread. With a nut the thread runs one pitch past each face,
    /// the cutter is subtracted from the nut and the faces are chamfered.
    /// Without one the cutter body itself is the result.
    pub fn build_internal(
        &mut self,
        spec: &ThreadSpec,
        nut: Option<&PolygonDims>,
    ) -> BuildResult<BuildReport> {
        let (thread_spec, nut_body) = match nut {
            Some(dims) => (nut_thread_spec(spec, dims), Some(NutBody::from_dims(dims, spec)?)),
            None => (spec.clone(), None),
        };
        let geometry = compute_thread_geometry(&thread_spec, ThreadPass::Internal)?;
        for w in &geometry.warnings {
            warn!("{}", w);
        }
        info!(name = %geometry.body_name, nut = nut_body.is_some(), "Building internal thread");

        let nut_id = match &nut_body {
            Some(n) => Some(self.polygon_prism(
                &n.polygon,
                n.plane_offset,
                n.height,
                FeatureOp::NewBody,
            )?),
            None => None,
        };

        let mut tool = self.sweep_outline(&geometry)?;
        tool = self.apply_pattern(geometry.pattern, tool)?;
        tool = self.join_core(&geometry.trim, tool)?;
        tool = self.compose_starts(&geometry.start_angles, tool)?;

        let built = match nut_id {
            Some(nut_id) => {
                let mut nut_id = self.kernel.boolean_subtract(nut_id, tool)?;
                nut_id = self.cut_chamfers(&geometry.chamfers, nut_id)?;
                BuiltBody {
                    name: nut_body_name(spec),
                    body: nut_id,
                    pass: ThreadPass::Internal,
                }
            }
            None => BuiltBody {
                name: geometry.body_name,
                body: tool,
                pass: ThreadPass::Internal,
            },
        };

        Ok(BuildReport {
            bodies: vec![built],
            warnings: geometry.warnings,
            core_join_retried: false,
        })
    }

    /// Bolt then nut; the bolt stays hidden while the nut is cut.
    pub fn build_mating_pair(
        &mut self,
        spec: &ThreadSpec,
        head: Option<&PolygonDims>,
        nut: &PolygonDims,
    ) -> BuildResult<BuildReport> {
        let mut report = self.build_external(spec, head)?;
        let bolt = report.bodies[0].body;

        self.kernel.set_visible(bolt, false)?;
        let internal = self.build_internal(spec, Some(nut))?;
        self.kernel.set_visible(bolt, true)?;

        report.merge(internal);
        Ok(report)
    }

    fn sweep_outline(&mut self, geometry: &ThreadGeometry) -> KernelResult<BodyId> {
        let k = &mut self.kernel;
        let plane = k.create_sketch_plane(PlaneKind::Radial, 0.0)?;
        let profile = k.add_polyline(plane, &geometry.outline)?;

        let helix = &geometry.helix;
        let path_curve = k.add_spline(plane, &helix.inner)?;
        let path = k.create_path(path_curve)?;
        let rail_curve = match &helix.outer {
            Some(outer) => k.add_spline(plane, outer)?,
            None => k.add_line(plane, helix.centerline[0], helix.centerline[1])?,
        };
        let rail = k.create_path(rail_curve)?;

        debug!(points = helix.len(), guide = %helix.guide, "Sweeping tooth profile");
        k.sweep(profile, path, rail, FeatureOp::NewBody)
    }

    fn apply_pattern(&mut self, pattern: Option<PatternPlan>, body: BodyId) -> KernelResult<BodyId> {
        match pattern {
            Some(p) => self.kernel.pattern(body, p.count, p.spacing),
            None => Ok(body),
        }
    }

    fn join_core(&mut self, trim: &TrimPlan, body: BodyId) -> KernelResult<BodyId> {
        let plane = self.kernel.create_sketch_plane(PlaneKind::Transverse, 0.0)?;
        let circle = self.kernel.add_circle(plane, trim.core_radius)?;
        self.kernel
            .extrude(circle, trim.core_height, FeatureOp::Join(body))
    }

    fn trim_ends(&mut self, trim: &TrimPlan, body: BodyId) -> KernelResult<BodyId> {
        let k = &mut self.kernel;
        let bottom = k.create_sketch_plane(PlaneKind::Transverse, 0.0)?;
        let circle = k.add_circle(bottom, trim.trim_radius)?;
        let body = k.extrude(circle, -trim.bottom_depth, FeatureOp::Cut(body))?;

        let top = k.create_sketch_plane(PlaneKind::Transverse, trim.core_height)?;
        let circle = k.add_circle(top, trim.trim_radius)?;
        k.extrude(circle, trim.top_height, FeatureOp::Cut(body))
    }

    fn cut_chamfers(&mut self, chamfers: &[ChamferProfile], mut body: BodyId) -> KernelResult<BodyId> {
        for chamfer in chamfers {
            let plane = self.kernel.create_sketch_plane(PlaneKind::Radial, 0.0)?;
            let profile = self.kernel.add_polyline(plane, &chamfer.points)?;
            body = self.kernel.revolve(profile, 360.0, FeatureOp::Cut(body))?;
        }
        Ok(body)
    }

    fn compose_starts(&mut self, angles: &[f64], mut body: BodyId) -> KernelResult<BodyId> {
        for &angle in angles {
            body = self.kernel.rotate_and_union(body, body, angle)?;
        }
        Ok(body)
    }

    fn polygon_prism(
        &mut self,
        polygon: &RegularPolygon,
        offset: f64,
        height: f64,
        op: FeatureOp,
    ) -> KernelResult<BodyId> {
        let plane = self.kernel.create_sketch_plane(PlaneKind::Transverse, offset)?;
        let profile = self.kernel.add_polyline(plane, &polygon.vertices())?;
        self.kernel.extrude(profile, height, op)
    }
}
