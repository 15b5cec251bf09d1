//! In-memory kernel that records every call for ordering assertions.

#![allow(dead_code)]

use nalgebra::{Point2, Point3};
use threadtune_geometry::{
    BodyId, CurveId, FeatureOp, GeometryKernel, KernelError, KernelResult, PathId, PlaneId,
    PlaneKind, ProfileId,
};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Plane(PlaneKind, f64),
    Polyline(usize),
    Spline(usize),
    Line,
    Circle(f64),
    Path,
    Extrude(f64, FeatureOp),
    Sweep(FeatureOp),
    Revolve(f64, FeatureOp),
    Pattern(BodyId, u32, f64),
    RotateAndUnion(BodyId, f64),
    Subtract(BodyId, BodyId),
    Visible(BodyId, bool),
}

#[derive(Debug, Default)]
pub struct RecordingKernel {
    pub calls: Vec<Call>,
    pub next_id: u64,
    /// Number of `Join` extrusions to reject before succeeding.
    pub failing_joins: u32,
    /// Reject every `Cut` extrusion.
    pub fail_cuts: bool,
}

impl RecordingKernel {
    pub fn new() -> Self {
        Self::default()
    }

    fn id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    /// Position of the first call matching `pred`.
    pub fn position(&self, pred: impl Fn(&Call) -> bool) -> Option<usize> {
        self.calls.iter().position(pred)
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls.iter().filter(|c| pred(c)).count()
    }
}

impl GeometryKernel for RecordingKernel {
    fn create_sketch_plane(&mut self, kind: PlaneKind, offset: f64) -> KernelResult<PlaneId> {
        self.calls.push(Call::Plane(kind, offset));
        Ok(PlaneId(self.id()))
    }

    fn add_polyline(&mut self, _plane: PlaneId, points: &[Point2<f64>]) -> KernelResult<ProfileId> {
        self.calls.push(Call::Polyline(points.len()));
        Ok(ProfileId(self.id()))
    }

    fn add_spline(&mut self, _plane: PlaneId, points: &[Point3<f64>]) -> KernelResult<CurveId> {
        self.calls.push(Call::Spline(points.len()));
        Ok(CurveId(self.id()))
    }

    fn add_line(&mut self, _plane: PlaneId, _a: Point3<f64>, _b: Point3<f64>) -> KernelResult<CurveId> {
        self.calls.push(Call::Line);
        Ok(CurveId(self.id()))
    }

    fn add_circle(&mut self, _plane: PlaneId, radius: f64) -> KernelResult<ProfileId> {
        self.calls.push(Call::Circle(radius));
        Ok(ProfileId(self.id()))
    }

    fn create_path(&mut self, _curve: CurveId) -> KernelResult<PathId> {
        self.calls.push(Call::Path);
        Ok(PathId(self.id()))
    }

    fn extrude(&mut self, _profile: ProfileId, height: f64, op: FeatureOp) -> KernelResult<BodyId> {
        self.calls.push(Call::Extrude(height, op));
        match op {
            FeatureOp::Join(_) if self.failing_joins > 0 => {
                self.failing_joins -= 1;
                Err(KernelError::failed("extrude", "join produced invalid topology"))
            }
            FeatureOp::Cut(_) if self.fail_cuts => {
                Err(KernelError::failed("extrude", "cut failed"))
            }
            FeatureOp::Join(target) | FeatureOp::Cut(target) => Ok(target),
            FeatureOp::NewBody => Ok(BodyId(self.id())),
        }
    }

    fn sweep(
        &mut self,
        _profile: ProfileId,
        _path: PathId,
        _guide_rail: PathId,
        op: FeatureOp,
    ) -> KernelResult<BodyId> {
        self.calls.push(Call::Sweep(op));
        Ok(BodyId(self.id()))
    }

    fn revolve(&mut self, _profile: ProfileId, angle: f64, op: FeatureOp) -> KernelResult<BodyId> {
        self.calls.push(Call::Revolve(angle, op));
        match op {
            FeatureOp::Join(target) | FeatureOp::Cut(target) => Ok(target),
            FeatureOp::NewBody => Ok(BodyId(self.id())),
        }
    }

    fn pattern(&mut self, body: BodyId, count: u32, spacing: f64) -> KernelResult<BodyId> {
        self.calls.push(Call::Pattern(body, count, spacing));
        Ok(body)
    }

    fn rotate_and_union(
        &mut self,
        target: BodyId,
        _source: BodyId,
        angle: f64,
    ) -> KernelResult<BodyId> {
        self.calls.push(Call::RotateAndUnion(target, angle));
        Ok(target)
    }

    fn boolean_subtract(&mut self, target: BodyId, tool: BodyId) -> KernelResult<BodyId> {
        self.calls.push(Call::Subtract(target, tool));
        Ok(target)
    }

    fn set_visible(&mut self, body: BodyId, visible: bool) -> KernelResult<()> {
        self.calls.push(Call::Visible(body, visible));
        Ok(())
    }
}
