//! Solid-modeling kernel contract.
//!
//! The geometry stages never touch solids. A CAD host implements
//! [`GeometryKernel`] and the [`ThreadBuilder`](crate::ThreadBuilder) drives
//! it. All lengths are kernel units (cm); angles are degrees; the thread axis
//! is +z through the origin.

use crate::error::KernelResult;
use nalgebra::{Point2, Point3};
use serde::{Deserialize, Serialize};

macro_rules! kernel_handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(pub u64);
    };
}

kernel_handle!(
    /// A sketch plane.
    PlaneId
);
kernel_handle!(
    /// A closed sketch profile usable by extrude, sweep and revolve.
    ProfileId
);
kernel_handle!(
    /// An open sketch curve.
    CurveId
);
kernel_handle!(
    /// A sweep path or guide rail.
    PathId
);
kernel_handle!(
    /// A solid body.
    BodyId
);

/// Orientation of a sketch plane relative to the thread axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaneKind {
    /// Contains the axis; sketch x is the radius, sketch y is z.
    Radial,
    /// Normal to the axis, offset along it.
    Transverse,
}

/// How a feature combines with existing bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeatureOp {
    /// Union into the target body.
    Join(BodyId),
    /// Subtract from the target body.
    Cut(BodyId),
    NewBody,
}

pub trait GeometryKernel {
    fn create_sketch_plane(&mut self, kind: PlaneKind, offset: f64) -> KernelResult<PlaneId>;

    /// Closed polyline; the last point connects back to the first.
    fn add_polyline(&mut self, plane: PlaneId, points: &[Point2<f64>]) -> KernelResult<ProfileId>;

    fn add_spline(&mut self, plane: PlaneId, points: &[Point3<f64>]) -> KernelResult<CurveId>;

    fn add_line(&mut self, plane: PlaneId, a: Point3<f64>, b: Point3<f64>) -> KernelResult<CurveId>;

    /// Circle centered on the axis.
    fn add_circle(&mut self, plane: PlaneId, radius: f64) -> KernelResult<ProfileId>;

    fn create_path(&mut self, curve: CurveId) -> KernelResult<PathId>;

    /// Extrude along the axis; negative heights extrude downward.
    fn extrude(&mut self, profile: ProfileId, height: f64, op: FeatureOp) -> KernelResult<BodyId>;

    fn sweep(
        &mut self,
        profile: ProfileId,
        path: PathId,
        guide_rail: PathId,
        op: FeatureOp,
    ) -> KernelResult<BodyId>;

    /// Revolve about the thread axis.
    fn revolve(&mut self, profile: ProfileId, angle: f64, op: FeatureOp) -> KernelResult<BodyId>;

    /// Axial pattern of `count` instances `spacing` apart, merged into one body.
    fn pattern(&mut self, body: BodyId, count: u32, spacing: f64) -> KernelResult<BodyId>;

    /// Copy `source`, rotate the copy by `angle` about the axis and union it into `target`.
    fn rotate_and_union(&mut self, target: BodyId, source: BodyId, angle: f64)
        -> KernelResult<BodyId>;

    fn boolean_subtract(&mut self, target: BodyId, tool: BodyId) -> KernelResult<BodyId>;

    fn set_visible(&mut self, body: BodyId, visible: bool) -> KernelResult<()>;
}
