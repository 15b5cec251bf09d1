//! Kernel that records the build as a replayable operation script.
//!
//! Used by the command line to show what a CAD host would be asked to do
//! without linking one.

use nalgebra::{Point2, Point3};
use serde::{Deserialize, Serialize};
use threadtune_geometry::{
    BodyId, CurveId, FeatureOp, GeometryKernel, KernelError, KernelResult, PathId, PlaneId,
    PlaneKind, ProfileId,
};

/// One recorded kernel call. `id` is the handle the call returned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum KernelOp {
    SketchPlane {
        id: u64,
        kind: PlaneKind,
        offset: f64,
    },
    Polyline {
        id: u64,
        plane: PlaneId,
        points: Vec<Point2<f64>>,
    },
    Spline {
        id: u64,
        plane: PlaneId,
        points: Vec<Point3<f64>>,
    },
    Line {
        id: u64,
        plane: PlaneId,
        from: Point3<f64>,
        to: Point3<f64>,
    },
    Circle {
        id: u64,
        plane: PlaneId,
        radius: f64,
    },
    Path {
        id: u64,
        curve: CurveId,
    },
    Extrude {
        id: u64,
        profile: ProfileId,
        height: f64,
        feature: FeatureOp,
    },
    Sweep {
        id: u64,
        profile: ProfileId,
        path: PathId,
        guide_rail: PathId,
        feature: FeatureOp,
    },
    Revolve {
        id: u64,
        profile: ProfileId,
        angle: f64,
        feature: FeatureOp,
    },
    Pattern {
        id: u64,
        body: BodyId,
        count: u32,
        spacing: f64,
    },
    RotateAndUnion {
        id: u64,
        target: BodyId,
        source: BodyId,
        angle: f64,
    },
    Subtract {
        id: u64,
        target: BodyId,
        tool: BodyId,
    },
    Visibility {
        body: BodyId,
        visible: bool,
    },
}

#[derive(Debug, Default)]
pub struct ScriptKernel {
    ops: Vec<KernelOp>,
    next_id: u64,
}

impl ScriptKernel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ops(&self) -> &[KernelOp] {
        &self.ops
    }

    pub fn into_ops(self) -> Vec<KernelOp> {
        self.ops
    }

    fn next(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    /// Rejects handles this kernel never issued.
    fn check(&self, operation: &str, ids: &[u64]) -> KernelResult<()> {
        match ids.iter().find(|&&id| id == 0 || id > self.next_id) {
            Some(id) => Err(KernelError::failed(
                operation,
                format!("unknown handle {}", id),
            )),
            None => Ok(()),
        }
    }
}

impl GeometryKernel for ScriptKernel {
    fn create_sketch_plane(&mut self, kind: PlaneKind, offset: f64) -> KernelResult<PlaneId> {
        let id = self.next();
        self.ops.push(KernelOp::SketchPlane { id, kind, offset });
        Ok(PlaneId(id))
    }

    fn add_polyline(&mut self, plane: PlaneId, points: &[Point2<f64>]) -> KernelResult<ProfileId> {
        self.check("add_polyline", &[plane.0])?;
        if points.len() < 3 {
            return Err(KernelError::failed(
                "add_polyline",
                format!("closed profile needs 3 points, got {}", points.len()),
            ));
        }
        let id = self.next();
        self.ops.push(KernelOp::Polyline {
            id,
            plane,
            points: points.to_vec(),
        });
        Ok(ProfileId(id))
    }

    fn add_spline(&mut self, plane: PlaneId, points: &[Point3<f64>]) -> KernelResult<CurveId> {
        self.check("add_spline", &[plane.0])?;
        let id = self.next();
        self.ops.push(KernelOp::Spline {
            id,
            plane,
            points: points.to_vec(),
        });
        Ok(CurveId(id))
    }

    fn add_line(&mut self, plane: PlaneId, a: Point3<f64>, b: Point3<f64>) -> KernelResult<CurveId> {
        self.check("add_line", &[plane.0])?;
        let id = self.next();
        self.ops.push(KernelOp::Line {
            id,
            plane,
            from: a,
            to: b,
        });
        Ok(CurveId(id))
    }

    fn add_circle(&mut self, plane: PlaneId, radius: f64) -> KernelResult<ProfileId> {
        self.check("add_circle", &[plane.0])?;
        let id = self.next();
        self.ops.push(KernelOp::Circle { id, plane, radius });
        Ok(ProfileId(id))
    }

    fn create_path(&mut self, curve: CurveId) -> KernelResult<PathId> {
        self.check("create_path", &[curve.0])?;
        let id = self.next();
        self.ops.push(KernelOp::Path { id, curve });
        Ok(PathId(id))
    }

    fn extrude(&mut self, profile: ProfileId, height: f64, op: FeatureOp) -> KernelResult<BodyId> {
        self.check("extrude", &[profile.0])?;
        let id = self.next();
        self.ops.push(KernelOp::Extrude {
            id,
            profile,
            height,
            feature: op,
        });
        Ok(BodyId(id))
    }

    fn sweep(
        &mut self,
        profile: ProfileId,
        path: PathId,
        guide_rail: PathId,
        op: FeatureOp,
    ) -> KernelResult<BodyId> {
        self.check("sweep", &[profile.0, path.0, guide_rail.0])?;
        let id = self.next();
        self.ops.push(KernelOp::Sweep {
            id,
            profile,
            path,
            guide_rail,
            feature: op,
        });
        Ok(BodyId(id))
    }

    fn revolve(&mut self, profile: ProfileId, angle: f64, op: FeatureOp) -> KernelResult<BodyId> {
        self.check("revolve", &[profile.0])?;
        let id = self.next();
        self.ops.push(KernelOp::Revolve {
            id,
            profile,
            angle,
            feature: op,
        });
        Ok(BodyId(id))
    }

    fn pattern(&mut self, body: BodyId, count: u32, spacing: f64) -> KernelResult<BodyId> {
        self.check("pattern", &[body.0])?;
        let id = self.next();
        self.ops.push(KernelOp::Pattern {
            id,
            body,
            count,
            spacing,
        });
        Ok(BodyId(id))
    }

    fn rotate_and_union(
        &mut self,
        target: BodyId,
        source: BodyId,
        angle: f64,
    ) -> KernelResult<BodyId> {
        self.check("rotate_and_union", &[target.0, source.0])?;
        let id = self.next();
        self.ops.push(KernelOp::RotateAndUnion {
            id,
            target,
            source,
            angle,
        });
        Ok(BodyId(id))
    }

    fn boolean_subtract(&mut self, target: BodyId, tool: BodyId) -> KernelResult<BodyId> {
        self.check("boolean_subtract", &[target.0, tool.0])?;
        let id = self.next();
        self.ops.push(KernelOp::Subtract { id, target, tool });
        Ok(BodyId(id))
    }

    fn set_visible(&mut self, body: BodyId, visible: bool) -> KernelResult<()> {
        self.check("set_visible", &[body.0])?;
        self.ops.push(KernelOp::Visibility { body, visible });
        Ok(())
    }
}
