//! # ThreadTune Geometry
//!
//! Computes the 2-D and 3-D geometry of screw threads in kernel units (cm).
//!
//! Stages:
//! - Tooth profile from the flank angles ([`profile`])
//! - Helical sweep path ([`helix`])
//! - True parallel offset of the tooth for clearance-fit nuts ([`offset`])
//! - Crest and nut-face chamfer profiles ([`chamfer`])
//! - Multi-start rotation sets ([`multi_start`])
//! - Bolt head and nut polygons ([`hardware`])
//!
//! [`compute_thread_geometry`] runs the stages for one pass. The
//! [`ThreadBuilder`] drives a [`GeometryKernel`] implementation with the
//! results; nothing else in this crate touches solids.

pub mod builder;
pub mod chamfer;
pub mod error;
pub mod geom2d;
pub mod hardware;
pub mod helix;
pub mod kernel;
pub mod multi_start;
pub mod offset;
pub mod pipeline;
pub mod profile;

pub use builder::{BuildReport, BuiltBody, ThreadBuilder};
pub use chamfer::{crest_chamfer, nut_face_chamfer, ChamferAnchor, ChamferProfile, NutFace};
pub use error::{BuildError, BuildResult, GeometryError, GeometryResult, KernelError, KernelResult};
pub use hardware::{nut_thread_spec, BoltHead, NutBody, RegularPolygon};
pub use helix::{generate_helix, revolutions_for, HelixParams, HelixPath, MAX_HELIX_POINTS};
pub use kernel::{BodyId, CurveId, FeatureOp, GeometryKernel, PathId, PlaneId, PlaneKind, ProfileId};
pub use multi_start::{covered_angles, rotation_angles};
pub use offset::{offset_profile, OffsetProfile, OverlapWarning};
pub use pipeline::{
    body_name, check_outline, compute_thread_geometry, nut_body_name, GeometryWarning,
    PatternPlan, ThreadGeometry, TrimPlan,
};
pub use profile::{calculate_profile, check_square_clearance, FlankOffsets, ToothProfile};

pub use threadtune_core::{GuideRail, ThreadPass, ThreadSpec};

/// Radial overlap between the swept tooth and the core cylinder (cm).
pub const CORE_OVERLAP: f64 = 0.01;

/// Extra height of the centerline guide above the thread (cm).
pub const CENTERLINE_EXTENSION: f64 = 0.1;
