// Integration tests for driving a kernel through ThreadBuilder

mod common;

use common::{Call, RecordingKernel};
use threadtune_core::{GuideMode, GuideRail, PolygonDims, StartCount, ThreadSelection, ThreadSpec};
use threadtune_geometry::{BuildError, FeatureOp, KernelError, ThreadBuilder, ThreadPass};

fn bolt_head() -> PolygonDims {
    PolygonDims {
        sides: 6,
        across_flats: 10.0,
        height: 4.0,
    }
}

fn nut() -> PolygonDims {
    PolygonDims {
        sides: 6,
        across_flats: 10.0,
        height: 5.0,
    }
}

fn is_join(c: &Call) -> bool {
    matches!(c, Call::Extrude(_, FeatureOp::Join(_)))
}

fn is_cut(c: &Call) -> bool {
    matches!(c, Call::Extrude(_, FeatureOp::Cut(_)))
}

#[test]
fn test_external_build_order() {
    let mut builder = ThreadBuilder::new(RecordingKernel::new());
    let report = builder.build_external(&ThreadSpec::default(), None).unwrap();
    let kernel = builder.into_kernel();

    assert_eq!(report.bodies.len(), 1);
    assert_eq!(report.bodies[0].pass, ThreadPass::External);
    assert_eq!(report.bodies[0].name, "M6_1Px5mm_R_30D_30D_18spts_Helix_Guide");
    assert!(!report.core_join_retried);

    // Sweep path and outer rail both carry 18 * 6 + 1 samples.
    assert_eq!(kernel.count(|c| *c == Call::Spline(109)), 2);
    assert_eq!(kernel.count(|c| *c == Call::Polyline(6)), 1);

    let sweep = kernel.position(|c| matches!(c, Call::Sweep(FeatureOp::NewBody))).unwrap();
    let join = kernel.position(is_join).unwrap();
    let cut = kernel.position(is_cut).unwrap();
    assert!(sweep < join);
    assert!(join < cut);
    assert_eq!(kernel.count(is_cut), 2);
    assert_eq!(kernel.count(|c| matches!(c, Call::RotateAndUnion(..))), 0);
}

#[test]
fn test_core_join_retried_after_trims() {
    let kernel = RecordingKernel {
        failing_joins: 1,
        ..Default::default()
    };
    let mut builder = ThreadBuilder::new(kernel);
    let report = builder.build_external(&ThreadSpec::default(), None).unwrap();
    let kernel = builder.into_kernel();

    assert!(report.core_join_retried);
    assert_eq!(kernel.count(is_join), 2);
    let last_join = kernel.calls.iter().rposition(is_join).unwrap();
    let last_cut = kernel.calls.iter().rposition(is_cut).unwrap();
    assert!(last_cut < last_join);
}

#[test]
fn test_second_join_failure_propagates() {
    let kernel = RecordingKernel {
        failing_joins: 2,
        ..Default::default()
    };
    let mut builder = ThreadBuilder::new(kernel);
    let err = builder
        .build_external(&ThreadSpec::default(), None)
        .unwrap_err();
    assert_eq!(
        err,
        BuildError::Kernel(KernelError::failed(
            "extrude",
            "join produced invalid topology"
        ))
    );
}

#[test]
fn test_cut_failure_is_not_retried() {
    let kernel = RecordingKernel {
        fail_cuts: true,
        ..Default::default()
    };
    let mut builder = ThreadBuilder::new(kernel);
    let err = builder
        .build_external(&ThreadSpec::default(), None)
        .unwrap_err();
    assert!(matches!(err, BuildError::Kernel(_)));
    assert_eq!(builder.kernel().count(is_join), 1);
}

#[test]
fn test_invalid_spec_never_reaches_kernel() {
    let spec = ThreadSpec {
        pitch: -1.0,
        ..Default::default()
    };
    let mut builder = ThreadBuilder::new(RecordingKernel::new());
    let err = builder.build_external(&spec, None).unwrap_err();
    assert!(matches!(err, BuildError::Geometry(_)));
    assert!(builder.kernel().calls.is_empty());
}

#[test]
fn test_four_start_rotations() {
    let spec = ThreadSpec {
        starts: StartCount::Four,
        helix_pitch: 4.0,
        ..Default::default()
    };
    let mut builder = ThreadBuilder::new(RecordingKernel::new());
    builder.build_external(&spec, None).unwrap();
    let angles: Vec<f64> = builder
        .kernel()
        .calls
        .iter()
        .filter_map(|c| match c {
            Call::RotateAndUnion(_, a) => Some(*a),
            _ => None,
        })
        .collect();
    assert_eq!(angles, vec![90.0, 180.0]);
}

#[test]
fn test_pattern_mode_patterns_one_revolution() {
    let spec = ThreadSpec {
        guide: GuideMode::Pattern,
        ..Default::default()
    };
    let mut builder = ThreadBuilder::new(RecordingKernel::new());
    builder.build_external(&spec, None).unwrap();
    let kernel = builder.into_kernel();

    assert_eq!(kernel.count(|c| *c == Call::Spline(19)), 2);
    let pattern = kernel
        .calls
        .iter()
        .find_map(|c| match c {
            Call::Pattern(_, count, spacing) => Some((*count, *spacing)),
            _ => None,
        })
        .unwrap();
    assert_eq!(pattern.0, 6);
    assert!((pattern.1 - 0.1).abs() < 1e-12);
}

#[test]
fn test_centerline_rail_uses_axis_line() {
    let spec = ThreadSpec {
        rail: GuideRail::Centerline,
        ..Default::default()
    };
    let mut builder = ThreadBuilder::new(RecordingKernel::new());
    builder.build_external(&spec, None).unwrap();
    let kernel = builder.into_kernel();
    assert_eq!(kernel.count(|c| *c == Call::Line), 1);
    assert_eq!(kernel.count(|c| matches!(c, Call::Spline(_))), 1);
}

#[test]
fn test_long_helix_sweeps_along_outer_rail() {
    let spec = ThreadSpec {
        guide: GuideMode::LongHelix,
        ..Default::default()
    };
    let mut builder = ThreadBuilder::new(RecordingKernel::new());
    builder.build_external(&spec, None).unwrap();
    let kernel = builder.into_kernel();
    assert_eq!(kernel.count(|c| *c == Call::Line), 0);
    assert_eq!(kernel.count(|c| *c == Call::Spline(109)), 2);
    assert_eq!(kernel.count(|c| matches!(c, Call::Pattern(..))), 0);
}

#[test]
fn test_bolt_head_and_crest_chamfer() {
    let spec = ThreadSpec {
        chamfer: Some(0.5),
        ..Default::default()
    };
    let mut builder = ThreadBuilder::new(RecordingKernel::new());
    builder.build_external(&spec, Some(&bolt_head())).unwrap();
    let kernel = builder.into_kernel();

    assert_eq!(
        kernel.count(|c| matches!(c, Call::Revolve(a, FeatureOp::Cut(_)) if *a == 360.0)),
        1
    );
    let head = kernel
        .calls
        .iter()
        .rev()
        .find_map(|c| match c {
            Call::Extrude(h, FeatureOp::Join(_)) => Some(*h),
            _ => None,
        })
        .unwrap();
    assert!((head + 0.4).abs() < 1e-12);
    assert_eq!(kernel.count(|c| *c == Call::Polyline(6)), 2);
}

#[test]
fn test_mating_pair_hides_bolt_while_cutting_nut() {
    let spec = ThreadSpec {
        chamfer: Some(0.5),
        ..Default::default()
    };
    let mut builder = ThreadBuilder::new(RecordingKernel::new());
    let report = builder
        .build_mating_pair(&spec, Some(&bolt_head()), &nut())
        .unwrap();
    let kernel = builder.into_kernel();

    assert_eq!(report.bodies.len(), 2);
    assert_eq!(report.bodies[1].name, "M6_Nut");
    let bolt = report.body(ThreadPass::External).unwrap();

    let hide = kernel.position(|c| *c == Call::Visible(bolt, false)).unwrap();
    let nut_body = kernel
        .position(|c| matches!(c, Call::Extrude(_, FeatureOp::NewBody)))
        .unwrap();
    let subtract = kernel.position(|c| matches!(c, Call::Subtract(..))).unwrap();
    let show = kernel.position(|c| *c == Call::Visible(bolt, true)).unwrap();

    let first_visibility = kernel
        .position(|c| matches!(c, Call::Visible(..)))
        .unwrap();
    assert_eq!(first_visibility, hide);
    assert!(hide < nut_body);
    assert!(nut_body < subtract);
    assert!(subtract < show);

    // Nut plane sits one pitch up.
    assert!(kernel
        .calls
        .iter()
        .any(|c| matches!(c, Call::Plane(_, z) if (*z - 0.1).abs() < 1e-12)));

    // Two nut-face chamfers, cut after the subtraction.
    let nut_chamfers = kernel.calls[subtract..]
        .iter()
        .filter(|c| matches!(c, Call::Revolve(_, FeatureOp::Cut(_))))
        .count();
    assert_eq!(nut_chamfers, 2);
}

#[test]
fn test_internal_selection_without_nut() {
    let mut builder = ThreadBuilder::new(RecordingKernel::new());
    let report = builder
        .build_selection(
            &ThreadSpec::default(),
            ThreadSelection::Internal,
            &bolt_head(),
            &nut(),
        )
        .unwrap();
    let kernel = builder.into_kernel();

    assert_eq!(report.bodies.len(), 1);
    assert_eq!(report.bodies[0].pass, ThreadPass::Internal);
    assert_eq!(kernel.count(|c| matches!(c, Call::Subtract(..))), 0);
    assert_eq!(kernel.count(|c| matches!(c, Call::Visible(..))), 0);
}

#[test]
fn test_real_offset_overlap_is_reported() {
    let spec = ThreadSpec {
        angle_top: 0.0,
        angle_bottom: 0.0,
        gap: 2.0,
        real_offset: true,
        ..Default::default()
    };
    let mut builder = ThreadBuilder::new(RecordingKernel::new());
    let report = builder.build_internal(&spec, None).unwrap();
    assert_eq!(report.warnings.len(), 1);
}
