// Integration tests for the command-line build helpers

use threadtune::{
    build_script, selection_geometry, KernelOp, RecordStore, ThreadPass, ThreadRecord,
    ThreadSelection,
};

#[test]
fn test_default_record_builds_bolt_and_nut() {
    let record = ThreadRecord::default();
    assert_eq!(record.selection, ThreadSelection::BoltAndNut);

    let passes = selection_geometry(&record).unwrap();
    assert_eq!(passes.len(), 2);
    assert_eq!(passes[0].pass, ThreadPass::External);
    assert_eq!(passes[1].pass, ThreadPass::Internal);
    // Nut thread runs one pitch past each face: 7 mm, so 8 revolutions of 18 points.
    assert_eq!(passes[1].helix.len(), 8 * 18 + 1);

    let (report, ops) = build_script(&record).unwrap();
    assert_eq!(report.bodies.len(), 2);
    assert_eq!(
        report.bodies[0].name,
        "M6_1Px5mm_R_30D_30D_18spts_Helix_Guide"
    );
    assert_eq!(report.bodies[1].name, "M6_Nut");

    let visibility: Vec<bool> = ops
        .iter()
        .filter_map(|op| match op {
            KernelOp::Visibility { visible, .. } => Some(*visible),
            _ => None,
        })
        .collect();
    assert_eq!(visibility, vec![false, true]);
}

#[test]
fn test_external_selection_has_single_pass() {
    let record = ThreadRecord {
        selection: ThreadSelection::External,
        ..Default::default()
    };
    let passes = selection_geometry(&record).unwrap();
    assert_eq!(passes.len(), 1);
    assert_eq!(passes[0].helix.len(), 6 * 18 + 1);

    let (report, ops) = build_script(&record).unwrap();
    assert_eq!(report.bodies.len(), 1);
    assert!(matches!(ops[0], KernelOp::SketchPlane { .. }));
    assert!(ops
        .iter()
        .any(|op| matches!(op, KernelOp::Sweep { .. })));
}

#[test]
fn test_script_serializes_to_json() {
    let record = ThreadRecord {
        selection: ThreadSelection::Internal,
        ..Default::default()
    };
    let (_, ops) = build_script(&record).unwrap();
    let json = serde_json::to_value(&ops).unwrap();
    let tags: Vec<&str> = json
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|op| op["op"].as_str())
        .collect();
    assert_eq!(tags.len(), ops.len());
    assert!(tags.contains(&"sweep"));
    assert!(!tags.contains(&"visibility"));
}

#[test]
fn test_record_from_disk_drives_build() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("DialogInput_V3.txt");
    std::fs::write(&path, "8,1.25,1.25,10,30,30,24,P,L,1,3,6,13,5.5,6,13,6.5,0.2,0.5,Y,N,M\n")
        .unwrap();

    let parsed = RecordStore::new(&path).load().unwrap();
    assert!(parsed.substitutions.is_empty());

    let (report, ops) = build_script(&parsed.record).unwrap();
    assert_eq!(report.bodies.len(), 1);
    assert!(ops
        .iter()
        .any(|op| matches!(op, KernelOp::Pattern { .. })));
}
