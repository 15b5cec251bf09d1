//! Multi-start composition.
//!
//! Each rotation duplicates the body built so far, turns the copy about the
//! thread axis and unions it back. Two starts need one half turn; four
//! starts need a quarter turn followed by a half turn of the doubled body.

use threadtune_core::StartCount;

/// Rotations (degrees) to apply in order.
pub fn rotation_angles(starts: StartCount) -> Vec<f64> {
    match starts {
        StartCount::One => Vec::new(),
        StartCount::Two => vec![180.0],
        StartCount::Four => vec![90.0, 180.0],
    }
}

/// Phase of every start after applying [`rotation_angles`], sorted.
pub fn covered_angles(starts: StartCount) -> Vec<f64> {
    let mut phases = vec![0.0_f64];
    for angle in rotation_angles(starts) {
        let rotated: Vec<f64> = phases.iter().map(|p| (p + angle) % 360.0).collect();
        phases.extend(rotated);
    }
    phases.sort_by(f64::total_cmp);
    phases
}
