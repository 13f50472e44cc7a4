//! Pointer-speed (DPI) suggestion from segment analysis.
//!
//! Each segment describes one aimed movement: `total_distance` is how far the
//! pointer was meant to travel, `forward_targets` are the distances covered
//! between pauses, and `backward_target` is the overshoot distance. A pointer
//! that pauses or overshoots often is moving too far per unit of hand motion,
//! so the ratio of intended distance to those distances suggests a scale.

use crate::desc::Segment;

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

fn ratio(total: f64, divisor: f64) -> Option<f64> {
    (divisor > 0.0).then(|| total / divisor)
}

/// Ratio contributed by one segment, or `None` if it has nothing to say.
pub fn segment_ratio(segment: &Segment) -> Option<f64> {
    let total = segment.total_distance?;

    let paused = mean(&segment.forward_targets).and_then(|pd| ratio(total, pd));
    let overshoot = segment.backward_target.and_then(|os| ratio(total, os));

    match (paused, overshoot) {
        (Some(p), Some(o)) => Some((p + o) / 2.0),
        (Some(p), None) => Some(p),
        (None, Some(o)) => Some(o),
        (None, None) => None,
    }
}

/// Mean of the per-segment ratios. `None` when no segment contributes.
pub fn suggest_dpi(segments: &[Segment]) -> Option<f64> {
    let ratios: Vec<f64> = segments.iter().filter_map(segment_ratio).collect();
    mean(&ratios)
}
