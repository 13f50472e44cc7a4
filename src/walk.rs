//! Anchor walk: translates distance targets into trajectory indices.
//!
//! Forward targets are consumed in order. Each one scans from the current
//! anchor toward higher indices until the (rounded) distance from the anchor
//! reaches the target, then the hit becomes the new anchor. An optional
//! backward target scans from `end_index` toward lower indices once.
//!
//! Scans are linear. The path may double back in space, so the distance from
//! the anchor is not monotone in index.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::desc::Segment;
use crate::error::WalkError;
use crate::trajectory::Point;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Forward,
    Backward,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Forward => f.write_str("forward"),
            Direction::Backward => f.write_str("backward"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerKind {
    ForwardHit,
    BackwardHit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Marker {
    pub index: usize,
    pub kind: MarkerKind,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WalkOptions {
    /// Stop forward scans at `end_index` and backward scans at `start_index`
    /// instead of the ends of the trajectory.
    pub clamp_to_segment: bool,
}

/// Rounds to 2 decimal digits, the granularity the analysis reports in.
#[inline]
pub fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Planar Euclidean distance rounded to 2 decimal digits.
pub fn distance(a: &Point, b: &Point) -> f64 {
    let dx = f64::from(a.x) - f64::from(b.x);
    let dy = f64::from(a.y) - f64::from(b.y);
    round2(dx.hypot(dy))
}

/// Inclusive index range a segment's scans may visit.
fn walk_bounds(len: usize, segment: &Segment, options: WalkOptions) -> Result<(usize, usize), WalkError> {
    let invalid = || WalkError::InvalidSegmentIndex {
        start: segment.start_index,
        end: segment.end_index,
        len,
    };

    if segment.start_index >= len || segment.end_index >= len {
        return Err(invalid());
    }

    if options.clamp_to_segment {
        if segment.start_index > segment.end_index {
            return Err(invalid());
        }
        Ok((segment.start_index, segment.end_index))
    } else {
        Ok((0, len - 1))
    }
}

/// Scans from `anchor` toward `boundary` (inclusive) for the first index whose
/// distance from the anchor is `>= target`.
///
/// `anchor` must lie between the lower and upper walk bounds, with `boundary`
/// on the side given by `direction`.
fn scan(
    points: &[Point],
    anchor: usize,
    target: f64,
    direction: Direction,
    boundary: usize,
) -> Result<usize, WalkError> {
    let origin = &points[anchor];
    let mut current = anchor;
    while distance(&points[current], origin) < target {
        if current == boundary {
            return Err(WalkError::UnreachableTarget {
                direction,
                target,
                anchor,
                boundary,
            });
        }
        current = match direction {
            Direction::Forward => current + 1,
            Direction::Backward => current - 1,
        };
    }
    Ok(current)
}

/// Computes the markers of one segment.
///
/// Forward hits come first, in target order, followed by the backward hit if
/// the segment has a backward target. A target `<= 0` hits the anchor itself.
pub fn walk_segment(points: &[Point], segment: &Segment, options: WalkOptions) -> Result<Vec<Marker>, WalkError> {
    let (lo, hi) = walk_bounds(points.len(), segment, options)?;

    let mut markers = Vec::with_capacity(segment.forward_targets.len() + 1);

    let mut anchor = segment.start_index;
    for &target in &segment.forward_targets {
        let hit = scan(points, anchor, target, Direction::Forward, hi)?;
        markers.push(Marker {
            index: hit,
            kind: MarkerKind::ForwardHit,
        });
        anchor = hit;
    }

    if let Some(target) = segment.backward_target {
        let hit = scan(points, segment.end_index, target, Direction::Backward, lo)?;
        markers.push(Marker {
            index: hit,
            kind: MarkerKind::BackwardHit,
        });
    }

    Ok(markers)
}

#[derive(Debug, Clone, PartialEq)]
pub struct SegmentFailure {
    pub segment_i: usize,
    pub error: WalkError,
}

/// Markers from every segment that walked cleanly, plus the failures.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Analysis {
    pub markers: Vec<Marker>,
    pub failures: Vec<SegmentFailure>,
}

impl Analysis {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Walks each segment independently; a failing segment contributes no markers.
pub fn walk_segments(points: &[Point], segments: &[Segment], options: WalkOptions) -> Analysis {
    let mut analysis = Analysis::default();

    for (segment_i, segment) in segments.iter().enumerate() {
        match walk_segment(points, segment, options) {
            Ok(markers) => {
                debug!(segment_i, markers = markers.len(), "segment walked");
                analysis.markers.extend(markers);
            }
            Err(error) => {
                warn!(segment_i, %error, "segment skipped");
                analysis.failures.push(SegmentFailure { segment_i, error });
            }
        }
    }

    analysis
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{points_from_xy, stub_segment};
    use proptest::prelude::*;

    fn line_points() -> Vec<Point> {
        points_from_xy(&[(0, 0), (0, 3), (0, 6), (0, 10)])
    }

    fn forward(index: usize) -> Marker {
        Marker {
            index,
            kind: MarkerKind::ForwardHit,
        }
    }

    fn backward(index: usize) -> Marker {
        Marker {
            index,
            kind: MarkerKind::BackwardHit,
        }
    }

    #[test]
    fn distance_is_rounded_to_hundredths() {
        let a = Point::new(0, 0, false);
        let b = Point::new(1, 1, false);
        assert_eq!(distance(&a, &b), 1.41);
        assert_eq!(distance(&a, &Point::new(1, 2, false)), 2.24);
        assert_eq!(distance(&a, &Point::new(3, 4, true)), 5.0);
        assert_eq!(round2(0.125), 0.13);
    }

    #[test]
    fn forward_hit_first_reaching_target() {
        let seg = stub_segment(0, 3, &[5.0], None);
        assert_eq!(walk_segment(&line_points(), &seg, WalkOptions::default()), Ok(vec![forward(2)]));
    }

    #[test]
    fn backward_hit_at_exact_target() {
        let seg = stub_segment(0, 3, &[], Some(4.0));
        assert_eq!(walk_segment(&line_points(), &seg, WalkOptions::default()), Ok(vec![backward(2)]));
    }

    #[test]
    fn zero_and_negative_targets_hit_the_anchor() {
        let seg = stub_segment(1, 3, &[0.0, -2.0], Some(0.0));
        assert_eq!(
            walk_segment(&line_points(), &seg, WalkOptions::default()),
            Ok(vec![forward(1), forward(1), backward(3)])
        );
    }

    #[test]
    fn targets_are_measured_from_the_new_anchor() {
        let pts = points_from_xy(&[(0, 0), (0, 2), (0, 5), (0, 7), (0, 10), (0, 12)]);
        let seg = stub_segment(0, 5, &[5.0, 5.0], None);
        // From index 0: hit at y=5 (index 2). From index 2: y=10 is the first 5 away.
        assert_eq!(walk_segment(&pts, &seg, WalkOptions::default()), Ok(vec![forward(2), forward(4)]));
    }

    #[test]
    fn first_crossing_wins_when_path_doubles_back() {
        let pts = points_from_xy(&[(0, 0), (6, 0), (1, 0), (9, 0)]);
        let seg = stub_segment(0, 3, &[5.0], None);
        assert_eq!(walk_segment(&pts, &seg, WalkOptions::default()), Ok(vec![forward(1)]));
    }

    #[test]
    fn unreachable_forward_target_stops_at_last_index() {
        let seg = stub_segment(0, 1, &[5.0, 100.0], None);
        assert_eq!(
            walk_segment(&line_points(), &seg, WalkOptions::default()),
            Err(WalkError::UnreachableTarget {
                direction: Direction::Forward,
                target: 100.0,
                anchor: 2,
                boundary: 3,
            })
        );
    }

    #[test]
    fn unreachable_backward_target_stops_at_zero() {
        let seg = stub_segment(0, 3, &[], Some(11.0));
        assert_eq!(
            walk_segment(&line_points(), &seg, WalkOptions::default()),
            Err(WalkError::UnreachableTarget {
                direction: Direction::Backward,
                target: 11.0,
                anchor: 3,
                boundary: 0,
            })
        );
    }

    #[test]
    fn positive_target_on_single_point_is_unreachable() {
        let pts = points_from_xy(&[(4, 4)]);
        let seg = stub_segment(0, 0, &[1.0], None);
        assert!(matches!(
            walk_segment(&pts, &seg, WalkOptions::default()),
            Err(WalkError::UnreachableTarget { boundary: 0, .. })
        ));
    }

    #[test]
    fn unclamped_walk_may_leave_the_segment() {
        let seg = stub_segment(0, 1, &[5.0], None);
        assert_eq!(walk_segment(&line_points(), &seg, WalkOptions::default()), Ok(vec![forward(2)]));
    }

    #[test]
    fn clamped_walk_stops_at_segment_end() {
        let clamp = WalkOptions {
            clamp_to_segment: true,
        };
        let seg = stub_segment(0, 1, &[5.0], None);
        assert_eq!(
            walk_segment(&line_points(), &seg, clamp),
            Err(WalkError::UnreachableTarget {
                direction: Direction::Forward,
                target: 5.0,
                anchor: 0,
                boundary: 1,
            })
        );

        let seg = stub_segment(2, 3, &[], Some(4.0));
        assert_eq!(walk_segment(&line_points(), &seg, clamp), Ok(vec![backward(2)]));

        let seg = stub_segment(2, 3, &[], Some(5.0));
        assert!(matches!(
            walk_segment(&line_points(), &seg, clamp),
            Err(WalkError::UnreachableTarget { boundary: 2, .. })
        ));
    }

    #[test]
    fn out_of_range_indices_are_rejected() {
        let seg = stub_segment(0, 4, &[1.0], None);
        assert_eq!(
            walk_segment(&line_points(), &seg, WalkOptions::default()),
            Err(WalkError::InvalidSegmentIndex { start: 0, end: 4, len: 4 })
        );
        let seg = stub_segment(7, 1, &[], None);
        assert!(matches!(
            walk_segment(&line_points(), &seg, WalkOptions::default()),
            Err(WalkError::InvalidSegmentIndex { .. })
        ));
        assert!(matches!(
            walk_segment(&[], &stub_segment(0, 0, &[], None), WalkOptions::default()),
            Err(WalkError::InvalidSegmentIndex { len: 0, .. })
        ));
    }

    #[test]
    fn inverted_range_only_rejected_when_clamped() {
        let seg = stub_segment(3, 1, &[], Some(3.0));
        assert_eq!(walk_segment(&line_points(), &seg, WalkOptions::default()), Ok(vec![backward(0)]));
        assert!(matches!(
            walk_segment(&line_points(), &seg, WalkOptions { clamp_to_segment: true }),
            Err(WalkError::InvalidSegmentIndex { start: 3, end: 1, .. })
        ));
    }

    #[test]
    fn failing_segment_does_not_stop_others() {
        let segs = vec![
            stub_segment(0, 3, &[5.0], None),
            stub_segment(0, 9, &[1.0], None),
            stub_segment(0, 3, &[50.0], None),
            stub_segment(0, 3, &[], Some(4.0)),
        ];
        let analysis = walk_segments(&line_points(), &segs, WalkOptions::default());
        assert_eq!(analysis.markers, vec![forward(2), backward(2)]);
        let failed: Vec<usize> = analysis.failures.iter().map(|f| f.segment_i).collect();
        assert_eq!(failed, vec![1, 2]);
        assert!(!analysis.is_clean());
    }

    fn arb_points() -> impl Strategy<Value = Vec<Point>> {
        prop::collection::vec((-500i32..500, -500i32..500, any::<bool>()), 1..40)
            .prop_map(|v| v.into_iter().map(|(x, y, c)| Point::new(x, y, c)).collect())
    }

    proptest! {
        #[test]
        fn distance_is_symmetric_and_zero_on_self(
            ax in -10_000i32..10_000, ay in -10_000i32..10_000,
            bx in -10_000i32..10_000, by in -10_000i32..10_000,
        ) {
            let a = Point::new(ax, ay, false);
            let b = Point::new(bx, by, true);
            prop_assert_eq!(distance(&a, &b), distance(&b, &a));
            prop_assert_eq!(distance(&a, &a), 0.0);
            prop_assert_eq!(distance(&a, &b), distance(&a, &b));
        }

        #[test]
        fn positive_forward_hits_strictly_increase(
            pts in arb_points(),
            targets in prop::collection::vec(0.01f64..200.0, 0..6),
        ) {
            let end = pts.len() - 1;
            let seg = Segment::new(0, end, targets.clone());
            if let Ok(markers) = walk_segment(&pts, &seg, WalkOptions::default()) {
                prop_assert_eq!(markers.len(), targets.len());
                for w in markers.windows(2) {
                    prop_assert!(w[0].index < w[1].index);
                }
                for m in &markers {
                    prop_assert!(m.index <= end);
                }
            }
        }

        #[test]
        fn backward_hit_never_exceeds_end(
            pts in arb_points(),
            target in -5.0f64..300.0,
            clamp in any::<bool>(),
        ) {
            let end = pts.len() - 1;
            let seg = Segment::new(0, end, vec![]).with_backward_target(target);
            match walk_segment(&pts, &seg, WalkOptions { clamp_to_segment: clamp }) {
                Ok(markers) => {
                    prop_assert_eq!(markers.len(), 1);
                    prop_assert!(markers[0].index <= end);
                    prop_assert!(distance(&pts[markers[0].index], &pts[end]) >= target);
                }
                Err(WalkError::UnreachableTarget { boundary, .. }) => {
                    prop_assert_eq!(boundary, 0);
                }
                Err(other) => {
                    prop_assert!(false, "unexpected {:?}", other);
                }
            }
        }
    }
}
