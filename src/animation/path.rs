//! Arc-length parametrized flow path.

use crate::circuit::Wire;
use crate::geometry::Point;

/// Path used when the circuit has no wires at all.
pub const FALLBACK_PATH: [Point; 2] = [Point::new(50.0, 50.0), Point::new(250.0, 50.0)];

/// A resolved position on the path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathLocation {
    pub point: Point,
    /// Index of the segment `[segment, segment + 1]`
    pub segment: usize,
    /// Fraction along that segment (0..=1)
    pub fraction: f64,
}

/// All wire polylines concatenated, with cumulative arc lengths.
///
/// `lengths[i]` is the distance travelled from the first point to
/// `points[i]`; it starts at 0 and never decreases.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FlowPath {
    points: Vec<Point>,
    lengths: Vec<f64>,
}

impl FlowPath {
    /// Build a path from raw points, in traversal order.
    pub fn from_points(points: Vec<Point>) -> Self {
        let mut lengths = Vec::with_capacity(points.len());
        if !points.is_empty() {
            lengths.push(0.0);
        }
        for segment in points.windows(2) {
            let last = lengths[lengths.len() - 1];
            lengths.push(last + segment[0].distance(segment[1]));
        }
        Self { points, lengths }
    }

    /// Concatenate wire paths in list order; empty wires are skipped.
    ///
    /// With no wires at all, `fallback` is used instead so the indicator
    /// still has somewhere to sit.
    pub fn from_wires(wires: &[Wire], fallback: &[Point]) -> Self {
        if wires.is_empty() {
            return Self::from_points(fallback.to_vec());
        }

        let capacity = wires.iter().map(|w| w.path.len()).sum();
        let mut points = Vec::with_capacity(capacity);
        for wire in wires {
            points.extend_from_slice(&wire.path);
        }
        Self::from_points(points)
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Cumulative arc lengths, parallel to [`points`](Self::points).
    pub fn cumulative_lengths(&self) -> &[f64] {
        &self.lengths
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Total arc length (0 for an empty path).
    pub fn total_length(&self) -> f64 {
        self.lengths.last().copied().unwrap_or(0.0)
    }

    /// Resolve `progress` (fraction of total length) to a location.
    ///
    /// Returns `None` when the path cannot show anything: fewer than two
    /// points, or zero total length.
    pub fn locate(&self, progress: f64) -> Option<PathLocation> {
        let total = self.total_length();
        if self.points.len() < 2 || total <= 0.0 || !total.is_finite() {
            return None;
        }

        let progress = if progress.is_finite() {
            progress.clamp(0.0, 1.0)
        } else {
            0.0
        };
        let target = progress * total;

        // First cumulative length at or beyond the target ends the segment
        let last_segment = self.points.len() - 2;
        let segment = self.lengths[1..]
            .partition_point(|&l| l < target)
            .min(last_segment);

        let start = self.lengths[segment];
        let span = self.lengths[segment + 1] - start;
        let fraction = if span > 0.0 {
            ((target - start) / span).clamp(0.0, 1.0)
        } else {
            0.0
        };

        Some(PathLocation {
            point: self.points[segment].lerp(self.points[segment + 1], fraction),
            segment,
            fraction,
        })
    }

    /// Point at `progress`, or `None` if nothing is visible.
    pub fn point_at(&self, progress: f64) -> Option<Point> {
        self.locate(progress).map(|loc| loc.point)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::{ComponentId, WireId};
    use approx::assert_abs_diff_eq;
    use proptest::prelude::*;

    fn wire(id: &str, points: &[(f64, f64)]) -> Wire {
        Wire::new(
            WireId::new(id),
            ComponentId::new("a"),
            ComponentId::new("b"),
            points.iter().map(|&(x, y)| Point::new(x, y)).collect(),
        )
    }

    #[test]
    fn test_cumulative_lengths() {
        let path = FlowPath::from_points(vec![
            Point::new(0.0, 0.0),
            Point::new(3.0, 4.0),
            Point::new(3.0, 4.0),
            Point::new(3.0, 10.0),
        ]);
        assert_eq!(path.cumulative_lengths(), &[0.0, 5.0, 5.0, 11.0]);
        assert_eq!(path.total_length(), 11.0);
    }

    #[test]
    fn test_concatenates_wires_in_order() {
        let wires = vec![
            wire("a", &[(0.0, 0.0), (10.0, 0.0)]),
            wire("empty", &[]),
            wire("b", &[(10.0, 10.0), (0.0, 10.0)]),
        ];
        let path = FlowPath::from_wires(&wires, &FALLBACK_PATH);
        assert_eq!(path.len(), 4);
        // The jump between wires counts towards the length
        assert_eq!(path.cumulative_lengths(), &[0.0, 10.0, 20.0, 30.0]);
    }

    #[test]
    fn test_fallback_when_no_wires() {
        let path = FlowPath::from_wires(&[], &FALLBACK_PATH);
        assert_eq!(path.points(), &FALLBACK_PATH);
        assert_eq!(path.total_length(), 200.0);
        assert_eq!(path.point_at(0.5), Some(Point::new(150.0, 50.0)));
    }

    #[test]
    fn test_no_position_for_degenerate_paths() {
        assert!(FlowPath::from_points(Vec::new()).point_at(0.3).is_none());
        assert!(FlowPath::from_points(vec![Point::new(1.0, 1.0)]).point_at(0.3).is_none());

        let collapsed = FlowPath::from_points(vec![Point::new(1.0, 1.0), Point::new(1.0, 1.0)]);
        assert!(collapsed.point_at(0.0).is_none());

        // Wires present but none drawable: no fallback
        let wires = vec![wire("dot", &[(4.0, 4.0)])];
        assert!(FlowPath::from_wires(&wires, &FALLBACK_PATH).point_at(0.0).is_none());
    }

    #[test]
    fn test_interpolation() {
        let path = FlowPath::from_points(vec![
            Point::new(0.0, 0.0),
            Point::new(100.0, 0.0),
            Point::new(100.0, 100.0),
        ]);
        assert_eq!(path.point_at(0.0), Some(Point::new(0.0, 0.0)));
        assert_eq!(path.point_at(0.25), Some(Point::new(50.0, 0.0)));
        assert_eq!(path.point_at(0.5), Some(Point::new(100.0, 0.0)));

        let p = path.point_at(0.75).unwrap();
        assert_abs_diff_eq!(p.x, 100.0);
        assert_abs_diff_eq!(p.y, 50.0);

        assert_eq!(path.point_at(1.0), Some(Point::new(100.0, 100.0)));
    }

    #[test]
    fn test_start_skips_leading_zero_segment() {
        let path = FlowPath::from_points(vec![
            Point::new(7.0, 7.0),
            Point::new(7.0, 7.0),
            Point::new(17.0, 7.0),
        ]);
        assert_eq!(path.point_at(0.0), Some(Point::new(7.0, 7.0)));
    }

    fn points() -> impl Strategy<Value = Vec<Point>> {
        prop::collection::vec((-300.0..300.0f64, -300.0..300.0f64), 2..12)
            .prop_map(|v| v.into_iter().map(|(x, y)| Point::new(x, y)).collect())
    }

    proptest! {
        #[test]
        fn prop_lengths_start_at_zero_and_never_decrease(pts in points()) {
            let path = FlowPath::from_points(pts.clone());
            let lengths = path.cumulative_lengths();
            prop_assert_eq!(lengths.len(), pts.len());
            prop_assert_eq!(lengths[0], 0.0);
            for pair in lengths.windows(2) {
                prop_assert!(pair[1] >= pair[0]);
            }
        }

        #[test]
        fn prop_progress_zero_is_first_point(pts in points()) {
            let path = FlowPath::from_points(pts.clone());
            if let Some(p) = path.point_at(0.0) {
                prop_assert_eq!(p, pts[0]);
            }
        }

        #[test]
        fn prop_advancing_never_moves_backwards(pts in points(), steps in 2usize..200) {
            let path = FlowPath::from_points(pts);
            let mut previous: Option<PathLocation> = None;
            for i in 0..steps {
                let progress = i as f64 / steps as f64;
                let Some(loc) = path.locate(progress) else { break };
                if let Some(prev) = previous {
                    prop_assert!(
                        loc.segment > prev.segment
                            || (loc.segment == prev.segment && loc.fraction >= prev.fraction)
                    );
                }
                previous = Some(loc);
            }
        }

        #[test]
        fn prop_rebuild_is_idempotent(pts in points()) {
            let wires = vec![Wire::new(
                WireId::new("w"),
                ComponentId::new("a"),
                ComponentId::new("b"),
                pts,
            )];
            let first = FlowPath::from_wires(&wires, &FALLBACK_PATH);
            let second = FlowPath::from_wires(&wires, &FALLBACK_PATH);
            prop_assert_eq!(first.cumulative_lengths(), second.cumulative_lengths());
        }
    }
}
