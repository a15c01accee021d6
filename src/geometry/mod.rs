//! Planar geometry for wire snapping and flow placement.
//!
//! Two queries are provided:
//!
//! - [`project_point_to_segment`] - closest point on a closed segment
//! - [`find_nearest_point`] - closest point on any wire within a threshold
//!
//! Both are pure and allocation free apart from the single [`SnapResult`]
//! returned by a successful search.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::circuit::{Wire, WireId};

/// Default snap distance in canvas pixels.
pub const DEFAULT_SNAP_THRESHOLD: f64 = 20.0;

/// A point on the canvas, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Create a new point.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance(&self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Linear interpolation towards `other` (`t = 0` is `self`).
    pub fn lerp(&self, other: Point, t: f64) -> Point {
        Point::new(
            self.x + (other.x - self.x) * t,
            self.y + (other.y - self.y) * t,
        )
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.2}, {:.2})", self.x, self.y)
    }
}

/// Projection of a point onto a segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    /// Closest point on the segment
    pub point: Point,
    /// Normalized position of `point` along the segment (0 at `a`, 1 at `b`)
    pub t: f64,
}

/// Result of snapping a point to the nearest wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapResult {
    pub x: f64,
    pub y: f64,
    /// Distance from the query point to `(x, y)`
    pub distance: f64,
    /// Wire the point lies on
    pub wire_id: WireId,
    /// Position along the matched segment of that wire (0..=1)
    pub t: f64,
}

impl SnapResult {
    /// The snapped location.
    pub fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Project `p` onto the closed segment `[a, b]`.
///
/// A degenerate segment (`a == b`) is treated as having unit squared length,
/// which yields `t = 0` and the point `a`.
pub fn project_point_to_segment(p: Point, a: Point, b: Point) -> Projection {
    let (vx, vy) = (b.x - a.x, b.y - a.y);
    let (wx, wy) = (p.x - a.x, p.y - a.y);

    let mut len2 = vx * vx + vy * vy;
    if len2 == 0.0 {
        len2 = 1.0;
    }

    let t = ((wx * vx + wy * vy) / len2).clamp(0.0, 1.0);
    Projection {
        point: Point::new(a.x + t * vx, a.y + t * vy),
        t,
    }
}

/// Find the closest point to `p` on any segment of any wire.
///
/// Only projections strictly closer than `threshold` qualify. When several
/// segments are equally close the first one scanned wins. Wires with fewer
/// than two points contribute no segments.
pub fn find_nearest_point(p: Point, wires: &[Wire], threshold: f64) -> Option<SnapResult> {
    let mut best: Option<(usize, Projection, f64)> = None;
    let mut min_distance = threshold;

    for (wire_idx, wire) in wires.iter().enumerate() {
        for segment in wire.path.windows(2) {
            let projection = project_point_to_segment(p, segment[0], segment[1]);
            let distance = p.distance(projection.point);

            if distance < min_distance {
                min_distance = distance;
                best = Some((wire_idx, projection, distance));
            }
        }
    }

    best.map(|(wire_idx, projection, distance)| SnapResult {
        x: projection.point.x,
        y: projection.point.y,
        distance,
        wire_id: wires[wire_idx].id.clone(),
        t: projection.t,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::ComponentId;
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
    fn test_projection_interior() {
        let proj = project_point_to_segment(
            Point::new(5.0, 3.0),
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
        );
        assert_abs_diff_eq!(proj.t, 0.5);
        assert_eq!(proj.point, Point::new(5.0, 0.0));
    }

    #[test]
    fn test_projection_clamps_to_endpoints() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(10.0, 0.0);

        let before = project_point_to_segment(Point::new(-4.0, 2.0), a, b);
        assert_eq!(before.t, 0.0);
        assert_eq!(before.point, a);

        let after = project_point_to_segment(Point::new(14.0, -2.0), a, b);
        assert_eq!(after.t, 1.0);
        assert_eq!(after.point, b);
    }

    #[test]
    fn test_projection_degenerate_segment() {
        let a = Point::new(3.0, 4.0);
        let proj = project_point_to_segment(Point::new(10.0, 10.0), a, a);
        assert_eq!(proj.t, 0.0);
        assert_eq!(proj.point, a);
        assert!(proj.point.x.is_finite() && proj.point.y.is_finite());
    }

    #[test]
    fn test_nearest_point_picks_closest_wire() {
        let wires = vec![
            wire("top", &[(0.0, 0.0), (100.0, 0.0)]),
            wire("bottom", &[(0.0, 30.0), (100.0, 30.0)]),
        ];

        let snap = find_nearest_point(Point::new(40.0, 22.0), &wires, 20.0).unwrap();
        assert_eq!(snap.wire_id.as_str(), "bottom");
        assert_abs_diff_eq!(snap.x, 40.0);
        assert_abs_diff_eq!(snap.y, 30.0);
        assert_abs_diff_eq!(snap.distance, 8.0);
        assert_abs_diff_eq!(snap.t, 0.4);
    }

    #[test]
    fn test_nearest_point_reports_segment_local_t() {
        let wires = vec![wire("l", &[(0.0, 0.0), (10.0, 0.0), (10.0, 20.0)])];
        let snap = find_nearest_point(Point::new(12.0, 15.0), &wires, 20.0).unwrap();
        assert_abs_diff_eq!(snap.t, 0.75);
        assert_abs_diff_eq!(snap.x, 10.0);
        assert_abs_diff_eq!(snap.y, 15.0);
    }

    #[test]
    fn test_nearest_point_none_outside_threshold() {
        let wires = vec![wire("w", &[(0.0, 0.0), (100.0, 0.0)])];
        assert!(find_nearest_point(Point::new(50.0, 25.0), &wires, 20.0).is_none());
        // Strictly less than the threshold
        assert!(find_nearest_point(Point::new(50.0, 20.0), &wires, 20.0).is_none());
    }

    #[test]
    fn test_nearest_point_ignores_undrawable_wires() {
        let wires = vec![wire("dot", &[(5.0, 5.0)]), wire("empty", &[])];
        assert!(find_nearest_point(Point::new(5.0, 5.0), &wires, 20.0).is_none());
        assert!(find_nearest_point(Point::new(5.0, 5.0), &[], 20.0).is_none());
    }

    #[test]
    fn test_nearest_point_tie_first_found_wins() {
        let wires = vec![
            wire("first", &[(0.0, -10.0), (100.0, -10.0)]),
            wire("second", &[(0.0, 10.0), (100.0, 10.0)]),
        ];
        let snap = find_nearest_point(Point::new(50.0, 0.0), &wires, 20.0).unwrap();
        assert_eq!(snap.wire_id.as_str(), "first");
    }

    fn coord() -> impl Strategy<Value = f64> {
        -500.0..500.0f64
    }

    proptest! {
        #[test]
        fn prop_snap_respects_threshold(
            px in coord(), py in coord(),
            pts in prop::collection::vec((coord(), coord()), 0..8),
            threshold in 1.0..200.0f64,
        ) {
            let wires = vec![wire("w", &pts)];
            let p = Point::new(px, py);
            match find_nearest_point(p, &wires, threshold) {
                Some(snap) => {
                    prop_assert!(snap.distance < threshold);
                    prop_assert!((p.distance(snap.point()) - snap.distance).abs() < 1e-9);
                    prop_assert!((0.0..=1.0).contains(&snap.t));
                }
                None => {
                    for seg in wires[0].path.windows(2) {
                        let proj = project_point_to_segment(p, seg[0], seg[1]);
                        prop_assert!(p.distance(proj.point) >= threshold);
                    }
                }
            }
        }
    }
}
