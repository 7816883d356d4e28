use serde::{Deserialize, Serialize};

const EPS: f64 = 1e-9;

/// A 2D point in document coordinates (millimeters).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &Point) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }

    pub fn translate(&self, dx: f64, dy: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    pub fn midpoint(&self, other: &Point) -> Self {
        Self {
            x: (self.x + other.x) / 2.0,
            y: (self.y + other.y) / 2.0,
        }
    }
}

/// An axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BBox {
    pub min: Point,
    pub max: Point,
}

impl BBox {
    pub fn new(min: Point, max: Point) -> Self {
        Self { min, max }
    }

    pub fn from_points(points: &[Point]) -> Option<Self> {
        if points.is_empty() {
            return None;
        }
        let mut min_x = f64::MAX;
        let mut min_y = f64::MAX;
        let mut max_x = f64::MIN;
        let mut max_y = f64::MIN;
        for p in points {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }
        Some(Self {
            min: Point::new(min_x, min_y),
            max: Point::new(max_x, max_y),
        })
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    pub fn center(&self) -> Point {
        Point::new(
            (self.min.x + self.max.x) / 2.0,
            (self.min.y + self.max.y) / 2.0,
        )
    }

    pub fn expand(&self, margin: f64) -> Self {
        Self {
            min: Point::new(self.min.x - margin, self.min.y - margin),
            max: Point::new(self.max.x + margin, self.max.y + margin),
        }
    }

    pub fn contains_point(&self, p: &Point) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    pub fn intersects(&self, other: &BBox) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
    }

    pub fn union(&self, other: &BBox) -> Self {
        Self {
            min: Point::new(self.min.x.min(other.min.x), self.min.y.min(other.min.y)),
            max: Point::new(self.max.x.max(other.max.x), self.max.y.max(other.max.y)),
        }
    }

    pub fn corners(&self) -> [Point; 4] {
        [
            self.min,
            Point::new(self.max.x, self.min.y),
            self.max,
            Point::new(self.min.x, self.max.y),
        ]
    }
}

/// An oriented (rotated) box: center, half extents, rotation angle in radians.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObBox {
    pub center: Point,
    pub half_w: f64,
    pub half_h: f64,
    pub angle: f64,
}

impl ObBox {
    pub fn new(center: Point, half_w: f64, half_h: f64, angle: f64) -> Self {
        Self {
            center,
            half_w,
            half_h,
            angle,
        }
    }

    /// Oriented box spanning the segment a-b with the given half thickness.
    pub fn from_segment(a: Point, b: Point, half_thickness: f64) -> Self {
        Self {
            center: a.midpoint(&b),
            half_w: a.distance_to(&b) / 2.0,
            half_h: half_thickness,
            angle: (b.y - a.y).atan2(b.x - a.x),
        }
    }

    pub fn area(&self) -> f64 {
        4.0 * self.half_w * self.half_h
    }

    /// Point containment test, with the box grown by `expand` on every side.
    /// The point is transformed into the box frame so rotation costs one
    /// sin/cos pair.
    pub fn contains_point(&self, p: &Point, expand: f64) -> bool {
        let dx = p.x - self.center.x;
        let dy = p.y - self.center.y;
        let (sin, cos) = (-self.angle).sin_cos();
        let lx = dx * cos - dy * sin;
        let ly = dx * sin + dy * cos;
        lx.abs() <= self.half_w + expand && ly.abs() <= self.half_h + expand
    }

    /// The box's four corners in document coordinates, counter-clockwise.
    pub fn corners(&self) -> [Point; 4] {
        let (sin, cos) = self.angle.sin_cos();
        let rot = |x: f64, y: f64| {
            Point::new(
                self.center.x + x * cos - y * sin,
                self.center.y + x * sin + y * cos,
            )
        };
        [
            rot(-self.half_w, -self.half_h),
            rot(self.half_w, -self.half_h),
            rot(self.half_w, self.half_h),
            rot(-self.half_w, self.half_h),
        ]
    }

    /// Axis-aligned bounds enclosing the rotated box.
    pub fn aabb(&self) -> BBox {
        BBox::from_points(&self.corners()).unwrap_or(BBox::new(self.center, self.center))
    }
}

// ── Polygon predicates ───────────────────────────────────────────────
//
// These back the drag-selection qualifiers. Polygons are simple (possibly
// non-convex) vertex loops without an explicit closing vertex.

/// Point-in-polygon via the nonzero winding rule.
pub fn point_in_polygon(p: &Point, poly: &[Point]) -> bool {
    if poly.len() < 3 {
        return false;
    }
    let mut winding = 0i32;
    for i in 0..poly.len() {
        let a = poly[i];
        let b = poly[(i + 1) % poly.len()];
        if a.y <= p.y {
            if b.y > p.y && cross(&a, &b, p) > 0.0 {
                winding += 1;
            }
        } else if b.y <= p.y && cross(&a, &b, p) < 0.0 {
            winding -= 1;
        }
    }
    winding != 0
}

/// Cross product of (b - a) x (p - a).
fn cross(a: &Point, b: &Point, p: &Point) -> f64 {
    (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x)
}

fn on_segment(a: &Point, b: &Point, p: &Point) -> bool {
    p.x >= a.x.min(b.x) - EPS
        && p.x <= a.x.max(b.x) + EPS
        && p.y >= a.y.min(b.y) - EPS
        && p.y <= a.y.max(b.y) + EPS
}

/// Proper or touching intersection of segments a1-a2 and b1-b2.
pub fn segments_intersect(a1: &Point, a2: &Point, b1: &Point, b2: &Point) -> bool {
    let d1 = cross(b1, b2, a1);
    let d2 = cross(b1, b2, a2);
    let d3 = cross(a1, a2, b1);
    let d4 = cross(a1, a2, b2);

    if ((d1 > EPS && d2 < -EPS) || (d1 < -EPS && d2 > EPS))
        && ((d3 > EPS && d4 < -EPS) || (d3 < -EPS && d4 > EPS))
    {
        return true;
    }
    (d1.abs() <= EPS && on_segment(b1, b2, a1))
        || (d2.abs() <= EPS && on_segment(b1, b2, a2))
        || (d3.abs() <= EPS && on_segment(a1, a2, b1))
        || (d4.abs() <= EPS && on_segment(a1, a2, b2))
}

fn any_edge_pair_intersects(a: &[Point], b: &[Point]) -> bool {
    for i in 0..a.len() {
        let a1 = &a[i];
        let a2 = &a[(i + 1) % a.len()];
        for j in 0..b.len() {
            let b1 = &b[j];
            let b2 = &b[(j + 1) % b.len()];
            if segments_intersect(a1, a2, b1, b2) {
                return true;
            }
        }
    }
    false
}

/// Whether two polygons overlap: any vertex of one inside the other, or any
/// edge pair crossing.
pub fn polygons_intersect(a: &[Point], b: &[Point]) -> bool {
    if a.len() < 3 || b.len() < 3 {
        return false;
    }
    if a.iter().any(|p| point_in_polygon(p, b)) || b.iter().any(|p| point_in_polygon(p, a)) {
        return true;
    }
    any_edge_pair_intersects(a, b)
}

/// Whether `outer` fully contains `inner`: every vertex of `inner` is inside
/// and no edge of `inner` crosses an edge of `outer`. Equivalent to the
/// polygon difference `inner - outer` being empty for simple polygons.
pub fn polygon_contains_polygon(outer: &[Point], inner: &[Point]) -> bool {
    if outer.len() < 3 || inner.len() < 3 {
        return false;
    }
    if !inner.iter().all(|p| point_in_polygon(p, outer)) {
        return false;
    }
    !any_edge_pair_intersects(inner, outer)
}

/// Whether an open polyline touches a polygon: any path segment crossing a
/// polygon edge, or any path vertex inside the polygon.
pub fn polyline_intersects_polygon(path: &[Point], poly: &[Point]) -> bool {
    if poly.len() < 3 || path.is_empty() {
        return false;
    }
    if path.iter().any(|p| point_in_polygon(p, poly)) {
        return true;
    }
    for w in path.windows(2) {
        for j in 0..poly.len() {
            let b1 = &poly[j];
            let b2 = &poly[(j + 1) % poly.len()];
            if segments_intersect(&w[0], &w[1], b1, b2) {
                return true;
            }
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_square() -> Vec<Point> {
        vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(0.0, 10.0),
        ]
    }

    #[test]
    fn test_point_distance() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(3.0, 4.0);
        assert!((a.distance_to(&b) - 5.0).abs() < 1e-10);
    }

    #[test]
    fn test_obbox_contains_rotated() {
        // 4x2 box rotated 90 degrees: extends 1 in x, 2 in y.
        let b = ObBox::new(Point::new(0.0, 0.0), 2.0, 1.0, std::f64::consts::FRAC_PI_2);
        assert!(b.contains_point(&Point::new(0.0, 1.9), 0.0));
        assert!(!b.contains_point(&Point::new(1.9, 0.0), 0.0));
        // Expansion makes the miss a hit.
        assert!(b.contains_point(&Point::new(1.9, 0.0), 1.0));
    }

    #[test]
    fn test_obbox_from_segment() {
        let b = ObBox::from_segment(Point::new(0.0, 0.0), Point::new(10.0, 0.0), 0.5);
        assert!((b.center.x - 5.0).abs() < 1e-10);
        assert!((b.half_w - 5.0).abs() < 1e-10);
        assert!(b.contains_point(&Point::new(9.0, 0.4), 0.0));
        assert!(!b.contains_point(&Point::new(9.0, 0.6), 0.0));
    }

    #[test]
    fn test_point_in_polygon_winding() {
        let poly = unit_square();
        assert!(point_in_polygon(&Point::new(5.0, 5.0), &poly));
        assert!(!point_in_polygon(&Point::new(15.0, 5.0), &poly));
        // Reversed winding still counts as inside under the nonzero rule.
        let rev: Vec<Point> = poly.iter().rev().cloned().collect();
        assert!(point_in_polygon(&Point::new(5.0, 5.0), &rev));
    }

    #[test]
    fn test_point_in_concave_polygon() {
        // A "C" shape; the notch is outside.
        let poly = vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 3.0),
            Point::new(3.0, 3.0),
            Point::new(3.0, 7.0),
            Point::new(10.0, 7.0),
            Point::new(10.0, 10.0),
            Point::new(0.0, 10.0),
        ];
        assert!(point_in_polygon(&Point::new(1.5, 5.0), &poly));
        assert!(!point_in_polygon(&Point::new(7.0, 5.0), &poly));
    }

    #[test]
    fn test_segments_intersect() {
        let o = Point::new(0.0, 0.0);
        assert!(segments_intersect(
            &o,
            &Point::new(10.0, 10.0),
            &Point::new(0.0, 10.0),
            &Point::new(10.0, 0.0)
        ));
        assert!(!segments_intersect(
            &o,
            &Point::new(10.0, 0.0),
            &Point::new(0.0, 1.0),
            &Point::new(10.0, 1.0)
        ));
        // Touching endpoint counts.
        assert!(segments_intersect(
            &o,
            &Point::new(10.0, 0.0),
            &Point::new(5.0, 0.0),
            &Point::new(5.0, 5.0)
        ));
    }

    #[test]
    fn test_polygons_intersect_and_contain() {
        let big = unit_square();
        let small = vec![
            Point::new(2.0, 2.0),
            Point::new(4.0, 2.0),
            Point::new(4.0, 4.0),
            Point::new(2.0, 4.0),
        ];
        let straddling = vec![
            Point::new(8.0, 8.0),
            Point::new(12.0, 8.0),
            Point::new(12.0, 12.0),
            Point::new(8.0, 12.0),
        ];
        let outside = vec![
            Point::new(20.0, 20.0),
            Point::new(22.0, 20.0),
            Point::new(22.0, 22.0),
            Point::new(20.0, 22.0),
        ];
        assert!(polygons_intersect(&big, &small));
        assert!(polygons_intersect(&big, &straddling));
        assert!(!polygons_intersect(&big, &outside));

        assert!(polygon_contains_polygon(&big, &small));
        assert!(!polygon_contains_polygon(&big, &straddling));
        assert!(!polygon_contains_polygon(&small, &big));
    }

    #[test]
    fn test_polyline_intersects_polygon() {
        let poly = unit_square();
        // Crosses the square.
        let crossing = vec![Point::new(-5.0, 5.0), Point::new(15.0, 5.0)];
        // Entirely inside, no edge crossing.
        let inside = vec![Point::new(2.0, 2.0), Point::new(8.0, 8.0)];
        let outside = vec![Point::new(-5.0, -5.0), Point::new(-1.0, -1.0)];
        assert!(polyline_intersects_polygon(&crossing, &poly));
        assert!(polyline_intersects_polygon(&inside, &poly));
        assert!(!polyline_intersects_polygon(&outside, &poly));
    }
}
