//! Planar helpers shared by the profile stages: infinite lines, the
//! determinant intersection, segment crossing tests and signed area.

use nalgebra::{Point2, Vector2};

/// Geometric tolerance in kernel units.
pub const EPSILON: f64 = 1e-9;

/// An infinite line through `origin` with unit `direction`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line2 {
    pub origin: Point2<f64>,
    pub direction: Vector2<f64>,
}

impl Line2 {
    /// Line through two points, `None` when they coincide.
    pub fn through(a: Point2<f64>, b: Point2<f64>) -> Option<Self> {
        let d = b - a;
        let len = d.norm();
        if len < EPSILON {
            return None;
        }
        Some(Self {
            origin: a,
            direction: d / len,
        })
    }

    /// Left-hand unit normal.
    pub fn left_normal(&self) -> Vector2<f64> {
        Vector2::new(-self.direction.y, self.direction.x)
    }

    pub fn translated(&self, offset: Vector2<f64>) -> Self {
        Self {
            origin: self.origin + offset,
            direction: self.direction,
        }
    }

    /// Intersection point, `None` for parallel lines.
    pub fn intersect(&self, other: &Line2) -> Option<Point2<f64>> {
        let det = cross(self.direction, other.direction);
        if det.abs() < EPSILON {
            return None;
        }
        let t = cross(other.origin - self.origin, other.direction) / det;
        Some(self.origin + self.direction * t)
    }

    /// Signed distance of `p` along the left normal.
    pub fn signed_distance(&self, p: Point2<f64>) -> f64 {
        (p - self.origin).dot(&self.left_normal())
    }
}

/// z-component of the 2-D cross product.
pub fn cross(a: Vector2<f64>, b: Vector2<f64>) -> f64 {
    a.x * b.y - a.y * b.x
}

/// Shoelace area; negative for clockwise vertex order.
pub fn signed_area(points: &[Point2<f64>]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let twice: f64 = (0..n)
        .map(|i| {
            let a = points[i];
            let b = points[(i + 1) % n];
            a.x * b.y - b.x * a.y
        })
        .sum();
    twice / 2.0
}

fn orientation(a: Point2<f64>, b: Point2<f64>, c: Point2<f64>) -> f64 {
    let o = cross(b - a, c - a);
    if o.abs() < EPSILON {
        0.0
    } else {
        o
    }
}

fn on_segment(a: Point2<f64>, b: Point2<f64>, p: Point2<f64>) -> bool {
    p.x >= a.x.min(b.x) - EPSILON
        && p.x <= a.x.max(b.x) + EPSILON
        && p.y >= a.y.min(b.y) - EPSILON
        && p.y <= a.y.max(b.y) + EPSILON
}

/// Whether closed segments `ab` and `cd` share at least one point.
pub fn segments_intersect(
    a: Point2<f64>,
    b: Point2<f64>,
    c: Point2<f64>,
    d: Point2<f64>,
) -> bool {
    let o1 = orientation(a, b, c);
    let o2 = orientation(a, b, d);
    let o3 = orientation(c, d, a);
    let o4 = orientation(c, d, b);

    if o1 * o2 < 0.0 && o3 * o4 < 0.0 {
        return true;
    }

    (o1 == 0.0 && on_segment(a, b, c))
        || (o2 == 0.0 && on_segment(a, b, d))
        || (o3 == 0.0 && on_segment(c, d, a))
        || (o4 == 0.0 && on_segment(c, d, b))
}

/// Drop vertices that coincide with their predecessor, including the wrap-around.
pub fn dedup_closed(points: &[Point2<f64>]) -> Vec<Point2<f64>> {
    let mut out: Vec<Point2<f64>> = Vec::with_capacity(points.len());
    for p in points {
        if out.last().is_none_or(|last| (p - last).norm() >= EPSILON) {
            out.push(*p);
        }
    }
    while out.len() > 1 {
        let (first, last) = (out[0], out[out.len() - 1]);
        if (first - last).norm() < EPSILON {
            out.pop();
        } else {
            break;
        }
    }
    out
}
