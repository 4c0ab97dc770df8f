use std::f64::consts::PI;

use crate::Point;

/// Wrap an angle into the range (-PI, PI].
pub fn wrap_angle(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(2.0 * PI);

    if wrapped > PI {
        wrapped - (2.0 * PI)
    } else {
        wrapped
    }
}

/// Calculate the angle of a triangle using the law of cosines
///
/// Returns the angle between sides `a` and `b`, opposite of side `c`. The
/// result is only meaningful when `a`, `b` and `c` form a triangle, see
/// [`is_triangle`]. Callers must check this first.
pub fn law_of_cosines(a: f64, b: f64, c: f64) -> f64 {
    let a2 = a.powi(2);
    let b2 = b.powi(2);
    let c2 = c.powi(2);

    let numerator = a2 + b2 - c2;
    let denominator = 2.0 * a * b;

    (numerator / denominator).acos()
}

/// Check the triangle inequality `|a - b| <= c <= a + b`.
///
/// Degenerate (flat) triangles are accepted.
pub fn is_triangle(a: f64, b: f64, c: f64) -> bool {
    a > 0.0 && b > 0.0 && (a - b).abs() <= c && c <= a + b
}

/// Linear interpolation.
#[inline]
pub fn lerp(a: &Point, b: &Point, t: f64) -> Point {
    a + (b - a) * t
}

/// Intersection of two circles.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CircleIntersection {
    /// Circles are apart, nested or coincident.
    None,
    /// Circles touch in exactly one point.
    Tangent(Point),
    /// Circles cross in two points, mirrored about the line between the centers.
    Pair(Point, Point),
}

impl CircleIntersection {
    /// The intersection with the greatest y-coordinate.
    ///
    /// For a pair with equal y-coordinates the first point is returned.
    pub fn upper(&self) -> Option<Point> {
        match self {
            CircleIntersection::None => None,
            CircleIntersection::Tangent(point) => Some(*point),
            CircleIntersection::Pair(p0, p1) => {
                if p1.y > p0.y {
                    Some(*p1)
                } else {
                    Some(*p0)
                }
            }
        }
    }

    #[inline]
    pub fn is_none(&self) -> bool {
        matches!(self, CircleIntersection::None)
    }
}

/// Intersect circle `(c0, r0)` with circle `(c1, r1)`.
///
/// Uses the radical line construction. Touching circles, either externally
/// (`d == r0 + r1`) or internally (`d == |r0 - r1|`), yield a single tangent
/// point rather than none.
pub fn circle_intersections(c0: &Point, r0: f64, c1: &Point, r1: f64) -> CircleIntersection {
    let delta = c1 - c0;
    let d = delta.norm();

    if d > r0 + r1 {
        return CircleIntersection::None;
    }
    if d < (r0 - r1).abs() {
        return CircleIntersection::None;
    }
    if d == 0.0 {
        // Concentric with equal radii is coincident, otherwise nested.
        return CircleIntersection::None;
    }

    let a = (r0.powi(2) - r1.powi(2) + d.powi(2)) / (2.0 * d);
    let mid = c0 + delta * (a / d);

    if d == r0 + r1 || d == (r0 - r1).abs() {
        return CircleIntersection::Tangent(mid);
    }

    let h = (r0.powi(2) - a.powi(2)).max(0.0).sqrt();
    let offset = nalgebra::Vector2::new(delta.y, -delta.x) * (h / d);

    CircleIntersection::Pair(mid + offset, mid - offset)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-9;

    #[test]
    fn test_law_of_cosines_right_triangle() {
        assert!((law_of_cosines(3.0, 4.0, 5.0) - PI / 2.0).abs() < TOLERANCE);
    }

    #[test]
    fn test_law_of_cosines_equilateral() {
        assert!((law_of_cosines(2.0, 2.0, 2.0) - PI / 3.0).abs() < TOLERANCE);
    }

    #[test]
    fn test_law_of_cosines_outside_domain() {
        assert!(!is_triangle(1.0, 1.0, 3.0));
        assert!(law_of_cosines(1.0, 1.0, 3.0).is_nan());
    }

    #[test]
    fn test_is_triangle_flat() {
        assert!(is_triangle(1.0, 2.0, 3.0));
        assert!(is_triangle(3.0, 2.0, 1.0));
        assert!(!is_triangle(0.0, 2.0, 2.0));
    }

    #[test]
    fn test_wrap_angle() {
        assert!((wrap_angle(3.0 * PI / 2.0) + PI / 2.0).abs() < TOLERANCE);
        assert!((wrap_angle(-PI / 4.0) + PI / 4.0).abs() < TOLERANCE);
        assert!((wrap_angle(PI) - PI).abs() < TOLERANCE);
    }

    #[test]
    fn test_circle_intersections_pair() {
        let intersection =
            circle_intersections(&Point::new(0.0, 0.0), 2.0, &Point::new(2.0, 0.0), 2.0);

        match intersection {
            CircleIntersection::Pair(p0, p1) => {
                assert!((p0.x - 1.0).abs() < TOLERANCE);
                assert!((p1.x - 1.0).abs() < TOLERANCE);
                assert!((p0.y + p1.y).abs() < TOLERANCE);
                assert!((p0.y.abs() - 3.0_f64.sqrt()).abs() < TOLERANCE);
            }
            _ => panic!("expected two intersections"),
        }

        let upper = intersection.upper().unwrap();
        assert!((upper.y - 3.0_f64.sqrt()).abs() < TOLERANCE);
    }

    #[test]
    fn test_circle_intersections_external_tangent() {
        assert_eq!(
            circle_intersections(&Point::new(0.0, 0.0), 2.0, &Point::new(4.0, 0.0), 2.0),
            CircleIntersection::Tangent(Point::new(2.0, 0.0))
        );
    }

    #[test]
    fn test_circle_intersections_internal_tangent() {
        assert_eq!(
            circle_intersections(&Point::new(0.0, 0.0), 3.0, &Point::new(1.0, 0.0), 2.0),
            CircleIntersection::Tangent(Point::new(3.0, 0.0))
        );
    }

    #[test]
    fn test_circle_intersections_apart() {
        assert!(
            circle_intersections(&Point::new(0.0, 0.0), 1.0, &Point::new(5.0, 0.0), 1.0).is_none()
        );
    }

    #[test]
    fn test_circle_intersections_nested() {
        assert!(
            circle_intersections(&Point::new(0.0, 0.0), 5.0, &Point::new(1.0, 0.0), 1.0).is_none()
        );
    }

    #[test]
    fn test_circle_intersections_coincident() {
        assert!(
            circle_intersections(&Point::new(1.0, 1.0), 2.0, &Point::new(1.0, 1.0), 2.0).is_none()
        );
    }

    #[test]
    fn test_lerp() {
        let point = lerp(&Point::new(0.0, 2.0), &Point::new(2.0, 1.0), 0.25);

        assert!((point.x - 0.5).abs() < TOLERANCE);
        assert!((point.y - 1.75).abs() < TOLERANCE);
    }
}
