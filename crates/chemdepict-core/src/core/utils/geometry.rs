use nalgebra::{Point2, Vector2};

/// Lengths below this are treated as zero.
pub const LENGTH_EPSILON: f64 = 1e-9;

/// Wraps an angle in degrees into `[0, 360)`.
pub fn normalize_degrees(angle: f64) -> f64 {
    let a = angle.rem_euclid(360.0);
    if a >= 360.0 { 0.0 } else { a }
}

/// Direction of `to` seen from `from`, in degrees counter-clockwise on screen
/// (y grows downward, so North is 90). `None` when the points coincide.
pub fn direction_angle(from: &Point2<f64>, to: &Point2<f64>) -> Option<f64> {
    let d = to - from;
    if d.norm() < LENGTH_EPSILON {
        return None;
    }
    Some(normalize_degrees((-d.y).atan2(d.x).to_degrees()))
}

/// Smallest absolute difference between two directions, in `[0, 180]`.
pub fn angular_distance(a: f64, b: f64) -> f64 {
    let d = normalize_degrees(a - b);
    if d > 180.0 { 360.0 - d } else { d }
}

/// Screen-space unit vector pointing in direction `angle` (degrees).
pub fn unit_from_angle(angle: f64) -> Vector2<f64> {
    let r = angle.to_radians();
    Vector2::new(r.cos(), -r.sin())
}

/// Counter-clockwise (on screen) normal of a unit direction.
pub fn screen_normal(dir: &Vector2<f64>) -> Vector2<f64> {
    Vector2::new(dir.y, -dir.x)
}

/// Signed area determinant `(y0−y2)(x1−x2) − (y1−y2)(x0−x2)`.
///
/// Swapping any two of the three points flips the sign.
pub fn signed_area(p: &[Point2<f64>; 3]) -> f64 {
    (p[0].y - p[2].y) * (p[1].x - p[2].x) - (p[1].y - p[2].y) * (p[0].x - p[2].x)
}

/// Parameters `(t, s)` of the proper intersection of segments `p1p2` and `p3p4`.
///
/// Both parameters must lie strictly inside `(0, 1)`; touching endpoints and
/// parallel segments do not count as crossings.
pub fn segment_intersection(
    p1: &Point2<f64>,
    p2: &Point2<f64>,
    p3: &Point2<f64>,
    p4: &Point2<f64>,
) -> Option<(f64, f64)> {
    let (a1, b1, c1) = (p2.x - p1.x, p3.x - p4.x, p3.x - p1.x);
    let (a2, b2, c2) = (p2.y - p1.y, p3.y - p4.y, p3.y - p1.y);
    let d = a1 * b2 - a2 * b1;
    if d == 0.0 {
        return None;
    }
    let t = (c1 * b2 - c2 * b1) / d;
    if t <= 0.0 || t >= 1.0 {
        return None;
    }
    let s = (a1 * c2 - a2 * c1) / d;
    if s <= 0.0 || s >= 1.0 {
        return None;
    }
    Some((t, s))
}

/// Distance from the center of a `2·half_width × 2·half_height` box to its
/// border along the unit direction `dir`.
///
/// The limit angle `atan2(half_height, half_width)` decides whether the ray
/// leaves through a vertical or a horizontal edge.
pub fn box_exit_distance(dir: &Vector2<f64>, half_width: f64, half_height: f64) -> f64 {
    if half_width <= 0.0 || half_height <= 0.0 {
        return 0.0;
    }
    let limit = half_height.atan2(half_width);
    let a = dir.y.abs().atan2(dir.x.abs());
    if a <= limit {
        half_width / dir.x.abs()
    } else {
        half_height / dir.y.abs()
    }
}

/// Tangent of half the angle between two unit directions.
pub fn half_angle_tan(u: &Vector2<f64>, w: &Vector2<f64>) -> f64 {
    let phi = u.dot(w).clamp(-1.0, 1.0).acos();
    (phi / 2.0).tan()
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-9;

    #[test]
    fn direction_angle_uses_screen_orientation() {
        let o = Point2::origin();
        assert!((direction_angle(&o, &Point2::new(1.0, 0.0)).unwrap() - 0.0).abs() < TOL);
        assert!((direction_angle(&o, &Point2::new(0.0, -1.0)).unwrap() - 90.0).abs() < TOL);
        assert!((direction_angle(&o, &Point2::new(-1.0, 0.0)).unwrap() - 180.0).abs() < TOL);
        assert!((direction_angle(&o, &Point2::new(0.0, 1.0)).unwrap() - 270.0).abs() < TOL);
    }

    #[test]
    fn direction_angle_is_undefined_for_coincident_points() {
        let p = Point2::new(3.0, 4.0);
        assert_eq!(direction_angle(&p, &p), None);
    }

    #[test]
    fn normalize_and_angular_distance_wrap_around() {
        assert!((normalize_degrees(-90.0) - 270.0).abs() < TOL);
        assert!((normalize_degrees(720.0)).abs() < TOL);
        assert!((angular_distance(350.0, 10.0) - 20.0).abs() < TOL);
        assert!((angular_distance(0.0, 180.0) - 180.0).abs() < TOL);
    }

    #[test]
    fn unit_from_angle_matches_direction_angle() {
        for a in [0.0, 30.0, 135.0, 250.0] {
            let v = unit_from_angle(a);
            let p = Point2::origin() + v;
            assert!((direction_angle(&Point2::origin(), &p).unwrap() - a).abs() < 1e-7);
        }
    }

    #[test]
    fn signed_area_flips_under_swap() {
        let p = [
            Point2::new(0.0, 0.0),
            Point2::new(4.0, 1.0),
            Point2::new(1.0, 3.0),
        ];
        let swapped = [p[1], p[0], p[2]];
        let a = signed_area(&p);
        assert!(a != 0.0);
        assert!((a + signed_area(&swapped)).abs() < TOL);
    }

    #[test]
    fn crossing_segments_report_fractions() {
        let (t, s) = segment_intersection(
            &Point2::new(0.0, 0.0),
            &Point2::new(4.0, 0.0),
            &Point2::new(1.0, -1.0),
            &Point2::new(1.0, 1.0),
        )
        .unwrap();
        assert!((t - 0.25).abs() < TOL);
        assert!((s - 0.5).abs() < TOL);
    }

    #[test]
    fn parallel_and_touching_segments_do_not_cross() {
        let a = Point2::new(0.0, 0.0);
        let b = Point2::new(2.0, 0.0);
        assert!(segment_intersection(&a, &b, &Point2::new(0.0, 1.0), &Point2::new(2.0, 1.0)).is_none());
        assert!(segment_intersection(&a, &b, &Point2::new(2.0, 0.0), &Point2::new(3.0, 2.0)).is_none());
        assert!(segment_intersection(&a, &b, &Point2::new(1.0, 0.5), &Point2::new(1.0, 2.0)).is_none());
    }

    #[test]
    fn box_exit_distance_picks_the_correct_edge() {
        let east = Vector2::new(1.0, 0.0);
        assert!((box_exit_distance(&east, 5.0, 7.0) - 5.0).abs() < TOL);
        let north = Vector2::new(0.0, -1.0);
        assert!((box_exit_distance(&north, 5.0, 7.0) - 7.0).abs() < TOL);
        let diag = Vector2::new(1.0, 1.0).normalize();
        assert!((box_exit_distance(&diag, 5.0, 7.0) - 5.0 * 2f64.sqrt()).abs() < 1e-9);
        assert_eq!(box_exit_distance(&east, 0.0, 0.0), 0.0);
    }

    #[test]
    fn half_angle_tan_of_right_angle_is_one() {
        let t = half_angle_tan(&Vector2::new(1.0, 0.0), &Vector2::new(0.0, 1.0));
        assert!((t - 1.0).abs() < 1e-12);
    }
}
