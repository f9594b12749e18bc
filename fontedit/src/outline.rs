//! Outline transforms: stroke-weight changes, squishing, quadratic conversion.

use kurbo::{cubics_to_quadratic_splines, Affine, BezPath, CubicBez, PathEl, Point, Shape, Vec2};

/// Conversion tolerance in font units, matching what a compiler uses when it
/// flattens cubics for the glyf table.
pub const QUAD_ACCURACY: f64 = 1.0;

/// Apply a stroke-weight delta to an outline.
///
/// Every point of every contour moves along the bisector of its neighboring
/// edge normals so that each boundary edge shifts by half the delta; a
/// negative delta thins, a positive one thickens. Which side is "out" is
/// decided per contour from its winding, so the same delta works on either
/// fill convention. The advance width is untouched.
pub fn adjust_stroke_weight(path: &BezPath, delta: f64) -> BezPath {
    let mut out = BezPath::new();
    for contour in contours(path) {
        let points = contour_points(&contour);
        let shifts = point_shifts(&points, delta);
        let mut next = 0;
        let shifted = |i: &mut usize| {
            let p = points[*i] + shifts[*i];
            *i += 1;
            p
        };
        for el in &contour {
            match el {
                PathEl::MoveTo(_) => out.move_to(shifted(&mut next)),
                PathEl::LineTo(_) => out.line_to(shifted(&mut next)),
                PathEl::QuadTo(..) => {
                    let p1 = shifted(&mut next);
                    let p2 = shifted(&mut next);
                    out.quad_to(p1, p2);
                }
                PathEl::CurveTo(..) => {
                    let p1 = shifted(&mut next);
                    let p2 = shifted(&mut next);
                    let p3 = shifted(&mut next);
                    out.curve_to(p1, p2, p3);
                }
                PathEl::ClosePath => out.close_path(),
            }
        }
    }
    out
}

/// Scale an outline horizontally about its own center; vertical is untouched.
pub fn squish_horizontal(path: &BezPath, x_scale: f64) -> BezPath {
    if path.is_empty() {
        return path.clone();
    }
    let bbox = path.bounding_box();
    let center_x = (bbox.min_x() + bbox.max_x()) / 2.0;
    let transform = Affine::translate((center_x, 0.0))
        * Affine::scale_non_uniform(x_scale, 1.0)
        * Affine::translate((-center_x, 0.0));
    let mut squished = path.clone();
    squished.apply_affine(transform);
    squished
}

/// Replace every cubic segment with a quadratic spline approximation.
///
/// Returns `None` when kurbo cannot produce a spline, which only happens for
/// degenerate input.
pub fn to_quadratic(path: &BezPath, accuracy: f64) -> Option<BezPath> {
    let mut out = BezPath::new();
    let mut start = Point::ZERO;
    let mut current = Point::ZERO;
    for el in path.elements() {
        match el {
            PathEl::MoveTo(p) => {
                out.move_to(*p);
                start = *p;
                current = *p;
            }
            PathEl::LineTo(p) => {
                out.line_to(*p);
                current = *p;
            }
            PathEl::QuadTo(p1, p2) => {
                out.quad_to(*p1, *p2);
                current = *p2;
            }
            PathEl::CurveTo(p1, p2, p3) => {
                let cubic = CubicBez {
                    p0: current,
                    p1: *p1,
                    p2: *p2,
                    p3: *p3,
                };
                let quad_splines = cubics_to_quadratic_splines(&[cubic], accuracy)?;
                let quad_spline = quad_splines.first()?;
                quad_spline.to_quads().for_each(|quad| {
                    out.quad_to(quad.p1, quad.p2);
                });
                current = *p3;
            }
            PathEl::ClosePath => {
                out.close_path();
                current = start;
            }
        }
    }
    Some(out)
}

/// Split a path at MoveTo boundaries.
fn contours(path: &BezPath) -> Vec<Vec<PathEl>> {
    let mut result: Vec<Vec<PathEl>> = Vec::new();
    for el in path.elements() {
        if matches!(el, PathEl::MoveTo(..)) || result.is_empty() {
            result.push(Vec::new());
        }
        if let Some(contour) = result.last_mut() {
            contour.push(*el);
        }
    }
    result
}

/// Every point of a contour, on-curve and control alike, in order.
fn contour_points(contour: &[PathEl]) -> Vec<Point> {
    let mut points = Vec::new();
    for el in contour {
        match el {
            PathEl::MoveTo(p) | PathEl::LineTo(p) => points.push(*p),
            PathEl::QuadTo(p1, p2) => points.extend([*p1, *p2]),
            PathEl::CurveTo(p1, p2, p3) => points.extend([*p1, *p2, *p3]),
            PathEl::ClosePath => (),
        }
    }
    points
}

/// Per-point displacement moving each boundary edge of the control polygon
/// by `delta / 2`.
fn point_shifts(points: &[Point], delta: f64) -> Vec<Vec2> {
    let n = points.len();
    if n < 3 || delta == 0.0 {
        return vec![Vec2::ZERO; n];
    }
    // winding decides which edge normal faces away from the fill
    let orientation = if signed_area(points) >= 0.0 { 1.0 } else { -1.0 };
    let limit = delta.abs();
    (0..n)
        .map(|i| {
            let (Some(prev), Some(next)) = (distinct_neighbor(points, i, -1), distinct_neighbor(points, i, 1))
            else {
                return Vec2::ZERO;
            };
            let v_in = (points[i] - prev).normalize();
            let v_out = (next - points[i]).normalize();
            let normal_in = Vec2::new(v_in.y, -v_in.x) * orientation;
            let normal_out = Vec2::new(v_out.y, -v_out.x) * orientation;
            let bisector = normal_in + normal_out;
            let len2 = bisector.hypot2();
            if len2 < 1e-12 {
                return Vec2::ZERO;
            }
            // |shift| is delta/2 on a straight edge and grows at corners so
            // both adjacent edges still move delta/2 along their normals
            let shift = bisector * (delta / len2);
            if shift.hypot() > limit {
                shift * (limit / shift.hypot())
            } else {
                shift
            }
        })
        .collect()
}

/// The next point around the contour, in `step` direction, that is not
/// coincident with `points[i]`.
fn distinct_neighbor(points: &[Point], i: usize, step: isize) -> Option<Point> {
    let n = points.len() as isize;
    let mut j = i as isize;
    for _ in 1..n {
        j = (j + step).rem_euclid(n);
        let candidate = points[j as usize];
        if (candidate - points[i]).hypot2() > 1e-12 {
            return Some(candidate);
        }
    }
    None
}

/// Shoelace area; positive for counter-clockwise wound polygons (y-up).
fn signed_area(points: &[Point]) -> f64 {
    let n = points.len();
    let mut doubled = 0.0;
    for i in 0..n {
        let a = points[i];
        let b = points[(i + 1) % n];
        doubled += a.x * b.y - b.x * a.y;
    }
    doubled / 2.0
}

#[cfg(test)]
mod tests {
    use kurbo::{BezPath, PathEl, Shape};

    use super::{adjust_stroke_weight, squish_horizontal, to_quadratic, QUAD_ACCURACY};

    fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> BezPath {
        // counter-clockwise, y-up
        let mut path = BezPath::new();
        path.move_to((x0, y0));
        path.line_to((x1, y0));
        path.line_to((x1, y1));
        path.line_to((x0, y1));
        path.close_path();
        path
    }

    fn bounds(path: &BezPath) -> (f64, f64, f64, f64) {
        let b = path.bounding_box();
        (b.min_x(), b.min_y(), b.max_x(), b.max_y())
    }

    #[test]
    fn thinning_shrinks_a_bar() {
        let thinned = adjust_stroke_weight(&rect(0.0, 0.0, 100.0, 700.0), -10.0);
        assert_eq!((5.0, 5.0, 95.0, 695.0), bounds(&thinned));
    }

    #[test]
    fn thickening_grows_a_bar() {
        let fattened = adjust_stroke_weight(&rect(0.0, 0.0, 100.0, 700.0), 10.0);
        assert_eq!((-5.0, -5.0, 105.0, 705.0), bounds(&fattened));
    }

    #[test]
    fn winding_does_not_flip_the_result() {
        // same bar wound clockwise
        let mut path = BezPath::new();
        path.move_to((0.0, 0.0));
        path.line_to((0.0, 700.0));
        path.line_to((100.0, 700.0));
        path.line_to((100.0, 0.0));
        path.close_path();
        let thinned = adjust_stroke_weight(&path, -10.0);
        assert_eq!((5.0, 5.0, 95.0, 695.0), bounds(&thinned));
    }

    #[test]
    fn zero_delta_is_identity() {
        let bar = rect(0.0, 0.0, 100.0, 700.0);
        assert_eq!(bar, adjust_stroke_weight(&bar, 0.0));
    }

    #[test]
    fn squish_narrows_about_center() {
        let squished = squish_horizontal(&rect(0.0, 0.0, 100.0, 700.0), 0.7);
        let (x0, y0, x1, y1) = bounds(&squished);
        assert!((x0 - 15.0).abs() < 1e-9, "{x0}");
        assert!((x1 - 85.0).abs() < 1e-9, "{x1}");
        // vertical is untouched
        assert_eq!((0.0, 700.0), (y0, y1));
    }

    #[test]
    fn quadratic_conversion_eliminates_cubics() {
        let path = BezPath::from_svg("M0,0 C100,0 200,100 200,200 L0,200 Z").unwrap();
        let converted = to_quadratic(&path, QUAD_ACCURACY).unwrap();
        assert!(!converted
            .elements()
            .iter()
            .any(|el| matches!(el, PathEl::CurveTo(..))));
        assert!(converted
            .elements()
            .iter()
            .any(|el| matches!(el, PathEl::QuadTo(..))));
    }

    #[test]
    fn quadratic_conversion_preserves_lines() {
        let bar = rect(0.0, 0.0, 100.0, 700.0);
        assert_eq!(bar, to_quadratic(&bar, QUAD_ACCURACY).unwrap());
    }
}
