// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

use tess_graph::Point;

/// Distance between two points.
pub fn distance(a: Point, b: Point) -> f64 {
    (b.x - a.x).hypot(b.y - a.y)
}

/// Midpoint of `a` and `b`.
pub fn midpoint(a: Point, b: Point) -> Point {
    Point::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0)
}

/// Point a fraction `t` of the way from `a` to `b`.
pub fn interpolate(a: Point, b: Point, t: f64) -> Point {
    Point::new((1.0 - t) * a.x + t * b.x, (1.0 - t) * a.y + t * b.y)
}

/// Rotates `p` about `center` by `radians` (clockwise on a y-down canvas).
pub fn rotate(p: Point, center: Point, radians: f64) -> Point {
    let (sin, cos) = radians.sin_cos();
    let (dx, dy) = (p.x - center.x, p.y - center.y);
    Point::new(
        center.x + dx * cos - dy * sin,
        center.y + dx * sin + dy * cos,
    )
}

/// Vertices of a regular polygon with `sides` vertices on a circle of
/// `radius` around `center`, rotated by `rotation` radians.
///
/// The first vertex sits at `90° + 180°/sides`, which puts one edge flat
/// along the bottom of the shape before rotation.
pub fn regular_polygon(sides: usize, center: Point, radius: f64, rotation: f64) -> Vec<Point> {
    if sides == 0 {
        return Vec::new();
    }
    #[allow(clippy::cast_precision_loss)]
    let step = std::f64::consts::TAU / sides as f64;
    let start = std::f64::consts::FRAC_PI_2 + step / 2.0;
    (0..sides)
        .map(|i| {
            #[allow(clippy::cast_precision_loss)]
            let angle = start + step * i as f64;
            let vertex = Point::new(
                center.x + radius * angle.cos(),
                center.y + radius * angle.sin(),
            );
            rotate(vertex, center, rotation)
        })
        .collect()
}

/// Parses an angle in degrees, returning radians. Unparsable text is 0.
pub fn degrees(text: &str) -> f64 {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|d| d.is_finite())
        .unwrap_or(0.0)
        .to_radians()
}

/// Parses a percentage in `0..=100` as a factor in `0..=1`. Anything else
/// (out of range or unparsable) is 0.
pub fn percent(text: &str) -> f64 {
    match text.trim().parse::<f64>() {
        Ok(p) if (0.0..=100.0).contains(&p) => p / 100.0,
        _ => 0.0,
    }
}

/// End points of a straight line after sliding and trimming.
///
/// Each end first slides towards its secondary point by its slide factor,
/// then moves towards the other end by its trim factor. When the trims
/// overlap both ends collapse onto the midpoint of the slid ends.
pub fn trimmed_line(
    (e1, e1_next): (Point, Point),
    (e2, e2_next): (Point, Point),
    trims: (f64, f64),
    slides: (f64, f64),
) -> [Point; 2] {
    let a = interpolate(e1, e1_next, slides.0);
    let b = interpolate(e2, e2_next, slides.1);
    let ta = interpolate(a, b, trims.0);
    let tb = interpolate(b, a, trims.1);
    if distance(tb, a) < distance(ta, a) || distance(ta, b) < distance(tb, b) {
        let mid = midpoint(a, b);
        return [mid, mid];
    }
    [ta, tb]
}
