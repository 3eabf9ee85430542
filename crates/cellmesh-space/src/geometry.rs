//! Exact proximity tests used after bucket pre-filtering.

use glam::DVec2;

/// Relative tolerance for treating a point as lying on a polygon edge.
const EDGE_EPSILON: f64 = 1e-12;

/// Corners of the band of half-width `radius` around segment `p1 → p2`,
/// in the order `[p1 + n·r, p1 − n·r, p2 − n·r, p2 + n·r]`.
///
/// `normal` is the unit outward normal of the segment.
pub fn element_rectangle(p1: DVec2, p2: DVec2, normal: DVec2, radius: f64) -> [DVec2; 4] {
    let offset = normal * radius;
    [p1 + offset, p1 - offset, p2 - offset, p2 + offset]
}

/// Whether `p` lies inside or on the boundary of `polygon`.
///
/// Points on an edge count as inside. Interior points are decided by the
/// even-odd crossing rule, so the polygon may be given in either winding.
pub fn point_in_polygon(p: DVec2, polygon: &[DVec2]) -> bool {
    let n = polygon.len();
    if n == 0 {
        return false;
    }
    for k in 0..n {
        if on_segment(p, polygon[k], polygon[(k + 1) % n]) {
            return true;
        }
    }

    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let (a, b) = (polygon[i], polygon[j]);
        if (a.y > p.y) != (b.y > p.y) {
            let x_cross = a.x + (p.y - a.y) * (b.x - a.x) / (b.y - a.y);
            if p.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Whether `p` lies on the closed segment `a → b`.
///
/// Measured as the distance from `p` to the nearest point of the segment,
/// against a tolerance relative to the segment's coordinates. A zero-length
/// segment is the single point `a`.
fn on_segment(p: DVec2, a: DVec2, b: DVec2) -> bool {
    let ab = b - a;
    let len_sq = ab.length_squared();
    let nearest = if len_sq > 0.0 {
        a + ab * ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0)
    } else {
        a
    };
    let tolerance = EDGE_EPSILON * a.abs().max(b.abs()).max_element().max(1.0);
    p.distance_squared(nearest) <= tolerance * tolerance
}
