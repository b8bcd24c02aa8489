//! Closed-polygon math the imageproc adapter needs beyond what imageproc
//! provides.
//!
//! Contours are treated as closed: the last point connects back to the first.

use crate::shared::geometry::{BoundingBox, Moments, Point};

fn cross(a: Point, b: Point) -> f64 {
    a.x as f64 * b.y as f64 - a.y as f64 * b.x as f64
}

/// Raw moments via Green's theorem, normalized to positive orientation.
pub fn polygon_moments(points: &[Point]) -> Moments {
    let n = points.len();
    let (mut m00, mut m10, mut m01) = (0.0, 0.0, 0.0);
    if n >= 3 {
        for i in 0..n {
            let p = points[i];
            let q = points[(i + 1) % n];
            let c = cross(p, q);
            m00 += c;
            m10 += (p.x + q.x) as f64 * c;
            m01 += (p.y + q.y) as f64 * c;
        }
        m00 /= 2.0;
        m10 /= 6.0;
        m01 /= 6.0;
    }
    if m00 < 0.0 {
        Moments {
            m00: -m00,
            m10: -m10,
            m01: -m01,
        }
    } else {
        Moments { m00, m10, m01 }
    }
}

pub fn bounding_box(points: &[Point]) -> BoundingBox {
    let Some(first) = points.first() else {
        return BoundingBox {
            x: 0,
            y: 0,
            width: 0,
            height: 0,
        };
    };
    let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
    for p in points {
        min_x = min_x.min(p.x);
        min_y = min_y.min(p.y);
        max_x = max_x.max(p.x);
        max_y = max_y.max(p.y);
    }
    BoundingBox {
        x: min_x,
        y: min_y,
        width: max_x - min_x + 1,
        height: max_y - min_y + 1,
    }
}

/// Perpendicular distance from `p` to the line through `a` and `b`.
///
/// Degenerates to point distance when `a == b`.
pub fn line_distance(p: Point, a: Point, b: Point) -> f64 {
    let len = a.distance(&b);
    if len <= f64::EPSILON {
        return p.distance(&a);
    }
    let ab = Point::new(b.x - a.x, b.y - a.y);
    let ap = Point::new(p.x - a.x, p.y - a.y);
    cross(ab, ap).abs() / len
}

/// Drops vertices lying in the middle of a straight run.
pub fn compress_collinear(points: &[Point]) -> Vec<Point> {
    let n = points.len();
    if n < 3 {
        return points.to_vec();
    }
    let kept: Vec<Point> = (0..n)
        .filter(|&i| {
            let prev = points[(i + n - 1) % n];
            let cur = points[i];
            let next = points[(i + 1) % n];
            let d1 = Point::new(cur.x - prev.x, cur.y - prev.y);
            let d2 = Point::new(next.x - cur.x, next.y - cur.y);
            let dot = d1.x as i64 * d2.x as i64 + d1.y as i64 * d2.y as i64;
            !(cross(d1, d2) == 0.0 && dot > 0)
        })
        .map(|i| points[i])
        .collect();
    if kept.is_empty() {
        points.to_vec()
    } else {
        kept
    }
}
