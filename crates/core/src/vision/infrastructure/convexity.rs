use std::collections::HashMap;

use crate::shared::geometry::{ConvexityDefect, Point};
use crate::vision::infrastructure::polygon_math::line_distance;

/// Maps hull vertices back to their first occurrence in the contour.
///
/// Returned indices are sorted and unique, i.e. in contour traversal order.
pub fn hull_indices(contour: &[Point], hull: &[Point]) -> Vec<usize> {
    let mut first_seen: HashMap<Point, usize> = HashMap::with_capacity(contour.len());
    for (i, p) in contour.iter().enumerate() {
        first_seen.entry(*p).or_insert(i);
    }
    let mut indices: Vec<usize> = hull
        .iter()
        .filter_map(|p| first_seen.get(p).copied())
        .collect();
    indices.sort_unstable();
    indices.dedup();
    indices
}

/// Deepest contour point between each pair of consecutive hull vertices.
///
/// Returns `None` for hulls with fewer than three vertices or indices
/// outside the contour; such shapes have no meaningful concavities.
pub fn convexity_defects(contour: &[Point], hull: &[usize]) -> Option<Vec<ConvexityDefect>> {
    let n = contour.len();
    if n < 4 || hull.len() < 3 || hull.iter().any(|&i| i >= n) {
        return None;
    }

    let mut defects = Vec::new();
    for (j, &start) in hull.iter().enumerate() {
        let end = hull[(j + 1) % hull.len()];
        if start == end {
            continue;
        }
        let a = contour[start];
        let b = contour[end];

        let mut deepest: Option<(usize, f64)> = None;
        let mut idx = (start + 1) % n;
        while idx != end {
            let depth = line_distance(contour[idx], a, b);
            if deepest.map_or(true, |(_, d)| depth > d) {
                deepest = Some((idx, depth));
            }
            idx = (idx + 1) % n;
        }

        if let Some((far, depth)) = deepest {
            if depth > 0.0 {
                defects.push(ConvexityDefect {
                    start,
                    end,
                    far,
                    depth,
                });
            }
        }
    }
    Some(defects)
}
