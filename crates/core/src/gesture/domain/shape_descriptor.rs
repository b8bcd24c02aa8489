use std::f64::consts::PI;

use crate::segmentation::domain::region_selector::HandRegion;
use crate::shared::config::ProcessorConfig;
use crate::shared::geometry::{BoundingBox, ConvexityDefect, Point};
use crate::vision::domain::vision_primitives::VisionPrimitives;

/// Geometric features of one accepted hand region.
#[derive(Clone, Debug, PartialEq)]
pub struct ShapeDescriptors {
    pub area: f64,
    pub centroid: (f64, f64),
    pub bbox: BoundingBox,
    /// Bounding box width over height.
    pub aspect_ratio: f64,
    pub perimeter: f64,
    /// `4π·area / perimeter²`; 1.0 for a perfect circle, 0.0 when the
    /// perimeter is degenerate.
    pub circularity: f64,
    pub hull_area: f64,
    /// `area / hull_area`; `None` when the hull encloses no area.
    pub solidity: Option<f64>,
    /// Convexity defects shaped like the gap between two extended fingers.
    pub finger_gaps: usize,
}

pub struct ShapeDescriptorExtractor {
    min_defect_depth: f64,
    max_defect_angle_deg: f64,
}

impl ShapeDescriptorExtractor {
    pub fn new(config: &ProcessorConfig) -> Self {
        Self {
            min_defect_depth: config.min_defect_depth,
            max_defect_angle_deg: config.max_defect_angle_deg,
        }
    }

    pub fn extract(&self, vision: &dyn VisionPrimitives, region: &HandRegion) -> ShapeDescriptors {
        let contour = &region.contour;
        let bbox = vision.bounding_rect(contour);

        let perimeter = vision.arc_length(contour);
        let circularity = if perimeter > f64::EPSILON {
            4.0 * PI * region.area / (perimeter * perimeter)
        } else {
            0.0
        };

        let hull = vision.convex_hull(contour);
        let hull_points: Vec<Point> = hull.iter().map(|&i| contour[i]).collect();
        let hull_area = vision.contour_area(&hull_points);
        let solidity = (hull_area > f64::EPSILON).then(|| region.area / hull_area);

        // Degenerate hulls yield no defects; the classifier then relies on
        // solidity and aspect ratio alone.
        let finger_gaps = vision
            .convexity_defects(contour, &hull)
            .map(|defects| {
                defects
                    .iter()
                    .filter(|d| self.is_finger_gap(contour, d))
                    .count()
            })
            .unwrap_or(0);

        ShapeDescriptors {
            area: region.area,
            centroid: region.centroid,
            bbox,
            aspect_ratio: bbox.aspect_ratio(),
            perimeter,
            circularity,
            hull_area,
            solidity,
            finger_gaps,
        }
    }

    fn is_finger_gap(&self, contour: &[Point], defect: &ConvexityDefect) -> bool {
        if defect.depth <= self.min_defect_depth {
            return false;
        }
        defect_angle_deg(contour, defect).is_some_and(|angle| angle <= self.max_defect_angle_deg)
    }
}

/// Interior angle at the far point of the (start, far, end) triangle, by
/// the law of cosines. `None` when a side adjacent to the far point has
/// zero length.
pub fn defect_angle_deg(contour: &[Point], defect: &ConvexityDefect) -> Option<f64> {
    let start = contour.get(defect.start)?;
    let end = contour.get(defect.end)?;
    let far = contour.get(defect.far)?;

    let a = start.distance(end);
    let b = far.distance(start);
    let c = end.distance(far);
    if b <= f64::EPSILON || c <= f64::EPSILON {
        return None;
    }
    let cos = ((b * b + c * c - a * a) / (2.0 * b * c)).clamp(-1.0, 1.0);
    Some(cos.acos().to_degrees())
}
