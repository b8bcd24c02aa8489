use crate::segmentation::domain::mask::Mask;
use crate::shared::config::ProcessorConfig;
use crate::shared::geometry::Point;
use crate::vision::domain::vision_primitives::{Contour, VisionPrimitives};

/// The single blob accepted as the hand for this frame.
#[derive(Clone, Debug, PartialEq)]
pub struct HandRegion {
    pub contour: Contour,
    /// Enclosed area in analysis pixels.
    pub area: f64,
    pub centroid: (f64, f64),
}

/// Result of region selection, including why a frame produced no hand.
#[derive(Clone, Debug, PartialEq)]
pub enum SelectionOutcome {
    NoContours,
    TooSmall { area: f64 },
    TooLarge { area: f64 },
    /// Centroid sits in the top band of the frame where faces usually are.
    FaceRejected { centroid_y: f64 },
    Accepted(HandRegion),
}

impl SelectionOutcome {
    pub fn region(&self) -> Option<&HandRegion> {
        match self {
            SelectionOutcome::Accepted(region) => Some(region),
            _ => None,
        }
    }

    pub fn into_region(self) -> Option<HandRegion> {
        match self {
            SelectionOutcome::Accepted(region) => Some(region),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SelectionOutcome::NoContours => "no-contours",
            SelectionOutcome::TooSmall { .. } => "too-small",
            SelectionOutcome::TooLarge { .. } => "too-large",
            SelectionOutcome::FaceRejected { .. } => "face-rejected",
            SelectionOutcome::Accepted(_) => "accepted",
        }
    }
}

/// Picks the largest contour in the mask and vets it as a hand candidate.
pub struct RegionSelector {
    min_area: f64,
    max_area: f64,
    face_zone_fraction: f64,
}

impl RegionSelector {
    pub fn new(config: &ProcessorConfig) -> Self {
        Self {
            min_area: config.min_area,
            max_area: config.max_area,
            face_zone_fraction: config.face_zone_fraction,
        }
    }

    pub fn select(&self, vision: &dyn VisionPrimitives, mask: &Mask) -> SelectionOutcome {
        let contours = vision.find_contours(mask.image());

        let Some((contour, area)) = contours
            .into_iter()
            .map(|c| {
                let area = vision.contour_area(&c);
                (c, area)
            })
            .max_by(|a, b| a.1.total_cmp(&b.1))
        else {
            return SelectionOutcome::NoContours;
        };

        if area < self.min_area {
            return SelectionOutcome::TooSmall { area };
        }
        if area > self.max_area {
            return SelectionOutcome::TooLarge { area };
        }

        let centroid = centroid(vision, &contour);
        let face_zone = self.face_zone_fraction * mask.height() as f64;
        if centroid.1 < face_zone {
            return SelectionOutcome::FaceRejected {
                centroid_y: centroid.1,
            };
        }

        SelectionOutcome::Accepted(HandRegion {
            contour,
            area,
            centroid,
        })
    }
}

/// Moment centroid, or the vertex mean when the polygon encloses no area.
fn centroid(vision: &dyn VisionPrimitives, contour: &[Point]) -> (f64, f64) {
    let m = vision.moments(contour);
    if m.m00 > f64::EPSILON {
        return (m.m10 / m.m00, m.m01 / m.m00);
    }
    if contour.is_empty() {
        return (0.0, 0.0);
    }
    let n = contour.len() as f64;
    let sx: f64 = contour.iter().map(|p| p.x as f64).sum();
    let sy: f64 = contour.iter().map(|p| p.y as f64).sum();
    (sx / n, sy / n)
}
