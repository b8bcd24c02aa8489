/// Integer pixel coordinate in analysis space.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Point) -> f64 {
        let dx = (other.x - self.x) as f64;
        let dy = (other.y - self.y) as f64;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Axis-aligned bounding box, inclusive of both edge pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoundingBox {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl BoundingBox {
    /// Width over height; 0.0 for a degenerate box.
    pub fn aspect_ratio(&self) -> f64 {
        if self.height <= 0 {
            return 0.0;
        }
        self.width as f64 / self.height as f64
    }
}

/// Raw spatial moments of a closed polygon (OpenCV naming).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Moments {
    pub m00: f64,
    pub m10: f64,
    pub m01: f64,
}

/// A concavity between two consecutive hull vertices.
///
/// Indices refer to the contour the hull was computed from; `depth` is the
/// distance in pixels from `far` to the hull edge `start`-`end`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConvexityDefect {
    pub start: usize,
    pub end: usize,
    pub far: usize,
    pub depth: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    #[test]
    fn test_distance_pythagorean() {
        assert_relative_eq!(Point::new(0, 0).distance(&Point::new(3, 4)), 5.0);
    }

    #[rstest]
    #[case::square(BoundingBox { x: 0, y: 0, width: 40, height: 40 }, 1.0)]
    #[case::wide(BoundingBox { x: 5, y: 5, width: 80, height: 40 }, 2.0)]
    #[case::tall(BoundingBox { x: 0, y: 0, width: 20, height: 80 }, 0.25)]
    #[case::degenerate(BoundingBox { x: 0, y: 0, width: 20, height: 0 }, 0.0)]
    fn test_aspect_ratio(#[case] bbox: BoundingBox, #[case] expected: f64) {
        assert_relative_eq!(bbox.aspect_ratio(), expected);
    }
}
