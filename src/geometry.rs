//! Geometric primitives for chart layout.
//!
//! Points live in chart space: `x` grows to the right across the available
//! width and `y` is the height above the baseline.

use serde::Serialize;

/// A 2D point with floating-point coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Point {
    /// X coordinate.
    pub x: f32,
    /// Y coordinate.
    pub y: f32,
}

impl Point {
    /// Origin point (0, 0).
    pub const ORIGIN: Self = Self::new(0.0, 0.0);

    /// Create a new point.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Calculate the distance to another point.
    #[must_use]
    pub fn distance(self, other: Self) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// A connecting segment between two consecutive line-chart points.
///
/// Renderers that only draw rotated rectangles need the segment's length and
/// rotation rather than its endpoints, so both are precomputed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Segment {
    /// Start point.
    pub start: Point,
    /// End point.
    pub end: Point,
    /// Euclidean length.
    pub length: f32,
    /// Rotation in radians, `atan2(dy, dx)`.
    pub angle: f32,
}

impl Segment {
    /// Create a segment between two points.
    #[must_use]
    pub fn between(start: Point, end: Point) -> Self {
        let dx = end.x - start.x;
        let dy = end.y - start.y;
        Self { start, end, length: start.distance(end), angle: dy.atan2(dx) }
    }

    /// Rotation in degrees.
    #[must_use]
    pub fn angle_degrees(&self) -> f32 {
        self.angle.to_degrees()
    }

    /// Midpoint of the segment.
    #[must_use]
    pub fn midpoint(&self) -> Point {
        Point::new((self.start.x + self.end.x) / 2.0, (self.start.y + self.end.y) / 2.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_distance() {
        let p1 = Point::new(0.0, 0.0);
        let p2 = Point::new(3.0, 4.0);
        assert!((p1.distance(p2) - 5.0).abs() < 0.001);
    }

    #[test]
    fn test_segment_length_and_angle() {
        let seg = Segment::between(Point::ORIGIN, Point::new(3.0, 4.0));
        assert!((seg.length - 5.0).abs() < 0.001);
        assert!((seg.angle - 4.0_f32.atan2(3.0)).abs() < 0.001);
    }

    #[test]
    fn test_segment_flat() {
        let seg = Segment::between(Point::new(0.0, 10.0), Point::new(20.0, 10.0));
        assert!(seg.angle.abs() < f32::EPSILON);
        assert!((seg.length - 20.0).abs() < 0.001);
    }

    #[test]
    fn test_segment_descending() {
        let seg = Segment::between(Point::new(0.0, 10.0), Point::new(10.0, 0.0));
        assert!((seg.angle_degrees() + 45.0).abs() < 0.001);
    }

    #[test]
    fn test_segment_midpoint() {
        let seg = Segment::between(Point::ORIGIN, Point::new(10.0, 10.0));
        assert_eq!(seg.midpoint(), Point::new(5.0, 5.0));
    }
}
