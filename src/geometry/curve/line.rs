use crate::math::{Point2, TOLERANCE};

use super::Curve;

/// A straight segment between two points.
///
/// The parametric form is: `P(t) = start + t * (end - start)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    start: Point2,
    end: Point2,
}

impl Line {
    /// Creates a new segment from `start` to `end`.
    #[must_use]
    pub fn new(start: Point2, end: Point2) -> Self {
        Self { start, end }
    }

    /// Linear height interpolation above `x`, clamped to the segment's span.
    #[must_use]
    pub fn height_at(&self, x: f64) -> f64 {
        let dx = self.end.x - self.start.x;
        if dx.abs() < TOLERANCE {
            return self.start.y.max(self.end.y);
        }
        let t = ((x - self.start.x) / dx).clamp(0.0, 1.0);
        self.start.y + t * (self.end.y - self.start.y)
    }
}

impl Curve for Line {
    fn point_at(&self, t: f64) -> Point2 {
        self.start + (self.end - self.start) * t
    }

    fn length(&self) -> f64 {
        (self.end - self.start).norm()
    }

    fn start(&self) -> Point2 {
        self.start
    }

    fn end(&self) -> Point2 {
        self.end
    }
}
