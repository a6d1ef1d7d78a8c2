mod arc;
mod line;

pub use arc::Arc;
pub use line::Line;

use crate::math::Point2;

/// Trait for finite parametric curves in a 2D plane.
///
/// Parameters are normalized: `t = 0` is the start point and `t = 1` the end.
pub trait Curve {
    /// Evaluates the curve at normalized parameter `t`.
    fn point_at(&self, t: f64) -> Point2;

    /// Returns the arc length of the curve.
    fn length(&self) -> f64;

    /// Returns the start point.
    fn start(&self) -> Point2 {
        self.point_at(0.0)
    }

    /// Returns the end point.
    fn end(&self) -> Point2 {
        self.point_at(1.0)
    }
}

/// A curve segment used for wall plans and cut profiles.
#[derive(Debug, Clone, PartialEq)]
pub enum CurveSegment {
    /// A straight segment.
    Line(Line),
    /// A circular arc.
    Arc(Arc),
}

impl CurveSegment {
    /// Shorthand for a straight segment.
    #[must_use]
    pub fn line(start: Point2, end: Point2) -> Self {
        Self::Line(Line::new(start, end))
    }

    /// Height (`y`) of the curve above `x`.
    ///
    /// Cut profiles live in a plane whose x axis runs along the wall and whose
    /// y axis is the height above the floor. Profiles are expected to be
    /// x-monotone; `x` is clamped to the curve's span.
    #[must_use]
    pub fn height_at(&self, x: f64) -> f64 {
        match self {
            Self::Line(line) => line.height_at(x),
            Self::Arc(arc) => arc.height_at(x),
        }
    }
}

impl Curve for CurveSegment {
    fn point_at(&self, t: f64) -> Point2 {
        match self {
            Self::Line(line) => line.point_at(t),
            Self::Arc(arc) => arc.point_at(t),
        }
    }

    fn length(&self) -> f64 {
        match self {
            Self::Line(line) => line.length(),
            Self::Arc(arc) => arc.length(),
        }
    }
}

impl From<Line> for CurveSegment {
    fn from(line: Line) -> Self {
        Self::Line(line)
    }
}

impl From<Arc> for CurveSegment {
    fn from(arc: Arc) -> Self {
        Self::Arc(arc)
    }
}
