use crate::math::arc_2d::{arc_from_bulge, arc_height_at, ArcGeometry};
use crate::math::Point2;

use super::{Curve, Line};

/// A circular arc between two points, encoded by its bulge.
///
/// A zero bulge (or coincident endpoints) degenerates to a straight segment.
#[derive(Debug, Clone, PartialEq)]
pub struct Arc {
    start: Point2,
    end: Point2,
    bulge: f64,
    geometry: Option<ArcGeometry>,
}

impl Arc {
    /// Creates an arc from `start` to `end` with the given bulge.
    #[must_use]
    pub fn new(start: Point2, end: Point2, bulge: f64) -> Self {
        let geometry = arc_from_bulge(&start, &end, bulge);
        Self {
            start,
            end,
            bulge,
            geometry,
        }
    }

    /// Returns the bulge (`tan(sweep / 4)`).
    #[must_use]
    pub fn bulge(&self) -> f64 {
        self.bulge
    }

    /// Height of the arc above `x`, clamped to the arc's span.
    #[must_use]
    pub fn height_at(&self, x: f64) -> f64 {
        let Some(arc) = &self.geometry else {
            return Line::new(self.start, self.end).height_at(x);
        };
        let (lo, hi) = if self.start.x <= self.end.x {
            (self.start.x, self.end.x)
        } else {
            (self.end.x, self.start.x)
        };
        let bulge_up = arc.point_at(0.5).y >= (self.start.y + self.end.y) * 0.5;
        arc_height_at(arc, x.clamp(lo, hi), bulge_up)
    }
}

impl Curve for Arc {
    fn point_at(&self, t: f64) -> Point2 {
        match &self.geometry {
            Some(arc) => arc.point_at(t),
            None => self.start + (self.end - self.start) * t,
        }
    }

    fn length(&self) -> f64 {
        match &self.geometry {
            Some(arc) => arc.length(),
            None => (self.end - self.start).norm(),
        }
    }

    fn start(&self) -> Point2 {
        self.start
    }

    fn end(&self) -> Point2 {
        self.end
    }
}
