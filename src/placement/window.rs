use crate::geometry::{Arc, CurveSegment};
use crate::math::{Point2, TOLERANCE};
use crate::planning::{CutObject, WallSegment};

use super::ObjectPlacer;

/// Places one window, as wide as padding allows, on every wall segment.
///
/// Heights are measured from the floor. With an arch bulge the head becomes
/// a circular arc; a negative bulge arches upward. The head, arch included,
/// never rises above the ceiling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowPlacer {
    padding: f64,
    sill: f64,
    head: f64,
    arch_bulge: Option<f64>,
}

impl WindowPlacer {
    /// Creates a placer with explicit padding and sill/head heights.
    #[must_use]
    pub fn new(padding: f64, sill: f64, head: f64) -> Self {
        Self {
            padding,
            sill,
            head,
            arch_bulge: None,
        }
    }

    /// Default proportions for the given cell sizes: `h / 6` padding on both
    /// sides, sill at `3v / 8` and head at `7v / 8`.
    #[must_use]
    pub fn for_units(h_unit: f64, v_unit: f64) -> Self {
        Self::new(h_unit / 6.0, v_unit * 3.0 / 8.0, v_unit * 7.0 / 8.0)
    }

    /// Gives every window an arched head with the given bulge.
    #[must_use]
    pub fn with_arch(mut self, bulge: f64) -> Self {
        self.arch_bulge = Some(bulge);
        self
    }

    /// Horizontal padding on each side of the window.
    #[must_use]
    pub fn padding(&self) -> f64 {
        self.padding
    }
}

impl ObjectPlacer for WindowPlacer {
    fn place(&self, segment: &WallSegment) -> Vec<CutObject> {
        let width = segment.length - 2.0 * self.padding;
        let head = self.head.min(segment.height());
        if width <= TOLERANCE || head - self.sill <= TOLERANCE {
            return Vec::new();
        }
        let bottom = CurveSegment::line(Point2::new(0.0, self.sill), Point2::new(width, self.sill));
        let head_start = Point2::new(0.0, head);
        let head_end = Point2::new(width, head);
        let (top, points) = match self.arch_bulge {
            Some(bulge) => {
                // The sagitta is half the chord times the bulge; the arch
                // stays between the sill and the ceiling.
                let half = width / 2.0;
                let rise = ((segment.height() - head) / half).min(1.0);
                let sag = ((head - self.sill) / half).min(1.0);
                let bulge = bulge.clamp(-rise, sag);
                (Arc::new(head_start, head_end, bulge).into(), 8)
            }
            None => (CurveSegment::line(head_start, head_end), 2),
        };
        vec![CutObject {
            start: self.padding,
            end: segment.length - self.padding,
            bottom,
            top,
            min_points: points,
            max_points: points,
        }]
    }
}
