use crate::geometry::{Curve, CurveSegment};
use crate::math::Point2;
use crate::slicing::FaceId;

/// Minimum and maximum number of sample points requested for a curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurveSamples {
    pub min_points: usize,
    pub max_points: usize,
}

impl CurveSamples {
    /// Creates a new sample range.
    #[must_use]
    pub fn new(min_points: usize, max_points: usize) -> Self {
        Self {
            min_points,
            max_points,
        }
    }

    /// Number of evenly spaced intervals the mesher steps through.
    #[must_use]
    pub fn intervals(&self) -> usize {
        self.min_points.saturating_sub(1).max(1)
    }
}

impl Default for CurveSamples {
    fn default() -> Self {
        Self::new(2, 2)
    }
}

/// A feature cut into a wall segment, such as a window.
///
/// `start` and `end` are arc-length offsets along the segment. The bottom and
/// top profiles live in the object's own plane: x runs from `0` to the cut
/// length along the wall, y is the height above the floor.
#[derive(Debug, Clone, PartialEq)]
pub struct CutObject {
    pub start: f64,
    pub end: f64,
    pub bottom: CurveSegment,
    pub top: CurveSegment,
    pub min_points: usize,
    pub max_points: usize,
}

impl CutObject {
    /// Arc length covered by the cut.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.end - self.start
    }

    /// Sample range of the cut profiles.
    #[must_use]
    pub fn samples(&self) -> CurveSamples {
        CurveSamples::new(self.min_points, self.max_points)
    }
}

/// A contiguous run of wall curves sharing one planner, ready for cut
/// placement and meshing.
#[derive(Debug, Clone)]
pub struct WallSegment {
    /// Index of the loop within its group.
    pub loop_index: usize,
    /// Floor-level plan curves in walking order.
    pub floor_curves: Vec<CurveSegment>,
    /// Ceiling-level plan curves, parallel to `floor_curves`.
    pub ceiling_curves: Vec<CurveSegment>,
    /// Arc-length range of each curve along the segment.
    pub ranges: Vec<(f64, f64)>,
    /// Sample range of each curve.
    pub samples: Vec<CurveSamples>,
    /// Total arc length.
    pub length: f64,
    /// World height of the floor.
    pub floor_y: f64,
    /// World height of the ceiling.
    pub ceiling_y: f64,
    /// First face of the run.
    pub start_face: FaceId,
    /// Last face of the run.
    pub end_face: FaceId,
    /// Cut objects ordered by start offset.
    pub objects: Vec<CutObject>,
}

impl WallSegment {
    /// Builds a segment from its floor curves, using the same shape at the ceiling.
    #[must_use]
    pub fn new(
        loop_index: usize,
        curves: Vec<CurveSegment>,
        samples: CurveSamples,
        (floor_y, ceiling_y): (f64, f64),
        (start_face, end_face): (FaceId, FaceId),
    ) -> Self {
        let mut ranges = Vec::with_capacity(curves.len());
        let mut length = 0.0;
        for curve in &curves {
            let next = length + curve.length();
            ranges.push((length, next));
            length = next;
        }
        Self {
            loop_index,
            samples: vec![samples; curves.len()],
            ceiling_curves: curves.clone(),
            floor_curves: curves,
            ranges,
            length,
            floor_y,
            ceiling_y,
            start_face,
            end_face,
            objects: Vec::new(),
        }
    }

    /// Wall height between floor and ceiling.
    #[must_use]
    pub fn height(&self) -> f64 {
        self.ceiling_y - self.floor_y
    }

    /// Plan position where the segment starts.
    #[must_use]
    pub fn start_point(&self) -> Option<Point2> {
        self.floor_curves.first().map(Curve::start)
    }

    /// Plan position where the segment ends.
    #[must_use]
    pub fn end_point(&self) -> Option<Point2> {
        self.floor_curves.last().map(Curve::end)
    }
}
