use crate::error::MeshError;
use crate::geometry::Curve;
use crate::math::STEP_EPSILON;
use crate::planning::{CutObject, WallSegment};

/// Position of the walk on one curve of the segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveCursor {
    /// Index into the segment's curves.
    pub index: usize,
    /// Arc length of the curve.
    pub length: f64,
    /// Evenly spaced sample intervals on the curve.
    pub intervals: usize,
    /// Samples already passed.
    pub point: usize,
    /// Distance travelled on the curve.
    pub dist: f64,
    /// Distance on the curve of the next sample.
    pub next_step: f64,
    /// Whether another curve of the segment follows.
    pub internal: bool,
}

impl CurveCursor {
    #[allow(clippy::cast_precision_loss)]
    fn at(segment: &WallSegment, index: usize, dist_along_seg: f64) -> Self {
        let length = segment.floor_curves[index].length();
        let intervals = segment.samples[index].intervals();
        let range_start = segment.ranges[index].0;
        Self {
            index,
            length,
            intervals,
            point: 0,
            dist: (dist_along_seg - range_start).max(0.0),
            next_step: length / intervals as f64,
            internal: index + 1 < segment.floor_curves.len(),
        }
    }

    /// Normalized parameter of the current position on the curve.
    #[must_use]
    pub fn t(&self) -> f64 {
        if self.length <= 0.0 {
            0.0
        } else {
            (self.dist / self.length).clamp(0.0, 1.0)
        }
    }
}

/// Position of the walk relative to a registered cut object.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObjectCursor {
    /// Arc length covered by the object.
    pub length: f64,
    /// Evenly spaced sample intervals across the object.
    pub intervals: usize,
    /// Whether the walk has reached the object's start.
    pub entered: bool,
    /// Samples already passed.
    pub point: usize,
    /// Distance along the object; negative before its start.
    pub dist: f64,
    /// Distance along the object of the next stop.
    pub next_step: f64,
}

/// Mesher state for one wall segment, advanced by pure step functions.
///
/// The walk is driven by a target arc length. Each [`Self::step`] stops at
/// the nearest of the target, the next curve sample and the next object
/// sample, so every stop is a point where a vertical checkpoint is taken.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MesherState {
    /// Distance travelled along the whole segment.
    pub dist_along_seg: f64,
    /// Length of the segment being walked.
    pub length: f64,
    /// Stepping slack for this segment, see [`STEP_EPSILON`].
    pub tolerance: f64,
    pub curve: CurveCursor,
    pub object: Option<ObjectCursor>,
}

impl MesherState {
    /// State at the start of `segment`.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::EmptySegment`] if the segment has no curves.
    pub fn start(segment: &WallSegment) -> Result<Self, MeshError> {
        if segment.floor_curves.is_empty() {
            return Err(MeshError::EmptySegment);
        }
        Ok(Self {
            dist_along_seg: 0.0,
            length: segment.length,
            tolerance: STEP_EPSILON * segment.length.min(1.0),
            curve: CurveCursor::at(segment, 0, 0.0),
            object: None,
        })
    }

    /// Registers `cut` as the next object to walk through.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::InvalidCut`] unless `0 <= start < end <= length`,
    /// or [`MeshError::CutTooLate`] if the walk is already past the cut's
    /// start.
    pub fn with_object(self, cut: &CutObject) -> Result<Self, MeshError> {
        let fits = cut.start >= 0.0
            && cut.start < cut.end
            && cut.end <= self.length + self.tolerance;
        if !fits {
            return Err(MeshError::InvalidCut {
                start: cut.start,
                end: cut.end,
                length: self.length,
            });
        }
        let dist = self.dist_along_seg - cut.start;
        if dist > 0.0 {
            return Err(MeshError::CutTooLate { overshoot: dist });
        }
        Ok(Self {
            object: Some(ObjectCursor {
                length: cut.length(),
                intervals: cut.samples().intervals(),
                entered: false,
                point: 0,
                dist,
                next_step: 0.0,
            }),
            ..self
        })
    }

    /// Drops the current object once its end has been reached.
    #[must_use]
    pub fn without_object(self) -> Self {
        Self {
            object: None,
            ..self
        }
    }

    /// Whether the walk still has to move to reach `target`.
    #[must_use]
    pub fn before(&self, target: f64) -> bool {
        self.dist_along_seg + self.tolerance < target
    }

    /// Whether checkpoints at this position cut through an object.
    #[must_use]
    pub fn in_object(&self) -> bool {
        self.object.is_some_and(|o| o.entered)
    }

    /// Distance along the active object, if the walk is inside one.
    #[must_use]
    pub fn object_offset(&self) -> Option<f64> {
        self.object.filter(|o| o.entered).map(|o| o.dist)
    }

    /// Advances one stop toward `target`, never past it.
    #[must_use]
    pub fn step(self, segment: &WallSegment, target: f64) -> Self {
        let to_target = target - self.dist_along_seg;
        let to_curve = self.curve.next_step - self.curve.dist;
        let to_object = self.object.map_or(f64::INFINITY, |o| o.next_step - o.dist);
        let step = to_target.min(to_curve).min(to_object).max(0.0);

        let dist_along_seg = if step >= to_target {
            target.max(self.dist_along_seg)
        } else {
            (self.dist_along_seg + step).min(target)
        };
        let tol = self.tolerance;
        let curve = advance_curve(segment, self.curve, step, dist_along_seg, tol);
        let object = self.object.map(|o| advance_object(o, step, tol));
        Self {
            dist_along_seg,
            curve,
            object,
            ..self
        }
    }
}

#[allow(clippy::cast_precision_loss)]
fn advance_curve(
    segment: &WallSegment,
    mut curve: CurveCursor,
    step: f64,
    dist_along_seg: f64,
    tol: f64,
) -> CurveCursor {
    curve.dist += step;
    if curve.dist < curve.next_step - tol {
        return curve;
    }
    curve.point += 1;
    // The last sample of an internal curve is the first of the next one.
    // The last curve keeps its cursor and clamps at its end.
    if curve.internal && curve.point >= curve.intervals {
        CurveCursor::at(segment, curve.index + 1, dist_along_seg)
    } else {
        curve.next_step = curve.length * (curve.point + 1) as f64 / curve.intervals as f64;
        curve
    }
}

#[allow(clippy::cast_precision_loss)]
fn advance_object(mut object: ObjectCursor, step: f64, tol: f64) -> ObjectCursor {
    object.dist += step;
    if !object.entered {
        if object.dist >= -tol {
            object.entered = true;
            object.dist = 0.0;
            object.point = 0;
            object.next_step = object.length / object.intervals as f64;
        }
    } else if object.dist >= object.next_step - tol {
        object.point += 1;
        object.next_step = object.length * (object.point + 1) as f64 / object.intervals as f64;
    }
    object
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::CurveSegment;
    use crate::math::Point2;
    use crate::planning::CurveSamples;
    use crate::slicing::FaceId;
    use approx::assert_abs_diff_eq;

    fn segment(lengths: &[f64], samples: CurveSamples) -> WallSegment {
        let mut x = 0.0;
        let curves = lengths
            .iter()
            .map(|len| {
                let c = CurveSegment::line(Point2::new(x, 0.0), Point2::new(x + len, 0.0));
                x += len;
                c
            })
            .collect();
        WallSegment::new(
            0,
            curves,
            samples,
            (0.0, 1.0),
            (FaceId::default(), FaceId::default()),
        )
    }

    fn window(start: f64, end: f64, points: usize) -> CutObject {
        let len = end - start;
        CutObject {
            start,
            end,
            bottom: CurveSegment::line(Point2::new(0.0, 0.25), Point2::new(len, 0.25)),
            top: CurveSegment::line(Point2::new(0.0, 0.75), Point2::new(len, 0.75)),
            min_points: points,
            max_points: points,
        }
    }

    fn stops(mut state: MesherState, seg: &WallSegment, target: f64) -> (MesherState, Vec<f64>) {
        let mut out = Vec::new();
        while state.before(target) {
            state = state.step(seg, target);
            out.push(state.dist_along_seg);
        }
        (state, out)
    }

    #[test]
    fn stops_at_every_curve_sample() {
        let seg = segment(&[3.0], CurveSamples::new(4, 4));
        let state = MesherState::start(&seg).unwrap();
        let (_, at) = stops(state, &seg, seg.length);
        assert_eq!(at.len(), 3);
        assert_abs_diff_eq!(at[0], 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(at[2], 3.0, epsilon = 1e-12);
    }

    #[test]
    fn moves_onto_the_next_curve_at_its_start() {
        let seg = segment(&[1.0, 2.0], CurveSamples::default());
        let state = MesherState::start(&seg).unwrap();
        let next = state.step(&seg, seg.length);
        assert_abs_diff_eq!(next.dist_along_seg, 1.0, epsilon = 1e-12);
        assert_eq!(next.curve.index, 1);
        assert_abs_diff_eq!(next.curve.t(), 0.0, epsilon = 1e-12);
        let last = next.step(&seg, seg.length);
        assert_eq!(last.curve.index, 1);
        assert_abs_diff_eq!(last.curve.t(), 1.0, epsilon = 1e-12);
        assert!(!last.before(seg.length));
    }

    #[test]
    fn object_is_entered_at_its_start() {
        let seg = segment(&[3.0], CurveSamples::default());
        let state = MesherState::start(&seg)
            .unwrap()
            .with_object(&window(1.0, 2.0, 2))
            .unwrap();
        assert!(!state.in_object());
        let entered = state.step(&seg, 2.0);
        assert_abs_diff_eq!(entered.dist_along_seg, 1.0, epsilon = 1e-12);
        assert!(entered.in_object());
        assert_eq!(entered.object_offset(), Some(0.0));
        let (end, _) = stops(entered, &seg, 2.0);
        assert!(end.in_object());
        assert_abs_diff_eq!(end.object_offset().unwrap(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn object_samples_add_stops() {
        let seg = segment(&[3.0], CurveSamples::default());
        let state = MesherState::start(&seg)
            .unwrap()
            .with_object(&window(1.0, 2.0, 5))
            .unwrap();
        let (_, at) = stops(state, &seg, 2.0);
        // Start of the object, then four quarter steps.
        assert_eq!(at.len(), 5);
        assert_abs_diff_eq!(at[1], 1.25, epsilon = 1e-12);
    }

    #[test]
    fn late_registration_fails() {
        let seg = segment(&[3.0], CurveSamples::default());
        let (state, _) = stops(MesherState::start(&seg).unwrap(), &seg, 1.5);
        assert!(matches!(
            state.with_object(&window(1.0, 2.0, 2)),
            Err(MeshError::CutTooLate { .. })
        ));
        // Registering exactly at the current position is allowed.
        assert!(state.with_object(&window(1.5, 2.0, 2)).is_ok());
    }

    #[test]
    fn overshoot_below_the_step_slack_is_still_late() {
        let seg = segment(&[3.0], CurveSamples::default());
        let (state, _) = stops(MesherState::start(&seg).unwrap(), &seg, 1.5);
        assert!(matches!(
            state.with_object(&window(1.5 - 1e-7, 2.0, 2)),
            Err(MeshError::CutTooLate { .. })
        ));
    }

    #[test]
    fn cut_outside_the_segment_is_rejected() {
        let seg = segment(&[3.0], CurveSamples::default());
        let state = MesherState::start(&seg).unwrap();
        for (start, end) in [(1.0, 10.0), (-0.5, 1.0), (2.0, 2.0)] {
            assert!(matches!(
                state.with_object(&window(start, end, 2)),
                Err(MeshError::InvalidCut { .. })
            ));
        }
        assert!(state.with_object(&window(0.0, 3.0, 2)).is_ok());
    }

    #[test]
    fn last_curve_clamps_at_its_end() {
        let seg = segment(&[1.0], CurveSamples::default());
        let (state, _) = stops(MesherState::start(&seg).unwrap(), &seg, 5.0);
        assert_eq!(state.curve.index, 0);
        assert_abs_diff_eq!(state.curve.t(), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(state.dist_along_seg, 5.0, epsilon = 1e-12);
    }

    #[test]
    fn tiny_segments_are_still_sampled() {
        let seg = segment(&[3e-6], CurveSamples::new(4, 4));
        let state = MesherState::start(&seg).unwrap();
        let (end, at) = stops(state, &seg, seg.length);
        assert_eq!(at.len(), 3);
        assert_abs_diff_eq!(at[0], 1e-6, epsilon = 1e-15);
        assert_abs_diff_eq!(end.curve.t(), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn empty_segment_cannot_start() {
        let seg = segment(&[], CurveSamples::default());
        assert!(matches!(
            MesherState::start(&seg),
            Err(MeshError::EmptySegment)
        ));
    }
}
