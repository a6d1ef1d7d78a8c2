use tracing::{debug, info};

use crate::error::{PlanError, Result, SpaceError};
use crate::geometry::{Curve, CurveSegment};
use crate::math::TOLERANCE;
use crate::slicing::{loop_faces, FaceId};
use crate::space::{BlockSpace, Group2dId};

use super::{CurveSamples, PlannerId, PlannerRegistry, WallSegment};

/// One planned curve of a loop and whether a new segment starts at it.
#[derive(Debug)]
struct Piece {
    face: FaceId,
    curve: CurveSegment,
    break_before: bool,
}

/// Plans the wall curves of every loop and groups them into segments.
///
/// A segment is a maximal run of curves that share a planner and do not
/// turn a corner. Convex corners inside a face, concave (deflected) links
/// and planner changes all start a new segment. Islands are meshed as one
/// closed segment.
#[derive(Debug)]
pub struct PlanWalls<'a> {
    registry: &'a PlannerRegistry,
    samples: CurveSamples,
}

impl<'a> PlanWalls<'a> {
    /// Creates a new `PlanWalls` operation.
    #[must_use]
    pub fn new(registry: &'a PlannerRegistry, samples: CurveSamples) -> Self {
        Self { registry, samples }
    }

    /// Executes planning and returns the number of segments produced.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError::NotSliced`] if a group has no loops,
    /// [`PlanError::AlreadyPlanned`] on a second run,
    /// [`PlanError::UnplannedFace`] if a face has no planner, and
    /// [`PlanError::EmptyRun`] if a loop yields no wall.
    pub fn execute(&self, space: &mut BlockSpace) -> Result<usize> {
        if !space.is_grouped() {
            return Err(SpaceError::NotGrouped.into());
        }
        let mut total = 0;
        for group in space.groups_2d_by_y()?.to_vec() {
            let segments = self.plan_group(space, group)?;
            debug!(
                y = space.group_2d(group)?.y,
                segments = segments.len(),
                "planned floor group"
            );
            total += segments.len();
            let data = space.group_2d_mut(group)?;
            data.segments = segments;
            data.planned = true;
        }
        info!(segments = total, "planned walls");
        Ok(total)
    }

    fn plan_group(&self, space: &mut BlockSpace, group: Group2dId) -> Result<Vec<WallSegment>> {
        let data = space.group_2d(group)?;
        if data.planned {
            return Err(PlanError::AlreadyPlanned.into());
        }
        if data.loop_starts.is_empty() {
            return Err(PlanError::NotSliced.into());
        }
        let starts = data.loop_starts.clone();
        let first_block = *data.blocks.first().ok_or(PlanError::EmptyRun)?;
        let bounds = space.block(first_block)?.bounds;
        let levels = (bounds.floor, bounds.ceiling);

        let mut segments = Vec::new();
        for (loop_index, start) in starts.into_iter().enumerate() {
            let pieces = self.plan_loop(space, start)?;
            let before = segments.len();
            for run in split_runs(pieces) {
                let (Some(first), Some(last)) = (run.first(), run.last()) else {
                    continue;
                };
                let faces = (first.face, last.face);
                let curves = run.into_iter().map(|p| p.curve).collect();
                segments.push(WallSegment::new(loop_index, curves, self.samples, levels, faces));
            }
            if segments.len() == before {
                return Err(PlanError::EmptyRun.into());
            }
        }
        Ok(segments)
    }

    /// Plans every face of one loop and flattens the plans into pieces.
    fn plan_loop(&self, space: &mut BlockSpace, start: FaceId) -> Result<Vec<Piece>> {
        let faces = loop_faces(space, start)?;
        let mut planners: Vec<PlannerId> = Vec::with_capacity(faces.len());
        for &id in &faces {
            let face = space.face(id)?;
            match face.planner {
                Some(planner) => planners.push(planner),
                None => {
                    let coord = space.block(face.block)?.coord;
                    return Err(PlanError::UnplannedFace(coord).into());
                }
            }
        }

        let mut pieces = Vec::new();
        for (k, &id) in faces.iter().enumerate() {
            let previous = planners[(k + faces.len() - 1) % faces.len()];
            let face = space.face(id)?;
            let bounds = space.block(face.block)?.bounds;
            let plan = self.registry.get(planners[k])?.plan_face(&bounds, face);

            let mut pending = face.prev_deflected || previous != planners[k];
            for pair in plan.points.windows(2) {
                let curve = CurveSegment::line(pair[0], pair[1]);
                if curve.length() < TOLERANCE {
                    continue;
                }
                pieces.push(Piece {
                    face: id,
                    curve,
                    break_before: pending,
                });
                // Every interior vertex of an open plan is a convex corner.
                pending = !plan.closed;
            }
            space.face_mut(id)?.wall_points = plan.points;
        }
        Ok(pieces)
    }
}

/// Splits a cyclic loop of pieces at every break.
///
/// The loop is rotated to start at its first break so no run is cut in two
/// by where the loop happened to start. A loop without breaks is one run.
fn split_runs(mut pieces: Vec<Piece>) -> Vec<Vec<Piece>> {
    if let Some(first_break) = pieces.iter().position(|p| p.break_before) {
        pieces.rotate_left(first_break);
    }
    let mut runs: Vec<Vec<Piece>> = Vec::new();
    for piece in pieces {
        match runs.last_mut() {
            Some(run) if !piece.break_before => run.push(piece),
            _ => runs.push(vec![piece]),
        }
    }
    runs
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::planning::{PlanFaces, RightAngleWallPlanner};
    use crate::slicing::{FaceType, FloorSlicer};
    use crate::space::BlockCoord;
    use approx::assert_abs_diff_eq;

    const INSET: f64 = 0.2;

    fn planned(coords: &[(i32, i32, i32)]) -> BlockSpace {
        let mut space = BlockSpace::new(1.0, 1.0);
        for &c in coords {
            space.get_or_create(c.into()).unwrap();
        }
        space.determine_groups().unwrap();
        FloorSlicer::new().execute(&mut space).unwrap();
        let mut registry = PlannerRegistry::new();
        let id = registry.register(Box::new(RightAngleWallPlanner::new(INSET)));
        PlanFaces::new(id).execute(&mut space).unwrap();
        PlanWalls::new(&registry, CurveSamples::default())
            .execute(&mut space)
            .unwrap();
        space
    }

    fn segments(space: &BlockSpace) -> Vec<WallSegment> {
        space
            .groups_2d_by_y()
            .unwrap()
            .iter()
            .flat_map(|&g| space.group_2d(g).unwrap().segments.clone())
            .collect()
    }

    fn assert_continuous(segment: &WallSegment) {
        for pair in segment.floor_curves.windows(2) {
            assert_abs_diff_eq!(pair[0].end().x, pair[1].start().x, epsilon = 1e-9);
            assert_abs_diff_eq!(pair[0].end().y, pair[1].start().y, epsilon = 1e-9);
        }
    }

    #[test]
    fn single_block_is_one_closed_segment() {
        let space = planned(&[(0, 0, 0)]);
        let segs = segments(&space);
        assert_eq!(segs.len(), 1);
        assert_eq!(segs[0].floor_curves.len(), 4);
        assert_abs_diff_eq!(segs[0].length, 4.0 * (1.0 - 2.0 * INSET), epsilon = 1e-9);
        assert_eq!(segs[0].start_point(), segs[0].end_point());
        assert_abs_diff_eq!(segs[0].floor_y, 0.0);
        assert_abs_diff_eq!(segs[0].ceiling_y, 1.0);
    }

    #[test]
    fn slab_has_one_segment_per_side() {
        let coords: Vec<_> = (0..3)
            .flat_map(|x| (0..3).map(move |z| (x, 0, z)))
            .collect();
        let segs = segments(&planned(&coords));
        assert_eq!(segs.len(), 4);
        for seg in &segs {
            assert_abs_diff_eq!(seg.length, 3.0 - 2.0 * INSET, epsilon = 1e-9);
            assert_continuous(seg);
        }
    }

    #[test]
    fn courtyard_walls_meet_at_inset_corners() {
        let coords: Vec<_> = (0..3)
            .flat_map(|x| (0..3).map(move |z| (x, 0, z)))
            .filter(|&(x, _, z)| (x, z) != (1, 1))
            .collect();
        let space = planned(&coords);
        let segs = segments(&space);
        assert_eq!(segs.len(), 8);
        for index in 0..2 {
            assert_eq!(segs.iter().filter(|s| s.loop_index == index).count(), 4);
        }
        // Courtyard walls run along the inside of the hole, extended by the inset.
        let courtyard: Vec<_> = segs
            .iter()
            .filter(|s| (s.length - (1.0 + 2.0 * INSET)).abs() < 1e-9)
            .collect();
        assert_eq!(courtyard.len(), 4);
        for seg in &segs {
            assert_continuous(seg);
        }
    }

    #[test]
    fn l_shape_segments_chain_end_to_start() {
        let space = planned(&[(0, 0, 0), (1, 0, 0), (0, 0, 1)]);
        let segs = segments(&space);
        // Outer corners split the perimeter into six straight walls.
        assert_eq!(segs.len(), 6);
        let total: f64 = segs.iter().map(|s| s.length).sum();
        // Two long outer walls, two wing ends and the two walls of the inner corner.
        let expected = 2.0 * (2.0 - 2.0 * INSET) + 2.0 * (1.0 - 2.0 * INSET) + 2.0;
        assert_abs_diff_eq!(total, expected, epsilon = 1e-9);
        for i in 0..segs.len() {
            let next = &segs[(i + 1) % segs.len()];
            let end = segs[i].end_point().unwrap();
            let start = next.start_point().unwrap();
            assert_abs_diff_eq!(end.x, start.x, epsilon = 1e-9);
            assert_abs_diff_eq!(end.y, start.y, epsilon = 1e-9);
        }
    }

    #[test]
    fn planner_change_starts_a_new_segment() {
        let mut space = BlockSpace::new(1.0, 1.0);
        for x in 0..4 {
            space.get_or_create(BlockCoord::new(x, 0, 0)).unwrap();
        }
        space.determine_groups().unwrap();
        FloorSlicer::new().execute(&mut space).unwrap();
        let mut registry = PlannerRegistry::new();
        let main = registry.register(Box::new(RightAngleWallPlanner::new(INSET)));
        let other = registry.register(Box::new(RightAngleWallPlanner::new(INSET)));
        PlanFaces::new(main).execute(&mut space).unwrap();

        // Hand the north face of the third block to the second planner.
        let block = space.block_at(BlockCoord::new(2, 0, 0)).unwrap();
        let switched = space
            .block(block)
            .unwrap()
            .faces
            .iter()
            .copied()
            .find(|&f| space.face(f).unwrap().face_type == FaceType::North)
            .unwrap();
        space.face_mut(switched).unwrap().planner = Some(other);

        PlanWalls::new(&registry, CurveSamples::default())
            .execute(&mut space)
            .unwrap();
        let segs = segments(&space);
        // North wall splits into three runs; east, south and west stay whole.
        assert_eq!(segs.len(), 6);

        let own = segs
            .iter()
            .find(|s| s.start_face == switched || s.end_face == switched)
            .unwrap();
        assert_eq!(own.start_face, switched);
        assert_eq!(own.end_face, switched);
        assert_eq!(own.floor_curves.len(), 1);
        assert_abs_diff_eq!(own.length, 1.0, epsilon = 1e-9);
        assert_abs_diff_eq!(own.start_point().unwrap().x, 1.5, epsilon = 1e-9);

        let mut lengths: Vec<f64> = segs.iter().map(|s| s.length).collect();
        lengths.sort_by(f64::total_cmp);
        let side = 1.0 - 2.0 * INSET;
        let expected = [side, side, 0.8, 1.0, 1.8, 4.0 - 2.0 * INSET];
        for (got, want) in lengths.iter().zip(expected) {
            assert_abs_diff_eq!(*got, want, epsilon = 1e-9);
        }

        // Runs on either side of the switch end and start at its edges.
        let west_run = segs
            .iter()
            .find(|s| (s.length - 1.8).abs() < 1e-9)
            .unwrap();
        assert_eq!(
            space.face(west_run.end_face).unwrap().block,
            space.block_at(BlockCoord::new(1, 0, 0)).unwrap()
        );
        let east_run = segs
            .iter()
            .find(|s| s.start_face != switched && (s.length - 0.8).abs() < 1e-9)
            .unwrap();
        assert_eq!(
            space.face(east_run.start_face).unwrap().block,
            space.block_at(BlockCoord::new(3, 0, 0)).unwrap()
        );
    }

    #[test]
    fn faces_keep_their_wall_points() {
        let space = planned(&[(0, 0, 0)]);
        let group = space.groups_2d_by_y().unwrap()[0];
        let start = space.group_2d(group).unwrap().loop_starts[0];
        assert_eq!(space.face(start).unwrap().wall_points.len(), 5);
    }

    #[test]
    fn planning_twice_is_rejected() {
        let mut space = planned(&[(0, 0, 0)]);
        let registry = PlannerRegistry::new();
        assert!(matches!(
            PlanWalls::new(&registry, CurveSamples::default()).execute(&mut space),
            Err(crate::BlockwallError::Plan(PlanError::AlreadyPlanned))
        ));
    }

    #[test]
    fn faces_without_planner_are_rejected() {
        let mut space = BlockSpace::new(1.0, 1.0);
        space.get_or_create(BlockCoord::new(0, 0, 0)).unwrap();
        space.determine_groups().unwrap();
        FloorSlicer::new().execute(&mut space).unwrap();
        let registry = PlannerRegistry::new();
        assert!(matches!(
            PlanWalls::new(&registry, CurveSamples::default()).execute(&mut space),
            Err(crate::BlockwallError::Plan(PlanError::UnplannedFace(_)))
        ));
    }
}
