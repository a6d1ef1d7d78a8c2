mod plan_walls;
mod right_angle;
mod segment;

pub use plan_walls::PlanWalls;
pub use right_angle::RightAngleWallPlanner;
pub use segment::{CurveSamples, CutObject, WallSegment};

use std::fmt;

use tracing::debug;

use crate::error::{PlanError, Result, SpaceError};
use crate::math::Point2;
use crate::slicing::{loop_faces, Face};
use crate::space::{BlockBounds, BlockSpace};

/// Index of a planner inside a [`PlannerRegistry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlannerId(usize);

impl PlannerId {
    /// Position of the planner in its registry.
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

/// Plan-space polyline a planner produces for one face.
#[derive(Debug, Clone, PartialEq)]
pub struct FacePlan {
    /// Polyline vertices in walking order.
    pub points: Vec<Point2>,
    /// Whether the polyline closes on itself (islands).
    pub closed: bool,
}

/// Turns a linked face into the plan-space path of its wall.
///
/// The start of a face's plan must coincide with the end of the previous
/// face's plan whenever both use the same planner.
pub trait WallPlanner: fmt::Debug {
    /// Plans the wall for `face`, owned by a block with `bounds`.
    fn plan_face(&self, bounds: &BlockBounds, face: &Face) -> FacePlan;
}

/// Owns the wall planners available to a layout.
#[derive(Debug, Default)]
pub struct PlannerRegistry {
    planners: Vec<Box<dyn WallPlanner>>,
}

impl PlannerRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a planner and returns its id.
    pub fn register(&mut self, planner: Box<dyn WallPlanner>) -> PlannerId {
        self.planners.push(planner);
        PlannerId(self.planners.len() - 1)
    }

    /// Looks up a planner.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError::UnknownPlanner`] if `id` was not issued by this registry.
    pub fn get(&self, id: PlannerId) -> std::result::Result<&dyn WallPlanner, PlanError> {
        self.planners
            .get(id.0)
            .map(Box::as_ref)
            .ok_or(PlanError::UnknownPlanner(id.0))
    }

    /// Number of registered planners.
    #[must_use]
    pub fn len(&self) -> usize {
        self.planners.len()
    }

    /// Whether no planner is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.planners.is_empty()
    }
}

/// Assigns one planner to every face of every sliced loop.
#[derive(Debug)]
pub struct PlanFaces {
    planner: PlannerId,
}

impl PlanFaces {
    /// Creates a new `PlanFaces` operation.
    #[must_use]
    pub fn new(planner: PlannerId) -> Self {
        Self { planner }
    }

    /// Executes the assignment and returns the number of faces touched.
    ///
    /// # Errors
    ///
    /// Returns [`SpaceError::NotGrouped`] before grouping and
    /// [`PlanError::NotSliced`] if a group has no loops.
    pub fn execute(&self, space: &mut BlockSpace) -> Result<usize> {
        if !space.is_grouped() {
            return Err(SpaceError::NotGrouped.into());
        }
        let mut assigned = 0;
        for group in space.groups_2d_by_y()?.to_vec() {
            let starts = space.group_2d(group)?.loop_starts.clone();
            if starts.is_empty() {
                return Err(PlanError::NotSliced.into());
            }
            for start in starts {
                for face in loop_faces(space, start)? {
                    space.face_mut(face)?.planner = Some(self.planner);
                    assigned += 1;
                }
            }
        }
        debug!(assigned, planner = self.planner.index(), "assigned wall planner");
        Ok(assigned)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::slicing::FloorSlicer;
    use crate::space::BlockCoord;

    #[test]
    fn registry_issues_sequential_ids() {
        let mut registry = PlannerRegistry::new();
        let a = registry.register(Box::new(RightAngleWallPlanner::new(0.1)));
        let b = registry.register(Box::new(RightAngleWallPlanner::new(0.2)));
        assert_eq!(a.index(), 0);
        assert_eq!(b.index(), 1);
        assert_eq!(registry.len(), 2);
        assert!(registry.get(b).is_ok());
        assert!(matches!(
            registry.get(PlannerId(7)),
            Err(PlanError::UnknownPlanner(7))
        ));
    }

    #[test]
    fn plan_faces_marks_every_loop_face() {
        let mut space = BlockSpace::new(1.0, 1.0);
        for x in 0..3 {
            space.get_or_create(BlockCoord::new(x, 0, 0)).unwrap();
        }
        space.determine_groups().unwrap();
        FloorSlicer::new().execute(&mut space).unwrap();

        let mut registry = PlannerRegistry::new();
        let id = registry.register(Box::new(RightAngleWallPlanner::new(0.2)));
        let assigned = PlanFaces::new(id).execute(&mut space).unwrap();
        assert_eq!(assigned, space.face_count());
    }

    #[test]
    fn plan_faces_requires_slicing() {
        let mut space = BlockSpace::new(1.0, 1.0);
        space.get_or_create(BlockCoord::new(0, 0, 0)).unwrap();
        space.determine_groups().unwrap();
        let mut registry = PlannerRegistry::new();
        let id = registry.register(Box::new(RightAngleWallPlanner::new(0.2)));
        assert!(matches!(
            PlanFaces::new(id).execute(&mut space),
            Err(crate::BlockwallError::Plan(PlanError::NotSliced))
        ));
    }
}
