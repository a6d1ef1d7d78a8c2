use crate::math::{Point2, Vector2};
use crate::slicing::{Face, FaceType};
use crate::space::{BlockBounds, Direction};

use super::{FacePlan, WallPlanner};

/// Plans straight walls with right-angle corners, inset from the block boundary.
///
/// Each open side becomes a line `inset` inside the block. Consecutive sides
/// of one face meet at the intersection of their inset lines. At a deflected
/// link the wall turns left around the neighboring block, so the line is
/// extended past the block boundary by `inset` to meet the next face's line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RightAngleWallPlanner {
    inset: f64,
}

impl RightAngleWallPlanner {
    /// Creates a planner with the given inset distance.
    #[must_use]
    pub fn new(inset: f64) -> Self {
        Self { inset }
    }

    /// Returns the inset distance.
    #[must_use]
    pub fn inset(&self) -> f64 {
        self.inset
    }

    fn corner(center: &Point2, reach: f64, a: Direction, b: Direction) -> Point2 {
        center + (a.plan_vector() + b.plan_vector()) * reach
    }
}

impl WallPlanner for RightAngleWallPlanner {
    fn plan_face(&self, bounds: &BlockBounds, face: &Face) -> FacePlan {
        let center = bounds.plan_center();
        let half = bounds.half_extent();
        let reach = half - self.inset;
        let sides = face.face_type.sides();

        if face.face_type == FaceType::Island {
            let mut points: Vec<Point2> = sides
                .iter()
                .enumerate()
                .map(|(i, &side)| {
                    let previous = sides[(i + sides.len() - 1) % sides.len()];
                    Self::corner(&center, reach, previous, side)
                })
                .collect();
            points.push(points[0]);
            return FacePlan {
                points,
                closed: true,
            };
        }

        let first = sides[0];
        let last = sides[sides.len() - 1];
        let entry_travel: Vector2 = first.turn_right().plan_vector();
        let exit_travel: Vector2 = last.turn_right().plan_vector();
        let entry_pull = if face.prev_deflected { self.inset } else { 0.0 };
        let exit_push = if face.next_deflected { self.inset } else { 0.0 };

        let mut points = Vec::with_capacity(sides.len() + 1);
        points.push(center + first.plan_vector() * reach - entry_travel * (half + entry_pull));
        for pair in sides.windows(2) {
            points.push(Self::corner(&center, reach, pair[0], pair[1]));
        }
        points.push(center + last.plan_vector() * reach + exit_travel * (half + exit_push));
        FacePlan {
            points,
            closed: false,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::space::{BlockCoord, BlockId};
    use approx::assert_abs_diff_eq;

    fn plan(face_type: FaceType, prev_deflected: bool, next_deflected: bool) -> Vec<Point2> {
        let bounds = BlockBounds::from_coord(BlockCoord::new(0, 0, 0), 1.0, 1.0);
        let mut face = Face::new(BlockId::default(), face_type);
        face.prev_deflected = prev_deflected;
        face.next_deflected = next_deflected;
        RightAngleWallPlanner::new(0.2).plan_face(&bounds, &face).points
    }

    fn assert_points(actual: &[Point2], expected: &[(f64, f64)]) {
        assert_eq!(actual.len(), expected.len());
        for (a, &(x, z)) in actual.iter().zip(expected) {
            assert_abs_diff_eq!(a.x, x, epsilon = 1e-12);
            assert_abs_diff_eq!(a.y, z, epsilon = 1e-12);
        }
    }

    #[test]
    fn north_face_runs_west_to_east_inside_the_block() {
        assert_points(&plan(FaceType::North, false, false), &[(-0.5, -0.3), (0.5, -0.3)]);
    }

    #[test]
    fn corner_face_turns_right() {
        assert_points(
            &plan(FaceType::NorthEastCorner, false, false),
            &[(-0.5, -0.3), (0.3, -0.3), (0.3, 0.5)],
        );
        assert_points(
            &plan(FaceType::SouthWestCorner, false, false),
            &[(0.5, 0.3), (-0.3, 0.3), (-0.3, -0.5)],
        );
    }

    #[test]
    fn cape_wraps_three_sides() {
        assert_points(
            &plan(FaceType::NorthCape, false, false),
            &[(-0.3, 0.5), (-0.3, -0.3), (0.3, -0.3), (0.3, 0.5)],
        );
    }

    #[test]
    fn island_is_a_closed_inset_square() {
        let points = plan(FaceType::Island, false, false);
        assert_points(
            &points,
            &[(-0.3, -0.3), (0.3, -0.3), (0.3, 0.3), (-0.3, 0.3), (-0.3, -0.3)],
        );
    }

    #[test]
    fn deflected_links_extend_by_the_inset() {
        assert_points(&plan(FaceType::North, false, true), &[(-0.5, -0.3), (0.7, -0.3)]);
        assert_points(&plan(FaceType::East, true, false), &[(0.3, -0.7), (0.3, 0.5)]);
    }
}
