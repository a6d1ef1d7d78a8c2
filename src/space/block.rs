use std::fmt;

use crate::math::{Point2, Vector2};
use crate::slicing::FaceId;

use super::group::{Group2dId, Group3dId};

slotmap::new_key_type! {
    /// Unique identifier for a block in the block space.
    pub struct BlockId;
}

/// Integer grid coordinate of a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockCoord {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl BlockCoord {
    /// Creates a new coordinate.
    #[must_use]
    pub fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Returns the coordinate one step away in `direction`, or `None` at the
    /// edge of the grid.
    #[must_use]
    pub fn step(self, direction: Direction) -> Option<Self> {
        let (dx, dy, dz) = direction.offset();
        Some(Self::new(
            self.x.checked_add(dx)?,
            self.y.checked_add(dy)?,
            self.z.checked_add(dz)?,
        ))
    }
}

impl fmt::Display for BlockCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

impl From<(i32, i32, i32)> for BlockCoord {
    fn from((x, y, z): (i32, i32, i32)) -> Self {
        Self::new(x, y, z)
    }
}

/// Manhattan adjacency direction.
///
/// North is `-z`, east is `+x` and up is `+y`. The discriminant is the slot in
/// a block's adjacency array; opposite directions are three slots apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    North = 0,
    East = 1,
    Up = 2,
    South = 3,
    West = 4,
    Down = 5,
}

impl Direction {
    /// All six directions in adjacency-slot order.
    pub const ALL: [Self; 6] = [
        Self::North,
        Self::East,
        Self::Up,
        Self::South,
        Self::West,
        Self::Down,
    ];

    /// The four horizontal directions, clockwise from north.
    pub const HORIZONTAL: [Self; 4] = [Self::North, Self::East, Self::South, Self::West];

    /// Slot of this direction in the adjacency array.
    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }

    /// The opposite direction.
    #[must_use]
    pub fn opposite(self) -> Self {
        Self::ALL[(self.index() + 3) % 6]
    }

    /// Grid offset of one step in this direction.
    #[must_use]
    pub fn offset(self) -> (i32, i32, i32) {
        match self {
            Self::North => (0, 0, -1),
            Self::East => (1, 0, 0),
            Self::Up => (0, 1, 0),
            Self::South => (0, 0, 1),
            Self::West => (-1, 0, 0),
            Self::Down => (0, -1, 0),
        }
    }

    /// Direction after hanging a left; up and down are unchanged.
    #[must_use]
    pub fn turn_left(self) -> Self {
        match self {
            Self::North => Self::West,
            Self::East => Self::North,
            Self::South => Self::East,
            Self::West => Self::South,
            Self::Up => Self::Up,
            Self::Down => Self::Down,
        }
    }

    /// Direction after hanging a right; up and down are unchanged.
    #[must_use]
    pub fn turn_right(self) -> Self {
        match self {
            Self::North => Self::East,
            Self::East => Self::South,
            Self::South => Self::West,
            Self::West => Self::North,
            Self::Up => Self::Up,
            Self::Down => Self::Down,
        }
    }

    /// Unit vector in the `(x, z)` floor plane; zero for up and down.
    #[must_use]
    pub fn plan_vector(self) -> Vector2 {
        match self {
            Self::North => Vector2::new(0.0, -1.0),
            Self::East => Vector2::new(1.0, 0.0),
            Self::South => Vector2::new(0.0, 1.0),
            Self::West => Vector2::new(-1.0, 0.0),
            Self::Up | Self::Down => Vector2::zeros(),
        }
    }

    /// Bit of this direction in a horizontal adjacency mask (N=1, E=2, S=4, W=8).
    #[must_use]
    pub fn mask_bit(self) -> u8 {
        match self {
            Self::North => 1,
            Self::East => 2,
            Self::South => 4,
            Self::West => 8,
            Self::Up | Self::Down => 0,
        }
    }
}

/// World-space boundary scalars of a block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockBounds {
    /// North z-boundary.
    pub north: f64,
    /// South z-boundary.
    pub south: f64,
    /// East x-boundary.
    pub east: f64,
    /// West x-boundary.
    pub west: f64,
    /// Floor y-boundary.
    pub floor: f64,
    /// Ceiling y-boundary.
    pub ceiling: f64,
}

impl BlockBounds {
    /// Computes the bounds of the cell at `coord` for the given unit sizes.
    #[must_use]
    pub fn from_coord(coord: BlockCoord, h_unit: f64, v_unit: f64) -> Self {
        let half = h_unit / 2.0;
        let cx = h_unit * f64::from(coord.x);
        let cz = h_unit * f64::from(coord.z);
        let floor = v_unit * f64::from(coord.y);
        Self {
            north: cz - half,
            south: cz + half,
            east: cx + half,
            west: cx - half,
            floor,
            ceiling: floor + v_unit,
        }
    }

    /// Centre of the block in the `(x, z)` floor plane.
    #[must_use]
    pub fn plan_center(&self) -> Point2 {
        Point2::new((self.east + self.west) * 0.5, (self.north + self.south) * 0.5)
    }

    /// Half the horizontal extent of the block.
    #[must_use]
    pub fn half_extent(&self) -> f64 {
        (self.east - self.west) * 0.5
    }
}

/// Data associated with one occupied grid cell.
#[derive(Debug, Clone)]
pub struct Block {
    /// Grid coordinate.
    pub coord: BlockCoord,
    /// World-space boundaries.
    pub bounds: BlockBounds,
    /// Neighbors indexed by [`Direction::index`].
    pub adjacent: [Option<BlockId>; 6],
    /// 3D connected-component group, set once by grouping.
    pub group_3d: Option<Group3dId>,
    /// Horizontal connected-component group, set once by grouping.
    pub group_2d: Option<Group2dId>,
    /// Perimeter faces; empty for blocks that are interior in 2D.
    pub faces: Vec<FaceId>,
}

impl Block {
    /// Creates an unlinked, ungrouped block.
    #[must_use]
    pub fn new(coord: BlockCoord, bounds: BlockBounds) -> Self {
        Self {
            coord,
            bounds,
            adjacent: [None; 6],
            group_3d: None,
            group_2d: None,
            faces: Vec::new(),
        }
    }

    /// Neighbor in `direction`, if any.
    #[must_use]
    pub fn neighbor(&self, direction: Direction) -> Option<BlockId> {
        self.adjacent[direction.index()]
    }

    /// Whether all six neighbors exist.
    #[must_use]
    pub fn is_interior_3d(&self) -> bool {
        self.adjacent.iter().all(Option::is_some)
    }

    /// Whether all four horizontal neighbors exist.
    #[must_use]
    pub fn is_interior_2d(&self) -> bool {
        Direction::HORIZONTAL
            .iter()
            .all(|&d| self.neighbor(d).is_some())
    }

    /// Horizontal adjacency mask: north 1, east 2, south 4, west 8.
    #[must_use]
    pub fn horizontal_mask(&self) -> u8 {
        Direction::HORIZONTAL
            .iter()
            .filter(|&&d| self.neighbor(d).is_some())
            .fold(0, |mask, &d| mask | d.mask_bit())
    }
}
