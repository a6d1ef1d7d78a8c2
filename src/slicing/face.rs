use crate::error::SliceError;
use crate::math::Point2;
use crate::planning::PlannerId;
use crate::space::{BlockId, Direction};

slotmap::new_key_type! {
    /// Unique identifier for a perimeter face in the block space.
    pub struct FaceId;
}

/// Corner of a block in the floor plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Corner {
    NorthWest,
    NorthEast,
    SouthEast,
    SouthWest,
}

impl Corner {
    /// Corner at which a clockwise walk travelling `direction` enters a block.
    ///
    /// The walk keeps solid ground on its right, so it enters at the corner
    /// between the side it came through and the open side on its left.
    #[must_use]
    pub fn entered_travelling(direction: Direction) -> Option<Self> {
        match direction {
            Direction::East => Some(Self::NorthWest),
            Direction::South => Some(Self::NorthEast),
            Direction::West => Some(Self::SouthEast),
            Direction::North => Some(Self::SouthWest),
            Direction::Up | Direction::Down => None,
        }
    }

    /// Corner reached after the walk turns left around an occupied block.
    #[must_use]
    pub fn deflect(self) -> Self {
        match self {
            Self::NorthWest => Self::SouthWest,
            Self::NorthEast => Self::NorthWest,
            Self::SouthEast => Self::NorthEast,
            Self::SouthWest => Self::SouthEast,
        }
    }

    /// Open side whose edge starts at this corner.
    #[must_use]
    pub fn open_side(self) -> Direction {
        match self {
            Self::NorthWest => Direction::North,
            Self::NorthEast => Direction::East,
            Self::SouthEast => Direction::South,
            Self::SouthWest => Direction::West,
        }
    }

    /// Human-readable name, used in diagnostics.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::NorthWest => "north-west",
            Self::NorthEast => "north-east",
            Self::SouthEast => "south-east",
            Self::SouthWest => "south-west",
        }
    }
}

/// Classification of a perimeter face by the open sides it covers.
///
/// Sides are listed in clockwise walking order; a face's walk enters at the
/// corner where its first side starts and leaves past the end of its last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FaceType {
    /// North side only.
    North,
    /// North then east side.
    NorthEastCorner,
    /// East side only.
    East,
    /// East then south side.
    SouthEastCorner,
    /// South side only.
    South,
    /// South then west side.
    SouthWestCorner,
    /// West side only.
    West,
    /// West then north side.
    NorthWestCorner,
    /// West, north and east sides of a block attached only to the south.
    NorthCape,
    /// North, east and south sides of a block attached only to the west.
    EastCape,
    /// East, south and west sides of a block attached only to the north.
    SouthCape,
    /// South, west and north sides of a block attached only to the east.
    WestCape,
    /// All four sides of an isolated block.
    Island,
}

impl FaceType {
    /// Open sides covered by this face, in clockwise walking order.
    #[must_use]
    pub fn sides(self) -> &'static [Direction] {
        use Direction::{East as E, North as N, South as S, West as W};
        match self {
            Self::North => &[N],
            Self::NorthEastCorner => &[N, E],
            Self::East => &[E],
            Self::SouthEastCorner => &[E, S],
            Self::South => &[S],
            Self::SouthWestCorner => &[S, W],
            Self::West => &[W],
            Self::NorthWestCorner => &[W, N],
            Self::NorthCape => &[W, N, E],
            Self::EastCape => &[N, E, S],
            Self::SouthCape => &[E, S, W],
            Self::WestCape => &[S, W, N],
            Self::Island => &[N, E, S, W],
        }
    }

    /// Corner at which the clockwise walk enters this face.
    #[must_use]
    pub fn entry_corner(self) -> Corner {
        match self.sides()[0] {
            Direction::North => Corner::NorthWest,
            Direction::East => Corner::NorthEast,
            Direction::South => Corner::SouthEast,
            Direction::West | Direction::Up | Direction::Down => Corner::SouthWest,
        }
    }

    /// Direction the walk travels when it leaves this face.
    #[must_use]
    pub fn exit_direction(self) -> Direction {
        let sides = self.sides();
        sides[sides.len() - 1].turn_right()
    }

    /// Whether this face closes on itself.
    #[must_use]
    pub fn is_island(self) -> bool {
        self == Self::Island
    }
}

/// The two parallel-face configurations a single block can have.
///
/// The pair owns both the order in which its faces are created and the rule
/// that routes an entry corner to one of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParallelPair {
    /// Open to the north and south (neighbors east and west).
    NorthSouth,
    /// Open to the east and west (neighbors north and south).
    EastWest,
}

impl ParallelPair {
    /// Face types in creation order.
    #[must_use]
    pub fn face_types(self) -> [FaceType; 2] {
        match self {
            Self::NorthSouth => [FaceType::North, FaceType::South],
            Self::EastWest => [FaceType::East, FaceType::West],
        }
    }

    /// Index (into [`Self::face_types`]) of the face entered at `corner`.
    #[must_use]
    pub fn select(self, corner: Corner) -> usize {
        match (self, corner) {
            (Self::NorthSouth, Corner::NorthWest | Corner::NorthEast)
            | (Self::EastWest, Corner::NorthEast | Corner::SouthEast) => 0,
            (Self::NorthSouth, Corner::SouthEast | Corner::SouthWest)
            | (Self::EastWest, Corner::SouthWest | Corner::NorthWest) => 1,
        }
    }
}

/// Faces a block contributes, looked up from its horizontal adjacency mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaceSet {
    /// One face covering every open side.
    Single(FaceType),
    /// Two parallel faces on opposite sides.
    Parallel(ParallelPair),
}

impl FaceSet {
    /// Looks up the faces for an adjacency mask (north 1, east 2, south 4, west 8).
    ///
    /// # Errors
    ///
    /// Returns [`SliceError::NoFaceTypes`] for mask 15 (fully enclosed) and
    /// for values outside the 4-bit range.
    pub fn for_mask(mask: u8) -> Result<Self, SliceError> {
        let set = match mask {
            0 => Self::Single(FaceType::Island),
            1 => Self::Single(FaceType::SouthCape),
            2 => Self::Single(FaceType::WestCape),
            3 => Self::Single(FaceType::SouthWestCorner),
            4 => Self::Single(FaceType::NorthCape),
            5 => Self::Parallel(ParallelPair::EastWest),
            6 => Self::Single(FaceType::NorthWestCorner),
            7 => Self::Single(FaceType::West),
            8 => Self::Single(FaceType::EastCape),
            9 => Self::Single(FaceType::SouthEastCorner),
            10 => Self::Parallel(ParallelPair::NorthSouth),
            11 => Self::Single(FaceType::South),
            12 => Self::Single(FaceType::NorthEastCorner),
            13 => Self::Single(FaceType::East),
            14 => Self::Single(FaceType::North),
            15..=u8::MAX => return Err(SliceError::NoFaceTypes { mask }),
        };
        Ok(set)
    }

    /// Face types in creation order.
    #[must_use]
    pub fn face_types(self) -> Vec<FaceType> {
        match self {
            Self::Single(face_type) => vec![face_type],
            Self::Parallel(pair) => pair.face_types().to_vec(),
        }
    }

    /// Index of the face entered at `corner`.
    #[must_use]
    pub fn select(self, corner: Corner) -> usize {
        match self {
            Self::Single(_) => 0,
            Self::Parallel(pair) => pair.select(corner),
        }
    }
}

/// A perimeter-contributing face owned by one block.
///
/// After slicing, `next`/`prev` form a closed, doubly linked clockwise cycle
/// per perimeter. The deflection flags record links where the walk had to
/// turn left around an occupied block.
#[derive(Debug, Clone)]
pub struct Face {
    /// Owning block.
    pub block: BlockId,
    /// Classification of the sides this face covers.
    pub face_type: FaceType,
    /// Next face clockwise.
    pub next: Option<FaceId>,
    /// Previous face clockwise.
    pub prev: Option<FaceId>,
    /// Whether the link to `next` turned left.
    pub next_deflected: bool,
    /// Whether the link from `prev` turned left.
    pub prev_deflected: bool,
    /// Wall planner assigned to this face.
    pub planner: Option<PlannerId>,
    /// Inset wall polyline produced by the planner.
    pub wall_points: Vec<Point2>,
}

impl Face {
    /// Creates an unlinked face.
    #[must_use]
    pub fn new(block: BlockId, face_type: FaceType) -> Self {
        Self {
            block,
            face_type,
            next: None,
            prev: None,
            next_deflected: false,
            prev_deflected: false,
            planner: None,
            wall_points: Vec::new(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const ALL_TYPES: [FaceType; 13] = [
        FaceType::North,
        FaceType::NorthEastCorner,
        FaceType::East,
        FaceType::SouthEastCorner,
        FaceType::South,
        FaceType::SouthWestCorner,
        FaceType::West,
        FaceType::NorthWestCorner,
        FaceType::NorthCape,
        FaceType::EastCape,
        FaceType::SouthCape,
        FaceType::WestCape,
        FaceType::Island,
    ];

    #[test]
    fn table_covers_exactly_the_open_sides() {
        for mask in 0u8..15 {
            let set = FaceSet::for_mask(mask).unwrap();
            let mut open: Vec<Direction> = set
                .face_types()
                .iter()
                .flat_map(|t| t.sides().iter().copied())
                .collect();
            open.sort_by_key(|d| d.index());
            let mut expected: Vec<Direction> = Direction::HORIZONTAL
                .iter()
                .copied()
                .filter(|d| mask & d.mask_bit() == 0)
                .collect();
            expected.sort_by_key(|d| d.index());
            assert_eq!(open, expected, "mask {mask}");
        }
    }

    #[test]
    fn fully_enclosed_mask_has_no_faces() {
        assert!(matches!(
            FaceSet::for_mask(15),
            Err(SliceError::NoFaceTypes { mask: 15 })
        ));
        assert!(FaceSet::for_mask(200).is_err());
    }

    #[test]
    fn exit_direction_leaves_through_a_closed_side() {
        for t in ALL_TYPES {
            if t.is_island() {
                continue;
            }
            let exit = t.exit_direction();
            assert!(!t.sides().contains(&exit), "{t:?} exits through an open side");
        }
    }

    #[test]
    fn entry_corner_starts_first_side() {
        for t in ALL_TYPES {
            assert_eq!(t.entry_corner().open_side(), t.sides()[0]);
        }
    }

    #[test]
    fn entered_corner_matches_face_entry() {
        // Walking east into a block whose north side is open lands on the north face.
        let corner = Corner::entered_travelling(Direction::East).unwrap();
        assert_eq!(corner, FaceType::North.entry_corner());
        assert_eq!(corner, FaceType::NorthEastCorner.entry_corner());
        assert!(Corner::entered_travelling(Direction::Up).is_none());
    }

    #[test]
    fn deflection_is_a_permutation() {
        let corners = [
            Corner::NorthWest,
            Corner::NorthEast,
            Corner::SouthEast,
            Corner::SouthWest,
        ];
        let images: std::collections::HashSet<Corner> =
            corners.iter().map(|c| c.deflect()).collect();
        assert_eq!(images.len(), 4);
        for c in corners {
            // Four left turns bring the walk back to where it started.
            assert_eq!(c.deflect().deflect().deflect().deflect(), c);
        }
    }

    #[test]
    fn parallel_selection_routes_to_matching_face() {
        for pair in [ParallelPair::NorthSouth, ParallelPair::EastWest] {
            for face_type in pair.face_types() {
                let corner = face_type.entry_corner();
                assert_eq!(pair.face_types()[pair.select(corner)], face_type);
            }
        }
    }
}
