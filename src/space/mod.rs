mod block;
mod group;

pub use block::{Block, BlockBounds, BlockCoord, BlockId, Direction};
pub use group::{Group2d, Group2dId, Group3d, Group3dId};

use std::collections::HashMap;

use slotmap::SlotMap;
use tracing::{debug, info};

use crate::error::SpaceError;
use crate::slicing::{Face, FaceId};

/// Central arena that owns every block, group and face of one layout.
///
/// Entities reference each other via typed IDs (generational indices), so the
/// cyclic block adjacency and face loops need no shared ownership. Blocks are
/// added incrementally; reciprocal adjacency is wired at insertion time.
#[derive(Debug)]
pub struct BlockSpace {
    h_unit: f64,
    v_unit: f64,
    blocks: SlotMap<BlockId, Block>,
    by_coord: HashMap<BlockCoord, BlockId>,
    faces: SlotMap<FaceId, Face>,
    groups_3d: SlotMap<Group3dId, Group3d>,
    groups_2d: SlotMap<Group2dId, Group2d>,
    groups_2d_by_y: Vec<Group2dId>,
    grouped: bool,
}

impl BlockSpace {
    /// Creates an empty space with the given horizontal and vertical cell sizes.
    #[must_use]
    pub fn new(h_unit: f64, v_unit: f64) -> Self {
        Self {
            h_unit,
            v_unit,
            blocks: SlotMap::with_key(),
            by_coord: HashMap::new(),
            faces: SlotMap::with_key(),
            groups_3d: SlotMap::with_key(),
            groups_2d: SlotMap::with_key(),
            groups_2d_by_y: Vec::new(),
            grouped: false,
        }
    }

    /// Horizontal cell size.
    #[must_use]
    pub fn h_unit(&self) -> f64 {
        self.h_unit
    }

    /// Vertical cell size.
    #[must_use]
    pub fn v_unit(&self) -> f64 {
        self.v_unit
    }

    /// Number of blocks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Whether the space holds no blocks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    // --- Block operations ---

    /// Returns the block at `coord`, creating it if needed.
    ///
    /// A new block gets its boundaries from `coord` and the unit sizes and is
    /// linked reciprocally with every existing neighbor.
    ///
    /// # Errors
    ///
    /// Returns [`SpaceError::Sealed`] once groups have been determined, or
    /// [`SpaceError::AdjacencyClobber`] if a neighbor already holds a link in
    /// the reciprocal slot.
    pub fn get_or_create(&mut self, coord: BlockCoord) -> Result<BlockId, SpaceError> {
        if let Some(&id) = self.by_coord.get(&coord) {
            return Ok(id);
        }
        if self.grouped {
            return Err(SpaceError::Sealed(coord));
        }

        let mut adjacent = [None; 6];
        for direction in Direction::ALL {
            let neighbor = coord
                .step(direction)
                .and_then(|c| self.by_coord.get(&c).copied());
            if let Some(other) = neighbor {
                let back = direction.opposite();
                if self.blocks[other].neighbor(back).is_some() {
                    return Err(SpaceError::AdjacencyClobber {
                        coord: self.blocks[other].coord,
                        direction: back,
                    });
                }
            }
            adjacent[direction.index()] = neighbor;
        }

        let bounds = BlockBounds::from_coord(coord, self.h_unit, self.v_unit);
        let mut block = Block::new(coord, bounds);
        block.adjacent = adjacent;
        let id = self.blocks.insert(block);

        for direction in Direction::ALL {
            if let Some(other) = adjacent[direction.index()] {
                self.blocks[other].adjacent[direction.opposite().index()] = Some(id);
            }
        }
        self.by_coord.insert(coord, id);
        Ok(id)
    }

    /// Looks up the block at `coord`.
    #[must_use]
    pub fn block_at(&self, coord: BlockCoord) -> Option<BlockId> {
        self.by_coord.get(&coord).copied()
    }

    /// Returns a reference to the block data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the space.
    pub fn block(&self, id: BlockId) -> Result<&Block, SpaceError> {
        self.blocks
            .get(id)
            .ok_or(SpaceError::EntityNotFound("block"))
    }

    /// Iterates over all blocks in insertion order.
    pub fn blocks(&self) -> impl Iterator<Item = (BlockId, &Block)> {
        self.blocks.iter()
    }

    // --- Face operations ---

    /// Inserts a face, attaches it to its owning block and returns its ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the owning block is not found.
    pub fn add_face(&mut self, face: Face) -> Result<FaceId, SpaceError> {
        let owner = face.block;
        if !self.blocks.contains_key(owner) {
            return Err(SpaceError::EntityNotFound("block"));
        }
        let id = self.faces.insert(face);
        self.blocks[owner].faces.push(id);
        Ok(id)
    }

    /// Returns a reference to the face data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the space.
    pub fn face(&self, id: FaceId) -> Result<&Face, SpaceError> {
        self.faces.get(id).ok_or(SpaceError::EntityNotFound("face"))
    }

    /// Returns a mutable reference to the face data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the space.
    pub fn face_mut(&mut self, id: FaceId) -> Result<&mut Face, SpaceError> {
        self.faces
            .get_mut(id)
            .ok_or(SpaceError::EntityNotFound("face"))
    }

    /// Number of faces created by slicing.
    #[must_use]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    // --- Group operations ---

    /// Whether [`Self::determine_groups`] has run.
    #[must_use]
    pub fn is_grouped(&self) -> bool {
        self.grouped
    }

    /// Flood-fills 3D and horizontal groups for every block.
    ///
    /// Must be called exactly once, after all insertions. Uses explicit
    /// worklists so large layouts cannot exhaust the stack.
    ///
    /// # Errors
    ///
    /// Returns [`SpaceError::AlreadyGrouped`] on a second call.
    pub fn determine_groups(&mut self) -> Result<(), SpaceError> {
        if self.grouped {
            return Err(SpaceError::AlreadyGrouped);
        }
        self.grouped = true;

        let ids: Vec<BlockId> = self.blocks.keys().collect();
        for id in ids {
            if self.blocks[id].group_3d.is_none() {
                let group = self.groups_3d.insert(Group3d::default());
                self.flood_3d(id, group);
            }
            if self.blocks[id].group_2d.is_none() {
                let y = self.blocks[id].coord.y;
                let group = self.groups_2d.insert(Group2d::new(y));
                self.flood_2d(id, group);
            }
        }

        let mut by_y: Vec<Group2dId> = self.groups_2d.keys().collect();
        by_y.sort_by_key(|&g| self.groups_2d[g].y);
        self.groups_2d_by_y = by_y;

        info!(
            blocks = self.blocks.len(),
            groups_3d = self.groups_3d.len(),
            groups_2d = self.groups_2d.len(),
            "determined block groups"
        );
        Ok(())
    }

    // Invariant: a block whose group is set has had its neighbors queued.
    fn flood_3d(&mut self, root: BlockId, group: Group3dId) {
        let mut pending = vec![root];
        while let Some(id) = pending.pop() {
            let block = &mut self.blocks[id];
            if block.group_3d.is_some() {
                continue;
            }
            block.group_3d = Some(group);
            pending.extend(block.adjacent.iter().flatten());
            self.groups_3d[group].blocks.push(id);
        }
    }

    fn flood_2d(&mut self, root: BlockId, group: Group2dId) {
        let mut pending = vec![root];
        while let Some(id) = pending.pop() {
            let block = &mut self.blocks[id];
            if block.group_2d.is_some() {
                continue;
            }
            block.group_2d = Some(group);
            pending.extend(Direction::HORIZONTAL.iter().filter_map(|&d| block.neighbor(d)));
            self.groups_2d[group].blocks.push(id);
        }
        debug!(
            y = self.groups_2d[group].y,
            blocks = self.groups_2d[group].blocks.len(),
            "flooded horizontal group"
        );
    }

    /// 3D groups in creation order.
    ///
    /// # Errors
    ///
    /// Returns [`SpaceError::NotGrouped`] before grouping has run.
    pub fn groups_3d(&self) -> Result<impl Iterator<Item = (Group3dId, &Group3d)>, SpaceError> {
        if !self.grouped {
            return Err(SpaceError::NotGrouped);
        }
        Ok(self.groups_3d.iter())
    }

    /// Horizontal groups sorted by ascending level.
    ///
    /// # Errors
    ///
    /// Returns [`SpaceError::NotGrouped`] before grouping has run.
    pub fn groups_2d_by_y(&self) -> Result<&[Group2dId], SpaceError> {
        if !self.grouped {
            return Err(SpaceError::NotGrouped);
        }
        Ok(&self.groups_2d_by_y)
    }

    /// Returns a reference to the group data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the space.
    pub fn group_2d(&self, id: Group2dId) -> Result<&Group2d, SpaceError> {
        self.groups_2d
            .get(id)
            .ok_or(SpaceError::EntityNotFound("group"))
    }

    /// Returns a mutable reference to the group data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the space.
    pub fn group_2d_mut(&mut self, id: Group2dId) -> Result<&mut Group2d, SpaceError> {
        self.groups_2d
            .get_mut(id)
            .ok_or(SpaceError::EntityNotFound("group"))
    }

    /// Returns a reference to the 3D group data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the space.
    pub fn group_3d(&self, id: Group3dId) -> Result<&Group3d, SpaceError> {
        self.groups_3d
            .get(id)
            .ok_or(SpaceError::EntityNotFound("group"))
    }
}
