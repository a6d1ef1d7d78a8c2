use crate::planning::WallSegment;
use crate::slicing::FaceId;

use super::block::BlockId;

slotmap::new_key_type! {
    /// Unique identifier for a 3D-connected block group.
    pub struct Group3dId;
}

slotmap::new_key_type! {
    /// Unique identifier for a horizontally connected block group on one level.
    pub struct Group2dId;
}

/// Blocks reachable from each other through any of the six directions.
#[derive(Debug, Clone, Default)]
pub struct Group3d {
    /// Member blocks in flood order.
    pub blocks: Vec<BlockId>,
}

/// Blocks on one level reachable through north/east/south/west adjacency.
#[derive(Debug, Clone)]
pub struct Group2d {
    /// Grid level shared by every member.
    pub y: i32,
    /// Member blocks in flood order.
    pub blocks: Vec<BlockId>,
    /// One representative face per closed perimeter, courtyards included.
    pub loop_starts: Vec<FaceId>,
    /// Planned wall segments of every loop, in loop order.
    pub segments: Vec<WallSegment>,
    /// Whether wall planning has run for this group.
    pub planned: bool,
}

impl Group2d {
    /// Creates an empty group on level `y`.
    #[must_use]
    pub fn new(y: i32) -> Self {
        Self {
            y,
            blocks: Vec::new(),
            loop_starts: Vec::new(),
            segments: Vec::new(),
            planned: false,
        }
    }

    /// Whether floor slicing has produced loops for this group.
    #[must_use]
    pub fn is_sliced(&self) -> bool {
        !self.loop_starts.is_empty()
    }
}
