mod classify;
mod face;
mod link;

pub use face::{Corner, Face, FaceId, FaceSet, FaceType, ParallelPair};

use tracing::{debug, info};

use crate::error::{Result, SliceError, SpaceError};
use crate::space::BlockSpace;

/// Summary of a slicing run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SliceStats {
    /// Horizontal groups sliced.
    pub groups: usize,
    /// Faces created.
    pub faces: usize,
    /// Closed face loops, courtyards included.
    pub loops: usize,
}

/// Derives the oriented face loops of every horizontal group.
///
/// Each group is handled in two passes: classification creates faces from
/// each block's horizontal adjacency mask, then linking walks clockwise to
/// connect them into closed loops and records one start face per loop.
#[derive(Debug, Default)]
pub struct FloorSlicer;

impl FloorSlicer {
    /// Creates a new `FloorSlicer` operation.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Executes slicing on every horizontal group, lowest level first.
    ///
    /// # Errors
    ///
    /// Returns [`SpaceError::NotGrouped`] if groups have not been determined,
    /// [`SliceError::AlreadySliced`] if a group already has loops, and an
    /// internal-consistency [`SliceError`] if the walk cannot close a loop.
    pub fn execute(&self, space: &mut BlockSpace) -> Result<SliceStats> {
        if !space.is_grouped() {
            return Err(SpaceError::NotGrouped.into());
        }
        let groups = space.groups_2d_by_y()?.to_vec();
        let mut stats = SliceStats::default();
        for group in groups {
            if space.group_2d(group)?.is_sliced() {
                return Err(SliceError::AlreadySliced.into());
            }
            let faces = classify::classify_group(space, group)?;
            let starts = link::link_group(space, group)?;
            debug!(
                y = space.group_2d(group)?.y,
                faces,
                loops = starts.len(),
                "sliced floor group"
            );
            stats.groups += 1;
            stats.faces += faces;
            stats.loops += starts.len();
            space.group_2d_mut(group)?.loop_starts = starts;
        }
        info!(
            groups = stats.groups,
            faces = stats.faces,
            loops = stats.loops,
            "sliced floors"
        );
        Ok(stats)
    }
}

/// Collects the faces of the loop containing `start`, following `next`.
///
/// # Errors
///
/// Returns [`SliceError::LoopNotClosed`] if a link is missing or the walk
/// does not return to `start` within the number of faces in the space.
pub fn loop_faces(space: &BlockSpace, start: FaceId) -> Result<Vec<FaceId>> {
    let mut faces = vec![start];
    let mut current = start;
    loop {
        let face = space.face(current)?;
        match face.next {
            Some(next) if next == start => return Ok(faces),
            Some(next) if faces.len() <= space.face_count() => {
                faces.push(next);
                current = next;
            }
            _ => {
                let coord = space.block(face.block)?.coord;
                return Err(SliceError::LoopNotClosed(coord).into());
            }
        }
    }
}
