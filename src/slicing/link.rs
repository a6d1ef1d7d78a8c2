use tracing::trace;

use crate::error::{Result, SliceError};
use crate::space::{BlockSpace, Direction, Group2dId};

use super::face::{Corner, FaceId, FaceSet};

/// Destination of one clockwise step out of a face.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct Step {
    pub target: FaceId,
    pub deflected: bool,
}

/// Links every face of a horizontal group into closed clockwise loops.
///
/// Returns one representative face per loop, in discovery order.
pub(super) fn link_group(space: &mut BlockSpace, group: Group2dId) -> Result<Vec<FaceId>> {
    let blocks = space.group_2d(group)?.blocks.clone();
    let mut faces = Vec::new();
    for block_id in blocks {
        faces.extend_from_slice(&space.block(block_id)?.faces);
    }

    let budget = faces.len();
    let mut starts = Vec::new();
    for face in faces {
        if space.face(face)?.next.is_some() {
            continue;
        }
        let length = link_loop(space, face, budget)?;
        trace!(length, "linked face loop");
        starts.push(face);
    }
    Ok(starts)
}

/// Walks clockwise from `start`, linking faces until the walk returns.
fn link_loop(space: &mut BlockSpace, start: FaceId, budget: usize) -> Result<usize> {
    if space.face(start)?.face_type.is_island() {
        let face = space.face_mut(start)?;
        face.next = Some(start);
        face.prev = Some(start);
        return Ok(1);
    }

    let mut current = start;
    let mut length = 0;
    loop {
        let Step { target, deflected } = next_step(space, current)?;
        if space.face(target)?.prev.is_some() {
            let owner = space.face(target)?.block;
            return Err(SliceError::LinkConflict(space.block(owner)?.coord).into());
        }

        let from = space.face_mut(current)?;
        from.next = Some(target);
        from.next_deflected = deflected;
        let to = space.face_mut(target)?;
        to.prev = Some(current);
        to.prev_deflected = deflected;
        length += 1;

        if target == start {
            return Ok(length);
        }
        if space.face(target)?.next.is_some() || length >= budget {
            let owner = space.face(start)?.block;
            return Err(SliceError::LoopNotClosed(space.block(owner)?.coord).into());
        }
        current = target;
    }
}

/// Computes the face the clockwise walk reaches after leaving `face`.
///
/// The walk leaves through the face's exit direction onto the neighbor there.
/// If the neighbor's block on the walk's left is occupied, the perimeter turns
/// left: the walk is re-targeted onto that block and the entry corner rotates
/// one notch.
pub(super) fn next_step(space: &BlockSpace, face: FaceId) -> Result<Step> {
    let face = space.face(face)?;
    let block = space.block(face.block)?;
    let exit = face.face_type.exit_direction();

    let neighbor_id = block.neighbor(exit).ok_or(SliceError::MissingNeighbor {
        coord: block.coord,
        direction: exit,
    })?;
    let mut corner = Corner::entered_travelling(exit).ok_or(SliceError::MissingNeighbor {
        coord: block.coord,
        direction: exit,
    })?;

    let mut destination = space.block(neighbor_id)?;
    let mut deflected = false;
    let left: Direction = exit.turn_left();
    if let Some(turned) = destination.neighbor(left) {
        destination = space.block(turned)?;
        corner = corner.deflect();
        deflected = true;
    }

    let no_entry = || SliceError::NoEntryFace {
        coord: destination.coord,
        corner: corner.name(),
    };
    if destination.is_interior_2d() {
        return Err(no_entry().into());
    }
    let set = FaceSet::for_mask(destination.horizontal_mask())?;
    let target = *destination.faces.get(set.select(corner)).ok_or_else(no_entry)?;
    if space.face(target)?.face_type.entry_corner() != corner {
        return Err(no_entry().into());
    }
    Ok(Step { target, deflected })
}
