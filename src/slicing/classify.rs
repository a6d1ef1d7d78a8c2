use crate::error::Result;
use crate::space::{BlockSpace, Group2dId};

use super::face::{Face, FaceSet};

/// Creates the faces of every non-interior block in a horizontal group.
///
/// Returns the number of faces created.
pub(super) fn classify_group(space: &mut BlockSpace, group: Group2dId) -> Result<usize> {
    let blocks = space.group_2d(group)?.blocks.clone();
    let mut created = 0;
    for block_id in blocks {
        let block = space.block(block_id)?;
        // Enclosed blocks contribute no perimeter.
        if block.is_interior_2d() {
            continue;
        }
        let set = FaceSet::for_mask(block.horizontal_mask())?;
        for face_type in set.face_types() {
            space.add_face(Face::new(block_id, face_type))?;
            created += 1;
        }
    }
    Ok(created)
}
