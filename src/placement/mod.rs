mod window;

pub use window::WindowPlacer;

use tracing::{debug, info};

use crate::error::{PlacementError, Result, SpaceError};
use crate::planning::{CutObject, WallSegment};
use crate::space::BlockSpace;

/// Decides which cut objects go on a wall segment.
pub trait ObjectPlacer {
    /// Returns the cuts for `segment`, in any order.
    fn place(&self, segment: &WallSegment) -> Vec<CutObject>;
}

/// Places no objects; every wall stays solid.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoObjects;

impl ObjectPlacer for NoObjects {
    fn place(&self, _segment: &WallSegment) -> Vec<CutObject> {
        Vec::new()
    }
}

/// Runs an [`ObjectPlacer`] over every planned wall segment.
///
/// Cuts are validated against their segment and stored sorted by start
/// offset. Overlap between cuts on one segment is not checked.
pub struct PlaceObjects<'a> {
    placer: &'a dyn ObjectPlacer,
}

impl<'a> PlaceObjects<'a> {
    /// Creates a new `PlaceObjects` operation.
    #[must_use]
    pub fn new(placer: &'a dyn ObjectPlacer) -> Self {
        Self { placer }
    }

    /// Executes placement and returns the number of cuts stored.
    ///
    /// # Errors
    ///
    /// Returns [`PlacementError::NotPlanned`] if a group has not been planned,
    /// [`PlacementError::InvalidCut`] for a cut outside `0 <= start < end <= length`,
    /// and [`PlacementError::InvalidSampleCount`] for bad profile sample counts.
    pub fn execute(&self, space: &mut BlockSpace) -> Result<usize> {
        if !space.is_grouped() {
            return Err(SpaceError::NotGrouped.into());
        }
        let mut placed = 0;
        for group in space.groups_2d_by_y()?.to_vec() {
            let data = space.group_2d_mut(group)?;
            if !data.planned {
                return Err(PlacementError::NotPlanned.into());
            }
            for segment in &mut data.segments {
                let mut cuts = self.placer.place(segment);
                for cut in &cuts {
                    validate_cut(cut, segment.length)?;
                }
                cuts.sort_by(|a, b| a.start.total_cmp(&b.start));
                debug!(
                    loop_index = segment.loop_index,
                    length = segment.length,
                    cuts = cuts.len(),
                    "placed objects on segment"
                );
                placed += cuts.len();
                segment.objects = cuts;
            }
        }
        info!(cuts = placed, "placed objects");
        Ok(placed)
    }
}

fn validate_cut(cut: &CutObject, length: f64) -> std::result::Result<(), PlacementError> {
    let in_range = cut.start.is_finite()
        && cut.end.is_finite()
        && cut.start >= 0.0
        && cut.start < cut.end
        && cut.end <= length;
    if !in_range {
        return Err(PlacementError::InvalidCut {
            start: cut.start,
            end: cut.end,
            length,
        });
    }
    if cut.min_points < 2 || cut.min_points > cut.max_points {
        return Err(PlacementError::InvalidSampleCount {
            min: cut.min_points,
            max: cut.max_points,
        });
    }
    Ok(())
}
