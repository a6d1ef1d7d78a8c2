use tracing::{debug, info, trace};

use crate::error::{MeshError, Result, SpaceError};
use crate::geometry::Curve;
use crate::math::{Point3, TOLERANCE};
use crate::planning::{CutObject, WallSegment};
use crate::space::BlockSpace;

use super::column::{Column, ColumnEmitter, Transition};
use super::mesher_state::MesherState;
use super::{Aabb, BoundingSphere, TriangleMesh};

/// Counters collected while meshing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MeshStats {
    /// Wall segments meshed.
    pub segments: usize,
    /// Cut objects traversed.
    pub cuts: usize,
    /// Columns that produced geometry.
    pub checkpoints: usize,
    /// Solid-to-cut transitions.
    pub cuts_opened: usize,
    /// Cut-to-solid transitions.
    pub cuts_closed: usize,
}

/// Finished wall geometry.
#[derive(Debug, Clone)]
pub struct WallMesh {
    pub mesh: TriangleMesh,
    /// Bounds of every vertex; `None` when nothing was emitted.
    pub aabb: Option<Aabb>,
    pub bounding_sphere: Option<BoundingSphere>,
    pub stats: MeshStats,
}

#[derive(Debug)]
struct OpenSegment<'a> {
    segment: &'a WallSegment,
    state: MesherState,
}

/// Incremental mesher for wall segments with holes.
///
/// Each segment is meshed by [`Self::start_segment`], one
/// [`Self::traverse_cut`] per cut in start order, then [`Self::end_segment`].
/// All segments share one vertex buffer; normals and bounds are computed
/// once by [`Self::finish`].
#[derive(Debug, Default)]
pub struct WallMesher<'a> {
    mesh: TriangleMesh,
    emitter: ColumnEmitter,
    open: Option<OpenSegment<'a>>,
    stats: MeshStats,
}

impl<'a> WallMesher<'a> {
    /// Creates a mesher with an empty output buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Begins `segment` and emits its first column.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::SegmentStillOpen`] if the previous segment was not
    /// ended, or [`MeshError::EmptySegment`] if `segment` has no curves.
    pub fn start_segment(
        &mut self,
        segment: &'a WallSegment,
    ) -> std::result::Result<(), MeshError> {
        if self.open.is_some() {
            return Err(MeshError::SegmentStillOpen);
        }
        let state = MesherState::start(segment)?;
        self.emitter.reset();
        self.checkpoint(segment, &state, None);
        self.open = Some(OpenSegment { segment, state });
        self.stats.segments += 1;
        Ok(())
    }

    /// Walks from the current position through `cut` to its end.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::SegmentNotStarted`] outside a segment,
    /// [`MeshError::InvalidCut`] if `cut` does not lie within the segment and
    /// [`MeshError::CutTooLate`] if the walk has already passed `cut.start`.
    pub fn traverse_cut(&mut self, cut: &'a CutObject) -> std::result::Result<(), MeshError> {
        let mut open = self.open.take().ok_or(MeshError::SegmentNotStarted)?;
        let state = match open.state.with_object(cut) {
            Ok(state) => state,
            Err(err) => {
                self.open = Some(open);
                return Err(err);
            }
        };
        open.state = self.advance(open.segment, state, cut.end, Some(cut)).without_object();
        self.open = Some(open);
        self.stats.cuts += 1;
        Ok(())
    }

    /// Walks to the end of the current segment and closes it.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::SegmentNotStarted`] outside a segment.
    pub fn end_segment(&mut self) -> std::result::Result<(), MeshError> {
        let open = self.open.take().ok_or(MeshError::SegmentNotStarted)?;
        let length = open.segment.length;
        self.advance(open.segment, open.state, length, None);
        Ok(())
    }

    /// Computes normals and bounds and returns the finished mesh.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::SegmentStillOpen`] if a segment was not ended.
    pub fn finish(mut self) -> std::result::Result<WallMesh, MeshError> {
        if self.open.is_some() {
            return Err(MeshError::SegmentStillOpen);
        }
        self.mesh.compute_vertex_normals();
        Ok(WallMesh {
            aabb: self.mesh.aabb(),
            bounding_sphere: self.mesh.bounding_sphere(),
            mesh: self.mesh,
            stats: self.stats,
        })
    }

    fn advance(
        &mut self,
        segment: &WallSegment,
        mut state: MesherState,
        target: f64,
        cut: Option<&CutObject>,
    ) -> MesherState {
        while state.before(target) {
            state = state.step(segment, target);
            self.checkpoint(segment, &state, cut);
        }
        state
    }

    fn checkpoint(&mut self, segment: &WallSegment, state: &MesherState, cut: Option<&CutObject>) {
        let column = column_at(segment, state, cut);
        trace!(
            along = state.dist_along_seg,
            curve = state.curve.index,
            cut = column.is_cut(),
            "wall checkpoint"
        );
        match self.emitter.push(&mut self.mesh, column) {
            Transition::Skipped | Transition::Replaced => {}
            Transition::First | Transition::SolidToSolid | Transition::CutToCut => {
                self.stats.checkpoints += 1;
            }
            Transition::SolidToCut => {
                self.stats.checkpoints += 1;
                self.stats.cuts_opened += 1;
            }
            Transition::CutToSolid => {
                self.stats.checkpoints += 1;
                self.stats.cuts_closed += 1;
            }
        }
    }
}

/// Samples the wall at the state's position.
///
/// Inside a cut, the profile heights at the object-local offset are placed
/// on the floor-to-ceiling line as fractions of the wall height.
fn column_at(segment: &WallSegment, state: &MesherState, cut: Option<&CutObject>) -> Column {
    let index = state.curve.index;
    let t = state.curve.t();
    let fp = segment.floor_curves[index].point_at(t);
    let cp = segment.ceiling_curves[index].point_at(t);
    let floor = Point3::new(fp.x, segment.floor_y, fp.y);
    let ceiling = Point3::new(cp.x, segment.ceiling_y, cp.y);
    let along = state.dist_along_seg;

    match (cut, state.object_offset()) {
        (Some(cut), Some(x)) => {
            let height = segment.height();
            let lift = |h: f64| {
                let frac = if height > TOLERANCE { h / height } else { 0.0 };
                floor + (ceiling - floor) * frac
            };
            let points = [
                floor,
                lift(cut.bottom.height_at(x)),
                lift(cut.top.height_at(x)),
                ceiling,
            ];
            Column::cut(along, segment.floor_y, points)
        }
        _ => Column::solid(along, segment.floor_y, floor, ceiling),
    }
}

/// Meshes every planned wall segment of a space, cutting holes for its objects.
#[derive(Debug, Default)]
pub struct HoleCuttingRenderer;

impl HoleCuttingRenderer {
    /// Creates a new `HoleCuttingRenderer` operation.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Executes meshing over all groups, lowest level first.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::NotPlanned`] if a group has no planned walls, or
    /// [`MeshError::CutTooLate`] if a segment's cuts are out of order.
    pub fn execute(&self, space: &BlockSpace) -> Result<WallMesh> {
        if !space.is_grouped() {
            return Err(SpaceError::NotGrouped.into());
        }
        let mut mesher = WallMesher::new();
        for &group in space.groups_2d_by_y()? {
            let data = space.group_2d(group)?;
            if !data.planned {
                return Err(MeshError::NotPlanned.into());
            }
            for segment in &data.segments {
                mesher.start_segment(segment)?;
                for cut in &segment.objects {
                    mesher.traverse_cut(cut)?;
                }
                mesher.end_segment()?;
            }
            debug!(y = data.y, segments = data.segments.len(), "meshed floor group");
        }
        let walls = mesher.finish()?;
        info!(
            segments = walls.stats.segments,
            cuts = walls.stats.cuts,
            vertices = walls.mesh.vertices.len(),
            triangles = walls.mesh.triangle_count(),
            "rendered walls"
        );
        Ok(walls)
    }
}
