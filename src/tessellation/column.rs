use crate::math::{Point2, Point3, TOLERANCE};

use super::TriangleMesh;

/// Vertical cross-section of a wall at one arc-length position.
///
/// A solid column holds `[floor, ceiling]`; a column inside a cut holds
/// `[floor, cut_bottom, cut_top, ceiling]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    /// Arc length along the segment.
    pub along: f64,
    /// World height of the floor, used for UVs.
    pub floor_y: f64,
    /// Vertices from floor to ceiling.
    pub points: Vec<Point3>,
}

impl Column {
    /// A column through solid wall.
    #[must_use]
    pub fn solid(along: f64, floor_y: f64, floor: Point3, ceiling: Point3) -> Self {
        Self {
            along,
            floor_y,
            points: vec![floor, ceiling],
        }
    }

    /// A column through a cut.
    #[must_use]
    pub fn cut(along: f64, floor_y: f64, points: [Point3; 4]) -> Self {
        Self {
            along,
            floor_y,
            points: points.to_vec(),
        }
    }

    /// Whether the column passes through a cut.
    #[must_use]
    pub fn is_cut(&self) -> bool {
        self.points.len() == 4
    }
}

/// What happened when a column was pushed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// First column of a segment.
    First,
    /// Identical to the previous column; nothing emitted.
    Skipped,
    /// Same position as the previous column but different vertices; the
    /// previous column was replaced without emitting faces.
    Replaced,
    SolidToSolid,
    SolidToCut,
    CutToSolid,
    CutToCut,
}

#[derive(Debug)]
struct Pending {
    column: Column,
    base: Option<u32>,
}

/// Connects consecutive columns of one segment with triangles.
///
/// A column's vertices are appended to the mesh only once a face uses them.
#[derive(Debug, Default)]
pub struct ColumnEmitter {
    pending: Option<Pending>,
}

impl ColumnEmitter {
    /// Creates an emitter with no pending column.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Forgets the pending column, ready for a new segment.
    pub fn reset(&mut self) {
        self.pending = None;
    }

    /// Pushes the next column, emitting the faces that join it to the previous one.
    pub fn push(&mut self, mesh: &mut TriangleMesh, column: Column) -> Transition {
        let Some(previous) = self.pending.take() else {
            self.pending = Some(Pending { column, base: None });
            return Transition::First;
        };
        if previous.column == column {
            self.pending = Some(previous);
            return Transition::Skipped;
        }
        if (previous.column.along - column.along).abs() <= TOLERANCE {
            self.pending = Some(Pending { column, base: None });
            return Transition::Replaced;
        }

        let from = previous
            .base
            .unwrap_or_else(|| append_column(mesh, &previous.column));
        let to = append_column(mesh, &column);
        let transition = emit_faces(mesh, &previous.column, from, &column, to);
        self.pending = Some(Pending {
            column,
            base: Some(to),
        });
        transition
    }
}

fn append_column(mesh: &mut TriangleMesh, column: &Column) -> u32 {
    let mut base = None;
    for p in &column.points {
        let index = mesh.push_vertex(*p, Point2::new(column.along, p.y - column.floor_y));
        base.get_or_insert(index);
    }
    base.unwrap_or_default()
}

/// Emits the triangles between two columns, wound so normals face outward.
fn emit_faces(mesh: &mut TriangleMesh, from: &Column, f: u32, to: &Column, t: u32) -> Transition {
    let (f0, f1, f2, f3) = (f, f + 1, f + 2, f + 3);
    let (t0, t1, t2, t3) = (t, t + 1, t + 2, t + 3);
    let (triangles, transition) = match (from.is_cut(), to.is_cut()) {
        (false, false) => (vec![[f0, f1, t0], [f1, t1, t0]], Transition::SolidToSolid),
        (false, true) => (
            vec![[f0, t1, t0], [f0, t2, t1], [f0, f1, t2], [f1, t3, t2]],
            Transition::SolidToCut,
        ),
        (true, false) => (
            vec![[f0, f1, t0], [f1, f2, t0], [f2, t1, t0], [f2, f3, t1]],
            Transition::CutToSolid,
        ),
        (true, true) => (
            vec![[f0, f1, t0], [f1, t1, t0], [f2, f3, t2], [f3, t3, t2]],
            Transition::CutToCut,
        ),
    };
    mesh.indices.extend(triangles);
    transition
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(x: f64) -> Column {
        Column::solid(x, 0.0, Point3::new(x, 0.0, 0.0), Point3::new(x, 3.0, 0.0))
    }

    fn cut(x: f64) -> Column {
        Column::cut(
            x,
            0.0,
            [
                Point3::new(x, 0.0, 0.0),
                Point3::new(x, 1.0, 0.0),
                Point3::new(x, 2.0, 0.0),
                Point3::new(x, 3.0, 0.0),
            ],
        )
    }

    #[test]
    fn solid_run_appends_two_vertices_per_column() {
        let mut mesh = TriangleMesh::default();
        let mut emitter = ColumnEmitter::new();
        assert_eq!(emitter.push(&mut mesh, solid(0.0)), Transition::First);
        assert!(mesh.vertices.is_empty());
        for x in [1.0, 2.0, 3.0] {
            assert_eq!(emitter.push(&mut mesh, solid(x)), Transition::SolidToSolid);
        }
        assert_eq!(mesh.vertices.len(), 8);
        assert_eq!(mesh.triangle_count(), 6);
        assert_eq!(mesh.uvs[7], Point2::new(3.0, 3.0));
    }

    #[test]
    fn window_transitions_emit_four_triangles_each() {
        let mut mesh = TriangleMesh::default();
        let mut emitter = ColumnEmitter::new();
        emitter.push(&mut mesh, solid(0.0));
        assert_eq!(emitter.push(&mut mesh, cut(1.0)), Transition::SolidToCut);
        assert_eq!(emitter.push(&mut mesh, cut(2.0)), Transition::CutToCut);
        assert_eq!(emitter.push(&mut mesh, solid(3.0)), Transition::CutToSolid);
        assert_eq!(mesh.triangle_count(), 12);
        assert_eq!(mesh.vertices.len(), 2 + 4 + 4 + 2);
        // No triangle spans the opening between cut bottom and cut top.
        let (t1, t2) = (3, 4);
        assert!(!mesh
            .indices
            .iter()
            .any(|tri| tri.contains(&t1) && tri.contains(&t2) && tri.contains(&7)));
    }

    #[test]
    fn identical_columns_are_skipped() {
        let mut mesh = TriangleMesh::default();
        let mut emitter = ColumnEmitter::new();
        emitter.push(&mut mesh, solid(0.0));
        emitter.push(&mut mesh, solid(1.0));
        assert_eq!(emitter.push(&mut mesh, solid(1.0)), Transition::Skipped);
        assert_eq!(mesh.triangle_count(), 2);
    }

    #[test]
    fn coincident_column_replaces_the_pending_one() {
        let mut mesh = TriangleMesh::default();
        let mut emitter = ColumnEmitter::new();
        emitter.push(&mut mesh, solid(0.0));
        assert_eq!(emitter.push(&mut mesh, cut(0.0)), Transition::Replaced);
        assert_eq!(emitter.push(&mut mesh, cut(1.0)), Transition::CutToCut);
        // The replaced solid column never reached the mesh.
        assert_eq!(mesh.vertices.len(), 8);
        assert_eq!(mesh.triangle_count(), 4);
    }
}
