use tracing::info;

use crate::error::{ParamsError, Result};
use crate::placement::{ObjectPlacer, PlaceObjects};
use crate::planning::{CurveSamples, PlanFaces, PlanWalls, PlannerRegistry, RightAngleWallPlanner};
use crate::slicing::{FloorSlicer, SliceStats};
use crate::space::{BlockCoord, BlockSpace};
use crate::tessellation::{HoleCuttingRenderer, WallMesh};

/// Parameters controlling building generation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BuildingParams {
    /// Horizontal cell size.
    pub h_unit: f64,
    /// Vertical cell size.
    pub v_unit: f64,
    /// Wall inset from the block boundary; `None` uses `h_unit / 5`.
    pub inset: Option<f64>,
    /// Minimum sample points per wall curve.
    pub curve_min_points: usize,
    /// Maximum sample points per wall curve.
    pub curve_max_points: usize,
}

impl Default for BuildingParams {
    fn default() -> Self {
        Self {
            h_unit: 1.0,
            v_unit: 1.0,
            inset: None,
            curve_min_points: 2,
            curve_max_points: 2,
        }
    }
}

impl BuildingParams {
    /// Sets the horizontal and vertical cell sizes.
    #[must_use]
    pub fn with_units(mut self, h_unit: f64, v_unit: f64) -> Self {
        self.h_unit = h_unit;
        self.v_unit = v_unit;
        self
    }

    /// Sets an explicit wall inset.
    #[must_use]
    pub fn with_inset(mut self, inset: f64) -> Self {
        self.inset = Some(inset);
        self
    }

    /// Sets the per-curve sample counts.
    #[must_use]
    pub fn with_curve_points(mut self, min: usize, max: usize) -> Self {
        self.curve_min_points = min;
        self.curve_max_points = max;
        self
    }

    /// Effective wall inset.
    #[must_use]
    pub fn inset(&self) -> f64 {
        self.inset.unwrap_or(self.h_unit / 5.0)
    }

    /// Per-curve sample counts.
    #[must_use]
    pub fn curve_samples(&self) -> CurveSamples {
        CurveSamples::new(self.curve_min_points, self.curve_max_points)
    }

    /// Checks that the parameters describe a buildable layout.
    ///
    /// # Errors
    ///
    /// Returns a [`ParamsError`] naming the first invalid parameter.
    pub fn validate(&self) -> std::result::Result<(), ParamsError> {
        for (name, value) in [("h_unit", self.h_unit), ("v_unit", self.v_unit)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ParamsError::NonPositive { name, value });
            }
        }
        let inset = self.inset();
        let limit = self.h_unit / 2.0;
        if !inset.is_finite() || inset < 0.0 || inset >= limit {
            return Err(ParamsError::InsetOutOfRange { inset, limit });
        }
        if self.curve_min_points < 2 || self.curve_min_points > self.curve_max_points {
            return Err(ParamsError::SampleCounts {
                min: self.curve_min_points,
                max: self.curve_max_points,
            });
        }
        Ok(())
    }
}

/// Counts gathered across the stages of one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildingStats {
    pub blocks: usize,
    pub slice: SliceStats,
    pub segments: usize,
    pub cuts: usize,
}

/// Result of a full generation run.
#[derive(Debug)]
pub struct Building {
    /// The populated space, including faces and planned segments.
    pub space: BlockSpace,
    /// Wall geometry of every floor.
    pub walls: WallMesh,
    pub stats: BuildingStats,
}

/// Generates wall geometry for a set of occupied cells.
#[derive(Debug)]
pub struct GenerateBuilding {
    coords: Vec<BlockCoord>,
    params: BuildingParams,
}

impl GenerateBuilding {
    /// Creates a new `GenerateBuilding` operation.
    #[must_use]
    pub fn new(coords: Vec<BlockCoord>, params: BuildingParams) -> Self {
        Self { coords, params }
    }

    /// Runs every stage in order and returns the building.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by any stage; no partial geometry is
    /// returned.
    pub fn execute(&self, placer: &dyn ObjectPlacer) -> Result<Building> {
        self.params.validate()?;

        let mut space = BlockSpace::new(self.params.h_unit, self.params.v_unit);
        for &coord in &self.coords {
            space.get_or_create(coord)?;
        }
        space.determine_groups()?;

        let slice = FloorSlicer::new().execute(&mut space)?;

        let mut registry = PlannerRegistry::new();
        let planner = registry.register(Box::new(RightAngleWallPlanner::new(self.params.inset())));
        PlanFaces::new(planner).execute(&mut space)?;
        let segments =
            PlanWalls::new(&registry, self.params.curve_samples()).execute(&mut space)?;

        let cuts = PlaceObjects::new(placer).execute(&mut space)?;
        let walls = HoleCuttingRenderer::new().execute(&space)?;

        let stats = BuildingStats {
            blocks: space.len(),
            slice,
            segments,
            cuts,
        };
        info!(
            blocks = stats.blocks,
            loops = stats.slice.loops,
            segments,
            cuts,
            triangles = walls.mesh.triangle_count(),
            "generated building"
        );
        Ok(Building {
            space,
            walls,
            stats,
        })
    }
}
