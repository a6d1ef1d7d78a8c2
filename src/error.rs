use thiserror::Error;

use crate::space::{BlockCoord, Direction};

/// Top-level error type for the blockwall pipeline.
#[derive(Debug, Error)]
pub enum BlockwallError {
    #[error(transparent)]
    Params(#[from] ParamsError),

    #[error(transparent)]
    Space(#[from] SpaceError),

    #[error(transparent)]
    Slice(#[from] SliceError),

    #[error(transparent)]
    Plan(#[from] PlanError),

    #[error(transparent)]
    Placement(#[from] PlacementError),

    #[error(transparent)]
    Mesh(#[from] MeshError),
}

/// Errors related to pipeline configuration.
#[derive(Debug, Error)]
pub enum ParamsError {
    #[error("{name} must be finite and positive, got {value}")]
    NonPositive { name: &'static str, value: f64 },

    #[error("inset {inset} must lie in [0, {limit})")]
    InsetOutOfRange { inset: f64, limit: f64 },

    #[error("sample counts must satisfy 2 <= min <= max, got min={min} max={max}")]
    SampleCounts { min: usize, max: usize },
}

/// Errors raised by the block space.
#[derive(Debug, Error)]
pub enum SpaceError {
    #[error("groups have already been determined")]
    AlreadyGrouped,

    #[error("groups have not been determined yet")]
    NotGrouped,

    #[error("cannot insert block at {0} after groups were determined")]
    Sealed(BlockCoord),

    #[error("block at {coord} already has a {direction:?} neighbor")]
    AdjacencyClobber {
        coord: BlockCoord,
        direction: Direction,
    },

    #[error("entity not found: {0}")]
    EntityNotFound(&'static str),
}

/// Internal-consistency and usage errors raised while slicing floors.
#[derive(Debug, Error)]
pub enum SliceError {
    #[error("floor group has already been sliced")]
    AlreadySliced,

    #[error("adjacency mask {mask} resolves to no face types")]
    NoFaceTypes { mask: u8 },

    #[error("block at {coord} has no {direction:?} neighbor to walk onto")]
    MissingNeighbor {
        coord: BlockCoord,
        direction: Direction,
    },

    #[error("block at {coord} has no face entered at its {corner} corner")]
    NoEntryFace {
        coord: BlockCoord,
        corner: &'static str,
    },

    #[error("face on block {0} was linked twice")]
    LinkConflict(BlockCoord),

    #[error("face loop starting on block {0} did not close")]
    LoopNotClosed(BlockCoord),
}

/// Errors raised by wall planning.
#[derive(Debug, Error)]
pub enum PlanError {
    #[error("floors must be sliced before walls are planned")]
    NotSliced,

    #[error("floor group has already been planned")]
    AlreadyPlanned,

    #[error("face on block {0} has no planner assigned")]
    UnplannedFace(BlockCoord),

    #[error("unknown wall planner id {0}")]
    UnknownPlanner(usize),

    #[error("wall planner produced an empty run")]
    EmptyRun,
}

/// Errors raised while placing cut objects on wall segments.
#[derive(Debug, Error)]
pub enum PlacementError {
    #[error("walls must be planned before objects are placed")]
    NotPlanned,

    #[error("cut [{start}, {end}] does not fit segment of length {length}")]
    InvalidCut { start: f64, end: f64, length: f64 },

    #[error("cut sample counts must satisfy 2 <= min <= max, got min={min} max={max}")]
    InvalidSampleCount { min: usize, max: usize },
}

/// Errors raised by the hole-cutting mesher.
#[derive(Debug, Error)]
pub enum MeshError {
    #[error("walls must be planned before they are meshed")]
    NotPlanned,

    #[error("cut registered {overshoot} past its start")]
    CutTooLate { overshoot: f64 },

    #[error("cut [{start}, {end}] does not fit segment of length {length}")]
    InvalidCut { start: f64, end: f64, length: f64 },

    #[error("no wall segment is being meshed")]
    SegmentNotStarted,

    #[error("wall segment has no curves")]
    EmptySegment,

    #[error("a wall segment is still open")]
    SegmentStillOpen,
}

/// Convenience type alias for results using [`BlockwallError`].
pub type Result<T> = std::result::Result<T, BlockwallError>;
