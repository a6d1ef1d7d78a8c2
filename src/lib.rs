pub mod error;
pub mod geometry;
pub mod math;
pub mod pipeline;
pub mod placement;
pub mod planning;
pub mod slicing;
pub mod space;
pub mod tessellation;

pub use error::{BlockwallError, Result};
pub use pipeline::{Building, BuildingParams, BuildingStats, GenerateBuilding};
