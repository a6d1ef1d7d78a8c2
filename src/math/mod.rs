pub mod arc_2d;

/// 2D point type. Plan-space points are `(x, z)`; cut-space points are `(along, height)`.
pub type Point2 = nalgebra::Point2<f64>;

/// 3D point type.
pub type Point3 = nalgebra::Point3<f64>;

/// 2D vector type.
pub type Vector2 = nalgebra::Vector2<f64>;

/// 3D vector type.
pub type Vector3 = nalgebra::Vector3<f64>;

/// Global geometric tolerance for floating-point comparisons.
pub const TOLERANCE: f64 = 1e-10;

/// Relative tolerance for arc-length stepping in the wall mesher.
///
/// Scaled by the segment length, capped at one unit, so tiny walls are
/// stepped as finely as large ones.
pub const STEP_EPSILON: f64 = 1e-5;

/// Returns `true` if two plan points coincide within `tol`.
#[must_use]
pub fn points_coincide(a: &Point2, b: &Point2, tol: f64) -> bool {
    (a - b).norm() <= tol
}
