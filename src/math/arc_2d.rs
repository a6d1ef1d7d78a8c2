/// 2D arc/bulge math utilities.
///
/// Bulge convention: `bulge = tan(sweep_angle / 4)`.
/// - `bulge = 0`: straight line
/// - `bulge > 0`: counter-clockwise arc
/// - `bulge < 0`: clockwise arc
/// - `|bulge| = 1`: semicircle
use super::Point2;

/// Center-radius-angle form of a bulge arc.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcGeometry {
    pub center: Point2,
    pub radius: f64,
    pub start_angle: f64,
    pub sweep: f64,
}

impl ArcGeometry {
    /// Arc length of the sweep.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.radius * self.sweep.abs()
    }

    /// Evaluates a point on the arc at parameter `t` in `[0, 1]`.
    #[must_use]
    pub fn point_at(&self, t: f64) -> Point2 {
        let angle = self.start_angle + self.sweep * t;
        Point2::new(
            self.center.x + self.radius * angle.cos(),
            self.center.y + self.radius * angle.sin(),
        )
    }
}

/// Converts a bulge-defined arc segment to center-radius-angle form.
///
/// Returns `None` for a zero-length chord or a zero bulge (no arc).
#[must_use]
pub fn arc_from_bulge(p0: &Point2, p1: &Point2, bulge: f64) -> Option<ArcGeometry> {
    let dx = p1.x - p0.x;
    let dy = p1.y - p0.y;
    let chord_len = (dx * dx + dy * dy).sqrt();

    if chord_len < 1e-12 || bulge.abs() < 1e-12 {
        return None;
    }

    // Distance from chord midpoint to center.
    let sagitta_ratio = (1.0 - bulge * bulge) / (2.0 * bulge);
    let mx = (p0.x + p1.x) * 0.5;
    let my = (p0.y + p1.y) * 0.5;

    // Normal to chord pointing toward center (for positive bulge, center is left of chord).
    let nx = -dy / chord_len;
    let ny = dx / chord_len;

    let center = Point2::new(
        mx + sagitta_ratio * (chord_len * 0.5) * nx,
        my + sagitta_ratio * (chord_len * 0.5) * ny,
    );

    // r = d*(1+b²)/(4*|b|) derived from r = d/(2*sin(θ/2)) with θ=4*atan(b)
    let radius = (chord_len * 0.5) * (1.0 + bulge * bulge) / (2.0 * bulge.abs());
    let start_angle = (p0.y - center.y).atan2(p0.x - center.x);
    let sweep = 4.0 * bulge.atan();

    Some(ArcGeometry {
        center,
        radius,
        start_angle,
        sweep,
    })
}

/// Height of the arc above `x`, picking the crossing on the side the arc bulges toward.
///
/// Only meaningful for arcs whose chord is horizontal and whose sweep stays
/// within a semicircle (`|bulge| <= 1`), which makes them x-monotone.
#[must_use]
pub fn arc_height_at(arc: &ArcGeometry, x: f64, bulge_up: bool) -> f64 {
    let dx = (x - arc.center.x).clamp(-arc.radius, arc.radius);
    let dy = (arc.radius * arc.radius - dx * dx).max(0.0).sqrt();
    if bulge_up {
        arc.center.y + dy
    } else {
        arc.center.y - dy
    }
}
