//! Field synthesis: turning interpolated neighbours into physical output.
//!
//! Two variants, selected by the imperfection kind:
//!
//! - **Mid-surface**: the neighbours' radii are first divided by their own
//!   local nominal radius, so the pattern becomes a dimensionless deviation
//!   ratio that transfers between differently sized shells. The weighted
//!   ratio is scaled back with the single reference radius `r_model` — the
//!   absolute imperfection amplitude of a manufacturing process is constant
//!   along the meridian, it does not grow with the local cone radius — and
//!   decomposed into the cone's local radial and axial directions.
//! - **Thickness**: a plain weighted average of the neighbours' measured
//!   thickness values, no radius normalization.

use imperfect_types::{ShellGeometry, TargetPoint};
use nalgebra::Vector3;

use crate::interpolate::WeightedNeighbor;
use crate::normalize::NormalizedPoint;

/// Synthesizes the mid-surface translation for one target point.
///
/// `neighbors` index into `points`, the target's section slice. The result
/// is the translation to apply to the node, already multiplied by
/// `scaling_factor`.
///
/// # Example
///
/// ```
/// use imperfect_map::interpolate::WeightedNeighbor;
/// use imperfect_map::normalize::NormalizedPoint;
/// use imperfect_map::synthesize::mid_surface_translation;
/// use imperfect_types::{ShellGeometry, TargetPoint};
/// use nalgebra::Point3;
///
/// let geometry = ShellGeometry::cylinder(100.0, 100.0);
/// // One measured sample bulging 2 units outward at theta = 0
/// let points = vec![NormalizedPoint {
///     position: Point3::new(102.0, 0.0, 50.0),
///     thickness: None,
/// }];
/// let neighbors = vec![WeightedNeighbor { index: 0, weight: 1.0 }];
/// let target = TargetPoint::from_coords(100.0, 0.0, 50.0, 1);
///
/// let t = mid_surface_translation(&target, &neighbors, &points, &geometry, 1.0);
/// assert!((t.x - 2.0).abs() < 1e-9);
/// assert!(t.y.abs() < 1e-9 && t.z.abs() < 1e-9);
/// ```
#[must_use]
pub fn mid_surface_translation(
    target: &TargetPoint,
    neighbors: &[WeightedNeighbor],
    points: &[NormalizedPoint],
    geometry: &ShellGeometry,
    scaling_factor: f64,
) -> Vector3<f64> {
    let mut ratio = 0.0;
    for neighbor in neighbors {
        let p = &points[neighbor.index];
        let r = p.position.x.hypot(p.position.y);
        ratio += neighbor.weight * r / geometry.local_radius(p.position.z);
    }

    // Constant absolute amplitude along the meridian: scale the
    // dimensionless ratio back with r_model, not the node's local radius.
    let amplitude = (ratio - 1.0) * geometry.r_model * scaling_factor;

    let theta = target.theta();
    let (sin_a, cos_a) = geometry.semi_angle.sin_cos();

    // Decompose along the cone's outward surface normal: the radius
    // shrinks with z, so the normal tilts toward +z.
    Vector3::new(
        amplitude * cos_a * theta.cos(),
        amplitude * cos_a * theta.sin(),
        amplitude * sin_a,
    )
}

/// Synthesizes the wall thickness for one target element.
///
/// Neighbours without a thickness value contribute zero; the pipeline
/// rejects thickness runs on clouds that do not carry thickness data, so
/// this only matters for hand-built inputs.
#[must_use]
pub fn thickness_value(
    neighbors: &[WeightedNeighbor],
    points: &[NormalizedPoint],
    scaling_factor: f64,
) -> f64 {
    let mut value = 0.0;
    for neighbor in neighbors {
        let thickness = points[neighbor.index].thickness.unwrap_or(0.0);
        value += neighbor.weight * thickness;
    }
    value * scaling_factor
}
