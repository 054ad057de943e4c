//! Target point type for the nominal model.

use nalgebra::Point3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A node or element-centroid location of the nominal model.
///
/// Target points are owned by the external FE/CAD engine and handed to the
/// mapping pipeline as read-only input. The `id` is the engine's stable
/// integer identifier (node label or element label) and keys the output
/// field; it must be unique within one run.
///
/// # Example
///
/// ```
/// use imperfect_types::TargetPoint;
/// use nalgebra::Point3;
///
/// let node = TargetPoint::new(Point3::new(250.0, 0.0, 100.0), 17);
/// assert_eq!(node.id, 17);
/// assert!((node.radius() - 250.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TargetPoint {
    /// The 3D position of the target point.
    pub position: Point3<f64>,

    /// Stable engine-side identifier.
    pub id: u64,
}

impl TargetPoint {
    /// Creates a new target point.
    #[must_use]
    pub const fn new(position: Point3<f64>, id: u64) -> Self {
        Self { position, id }
    }

    /// Creates a target point from x, y, z coordinates and an id.
    #[must_use]
    pub const fn from_coords(x: f64, y: f64, z: f64, id: u64) -> Self {
        Self::new(Point3::new(x, y, z), id)
    }

    /// Radial distance of the target from the shell axis.
    #[must_use]
    pub fn radius(&self) -> f64 {
        self.position.x.hypot(self.position.y)
    }

    /// Angular coordinate of the target around the shell axis, in radians.
    #[must_use]
    pub fn theta(&self) -> f64 {
        self.position.y.atan2(self.position.x)
    }
}
