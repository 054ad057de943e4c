//! Measurement sample types.

use nalgebra::Point3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A single physically measured sample of a shell specimen.
///
/// Mid-surface campaigns produce bare positions; wall-thickness campaigns
/// attach a thickness value to each sample. Points are immutable once
/// loaded: the pipeline only ever reads them.
///
/// # Example
///
/// ```
/// use imperfect_types::MeasuredPoint;
/// use nalgebra::Point3;
///
/// let p = MeasuredPoint::new(Point3::new(3.0, 4.0, 10.0));
/// assert!((p.radius() - 5.0).abs() < 1e-12);
/// assert!(p.thickness.is_none());
///
/// let t = MeasuredPoint::with_thickness(Point3::new(3.0, 4.0, 10.0), 0.72);
/// assert!(t.thickness.is_some());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MeasuredPoint {
    /// The 3D position of the sample.
    pub position: Point3<f64>,

    /// Optional measured wall thickness at this sample.
    pub thickness: Option<f64>,
}

impl MeasuredPoint {
    /// Creates a new sample with just a position.
    #[must_use]
    pub const fn new(position: Point3<f64>) -> Self {
        Self {
            position,
            thickness: None,
        }
    }

    /// Creates a sample from x, y, z coordinates.
    ///
    /// # Example
    ///
    /// ```
    /// use imperfect_types::MeasuredPoint;
    ///
    /// let p = MeasuredPoint::from_coords(1.0, 2.0, 3.0);
    /// assert_eq!(p.position.z, 3.0);
    /// ```
    #[must_use]
    pub const fn from_coords(x: f64, y: f64, z: f64) -> Self {
        Self::new(Point3::new(x, y, z))
    }

    /// Creates a sample carrying a wall-thickness value.
    #[must_use]
    pub const fn with_thickness(position: Point3<f64>, thickness: f64) -> Self {
        Self {
            position,
            thickness: Some(thickness),
        }
    }

    /// Radial distance of the sample from the shell axis.
    #[must_use]
    pub fn radius(&self) -> f64 {
        self.position.x.hypot(self.position.y)
    }

    /// Angular coordinate of the sample around the shell axis, in radians.
    ///
    /// Measured counter-clockwise from the +x axis, in `(-π, π]`.
    #[must_use]
    pub fn theta(&self) -> f64 {
        self.position.y.atan2(self.position.x)
    }

    /// Returns true if this sample carries a thickness value.
    #[must_use]
    pub const fn has_thickness(&self) -> bool {
        self.thickness.is_some()
    }
}

/// An unordered cloud of measurement samples.
///
/// Clouds come from laser scans or coordinate measurement machines and are
/// irregular: neither ordered nor gridded. The mapping pipeline reads the
/// cloud, normalizes a copy of it, and never mutates the original.
///
/// # Example
///
/// ```
/// use imperfect_types::MeasuredCloud;
///
/// let mut cloud = MeasuredCloud::new();
/// cloud.push_coords(250.0, 0.0, 0.0);
/// cloud.push_coords(0.0, 250.0, 500.0);
///
/// assert_eq!(cloud.len(), 2);
/// assert!((cloud.axial_extent().unwrap() - 500.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MeasuredCloud {
    /// The samples in this cloud.
    pub points: Vec<MeasuredPoint>,
}

impl MeasuredCloud {
    /// Creates an empty cloud.
    #[must_use]
    pub const fn new() -> Self {
        Self { points: Vec::new() }
    }

    /// Creates a cloud with pre-allocated capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            points: Vec::with_capacity(capacity),
        }
    }

    /// Creates a cloud from a slice of 3D positions.
    #[must_use]
    pub fn from_positions(positions: &[Point3<f64>]) -> Self {
        let points = positions.iter().map(|p| MeasuredPoint::new(*p)).collect();
        Self { points }
    }

    /// Returns the number of samples in the cloud.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns true if the cloud has no samples.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Adds a sample to the cloud.
    pub fn push(&mut self, point: MeasuredPoint) {
        self.points.push(point);
    }

    /// Adds a sample with the given coordinates.
    pub fn push_coords(&mut self, x: f64, y: f64, z: f64) {
        self.points.push(MeasuredPoint::from_coords(x, y, z));
    }

    /// Returns true if every sample carries a thickness value.
    ///
    /// An empty cloud has no thickness data.
    #[must_use]
    pub fn has_thickness(&self) -> bool {
        !self.points.is_empty() && self.points.iter().all(MeasuredPoint::has_thickness)
    }

    /// Smallest z coordinate in the cloud, or `None` if empty.
    #[must_use]
    pub fn z_min(&self) -> Option<f64> {
        self.points
            .iter()
            .map(|p| p.position.z)
            .min_by(f64::total_cmp)
    }

    /// Largest z coordinate in the cloud, or `None` if empty.
    #[must_use]
    pub fn z_max(&self) -> Option<f64> {
        self.points
            .iter()
            .map(|p| p.position.z)
            .max_by(f64::total_cmp)
    }

    /// Axial extent `z_max - z_min` of the cloud, or `None` if empty.
    #[must_use]
    pub fn axial_extent(&self) -> Option<f64> {
        match (self.z_min(), self.z_max()) {
            (Some(lo), Some(hi)) => Some(hi - lo),
            _ => None,
        }
    }

    /// Mean radial distance of the samples from the shell axis.
    ///
    /// This is the default best-fit radius when the measurement campaign
    /// does not report one. Returns `None` for an empty cloud.
    #[must_use]
    pub fn mean_radius(&self) -> Option<f64> {
        if self.points.is_empty() {
            return None;
        }
        let sum: f64 = self.points.iter().map(MeasuredPoint::radius).sum();
        #[allow(clippy::cast_precision_loss)]
        Some(sum / self.points.len() as f64)
    }
}

impl FromIterator<MeasuredPoint> for MeasuredCloud {
    fn from_iter<I: IntoIterator<Item = MeasuredPoint>>(iter: I) -> Self {
        Self {
            points: iter.into_iter().collect(),
        }
    }
}

impl FromIterator<Point3<f64>> for MeasuredCloud {
    fn from_iter<I: IntoIterator<Item = Point3<f64>>>(iter: I) -> Self {
        Self {
            points: iter.into_iter().map(MeasuredPoint::new).collect(),
        }
    }
}
