//! Nominal shell geometry and the local-radius function.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The nominal (designed) geometry of a conical or cylindrical shell.
///
/// The shell axis is z, with the bottom edge at `z = 0` and the top edge at
/// `z = h_model`. For a cone the radius varies linearly with z; a cylinder
/// is the `semi_angle = 0` special case with constant radius.
///
/// # Example
///
/// ```
/// use imperfect_types::ShellGeometry;
///
/// let cylinder = ShellGeometry::cylinder(250.0, 510.0);
/// assert!(cylinder.is_cylinder());
/// assert!((cylinder.local_radius(0.0) - 250.0).abs() < 1e-12);
/// assert!((cylinder.local_radius(510.0) - 250.0).abs() < 1e-12);
///
/// let cone = ShellGeometry::cone(400.0, 300.0, 35_f64.to_radians());
/// assert!(cone.local_radius(300.0) < cone.local_radius(0.0));
/// assert!((cone.local_radius(300.0) - cone.r_top()).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ShellGeometry {
    /// Nominal radius at the bottom edge (`z = 0`).
    pub r_model: f64,

    /// Nominal height of the shell along the z axis.
    pub h_model: f64,

    /// Semi-vertex angle of the cone, in radians. Zero for a cylinder.
    pub semi_angle: f64,
}

impl ShellGeometry {
    /// Creates a cylindrical shell geometry.
    #[must_use]
    pub const fn cylinder(r_model: f64, h_model: f64) -> Self {
        Self {
            r_model,
            h_model,
            semi_angle: 0.0,
        }
    }

    /// Creates a conical shell geometry.
    ///
    /// `semi_angle` is the cone's semi-vertex angle in radians; the radius
    /// shrinks with z at a rate of `tan(semi_angle)`.
    #[must_use]
    pub const fn cone(r_model: f64, h_model: f64, semi_angle: f64) -> Self {
        Self {
            r_model,
            h_model,
            semi_angle,
        }
    }

    /// Returns true if this geometry is a cylinder.
    #[must_use]
    pub fn is_cylinder(&self) -> bool {
        self.semi_angle == 0.0
    }

    /// Nominal radius at the top edge (`z = h_model`).
    #[must_use]
    pub fn r_top(&self) -> f64 {
        self.r_model - self.semi_angle.tan() * self.h_model
    }

    /// Nominal (undeformed) radius of the shell at axial position `z`.
    ///
    /// Linear in z for a cone, constant for a cylinder. The function
    /// extrapolates linearly outside `[0, h_model]`, which keeps boundary
    /// sections with slightly out-of-range target points well defined.
    #[must_use]
    pub fn local_radius(&self, z: f64) -> f64 {
        self.r_model + (self.r_top() - self.r_model) * z / self.h_model
    }
}
