//! Mapping parameters and configuration.

use crate::error::{MapError, MapResult};

/// Default per-run memory budget for section-local distance work: 2 GiB.
pub const DEFAULT_MEMORY_BUDGET_BYTES: usize = 2 * 1024 * 1024 * 1024;

/// Parameters for one imperfection mapping run.
///
/// The struct enumerates every recognized option; there is no dynamic
/// configuration surface. [`MappingParams::validate`] is called once at the
/// start of a run and rejects contradictory or out-of-range values, so the
/// pipeline itself never re-checks them.
///
/// Specimen options (`r_best_fit`, `h_measured`, `z_offset_bottom`,
/// `stretch_height`, `rotation_deg`, `radial_tolerance_pct`) reconcile the
/// measured specimen with the nominal model. Interpolation options
/// (`num_closest_points`, `power_parameter`, `num_sections`,
/// `scaling_factor`, `sample_size`, `seed`, `memory_budget_bytes`) control
/// the mapping itself.
///
/// # Example
///
/// ```
/// use imperfect_map::MappingParams;
///
/// let params = MappingParams::default()
///     .with_num_closest_points(3)
///     .with_power_parameter(2.0)
///     .with_scaling_factor(1.5);
///
/// assert!(params.validate().is_ok());
/// assert_eq!(params.num_closest_points, 3);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct MappingParams {
    /// Best-fit radius of the measured cloud. Defaults to the cloud's mean
    /// radial distance when `None`.
    pub r_best_fit: Option<f64>,

    /// Height of the measured specimen. Defaults to the cloud's axial
    /// extent when `None`.
    pub h_measured: Option<f64>,

    /// Explicit z offset between the specimen's bottom edge and the cloud's
    /// lowest sample. When `None` and `stretch_height` is off, a centering
    /// offset `(h_measured - extent) / 2` is used.
    pub z_offset_bottom: Option<f64>,

    /// Linearly rescale the measured z span so it covers exactly
    /// `[0, h_model]`. Overrides any z offset.
    pub stretch_height: bool,

    /// Angular offset of the specimen relative to the model, in degrees.
    /// The normalizer rotates the measured points back by this amount.
    pub rotation_deg: f64,

    /// Radial outlier tolerance in percent: samples whose radius falls
    /// outside `r_best_fit * (1 ± tol/100)` are dropped.
    pub radial_tolerance_pct: f64,

    /// Number of nearest measured points used per target point.
    pub num_closest_points: usize,

    /// Inverse-distance weighting exponent.
    pub power_parameter: f64,

    /// Requested number of axial sections. Raised automatically when the
    /// per-section memory budget would be exceeded.
    pub num_sections: usize,

    /// Amplitude multiplier applied to the synthesized field.
    pub scaling_factor: f64,

    /// Optional cap on the number of measured points actually used. When
    /// the cloud is larger, a uniform random subset of this size is drawn.
    pub sample_size: Option<usize>,

    /// Seed for the subsampling RNG. Runs with identical inputs and seed
    /// are bit-identical.
    pub seed: u64,

    /// Memory budget for the worst-case per-section distance work,
    /// `section_size^2 * 8` bytes.
    pub memory_budget_bytes: usize,
}

impl Default for MappingParams {
    fn default() -> Self {
        Self {
            r_best_fit: None,
            h_measured: None,
            z_offset_bottom: None,
            stretch_height: false,
            rotation_deg: 0.0,
            radial_tolerance_pct: 1.0,
            num_closest_points: 5,
            power_parameter: 2.0,
            num_sections: 10,
            scaling_factor: 1.0,
            sample_size: None,
            seed: 0,
            memory_budget_bytes: DEFAULT_MEMORY_BUDGET_BYTES,
        }
    }
}

impl MappingParams {
    /// Creates parameters with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the best-fit radius of the measured cloud.
    #[must_use]
    pub const fn with_r_best_fit(mut self, r: f64) -> Self {
        self.r_best_fit = Some(r);
        self
    }

    /// Sets the measured specimen height.
    #[must_use]
    pub const fn with_h_measured(mut self, h: f64) -> Self {
        self.h_measured = Some(h);
        self
    }

    /// Sets an explicit bottom z offset.
    #[must_use]
    pub const fn with_z_offset_bottom(mut self, offset: f64) -> Self {
        self.z_offset_bottom = Some(offset);
        self
    }

    /// Enables or disables height stretching.
    #[must_use]
    pub const fn with_stretch_height(mut self, stretch: bool) -> Self {
        self.stretch_height = stretch;
        self
    }

    /// Sets the specimen rotation in degrees.
    #[must_use]
    pub const fn with_rotation_deg(mut self, deg: f64) -> Self {
        self.rotation_deg = deg;
        self
    }

    /// Sets the radial outlier tolerance in percent.
    #[must_use]
    pub const fn with_radial_tolerance_pct(mut self, pct: f64) -> Self {
        self.radial_tolerance_pct = pct;
        self
    }

    /// Sets the number of nearest points per target.
    #[must_use]
    pub const fn with_num_closest_points(mut self, ncp: usize) -> Self {
        self.num_closest_points = ncp;
        self
    }

    /// Sets the inverse-distance weighting exponent.
    #[must_use]
    pub const fn with_power_parameter(mut self, power: f64) -> Self {
        self.power_parameter = power;
        self
    }

    /// Sets the requested number of axial sections.
    #[must_use]
    pub const fn with_num_sections(mut self, sections: usize) -> Self {
        self.num_sections = sections;
        self
    }

    /// Sets the amplitude multiplier.
    #[must_use]
    pub const fn with_scaling_factor(mut self, factor: f64) -> Self {
        self.scaling_factor = factor;
        self
    }

    /// Caps the number of measured points actually used.
    #[must_use]
    pub const fn with_sample_size(mut self, size: usize) -> Self {
        self.sample_size = Some(size);
        self
    }

    /// Sets the subsampling seed.
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Sets the per-section memory budget in bytes.
    #[must_use]
    pub const fn with_memory_budget_bytes(mut self, bytes: usize) -> Self {
        self.memory_budget_bytes = bytes;
        self
    }

    /// Validates the parameter set.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::InvalidParams`] when an option is out of range or
    /// the combination is contradictory.
    pub fn validate(&self) -> MapResult<()> {
        if self.num_closest_points < 1 {
            return Err(MapError::invalid_params("num_closest_points must be >= 1"));
        }
        if self.power_parameter <= 0.0 || !self.power_parameter.is_finite() {
            return Err(MapError::invalid_params(
                "power_parameter must be finite and > 0",
            ));
        }
        if self.num_sections < 1 {
            return Err(MapError::invalid_params("num_sections must be >= 1"));
        }
        if self.radial_tolerance_pct < 0.0 {
            return Err(MapError::invalid_params("radial_tolerance_pct must be >= 0"));
        }
        if !self.scaling_factor.is_finite() {
            return Err(MapError::invalid_params("scaling_factor must be finite"));
        }
        if let Some(r) = self.r_best_fit {
            if r <= 0.0 || !r.is_finite() {
                return Err(MapError::invalid_params("r_best_fit must be > 0"));
            }
        }
        if let Some(h) = self.h_measured {
            if h <= 0.0 || !h.is_finite() {
                return Err(MapError::invalid_params("h_measured must be > 0"));
            }
        }
        if self.stretch_height && self.z_offset_bottom.is_some() {
            return Err(MapError::invalid_params(
                "z_offset_bottom has no effect when stretch_height is set",
            ));
        }
        if self.sample_size == Some(0) {
            return Err(MapError::invalid_params("sample_size must be >= 1"));
        }
        if self.memory_budget_bytes < 8 {
            return Err(MapError::invalid_params(
                "memory_budget_bytes must fit at least one distance entry",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_default_params_valid() {
        let params = MappingParams::default();
        assert!(params.validate().is_ok());
        assert_eq!(params.num_closest_points, 5);
        assert_eq!(params.num_sections, 10);
        assert_eq!(params.memory_budget_bytes, DEFAULT_MEMORY_BUDGET_BYTES);
    }

    #[test]
    fn test_builder_chain() {
        let params = MappingParams::new()
            .with_r_best_fit(249.5)
            .with_h_measured(505.0)
            .with_rotation_deg(90.0)
            .with_num_closest_points(1)
            .with_sample_size(10_000)
            .with_seed(42);

        assert!(params.validate().is_ok());
        assert_eq!(params.r_best_fit, Some(249.5));
        assert_eq!(params.sample_size, Some(10_000));
        assert_eq!(params.seed, 42);
    }

    #[test]
    fn test_rejects_zero_closest_points() {
        let params = MappingParams::default().with_num_closest_points(0);
        assert!(matches!(
            params.validate(),
            Err(MapError::InvalidParams(_))
        ));
    }

    #[test]
    fn test_rejects_nonpositive_power() {
        let params = MappingParams::default().with_power_parameter(0.0);
        assert!(params.validate().is_err());

        let params = MappingParams::default().with_power_parameter(f64::NAN);
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_rejects_negative_tolerance() {
        let params = MappingParams::default().with_radial_tolerance_pct(-1.0);
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_rejects_stretch_with_offset() {
        let params = MappingParams::default()
            .with_stretch_height(true)
            .with_z_offset_bottom(5.0);
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_rejects_zero_sections() {
        let params = MappingParams::default().with_num_sections(0);
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_rejects_zero_sample_size() {
        let params = MappingParams::default().with_sample_size(0);
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_rejects_bad_specimen_dimensions() {
        assert!(MappingParams::default()
            .with_r_best_fit(0.0)
            .validate()
            .is_err());
        assert!(MappingParams::default()
            .with_h_measured(-1.0)
            .validate()
            .is_err());
    }
}
