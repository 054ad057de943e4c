//! Normalization of measured clouds onto the nominal model's scale.
//!
//! Measured specimens never match the nominal model exactly: the specimen
//! is smaller or larger, mounted with an angular offset, and scanned over a
//! z range that does not start at the model's bottom edge. Normalization
//! makes the two coordinate systems commensurable:
//!
//! 1. establish the best-fit radius and measured height (defaulting and
//!    logging when the campaign did not report them),
//! 2. rotate the angular coordinate back by the specimen's mounting offset,
//! 3. drop radial outliers outside the configured tolerance band,
//! 4. map z onto `[0, h_model]` (centered, explicitly offset, or stretched),
//! 5. rescale the radius by `r_model / r_best_fit` so coordinates live at
//!    the nominal model's physical scale,
//! 6. optionally subsample to a fixed size with a seeded RNG.
//!
//! Dropped outliers and defaulted dimensions are non-fatal and reported via
//! `tracing` and [`NormalizeOutput`].

use imperfect_types::{MeasuredCloud, ShellGeometry};
use nalgebra::Point3;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info, warn};

use crate::error::{MapError, MapResult};
use crate::params::MappingParams;

/// A measured sample expressed in the nominal model's coordinate system.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizedPoint {
    /// Position at the nominal model's physical scale.
    pub position: Point3<f64>,

    /// Measured wall thickness carried through unchanged.
    pub thickness: Option<f64>,
}

/// A normalized cloud plus the reconciliation values actually used.
#[derive(Debug, Clone)]
pub struct NormalizeOutput {
    /// The normalized samples.
    pub points: Vec<NormalizedPoint>,

    /// Best-fit radius used (supplied or defaulted to the mean radius).
    pub r_best_fit: f64,

    /// Measured height used (supplied or defaulted to the axial extent).
    pub h_measured: f64,

    /// Number of samples dropped by the radial outlier filter.
    pub dropped_outliers: usize,

    /// Subset size when the cloud was subsampled, `None` otherwise.
    pub subsampled: Option<usize>,
}

/// Normalizes a measured cloud onto the nominal model's coordinate system.
///
/// # Errors
///
/// - [`MapError::EmptyCloud`] when the cloud is empty or the outlier filter
///   drops every sample.
/// - [`MapError::DegenerateCloud`] when the cloud spans a single z value
///   and no `h_measured` was supplied, or the best-fit radius degenerates
///   to zero.
///
/// # Example
///
/// ```
/// use imperfect_map::normalize::normalize_cloud;
/// use imperfect_map::MappingParams;
/// use imperfect_types::{MeasuredCloud, ShellGeometry};
///
/// let mut cloud = MeasuredCloud::new();
/// cloud.push_coords(100.5, 0.0, 0.0);
/// cloud.push_coords(0.0, 99.5, 100.0);
///
/// let geometry = ShellGeometry::cylinder(100.0, 100.0);
/// let output = normalize_cloud(&cloud, &geometry, &MappingParams::default()).unwrap();
///
/// assert_eq!(output.points.len(), 2);
/// assert!((output.r_best_fit - 100.0).abs() < 1e-9);
/// ```
pub fn normalize_cloud(
    cloud: &MeasuredCloud,
    geometry: &ShellGeometry,
    params: &MappingParams,
) -> MapResult<NormalizeOutput> {
    if cloud.is_empty() {
        return Err(MapError::EmptyCloud);
    }

    let r_best_fit = match params.r_best_fit {
        Some(r) => r,
        None => {
            // Empty case handled above, so mean_radius is present
            let mean = cloud.mean_radius().unwrap_or(0.0);
            debug!(r_best_fit = mean, "defaulting r_best_fit to mean radius");
            mean
        }
    };
    if r_best_fit <= 0.0 {
        return Err(MapError::degenerate_cloud(
            "best-fit radius is zero; measured cloud collapses onto the axis",
        ));
    }

    // z_min/z_max exist for a non-empty cloud
    let z_min = cloud.z_min().unwrap_or(0.0);
    let z_max = cloud.z_max().unwrap_or(0.0);
    let h_points = z_max - z_min;

    let h_measured = match params.h_measured {
        Some(h) => h,
        None => {
            if h_points <= 0.0 {
                return Err(MapError::degenerate_cloud(
                    "measured cloud spans a single z value and no h_measured was supplied",
                ));
            }
            debug!(h_measured = h_points, "defaulting h_measured to axial extent");
            h_points
        }
    };

    if params.stretch_height && h_points <= 0.0 {
        return Err(MapError::degenerate_cloud(
            "cannot stretch a cloud that spans a single z value",
        ));
    }

    // Centering offset unless explicitly overridden; zero when stretching.
    let z_offset = if params.stretch_height {
        0.0
    } else {
        params
            .z_offset_bottom
            .unwrap_or((h_measured - h_points) / 2.0)
    };

    let rotation = params.rotation_deg.to_radians();
    let r_lo = r_best_fit * (1.0 - params.radial_tolerance_pct / 100.0);
    let r_hi = r_best_fit * (1.0 + params.radial_tolerance_pct / 100.0);
    let radial_scale = geometry.r_model / r_best_fit;

    let mut points = Vec::with_capacity(cloud.len());
    let mut dropped = 0_usize;

    for sample in &cloud.points {
        let r = sample.radius();
        if r < r_lo || r > r_hi {
            dropped += 1;
            continue;
        }

        // Rotate the specimen back into the model's angular frame
        let theta = sample.theta() - rotation;

        let z = if params.stretch_height {
            (sample.position.z - z_min) / h_points * geometry.h_model
        } else {
            (sample.position.z - z_min + z_offset) * geometry.h_model / h_measured
        };

        let r_scaled = r * radial_scale;
        points.push(NormalizedPoint {
            position: Point3::new(r_scaled * theta.cos(), r_scaled * theta.sin(), z),
            thickness: sample.thickness,
        });
    }

    if dropped > 0 {
        warn!(
            dropped,
            total = cloud.len(),
            tolerance_pct = params.radial_tolerance_pct,
            "dropped radial outliers"
        );
    }

    if points.is_empty() {
        return Err(MapError::EmptyCloud);
    }

    let subsampled = subsample(&mut points, params);

    info!(
        points = points.len(),
        dropped_outliers = dropped,
        r_best_fit,
        h_measured,
        "normalized measured cloud"
    );

    Ok(NormalizeOutput {
        points,
        r_best_fit,
        h_measured,
        dropped_outliers: dropped,
        subsampled,
    })
}

/// Draws a uniform random subset when the cloud exceeds `sample_size`.
///
/// The RNG is seeded from the parameters, so runs are reproducible; the
/// selected indices are re-sorted to keep the input order stable.
fn subsample(points: &mut Vec<NormalizedPoint>, params: &MappingParams) -> Option<usize> {
    let cap = params.sample_size?;
    if points.len() <= cap {
        return None;
    }

    let mut rng = StdRng::seed_from_u64(params.seed);
    let mut indices = rand::seq::index::sample(&mut rng, points.len(), cap).into_vec();
    indices.sort_unstable();

    let sampled: Vec<NormalizedPoint> = indices.iter().map(|&i| points[i]).collect();
    info!(
        from = points.len(),
        to = cap,
        seed = params.seed,
        "subsampled measured cloud"
    );
    *points = sampled;
    Some(cap)
}
