//! The mapping pipeline: normalize, section, interpolate, synthesize,
//! assemble.
//!
//! Both entry points run the same sequence and differ only in the synthesis
//! step. The whole pipeline is single-threaded and runs to completion or
//! returns an error; inputs are never mutated, and the output map is built
//! fresh per run.

use imperfect_types::{MeasuredCloud, ShellGeometry, TargetPoint};
use nalgebra::Vector3;
use tracing::{debug, info};

use crate::error::{MapError, MapResult};
use crate::interpolate::inverse_distance_weights;
use crate::normalize::{normalize_cloud, NormalizeOutput, NormalizedPoint};
use crate::params::MappingParams;
use crate::result::{
    assemble, MappingStats, MidSurfaceField, MidSurfaceOutput, ThicknessField, ThicknessOutput,
};
use crate::section::{build_sections, plan_sections, BinSection, SectionPlan};
use crate::synthesize::{mid_surface_translation, thickness_value};

/// Maps a measured mid-surface cloud onto the target points.
///
/// Produces one translation vector per target node, keyed by the node's
/// stable id, ready to hand to the engine adapter.
///
/// # Errors
///
/// Any [`MapError`]; all failures abort the run without partial output.
///
/// # Example
///
/// ```
/// use imperfect_map::{map_mid_surface, MappingParams};
/// use imperfect_types::{MeasuredCloud, ShellGeometry, TargetPoint};
///
/// // A cylinder measured slightly oversize on one side
/// let mut cloud = MeasuredCloud::new();
/// cloud.push_coords(102.0, 0.0, 0.0);
/// cloud.push_coords(0.0, 100.0, 0.0);
/// cloud.push_coords(102.0, 0.0, 100.0);
/// cloud.push_coords(0.0, 100.0, 100.0);
///
/// let targets = vec![TargetPoint::from_coords(100.0, 0.0, 50.0, 1)];
/// let geometry = ShellGeometry::cylinder(100.0, 100.0);
/// let params = MappingParams::default()
///     .with_r_best_fit(100.0)
///     .with_radial_tolerance_pct(5.0)
///     .with_num_closest_points(1);
///
/// let output = map_mid_surface(&cloud, &targets, &geometry, &params).unwrap();
/// assert_eq!(output.field.len(), 1);
/// ```
pub fn map_mid_surface(
    cloud: &MeasuredCloud,
    targets: &[TargetPoint],
    geometry: &ShellGeometry,
    params: &MappingParams,
) -> MapResult<MidSurfaceOutput> {
    let run = MappingRun::prepare(cloud, targets, geometry, params)?;

    let Some(run) = run else {
        return Ok(MidSurfaceOutput {
            field: MidSurfaceField::default(),
            stats: MappingStats::default(),
        });
    };

    let mut pairs: Vec<(u64, Vector3<f64>)> = Vec::with_capacity(targets.len());
    run.for_each_target(params, |target, neighbors, section_points| {
        let translation = mid_surface_translation(
            target,
            neighbors,
            section_points,
            geometry,
            params.scaling_factor,
        );
        pairs.push((target.id, translation));
    });

    let translations = assemble(pairs, targets.len())?;
    debug!(entries = translations.len(), "assembled mid-surface field");

    Ok(MidSurfaceOutput {
        field: MidSurfaceField { translations },
        stats: run.stats,
    })
}

/// Maps a measured thickness cloud onto the target points.
///
/// Produces one thickness value per target element, keyed by the element's
/// stable id.
///
/// # Errors
///
/// [`MapError::InvalidParams`] when the cloud carries no thickness data,
/// otherwise any [`MapError`].
pub fn map_thickness(
    cloud: &MeasuredCloud,
    targets: &[TargetPoint],
    geometry: &ShellGeometry,
    params: &MappingParams,
) -> MapResult<ThicknessOutput> {
    if !cloud.is_empty() && !cloud.has_thickness() {
        return Err(MapError::invalid_params(
            "thickness mapping requires a measurement file with a thickness column",
        ));
    }

    let run = MappingRun::prepare(cloud, targets, geometry, params)?;

    let Some(run) = run else {
        return Ok(ThicknessOutput {
            field: ThicknessField::default(),
            stats: MappingStats::default(),
        });
    };

    let mut pairs: Vec<(u64, f64)> = Vec::with_capacity(targets.len());
    run.for_each_target(params, |target, neighbors, section_points| {
        let thickness = thickness_value(neighbors, section_points, params.scaling_factor);
        pairs.push((target.id, thickness));
    });

    let thicknesses = assemble(pairs, targets.len())?;
    debug!(entries = thicknesses.len(), "assembled thickness field");

    Ok(ThicknessOutput {
        field: ThicknessField { thicknesses },
        stats: run.stats,
    })
}

/// Shared pipeline state once normalization and sectioning are done.
struct MappingRun<'a> {
    /// Normalized measured points sorted ascending by z.
    measured: Vec<NormalizedPoint>,
    /// Targets in z-sorted order.
    targets: Vec<&'a TargetPoint>,
    sections: Vec<BinSection>,
    stats: MappingStats,
}

impl<'a> MappingRun<'a> {
    /// Validates, normalizes, sorts, and sections. Returns `None` for the
    /// trivial zero-target run.
    fn prepare(
        cloud: &MeasuredCloud,
        targets: &'a [TargetPoint],
        geometry: &ShellGeometry,
        params: &MappingParams,
    ) -> MapResult<Option<Self>> {
        params.validate()?;
        check_geometry(geometry)?;

        if targets.is_empty() {
            return Ok(None);
        }

        info!(
            measured = cloud.len(),
            targets = targets.len(),
            r_model = geometry.r_model,
            h_model = geometry.h_model,
            "starting imperfection mapping"
        );

        let NormalizeOutput {
            mut points,
            dropped_outliers,
            subsampled,
            ..
        } = normalize_cloud(cloud, geometry, params)?;

        points.sort_unstable_by(|a, b| a.position.z.total_cmp(&b.position.z));
        let measured_z: Vec<f64> = points.iter().map(|p| p.position.z).collect();

        let mut sorted_targets: Vec<&TargetPoint> = targets.iter().collect();
        sorted_targets.sort_by(|a, b| {
            a.position
                .z
                .total_cmp(&b.position.z)
                .then(a.id.cmp(&b.id))
        });
        let target_z: Vec<f64> = sorted_targets.iter().map(|t| t.position.z).collect();

        let plan: SectionPlan =
            plan_sections(targets.len(), params.num_sections, params.memory_budget_bytes);
        let sections = build_sections(&measured_z, &target_z, &plan, geometry.h_model)?;

        let stats = MappingStats {
            measured_points: points.len(),
            dropped_outliers,
            subsampled,
            num_sections: sections.len(),
            sections_adjusted: plan.adjusted,
        };

        Ok(Some(Self {
            measured: points,
            targets: sorted_targets,
            sections,
            stats,
        }))
    }

    /// Runs the per-target neighbour search section by section.
    fn for_each_target<F>(&self, params: &MappingParams, mut visit: F)
    where
        F: FnMut(&TargetPoint, &[crate::interpolate::WeightedNeighbor], &[NormalizedPoint]),
    {
        for section in &self.sections {
            let section_points = &self.measured[section.measured.clone()];
            for &target in &self.targets[section.targets.clone()] {
                let neighbors = inverse_distance_weights(
                    &target.position,
                    section_points,
                    params.num_closest_points,
                    params.power_parameter,
                );
                visit(target, &neighbors, section_points);
            }
        }
    }
}

fn check_geometry(geometry: &ShellGeometry) -> MapResult<()> {
    if geometry.r_model <= 0.0 || !geometry.r_model.is_finite() {
        return Err(MapError::invalid_params("r_model must be > 0"));
    }
    if geometry.h_model <= 0.0 || !geometry.h_model.is_finite() {
        return Err(MapError::invalid_params("h_model must be > 0"));
    }
    if geometry.r_top() <= 0.0 {
        return Err(MapError::invalid_params(
            "semi_angle closes the cone below the model height",
        ));
    }
    Ok(())
}
