//! Bridging to the host analysis model.
//!
//! The pipeline itself never talks to a solver; it consumes target points
//! and produces id-keyed fields. [`MeshAdapter`] is the seam a host
//! implements to expose its node and element positions and to take the
//! finished fields back. The convenience drivers below run the whole
//! pipeline through an adapter in one call.

use imperfect_types::{MeasuredCloud, ShellGeometry, TargetPoint};

use crate::error::MapResult;
use crate::mapping::{map_mid_surface, map_thickness};
use crate::params::MappingParams;
use crate::result::{MappingStats, MidSurfaceField, ThicknessField};

/// A host model that can supply target points and absorb mapped fields.
///
/// `target_points` is called once per run; ids must be unique and stable so
/// the host can route each field entry back to its node or element.
pub trait MeshAdapter {
    /// Target points in the nominal model frame, one per node or element.
    fn target_points(&self) -> Vec<TargetPoint>;

    /// Applies a mapped mid-surface field to the host model.
    ///
    /// # Errors
    ///
    /// Host-side failures, surfaced unchanged by the drivers.
    fn apply_mid_surface(&mut self, field: &MidSurfaceField) -> MapResult<()>;

    /// Applies a mapped thickness field to the host model.
    ///
    /// # Errors
    ///
    /// Host-side failures, surfaced unchanged by the drivers.
    fn apply_thickness(&mut self, field: &ThicknessField) -> MapResult<()>;
}

/// Maps the cloud onto the adapter's nodes and applies the result.
///
/// # Errors
///
/// Any pipeline [`crate::MapError`], or whatever the adapter returns from
/// [`MeshAdapter::apply_mid_surface`].
pub fn apply_mid_surface_imperfection<A: MeshAdapter>(
    adapter: &mut A,
    cloud: &MeasuredCloud,
    geometry: &ShellGeometry,
    params: &MappingParams,
) -> MapResult<MappingStats> {
    let targets = adapter.target_points();
    let output = map_mid_surface(cloud, &targets, geometry, params)?;
    adapter.apply_mid_surface(&output.field)?;
    Ok(output.stats)
}

/// Maps the cloud onto the adapter's elements and applies the thickness.
///
/// # Errors
///
/// Any pipeline [`crate::MapError`], or whatever the adapter returns from
/// [`MeshAdapter::apply_thickness`].
pub fn apply_thickness_imperfection<A: MeshAdapter>(
    adapter: &mut A,
    cloud: &MeasuredCloud,
    geometry: &ShellGeometry,
    params: &MappingParams,
) -> MapResult<MappingStats> {
    let targets = adapter.target_points();
    let output = map_thickness(cloud, &targets, geometry, params)?;
    adapter.apply_thickness(&output.field)?;
    Ok(output.stats)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use imperfect_types::MeasuredPoint;
    use nalgebra::Point3;

    /// In-memory adapter that records what was applied to it.
    struct RecordingAdapter {
        targets: Vec<TargetPoint>,
        mid_surface: Option<MidSurfaceField>,
        thickness: Option<ThicknessField>,
    }

    impl RecordingAdapter {
        fn new(targets: Vec<TargetPoint>) -> Self {
            Self {
                targets,
                mid_surface: None,
                thickness: None,
            }
        }
    }

    impl MeshAdapter for RecordingAdapter {
        fn target_points(&self) -> Vec<TargetPoint> {
            self.targets.clone()
        }

        fn apply_mid_surface(&mut self, field: &MidSurfaceField) -> MapResult<()> {
            self.mid_surface = Some(field.clone());
            Ok(())
        }

        fn apply_thickness(&mut self, field: &ThicknessField) -> MapResult<()> {
            self.thickness = Some(field.clone());
            Ok(())
        }
    }

    fn ring_cloud(thickness: Option<f64>) -> MeasuredCloud {
        let mut cloud = MeasuredCloud::new();
        for &z in &[0.0, 100.0] {
            for i in 0..8 {
                let theta = 2.0 * std::f64::consts::PI * f64::from(i) / 8.0;
                let position = Point3::new(100.0 * theta.cos(), 100.0 * theta.sin(), z);
                cloud.push(match thickness {
                    Some(t) => MeasuredPoint::with_thickness(position, t),
                    None => MeasuredPoint::new(position),
                });
            }
        }
        cloud
    }

    fn params() -> MappingParams {
        MappingParams::default()
            .with_r_best_fit(100.0)
            .with_num_closest_points(1)
            .with_num_sections(2)
    }

    #[test]
    fn test_mid_surface_driver_applies_field() {
        let targets = vec![
            TargetPoint::from_coords(100.0, 0.0, 0.0, 1),
            TargetPoint::from_coords(0.0, 100.0, 100.0, 2),
        ];
        let mut adapter = RecordingAdapter::new(targets);
        let geometry = ShellGeometry::cylinder(100.0, 100.0);

        let stats = apply_mid_surface_imperfection(
            &mut adapter,
            &ring_cloud(None),
            &geometry,
            &params(),
        )
        .unwrap();

        assert_eq!(stats.measured_points, 16);
        let field = adapter.mid_surface.unwrap();
        assert_eq!(field.len(), 2);
        assert!(field.get(1).is_some());
        assert!(field.get(2).is_some());
    }

    #[test]
    fn test_thickness_driver_applies_field() {
        let targets = vec![TargetPoint::from_coords(100.0, 0.0, 50.0, 7)];
        let mut adapter = RecordingAdapter::new(targets);
        let geometry = ShellGeometry::cylinder(100.0, 100.0);

        apply_thickness_imperfection(
            &mut adapter,
            &ring_cloud(Some(1.5)),
            &geometry,
            &params(),
        )
        .unwrap();

        let field = adapter.thickness.unwrap();
        assert_eq!(field.get(7), Some(1.5));
    }

    #[test]
    fn test_driver_surfaces_pipeline_errors() {
        let targets = vec![TargetPoint::from_coords(100.0, 0.0, 50.0, 1)];
        let mut adapter = RecordingAdapter::new(targets);
        let geometry = ShellGeometry::cylinder(100.0, 100.0);

        let result = apply_mid_surface_imperfection(
            &mut adapter,
            &MeasuredCloud::new(),
            &geometry,
            &params(),
        );
        assert!(result.is_err());
        assert!(adapter.mid_surface.is_none());
    }
}
