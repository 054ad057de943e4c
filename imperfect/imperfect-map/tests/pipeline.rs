//! End-to-end tests of the imperfection mapping pipeline.
//!
//! Each test builds a synthetic specimen with a known deviation pattern,
//! runs the full pipeline, and checks the mapped field against the pattern.

#![allow(clippy::unwrap_used)]

use approx::assert_relative_eq;
use imperfect_map::{
    map_mid_surface, map_thickness, parse_measurements, MappingParams, MeasurementFormat,
};
use imperfect_types::{MeasuredCloud, MeasuredPoint, Point3, ShellGeometry, TargetPoint};

const TAU: f64 = 2.0 * std::f64::consts::PI;

/// Cylinder R=100, H=100, three rings of 36 samples whose radius deviates
/// by `amplitude * sin(theta)`.
fn sine_cloud(amplitude: f64) -> MeasuredCloud {
    let mut cloud = MeasuredCloud::new();
    for &z in &[0.0, 50.0, 100.0] {
        for i in 0..36 {
            let theta = TAU * f64::from(i) / 36.0;
            let r = 100.0 + amplitude * theta.sin();
            cloud.push_coords(r * theta.cos(), r * theta.sin(), z);
        }
    }
    cloud
}

/// Four targets per ring at theta = 0, 90, 180, 270 degrees.
fn quadrant_targets() -> Vec<TargetPoint> {
    let mut targets = Vec::new();
    let mut id = 1;
    for &z in &[0.0, 50.0, 100.0] {
        for i in 0..4 {
            let theta = TAU * f64::from(i) / 4.0;
            targets.push(TargetPoint::from_coords(
                100.0 * theta.cos(),
                100.0 * theta.sin(),
                z,
                id,
            ));
            id += 1;
        }
    }
    targets
}

fn base_params() -> MappingParams {
    MappingParams::default()
        .with_r_best_fit(100.0)
        .with_radial_tolerance_pct(10.0)
        .with_num_closest_points(1)
        .with_num_sections(3)
}

#[test]
fn test_sine_imperfection_maps_onto_quadrant_nodes() {
    let cloud = sine_cloud(5.0);
    let targets = quadrant_targets();
    let geometry = ShellGeometry::cylinder(100.0, 100.0);

    let output = map_mid_surface(&cloud, &targets, &geometry, &base_params()).unwrap();
    assert_eq!(output.field.len(), 12);

    for target in &targets {
        let t = output.field.get(target.id).unwrap();
        let theta = target.theta();
        // Radial component of the translation at the target's angle
        let radial = t.x * theta.cos() + t.y * theta.sin();
        assert_relative_eq!(radial, 5.0 * theta.sin(), epsilon = 1e-9);
        assert_relative_eq!(t.z, 0.0, epsilon = 1e-12);
    }
}

#[test]
fn test_perfect_cylinder_maps_to_zero_with_many_neighbors() {
    let cloud = sine_cloud(0.0);
    let targets = quadrant_targets();
    let geometry = ShellGeometry::cylinder(100.0, 100.0);
    let params = base_params().with_num_closest_points(5);

    let output = map_mid_surface(&cloud, &targets, &geometry, &params).unwrap();
    assert!(output.field.max_amplitude() < 1e-9);
}

#[test]
fn test_scaling_factor_scales_the_whole_field() {
    let cloud = sine_cloud(5.0);
    let targets = quadrant_targets();
    let geometry = ShellGeometry::cylinder(100.0, 100.0);

    let unit = map_mid_surface(&cloud, &targets, &geometry, &base_params()).unwrap();
    let doubled = map_mid_surface(
        &cloud,
        &targets,
        &geometry,
        &base_params().with_scaling_factor(2.0),
    )
    .unwrap();

    for target in &targets {
        let a = unit.field.get(target.id).unwrap();
        let b = doubled.field.get(target.id).unwrap();
        assert_relative_eq!(b.x, 2.0 * a.x, epsilon = 1e-9);
        assert_relative_eq!(b.y, 2.0 * a.y, epsilon = 1e-9);
        assert_relative_eq!(b.z, 2.0 * a.z, epsilon = 1e-9);
    }
}

#[test]
fn test_rotated_specimen_with_matching_rotation_param() {
    let targets = quadrant_targets();
    let geometry = ShellGeometry::cylinder(100.0, 100.0);

    let reference = map_mid_surface(&sine_cloud(5.0), &targets, &geometry, &base_params()).unwrap();

    // The same specimen scanned 30 degrees off; rotation_deg takes it back
    let offset = 30_f64.to_radians();
    let mut rotated = MeasuredCloud::new();
    for point in &sine_cloud(5.0).points {
        let r = point.position.x.hypot(point.position.y);
        let theta = point.position.y.atan2(point.position.x) + offset;
        rotated.push_coords(r * theta.cos(), r * theta.sin(), point.position.z);
    }

    let output = map_mid_surface(
        &rotated,
        &targets,
        &geometry,
        &base_params().with_rotation_deg(30.0),
    )
    .unwrap();

    for target in &targets {
        let a = reference.field.get(target.id).unwrap();
        let b = output.field.get(target.id).unwrap();
        assert_relative_eq!(a.x, b.x, epsilon = 1e-9);
        assert_relative_eq!(a.y, b.y, epsilon = 1e-9);
        assert_relative_eq!(a.z, b.z, epsilon = 1e-9);
    }
}

#[test]
fn test_tight_memory_budget_gives_same_field() {
    let cloud = sine_cloud(5.0);
    let targets = quadrant_targets();
    let geometry = ShellGeometry::cylinder(100.0, 100.0);

    let roomy = map_mid_surface(&cloud, &targets, &geometry, &base_params()).unwrap();
    assert!(!roomy.stats.sections_adjusted);

    // 32 bytes: at most 2 targets per section
    let tight = map_mid_surface(
        &cloud,
        &targets,
        &geometry,
        &base_params().with_memory_budget_bytes(32),
    )
    .unwrap();

    assert!(tight.stats.sections_adjusted);
    assert!(tight.stats.num_sections > roomy.stats.num_sections);
    assert_eq!(tight.field.len(), targets.len());

    // Sectioning is an implementation budget, not a semantic knob: the
    // nearest neighbour of every quadrant node lives on its own ring, so
    // the field must come out identical.
    for target in &targets {
        let a = roomy.field.get(target.id).unwrap();
        let b = tight.field.get(target.id).unwrap();
        assert_relative_eq!(a.x, b.x, epsilon = 1e-12);
        assert_relative_eq!(a.y, b.y, epsilon = 1e-12);
    }
}

#[test]
fn test_subsampling_is_deterministic_per_seed() {
    let cloud = sine_cloud(5.0);
    let targets = quadrant_targets();
    let geometry = ShellGeometry::cylinder(100.0, 100.0);
    let params = base_params().with_sample_size(40).with_seed(7);

    let first = map_mid_surface(&cloud, &targets, &geometry, &params).unwrap();
    let second = map_mid_surface(&cloud, &targets, &geometry, &params).unwrap();

    assert_eq!(first.stats.subsampled, Some(40));
    for target in &targets {
        // Bit-identical, not merely close
        assert_eq!(
            first.field.get(target.id).unwrap(),
            second.field.get(target.id).unwrap()
        );
    }

    // A different seed draws a different subset but still covers every target
    let other = map_mid_surface(
        &cloud,
        &targets,
        &geometry,
        &base_params().with_sample_size(40).with_seed(8),
    )
    .unwrap();
    assert_eq!(other.field.len(), targets.len());
}

#[test]
fn test_thickness_patch_maps_onto_nearby_elements() {
    // Uniform 1.0 wall with a thick patch (2.0) around theta=0 at mid height
    let mut cloud = MeasuredCloud::new();
    for &z in &[0.0, 50.0, 100.0] {
        for i in 0..36 {
            let theta = TAU * f64::from(i) / 36.0;
            let in_patch = z == 50.0 && (theta < 0.3 || theta > TAU - 0.3);
            cloud.push(MeasuredPoint::with_thickness(
                Point3::new(100.0 * theta.cos(), 100.0 * theta.sin(), z),
                if in_patch { 2.0 } else { 1.0 },
            ));
        }
    }
    let geometry = ShellGeometry::cylinder(100.0, 100.0);
    let targets = vec![
        TargetPoint::from_coords(100.0, 0.0, 50.0, 1),  // inside the patch
        TargetPoint::from_coords(-100.0, 0.0, 50.0, 2), // opposite side
    ];

    let output = map_thickness(&cloud, &targets, &geometry, &base_params()).unwrap();
    assert_relative_eq!(output.field.get(1).unwrap(), 2.0, epsilon = 1e-9);
    assert_relative_eq!(output.field.get(2).unwrap(), 1.0, epsilon = 1e-9);

    // Thickness scaling multiplies the mapped values directly
    let halved = map_thickness(
        &cloud,
        &targets,
        &geometry,
        &base_params().with_scaling_factor(0.5),
    )
    .unwrap();
    assert_relative_eq!(halved.field.get(1).unwrap(), 1.0, epsilon = 1e-9);
}

#[test]
fn test_parsed_file_feeds_the_pipeline() {
    // Cartesian rows with a thickness column, straight into a thickness run
    let mut text = String::new();
    text.push_str("# specimen 42, wall survey\n");
    for &z in &[0.0, 100.0] {
        for i in 0..12 {
            let theta = TAU * f64::from(i) / 12.0;
            text.push_str(&format!(
                "{:.6} {:.6} {:.6} 0.8\n",
                100.0 * theta.cos(),
                100.0 * theta.sin(),
                z
            ));
        }
    }

    let cloud = parse_measurements(&text, MeasurementFormat::Cartesian).unwrap();
    assert_eq!(cloud.len(), 24);
    assert!(cloud.has_thickness());

    let geometry = ShellGeometry::cylinder(100.0, 100.0);
    let targets = vec![TargetPoint::from_coords(0.0, 100.0, 0.0, 1)];

    let output = map_thickness(&cloud, &targets, &geometry, &base_params()).unwrap();
    assert_relative_eq!(output.field.get(1).unwrap(), 0.8, epsilon = 1e-6);
}

#[test]
fn test_cone_imperfection_follows_surface_normal() {
    // 30 degree cone, bulge of 2 at the bottom ring around theta=0
    let semi_angle = 30_f64.to_radians();
    let geometry = ShellGeometry::cone(100.0, 50.0, semi_angle);

    let mut cloud = MeasuredCloud::new();
    for &z in &[0.0, 25.0, 50.0] {
        let nominal = geometry.local_radius(z);
        for i in 0..36 {
            let theta = TAU * f64::from(i) / 36.0;
            let bulge = if z == 0.0 && i == 0 { 2.0 } else { 0.0 };
            let r = nominal + bulge;
            cloud.push_coords(r * theta.cos(), r * theta.sin(), z);
        }
    }

    let targets = vec![TargetPoint::from_coords(100.0, 0.0, 0.0, 1)];
    // The outlier band is centered on r_best_fit; a cone's radius tapers
    // well below it, so the band has to stay wide open here
    let params = base_params()
        .with_h_measured(50.0)
        .with_radial_tolerance_pct(40.0);

    let output = map_mid_surface(&cloud, &targets, &geometry, &params).unwrap();
    let t = output.field.get(1).unwrap();

    // Amplitude 2, tilted along the cone normal
    assert_relative_eq!(t.norm(), 2.0, epsilon = 1e-6);
    assert_relative_eq!(t.x, 2.0 * semi_angle.cos(), epsilon = 1e-6);
    assert_relative_eq!(t.z, 2.0 * semi_angle.sin(), epsilon = 1e-6);
}
