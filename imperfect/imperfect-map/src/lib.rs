//! Mapping of measured shell imperfections onto nominal analysis models.
//!
//! Thin-walled shells buckle at loads governed by their geometric
//! imperfections. This crate takes a measured point cloud of a real
//! specimen (laser scan, CMM survey) and transfers its deviation pattern
//! onto the node and element positions of a nominal cylinder or cone
//! model, producing per-node mid-surface translations and per-element wall
//! thicknesses:
//!
//! - **I/O** - Load Cartesian or angular measurement files
//! - **Normalization** - Reconcile specimen pose and size with the model
//! - **Sectioning** - Memory-bounded axial partitioning of both point sets
//! - **Interpolation** - K-nearest-neighbour inverse-distance weighting
//! - **Synthesis** - Turn weighted neighbours into translations or thickness
//! - **Assembly** - One verified field entry per target id
//!
//! # Quick Start
//!
//! ```
//! use imperfect_map::{map_mid_surface, MappingParams};
//! use imperfect_types::{MeasuredCloud, ShellGeometry, TargetPoint};
//!
//! // Measured samples of a 100 x 100 cylinder, one side bulging outward
//! let mut cloud = MeasuredCloud::new();
//! for &z in &[0.0, 50.0, 100.0] {
//!     cloud.push_coords(103.0, 0.0, z);
//!     cloud.push_coords(0.0, 100.0, z);
//!     cloud.push_coords(-100.0, 0.0, z);
//!     cloud.push_coords(0.0, -100.0, z);
//! }
//!
//! let targets = vec![
//!     TargetPoint::from_coords(100.0, 0.0, 50.0, 1),
//!     TargetPoint::from_coords(-100.0, 0.0, 50.0, 2),
//! ];
//!
//! let geometry = ShellGeometry::cylinder(100.0, 100.0);
//! let params = MappingParams::default()
//!     .with_r_best_fit(100.0)
//!     .with_radial_tolerance_pct(5.0)
//!     .with_num_closest_points(1)
//!     .with_num_sections(3);
//!
//! let output = map_mid_surface(&cloud, &targets, &geometry, &params).unwrap();
//!
//! // The bulge maps onto node 1, the nominal side stays put
//! assert!((output.field.get(1).unwrap().x - 3.0).abs() < 1e-9);
//! assert!(output.field.get(2).unwrap().norm() < 1e-9);
//! ```
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`io`] | Measurement file parsing (Cartesian and angular formats) |
//! | [`params`] | Mapping parameters and validation |
//! | [`normalize`] | Specimen-to-model normalization and subsampling |
//! | [`section`] | Memory-budgeted axial sectioning |
//! | [`interpolate`] | Nearest-neighbour search and inverse-distance weights |
//! | [`synthesize`] | Mid-surface and thickness field synthesis |
//! | [`mapping`] | Pipeline entry points |
//! | [`result`] | Output fields, statistics, and assembly |
//! | [`adapter`] | Seam to the host analysis model |
//! | [`error`] | Error types |
//!
//! # Host Integration
//!
//! Hosts that own a model implement [`MeshAdapter`] and use the one-call
//! drivers:
//!
//! ```no_run
//! use imperfect_map::{apply_mid_surface_imperfection, MappingParams, MeshAdapter};
//! use imperfect_map::io::{load_measurements, MeasurementFormat};
//! use imperfect_types::ShellGeometry;
//!
//! # fn demo(adapter: &mut impl MeshAdapter) {
//! let cloud = load_measurements("specimen.txt", MeasurementFormat::Cartesian).unwrap();
//! let geometry = ShellGeometry::cylinder(250.0, 500.0);
//! let stats = apply_mid_surface_imperfection(
//!     adapter,
//!     &cloud,
//!     &geometry,
//!     &MappingParams::default(),
//! )
//! .unwrap();
//! println!("{stats}");
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![deny(clippy::unwrap_used, clippy::expect_used)]
#![allow(clippy::module_name_repetitions)]
// Allow certain pedantic lints that are too strict for this crate
#![allow(clippy::missing_const_for_fn)] // Not all functions benefit from const
#![allow(clippy::cast_precision_loss)] // Expected when converting counts to f64
#![allow(clippy::suboptimal_flops)] // Plain arithmetic mirrors the formulas
#![allow(clippy::many_single_char_names)] // r, z, k are the domain's names

pub mod adapter;
pub mod error;
pub mod interpolate;
pub mod io;
pub mod mapping;
pub mod normalize;
pub mod params;
pub mod result;
pub mod section;
pub mod synthesize;

// Re-export main types at crate root for convenience
pub use adapter::{apply_mid_surface_imperfection, apply_thickness_imperfection, MeshAdapter};
pub use error::{MapError, MapResult};
pub use io::{load_measurements, parse_measurements, AngularValue, MeasurementFormat};
pub use mapping::{map_mid_surface, map_thickness};
pub use normalize::{normalize_cloud, NormalizeOutput, NormalizedPoint};
pub use params::{MappingParams, DEFAULT_MEMORY_BUDGET_BYTES};
pub use result::{
    MappingStats, MidSurfaceField, MidSurfaceOutput, ThicknessField, ThicknessOutput,
};
