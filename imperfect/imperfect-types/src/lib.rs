//! Core types for measured shell imperfection mapping.
//!
//! This crate provides the foundational types shared by the imperfection
//! mapping pipeline:
//!
//! - [`MeasuredPoint`] - A single measurement sample, with optional thickness
//! - [`MeasuredCloud`] - An unordered cloud of measurement samples
//! - [`TargetPoint`] - A node or element location of the nominal model
//! - [`ShellGeometry`] - The nominal cone/cylinder and its local-radius function
//!
//! # Layer 0 Crate
//!
//! This is a Layer 0 crate with **zero engine dependencies**. It performs no
//! I/O and never talks to a finite-element or CAD system; those live behind
//! the adapter seam in `imperfect-map`.
//!
//! # Units and Coordinate System
//!
//! All coordinates are `f64` and unit-agnostic (measurement campaigns for
//! shell specimens typically use millimeters). The shell axis is **z**,
//! pointing from the bottom edge (`z = 0`) to the top edge (`z = h_model`),
//! with x/y spanning the cross-section plane.
//!
//! # Example
//!
//! ```
//! use imperfect_types::{MeasuredCloud, MeasuredPoint, ShellGeometry};
//!
//! let geometry = ShellGeometry::cylinder(250.0, 510.0);
//! assert!((geometry.local_radius(255.0) - 250.0).abs() < 1e-12);
//!
//! let mut cloud = MeasuredCloud::new();
//! cloud.push(MeasuredPoint::from_coords(250.3, 0.0, 10.0));
//! cloud.push(MeasuredPoint::from_coords(0.0, 249.8, 500.0));
//! assert_eq!(cloud.len(), 2);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![allow(clippy::module_name_repetitions)]

mod point;
mod shell;
mod target;

pub use point::{MeasuredCloud, MeasuredPoint};
pub use shell::ShellGeometry;
pub use target::TargetPoint;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point3, Vector3};
