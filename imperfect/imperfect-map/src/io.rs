//! Measurement file I/O.
//!
//! Measurement campaigns deliver plain-text tables with no header row,
//! whitespace or comma delimited:
//!
//! - **Cartesian**: `x y z` (mid-surface) or `x y z thickness` (wall
//!   thickness); the column count is locked by the first data row.
//! - **Angular**: `theta_deg z value`, where the value column is either a
//!   measured radius (mid-surface campaigns) or a thickness sample placed
//!   on the nominal surface (thickness campaigns).
//!
//! Blank lines and `#`/`//` comments are skipped. Anything else that does
//! not match the expected shape is a fatal [`MapError::Format`]; a partially
//! parsed cloud is never returned.
//!
//! # Example
//!
//! ```no_run
//! use imperfect_map::io::{load_measurements, MeasurementFormat};
//!
//! let cloud = load_measurements("specimen_z25.txt", MeasurementFormat::Cartesian).unwrap();
//! println!("{} samples", cloud.len());
//! ```

use std::fs;
use std::path::Path;

use imperfect_types::{MeasuredCloud, MeasuredPoint};
use nalgebra::Point3;

use crate::error::{MapError, MapResult};

/// Interpretation of the value column in angular measurement rows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AngularValue {
    /// The value is the measured radius at `(theta, z)`.
    Radius,

    /// The value is a wall-thickness sample; the point is placed on the
    /// nominal surface at the given radius.
    Thickness {
        /// Nominal radius used to position the sample in space.
        nominal_radius: f64,
    },
}

/// Shape of a measurement file.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MeasurementFormat {
    /// Cartesian rows, `x y z` or `x y z thickness` (detected from the
    /// first data row).
    Cartesian,

    /// Angular rows, `theta_deg z value`.
    Angular(AngularValue),
}

/// Loads a measurement file into a [`MeasuredCloud`].
///
/// # Errors
///
/// Returns [`MapError::Io`] if the file cannot be read and
/// [`MapError::Format`] if any data row does not match the expected shape.
pub fn load_measurements<P: AsRef<Path>>(
    path: P,
    format: MeasurementFormat,
) -> MapResult<MeasuredCloud> {
    let text = fs::read_to_string(path)?;
    parse_measurements(&text, format)
}

/// Parses measurement text into a [`MeasuredCloud`].
///
/// Identical to [`load_measurements`] but operating on an in-memory string,
/// which is what the tests use.
///
/// # Errors
///
/// Returns [`MapError::Format`] if any data row does not match the expected
/// shape.
///
/// # Example
///
/// ```
/// use imperfect_map::io::{parse_measurements, MeasurementFormat};
///
/// let text = "# bottom ring\n250.1 0.0 0.0\n0.0, 249.9, 0.0\n";
/// let cloud = parse_measurements(text, MeasurementFormat::Cartesian).unwrap();
/// assert_eq!(cloud.len(), 2);
/// ```
pub fn parse_measurements(text: &str, format: MeasurementFormat) -> MapResult<MeasuredCloud> {
    let mut cloud = MeasuredCloud::new();

    // Column count locked by the first data row (Cartesian only)
    let mut cartesian_columns: Option<usize> = None;

    for (index, raw) in text.lines().enumerate() {
        let line_no = index + 1;
        let line = raw.trim();

        if line.is_empty() || line.starts_with('#') || line.starts_with("//") {
            continue;
        }

        let fields: Vec<&str> = line
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|s| !s.is_empty())
            .collect();

        let point = match format {
            MeasurementFormat::Cartesian => {
                parse_cartesian_row(&fields, line_no, &mut cartesian_columns)?
            }
            MeasurementFormat::Angular(value) => parse_angular_row(&fields, line_no, value)?,
        };

        cloud.push(point);
    }

    Ok(cloud)
}

fn parse_field(field: &str, line: usize, name: &str) -> MapResult<f64> {
    field
        .parse::<f64>()
        .map_err(|_| MapError::format(line, format!("non-numeric {name} value: {field:?}")))
}

fn parse_cartesian_row(
    fields: &[&str],
    line: usize,
    columns: &mut Option<usize>,
) -> MapResult<MeasuredPoint> {
    let expected = match *columns {
        Some(n) => n,
        None => {
            if fields.len() != 3 && fields.len() != 4 {
                return Err(MapError::format(
                    line,
                    format!("expected 3 or 4 columns, got {}", fields.len()),
                ));
            }
            *columns = Some(fields.len());
            fields.len()
        }
    };

    if fields.len() != expected {
        return Err(MapError::format(
            line,
            format!("expected {expected} columns, got {}", fields.len()),
        ));
    }

    let x = parse_field(fields[0], line, "x")?;
    let y = parse_field(fields[1], line, "y")?;
    let z = parse_field(fields[2], line, "z")?;

    let position = Point3::new(x, y, z);
    if expected == 4 {
        let thickness = parse_field(fields[3], line, "thickness")?;
        Ok(MeasuredPoint::with_thickness(position, thickness))
    } else {
        Ok(MeasuredPoint::new(position))
    }
}

fn parse_angular_row(fields: &[&str], line: usize, value: AngularValue) -> MapResult<MeasuredPoint> {
    if fields.len() != 3 {
        return Err(MapError::format(
            line,
            format!("expected 3 columns (theta z value), got {}", fields.len()),
        ));
    }

    let theta = parse_field(fields[0], line, "theta")?.to_radians();
    let z = parse_field(fields[1], line, "z")?;
    let v = parse_field(fields[2], line, "value")?;

    match value {
        AngularValue::Radius => Ok(MeasuredPoint::new(Point3::new(
            v * theta.cos(),
            v * theta.sin(),
            z,
        ))),
        AngularValue::Thickness { nominal_radius } => Ok(MeasuredPoint::with_thickness(
            Point3::new(nominal_radius * theta.cos(), nominal_radius * theta.sin(), z),
            v,
        )),
    }
}
