//! Result types and assembly.
//!
//! Output is keyed by the engine's stable target id and built fresh for
//! every run; nothing is cached between runs. Assembly verifies the
//! exactly-one-entry-per-target contract and fails loudly when it is
//! broken, since a mismatch means an internal bug rather than bad input.

use std::collections::HashMap;
use std::fmt;

use nalgebra::Vector3;

use crate::error::{MapError, MapResult};

/// Mid-surface imperfection field: one translation per target node.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MidSurfaceField {
    /// Translation vectors keyed by target id.
    pub translations: HashMap<u64, Vector3<f64>>,
}

impl MidSurfaceField {
    /// Number of entries in the field.
    #[must_use]
    pub fn len(&self) -> usize {
        self.translations.len()
    }

    /// Returns true if the field has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.translations.is_empty()
    }

    /// Translation for the given target id.
    #[must_use]
    pub fn get(&self, id: u64) -> Option<&Vector3<f64>> {
        self.translations.get(&id)
    }

    /// Largest translation magnitude in the field.
    #[must_use]
    pub fn max_amplitude(&self) -> f64 {
        self.translations
            .values()
            .map(|t| t.norm())
            .fold(0.0, f64::max)
    }
}

/// Thickness imperfection field: one scalar per target element.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ThicknessField {
    /// Thickness values keyed by target id.
    pub thicknesses: HashMap<u64, f64>,
}

impl ThicknessField {
    /// Number of entries in the field.
    #[must_use]
    pub fn len(&self) -> usize {
        self.thicknesses.len()
    }

    /// Returns true if the field has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.thicknesses.is_empty()
    }

    /// Thickness for the given target id.
    #[must_use]
    pub fn get(&self, id: u64) -> Option<f64> {
        self.thicknesses.get(&id).copied()
    }
}

/// Non-fatal observations from one mapping run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MappingStats {
    /// Measured samples that survived normalization and entered the search.
    pub measured_points: usize,

    /// Samples dropped by the radial outlier filter.
    pub dropped_outliers: usize,

    /// Subset size when the cloud was subsampled.
    pub subsampled: Option<usize>,

    /// Effective number of axial sections used.
    pub num_sections: usize,

    /// True when the requested section count was raised to respect the
    /// memory budget.
    pub sections_adjusted: bool,
}

impl fmt::Display for MappingStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Mapping: {} measured points ({} outliers dropped), {} sections{}",
            self.measured_points,
            self.dropped_outliers,
            self.num_sections,
            if self.sections_adjusted {
                " (adjusted for memory budget)"
            } else {
                ""
            }
        )
    }
}

/// Result of a mid-surface mapping run.
#[derive(Debug, Clone)]
pub struct MidSurfaceOutput {
    /// The assembled field, one entry per target node.
    pub field: MidSurfaceField,
    /// Run statistics.
    pub stats: MappingStats,
}

/// Result of a thickness mapping run.
#[derive(Debug, Clone)]
pub struct ThicknessOutput {
    /// The assembled field, one entry per target element.
    pub field: ThicknessField,
    /// Run statistics.
    pub stats: MappingStats,
}

/// Assembles `(id, value)` pairs into a uniquely keyed map.
///
/// # Errors
///
/// - [`MapError::DuplicateTarget`] when an id appears twice.
/// - [`MapError::Assembly`] when the entry count does not match `expected`.
///
/// # Example
///
/// ```
/// use imperfect_map::result::assemble;
///
/// let field = assemble(vec![(1_u64, 0.5), (2, 0.7)], 2).unwrap();
/// assert_eq!(field[&2], 0.7);
///
/// assert!(assemble(vec![(1_u64, 0.5), (1, 0.7)], 2).is_err());
/// assert!(assemble(vec![(1_u64, 0.5)], 2).is_err());
/// ```
pub fn assemble<V>(pairs: Vec<(u64, V)>, expected: usize) -> MapResult<HashMap<u64, V>> {
    let mut map = HashMap::with_capacity(pairs.len());
    for (id, value) in pairs {
        if map.insert(id, value).is_some() {
            return Err(MapError::DuplicateTarget { id });
        }
    }
    if map.len() != expected {
        return Err(MapError::Assembly {
            expected,
            actual: map.len(),
        });
    }
    Ok(map)
}
