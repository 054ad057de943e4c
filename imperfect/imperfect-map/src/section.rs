//! Axial sectioning of the normalized cloud and the target set.
//!
//! Pairing every target point with every measured point is infeasible for
//! real scans (a full distance matrix for a million-point cloud would need
//! terabytes). Instead both point sets are sorted by z and processed in
//! bounded axial sections: each section's worst-case distance work is
//! `section_size^2 * 8` bytes, and the section count is raised until that
//! fits the configured memory budget.
//!
//! Each target section searches the measured points inside its padded
//! z-interval. A locally sparse scan can leave that interval empty, in
//! which case the padding doubles, with a hard bound on the number of
//! doublings so a bad input fails instead of spinning.

use std::ops::Range;

use tracing::{debug, warn};

use crate::error::{MapError, MapResult};

/// Base section padding as a fraction of the model height.
const BASE_TOLERANCE_FRACTION: f64 = 0.01;

/// Padding fraction for the first and last sections, which have to capture
/// edge effects at the shell boundaries.
const EDGE_TOLERANCE_FRACTION: f64 = 0.05;

/// Maximum number of tolerance doublings before giving up on a section.
const MAX_WIDENING_STEPS: usize = 32;

/// How targets are split into sections under a memory budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionPlan {
    /// Effective number of sections (>= the requested count).
    pub num_sections: usize,

    /// Targets per section (last section may be smaller).
    pub section_size: usize,

    /// True when the requested section count had to be raised to respect
    /// the memory budget.
    pub adjusted: bool,
}

/// Plans the section split for `target_count` targets.
///
/// The worst-case per-section distance work is `section_size^2` 8-byte
/// floats; when the requested `num_sections` would exceed `budget_bytes`,
/// the count is raised to the smallest value that fits and the adjustment
/// is logged.
///
/// # Example
///
/// ```
/// use imperfect_map::section::plan_sections;
///
/// // 1000 targets in 10 sections of 100: 100^2 * 8 bytes is tiny
/// let plan = plan_sections(1000, 10, 2 * 1024 * 1024 * 1024);
/// assert_eq!(plan.num_sections, 10);
/// assert_eq!(plan.section_size, 100);
/// assert!(!plan.adjusted);
///
/// // A 80-byte budget only allows sections of up to 3 targets
/// let plan = plan_sections(1000, 10, 80);
/// assert!(plan.adjusted);
/// assert!(plan.section_size * plan.section_size * 8 <= 80);
/// ```
#[must_use]
pub fn plan_sections(target_count: usize, requested: usize, budget_bytes: usize) -> SectionPlan {
    if target_count == 0 {
        return SectionPlan {
            num_sections: 0,
            section_size: 0,
            adjusted: false,
        };
    }

    // Largest section size whose squared distance work fits the budget
    #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    let max_section_size = (((budget_bytes / 8) as f64).sqrt().floor() as usize).max(1);

    let needed = target_count.div_ceil(max_section_size);
    let num_sections = requested.max(needed).min(target_count);
    let adjusted = num_sections > requested;

    if adjusted {
        warn!(
            requested,
            num_sections, budget_bytes, "raised section count to respect memory budget"
        );
    }

    SectionPlan {
        num_sections,
        section_size: target_count.div_ceil(num_sections),
        adjusted,
    }
}

/// One axial section: a contiguous run of z-sorted targets plus the range
/// of z-sorted measured points captured by its padded z-interval.
///
/// Sections are transient; they index into the sorted orders built for one
/// run and are discarded afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct BinSection {
    /// Final padded z-interval searched for measured points.
    pub z_lo: f64,
    /// Upper bound of the padded z-interval.
    pub z_hi: f64,
    /// Range into the z-sorted target order.
    pub targets: Range<usize>,
    /// Range into the z-sorted measured order.
    pub measured: Range<usize>,
}

/// Builds the sections for one run.
///
/// Both slices must be sorted ascending by z. `measured_z` holds the z of
/// each normalized measured point; `target_z` the z of each target, both in
/// their sorted orders.
///
/// # Errors
///
/// - [`MapError::EmptyCloud`] when there are no measured points (checked up
///   front so the widening loop can never spin on nothing).
/// - [`MapError::EmptySection`] when a section's interval stays empty after
///   the bounded number of widening steps.
pub fn build_sections(
    measured_z: &[f64],
    target_z: &[f64],
    plan: &SectionPlan,
    h_model: f64,
) -> MapResult<Vec<BinSection>> {
    if target_z.is_empty() || plan.num_sections == 0 {
        return Ok(Vec::new());
    }
    if measured_z.is_empty() {
        return Err(MapError::EmptyCloud);
    }

    let mut sections = Vec::with_capacity(plan.num_sections);

    for index in 0..plan.num_sections {
        let start = index * plan.section_size;
        if start >= target_z.len() {
            break;
        }
        let end = (start + plan.section_size).min(target_z.len());

        // The plan may overshoot when section_size does not divide the
        // target count, so "last" means the section holding the final
        // target, not index num_sections - 1.
        let is_edge = index == 0 || end == target_z.len();
        let base = if is_edge {
            EDGE_TOLERANCE_FRACTION
        } else {
            BASE_TOLERANCE_FRACTION
        };

        let mut tolerance = base * h_model;
        let mut widening = 0_usize;

        let section = loop {
            let z_lo = target_z[start] - tolerance;
            let z_hi = target_z[end - 1] + tolerance;

            let lo = measured_z.partition_point(|&z| z < z_lo);
            let hi = measured_z.partition_point(|&z| z <= z_hi);

            if lo < hi {
                if widening > 0 {
                    debug!(
                        section = index,
                        widening, tolerance, "widened section tolerance to capture measured points"
                    );
                }
                break BinSection {
                    z_lo,
                    z_hi,
                    targets: start..end,
                    measured: lo..hi,
                };
            }

            if widening >= MAX_WIDENING_STEPS {
                return Err(MapError::EmptySection { z_lo, z_hi });
            }
            tolerance *= 2.0;
            widening += 1;
        };

        sections.push(section);
    }

    Ok(sections)
}
