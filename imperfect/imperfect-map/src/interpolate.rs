//! K-nearest-neighbour inverse-distance weighting.
//!
//! For each target point the interpolator finds the `num_closest_points`
//! nearest normalized measured points by full 3-D Euclidean distance within
//! the target's section, and weights them by `1 / d^power`. Weights are
//! normalized to sum to one, so a lone neighbour reproduces its value
//! exactly.
//!
//! A target that coincides with a measured point would divide by zero; the
//! distance is floored at [`MIN_NEIGHBOR_DISTANCE`] instead, which makes the
//! coincident sample dominate the weights without becoming infinite.

use nalgebra::Point3;

use crate::normalize::NormalizedPoint;

/// Floor applied to neighbour distances before inverse-distance weighting.
pub const MIN_NEIGHBOR_DISTANCE: f64 = 1e-12;

/// A measured neighbour of a target point with its normalized weight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightedNeighbor {
    /// Index into the section's measured slice.
    pub index: usize,
    /// Normalized inverse-distance weight; all weights of one query sum to one.
    pub weight: f64,
}

/// Finds the `k` nearest points to `query` and their inverse-distance weights.
///
/// Ties are broken by index, so results are deterministic for a fixed input
/// order. `k` is clamped to the slice length; callers guarantee the slice is
/// non-empty (sections always capture at least one measured point).
///
/// # Example
///
/// ```
/// use imperfect_map::interpolate::inverse_distance_weights;
/// use imperfect_map::normalize::NormalizedPoint;
/// use nalgebra::Point3;
///
/// let points = vec![
///     NormalizedPoint { position: Point3::new(0.0, 0.0, 0.0), thickness: None },
///     NormalizedPoint { position: Point3::new(10.0, 0.0, 0.0), thickness: None },
/// ];
/// let neighbors = inverse_distance_weights(&Point3::new(1.0, 0.0, 0.0), &points, 1, 2.0);
///
/// assert_eq!(neighbors.len(), 1);
/// assert_eq!(neighbors[0].index, 0);
/// assert!((neighbors[0].weight - 1.0).abs() < 1e-12);
/// ```
#[must_use]
pub fn inverse_distance_weights(
    query: &Point3<f64>,
    points: &[NormalizedPoint],
    k: usize,
    power: f64,
) -> Vec<WeightedNeighbor> {
    if points.is_empty() || k == 0 {
        return Vec::new();
    }

    let mut distances: Vec<(f64, usize)> = points
        .iter()
        .enumerate()
        .map(|(index, p)| ((p.position - query).norm(), index))
        .collect();

    let k = k.min(distances.len());
    if k < distances.len() {
        distances.select_nth_unstable_by(k - 1, |a, b| {
            a.0.total_cmp(&b.0).then(a.1.cmp(&b.1))
        });
        distances.truncate(k);
    }
    distances.sort_unstable_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));

    // Coincident points get a tiny positive distance instead of dividing
    // by zero; they end up dominating the weight sum, as they should.
    //
    // Weights are computed as (d_nearest / d_i)^p rather than d_i^-p: the
    // normalized result is identical, but each raw term stays in (0, 1]
    // and the sum in [1, k], so large distances or a steep power cannot
    // underflow every term to zero (or overflow the coincident one).
    let d_ref = distances[0].0.max(MIN_NEIGHBOR_DISTANCE);
    let raw: Vec<f64> = distances
        .iter()
        .map(|&(d, _)| (d_ref / d.max(MIN_NEIGHBOR_DISTANCE)).powf(power))
        .collect();
    let sum: f64 = raw.iter().sum();

    distances
        .iter()
        .zip(raw.iter())
        .map(|(&(_, index), &w)| WeightedNeighbor {
            index,
            weight: w / sum,
        })
        .collect()
}
