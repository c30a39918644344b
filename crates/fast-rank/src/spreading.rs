//! Diversified selection with Gaussian repulsion.

use fast_core::errors::{ErrorInfo, FastError};
use fast_core::RngHandle;

use crate::config::SpreadingOpts;
use crate::distance::DistanceMetric;
use crate::select::{check_aligned, select_top};

/// Selects `n` states one at a time while repelling picks from each other.
///
/// Each pick uses [`select_top`] on a running ranking equal to the original
/// ranking plus the mean Gaussian repulsion
/// `1 - exp(-dist^2 / (2 width^2))` to every earlier pick. With
/// `non_overlap` the picked states are pinned to the worst possible value
/// (`-inf` when maximising, `+inf` otherwise) so they cannot be chosen again
/// while any other candidate remains.
pub fn select_spreading(
    rankings: &[f64],
    states: &[usize],
    n: usize,
    metric: &dyn DistanceMetric,
    maximize: bool,
    opts: &SpreadingOpts,
    rng: &mut RngHandle,
) -> Result<Vec<usize>, FastError> {
    check_aligned(states.len(), rankings.len())?;
    if !(opts.width > 0.0) {
        return Err(FastError::Validation(
            ErrorInfo::new("width-not-positive", "spreading width must be positive")
                .with_context("width", opts.width),
        ));
    }
    if n == 0 {
        return Ok(Vec::new());
    }

    let two_width_sq = 2.0 * opts.width * opts.width;
    let excluded = if maximize {
        f64::NEG_INFINITY
    } else {
        f64::INFINITY
    };
    let mut picks = select_top(states, rankings, 1, maximize, rng)?;
    let mut penalty_sum = vec![0.0; states.len()];
    let mut blocked = vec![false; states.len()];

    while picks.len() < n {
        let last = picks[picks.len() - 1];
        for (pos, &state) in states.iter().enumerate() {
            if state == last {
                blocked[pos] = true;
            }
        }
        let dists = metric.distances(states, last)?;
        check_aligned(states.len(), dists.len())?;
        for (acc, dist) in penalty_sum.iter_mut().zip(&dists) {
            *acc += 1.0 - (-(dist * dist) / two_width_sq).exp();
        }
        let n_picked = picks.len() as f64;
        let updated: Vec<f64> = rankings
            .iter()
            .zip(&penalty_sum)
            .zip(&blocked)
            .map(|((rank, penalty), &is_blocked)| {
                if opts.non_overlap && is_blocked {
                    excluded
                } else {
                    rank + penalty / n_picked
                }
            })
            .collect();
        picks.extend(select_top(states, &updated, 1, maximize, rng)?);
    }
    Ok(picks)
}
