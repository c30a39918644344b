//! Tie-shuffling and evens selection primitives.

use fast_core::errors::{ErrorInfo, FastError};
use fast_core::RngHandle;
use rand::seq::SliceRandom;

/// Picks the `n` best states, shuffling every group of equal rankings.
///
/// States are ordered by ranking (descending when `maximize`) and each run of
/// identical values is permuted independently, so among tied states the
/// chance of selection does not depend on index or position. Groups past the
/// `n`-th state are never shuffled.
pub fn select_top(
    states: &[usize],
    rankings: &[f64],
    n: usize,
    maximize: bool,
    rng: &mut RngHandle,
) -> Result<Vec<usize>, FastError> {
    check_aligned(states.len(), rankings.len())?;
    if rankings.iter().any(|value| value.is_nan()) {
        return Err(FastError::validation(
            "ineligible-ranking",
            "rankings passed to selection must not contain NaN",
        ));
    }
    if n > states.len() {
        return Err(FastError::Validation(
            ErrorInfo::new("insufficient-states", "batch is larger than the candidate set")
                .with_context("requested", n)
                .with_context("available", states.len()),
        ));
    }

    let mut order: Vec<usize> = (0..states.len()).collect();
    if maximize {
        order.sort_by(|&a, &b| rankings[b].total_cmp(&rankings[a]));
    } else {
        order.sort_by(|&a, &b| rankings[a].total_cmp(&rankings[b]));
    }

    let mut selected = Vec::with_capacity(n);
    let mut start = 0;
    while start < order.len() && selected.len() < n {
        let value = rankings[order[start]];
        let mut end = start + 1;
        while end < order.len() && rankings[order[end]] == value {
            end += 1;
        }
        let group = &mut order[start..end];
        group.shuffle(rng);
        let needed = n - selected.len();
        selected.extend(group.iter().take(needed).map(|&pos| states[pos]));
        start = end;
    }
    Ok(selected)
}

/// Spreads `n` picks as evenly as possible over `states`.
///
/// Every state is repeated `n / |states|` times and the remaining
/// `n % |states|` picks are distinct states drawn uniformly without
/// replacement. The batch always has exactly `n` entries.
pub fn select_evens(states: &[usize], n: usize, rng: &mut RngHandle) -> Result<Vec<usize>, FastError> {
    if n == 0 {
        return Ok(Vec::new());
    }
    if states.is_empty() {
        return Err(FastError::Validation(
            ErrorInfo::new("no-states", "evens selection needs at least one state")
                .with_context("requested", n),
        ));
    }
    let per_state = n / states.len();
    let remainder = n % states.len();
    let mut batch = Vec::with_capacity(n);
    for &state in states {
        batch.extend(std::iter::repeat(state).take(per_state));
    }
    batch.extend(states.choose_multiple(rng, remainder).copied());
    Ok(batch)
}

pub(crate) fn check_aligned(states: usize, rankings: usize) -> Result<(), FastError> {
    if states != rankings {
        return Err(FastError::Shape(
            ErrorInfo::new("ranking-length", "rankings must align with states")
                .with_context("states", states)
                .with_context("rankings", rankings),
        ));
    }
    Ok(())
}
