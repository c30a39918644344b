//! Damped power iteration.

use fast_core::errors::{ErrorInfo, FastError};
use fast_core::LinearOperator;
use log::{trace, warn};

use crate::config::PageRankOpts;

/// Total assigned to a normalised ranking vector.
pub const NORMALIZED_TOTAL: f64 = 100.0;

/// Runs damped power iteration over `adjacency`.
///
/// Starting from `prior` (uniform `1/N` when absent) each step computes
/// `(1 - d) * prior + d * A * current`. Iteration stops once the L1 change
/// between successive vectors drops to `1 / N^2`; exceeding
/// `opts.max_iters` is a [`FastError::Convergence`]. With `opts.normalize`
/// the result is rescaled to sum to [`NORMALIZED_TOTAL`].
pub fn rank_adjacency(
    adjacency: &dyn LinearOperator,
    prior: Option<&[f64]>,
    opts: &PageRankOpts,
) -> Result<Vec<f64>, FastError> {
    let (rows, cols) = adjacency.shape();
    if rows != cols {
        return Err(FastError::Shape(
            ErrorInfo::new("adjacency-not-square", "power iteration needs a square operator")
                .with_context("rows", rows)
                .with_context("cols", cols),
        ));
    }
    let damping = opts.damping;
    if !(0.0..=1.0).contains(&damping) {
        return Err(FastError::Validation(
            ErrorInfo::new("damping-out-of-range", "damping must lie in [0, 1]")
                .with_context("damping", damping),
        ));
    }
    let n = rows;
    if n == 0 {
        return Ok(Vec::new());
    }
    let prior: Vec<f64> = match prior {
        Some(values) if values.len() != n => {
            return Err(FastError::Shape(
                ErrorInfo::new("prior-length", "prior must align with the adjacency")
                    .with_context("expected", n)
                    .with_context("len", values.len()),
            ))
        }
        Some(values) => values.to_vec(),
        None => vec![1.0 / n as f64; n],
    };
    let threshold = 1.0 / (n as f64).powi(2);

    let step = |current: &[f64]| -> Result<Vec<f64>, FastError> {
        let propagated = adjacency.apply(current)?;
        Ok(prior
            .iter()
            .zip(&propagated)
            .map(|(base, flow)| (1.0 - damping) * base + damping * flow)
            .collect())
    };

    let mut page_rank = step(&prior)?;
    let mut error = l1_distance(&prior, &page_rank);
    let mut iterations = 0usize;
    while !(error <= threshold) {
        let next = step(&page_rank)?;
        error = l1_distance(&page_rank, &next);
        page_rank = next;
        iterations += 1;
        if iterations > opts.max_iters {
            return Err(FastError::Convergence(
                ErrorInfo::new("not-converged", "power iteration exceeded its iteration cap")
                    .with_context("iterations", iterations)
                    .with_context("error", error)
                    .with_context("threshold", threshold)
                    .with_hint("lower the damping factor or raise max_iters"),
            ));
        }
    }
    trace!("power iteration converged after {iterations} extra steps (error {error:e})");

    if opts.normalize {
        let total: f64 = page_rank.iter().sum();
        if total > 0.0 && total.is_finite() {
            let factor = NORMALIZED_TOTAL / total;
            page_rank.iter_mut().for_each(|value| *value *= factor);
        } else {
            warn!("page rank total is {total}; leaving ranking unnormalised");
        }
    }
    Ok(page_rank)
}

fn l1_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y).abs()).sum()
}
