use ndarray::{Array1, Array2};

use crate::adaptive_control::TrialParams;
use crate::deviates::Deviates;

/// Midpoint of `[lo, hi]` when `v` is NaN or infinite, `v` otherwise.
pub(crate) fn midpoint_if_degenerate(v: f64, lo: f64, hi: f64) -> f64 {
    if v.is_finite() {
        v
    } else {
        log::trace!("non-finite trial element {} replaced by bound midpoint", v);
        (hi + lo) / 2.0
    }
}

/// Best/1 mutation with per-element jitter and cyclic crossover.
///
/// Starting at a random index `j`, element after element (wrapping around)
/// is replaced by `best[j] + (U * jitter + F) * (pop[r1][j] - pop[r2][j])`.
/// The first replacement is unconditional; each further one happens while a
/// fresh uniform draw is below `CR`, for at most `d` elements in total.
/// Other elements keep the values of candidate `i`.
#[allow(clippy::too_many_arguments)]
pub(crate) fn trial_best1_jitter<D: Deviates + ?Sized>(
    i: usize,
    pop: &Array2<f64>,
    best: &Array1<f64>,
    params: TrialParams,
    jitter: f64,
    lower: &Array1<f64>,
    upper: &Array1<f64>,
    deviates: &mut D,
) -> Array1<f64> {
    let d = pop.ncols();
    let idxs = deviates.distinct_indices(pop.nrows(), 2, i);
    let (r1, r2) = (idxs[0], idxs[1]);

    let mut trial = pop.row(i).to_owned();
    let mut j = deviates.index(d);
    let mut k = 0usize;
    loop {
        let scale = deviates.uniform() * jitter + params.f;
        let v = best[j] + scale * (pop[(r1, j)] - pop[(r2, j)]);
        trial[j] = midpoint_if_degenerate(v, lower[j], upper[j]);
        j = (j + 1) % d;
        k += 1;
        if !(deviates.uniform() < params.cr && k < d) {
            break;
        }
    }
    trial
}
