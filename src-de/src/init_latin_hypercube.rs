use ndarray::{Array1, Array2};
use rand::Rng;
use rand::seq::SliceRandom;

/// Latin hypercube sample: along each axis every one of the `npop` equal
/// strata holds exactly one point.
pub(crate) fn init_latin_hypercube<R: Rng + ?Sized>(
    npop: usize,
    lower: &Array1<f64>,
    upper: &Array1<f64>,
    rng: &mut R,
) -> Array2<f64> {
    let n = lower.len();
    let mut samples = Array2::<f64>::zeros((npop, n));
    for j in 0..n {
        let mut vals: Vec<f64> =
            (0..npop).map(|k| ((k as f64) + rng.random::<f64>()) / (npop as f64)).collect();
        vals.shuffle(rng);
        for (i, u) in vals.into_iter().enumerate() {
            samples[(i, j)] = lower[j] + u * (upper[j] - lower[j]);
        }
    }
    samples
}
