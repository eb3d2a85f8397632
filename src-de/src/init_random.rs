use ndarray::{Array1, Array2};
use rand::Rng;

/// `npop` points drawn uniformly in the box.
pub(crate) fn init_random<R: Rng + ?Sized>(
    npop: usize,
    lower: &Array1<f64>,
    upper: &Array1<f64>,
    rng: &mut R,
) -> Array2<f64> {
    Array2::from_shape_fn((npop, lower.len()), |(_, j)| {
        let u: f64 = rng.random::<f64>();
        lower[j] + u * (upper[j] - lower[j])
    })
}
