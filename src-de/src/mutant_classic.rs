use ndarray::{Array1, Array2};

use crate::BaseVector;
use crate::deviates::Deviates;

/// DE/x/y mutant: `base + F * sum_k (pop[a_k] - pop[b_k])` over `pairs` differences.
///
/// Indices are drawn once, distinct and different from `i`; a random base
/// vector takes the last drawn index.
pub(crate) fn mutant_classic<D: Deviates + ?Sized>(
    i: usize,
    pop: &Array2<f64>,
    best: &Array1<f64>,
    base: BaseVector,
    pairs: usize,
    f: f64,
    deviates: &mut D,
) -> Array1<f64> {
    let count = 2 * pairs + usize::from(base == BaseVector::Rand);
    let idxs = deviates.distinct_indices(pop.nrows(), count, i);

    let mut mutant = match base {
        BaseVector::Rand => pop.row(idxs[2 * pairs]).to_owned(),
        BaseVector::Best => best.clone(),
    };
    for pair in idxs[..2 * pairs].chunks_exact(2) {
        mutant = mutant + &((&pop.row(pair[0]) - &pop.row(pair[1])) * f);
    }
    mutant
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(Vec<usize>);

    impl Deviates for Fixed {
        fn uniform(&mut self) -> f64 {
            0.0
        }
        fn normal(&mut self, mean: f64, _sd: f64) -> f64 {
            mean
        }
        fn cauchy(&mut self, location: f64, _scale: f64) -> f64 {
            location
        }
        fn distinct_indices(&mut self, _pool: usize, count: usize, _exclude: usize) -> Vec<usize> {
            self.0[..count].to_vec()
        }
        fn index(&mut self, _n: usize) -> usize {
            0
        }
    }

    fn pop() -> Array2<f64> {
        Array2::from_shape_fn((6, 2), |(i, j)| (i as f64) * 10.0 + j as f64)
    }

    #[test]
    fn test_rand1() {
        let best = Array1::from(vec![100.0, 100.0]);
        let mut d = Fixed(vec![1, 2, 3]);
        let m = mutant_classic(0, &pop(), &best, BaseVector::Rand, 1, 0.5, &mut d);
        // pop[3] + 0.5 * (pop[1] - pop[2])
        assert_eq!(m, Array1::from(vec![25.0, 26.0]));
    }

    #[test]
    fn test_best2() {
        let best = Array1::from(vec![100.0, 100.0]);
        let mut d = Fixed(vec![5, 1, 4, 2]);
        let m = mutant_classic(0, &pop(), &best, BaseVector::Best, 2, 1.0, &mut d);
        // best + (pop[5] - pop[1]) + (pop[4] - pop[2])
        assert_eq!(m, Array1::from(vec![160.0, 160.0]));
    }
}
