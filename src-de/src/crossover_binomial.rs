use ndarray::Array1;

use crate::deviates::Deviates;

/// Binomial crossover: each element comes from `mutant` with probability
/// `cr`; the element at one random index always does.
pub(crate) fn binomial_crossover<D: Deviates + ?Sized>(
    target: &Array1<f64>,
    mutant: &Array1<f64>,
    cr: f64,
    deviates: &mut D,
) -> Array1<f64> {
    let n = target.len();
    let jrand = deviates.index(n);
    let mut trial = target.clone();
    for j in 0..n {
        if j == jrand || deviates.uniform() < cr {
            trial[j] = mutant[j];
        }
    }
    trial
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deviates::SeededDeviates;

    #[test]
    fn test_cr_extremes() {
        let target = Array1::from(vec![0.0; 6]);
        let mutant = Array1::from(vec![1.0; 6]);
        let mut d = SeededDeviates::seeded(4);

        let all = binomial_crossover(&target, &mutant, 1.0, &mut d);
        assert_eq!(all, mutant);

        let one = binomial_crossover(&target, &mutant, 0.0, &mut d);
        assert_eq!(one.iter().filter(|&&v| v == 1.0).count(), 1);
    }
}
