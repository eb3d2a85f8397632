use ndarray::{Array1, Array2};

use crate::error::{DEError, Result};

/// Objective wrapper enforcing the search box and counting evaluations.
///
/// A point with any element outside `[lower, upper]` scores `+inf` and the
/// user function is not called. A NaN or infinite value returned for an
/// in-bounds point is an [`DEError::ObjectiveFailure`].
pub struct BoundedObjective<'a, F>
where
    F: Fn(&Array1<f64>) -> f64,
{
    func: &'a F,
    lower: &'a Array1<f64>,
    upper: &'a Array1<f64>,
    nfev: usize,
}

impl<'a, F> BoundedObjective<'a, F>
where
    F: Fn(&Array1<f64>) -> f64,
{
    pub fn new(func: &'a F, lower: &'a Array1<f64>, upper: &'a Array1<f64>) -> Self {
        Self { func, lower, upper, nfev: 0 }
    }

    /// Number of calls made to the user function.
    pub fn nfev(&self) -> usize {
        self.nfev
    }

    pub fn in_bounds(&self, x: &Array1<f64>) -> bool {
        x.iter()
            .zip(self.lower.iter().zip(self.upper.iter()))
            .all(|(&v, (&lo, &hi))| v >= lo && v <= hi)
    }

    pub fn evaluate(&mut self, x: &Array1<f64>) -> Result<f64> {
        if !self.in_bounds(x) {
            return Ok(f64::INFINITY);
        }
        self.nfev += 1;
        let value = (self.func)(x);
        if !value.is_finite() {
            return Err(DEError::ObjectiveFailure { value, candidate: x.to_vec() });
        }
        Ok(value)
    }

    /// Score every row of `pop`, stopping at the first failure.
    pub fn evaluate_population(&mut self, pop: &Array2<f64>) -> Result<Array1<f64>> {
        let mut scores = Array1::zeros(pop.nrows());
        for (i, row) in pop.rows().into_iter().enumerate() {
            scores[i] = self.evaluate(&row.to_owned())?;
        }
        Ok(scores)
    }
}
