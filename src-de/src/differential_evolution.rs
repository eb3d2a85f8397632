use crate::{DEConfig, DEReport, DifferentialEvolution, Result};
use ndarray::{Array1, Array2};

/// Convenience wrapper around [`DifferentialEvolution`]:
/// - `func`: objective function mapping x -> f(x)
/// - `bounds`: vector of (lower, upper) pairs
/// - `population`: starting candidates, one per row
/// - `config`: DE configuration
pub fn differential_evolution<F>(
	func: &F,
	bounds: &[(f64, f64)],
	population: Array2<f64>,
	config: DEConfig,
) -> Result<DEReport>
where
	F: Fn(&Array1<f64>) -> f64,
{
	let lower: Array1<f64> = bounds.iter().map(|&(lo, _)| lo).collect();
	let upper: Array1<f64> = bounds.iter().map(|&(_, hi)| hi).collect();
	let mut de = DifferentialEvolution::new(func, lower, upper);
	*de.config_mut() = config;
	de.solve(population)
}
