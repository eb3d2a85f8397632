//! Self-adaptive Differential Evolution (DE) in pure Rust using ndarray
//!
//! Minimizes a black-box objective over a box `[lower, upper]`, starting from a
//! caller-supplied population, and returns the full generation history.
//!
//! Supported features:
//! - Best/1 mutation with per-element jitter and cyclic crossover (default)
//! - Classic DE/rand|best/k/bin strategies on the same engine
//! - Per-candidate CR ~ Normal and F ~ Cauchy draws, adapted from accepted trials
//! - Boundary repair by clipping or random bounce-back
//! - Optional quantization of trial elements to a fixed step
//! - Fixed iteration budget or an external termination predicate
//! - Reproducible runs from a seed

#![allow(missing_docs)]
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use ndarray::{Array1, Array2};
use rand::Rng;
use serde::{Deserialize, Serialize};

pub mod adaptive_control;
pub mod apply_precision;
pub mod bounded_objective;
pub mod deviates;
pub mod error;
pub mod history;
pub mod repair_bounds;
pub mod termination;

mod crossover_binomial;
mod distinct_indices;
mod generation;
mod init_latin_hypercube;
mod init_random;
mod mutant_classic;
mod trial_best1_jitter;

pub mod differential_evolution;
pub mod recorder;
pub mod run_recorded;

pub use adaptive_control::{AdaptiveController, SuccessAccumulator, TrialParams};
pub use bounded_objective::BoundedObjective;
pub use deviates::{Deviates, SeededDeviates};
pub use differential_evolution::differential_evolution;
pub use error::{DEError, Result};
pub use history::{GenerationRecord, History};
pub use recorder::{OptimizationRecord, OptimizationRecorder};
pub use repair_bounds::BoundaryPolicy;
pub use run_recorded::run_recorded_differential_evolution;
pub use termination::TerminationPredicate;

use generation::{TrialSettings, next_generation};
use termination::should_stop;

pub(crate) fn argmin(v: &Array1<f64>) -> (usize, f64) {
	let mut best_i = 0usize;
	let mut best_v = v[0];
	for (i, &val) in v.iter().enumerate() {
		if val < best_v {
			best_v = val;
			best_i = i;
		}
	}
	(best_i, best_v)
}

/// Base vector of a classic DE/x/y mutant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BaseVector {
	/// A random population member, distinct from the target and the difference vectors
	Rand,
	/// The best member at the start of the generation
	Best,
}

/// Differential Evolution strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Strategy {
	/// Best/1 with jitter and cyclic crossover
	#[default]
	JitterBest,
	/// DE/`base`/`pairs`/bin
	Classic { base: BaseVector, pairs: usize },
}

impl Strategy {
	/// Number of distinct population indices drawn per candidate
	pub fn required_indices(&self) -> usize {
		match *self {
			Strategy::JitterBest => 2,
			Strategy::Classic { base, pairs } => 2 * pairs + usize::from(base == BaseVector::Rand),
		}
	}

	/// Smallest population the strategy can run on: the target plus its index draws
	pub fn min_popsize(&self) -> usize {
		self.required_indices() + 1
	}
}

impl FromStr for Strategy {
	type Err = String;
	fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
		let t = s.to_lowercase();
		match t.as_str() {
			"jitterbest" | "jitter-best" | "jitter_best" | "best1jitter" | "adaptive" => {
				return Ok(Strategy::JitterBest);
			}
			_ => {}
		}
		let (base, rest) = if let Some(rest) = t.strip_prefix("rand") {
			(BaseVector::Rand, rest)
		} else if let Some(rest) = t.strip_prefix("best") {
			(BaseVector::Best, rest)
		} else {
			return Err(format!("unknown strategy: {}", s));
		};
		let digits = rest.strip_suffix("bin").unwrap_or(rest);
		match digits.parse::<usize>() {
			Ok(pairs) if pairs > 0 => Ok(Strategy::Classic { base, pairs }),
			_ => Err(format!("unknown strategy: {}", s)),
		}
	}
}

impl fmt::Display for Strategy {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match *self {
			Strategy::JitterBest => write!(f, "jitterbest"),
			Strategy::Classic { base: BaseVector::Rand, pairs } => write!(f, "rand{}bin", pairs),
			Strategy::Classic { base: BaseVector::Best, pairs } => write!(f, "best{}bin", pairs),
		}
	}
}

impl TryFrom<String> for Strategy {
	type Error = String;
	fn try_from(s: String) -> std::result::Result<Self, Self::Error> {
		s.parse()
	}
}

impl From<Strategy> for String {
	fn from(s: Strategy) -> Self {
		s.to_string()
	}
}

/// Initialization scheme for a starting population
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Init {
	#[default]
	LatinHypercube,
	Random,
}

impl FromStr for Init {
	type Err = String;
	fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
		match s.to_lowercase().as_str() {
			"lhs" | "latinhypercube" | "latin-hypercube" | "latin_hypercube" => {
				Ok(Init::LatinHypercube)
			}
			"random" | "uniform" => Ok(Init::Random),
			_ => Err(format!("unknown init: {}", s)),
		}
	}
}

/// Sample `npop` in-bounds candidates with the given scheme.
pub fn initial_population<R: Rng + ?Sized>(
	init: Init,
	npop: usize,
	lower: &Array1<f64>,
	upper: &Array1<f64>,
	rng: &mut R,
) -> Array2<f64> {
	match init {
		Init::LatinHypercube => init_latin_hypercube::init_latin_hypercube(npop, lower, upper, rng),
		Init::Random => init_random::init_random(npop, lower, upper, rng),
	}
}

/// Configuration for the Differential Evolution optimizer
#[derive(Serialize, Deserialize)]
#[serde(default)]
pub struct DEConfig {
	/// Generation budget, used when no termination predicate is set
	pub maxiter: usize,
	/// Base crossover rate CR in [0, 1]
	pub recombination: f64,
	/// Base mutation factor F > 0
	pub mutation: f64,
	/// Adaptation speed c in [0, 1]; 0 keeps CR and F fixed
	pub adaptation: f64,
	/// Jitter factor jf >= 0 added to F per element
	pub jitter: f64,
	pub boundary: BoundaryPolicy,
	/// Quantization step; 0 disables it
	pub precision: f64,
	pub strategy: Strategy,
	pub seed: Option<u64>,
	/// Optional stop rule replacing `maxiter`
	#[serde(skip)]
	pub termination: Option<TerminationPredicate>,
}

impl Default for DEConfig {
	fn default() -> Self {
		Self {
			maxiter: 1000,
			recombination: 0.9,
			mutation: 0.8,
			adaptation: 0.1,
			jitter: 0.0,
			boundary: BoundaryPolicy::Clip,
			precision: 0.0,
			strategy: Strategy::JitterBest,
			seed: None,
			termination: None,
		}
	}
}

impl fmt::Debug for DEConfig {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("DEConfig")
			.field("maxiter", &self.maxiter)
			.field("recombination", &self.recombination)
			.field("mutation", &self.mutation)
			.field("adaptation", &self.adaptation)
			.field("jitter", &self.jitter)
			.field("boundary", &self.boundary)
			.field("precision", &self.precision)
			.field("strategy", &self.strategy)
			.field("seed", &self.seed)
			.field("termination", &self.termination.is_some())
			.finish()
	}
}

impl DEConfig {
	/// Load a configuration from a JSON file; missing fields keep their defaults.
	pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
		let text = fs::read_to_string(path)?;
		Ok(serde_json::from_str(&text)?)
	}

	/// Check parameter ranges.
	pub fn validate(&self) -> Result<()> {
		if !(0.0..=1.0).contains(&self.recombination) {
			return Err(DEError::InvalidCrossoverRate { rate: self.recombination });
		}
		if !(self.mutation.is_finite() && self.mutation > 0.0) {
			return Err(DEError::InvalidMutationFactor { factor: self.mutation });
		}
		if !(0.0..=1.0).contains(&self.adaptation) {
			return Err(DEError::InvalidAdaptationRate { rate: self.adaptation });
		}
		if !(self.jitter.is_finite() && self.jitter >= 0.0) {
			return Err(DEError::InvalidJitter { jitter: self.jitter });
		}
		if !(self.precision.is_finite() && self.precision >= 0.0) {
			return Err(DEError::InvalidPrecision { step: self.precision });
		}
		Ok(())
	}
}

/// Fluent builder for `DEConfig` for ergonomic configuration.
#[derive(Default)]
pub struct DEConfigBuilder {
	cfg: DEConfig,
}
impl DEConfigBuilder {
	pub fn new() -> Self {
		Self { cfg: DEConfig::default() }
	}
	pub fn maxiter(mut self, v: usize) -> Self {
		self.cfg.maxiter = v;
		self
	}
	pub fn recombination(mut self, v: f64) -> Self {
		self.cfg.recombination = v;
		self
	}
	pub fn mutation(mut self, v: f64) -> Self {
		self.cfg.mutation = v;
		self
	}
	pub fn adaptation(mut self, v: f64) -> Self {
		self.cfg.adaptation = v;
		self
	}
	pub fn jitter(mut self, v: f64) -> Self {
		self.cfg.jitter = v;
		self
	}
	pub fn boundary(mut self, v: BoundaryPolicy) -> Self {
		self.cfg.boundary = v;
		self
	}
	pub fn bounce_back(mut self, v: bool) -> Self {
		self.cfg.boundary = BoundaryPolicy::from_bounce_back(v);
		self
	}
	pub fn precision(mut self, v: f64) -> Self {
		self.cfg.precision = v;
		self
	}
	pub fn strategy(mut self, v: Strategy) -> Self {
		self.cfg.strategy = v;
		self
	}
	pub fn seed(mut self, v: u64) -> Self {
		self.cfg.seed = Some(v);
		self
	}
	pub fn termination<P>(mut self, pred: P) -> Self
	where
		P: FnMut(usize) -> Option<bool> + 'static,
	{
		self.cfg.termination = Some(Box::new(pred));
		self
	}
	pub fn build(self) -> DEConfig {
		self.cfg
	}
}

/// Result/Report of a DE optimization run
#[derive(Clone)]
pub struct DEReport {
	/// Best member found
	pub x: Array1<f64>,
	/// Score of `x`
	pub fun: f64,
	/// Generations computed after the seed generation
	pub nit: usize,
	/// Calls made to the objective, including the seed evaluation
	pub nfev: usize,
	pub message: String,
	pub history: History,
}

impl DEReport {
	pub fn final_population(&self) -> Option<&Array2<f64>> {
		self.history.final_population()
	}

	pub fn final_scores(&self) -> Option<&Array1<f64>> {
		self.history.final_scores()
	}
}

impl fmt::Debug for DEReport {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("DEReport")
			.field("x", &format!("len={}", self.x.len()))
			.field("fun", &self.fun)
			.field("message", &self.message)
			.field("nit", &self.nit)
			.field("nfev", &self.nfev)
			.field("history", &format!("{} generations", self.history.len()))
			.finish()
	}
}

/// Differential Evolution optimizer
pub struct DifferentialEvolution<'a, F>
where
	F: Fn(&Array1<f64>) -> f64,
{
	func: &'a F,
	lower: Array1<f64>,
	upper: Array1<f64>,
	config: DEConfig,
}

impl<'a, F> DifferentialEvolution<'a, F>
where
	F: Fn(&Array1<f64>) -> f64,
{
	/// Create a new DE optimizer with objective `func` and bounds [lower, upper]
	pub fn new(func: &'a F, lower: Array1<f64>, upper: Array1<f64>) -> Self {
		Self { func, lower, upper, config: DEConfig::default() }
	}

	/// Mutable access to configuration
	pub fn config_mut(&mut self) -> &mut DEConfig {
		&mut self.config
	}

	pub fn config(&self) -> &DEConfig {
		&self.config
	}

	/// Evaluate `population` and evolve it with a deviate stream seeded from the config.
	pub fn solve(&mut self, population: Array2<f64>) -> Result<DEReport> {
		let mut deviates = SeededDeviates::from_seed(self.config.seed);
		self.run(population, None, &mut deviates)
	}

	/// Evolve `population` whose scores are already known.
	pub fn solve_evaluated(
		&mut self,
		population: Array2<f64>,
		scores: Array1<f64>,
	) -> Result<DEReport> {
		let mut deviates = SeededDeviates::from_seed(self.config.seed);
		self.run(population, Some(scores), &mut deviates)
	}

	/// Evaluate and evolve `population`, drawing every random number from `deviates`.
	pub fn solve_with_deviates<D: Deviates + ?Sized>(
		&mut self,
		population: Array2<f64>,
		deviates: &mut D,
	) -> Result<DEReport> {
		self.run(population, None, deviates)
	}

	fn check_inputs(&self, population: &Array2<f64>, scores: Option<&Array1<f64>>) -> Result<()> {
		let d = self.lower.len();
		if d != self.upper.len() {
			return Err(DEError::BoundsMismatch { lower_len: d, upper_len: self.upper.len() });
		}
		if d == 0 {
			return Err(DEError::ZeroDimension);
		}
		if population.nrows() == 0 {
			return Err(DEError::EmptyPopulation);
		}
		if population.ncols() != d {
			return Err(DEError::PopulationDimensionMismatch { expected: d, got: population.ncols() });
		}
		if let Some(s) = scores {
			if s.len() != population.nrows() {
				return Err(DEError::ScoresLengthMismatch {
					expected: population.nrows(),
					got: s.len(),
				});
			}
			// +inf is a valid score for an infeasible point; NaN would never be replaced
			if let Some((index, &score)) = s.iter().enumerate().find(|(_, v)| v.is_nan()) {
				return Err(DEError::InvalidScore { index, score });
			}
		}
		let required = self.config.strategy.min_popsize();
		if population.nrows() < required {
			return Err(DEError::PopulationTooSmall { pop_size: population.nrows(), required });
		}
		self.config.validate()
	}

	fn run<D: Deviates + ?Sized>(
		&mut self,
		population: Array2<f64>,
		scores: Option<Array1<f64>>,
		deviates: &mut D,
	) -> Result<DEReport> {
		self.check_inputs(&population, scores.as_ref())?;

		let mut termination = self.config.termination.take();
		let outcome = self.evolve(population, scores, termination.as_mut(), deviates);
		self.config.termination = termination;
		let (history, nfev, message) = outcome?;

		let (x, fun) = match history.last() {
			Some(last) => (last.best_member.clone(), last.best_score),
			None => return Err(DEError::EmptyPopulation),
		};
		log::info!("DE finished: {} (best={:.6e}, nfev={})", message, fun, nfev);

		Ok(DEReport { x, fun, nit: history.len() - 1, nfev, message, history })
	}

	fn evolve<D: Deviates + ?Sized>(
		&self,
		population: Array2<f64>,
		scores: Option<Array1<f64>>,
		mut termination: Option<&mut TerminationPredicate>,
		deviates: &mut D,
	) -> Result<(History, usize, String)> {
		let cfg = &self.config;
		let mut objective = BoundedObjective::new(self.func, &self.lower, &self.upper);
		let scores = match scores {
			Some(s) => s,
			None => objective.evaluate_population(&population)?,
		};

		let mut controller = AdaptiveController::new(cfg.recombination, cfg.mutation, cfg.adaptation);
		let settings = TrialSettings {
			strategy: cfg.strategy,
			jitter: cfg.jitter,
			boundary: cfg.boundary,
			precision: cfg.precision,
		};

		let (best_i, best_score) = argmin(&scores);
		let mut history = History::new();
		history.push(GenerationRecord {
			generation: 0,
			best_member: population.row(best_i).to_owned(),
			population,
			scores,
			best_score,
			mean_cr: controller.mean_cr(),
			mean_f: controller.mean_f(),
			accepted: 0,
		});

		log::info!(
			"DE start: strategy={} dim={} popsize={} best={:.6e}",
			cfg.strategy,
			self.lower.len(),
			history.last().map_or(0, |r| r.population.nrows()),
			best_score
		);

		loop {
			let generation = history.len();
			if should_stop(termination.as_deref_mut(), generation, cfg.maxiter) {
				let message = if termination.is_some() {
					format!("Stopped by termination predicate before generation {}", generation)
				} else {
					format!("Maximum iterations reached: {}", cfg.maxiter)
				};
				return Ok((history, objective.nfev(), message));
			}
			let next = match history.last() {
				Some(prev) => next_generation(
					prev,
					&settings,
					&mut controller,
					&mut objective,
					&self.lower,
					&self.upper,
					deviates,
				)?,
				None => return Err(DEError::EmptyPopulation),
			};
			history.push(next);
		}
	}
}

#[cfg(test)]
mod strategy_tests {
	use super::*;

	#[test]
	fn test_parse_strategy_variants() {
		assert_eq!("jitterbest".parse::<Strategy>().unwrap(), Strategy::JitterBest);
		assert_eq!(
			"rand1bin".parse::<Strategy>().unwrap(),
			Strategy::Classic { base: BaseVector::Rand, pairs: 1 }
		);
		assert_eq!(
			"Best2".parse::<Strategy>().unwrap(),
			Strategy::Classic { base: BaseVector::Best, pairs: 2 }
		);
		assert!("rand0bin".parse::<Strategy>().is_err());
		assert!("currenttobest1bin".parse::<Strategy>().is_err());
	}

	#[test]
	fn test_strategy_display_parses_back() {
		for name in ["jitterbest", "rand1bin", "rand2bin", "best1bin", "best2bin"] {
			let s: Strategy = name.parse().unwrap();
			assert_eq!(s.to_string(), name);
		}
	}

	#[test]
	fn test_min_popsize() {
		assert_eq!(Strategy::JitterBest.min_popsize(), 3);
		assert_eq!("rand1bin".parse::<Strategy>().unwrap().min_popsize(), 4);
		assert_eq!("best2bin".parse::<Strategy>().unwrap().min_popsize(), 5);
		assert_eq!("rand2bin".parse::<Strategy>().unwrap().min_popsize(), 6);
	}
}
