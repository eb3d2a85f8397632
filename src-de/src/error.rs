//! Error types for the deflex Differential Evolution optimizer.
//!
//! Configuration problems are reported before the first generation runs.
//! Objective failures abort the run; no partial history is returned.

use thiserror::Error;

/// Errors that can occur during Differential Evolution optimization.
#[derive(Debug, Error)]
pub enum DEError {
    /// The initial population has no rows.
    #[error("initial population is empty")]
    EmptyPopulation,

    /// Bounds have length zero, so there is nothing to optimize.
    #[error("problem dimension is zero (empty bounds)")]
    ZeroDimension,

    /// Lower and upper bounds have different lengths.
    #[error("bounds mismatch: lower has {lower_len} elements, upper has {upper_len}")]
    BoundsMismatch {
        /// Length of the lower bounds array
        lower_len: usize,
        /// Length of the upper bounds array
        upper_len: usize,
    },

    /// Population columns do not match the bounds dimension.
    #[error("population dimension mismatch: bounds have {expected} elements, candidates have {got}")]
    PopulationDimensionMismatch {
        /// Dimension implied by the bounds
        expected: usize,
        /// Number of columns of the population
        got: usize,
    },

    /// Caller-provided scores do not line up with the population rows.
    #[error("scores length mismatch: population has {expected} rows, got {got} scores")]
    ScoresLengthMismatch {
        /// Number of population rows
        expected: usize,
        /// Number of scores provided
        got: usize,
    },

    /// A caller-provided score is NaN.
    #[error("invalid score {score} for candidate {index} (must not be NaN)")]
    InvalidScore {
        /// Row of the offending candidate
        index: usize,
        /// The score provided
        score: f64,
    },

    /// Not enough candidates to draw the distinct indices the strategy needs.
    #[error("population size ({pop_size}) must be >= {required} for this strategy")]
    PopulationTooSmall {
        /// The invalid population size
        pop_size: usize,
        /// Minimum population size for the configured strategy
        required: usize,
    },

    /// Crossover rate is out of valid range [0, 1].
    #[error("invalid crossover rate: {rate} (must be in [0, 1])")]
    InvalidCrossoverRate {
        /// The invalid crossover rate
        rate: f64,
    },

    /// Mutation factor is not a finite positive number.
    #[error("invalid mutation factor: {factor} (must be finite and > 0)")]
    InvalidMutationFactor {
        /// The invalid mutation factor
        factor: f64,
    },

    /// Adaptation speed is out of valid range [0, 1].
    #[error("invalid adaptation rate: {rate} (must be in [0, 1])")]
    InvalidAdaptationRate {
        /// The invalid adaptation speed `c`
        rate: f64,
    },

    /// Jitter factor is negative or not finite.
    #[error("invalid jitter factor: {jitter} (must be finite and >= 0)")]
    InvalidJitter {
        /// The invalid jitter factor
        jitter: f64,
    },

    /// Precision step is negative or not finite.
    #[error("invalid precision step: {step} (must be finite and >= 0)")]
    InvalidPrecision {
        /// The invalid quantization step
        step: f64,
    },

    /// The objective returned a non-finite value for an in-bounds candidate.
    #[error(
        "objective returned non-finite value {value} for in-bounds candidate {candidate:?}; perhaps adjust the bounds"
    )]
    ObjectiveFailure {
        /// The value returned by the objective
        value: f64,
        /// The candidate that was evaluated
        candidate: Vec<f64>,
    },

    /// The Cauchy draw for the mutation factor never produced a positive value.
    #[error("no positive mutation factor after {attempts} Cauchy draws around mean {mean_f}")]
    MutationDrawExhausted {
        /// Number of draws attempted
        attempts: usize,
        /// Location of the Cauchy distribution
        mean_f: f64,
    },

    /// I/O failure while reading a configuration or writing a record.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// CSV failure while writing a record.
    #[error(transparent)]
    Csv(#[from] csv::Error),

    /// JSON failure while reading a configuration or exporting a history.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// The records directory could not be resolved.
    #[error(transparent)]
    Env(#[from] deflex_env::EnvError),
}

/// A specialized `Result` type for DE operations.
pub type Result<T> = std::result::Result<T, DEError>;

impl DEError {
    /// Returns `true` if this is a parameter or population-size error.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            DEError::EmptyPopulation
                | DEError::InvalidScore { .. }
                | DEError::PopulationTooSmall { .. }
                | DEError::InvalidCrossoverRate { .. }
                | DEError::InvalidMutationFactor { .. }
                | DEError::InvalidAdaptationRate { .. }
                | DEError::InvalidJitter { .. }
                | DEError::InvalidPrecision { .. }
        )
    }

    /// Returns `true` if this is a dimension mismatch error.
    pub fn is_dimension_error(&self) -> bool {
        matches!(
            self,
            DEError::ZeroDimension
                | DEError::BoundsMismatch { .. }
                | DEError::PopulationDimensionMismatch { .. }
                | DEError::ScoresLengthMismatch { .. }
        )
    }

    /// Returns `true` if the error happened while generations were running.
    pub fn is_runtime_error(&self) -> bool {
        matches!(
            self,
            DEError::ObjectiveFailure { .. } | DEError::MutationDrawExhausted { .. }
        )
    }
}
