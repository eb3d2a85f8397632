//! Run differential evolution and write its history to CSV.

use std::path::{Path, PathBuf};

use ndarray::{Array1, Array2};

use crate::recorder::OptimizationRecorder;
use crate::{DEConfig, DEReport, Result, differential_evolution};

/// Run differential evolution and record every generation.
///
/// Files go to `output_dir`, or to the `deflex-env` records directory when
/// `None`. Returns the report and the path of the per-generation summary CSV.
pub fn run_recorded_differential_evolution<F>(
    function_name: &str,
    func: &F,
    bounds: &[(f64, f64)],
    population: Array2<f64>,
    config: DEConfig,
    output_dir: Option<&Path>,
) -> Result<(DEReport, PathBuf)>
where
    F: Fn(&Array1<f64>) -> f64,
{
    let recorder = match output_dir {
        Some(dir) => OptimizationRecorder::with_output_dir(function_name, dir),
        None => OptimizationRecorder::new(function_name)?,
    };

    let report = differential_evolution(func, bounds, population, config)?;
    let paths = recorder.save(&report.history)?;

    let csv_path = match paths.into_iter().next() {
        Some(p) => p,
        None => recorder.output_dir().join(format!("{}.csv", function_name)),
    };
    Ok((report, csv_path))
}
