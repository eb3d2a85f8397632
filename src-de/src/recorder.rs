use std::fs::create_dir_all;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::history::History;

/// Writes a finished run's history to CSV files.
#[derive(Debug, Clone)]
pub struct OptimizationRecorder {
    /// Function name (used for CSV filenames)
    function_name: String,
    /// Output directory for CSV files
    output_dir: PathBuf,
}

/// Summary of one generation
#[derive(Debug, Clone, PartialEq)]
pub struct OptimizationRecord {
    /// Generation number, 0 for the seed population
    pub iteration: usize,
    /// Best x found so far
    pub x: Vec<f64>,
    /// Best function result so far
    pub best_result: f64,
    pub mean_cr: f64,
    pub mean_f: f64,
    /// Trials accepted in this generation
    pub accepted: usize,
    /// Whether this generation improved the best known result
    pub is_improvement: bool,
}

impl OptimizationRecorder {
    /// Recorder writing under `$DEFLEX_DIR/data_generated/records`
    pub fn new(function_name: impl Into<String>) -> Result<Self> {
        Ok(Self::with_output_dir(function_name, deflex_env::get_records_dir()?))
    }

    pub fn with_output_dir(function_name: impl Into<String>, output_dir: impl AsRef<Path>) -> Self {
        Self { function_name: function_name.into(), output_dir: output_dir.as_ref().to_path_buf() }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// One summary record per generation.
    pub fn records(history: &History) -> Vec<OptimizationRecord> {
        let mut prev_best = f64::INFINITY;
        history
            .iter()
            .map(|r| {
                let is_improvement = r.generation == 0 || r.best_score < prev_best;
                prev_best = r.best_score;
                OptimizationRecord {
                    iteration: r.generation,
                    x: r.best_member.to_vec(),
                    best_result: r.best_score,
                    mean_cr: r.mean_cr,
                    mean_f: r.mean_f,
                    accepted: r.accepted,
                    is_improvement,
                }
            })
            .collect()
    }

    /// Write `<name>.csv` (one row per generation) and `<name>_population.csv`
    /// (one row per candidate per generation). Returns both paths, summary first.
    pub fn save(&self, history: &History) -> Result<Vec<PathBuf>> {
        create_dir_all(&self.output_dir)?;
        let summary = self.output_dir.join(format!("{}.csv", self.function_name));
        let population = self.output_dir.join(format!("{}_population.csv", self.function_name));
        self.write_summary(history, &summary)?;
        self.write_population(history, &population)?;
        log::info!("recorded {} generations to {}", history.len(), summary.display());
        Ok(vec![summary, population])
    }

    fn write_summary(&self, history: &History, path: &Path) -> Result<()> {
        let mut wtr = csv::Writer::from_path(path)?;
        let dim = history.best_member().map_or(0, |b| b.len());

        let mut header = vec!["iteration".to_string()];
        header.extend((0..dim).map(|i| format!("x{}", i)));
        header.extend(
            ["best_result", "mean_cr", "mean_f", "accepted", "is_improvement"].map(String::from),
        );
        wtr.write_record(&header)?;

        for rec in Self::records(history) {
            let mut row = vec![rec.iteration.to_string()];
            row.extend(rec.x.iter().map(|v| format!("{:.16}", v)));
            row.push(format!("{:.16}", rec.best_result));
            row.push(format!("{:.16}", rec.mean_cr));
            row.push(format!("{:.16}", rec.mean_f));
            row.push(rec.accepted.to_string());
            row.push(rec.is_improvement.to_string());
            wtr.write_record(&row)?;
        }
        wtr.flush()?;
        Ok(())
    }

    fn write_population(&self, history: &History, path: &Path) -> Result<()> {
        let mut wtr = csv::Writer::from_path(path)?;
        let dim = history.final_population().map_or(0, |p| p.ncols());

        let mut header = vec!["generation".to_string(), "member".to_string()];
        header.extend((0..dim).map(|i| format!("x{}", i)));
        header.push("score".to_string());
        wtr.write_record(&header)?;

        for rec in history {
            for (i, (row, score)) in rec.population.rows().into_iter().zip(rec.scores.iter()).enumerate() {
                let mut out = vec![rec.generation.to_string(), i.to_string()];
                out.extend(row.iter().map(|v| format!("{:.16}", v)));
                out.push(format!("{:.16}", score));
                wtr.write_record(&out)?;
            }
        }
        wtr.flush()?;
        Ok(())
    }
}
