//! Environment variable utilities for deflex
//!
//! This module resolves the `DEFLEX_DIR` variable that points to the project
//! root and the `data_generated/records` directory below it.

use crate::constants::{DATA_GENERATED, DEFLEX_DIR_VAR, RECORDS};
use std::env;
use std::path::{Path, PathBuf};

/// Error type for environment variable issues
#[derive(Debug, thiserror::Error)]
pub enum EnvError {
    #[error(
        "DEFLEX_DIR environment variable is not set. Please set it to the deflex project root directory (e.g., export DEFLEX_DIR=/path/to/deflex)"
    )]
    DeflexDirNotSet,

    #[error("DEFLEX_DIR points to a non-existent directory: {0}")]
    DeflexDirNotFound(PathBuf),

    #[error("Failed to create directory {path}: {source}")]
    DirectoryCreationFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Get the `DEFLEX_DIR` environment variable and validate it exists
///
/// # Errors
///
/// Returns an error if:
/// - DEFLEX_DIR is not set
/// - DEFLEX_DIR points to a non-existent directory
///
/// # Example
///
/// ```no_run
/// use deflex_env::env_utils::get_deflex_dir;
///
/// let root = get_deflex_dir()?;
/// println!("deflex directory: {}", root.display());
/// # Ok::<(), deflex_env::env_utils::EnvError>(())
/// ```
pub fn get_deflex_dir() -> Result<PathBuf, EnvError> {
    let root = env::var(DEFLEX_DIR_VAR).map_err(|_| EnvError::DeflexDirNotSet)?;

    let path = PathBuf::from(root);

    if !path.exists() {
        return Err(EnvError::DeflexDirNotFound(path));
    }

    Ok(path)
}

fn ensure_dir(path: PathBuf) -> Result<PathBuf, EnvError> {
    if !path.exists() {
        std::fs::create_dir_all(&path)
            .map_err(|source| EnvError::DirectoryCreationFailed { path: path.clone(), source })?;
    }
    Ok(path)
}

/// Get the path to the data_generated directory, creating it if necessary
///
/// # Errors
///
/// Returns an error if DEFLEX_DIR is not set or invalid, or if the directory
/// cannot be created.
pub fn get_data_generated_dir() -> Result<PathBuf, EnvError> {
    let root = get_deflex_dir()?;
    ensure_dir(root.join(DATA_GENERATED))
}

/// Get the path to the records subdirectory within data_generated
///
/// This is the default destination of optimization records.
pub fn get_records_dir() -> Result<PathBuf, EnvError> {
    let data_generated = get_data_generated_dir()?;
    ensure_dir(data_generated.join(RECORDS))
}

/// Records directory below an explicit project root, creating it if needed
pub fn records_dir_in(root: &Path) -> Result<PathBuf, EnvError> {
    ensure_dir(root.join(DATA_GENERATED).join(RECORDS))
}
