//! Environment utilities and shared constants for deflex
//!
//! Binaries and recording helpers use this crate to locate the project root
//! (`DEFLEX_DIR`) and the directory where generated data is written.

pub mod constants;
pub mod env_utils;

pub use constants::{DATA_GENERATED, DEFLEX_DIR_VAR, RECORDS};
pub use env_utils::{
    EnvError, get_data_generated_dir, get_deflex_dir, get_records_dir, records_dir_in,
};
