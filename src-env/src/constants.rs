/// Name of the environment variable pointing at the deflex project root
pub const DEFLEX_DIR_VAR: &str = "DEFLEX_DIR";

/// Directory (relative to the project root) holding generated artefacts
pub const DATA_GENERATED: &str = "data_generated";

/// Subdirectory of `DATA_GENERATED` holding optimization records
pub const RECORDS: &str = "records";
