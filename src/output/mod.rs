// Output artifacts: CSV writers/readers and terminal summaries.

pub mod csv;
pub mod terminal;

use chrono::Local;

/// Compact local timestamp for output file names (e.g. `20260829143000`).
pub fn timestamp_slug() -> String {
    Local::now().format("%Y%m%d%H%M%S").to_string()
}

/// Timestamp used for the default output directory name.
pub fn run_dir_slug() -> String {
    Local::now().format("%Y-%m-%d_%H%M").to_string()
}
