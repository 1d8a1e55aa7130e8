use std::env;
use std::path::{Path, PathBuf};

use anyhow::Result;

/// Central configuration loaded from environment variables.
///
/// The .env file is loaded automatically at startup via dotenvy, so a
/// checked-out working copy can keep its R paths out of the shell profile.
pub struct Config {
    pub db_path: String,
    /// Path to the Rscript binary used to drive the fitting routine.
    pub rscript_bin: PathBuf,
    /// Path to the R source file defining `exp.agenda.vonmon`.
    pub vonmon_script: PathBuf,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Everything has a default; `retorica init` and `retorica status`
    /// work out of the box; `retorica model` additionally needs the R
    /// script to exist.
    pub fn load() -> Result<Self> {
        Ok(Self {
            db_path: env::var("RETORICA_DB_PATH").unwrap_or_else(|_| "./retorica.db".to_string()),
            rscript_bin: env::var("RETORICA_RSCRIPT")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("Rscript")),
            vonmon_script: env::var("RETORICA_VONMON_SCRIPT")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./r/ExpAgendVMVA.R")),
        })
    }

    /// Check that the R fitting routine is available.
    /// Call this before `retorica model` kicks off any heavy work.
    pub fn require_vonmon(&self) -> Result<()> {
        if !Path::new(&self.vonmon_script).exists() {
            anyhow::bail!(
                "R source not found at {}\n\
                 Set RETORICA_VONMON_SCRIPT to the path of ExpAgendVMVA.R.",
                self.vonmon_script.display()
            );
        }
        Ok(())
    }
}
