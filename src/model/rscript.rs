// RScriptFitter drives `exp.agenda.vonmon` through an Rscript
// subprocess with a CSV handoff.
//
// The matrices cross the boundary as headerless-friendly CSV rather
// than an in-process bridge: write term_doc.csv and authors.csv into a
// work directory, run a small generated driver expression that sources
// ExpAgendVMVA.R, fits, saveRDS's the native model object, and writes
// mus.csv / thetas.csv back for this side to reload.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{Context, Result};
use ndarray::Array2;
use tracing::{debug, info};

use crate::output::csv::{read_matrix, write_matrix_rows};
use crate::output::timestamp_slug;

use super::traits::{FittedTopics, VonmonFitter};

pub struct RScriptFitter {
    rscript_bin: PathBuf,
    vonmon_script: PathBuf,
    /// Where the handoff CSVs and the saved .rds land.
    work_dir: PathBuf,
}

impl RScriptFitter {
    pub fn new(rscript_bin: &Path, vonmon_script: &Path, work_dir: &Path) -> Self {
        Self {
            rscript_bin: rscript_bin.to_path_buf(),
            vonmon_script: vonmon_script.to_path_buf(),
            work_dir: work_dir.to_path_buf(),
        }
    }

    /// The generated R driver expression.
    fn driver(&self, ncats: usize, kappa: f64, verbose: bool) -> Result<String> {
        let script = self
            .vonmon_script
            .canonicalize()
            .with_context(|| {
                format!("R source not found at {}", self.vonmon_script.display())
            })?
            .display()
            .to_string()
            .replace('\\', "/");

        let verbose_flag = if verbose { "TRUE" } else { "FALSE" };
        Ok(format!(
            "term.doc <- as.matrix(read.csv('term_doc.csv', check.names = FALSE));\
             authors <- as.matrix(read.csv('authors.csv'));\
             source('{script}');\
             topics <- exp.agenda.vonmon(term.doc = term.doc, authors = authors, \
             n.cats = {ncats}, kappa = {kappa}, verbose = {verbose_flag});\
             saveRDS(topics, file = 'vonmon_{stamp}.rds');\
             write.csv(topics$mus, 'mus.csv', row.names = FALSE);\
             write.csv(topics$thetas, 'thetas.csv', row.names = FALSE)",
            stamp = timestamp_slug(),
        ))
    }
}

impl VonmonFitter for RScriptFitter {
    fn fit(
        &self,
        term_doc: &Array2<f64>,
        authors: &[(usize, usize)],
        ncats: usize,
        kappa: f64,
        verbose: bool,
    ) -> Result<FittedTopics> {
        fs::create_dir_all(&self.work_dir).with_context(|| {
            format!("Failed to create R work directory {}", self.work_dir.display())
        })?;

        write_fit_inputs(&self.work_dir, term_doc, authors)?;
        debug!(dir = %self.work_dir.display(), "Wrote fit inputs");

        let driver = self.driver(ncats, kappa, verbose)?;
        info!(ncats, kappa, "Calling exp.agenda.vonmon through Rscript");

        let output = Command::new(&self.rscript_bin)
            .arg("--vanilla")
            .arg("-e")
            .arg(&driver)
            .current_dir(&self.work_dir)
            .output()
            .with_context(|| format!("Failed to run {}", self.rscript_bin.display()))?;

        if !output.status.success() {
            anyhow::bail!(
                "exp.agenda.vonmon failed ({}):\n{}",
                output.status,
                String::from_utf8_lossy(&output.stderr)
            );
        }

        let mus = read_matrix(&self.work_dir.join("mus.csv"))
            .context("Failed to read mus.csv back from the R run")?;
        let thetas = read_matrix(&self.work_dir.join("thetas.csv"))
            .context("Failed to read thetas.csv back from the R run")?;

        Ok(FittedTopics { mus, thetas })
    }
}

/// Write the two input CSVs the driver expression expects.
///
/// `term_doc.csv` carries a synthetic `t<i>` header row (R's read.csv
/// wants one); `authors.csv` carries the already-1-indexed ranges.
fn write_fit_inputs(
    dir: &Path,
    term_doc: &Array2<f64>,
    authors: &[(usize, usize)],
) -> Result<()> {
    let term_header: Vec<String> = (0..term_doc.ncols()).map(|i| format!("t{i}")).collect();
    write_matrix_rows(
        &dir.join("term_doc.csv"),
        &term_header,
        term_doc.rows().into_iter().map(|row| row.to_vec()),
    )?;

    write_matrix_rows(
        &dir.join("authors.csv"),
        &["start".to_string(), "end".to_string()],
        authors
            .iter()
            .map(|&(start, end)| vec![start as f64, end as f64]),
    )?;

    Ok(())
}
