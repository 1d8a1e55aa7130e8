// Model invocation: glue between the document-term matrix and the
// external fitting routine.

pub mod results;
pub mod rscript;
pub mod traits;

use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::corpus::authors::AuthorRange;
use crate::output::timestamp_slug;
use crate::vectorizer::DocumentTermMatrix;

use self::traits::{FittedTopics, VonmonFitter};

/// Invoke the fitting routine and validate what comes back.
///
/// Author ranges are converted to 1-indexing here; the R routine is
/// 1-based while everything on this side is 0-based. The raw fitted
/// model is persisted to a timestamped JSON dump in `output_dir` before
/// any shaping, so a crash later in the pipeline never loses the fit.
/// A dimension mismatch is fatal; nothing beyond the dump is saved.
pub fn fit_topics(
    fitter: &dyn VonmonFitter,
    dtm: &DocumentTermMatrix,
    ranges: &[AuthorRange],
    ncats: usize,
    kappa: f64,
    verbose: bool,
    output_dir: &Path,
) -> Result<FittedTopics> {
    let term_doc = dtm.to_dense();
    let authors_one_indexed: Vec<(usize, usize)> = ranges
        .iter()
        .map(|range| (range.start + 1, range.end + 1))
        .collect();

    let fitted = fitter.fit(&term_doc, &authors_one_indexed, ncats, kappa, verbose)?;

    let dump_path = output_dir.join(format!("model_{}.json", timestamp_slug()));
    let dump = File::create(&dump_path)
        .with_context(|| format!("Failed to create model dump {}", dump_path.display()))?;
    serde_json::to_writer(dump, &fitted)
        .with_context(|| format!("Failed to write model dump {}", dump_path.display()))?;
    info!(path = %dump_path.display(), "Persisted raw fitted model");

    let (mus_terms, mus_topics) = fitted.mus.dim();
    let (theta_authors, theta_topics) = fitted.thetas.dim();
    if mus_terms != dtm.n_terms()
        || theta_authors != ranges.len()
        || mus_topics != ncats
        || theta_topics != ncats
    {
        anyhow::bail!(
            "Fitted model dimensions do not match the corpus: \
             mus is {mus_terms}x{mus_topics} (expected {}x{ncats}), \
             thetas is {theta_authors}x{theta_topics} (expected {}x{ncats})",
            dtm.n_terms(),
            ranges.len()
        );
    }

    Ok(fitted)
}
