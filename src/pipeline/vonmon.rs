// The model run: speech file -> corpus -> document-term matrix -> fit
// -> CSV artifacts.
//
// Single-threaded, single-pass batch. A failure at any stage aborts the
// whole run; the only state on disk is whatever artifacts were already
// written, which is acceptable for a single-operator batch job.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use crate::corpus::authors::build_author_ranges;
use crate::corpus::grouping::{split_corpus, PluralAuthors};
use crate::corpus::reader::SpeechFile;
use crate::model::fit_topics;
use crate::model::results::{author_emphases, top_topic_words, topic_proportions};
use crate::model::traits::VonmonFitter;
use crate::output::csv;
use crate::output::timestamp_slug;
use crate::vectorizer::CountVectorizer;

/// Parameters for one model run.
pub struct ModelArgs {
    pub docsfile: PathBuf,
    /// Minimum document frequency, as a fraction of the corpus.
    pub mindf: f64,
    /// Maximum document frequency; exactly 1.0 means no upper cutoff.
    pub maxdf: f64,
    pub ncats: usize,
    pub kappa: f64,
    pub verbose: bool,
    pub output_dir: PathBuf,
}

/// What the run produced, for the terminal summary.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub records: usize,
    pub documents: usize,
    pub authors: usize,
    pub terms: usize,
    pub topics: usize,
    pub output_dir: PathBuf,
}

/// Run the whole pipeline and write every artifact into `output_dir`.
pub fn run(fitter: &dyn VonmonFitter, args: &ModelArgs) -> Result<RunSummary> {
    // Create the output directory before any heavy work so a permission
    // problem surfaces immediately. Already existing is fine.
    fs::create_dir_all(&args.output_dir).with_context(|| {
        format!(
            "Failed to create output directory {}",
            args.output_dir.display()
        )
    })?;

    let speeches = SpeechFile::open(&args.docsfile)?;
    let record_count = speeches.len();
    info!(records = record_count, file = %args.docsfile.display(), "Reading speeches");

    let progress = ProgressBar::new(record_count as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("  Reading [{bar:30}] {pos}/{len} ({eta})")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    let pairs = speeches.records()?.map(|record| {
        progress.inc(1);
        record.map(|r| (r.author, r.document_text))
    });
    let (author_labels, documents) = split_corpus(PluralAuthors::new(pairs))?;
    progress.finish_and_clear();

    if documents.is_empty() {
        anyhow::bail!(
            "No documents survived grouping; every author in {} has a single speech",
            args.docsfile.display()
        );
    }

    info!("Building the document-term matrix...");
    let vectorizer = CountVectorizer::from_fractions(args.mindf, args.maxdf);
    let dtm = vectorizer.fit_transform(&documents)?;
    info!(
        documents = dtm.n_docs(),
        terms = dtm.n_terms(),
        "Document-term matrix built"
    );

    let ranges = build_author_ranges(&author_labels)?;

    let authors_path = args
        .output_dir
        .join(format!("authors_{}.csv", timestamp_slug()));
    csv::write_author_ranges(&authors_path, &ranges)?;

    let fitted = fit_topics(
        fitter,
        &dtm,
        &ranges,
        args.ncats,
        args.kappa,
        args.verbose,
        &args.output_dir,
    )?;

    // Raw model matrices, with meaningful row labels
    let author_names: Vec<String> = ranges.iter().map(|r| r.author.clone()).collect();
    csv::write_labelled_matrix(
        &args.output_dir.join("mus.csv"),
        "term",
        &dtm.vocabulary,
        &fitted.mus,
    )?;
    csv::write_labelled_matrix(
        &args.output_dir.join("thetas.csv"),
        "author",
        &author_names,
        &fitted.thetas,
    )?;

    // Shaped results
    let proportions = topic_proportions(&fitted.thetas)?;
    let emphases = author_emphases(&ranges, &proportions)?;
    csv::write_result(&args.output_dir.join("result.csv"), &emphases)?;

    let words = top_topic_words(&fitted.mus, &dtm.vocabulary);
    csv::write_words(&args.output_dir.join("words.csv"), &words)?;

    Ok(RunSummary {
        records: record_count,
        documents: dtm.n_docs(),
        authors: ranges.len(),
        terms: dtm.n_terms(),
        topics: args.ncats,
        output_dir: args.output_dir.clone(),
    })
}
