// Fitter trait: a swap-ready boundary around the statistical routine.
//
// The expressed-agenda von-Mises-Fisher model is an opaque numerical
// routine as far as this crate is concerned. The production backend
// shells out to R (rscript.rs); tests plug in deterministic fitters.

use anyhow::Result;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

/// Raw output of the fitting routine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FittedTopics {
    /// Term-by-topic loading matrix.
    pub mus: Array2<f64>,
    /// Author-by-topic weight matrix, rows in authors-matrix order.
    pub thetas: Array2<f64>,
}

/// Boundary around `exp.agenda.vonmon`.
pub trait VonmonFitter {
    /// Fit the mixture model.
    ///
    /// `term_doc` is the dense documents-by-terms count matrix; `authors`
    /// holds one inclusive (start, end) document range per author,
    /// already 1-indexed for the routine's benefit.
    fn fit(
        &self,
        term_doc: &Array2<f64>,
        authors: &[(usize, usize)],
        ncats: usize,
        kappa: f64,
        verbose: bool,
    ) -> Result<FittedTopics>;
}
