// Bag-of-words count vectorizer with document-frequency cutoffs.
//
// Tokenization is deliberately plain: lowercase, split on anything that
// isn't alphanumeric, keep tokens of two or more characters. Vocabulary
// order is lexicographic so column labels are reproducible across runs.

use std::collections::{BTreeMap, HashMap, HashSet};

use anyhow::Result;
use ndarray::Array2;

/// A document-frequency cutoff, either as a fraction of the corpus or
/// as an absolute document count.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DocumentFrequency {
    Proportion(f64),
    Count(usize),
}

impl DocumentFrequency {
    fn threshold(&self, n_docs: usize) -> f64 {
        match self {
            DocumentFrequency::Proportion(p) => p * n_docs as f64,
            DocumentFrequency::Count(c) => *c as f64,
        }
    }
}

/// Builds a sparse document-term count matrix from raw document texts.
pub struct CountVectorizer {
    pub min_df: DocumentFrequency,
    pub max_df: DocumentFrequency,
}

impl Default for CountVectorizer {
    fn default() -> Self {
        Self {
            min_df: DocumentFrequency::Count(1),
            max_df: DocumentFrequency::Proportion(1.0),
        }
    }
}

impl CountVectorizer {
    /// Vectorizer from the CLI's fractional cutoffs, both clamped into
    /// [0, 1]. A maxdf of exactly 1.0 means "no upper cutoff".
    pub fn from_fractions(mindf: f64, maxdf: f64) -> Self {
        Self {
            min_df: DocumentFrequency::Proportion(mindf.clamp(0.0, 1.0)),
            max_df: DocumentFrequency::Proportion(maxdf.clamp(0.0, 1.0)),
        }
    }

    /// Tokenize every document, apply the frequency cutoffs, and count.
    pub fn fit_transform(&self, corpus: &[String]) -> Result<DocumentTermMatrix> {
        if corpus.is_empty() {
            anyhow::bail!("Cannot vectorize an empty corpus");
        }
        let n_docs = corpus.len();

        let tokenized: Vec<Vec<String>> = corpus.iter().map(|doc| tokenize(doc)).collect();

        // Document frequency per term. BTreeMap keeps the vocabulary in
        // lexicographic order for free.
        let mut document_frequency: BTreeMap<&str, usize> = BTreeMap::new();
        for tokens in &tokenized {
            let unique: HashSet<&str> = tokens.iter().map(|t| t.as_str()).collect();
            for term in unique {
                *document_frequency.entry(term).or_insert(0) += 1;
            }
        }

        let min_keep = self.min_df.threshold(n_docs);
        // A fractional maxdf of exactly 1.0 becomes an absolute count equal
        // to the corpus size, so every term passes the upper cutoff.
        let max_keep = match self.max_df {
            DocumentFrequency::Proportion(p) if p >= 1.0 => n_docs as f64,
            other => other.threshold(n_docs),
        };

        let vocabulary: Vec<String> = document_frequency
            .iter()
            .filter(|(_, &df)| df as f64 >= min_keep && df as f64 <= max_keep)
            .map(|(term, _)| term.to_string())
            .collect();

        if vocabulary.is_empty() {
            anyhow::bail!(
                "Document-frequency cutoffs removed every term \
                 ({n_docs} documents, mindf {:?}, maxdf {:?})",
                self.min_df,
                self.max_df
            );
        }

        let term_index: HashMap<&str, usize> = vocabulary
            .iter()
            .enumerate()
            .map(|(i, term)| (term.as_str(), i))
            .collect();

        let rows = tokenized
            .iter()
            .map(|tokens| {
                let mut counts: BTreeMap<usize, u32> = BTreeMap::new();
                for token in tokens {
                    if let Some(&idx) = term_index.get(token.as_str()) {
                        *counts.entry(idx).or_insert(0) += 1;
                    }
                }
                counts.into_iter().collect()
            })
            .collect();

        Ok(DocumentTermMatrix { vocabulary, rows })
    }
}

/// Sparse documents-by-terms count matrix with its column vocabulary.
#[derive(Debug, Clone)]
pub struct DocumentTermMatrix {
    /// Column labels, lexicographically sorted.
    pub vocabulary: Vec<String>,
    /// Per-document postings, sorted by term index.
    rows: Vec<Vec<(usize, u32)>>,
}

impl DocumentTermMatrix {
    pub fn n_docs(&self) -> usize {
        self.rows.len()
    }

    pub fn n_terms(&self) -> usize {
        self.vocabulary.len()
    }

    /// Count for one (document, term) cell.
    pub fn get(&self, doc: usize, term: usize) -> u32 {
        self.rows[doc]
            .iter()
            .find(|(idx, _)| *idx == term)
            .map(|(_, count)| *count)
            .unwrap_or(0)
    }

    /// Materialize as a dense float matrix for the fitting routine.
    pub fn to_dense(&self) -> Array2<f64> {
        let mut dense = Array2::zeros((self.n_docs(), self.n_terms()));
        for (doc, row) in self.rows.iter().enumerate() {
            for &(term, count) in row {
                dense[[doc, term]] = count as f64;
            }
        }
        dense
    }
}

/// Lowercase alphanumeric runs of two or more characters.
fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|token| token.chars().count() >= 2)
        .map(|token| token.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corpus(docs: &[&str]) -> Vec<String> {
        docs.iter().map(|d| d.to_string()).collect()
    }

    #[test]
    fn test_counts_and_vocabulary_order() {
        let dtm = CountVectorizer::default()
            .fit_transform(&corpus(&["saude saude educacao", "educacao reforma"]))
            .unwrap();

        assert_eq!(dtm.vocabulary, vec!["educacao", "reforma", "saude"]);
        assert_eq!(dtm.get(0, 2), 2); // saude twice in doc 0
        assert_eq!(dtm.get(0, 0), 1);
        assert_eq!(dtm.get(1, 1), 1);
        assert_eq!(dtm.get(1, 2), 0);
    }

    #[test]
    fn test_tokenizer_drops_single_chars_and_punctuation() {
        let dtm = CountVectorizer::default()
            .fit_transform(&corpus(&["A previdência, é urgente!", "previdência urgente"]))
            .unwrap();
        assert_eq!(dtm.vocabulary, vec!["previdência", "urgente"]);
    }

    #[test]
    fn test_min_df_proportion_filters_rare_terms() {
        let vectorizer = CountVectorizer {
            min_df: DocumentFrequency::Proportion(0.5),
            max_df: DocumentFrequency::Proportion(1.0),
        };
        // "raro" appears in 1 of 4 documents, below the 0.5 cut
        let dtm = vectorizer
            .fit_transform(&corpus(&[
                "comum raro",
                "comum outro",
                "comum outro",
                "comum mais",
            ]))
            .unwrap();
        assert!(dtm.vocabulary.contains(&"comum".to_string()));
        assert!(!dtm.vocabulary.contains(&"raro".to_string()));
    }

    #[test]
    fn test_max_df_one_keeps_ubiquitous_terms() {
        let vectorizer = CountVectorizer::from_fractions(0.0, 1.0);
        let dtm = vectorizer
            .fit_transform(&corpus(&["sempre aqui", "sempre ali"]))
            .unwrap();
        // "sempre" is in every document but maxdf == 1.0 means no upper cutoff
        assert!(dtm.vocabulary.contains(&"sempre".to_string()));
    }

    #[test]
    fn test_max_df_below_one_drops_ubiquitous_terms() {
        let vectorizer = CountVectorizer::from_fractions(0.0, 0.6);
        let dtm = vectorizer
            .fit_transform(&corpus(&["sempre aqui", "sempre ali", "sempre outro"]))
            .unwrap();
        assert!(!dtm.vocabulary.contains(&"sempre".to_string()));
        assert!(dtm.vocabulary.contains(&"aqui".to_string()));
    }

    #[test]
    fn test_to_dense_matches_sparse() {
        let dtm = CountVectorizer::default()
            .fit_transform(&corpus(&["um dois dois", "dois tres"]))
            .unwrap();
        let dense = dtm.to_dense();
        assert_eq!(dense.dim(), (2, dtm.n_terms()));
        for doc in 0..dtm.n_docs() {
            for term in 0..dtm.n_terms() {
                assert_eq!(dense[[doc, term]], dtm.get(doc, term) as f64);
            }
        }
    }

    #[test]
    fn test_empty_corpus_fails() {
        assert!(CountVectorizer::default().fit_transform(&[]).is_err());
    }

    #[test]
    fn test_cutoffs_removing_everything_fails() {
        let vectorizer = CountVectorizer {
            min_df: DocumentFrequency::Count(10),
            max_df: DocumentFrequency::Proportion(1.0),
        };
        assert!(vectorizer
            .fit_transform(&corpus(&["um dois", "tres quatro"]))
            .is_err());
    }
}
