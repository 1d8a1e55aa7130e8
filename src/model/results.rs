// Result shaping: proportions, dominant topics, and top words.
//
// Topic indices here are 0-based column positions; they line up with
// the row order of words.csv, which is what the loader keys on.

use anyhow::Result;
use ndarray::Array2;

use crate::corpus::authors::AuthorRange;

/// How many top-loading terms to keep per topic in words.csv.
pub const TOP_WORDS: usize = 30;

/// One row of result.csv.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthorEmphasis {
    pub author: String,
    /// 0-based dominant topic index.
    pub topic: usize,
    /// The dominant topic's share of the author's total topic weight.
    pub emphasis: f64,
}

/// Normalize each author's topic weights into proportions.
///
/// An all-zero row has no meaningful proportions; the fit degenerated,
/// so that is fatal rather than a row of NaNs in result.csv.
pub fn topic_proportions(thetas: &Array2<f64>) -> Result<Array2<f64>> {
    let mut proportions = thetas.clone();
    for (i, mut row) in proportions.rows_mut().into_iter().enumerate() {
        let total: f64 = row.sum();
        if total <= 0.0 {
            anyhow::bail!("Fitted thetas row {i} sums to zero; cannot normalize");
        }
        row.mapv_inplace(|w| w / total);
    }
    Ok(proportions)
}

/// Pick each author's dominant topic and its proportion.
///
/// `ranges` must be the authors-matrix the model was fitted against:
/// row `i` of `proportions` is the author of `ranges[i]` by construction.
pub fn author_emphases(
    ranges: &[AuthorRange],
    proportions: &Array2<f64>,
) -> Result<Vec<AuthorEmphasis>> {
    if ranges.len() != proportions.nrows() {
        anyhow::bail!(
            "Author count ({}) does not match theta rows ({})",
            ranges.len(),
            proportions.nrows()
        );
    }

    let mut result = Vec::with_capacity(ranges.len());
    for (range, row) in ranges.iter().zip(proportions.rows()) {
        // First maximum wins on exact ties, matching idxmax semantics.
        let mut topic = 0;
        let mut best = f64::NEG_INFINITY;
        for (j, &weight) in row.iter().enumerate() {
            if weight > best {
                best = weight;
                topic = j;
            }
        }
        result.push(AuthorEmphasis {
            author: range.author.clone(),
            topic,
            emphasis: best,
        });
    }
    Ok(result)
}

/// Top `TOP_WORDS` terms per topic, descending by loading.
///
/// The sort is stable, so exact ties keep the vocabulary's original
/// (lexicographic) order.
pub fn top_topic_words(mus: &Array2<f64>, vocabulary: &[String]) -> Vec<Vec<String>> {
    let mut table = Vec::with_capacity(mus.ncols());
    for column in mus.columns() {
        let mut loadings: Vec<(usize, f64)> = column.iter().copied().enumerate().collect();
        loadings.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        table.push(
            loadings
                .into_iter()
                .take(TOP_WORDS)
                .map(|(term, _)| vocabulary[term].clone())
                .collect(),
        );
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array2};

    fn ranges(names: &[&str]) -> Vec<AuthorRange> {
        names
            .iter()
            .enumerate()
            .map(|(i, name)| AuthorRange {
                author: name.to_string(),
                start: i * 2,
                end: i * 2 + 1,
            })
            .collect()
    }

    #[test]
    fn test_proportion_rows_sum_to_one() {
        let thetas = array![[2.0, 6.0], [1.0, 3.0]];
        let proportions = topic_proportions(&thetas).unwrap();
        for row in proportions.rows() {
            assert!((row.sum() - 1.0).abs() < 1e-12);
        }
        assert!((proportions[[0, 0]] - 0.25).abs() < 1e-12);
        assert!((proportions[[1, 1]] - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_zero_row_is_fatal() {
        let thetas = array![[1.0, 1.0], [0.0, 0.0]];
        let err = topic_proportions(&thetas).unwrap_err();
        assert!(err.to_string().contains("row 1"));
    }

    #[test]
    fn test_emphasis_is_the_row_maximum() {
        let thetas = array![[2.0, 6.0], [9.0, 1.0]];
        let proportions = topic_proportions(&thetas).unwrap();
        let emphases = author_emphases(&ranges(&["A", "B"]), &proportions).unwrap();

        assert_eq!(emphases[0].author, "A");
        assert_eq!(emphases[0].topic, 1);
        assert!((emphases[0].emphasis - 0.75).abs() < 1e-12);

        assert_eq!(emphases[1].topic, 0);
        assert!((emphases[1].emphasis - 0.9).abs() < 1e-12);

        // The chosen emphasis equals the max entry of its proportion row
        for (i, emphasis) in emphases.iter().enumerate() {
            let row_max = proportions
                .row(i)
                .iter()
                .cloned()
                .fold(f64::NEG_INFINITY, f64::max);
            assert_eq!(emphasis.emphasis, row_max);
        }
    }

    #[test]
    fn test_tie_picks_the_first_topic() {
        let proportions = topic_proportions(&array![[1.0, 1.0]]).unwrap();
        let emphases = author_emphases(&ranges(&["A"]), &proportions).unwrap();
        assert_eq!(emphases[0].topic, 0);
    }

    #[test]
    fn test_author_count_mismatch_is_an_error() {
        let proportions = topic_proportions(&array![[1.0, 1.0]]).unwrap();
        assert!(author_emphases(&ranges(&["A", "B"]), &proportions).is_err());
    }

    #[test]
    fn test_top_words_descending_with_stable_ties() {
        let vocabulary: Vec<String> = ["alfa", "beta", "gama", "delta"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        // Topic 0 loadings: alfa 0.1, beta 0.9, gama 0.9, delta 0.5
        let mus = array![[0.1], [0.9], [0.9], [0.5]];
        let words = top_topic_words(&mus, &vocabulary);

        assert_eq!(words.len(), 1);
        // beta and gama tie at 0.9; stable sort keeps beta (earlier term) first
        assert_eq!(words[0], vec!["beta", "gama", "delta", "alfa"]);
    }

    #[test]
    fn test_top_words_capped_at_thirty() {
        let vocabulary: Vec<String> = (0..40).map(|i| format!("w{i:02}")).collect();
        let mus = Array2::from_shape_fn((40, 2), |(term, topic)| {
            (term as f64) * (topic as f64 + 1.0)
        });
        let words = top_topic_words(&mus, &vocabulary);
        assert_eq!(words[0].len(), TOP_WORDS);
        assert_eq!(words[1].len(), TOP_WORDS);
        // Highest loading first
        assert_eq!(words[0][0], "w39");
    }

    #[test]
    fn test_top_words_shorter_vocabulary() {
        let vocabulary: Vec<String> = vec!["um".to_string(), "dois".to_string()];
        let mus = array![[0.2, 0.9], [0.8, 0.1]];
        let words = top_topic_words(&mus, &vocabulary);
        assert_eq!(words[0], vec!["dois", "um"]);
        assert_eq!(words[1], vec!["um", "dois"]);
    }
}
