// Singleton-author elimination and corpus splitting.
//
// The fitting routine estimates a topic mixture per author, which is
// meaningless for an author with a single recorded speech. Those are
// dropped here via one-record lookahead rather than a full pre-count,
// so the stream only ever buffers one document.

use std::collections::VecDeque;

use anyhow::Result;

/// An (author, document) pair flowing through the corpus stages.
pub type Pair = (String, String);

/// Iterator adapter that drops authors with only one speech.
///
/// Input must be pre-grouped by author. The first document of each new
/// author is held back; a second document for the same author releases
/// both and marks the author plural, after which further documents pass
/// straight through. A held document whose author never produces a
/// second one is silently discarded, including the very last author in
/// the stream, for whom no following record can trigger emission.
///
/// Errors from the underlying iterator pass through untouched.
pub struct PluralAuthors<I> {
    inner: I,
    current: Option<String>,
    held: Option<String>,
    plural: bool,
    ready: VecDeque<Pair>,
}

impl<I> PluralAuthors<I>
where
    I: Iterator<Item = Result<Pair>>,
{
    pub fn new(inner: I) -> Self {
        Self {
            inner,
            current: None,
            held: None,
            plural: false,
            ready: VecDeque::new(),
        }
    }
}

impl<I> Iterator for PluralAuthors<I>
where
    I: Iterator<Item = Result<Pair>>,
{
    type Item = Result<Pair>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(pair) = self.ready.pop_front() {
            return Some(Ok(pair));
        }

        loop {
            let (author, document) = match self.inner.next()? {
                Ok(pair) => pair,
                Err(e) => return Some(Err(e)),
            };

            if self.current.as_deref() != Some(author.as_str()) {
                // New author: hold their first document back.
                self.current = Some(author);
                self.held = Some(document);
                self.plural = false;
            } else if !self.plural {
                // Second document: the author survives. Release the held
                // first document now and queue this one behind it.
                self.plural = true;
                if let Some(first) = self.held.take() {
                    self.ready.push_back((author.clone(), document));
                    return Some(Ok((author, first)));
                }
                return Some(Ok((author, document)));
            } else {
                return Some(Ok((author, document)));
            }
        }
    }
}

/// Split a grouped (author, document) stream into two index-aligned
/// vectors in a single pass.
///
/// This replaces the callback-collector trick the pipeline used to need
/// when the vectorizer only accepted bare documents: position `i` of the
/// returned author vector labels document `i` of the corpus.
pub fn split_corpus<I>(pairs: I) -> Result<(Vec<String>, Vec<String>)>
where
    I: Iterator<Item = Result<Pair>>,
{
    let mut authors = Vec::new();
    let mut documents = Vec::new();
    for pair in pairs {
        let (author, document) = pair?;
        authors.push(author);
        documents.push(document);
    }
    Ok((authors, documents))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(input: &[(&str, &str)]) -> Vec<Result<Pair>> {
        input
            .iter()
            .map(|(a, d)| Ok((a.to_string(), d.to_string())))
            .collect()
    }

    fn collect(input: &[(&str, &str)]) -> Vec<Pair> {
        PluralAuthors::new(pairs(input).into_iter())
            .collect::<Result<Vec<_>>>()
            .unwrap()
    }

    #[test]
    fn test_middle_singleton_is_dropped() {
        let out = collect(&[
            ("A", "d1"),
            ("A", "d2"),
            ("B", "d3"),
            ("C", "d4"),
            ("C", "d5"),
        ]);
        let expected: Vec<Pair> = pairs(&[("A", "d1"), ("A", "d2"), ("C", "d4"), ("C", "d5")])
            .into_iter()
            .map(|p| p.unwrap())
            .collect();
        assert_eq!(out, expected);
    }

    #[test]
    fn test_trailing_singleton_is_dropped() {
        let out = collect(&[("A", "d1"), ("A", "d2"), ("B", "d3")]);
        assert_eq!(out.len(), 2);
        assert!(out.iter().all(|(a, _)| a == "A"));
    }

    #[test]
    fn test_every_surviving_author_has_at_least_two_documents() {
        let out = collect(&[
            ("A", "d1"),
            ("B", "d2"),
            ("B", "d3"),
            ("B", "d4"),
            ("C", "d5"),
            ("D", "d6"),
            ("D", "d7"),
        ]);
        let mut counts = std::collections::HashMap::new();
        for (author, _) in &out {
            *counts.entry(author.clone()).or_insert(0usize) += 1;
        }
        assert!(counts.values().all(|&c| c >= 2));
        assert!(!counts.contains_key("A"));
        assert!(!counts.contains_key("C"));
        // Order preserved
        assert_eq!(out[0].1, "d2");
        assert_eq!(out.last().unwrap().1, "d7");
    }

    #[test]
    fn test_all_singletons_yields_nothing() {
        let out = collect(&[("A", "d1"), ("B", "d2"), ("C", "d3")]);
        assert!(out.is_empty());
    }

    #[test]
    fn test_error_passes_through() {
        let input: Vec<Result<Pair>> = vec![
            Ok(("A".to_string(), "d1".to_string())),
            Err(anyhow::anyhow!("bad line")),
        ];
        let results: Vec<_> = PluralAuthors::new(input.into_iter()).collect();
        assert_eq!(results.len(), 1);
        assert!(results[0].is_err());
    }

    #[test]
    fn test_split_corpus_stays_aligned() {
        let (authors, documents) = split_corpus(
            pairs(&[("A", "d1"), ("A", "d2"), ("B", "d3"), ("B", "d4")]).into_iter(),
        )
        .unwrap();
        assert_eq!(authors, vec!["A", "A", "B", "B"]);
        assert_eq!(documents, vec!["d1", "d2", "d3", "d4"]);
    }
}
