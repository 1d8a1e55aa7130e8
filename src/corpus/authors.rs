// Author index ranges: one inclusive (start, end) document range per
// unique author, in first-appearance order.
//
// The fitting routine receives these ranges instead of per-document
// author labels. The input sequence must be contiguous per author; a
// repeated author in a second run means the speech file was not sorted
// (or the grouping stage was bypassed), and silently assigning ranges
// would misattribute documents, so that is a hard error here.

use std::collections::HashSet;

use anyhow::Result;

/// An author's contiguous slice of the corpus, both bounds inclusive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorRange {
    pub author: String,
    pub start: usize,
    pub end: usize,
}

impl AuthorRange {
    /// Number of documents in the range (both bounds inclusive, never zero).
    pub fn document_count(&self) -> usize {
        self.end - self.start + 1
    }
}

/// Compress a flat author-per-document sequence into ranges.
///
/// The ranges partition `[0, authors.len() - 1]` exactly and are ordered
/// by each author's first appearance.
pub fn build_author_ranges(authors: &[String]) -> Result<Vec<AuthorRange>> {
    let mut ranges = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();
    let mut start = 0;

    while start < authors.len() {
        let author = authors[start].as_str();
        if !seen.insert(author) {
            anyhow::bail!(
                "Author {author:?} appears in non-contiguous runs; \
                 the speech file must be sorted by author"
            );
        }

        let mut end = start;
        while end + 1 < authors.len() && authors[end + 1] == author {
            end += 1;
        }

        ranges.push(AuthorRange {
            author: author.to_string(),
            start,
            end,
        });
        start = end + 1;
    }

    Ok(ranges)
}
