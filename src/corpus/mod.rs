// Corpus construction: streaming the speech file, dropping singleton
// authors, and compressing the author sequence into index ranges.

pub mod authors;
pub mod grouping;
pub mod reader;
