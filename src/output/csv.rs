// CSV artifacts: every matrix and table the pipeline writes, plus the
// readers the loader and the R boundary need. All files are UTF-8.

use std::path::Path;

use anyhow::{Context, Result};
use csv::{ReaderBuilder, WriterBuilder};
use ndarray::Array2;

use crate::corpus::authors::AuthorRange;
use crate::model::results::AuthorEmphasis;

/// Write the authors matrix: one row per author with its inclusive
/// document range.
pub fn write_author_ranges(path: &Path, ranges: &[AuthorRange]) -> Result<()> {
    let mut writer = WriterBuilder::new()
        .from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    writer.write_record(["author", "start", "end"])?;
    for range in ranges {
        writer.write_record([
            range.author.clone(),
            range.start.to_string(),
            range.end.to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

/// Reload an authors matrix written by `write_author_ranges`.
pub fn read_author_ranges(path: &Path) -> Result<Vec<AuthorRange>> {
    let mut reader = ReaderBuilder::new()
        .from_path(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;
    let mut ranges = Vec::new();
    for record in reader.records() {
        let record = record?;
        ranges.push(AuthorRange {
            author: record
                .get(0)
                .context("authors CSV row missing author column")?
                .to_string(),
            start: record
                .get(1)
                .context("authors CSV row missing start column")?
                .parse()?,
            end: record
                .get(2)
                .context("authors CSV row missing end column")?
                .parse()?,
        });
    }
    Ok(ranges)
}

/// Write a labelled matrix: `label` column followed by one column per
/// topic. Used for mus.csv (term labels) and thetas.csv (author labels).
pub fn write_labelled_matrix(
    path: &Path,
    label_header: &str,
    labels: &[String],
    matrix: &Array2<f64>,
) -> Result<()> {
    if labels.len() != matrix.nrows() {
        anyhow::bail!(
            "Label count ({}) does not match matrix rows ({}) for {}",
            labels.len(),
            matrix.nrows(),
            path.display()
        );
    }

    let mut writer = WriterBuilder::new()
        .from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;

    let mut header = vec![label_header.to_string()];
    header.extend((0..matrix.ncols()).map(|i| format!("topic_{i}")));
    writer.write_record(&header)?;

    for (label, row) in labels.iter().zip(matrix.rows()) {
        let mut record = vec![label.clone()];
        record.extend(row.iter().map(|v| v.to_string()));
        writer.write_record(&record)?;
    }
    writer.flush()?;
    Ok(())
}

/// Write a bare numeric matrix with the given header row. This is the
/// format handed across the R boundary.
pub fn write_matrix_rows<I>(path: &Path, header: &[String], rows: I) -> Result<()>
where
    I: IntoIterator<Item = Vec<f64>>,
{
    let mut writer = WriterBuilder::new()
        .from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    writer.write_record(header)?;
    for row in rows {
        let record: Vec<String> = row.iter().map(|v| v.to_string()).collect();
        writer.write_record(&record)?;
    }
    writer.flush()?;
    Ok(())
}

/// Read a headered numeric CSV into a dense matrix.
pub fn read_matrix(path: &Path) -> Result<Array2<f64>> {
    let mut reader = ReaderBuilder::new()
        .from_path(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;

    let mut values: Vec<f64> = Vec::new();
    let mut n_cols = 0;
    let mut n_rows = 0;
    for record in reader.records() {
        let record = record?;
        if n_cols == 0 {
            n_cols = record.len();
        } else if record.len() != n_cols {
            anyhow::bail!(
                "Ragged matrix in {}: row {} has {} columns, expected {n_cols}",
                path.display(),
                n_rows + 1,
                record.len()
            );
        }
        for field in record.iter() {
            values.push(
                field
                    .parse()
                    .with_context(|| format!("Non-numeric cell {field:?} in {}", path.display()))?,
            );
        }
        n_rows += 1;
    }

    Array2::from_shape_vec((n_rows, n_cols), values)
        .with_context(|| format!("Bad matrix shape in {}", path.display()))
}

/// Write result.csv: author, dominant topic, emphasis.
pub fn write_result(path: &Path, emphases: &[AuthorEmphasis]) -> Result<()> {
    let mut writer = WriterBuilder::new()
        .from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    writer.write_record(["author", "topic", "emphasis"])?;
    for row in emphases {
        writer.write_record([
            row.author.clone(),
            row.topic.to_string(),
            row.emphasis.to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

/// Read result.csv back (used by the loader).
pub fn read_result(path: &Path) -> Result<Vec<AuthorEmphasis>> {
    let mut reader = ReaderBuilder::new()
        .from_path(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(AuthorEmphasis {
            author: record
                .get(0)
                .context("result CSV row missing author column")?
                .to_string(),
            topic: record
                .get(1)
                .context("result CSV row missing topic column")?
                .parse()?,
            emphasis: record
                .get(2)
                .context("result CSV row missing emphasis column")?
                .parse()?,
        });
    }
    Ok(rows)
}

/// Write words.csv: one headerless row of top terms per topic. Rows may
/// be shorter than `TOP_WORDS` when the vocabulary is small.
pub fn write_words(path: &Path, words: &[Vec<String>]) -> Result<()> {
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    for row in words {
        writer.write_record(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// A topics file row for the loader: the topic's display title followed
/// by its words. Headerless, like words.csv with a leading title column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicsRow {
    pub title: String,
    pub words: Vec<String>,
}

/// Read a topics CSV for the loader.
pub fn read_topics(path: &Path) -> Result<Vec<TopicsRow>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let mut fields = record.iter();
        let title = fields
            .next()
            .context("topics CSV row is empty")?
            .to_string();
        rows.push(TopicsRow {
            title,
            words: fields.map(|w| w.to_string()).collect(),
        });
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_author_ranges_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("authors.csv");
        let ranges = vec![
            AuthorRange {
                author: "AKIRA OTSUBO".to_string(),
                start: 0,
                end: 3,
            },
            AuthorRange {
                author: "JOSÉ SILVA".to_string(),
                start: 4,
                end: 5,
            },
        ];
        write_author_ranges(&path, &ranges).unwrap();
        let reloaded = read_author_ranges(&path).unwrap();
        assert_eq!(reloaded, ranges);
    }

    #[test]
    fn test_labelled_matrix_layout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("thetas.csv");
        let labels = vec!["A".to_string(), "B".to_string()];
        write_labelled_matrix(&path, "author", &labels, &array![[0.5, 0.5], [1.0, 3.0]]).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next().unwrap(), "author,topic_0,topic_1");
        assert_eq!(lines.next().unwrap(), "A,0.5,0.5");
        assert_eq!(lines.next().unwrap(), "B,1,3");
    }

    #[test]
    fn test_labelled_matrix_rejects_mismatched_labels() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.csv");
        let labels = vec!["A".to_string()];
        assert!(
            write_labelled_matrix(&path, "author", &labels, &array![[1.0], [2.0]]).is_err()
        );
    }

    #[test]
    fn test_matrix_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("m.csv");
        let matrix = array![[1.0, 2.5], [0.0, 4.0]];
        let header = vec!["t0".to_string(), "t1".to_string()];
        write_matrix_rows(&path, &header, matrix.rows().into_iter().map(|r| r.to_vec()))
            .unwrap();
        let reloaded = read_matrix(&path).unwrap();
        assert_eq!(reloaded, matrix);
    }

    #[test]
    fn test_result_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("result.csv");
        let rows = vec![AuthorEmphasis {
            author: "A".to_string(),
            topic: 7,
            emphasis: 0.25,
        }];
        write_result(&path, &rows).unwrap();
        assert_eq!(read_result(&path).unwrap(), rows);
    }

    #[test]
    fn test_words_is_headerless_and_flexible() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("words.csv");
        let words = vec![
            vec!["saude".to_string(), "hospital".to_string()],
            vec!["reforma".to_string()],
        ];
        write_words(&path, &words).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().next().unwrap(), "saude,hospital");
        assert_eq!(text.lines().count(), 2);
    }

    #[test]
    fn test_read_topics_splits_title_from_words() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("topics.csv");
        std::fs::write(&path, "Saúde,hospital,vacina\n__Ruído,uh,hm\n").unwrap();
        let rows = read_topics(&path).unwrap();
        assert_eq!(rows[0].title, "Saúde");
        assert_eq!(rows[0].words, vec!["hospital", "vacina"]);
        assert_eq!(rows[1].title, "__Ruído");
    }
}
