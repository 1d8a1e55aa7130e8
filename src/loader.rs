// Results loader: pushes a finished model run into the store.
//
// Consumes result.csv and a hand-labelled topics CSV, creates a
// dashboard for them, one topic row per topics-file line, and one
// emphasis row per result line. Legislator resolution is best-effort:
// strip the procedural suffixes, look the name up, retry once with
// diacritics folded, and store a null reference when both miss. A
// missing legislator never aborts the load.

use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::Connection;
use tracing::{info, warn};

use crate::db::models::{EmphasisRecord, TopicRecord};
use crate::db::queries;
use crate::names;
use crate::output::csv::{read_result, read_topics};

/// What a load run did, for the terminal summary.
#[derive(Debug, Clone)]
pub struct LoadSummary {
    pub dashboard_slug: String,
    pub topics: usize,
    pub emphases: usize,
    pub unmatched: usize,
}

/// Parse a topics-file title into its flags.
///
/// A leading '/' marks the topic observation-only; a leading '__' marks
/// it ignored. Both prefixes are stripped from the stored title.
fn parse_topic_title(raw: &str) -> (String, bool, bool) {
    if let Some(stripped) = raw.strip_prefix('/') {
        (stripped.trim_start_matches('/').to_string(), true, false)
    } else if let Some(stripped) = raw.strip_prefix("__") {
        (stripped.trim_start_matches('_').to_string(), false, true)
    } else {
        (raw.to_string(), false, false)
    }
}

/// Load a result/topics CSV pair into the store under a new dashboard.
pub fn run(
    conn: &Connection,
    title: &str,
    result_path: &Path,
    topics_path: &Path,
) -> Result<LoadSummary> {
    let result_rows = read_result(result_path)
        .with_context(|| format!("Failed to read results from {}", result_path.display()))?;
    let topic_rows = read_topics(topics_path)
        .with_context(|| format!("Failed to read topics from {}", topics_path.display()))?;

    let slug = names::parameterize(title);
    let dashboard_id = queries::insert_dashboard(conn, &slug, title)?;
    info!(%slug, dashboard_id, "Created dashboard");

    // Topic ids by topics-file row index; result.csv's topic column is
    // the same 0-based index.
    let mut topic_ids = Vec::with_capacity(topic_rows.len());
    for row in &topic_rows {
        let (topic_title, observ, ignored) = parse_topic_title(&row.title);
        let topic_id = queries::insert_topic(
            conn,
            dashboard_id,
            &TopicRecord {
                title: topic_title,
                observ,
                ignored,
                words: row.words.clone(),
            },
        )?;
        topic_ids.push(topic_id);
    }

    let mut unmatched = 0;
    for row in &result_rows {
        let topic_id = *topic_ids.get(row.topic).with_context(|| {
            format!(
                "Result row for {:?} points at topic {} but the topics file has {} rows",
                row.author,
                row.topic,
                topic_ids.len()
            )
        })?;

        let stripped = names::strip_legislator_name(&row.author);
        let legislator_id = match queries::find_legislator_by_name(conn, &stripped)? {
            Some(id) => Some(id),
            // Retry with diacritics folded. Happens to a handful of
            // legislators whose transcript spelling drops the accents.
            None => queries::find_legislator_by_name(conn, &names::transliterate(&stripped))?,
        };

        if legislator_id.is_none() {
            unmatched += 1;
            warn!(name = %row.author, stripped = %stripped, "No legislator match");
        }

        queries::insert_emphasis(
            conn,
            &EmphasisRecord {
                name: row.author.clone(),
                stripped_name: stripped,
                emphasis: row.emphasis,
                topic_id,
                legislator_id,
            },
        )?;
    }

    Ok(LoadSummary {
        dashboard_slug: slug,
        topics: topic_rows.len(),
        emphases: result_rows.len(),
        unmatched,
    })
}
