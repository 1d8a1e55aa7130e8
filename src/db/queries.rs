// Store queries: inserts and lookups for every table.
//
// All SQL lives here so the loader and status display work against
// plain Rust functions instead of raw statements.

use anyhow::Result;
use rusqlite::{params, Connection, OptionalExtension};

use super::models::{EmphasisRecord, TopicRecord};

// --- Dashboards ---

/// Insert a dashboard and return its id.
pub fn insert_dashboard(conn: &Connection, slug: &str, title: &str) -> Result<i64> {
    conn.execute(
        "INSERT INTO dashboards (slug, title) VALUES (?1, ?2)",
        params![slug, title],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn dashboard_count(conn: &Connection) -> Result<i64> {
    Ok(conn.query_row("SELECT COUNT(*) FROM dashboards", [], |row| row.get(0))?)
}

// --- Topics ---

/// Insert a topic under a dashboard and return its id. Words are stored
/// as a JSON array.
pub fn insert_topic(conn: &Connection, dashboard_id: i64, topic: &TopicRecord) -> Result<i64> {
    let words_json = serde_json::to_string(&topic.words)?;
    conn.execute(
        "INSERT INTO topics (dashboard_id, title, observ, ignored, words_json)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            dashboard_id,
            topic.title,
            topic.observ,
            topic.ignored,
            words_json
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn topic_count(conn: &Connection) -> Result<i64> {
    Ok(conn.query_row("SELECT COUNT(*) FROM topics", [], |row| row.get(0))?)
}

// --- Legislators ---

/// Insert a legislator (used by imports and tests) and return its id.
pub fn insert_legislator(conn: &Connection, name: &str) -> Result<i64> {
    conn.execute("INSERT INTO legislators (name) VALUES (?1)", params![name])?;
    Ok(conn.last_insert_rowid())
}

/// Exact-name legislator lookup.
pub fn find_legislator_by_name(conn: &Connection, name: &str) -> Result<Option<i64>> {
    let mut stmt = conn.prepare("SELECT id FROM legislators WHERE name = ?1")?;
    let id = stmt.query_row(params![name], |row| row.get(0)).optional()?;
    Ok(id)
}

pub fn legislator_count(conn: &Connection) -> Result<i64> {
    Ok(conn.query_row("SELECT COUNT(*) FROM legislators", [], |row| row.get(0))?)
}

// --- Emphases ---

/// Insert an emphasis record and return its id.
pub fn insert_emphasis(conn: &Connection, record: &EmphasisRecord) -> Result<i64> {
    conn.execute(
        "INSERT INTO emphases (name, stripped_name, emphasis, topic_id, legislator_id)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            record.name,
            record.stripped_name,
            record.emphasis,
            record.topic_id,
            record.legislator_id
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn emphasis_count(conn: &Connection) -> Result<i64> {
    Ok(conn.query_row("SELECT COUNT(*) FROM emphases", [], |row| row.get(0))?)
}

/// Emphasis rows that failed to resolve to a legislator.
pub fn unmatched_emphasis_count(conn: &Connection) -> Result<i64> {
    Ok(conn.query_row(
        "SELECT COUNT(*) FROM emphases WHERE legislator_id IS NULL",
        [],
        |row| row.get(0),
    )?)
}
