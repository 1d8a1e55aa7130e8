// Store schema: table creation and versioned migrations.
//
// A `schema_version` table tracks which migrations have run; each
// migration is a function that executes SQL statements.

use anyhow::{Context, Result};
use rusqlite::Connection;

/// Create all tables if they don't exist yet.
///
/// Idempotent, safe to call on every startup.
pub fn create_tables(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        -- Tracks schema version for future migrations
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        -- One dashboard per loaded result set
        CREATE TABLE IF NOT EXISTS dashboards (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            slug TEXT NOT NULL UNIQUE,
            title TEXT NOT NULL,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        -- Topics discovered by a model run, in words.csv row order
        CREATE TABLE IF NOT EXISTS topics (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            dashboard_id INTEGER NOT NULL REFERENCES dashboards(id),
            title TEXT NOT NULL,
            observ INTEGER NOT NULL DEFAULT 0,   -- '/'-prefixed titles: shown for observation only
            ignored INTEGER NOT NULL DEFAULT 0,  -- '__'-prefixed titles: hidden from the dashboard
            words_json TEXT NOT NULL,            -- JSON array of the topic's top words
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        -- Legislators, keyed by their bare parliamentary name
        CREATE TABLE IF NOT EXISTS legislators (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        -- One emphasis record per result.csv row
        CREATE TABLE IF NOT EXISTS emphases (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,                  -- raw name from the result file
            stripped_name TEXT NOT NULL,         -- after suffix stripping
            emphasis REAL NOT NULL,
            topic_id INTEGER NOT NULL REFERENCES topics(id),
            legislator_id INTEGER REFERENCES legislators(id),  -- null when no match
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        -- Index for resolving result names against legislators
        CREATE INDEX IF NOT EXISTS idx_legislators_name
            ON legislators(name);

        -- Index for a dashboard's topics
        CREATE INDEX IF NOT EXISTS idx_topics_dashboard
            ON topics(dashboard_id);
        ",
    )
    .context("Failed to create database tables")?;

    // Record initial schema version if not already set
    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version) VALUES (?1)",
        [1],
    )?;

    Ok(())
}

/// Count the number of tables in the database (useful for init confirmation).
pub fn table_count(conn: &Connection) -> Result<i64> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%'",
        [],
        |row| row.get(0),
    )?;
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_tables_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        create_tables(&conn).unwrap();
        create_tables(&conn).unwrap();
    }

    #[test]
    fn test_table_count() {
        let conn = Connection::open_in_memory().unwrap();
        create_tables(&conn).unwrap();
        // schema_version, dashboards, topics, legislators, emphases
        assert_eq!(table_count(&conn).unwrap(), 5);
    }
}
