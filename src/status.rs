// System status display: DB location and store counts.

use std::path::Path;

use anyhow::Result;
use rusqlite::Connection;

use crate::db::queries;

/// Display store status to the terminal.
pub fn show(conn: &Connection, db_display_path: &str) -> Result<()> {
    if !Path::new(db_display_path).exists() {
        println!("Database: not initialized");
        println!("\nRun `retorica init` to set up the database.");
        return Ok(());
    }

    let file_size = std::fs::metadata(db_display_path)
        .map(|m| format_bytes(m.len()))
        .unwrap_or_else(|_| "unknown".to_string());
    println!("Database: {db_display_path} ({file_size})");

    println!("Dashboards: {}", queries::dashboard_count(conn)?);
    println!("Topics: {}", queries::topic_count(conn)?);
    println!("Legislators: {}", queries::legislator_count(conn)?);

    let emphases = queries::emphasis_count(conn)?;
    let unmatched = queries::unmatched_emphasis_count(conn)?;
    println!("Emphases: {emphases} ({unmatched} without a legislator match)");

    Ok(())
}

fn format_bytes(bytes: u64) -> String {
    if bytes >= 1_048_576 {
        format!("{:.1} MB", bytes as f64 / 1_048_576.0)
    } else if bytes >= 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{bytes} B")
    }
}
