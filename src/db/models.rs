// Row types for the store.
//
// Kept separate from the queries so the loader can build records
// without depending on rusqlite directly.

use serde::{Deserialize, Serialize};

/// A topic row as loaded into the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopicRecord {
    pub title: String,
    /// Title carried a '/' prefix: shown for observation only.
    pub observ: bool,
    /// Title carried a '__' prefix: hidden from the dashboard.
    pub ignored: bool,
    pub words: Vec<String>,
}

/// An emphasis row linking a result-file author to a topic, and to a
/// legislator when the name resolves.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmphasisRecord {
    pub name: String,
    pub stripped_name: String,
    pub emphasis: f64,
    pub topic_id: i64,
    pub legislator_id: Option<i64>,
}
