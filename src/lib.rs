// Retorica: topic modeling for legislative speech transcripts
//
// This is the library root. Each module corresponds to a stage of the
// modeling pipeline or to the results-loading utility.

pub mod config;
pub mod corpus;
pub mod db;
pub mod loader;
pub mod model;
pub mod names;
pub mod output;
pub mod pipeline;
pub mod status;
pub mod vectorizer;
