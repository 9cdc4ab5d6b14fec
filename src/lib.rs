//! Content-based movie recommendations.
//!
//! Movies are represented by TF-IDF vectors over their title and genre tags;
//! a dense cosine-similarity matrix built once at startup answers "more like
//! this" queries, filtered by rating popularity and quality.

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
