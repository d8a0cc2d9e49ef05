//! # Padel BI
//!
//! Time-dimension enrichment for scraped padel tournament and match data.
//!
//! ## Architecture
//!
//! - **models**: Tournament, match, and calendar dimension types
//! - **calculate**: Pure date derivations (dimensions, trend baseline, growth)
//! - **enrich**: Tournament enrichment and the match join
//! - **summary**: Aggregated statistics and the text report
//! - **storage**: JSONL tables under the data directory
//! - **config**: Configuration loading and validation
//! - **pipeline**: End-to-end run over the data directory

pub mod calculate;
pub mod config;
pub mod enrich;
pub mod models;
pub mod pipeline;
pub mod storage;
pub mod summary;

pub use models::*;
