//! Core data models for padel BI enrichment.

mod calendar;
mod ids;
mod match_record;
mod tournament;

pub use calendar::*;
pub use ids::*;
pub use match_record::*;
pub use tournament::*;
