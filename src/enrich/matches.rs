//! Match join-enricher.
//!
//! Matches carry no dates of their own in most scrapes, so their calendar
//! dimensions come from the parent tournament. When a match does have its
//! own date, dimensions are recomputed from it against the tournament
//! corpus minimum so `days_since_start` stays comparable across tables.

use std::collections::HashMap;

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use super::{DataWarning, EnrichError, RunDiagnostics, TournamentEnrichment};
use crate::calculate::{calendar_dimensions, parse_optional_date};
use crate::models::{
    CalendarDimensions, DimensionSource, EnrichedMatchRecord, EnrichedTournamentRecord,
    MatchRecord, TournamentId,
};

/// Output of a match enrichment run.
#[derive(Debug, Clone)]
pub struct MatchEnrichment {
    /// Every input match, in input order
    pub records: Vec<EnrichedMatchRecord>,

    pub diagnostics: RunDiagnostics,
}

pub(crate) fn match_label(index: usize, record: &MatchRecord) -> String {
    format!("match #{} (tournament {})", index, record.tournament_id)
}

/// The date a tournament's dimensions were derived from.
fn dimension_date(dimensions: &CalendarDimensions) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(dimensions.year, dimensions.month, dimensions.day)
}

/// Index enriched tournaments by id. The first occurrence of an id wins.
fn build_index(
    tournaments: &[EnrichedTournamentRecord],
) -> HashMap<&TournamentId, &EnrichedTournamentRecord> {
    let mut index = HashMap::with_capacity(tournaments.len());
    for t in tournaments {
        index.entry(&t.record.id).or_insert(t);
    }
    index
}

/// Join matches to their tournaments and attach calendar dimensions.
///
/// Recomputed dimensions use the tournament run's phase table and corpus
/// minimum, so both tables share one classification.
pub fn enrich_matches(
    matches: &[MatchRecord],
    tournaments: &TournamentEnrichment,
) -> MatchEnrichment {
    let index = build_index(&tournaments.records);
    let mut diagnostics = RunDiagnostics::default();
    let mut records = Vec::with_capacity(matches.len());

    for (i, record) in matches.iter().enumerate() {
        let parent = match (index.get(&record.tournament_id), tournaments.corpus_min) {
            (Some(parent), Some(corpus_min)) => (*parent, corpus_min),
            _ => {
                let w = DataWarning::UnresolvedReference {
                    record: match_label(i, record),
                    tournament_id: record.tournament_id.to_string(),
                };
                warn!("{}", w);
                diagnostics.warnings.push(w);
                records.push(EnrichedMatchRecord::unresolved(record.clone()));
                continue;
            }
        };
        let (tournament, corpus_min) = parent;

        let own_date = match parse_optional_date(record.match_date.as_deref()) {
            Ok(date) => date,
            Err(_) => {
                let e = EnrichError::InvalidDate {
                    record: match_label(i, record),
                    field: "match_date",
                    raw: record.match_date.clone().unwrap_or_default(),
                };
                warn!("{}", e);
                diagnostics.errors.push(e);
                records.push(EnrichedMatchRecord::unresolved(record.clone()));
                continue;
            }
        };

        let enriched = match own_date {
            Some(date) if Some(date) != dimension_date(&tournament.dimensions) => {
                let dimensions = calendar_dimensions(date, &tournaments.phases, corpus_min);
                if dimensions.days_since_start < 0 {
                    let w = DataWarning::NegativeOffset {
                        record: match_label(i, record),
                        days: dimensions.days_since_start,
                    };
                    warn!("{}", w);
                    diagnostics.warnings.push(w);
                }
                EnrichedMatchRecord {
                    record: record.clone(),
                    dimension_source: DimensionSource::Match,
                    dimensions: Some(dimensions),
                }
            }
            _ => EnrichedMatchRecord {
                record: record.clone(),
                dimension_source: DimensionSource::Tournament,
                dimensions: Some(tournament.dimensions.clone()),
            },
        };

        debug!(
            "Joined {} via {:?}",
            match_label(i, record),
            enriched.dimension_source
        );
        records.push(enriched);
    }

    info!(
        "Enriched {} matches ({} unresolved, {} invalid dates)",
        records.len(),
        diagnostics.unresolved_references(),
        diagnostics.errors.len()
    );

    MatchEnrichment {
        records,
        diagnostics,
    }
}
