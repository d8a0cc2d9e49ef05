//! Tournament enricher.

use std::collections::HashSet;

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use super::{DataWarning, EnrichError, RunDiagnostics};
use crate::calculate::{calendar_dimensions, corpus_min_date, parse_optional_date};
use crate::config::PhaseTable;
use crate::models::{EnrichedTournamentRecord, TournamentRecord};

/// Output of a tournament enrichment run.
#[derive(Debug, Clone)]
pub struct TournamentEnrichment {
    /// Successfully enriched tournaments, in input order
    pub records: Vec<EnrichedTournamentRecord>,

    /// Baseline every `days_since_start` was measured from
    pub corpus_min: Option<NaiveDate>,

    /// Phase table the dimensions were computed with; matches reuse it
    pub phases: PhaseTable,

    pub diagnostics: RunDiagnostics,
}

/// Dates resolved for one tournament.
struct ResolvedDates {
    representative: NaiveDate,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    /// Unparseable end_date ignored because start_date resolved
    ignored_end: Option<String>,
}

pub(crate) fn tournament_label(record: &TournamentRecord) -> String {
    format!("tournament {}", record.id)
}

/// Parse both dates and pick the representative one (start, else end).
///
/// A bad start_date fails the record. A bad end_date only fails it when
/// there is no start_date to fall back on.
fn resolve_dates(record: &TournamentRecord) -> Result<ResolvedDates, EnrichError> {
    let invalid = |field: &'static str, raw: &Option<String>| EnrichError::InvalidDate {
        record: tournament_label(record),
        field,
        raw: raw.clone().unwrap_or_default(),
    };

    let start = parse_optional_date(record.start_date.as_deref())
        .map_err(|_| invalid("start_date", &record.start_date))?;

    let (end, ignored_end) = match parse_optional_date(record.end_date.as_deref()) {
        Ok(end) => (end, None),
        Err(_) if start.is_some() => (None, record.end_date.clone()),
        Err(_) => return Err(invalid("end_date", &record.end_date)),
    };

    let representative = start.or(end).ok_or_else(|| EnrichError::MissingDate {
        record: tournament_label(record),
    })?;

    Ok(ResolvedDates {
        representative,
        start,
        end,
        ignored_end,
    })
}

/// Appends calendar dimensions to tournament records.
#[derive(Debug, Clone)]
pub struct TournamentEnricher {
    phases: PhaseTable,
    baseline: Option<NaiveDate>,
}

impl TournamentEnricher {
    pub fn new(phases: PhaseTable) -> Self {
        Self {
            phases,
            baseline: None,
        }
    }

    /// Measure `days_since_start` from a fixed date instead of the corpus
    /// minimum. Records earlier than the baseline get negative offsets.
    pub fn with_baseline(mut self, baseline: NaiveDate) -> Self {
        self.baseline = Some(baseline);
        self
    }

    pub fn enrich(&self, tournaments: &[TournamentRecord]) -> TournamentEnrichment {
        let resolved: Vec<Result<ResolvedDates, EnrichError>> =
            tournaments.iter().map(resolve_dates).collect();

        let corpus_min = self.baseline.or_else(|| {
            corpus_min_date(
                resolved
                    .iter()
                    .filter_map(|r| r.as_ref().ok().map(|d| d.representative)),
            )
        });

        let mut diagnostics = RunDiagnostics::default();
        let mut records = Vec::with_capacity(tournaments.len());
        let mut seen_ids = HashSet::new();

        for (record, dates) in tournaments.iter().zip(resolved) {
            let dates = match dates {
                Ok(dates) => dates,
                Err(e) => {
                    warn!("Skipping {}", e);
                    diagnostics.errors.push(e);
                    continue;
                }
            };
            // At least one date resolved, so the minimum exists.
            let Some(baseline) = corpus_min else {
                continue;
            };

            if let Some(raw) = dates.ignored_end {
                let w = DataWarning::InvalidEndDate {
                    record: tournament_label(record),
                    raw,
                };
                warn!("{}", w);
                diagnostics.warnings.push(w);
            }

            if let (Some(start), Some(end)) = (dates.start, dates.end) {
                if start > end {
                    let w = DataWarning::DateOrder {
                        record: tournament_label(record),
                        start: start.to_string(),
                        end: end.to_string(),
                    };
                    warn!("{}", w);
                    diagnostics.warnings.push(w);
                }
            }

            if !seen_ids.insert(record.id.clone()) {
                let w = DataWarning::DuplicateId {
                    record: tournament_label(record),
                };
                warn!("{}", w);
                diagnostics.warnings.push(w);
            }

            let dimensions = calendar_dimensions(dates.representative, &self.phases, baseline);
            if dimensions.days_since_start < 0 {
                let w = DataWarning::NegativeOffset {
                    record: tournament_label(record),
                    days: dimensions.days_since_start,
                };
                warn!("{}", w);
                diagnostics.warnings.push(w);
            }

            debug!(
                "Enriched {} ({}): {} {}",
                record.id, record.name, dimensions.date_display, dimensions.season
            );

            records.push(EnrichedTournamentRecord {
                record: record.clone(),
                dimensions,
            });
        }

        info!(
            "Enriched {}/{} tournaments ({} skipped, {} warnings)",
            records.len(),
            tournaments.len(),
            diagnostics.errors.len(),
            diagnostics.warnings.len()
        );

        TournamentEnrichment {
            records,
            corpus_min,
            phases: self.phases,
            diagnostics,
        }
    }
}

/// Enrich tournaments against their own corpus minimum date.
pub fn enrich_tournaments(
    tournaments: &[TournamentRecord],
    phases: &PhaseTable,
) -> TournamentEnrichment {
    TournamentEnricher::new(*phases).enrich(tournaments)
}
