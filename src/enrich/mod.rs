//! Time-dimension enrichment.
//!
//! Two batch transforms over fully loaded tables:
//! - **tournaments**: picks a representative date per tournament and appends
//!   its calendar dimensions, relative to the corpus minimum date
//! - **matches**: joins each match to its tournament by id and inherits or
//!   recomputes dimensions against the same corpus minimum
//!
//! Per-record failures never abort the batch. They are collected in
//! [`RunDiagnostics`] with the record they belong to.

pub mod matches;
pub mod tournaments;

pub use matches::{enrich_matches, MatchEnrichment};
pub use tournaments::{enrich_tournaments, TournamentEnricher, TournamentEnrichment};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A record that could not be enriched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnrichError {
    #[error("{record}: invalid {field} {raw:?}")]
    InvalidDate {
        record: String,
        field: &'static str,
        raw: String,
    },

    #[error("{record}: no start_date or end_date")]
    MissingDate { record: String },
}

impl EnrichError {
    /// Label of the record the error belongs to.
    pub fn record(&self) -> &str {
        match self {
            EnrichError::InvalidDate { record, .. } => record,
            EnrichError::MissingDate { record } => record,
        }
    }
}

/// A data-quality problem that does not stop a record from being emitted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DataWarning {
    #[error("{record}: references unknown tournament {tournament_id:?}")]
    UnresolvedReference {
        record: String,
        tournament_id: String,
    },

    #[error("{record}: date precedes the corpus baseline ({days} days)")]
    NegativeOffset { record: String, days: i64 },

    #[error("{record}: start_date {start} is after end_date {end}")]
    DateOrder {
        record: String,
        start: String,
        end: String,
    },

    #[error("{record}: duplicate tournament id, first occurrence is used for joins")]
    DuplicateId { record: String },

    #[error("{record}: ignoring invalid end_date {raw:?}, start_date is used")]
    InvalidEndDate { record: String, raw: String },
}

impl DataWarning {
    pub fn record(&self) -> &str {
        match self {
            DataWarning::UnresolvedReference { record, .. }
            | DataWarning::NegativeOffset { record, .. }
            | DataWarning::DateOrder { record, .. }
            | DataWarning::DuplicateId { record }
            | DataWarning::InvalidEndDate { record, .. } => record,
        }
    }
}

/// Kind of a persisted diagnostic row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    InvalidDate,
    MissingDate,
    UnresolvedReference,
    NegativeOffset,
    DateOrder,
    DuplicateId,
    InvalidEndDate,
}

impl DiagnosticKind {
    /// Errors skip or strip the record; everything else is a warning.
    pub fn is_error(&self) -> bool {
        matches!(self, DiagnosticKind::InvalidDate | DiagnosticKind::MissingDate)
    }
}

/// One diagnostic as written to `diagnostics.jsonl`: record label + reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosticRow {
    pub record: String,
    pub kind: DiagnosticKind,
    pub reason: String,
}

impl From<&EnrichError> for DiagnosticRow {
    fn from(error: &EnrichError) -> Self {
        let kind = match error {
            EnrichError::InvalidDate { .. } => DiagnosticKind::InvalidDate,
            EnrichError::MissingDate { .. } => DiagnosticKind::MissingDate,
        };
        Self {
            record: error.record().to_string(),
            kind,
            reason: error.to_string(),
        }
    }
}

impl From<&DataWarning> for DiagnosticRow {
    fn from(warning: &DataWarning) -> Self {
        let kind = match warning {
            DataWarning::UnresolvedReference { .. } => DiagnosticKind::UnresolvedReference,
            DataWarning::NegativeOffset { .. } => DiagnosticKind::NegativeOffset,
            DataWarning::DateOrder { .. } => DiagnosticKind::DateOrder,
            DataWarning::DuplicateId { .. } => DiagnosticKind::DuplicateId,
            DataWarning::InvalidEndDate { .. } => DiagnosticKind::InvalidEndDate,
        };
        Self {
            record: warning.record().to_string(),
            kind,
            reason: warning.to_string(),
        }
    }
}

/// Errors and warnings collected during a run.
#[derive(Debug, Clone, Default)]
pub struct RunDiagnostics {
    pub errors: Vec<EnrichError>,
    pub warnings: Vec<DataWarning>,
}

impl RunDiagnostics {
    /// Number of matches whose tournament id did not resolve.
    pub fn unresolved_references(&self) -> usize {
        self.warnings
            .iter()
            .filter(|w| matches!(w, DataWarning::UnresolvedReference { .. }))
            .count()
    }

    pub fn merge(&mut self, other: RunDiagnostics) {
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
    }

    /// Errors first, then warnings, each in the order they were raised.
    pub fn rows(&self) -> Vec<DiagnosticRow> {
        self.errors
            .iter()
            .map(DiagnosticRow::from)
            .chain(self.warnings.iter().map(DiagnosticRow::from))
            .collect()
    }

    pub fn counts(&self) -> DiagnosticCounts {
        DiagnosticCounts::from_rows(&self.rows())
    }
}

/// Diagnostic totals reported next to the aggregated statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosticCounts {
    /// Records that failed enrichment
    pub skipped: usize,
    pub invalid_dates: usize,
    pub missing_dates: usize,
    /// All non-fatal warnings
    pub warnings: usize,
    pub unresolved_references: usize,
    pub negative_offsets: usize,
    pub date_order: usize,
    pub duplicate_ids: usize,
    #[serde(default)]
    pub invalid_end_dates: usize,
}

impl DiagnosticCounts {
    pub fn from_rows(rows: &[DiagnosticRow]) -> Self {
        let mut counts = Self::default();
        for row in rows {
            if row.kind.is_error() {
                counts.skipped += 1;
            } else {
                counts.warnings += 1;
            }
            match row.kind {
                DiagnosticKind::InvalidDate => counts.invalid_dates += 1,
                DiagnosticKind::MissingDate => counts.missing_dates += 1,
                DiagnosticKind::UnresolvedReference => counts.unresolved_references += 1,
                DiagnosticKind::NegativeOffset => counts.negative_offsets += 1,
                DiagnosticKind::DateOrder => counts.date_order += 1,
                DiagnosticKind::DuplicateId => counts.duplicate_ids += 1,
                DiagnosticKind::InvalidEndDate => counts.invalid_end_dates += 1,
            }
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts() {
        let diagnostics = RunDiagnostics {
            errors: vec![
                EnrichError::MissingDate {
                    record: "tournament T1".to_string(),
                },
                EnrichError::InvalidDate {
                    record: "tournament T2".to_string(),
                    field: "start_date",
                    raw: "31/02/2026".to_string(),
                },
            ],
            warnings: vec![
                DataWarning::UnresolvedReference {
                    record: "match #0".to_string(),
                    tournament_id: "T99".to_string(),
                },
                DataWarning::NegativeOffset {
                    record: "match #1".to_string(),
                    days: -3,
                },
            ],
        };

        let counts = diagnostics.counts();
        assert_eq!(counts.skipped, 2);
        assert_eq!(counts.invalid_dates, 1);
        assert_eq!(counts.missing_dates, 1);
        assert_eq!(counts.warnings, 2);
        assert_eq!(counts.unresolved_references, 1);
        assert_eq!(counts.negative_offsets, 1);
        assert_eq!(diagnostics.unresolved_references(), 1);
    }

    #[test]
    fn test_error_messages() {
        let err = EnrichError::InvalidDate {
            record: "tournament T2".to_string(),
            field: "start_date",
            raw: "31/02/2026".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "tournament T2: invalid start_date \"31/02/2026\""
        );
        assert_eq!(err.record(), "tournament T2");
    }

    #[test]
    fn test_rows_round_trip_to_counts() {
        let diagnostics = RunDiagnostics {
            errors: vec![EnrichError::MissingDate {
                record: "tournament T1".to_string(),
            }],
            warnings: vec![DataWarning::InvalidEndDate {
                record: "tournament T2".to_string(),
                raw: "TBD".to_string(),
            }],
        };

        let rows = diagnostics.rows();
        assert_eq!(rows[0].kind, DiagnosticKind::MissingDate);
        assert_eq!(rows[0].record, "tournament T1");
        assert_eq!(
            rows[1].reason,
            "tournament T2: ignoring invalid end_date \"TBD\", start_date is used"
        );

        let back: Vec<DiagnosticRow> = rows
            .iter()
            .map(|r| serde_json::from_str(&serde_json::to_string(r).unwrap()).unwrap())
            .collect();
        let counts = DiagnosticCounts::from_rows(&back);
        assert_eq!(counts, diagnostics.counts());
        assert_eq!(counts.skipped, 1);
        assert_eq!(counts.warnings, 1);
        assert_eq!(counts.invalid_end_dates, 1);
    }

    #[test]
    fn test_merge() {
        let mut a = RunDiagnostics::default();
        let b = RunDiagnostics {
            errors: vec![EnrichError::MissingDate {
                record: "tournament T1".to_string(),
            }],
            warnings: vec![],
        };
        a.merge(b);
        assert_eq!(a.errors.len(), 1);
    }
}
