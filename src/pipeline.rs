//! End-to-end enrichment run over the data directory.
//!
//! Loads the scraped tables, enriches tournaments then matches, writes the
//! enriched tables, the run's diagnostics and the summary report.

use std::path::PathBuf;

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::config::PhaseTable;
use crate::enrich::matches::match_label;
use crate::enrich::{
    enrich_matches, DiagnosticCounts, DiagnosticKind, DiagnosticRow, RunDiagnostics,
    TournamentEnricher,
};
use crate::models::{DimensionSource, EnrichedMatchRecord, EnrichedTournamentRecord, MatchRecord};
use crate::storage::{
    entity_path, read_tournaments, write_document, EntityType, JsonlReader, JsonlWriter,
    StorageConfig, StorageError,
};
use crate::summary::{summarize, SummaryReport};

/// Inputs and options for one run.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub tournaments_path: PathBuf,
    pub matches_path: PathBuf,
    pub output: StorageConfig,
    /// Fixed trend baseline instead of the corpus minimum
    pub baseline: Option<NaiveDate>,
}

impl RunOptions {
    /// Read from `raw/` and write to `derived/` under one data directory.
    pub fn for_data_dir(storage: &StorageConfig) -> Self {
        Self {
            tournaments_path: entity_path(storage, EntityType::Tournament),
            matches_path: entity_path(storage, EntityType::Match),
            output: storage.clone(),
            baseline: None,
        }
    }
}

/// Result of a run.
#[derive(Debug)]
pub struct RunResult {
    pub report: SummaryReport,
    pub diagnostics: RunDiagnostics,
}

/// Enrich, write outputs, and summarize.
pub fn run_enrichment(options: &RunOptions, phases: &PhaseTable) -> Result<RunResult, StorageError> {
    info!("Reading tournaments from {:?}", options.tournaments_path);
    let tournaments = read_tournaments(options.tournaments_path.clone())?;

    let match_reader: JsonlReader<MatchRecord> = JsonlReader::new(options.matches_path.clone());
    let matches = if match_reader.exists() {
        match_reader.read_all()?
    } else {
        warn!(
            "No match results at {:?}, enriching tournaments only",
            options.matches_path
        );
        Vec::new()
    };

    let mut enricher = TournamentEnricher::new(*phases);
    if let Some(baseline) = options.baseline {
        enricher = enricher.with_baseline(baseline);
    }
    let tournament_run = enricher.enrich(&tournaments);
    let match_run = enrich_matches(&matches, &tournament_run);

    let mut diagnostics = tournament_run.diagnostics.clone();
    diagnostics.merge(match_run.diagnostics);

    JsonlWriter::for_entity(&options.output, EntityType::EnrichedTournament)
        .write_all(&tournament_run.records)?;
    JsonlWriter::for_entity(&options.output, EntityType::EnrichedMatch)
        .write_all(&match_run.records)?;
    JsonlWriter::for_entity(&options.output, EntityType::Diagnostic)
        .write_all(&diagnostics.rows())?;

    let report = summarize(
        &tournament_run.records,
        &match_run.records,
        diagnostics.counts(),
    );
    write_report(&options.output, &report)?;

    Ok(RunResult {
        report,
        diagnostics,
    })
}

/// Re-summarize previously enriched tables without re-running enrichment.
///
/// Coverage counts come from the diagnostics written by the enrichment run.
/// Tables from a run without `diagnostics.jsonl` only report the unresolved
/// matches visible in the match table itself.
pub fn rebuild_report(storage: &StorageConfig) -> Result<SummaryReport, StorageError> {
    let tournaments: Vec<EnrichedTournamentRecord> =
        JsonlReader::for_entity(storage, EntityType::EnrichedTournament).read_all()?;
    let match_reader = JsonlReader::<EnrichedMatchRecord>::for_entity(storage, EntityType::EnrichedMatch);
    let matches = if match_reader.exists() {
        match_reader.read_all()?
    } else {
        Vec::new()
    };

    let diagnostics = read_diagnostics(storage, &matches)?;
    let report = summarize(&tournaments, &matches, diagnostics);
    write_report(storage, &report)?;
    Ok(report)
}

fn read_diagnostics(
    storage: &StorageConfig,
    matches: &[EnrichedMatchRecord],
) -> Result<DiagnosticCounts, StorageError> {
    let reader = JsonlReader::<DiagnosticRow>::for_entity(storage, EntityType::Diagnostic);
    if reader.exists() {
        return Ok(DiagnosticCounts::from_rows(&reader.read_all()?));
    }

    warn!(
        "No diagnostics at {:?}, skipped records are not counted",
        entity_path(storage, EntityType::Diagnostic)
    );
    let rows: Vec<DiagnosticRow> = matches
        .iter()
        .enumerate()
        .filter(|(_, m)| m.dimension_source == DimensionSource::Unresolved)
        .map(|(i, m)| DiagnosticRow {
            record: match_label(i, &m.record),
            kind: DiagnosticKind::UnresolvedReference,
            reason: "no dimensions in enriched match table".to_string(),
        })
        .collect();
    Ok(DiagnosticCounts::from_rows(&rows))
}

fn write_report(storage: &StorageConfig, report: &SummaryReport) -> Result<(), StorageError> {
    write_document(&storage.report_path(), &report.render_text())?;
    write_document(&storage.summary_path(), &serde_json::to_string_pretty(report)?)?;
    Ok(())
}
