//! Insight summarizer.
//!
//! Read-only aggregation over the enriched tables: yearly counts and growth,
//! season/phase/month distributions, and enrichment coverage. The report is
//! serializable for `summary.json` and renders as the plain-text BI report.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::calculate::growth_rate;
use crate::enrich::DiagnosticCounts;
use crate::models::{
    DimensionSource, EnrichedMatchRecord, EnrichedTournamentRecord, Season, SeasonPhase,
    MONTH_NAMES,
};

/// Count for one year with growth over the previous calendar year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearCount {
    pub year: i32,
    pub count: u32,
    /// `None` when the previous year has no records
    pub growth_pct: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthCount {
    pub month: u32,
    pub name: String,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonCount {
    pub season: Season,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseCount {
    pub phase: SeasonPhase,
    pub count: u32,
}

/// How much of the input made it through enrichment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coverage {
    pub tournaments_enriched: usize,
    pub matches_total: usize,
    pub matches_inherited: usize,
    pub matches_recomputed: usize,
    pub matches_without_dimensions: usize,
    pub diagnostics: DiagnosticCounts,
}

/// Aggregated time-dimension statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryReport {
    pub tournaments_by_year: Vec<YearCount>,
    pub matches_by_year: Vec<YearCount>,

    /// Growth from the first to the last year on record
    pub overall_growth_pct: Option<f64>,

    pub peak_year: Option<YearCount>,
    pub by_season: Vec<SeasonCount>,
    pub by_phase: Vec<PhaseCount>,

    /// All twelve months, January first
    pub by_month: Vec<MonthCount>,

    pub busiest_month: Option<MonthCount>,
    pub quietest_month: Option<MonthCount>,
    pub coverage: Coverage,
}

/// Per-year counts with year-over-year growth, ascending by year.
pub fn yearly_growth(counts: &BTreeMap<i32, u32>) -> Vec<YearCount> {
    counts
        .iter()
        .map(|(&year, &count)| {
            let previous = counts.get(&(year - 1)).copied().unwrap_or(0);
            YearCount {
                year,
                count,
                growth_pct: growth_rate(previous, count),
            }
        })
        .collect()
}

/// Indices (0-based) of the busiest and quietest months.
/// All twelve months take part; ties resolve to the earliest month.
pub fn month_extremes(by_month: &[u32; 12]) -> (usize, usize) {
    let mut busiest = 0;
    let mut quietest = 0;
    for (i, &count) in by_month.iter().enumerate() {
        if count > by_month[busiest] {
            busiest = i;
        }
        if count < by_month[quietest] {
            quietest = i;
        }
    }
    (busiest, quietest)
}

fn count_years<I>(years: I) -> BTreeMap<i32, u32>
where
    I: IntoIterator<Item = i32>,
{
    let mut counts = BTreeMap::new();
    for year in years {
        *counts.entry(year).or_default() += 1;
    }
    counts
}

fn month_count(by_month: &[u32; 12], index: usize) -> MonthCount {
    MonthCount {
        month: index as u32 + 1,
        name: MONTH_NAMES[index].to_string(),
        count: by_month[index],
    }
}

/// Aggregate the enriched tables.
pub fn summarize(
    tournaments: &[EnrichedTournamentRecord],
    matches: &[EnrichedMatchRecord],
    diagnostics: DiagnosticCounts,
) -> SummaryReport {
    let tournaments_by_year = yearly_growth(&count_years(
        tournaments.iter().map(|t| t.dimensions.year),
    ));
    let matches_by_year = yearly_growth(&count_years(
        matches
            .iter()
            .filter_map(|m| m.dimensions.as_ref().map(|d| d.year)),
    ));

    let overall_growth_pct = match (tournaments_by_year.first(), tournaments_by_year.last()) {
        (Some(first), Some(last)) if first.year != last.year => {
            growth_rate(first.count, last.count)
        }
        _ => None,
    };

    // Earliest year wins a tie
    let peak_year = tournaments_by_year
        .iter()
        .fold(None::<&YearCount>, |best, y| match best {
            Some(b) if b.count >= y.count => Some(b),
            _ => Some(y),
        })
        .cloned();

    let mut by_month = [0u32; 12];
    let mut seasons: BTreeMap<Season, u32> = BTreeMap::new();
    let mut phases: BTreeMap<SeasonPhase, u32> = BTreeMap::new();
    for t in tournaments {
        if let Some(slot) = by_month.get_mut((t.dimensions.month as usize).wrapping_sub(1)) {
            *slot += 1;
        }
        *seasons.entry(t.dimensions.season).or_default() += 1;
        *phases.entry(t.dimensions.pre_post_season).or_default() += 1;
    }

    let (busiest_month, quietest_month) = if tournaments.is_empty() {
        (None, None)
    } else {
        let (busiest, quietest) = month_extremes(&by_month);
        (
            Some(month_count(&by_month, busiest)),
            Some(month_count(&by_month, quietest)),
        )
    };

    let mut coverage = Coverage {
        tournaments_enriched: tournaments.len(),
        matches_total: matches.len(),
        diagnostics,
        ..Default::default()
    };
    for m in matches {
        match m.dimension_source {
            DimensionSource::Tournament => coverage.matches_inherited += 1,
            DimensionSource::Match => coverage.matches_recomputed += 1,
            DimensionSource::Unresolved => coverage.matches_without_dimensions += 1,
        }
    }

    SummaryReport {
        tournaments_by_year,
        matches_by_year,
        overall_growth_pct,
        peak_year,
        by_season: Season::ALL
            .iter()
            .map(|s| SeasonCount {
                season: *s,
                count: seasons.get(s).copied().unwrap_or(0),
            })
            .collect(),
        by_phase: SeasonPhase::ALL
            .iter()
            .map(|p| PhaseCount {
                phase: *p,
                count: phases.get(p).copied().unwrap_or(0),
            })
            .collect(),
        by_month: (0..12).map(|i| month_count(&by_month, i)).collect(),
        busiest_month,
        quietest_month,
        coverage,
    }
}

fn fmt_growth(growth: Option<f64>) -> String {
    match growth {
        Some(g) => format!("{:+.1}%", g),
        None => "N/A".to_string(),
    }
}

const RULE_HEAVY: &str =
    "================================================================================";
const RULE_LIGHT: &str =
    "--------------------------------------------------------------------------------";

impl SummaryReport {
    /// Plain-text BI report.
    pub fn render_text(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for SummaryReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", RULE_HEAVY)?;
        writeln!(f, "PADEL TIME DIMENSION ANALYSIS")?;
        writeln!(f, "{}", RULE_HEAVY)?;
        writeln!(f)?;

        writeln!(f, "GROWTH ANALYSIS")?;
        writeln!(f, "{}", RULE_LIGHT)?;
        writeln!(f)?;
        writeln!(f, "Tournaments by Year:")?;
        for y in &self.tournaments_by_year {
            writeln!(
                f,
                "  {}: {} tournaments (YoY {})",
                y.year,
                y.count,
                fmt_growth(y.growth_pct)
            )?;
        }
        if self.tournaments_by_year.len() > 1 {
            writeln!(f)?;
            writeln!(f, "Growth Rate: {}", fmt_growth(self.overall_growth_pct))?;
        }

        if !self.matches_by_year.is_empty() {
            writeln!(f)?;
            writeln!(f, "Matches by Year:")?;
            for y in &self.matches_by_year {
                writeln!(
                    f,
                    "  {}: {} matches (YoY {})",
                    y.year,
                    y.count,
                    fmt_growth(y.growth_pct)
                )?;
            }
        }

        writeln!(f)?;
        writeln!(f, "Tournaments by Padel Season:")?;
        for s in &self.by_season {
            writeln!(f, "  {}: {} tournaments", s.season, s.count)?;
        }

        writeln!(f)?;
        writeln!(f, "Tournaments by Competitive Phase:")?;
        for p in &self.by_phase {
            writeln!(f, "  {}: {} tournaments", p.phase, p.count)?;
        }

        writeln!(f)?;
        writeln!(f, "Tournaments by Month:")?;
        for m in &self.by_month {
            writeln!(f, "  {}: {} tournaments", m.name, m.count)?;
        }

        writeln!(f)?;
        writeln!(f, "{}", RULE_HEAVY)?;
        writeln!(f, "KEY BI INSIGHTS")?;
        writeln!(f, "{}", RULE_HEAVY)?;
        writeln!(f)?;

        writeln!(f, "1. HOW FAST IS PADEL GROWING?")?;
        match (self.tournaments_by_year.first(), self.tournaments_by_year.last()) {
            (Some(first), Some(last)) if first.year != last.year => writeln!(
                f,
                "   Growth: {} from {} to {}",
                fmt_growth(self.overall_growth_pct),
                first.year,
                last.year
            )?,
            _ => writeln!(f, "   Growth: N/A (fewer than two years of data)")?,
        }

        writeln!(f)?;
        writeln!(f, "2. WHICH YEARS SAW SPIKES?")?;
        match &self.peak_year {
            Some(y) => writeln!(f, "   Peak Year: {} with {} tournaments", y.year, y.count)?,
            None => writeln!(f, "   Peak Year: N/A")?,
        }

        writeln!(f)?;
        writeln!(f, "3. BEST TIME FOR TOURNAMENTS?")?;
        if let Some(m) = &self.busiest_month {
            writeln!(f, "   Most Active: {} with {} tournaments", m.name, m.count)?;
        }
        if let Some(m) = &self.quietest_month {
            writeln!(f, "   Least Active: {} with {} tournaments", m.name, m.count)?;
        }
        if self.busiest_month.is_none() {
            writeln!(f, "   N/A")?;
        }

        let c = &self.coverage;
        writeln!(f)?;
        writeln!(f, "{}", RULE_HEAVY)?;
        writeln!(f, "ENRICHMENT COVERAGE")?;
        writeln!(f, "{}", RULE_HEAVY)?;
        writeln!(f)?;
        writeln!(f, "  Tournaments enriched: {}", c.tournaments_enriched)?;
        writeln!(
            f,
            "  Matches: {} ({} inherited, {} own date, {} without dimensions)",
            c.matches_total, c.matches_inherited, c.matches_recomputed, c.matches_without_dimensions
        )?;
        writeln!(
            f,
            "  Skipped records: {} ({} invalid dates, {} missing dates)",
            c.diagnostics.skipped, c.diagnostics.invalid_dates, c.diagnostics.missing_dates
        )?;
        writeln!(
            f,
            "  Warnings: {} ({} ignored end dates)",
            c.diagnostics.warnings, c.diagnostics.invalid_end_dates
        )?;
        writeln!(
            f,
            "  Unresolved match references: {}",
            c.diagnostics.unresolved_references
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PhaseTable;
    use crate::enrich::{enrich_matches, enrich_tournaments};
    use crate::models::{MatchRecord, TournamentRecord};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_yearly_growth_example() {
        let counts: BTreeMap<i32, u32> = [(2025, 294), (2026, 398)].into_iter().collect();
        let growth = yearly_growth(&counts);

        assert_eq!(growth[0].growth_pct, None);
        let pct = growth[1].growth_pct.unwrap();
        assert!((pct - 35.37).abs() < 0.01, "got {}", pct);
    }

    #[test]
    fn test_yearly_growth_gap_year_is_na() {
        let counts: BTreeMap<i32, u32> = [(2023, 10), (2025, 20)].into_iter().collect();
        let growth = yearly_growth(&counts);

        assert_eq!(growth[1].year, 2025);
        assert_eq!(growth[1].growth_pct, None);
    }

    #[test]
    fn test_month_extremes_december_minimum() {
        let by_month = [30, 25, 28, 40, 33, 20, 15, 12, 31, 27, 22, 7];
        let (busiest, quietest) = month_extremes(&by_month);

        assert_eq!(MONTH_NAMES[busiest], "April");
        assert_eq!(MONTH_NAMES[quietest], "December");
    }

    #[test]
    fn test_month_extremes_ties_pick_earliest() {
        let by_month = [5, 9, 9, 1, 1, 5, 5, 5, 5, 5, 5, 5];
        assert_eq!(month_extremes(&by_month), (1, 3));
    }

    fn fixture() -> SummaryReport {
        let phases = PhaseTable::default();
        let tournaments = vec![
            TournamentRecord::new("T1", "A").with_start_date("2025-01-15"),
            TournamentRecord::new("T2", "B").with_start_date("2025-12-05"),
            TournamentRecord::new("T3", "C").with_start_date("2026-02-07"),
            TournamentRecord::new("T4", "D").with_start_date("2026-07-01"),
            TournamentRecord::new("T5", "E").with_start_date("2026-07-20"),
            TournamentRecord::new("T6", "No date"),
        ];
        let enriched = enrich_tournaments(&tournaments, &phases);
        let matches = vec![
            MatchRecord::new("T1"),
            MatchRecord::new("T3").with_match_date("2026-02-09"),
            MatchRecord::new("T99"),
        ];
        let matched = enrich_matches(&matches, &enriched);

        let mut diagnostics = enriched.diagnostics.clone();
        diagnostics.merge(matched.diagnostics.clone());
        summarize(&enriched.records, &matched.records, diagnostics.counts())
    }

    #[test]
    fn test_summarize_counts() {
        let report = fixture();

        assert_eq!(
            report
                .tournaments_by_year
                .iter()
                .map(|y| (y.year, y.count))
                .collect::<Vec<_>>(),
            vec![(2025, 2), (2026, 3)]
        );
        assert_eq!(report.overall_growth_pct, Some(50.0));
        assert_eq!(report.peak_year.as_ref().map(|y| y.year), Some(2026));

        let winter = &report.by_season[0];
        assert_eq!(winter.season, Season::Winter);
        assert_eq!(winter.count, 3);
        assert_eq!(report.by_season[2].count, 2);

        assert_eq!(report.by_month.len(), 12);
        assert_eq!(report.busiest_month.as_ref().unwrap().name, "July");
        assert_eq!(report.quietest_month.as_ref().unwrap().name, "March");
    }

    #[test]
    fn test_summarize_coverage() {
        let c = fixture().coverage;

        assert_eq!(c.tournaments_enriched, 5);
        assert_eq!(c.matches_total, 3);
        assert_eq!(c.matches_inherited, 1);
        assert_eq!(c.matches_recomputed, 1);
        assert_eq!(c.matches_without_dimensions, 1);
        assert_eq!(c.diagnostics.skipped, 1);
        assert_eq!(c.diagnostics.missing_dates, 1);
        assert_eq!(c.diagnostics.unresolved_references, 1);
    }

    #[test]
    fn test_summarize_matches_by_year() {
        let report = fixture();
        assert_eq!(
            report
                .matches_by_year
                .iter()
                .map(|y| (y.year, y.count))
                .collect::<Vec<_>>(),
            vec![(2025, 1), (2026, 1)]
        );
    }

    #[test]
    fn test_summarize_empty() {
        let report = summarize(&[], &[], DiagnosticCounts::default());

        assert!(report.tournaments_by_year.is_empty());
        assert_eq!(report.overall_growth_pct, None);
        assert!(report.peak_year.is_none());
        assert!(report.busiest_month.is_none());
        assert!(report.render_text().contains("N/A"));
    }

    #[test]
    fn test_render_text() {
        let text = fixture().render_text();

        assert!(text.starts_with(RULE_HEAVY));
        assert!(text.contains("PADEL TIME DIMENSION ANALYSIS"));
        assert!(text.contains("  2025: 2 tournaments (YoY N/A)"));
        assert!(text.contains("  2026: 3 tournaments (YoY +50.0%)"));
        assert!(text.contains("Growth Rate: +50.0%"));
        assert!(text.contains("  Winter: 3 tournaments"));
        assert!(text.contains("Most Active: July with 2 tournaments"));
        assert!(text.contains("Unresolved match references: 1"));
    }

    #[test]
    fn test_summary_json_round_trip() {
        let report = fixture();
        let json = serde_json::to_string(&report).unwrap();
        let back: SummaryReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back, report);
    }
}
