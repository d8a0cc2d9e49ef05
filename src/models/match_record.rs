//! Match records, raw and enriched.

use serde::{Deserialize, Serialize};

use super::{CalendarDimensions, TournamentId};

/// A scraped match result row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRecord {
    /// Parent tournament
    pub tournament_id: TournamentId,

    /// Own match date; the tournament's start date is used when absent
    #[serde(default)]
    pub match_date: Option<String>,

    #[serde(default)]
    pub round: Option<String>,

    #[serde(default)]
    pub court: Option<String>,

    #[serde(default)]
    pub score: Option<String>,

    /// Team / player names as scraped
    #[serde(default)]
    pub players: Vec<String>,
}

impl MatchRecord {
    pub fn new(tournament_id: impl Into<TournamentId>) -> Self {
        Self {
            tournament_id: tournament_id.into(),
            match_date: None,
            round: None,
            court: None,
            score: None,
            players: Vec::new(),
        }
    }

    pub fn with_match_date(mut self, date: impl Into<String>) -> Self {
        self.match_date = Some(date.into());
        self
    }

    pub fn with_round(mut self, round: impl Into<String>) -> Self {
        self.round = Some(round.into());
        self
    }

    pub fn with_score(mut self, score: impl Into<String>) -> Self {
        self.score = Some(score.into());
        self
    }
}

/// Where a match's calendar dimensions came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DimensionSource {
    /// Inherited verbatim from the parent tournament
    Tournament,
    /// Recomputed from the match's own date
    Match,
    /// No dimensions: join failed or the match date was invalid
    Unresolved,
}

/// A match with calendar dimensions joined from its tournament.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichedMatchRecord {
    #[serde(flatten)]
    pub record: MatchRecord,

    pub dimension_source: DimensionSource,

    #[serde(flatten)]
    pub dimensions: Option<CalendarDimensions>,
}

impl EnrichedMatchRecord {
    pub fn unresolved(record: MatchRecord) -> Self {
        Self {
            record,
            dimension_source: DimensionSource::Unresolved,
            dimensions: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_without_date() {
        let m: MatchRecord =
            serde_json::from_str(r#"{"tournament_id":"T1","round":"Final"}"#).unwrap();
        assert_eq!(m.tournament_id.as_str(), "T1");
        assert!(m.match_date.is_none());
        assert!(m.players.is_empty());
    }

    #[test]
    fn test_unresolved_serializes_without_dimension_fields() {
        let m = EnrichedMatchRecord::unresolved(MatchRecord::new("T99"));
        let json = serde_json::to_value(&m).unwrap();

        assert_eq!(json["dimension_source"], "unresolved");
        assert!(json.get("year").is_none());
        assert!(json.get("season").is_none());
    }
}
