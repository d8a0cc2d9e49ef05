//! Tournament records, raw and enriched.

use serde::{Deserialize, Serialize};

use super::{CalendarDimensions, EntityId, TournamentId};

/// A scraped tournament row.
///
/// Dates are kept as the raw strings the scraper produced (padelfip uses
/// `DD/MM/YYYY`); they are parsed during enrichment so bad values surface as
/// per-record errors instead of failing the whole load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TournamentRecord {
    /// Upstream identifier (event slug). May be blank in older scrapes.
    #[serde(default)]
    pub id: TournamentId,

    pub name: String,

    #[serde(default)]
    pub start_date: Option<String>,

    #[serde(default)]
    pub end_date: Option<String>,

    #[serde(default)]
    pub category: Option<String>,

    #[serde(default)]
    pub venue: Option<String>,

    /// Location (city, country)
    #[serde(default)]
    pub location: Option<String>,

    #[serde(default)]
    pub prize_money: Option<String>,

    /// FINISHED, LIVE, REGISTRATION OPEN, ...
    #[serde(default)]
    pub status: Option<String>,

    /// Event page the row was scraped from
    #[serde(default)]
    pub url: Option<String>,
}

impl TournamentRecord {
    pub fn new(id: impl Into<TournamentId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            start_date: None,
            end_date: None,
            category: None,
            venue: None,
            location: None,
            prize_money: None,
            status: None,
            url: None,
        }
    }

    /// Builder method to set the start date.
    pub fn with_start_date(mut self, date: impl Into<String>) -> Self {
        self.start_date = Some(date.into());
        self
    }

    /// Builder method to set the end date.
    pub fn with_end_date(mut self, date: impl Into<String>) -> Self {
        self.end_date = Some(date.into());
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    /// Assign a content-derived id when the scraper left it blank.
    pub fn ensure_id(&mut self) {
        if self.id.is_blank() {
            self.id = EntityId::generate(&[
                &self.name,
                self.start_date.as_deref().unwrap_or(""),
                self.end_date.as_deref().unwrap_or(""),
            ]);
        }
    }
}

/// A tournament with its calendar dimensions appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichedTournamentRecord {
    #[serde(flatten)]
    pub record: TournamentRecord,

    #[serde(flatten)]
    pub dimensions: CalendarDimensions,
}
