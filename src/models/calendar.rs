//! Calendar dimension types attached to enriched records.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Calendar quarter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Quarter {
    Q1,
    Q2,
    Q3,
    Q4,
}

impl Quarter {
    pub fn for_date(date: NaiveDate) -> Self {
        match date.month0() / 3 {
            0 => Quarter::Q1,
            1 => Quarter::Q2,
            2 => Quarter::Q3,
            _ => Quarter::Q4,
        }
    }
}

impl std::fmt::Display for Quarter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Quarter::Q1 => write!(f, "Q1"),
            Quarter::Q2 => write!(f, "Q2"),
            Quarter::Q3 => write!(f, "Q3"),
            Quarter::Q4 => write!(f, "Q4"),
        }
    }
}

/// Meteorological season (Northern Hemisphere), applied regardless of venue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Season {
    Winter,
    Spring,
    Summer,
    Autumn,
}

impl Season {
    /// All seasons in reporting order.
    pub const ALL: [Season; 4] = [Season::Winter, Season::Spring, Season::Summer, Season::Autumn];

    pub fn for_date(date: NaiveDate) -> Self {
        match date.month() {
            12 | 1 | 2 => Season::Winter,
            3..=5 => Season::Spring,
            6..=8 => Season::Summer,
            _ => Season::Autumn,
        }
    }
}

impl std::fmt::Display for Season {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Season::Winter => write!(f, "Winter"),
            Season::Spring => write!(f, "Spring"),
            Season::Summer => write!(f, "Summer"),
            Season::Autumn => write!(f, "Autumn"),
        }
    }
}

/// Competitive-calendar phase. Month boundaries come from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SeasonPhase {
    #[serde(rename = "Pre-Season")]
    PreSeason,
    #[serde(rename = "Peak Season")]
    PeakSeason,
    #[serde(rename = "Off-Season")]
    OffSeason,
}

impl SeasonPhase {
    pub const ALL: [SeasonPhase; 3] = [
        SeasonPhase::PreSeason,
        SeasonPhase::PeakSeason,
        SeasonPhase::OffSeason,
    ];
}

impl std::fmt::Display for SeasonPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SeasonPhase::PreSeason => write!(f, "Pre-Season"),
            SeasonPhase::PeakSeason => write!(f, "Peak Season"),
            SeasonPhase::OffSeason => write!(f, "Off-Season"),
        }
    }
}

/// English month names, index 0 = January.
pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Derived date attributes appended to a tournament or match record.
///
/// Field order is the serialized column order; keep it stable so repeated
/// runs over unchanged input produce identical output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarDimensions {
    pub year: i32,

    /// 1-12
    pub month: u32,

    pub month_name: String,

    /// 1-31
    pub day: u32,

    pub quarter: Quarter,

    /// ISO-8601 week, 1-53
    pub week_number: u32,

    pub day_of_week: String,

    /// Monday = 0 .. Sunday = 6
    pub day_of_week_num: u32,

    /// Canonical `YYYY-MM-DD`
    pub date_display: String,

    pub season: Season,

    pub pre_post_season: SeasonPhase,

    /// Whole days from the corpus minimum date. Negative only when the
    /// record predates a supplied baseline.
    pub days_since_start: i64,
}
