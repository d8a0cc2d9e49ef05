//! Configuration loading and validation.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::models::{SeasonPhase, MONTH_NAMES};

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),

    #[error("Season phase {phase} lists month {month}, expected 1-12")]
    MonthOutOfRange { phase: SeasonPhase, month: u32 },

    #[error("Month {month} is assigned to both {first} and {second}")]
    MonthOverlap {
        month: u32,
        first: SeasonPhase,
        second: SeasonPhase,
    },

    #[error("Season phases do not cover months {0:?}")]
    MonthUncovered(Vec<u32>),
}

/// Month boundaries of the competitive padel calendar, as written in config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonPhaseConfig {
    #[serde(default = "default_pre_season")]
    pub pre_season: Vec<u32>,

    #[serde(default = "default_peak_season")]
    pub peak_season: Vec<u32>,

    #[serde(default)]
    pub off_season: Vec<u32>,
}

// Padel tour calendar: pre-season Sep-Oct, peak Nov-Aug.
fn default_pre_season() -> Vec<u32> {
    vec![9, 10]
}

fn default_peak_season() -> Vec<u32> {
    vec![11, 12, 1, 2, 3, 4, 5, 6, 7, 8]
}

impl Default for SeasonPhaseConfig {
    fn default() -> Self {
        Self {
            pre_season: default_pre_season(),
            peak_season: default_peak_season(),
            off_season: Vec::new(),
        }
    }
}

impl SeasonPhaseConfig {
    fn phases(&self) -> [(SeasonPhase, &[u32]); 3] {
        [
            (SeasonPhase::PreSeason, self.pre_season.as_slice()),
            (SeasonPhase::PeakSeason, self.peak_season.as_slice()),
            (SeasonPhase::OffSeason, self.off_season.as_slice()),
        ]
    }

    /// Check the lists partition months 1-12 and build the lookup table.
    pub fn to_table(&self) -> Result<PhaseTable, ConfigError> {
        let mut slots: [Option<SeasonPhase>; 12] = [None; 12];

        for (phase, months) in self.phases() {
            for &month in months {
                if !(1..=12).contains(&month) {
                    return Err(ConfigError::MonthOutOfRange { phase, month });
                }
                let slot = &mut slots[(month - 1) as usize];
                if let Some(first) = *slot {
                    return Err(ConfigError::MonthOverlap {
                        month,
                        first,
                        second: phase,
                    });
                }
                *slot = Some(phase);
            }
        }

        let uncovered: Vec<u32> = slots
            .iter()
            .enumerate()
            .filter(|(_, s)| s.is_none())
            .map(|(i, _)| i as u32 + 1)
            .collect();
        if !uncovered.is_empty() {
            return Err(ConfigError::MonthUncovered(uncovered));
        }

        let mut table = [SeasonPhase::PeakSeason; 12];
        for (i, slot) in slots.iter().enumerate() {
            if let Some(phase) = slot {
                table[i] = *phase;
            }
        }
        Ok(PhaseTable(table))
    }
}

/// Validated month -> season phase mapping. Total over months 1-12.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseTable([SeasonPhase; 12]);

impl PhaseTable {
    pub fn phase_for_date(&self, date: NaiveDate) -> SeasonPhase {
        self.0[date.month0() as usize]
    }

    /// Months belonging to `phase`, ascending.
    pub fn months_in(&self, phase: SeasonPhase) -> Vec<u32> {
        (1..=12u32)
            .filter(|m| self.0[(*m - 1) as usize] == phase)
            .collect()
    }

    /// One line per phase, for display.
    pub fn describe(&self) -> Vec<String> {
        SeasonPhase::ALL
            .iter()
            .map(|phase| {
                let months: Vec<&str> = self
                    .months_in(*phase)
                    .iter()
                    .map(|m| MONTH_NAMES[(*m - 1) as usize])
                    .collect();
                if months.is_empty() {
                    format!("{}: (none)", phase)
                } else {
                    format!("{}: {}", phase, months.join(", "))
                }
            })
            .collect()
    }
}

impl Default for PhaseTable {
    fn default() -> Self {
        let mut table = [SeasonPhase::PeakSeason; 12];
        for month in default_pre_season() {
            table[(month - 1) as usize] = SeasonPhase::PreSeason;
        }
        PhaseTable(table)
    }
}

/// Where a loaded configuration came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSource {
    File,
    /// No file at the given path
    Defaults,
}

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub season_phases: SeasonPhaseConfig,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
            season_phases: SeasonPhaseConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Load from `path` if it exists, otherwise use defaults.
    ///
    /// Runs before logging is set up, so the caller reports the source.
    pub fn load_or_default(path: &Path) -> Result<(Self, ConfigSource), ConfigError> {
        if path.exists() {
            Ok((Self::from_file(path)?, ConfigSource::File))
        } else {
            let config = Self::default();
            config.validate()?;
            Ok((config, ConfigSource::Defaults))
        }
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.data_dir.as_os_str().is_empty() {
            return Err(ConfigError::ValidationError(
                "data_dir must not be empty".to_string(),
            ));
        }

        self.season_phases.to_table()?;
        Ok(())
    }

    /// The validated phase table.
    pub fn phase_table(&self) -> Result<PhaseTable, ConfigError> {
        self.season_phases.to_table()
    }
}
