//! JSONL (JSON Lines) tables.
//!
//! Each line is one record. Scraper output is read from the raw directory and
//! enriched tables are written to the derived directory.

use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, info, warn};

use super::{StorageConfig, StorageError};
use crate::models::TournamentRecord;

/// Tables exchanged with the scrapers and BI tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityType {
    Tournament,
    Match,
    EnrichedTournament,
    EnrichedMatch,
    /// Per-record errors and warnings of the last enrichment run
    Diagnostic,
}

impl EntityType {
    /// Get the filename for this entity type.
    pub fn filename(&self) -> &'static str {
        match self {
            EntityType::Tournament => "tournaments.jsonl",
            EntityType::Match => "match_results.jsonl",
            EntityType::EnrichedTournament => "tournaments_with_time_dimensions.jsonl",
            EntityType::EnrichedMatch => "match_results_with_time_dimensions.jsonl",
            EntityType::Diagnostic => "diagnostics.jsonl",
        }
    }

    /// Whether the table is scraper input (raw) or enrichment output (derived).
    pub fn is_derived(&self) -> bool {
        matches!(
            self,
            EntityType::EnrichedTournament | EntityType::EnrichedMatch | EntityType::Diagnostic
        )
    }
}

/// Get the path of an entity table under the data directory.
pub fn entity_path(config: &StorageConfig, entity: EntityType) -> PathBuf {
    let dir = if entity.is_derived() {
        config.derived_dir()
    } else {
        config.raw_dir()
    };
    dir.join(entity.filename())
}

fn ensure_parent(path: &Path) -> Result<(), StorageError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

/// JSONL file writer.
pub struct JsonlWriter<T> {
    path: PathBuf,
    _marker: PhantomData<T>,
}

impl<T: Serialize> JsonlWriter<T> {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            _marker: PhantomData,
        }
    }

    pub fn for_entity(config: &StorageConfig, entity: EntityType) -> Self {
        Self::new(entity_path(config, entity))
    }

    /// Write entities, replacing the entire file.
    pub fn write_all(&self, entities: &[T]) -> Result<usize, StorageError> {
        ensure_parent(&self.path)?;

        let file = File::create(&self.path)?;
        let mut writer = BufWriter::new(file);
        let mut count = 0;

        for entity in entities {
            let json = serde_json::to_string(entity)?;
            writeln!(writer, "{}", json)?;
            count += 1;
        }

        writer.flush()?;
        info!("Wrote {} records to {:?}", count, self.path);

        Ok(count)
    }
}

/// JSONL file reader.
pub struct JsonlReader<T> {
    path: PathBuf,
    _marker: PhantomData<T>,
}

impl<T: DeserializeOwned> JsonlReader<T> {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            _marker: PhantomData,
        }
    }

    pub fn for_entity(config: &StorageConfig, entity: EntityType) -> Self {
        Self::new(entity_path(config, entity))
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Read all entities. Malformed lines are logged and skipped.
    pub fn read_all(&self) -> Result<Vec<T>, StorageError> {
        if !self.path.exists() {
            return Err(StorageError::PathNotFound(self.path.clone()));
        }

        let file = File::open(&self.path)?;
        let reader = BufReader::new(file);
        let mut entities = Vec::new();

        for (i, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }

            match serde_json::from_str(&line) {
                Ok(entity) => entities.push(entity),
                Err(e) => {
                    warn!("Failed to parse line {} in {:?}: {}", i + 1, self.path, e);
                }
            }
        }

        debug!("Read {} records from {:?}", entities.len(), self.path);
        Ok(entities)
    }
}

/// Read scraped tournaments, assigning content-derived ids where blank.
pub fn read_tournaments(path: PathBuf) -> Result<Vec<TournamentRecord>, StorageError> {
    let mut tournaments: Vec<TournamentRecord> = JsonlReader::new(path).read_all()?;
    for t in &mut tournaments {
        t.ensure_id();
    }
    Ok(tournaments)
}

/// Write a text or JSON document, replacing the file.
pub fn write_document(path: &Path, contents: &str) -> Result<(), StorageError> {
    ensure_parent(path)?;
    fs::write(path, contents)?;
    info!("Wrote {:?}", path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};
    use tempfile::TempDir;

    #[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
    struct TestEntity {
        id: String,
        value: u32,
    }

    fn entity(id: &str, value: u32) -> TestEntity {
        TestEntity {
            id: id.to_string(),
            value,
        }
    }

    #[test]
    fn test_jsonl_write_and_read() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("test.jsonl");

        let entities = vec![entity("1", 100), entity("2", 200)];
        let writer: JsonlWriter<TestEntity> = JsonlWriter::new(path.clone());
        assert_eq!(writer.write_all(&entities).unwrap(), 2);

        let reader: JsonlReader<TestEntity> = JsonlReader::new(path);
        assert_eq!(reader.read_all().unwrap(), entities);
    }

    #[test]
    fn test_write_all_overwrites_existing() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("overwrite.jsonl");

        let writer: JsonlWriter<TestEntity> = JsonlWriter::new(path.clone());
        writer.write_all(&[entity("old", 1)]).unwrap();
        writer.write_all(&[entity("a", 2), entity("b", 3)]).unwrap();

        let read = JsonlReader::<TestEntity>::new(path).read_all().unwrap();
        assert_eq!(read.len(), 2);
        assert_eq!(read[0].id, "a");
    }

    #[test]
    fn test_read_missing_file_is_error() {
        let temp_dir = TempDir::new().unwrap();
        let reader: JsonlReader<TestEntity> =
            JsonlReader::new(temp_dir.path().join("nonexistent.jsonl"));

        assert!(!reader.exists());
        assert!(matches!(
            reader.read_all(),
            Err(StorageError::PathNotFound(_))
        ));
    }

    #[test]
    fn test_read_all_skips_bad_and_empty_lines() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("bad_lines.jsonl");

        std::fs::write(
            &path,
            r#"{"id":"1","value":1}
not-valid-json

{"id":"2","value":2}
"#,
        )
        .unwrap();

        let entities = JsonlReader::<TestEntity>::new(path).read_all().unwrap();
        assert_eq!(entities, vec![entity("1", 1), entity("2", 2)]);
    }

    #[test]
    fn test_entity_paths() {
        let config = StorageConfig::new(PathBuf::from("/data"));

        assert_eq!(
            entity_path(&config, EntityType::Tournament),
            PathBuf::from("/data/raw/tournaments.jsonl")
        );
        assert_eq!(
            entity_path(&config, EntityType::EnrichedMatch),
            PathBuf::from("/data/derived/match_results_with_time_dimensions.jsonl")
        );
        assert_eq!(
            entity_path(&config, EntityType::Match),
            PathBuf::from("/data/raw/match_results.jsonl")
        );
        assert_eq!(
            entity_path(&config, EntityType::Diagnostic),
            PathBuf::from("/data/derived/diagnostics.jsonl")
        );
    }

    #[test]
    fn test_read_tournaments_assigns_missing_ids() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("tournaments.jsonl");
        std::fs::write(
            &path,
            r#"{"id":"T1","name":"Madrid P1","start_date":"07/02/2026"}
{"name":"Unnamed Open","start_date":"01/03/2026"}
"#,
        )
        .unwrap();

        let tournaments = read_tournaments(path).unwrap();
        assert_eq!(tournaments[0].id.as_str(), "T1");
        assert_eq!(tournaments[1].id.as_str().len(), 16);
    }

    #[test]
    fn test_write_document() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("out").join("report.txt");

        write_document(&path, "hello\n").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "hello\n");
    }
}
