//! JSONL (JSON Lines) files.
//!
//! Every roster and round sheet is a JSONL file: one record per line, in
//! order. Reads are strict; a line that does not parse is an error, since a
//! silently skipped player or result would change the next round.

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

use super::StorageError;

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

    /// Ensure the parent directory exists.
    fn ensure_dir(&self) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        Ok(())
    }

    /// Append a single record to the file.
    pub fn append(&self, record: &T) -> Result<(), StorageError> {
        self.ensure_dir()?;

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        let mut writer = BufWriter::new(file);
        writeln!(writer, "{}", serde_json::to_string(record)?)?;
        writer.flush()?;

        debug!("Appended record to {:?}", self.path);
        Ok(())
    }

    /// Write records, replacing the entire file.
    pub fn write_all(&self, records: &[T]) -> Result<usize, StorageError> {
        self.ensure_dir()?;

        let file = File::create(&self.path)?;
        let mut writer = BufWriter::new(file);

        for record in records {
            writeln!(writer, "{}", serde_json::to_string(record)?)?;
        }

        writer.flush()?;
        debug!("Wrote {} records to {:?}", records.len(), self.path);

        Ok(records.len())
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

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Read every record. A missing file reads as empty.
    pub fn read_all(&self) -> Result<Vec<T>, StorageError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.path)?;
        let reader = BufReader::new(file);
        let mut records = Vec::new();

        for (i, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }

            let record = serde_json::from_str(&line).map_err(|source| StorageError::Parse {
                path: self.path.clone(),
                line: i + 1,
                source,
            })?;
            records.push(record);
        }

        debug!("Read {} records from {:?}", records.len(), self.path);
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GameMode, PlayerName, RosterEntry};
    use tempfile::TempDir;

    fn entry(name: &str, game_mode: GameMode) -> RosterEntry {
        RosterEntry {
            name: PlayerName::parse(name).unwrap(),
            game_mode,
        }
    }

    #[test]
    fn test_jsonl_write_and_read() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("mk.jsonl");

        let entries = vec![entry("Alice", GameMode::Core), entry("Ann", GameMode::Any)];

        let writer: JsonlWriter<RosterEntry> = JsonlWriter::new(path.clone());
        assert_eq!(writer.write_all(&entries).unwrap(), 2);

        let reader: JsonlReader<RosterEntry> = JsonlReader::new(path);
        assert_eq!(reader.read_all().unwrap(), entries);
    }

    #[test]
    fn test_jsonl_append_creates_directories() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("rosters").join("mk.jsonl");

        let writer: JsonlWriter<RosterEntry> = JsonlWriter::new(path.clone());
        writer.append(&entry("Alice", GameMode::Core)).unwrap();
        writer.append(&entry("Ann", GameMode::Movie)).unwrap();

        let reader: JsonlReader<RosterEntry> = JsonlReader::new(path);
        let read = reader.read_all().unwrap();
        assert_eq!(read.len(), 2);
        assert_eq!(read[1].game_mode, GameMode::Movie);
    }

    #[test]
    fn test_jsonl_read_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let reader: JsonlReader<RosterEntry> =
            JsonlReader::new(temp_dir.path().join("nonexistent.jsonl"));

        assert!(!reader.exists());
        assert!(reader.read_all().unwrap().is_empty());
    }

    #[test]
    fn test_jsonl_skips_blank_lines() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("blank.jsonl");
        std::fs::write(
            &path,
            "{\"name\":\"Alice\",\"game_mode\":\"core\"}\n\n{\"name\":\"Bob\",\"game_mode\":\"any\"}\n",
        )
        .unwrap();

        let reader: JsonlReader<RosterEntry> = JsonlReader::new(path);
        assert_eq!(reader.read_all().unwrap().len(), 2);
    }

    #[test]
    fn test_jsonl_rejects_malformed_line() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("bad.jsonl");
        std::fs::write(
            &path,
            "{\"name\":\"Alice\",\"game_mode\":\"core\"}\n{\"name\":\"Bob\",\"game_mode\":\"chess\"}\n",
        )
        .unwrap();

        let reader: JsonlReader<RosterEntry> = JsonlReader::new(path);
        let err = reader.read_all().unwrap_err();
        assert!(matches!(err, StorageError::Parse { line: 2, .. }));
    }

    #[test]
    fn test_write_all_overwrites_existing() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("overwrite.jsonl");

        let writer: JsonlWriter<RosterEntry> = JsonlWriter::new(path.clone());
        let reader: JsonlReader<RosterEntry> = JsonlReader::new(path);

        writer.write_all(&[entry("Old", GameMode::Any)]).unwrap();
        writer
            .write_all(&[entry("New1", GameMode::Any), entry("New2", GameMode::Core)])
            .unwrap();

        let read = reader.read_all().unwrap();
        assert_eq!(read.len(), 2);
        assert_eq!(read[0].name.as_str(), "New1");
    }
}
