//! Append-only survival-time log
//!
//! One row per lost round: `score,timestamp`. The log is read back on the
//! game over screen to show the most recent rounds, oldest first.
//! Natively it lives in a plain file; in the browser, in LocalStorage.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::consts::HISTORY_ROWS;
use crate::sim::ScoreUnit;

/// Score log failures. Anything here is fatal for the running game.
#[derive(Debug, thiserror::Error)]
pub enum ScoreLogError {
    #[error("score log {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("score log line {line} is malformed: {content:?}")]
    Malformed { line: usize, content: String },
    #[error("score storage unavailable: {0}")]
    Storage(String),
}

/// A single logged round
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    /// Survival time in the active variant's unit
    pub score: u64,
    /// When the round was lost (`YYYY-MM-DD HH:MM:SS`)
    pub timestamp: String,
}

impl ScoreEntry {
    pub fn new(score: u64, timestamp: impl Into<String>) -> Self {
        Self {
            score,
            timestamp: timestamp.into(),
        }
    }

    /// Serialize as a log row (no line terminator)
    pub fn to_row(&self) -> String {
        format!("{},{}", self.score, self.timestamp)
    }

    /// Parse a log row. Accepts CSV-quoted timestamps.
    pub fn parse_row(row: &str) -> Option<Self> {
        let (score, timestamp) = row.split_once(',')?;
        let score = score.trim().trim_matches('"').parse().ok()?;
        let timestamp = timestamp.trim().trim_matches('"');
        Some(Self::new(score, timestamp))
    }

    /// History line shown on the game over screen
    pub fn display(&self, unit: ScoreUnit) -> String {
        format!(
            "Score: {} {} | Date: {}",
            self.score,
            unit.suffix(),
            self.timestamp
        )
    }
}

/// Backing storage for the log
pub trait ScoreStore {
    /// Full log text, or `None` when no log exists yet
    fn read(&mut self) -> Result<Option<String>, ScoreLogError>;
    /// Create an empty log (must not clobber an existing one)
    fn create_empty(&mut self) -> Result<(), ScoreLogError>;
    /// Append one row; the store adds the line terminator
    fn append_row(&mut self, row: &str) -> Result<(), ScoreLogError>;
}

/// The score log
#[derive(Debug)]
pub struct ScoreLog<S: ScoreStore> {
    store: S,
    unit: ScoreUnit,
}

impl<S: ScoreStore> ScoreLog<S> {
    pub fn new(store: S, unit: ScoreUnit) -> Self {
        Self { store, unit }
    }

    pub fn unit(&self) -> ScoreUnit {
        self.unit
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Read every entry in append order
    ///
    /// A missing log is created empty and reads as no history.
    pub fn load(&mut self) -> Result<Vec<ScoreEntry>, ScoreLogError> {
        let Some(text) = self.store.read()? else {
            log::info!("No score log found, starting fresh");
            self.store.create_empty()?;
            return Ok(Vec::new());
        };

        let mut entries = Vec::new();
        for (i, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let entry = ScoreEntry::parse_row(line).ok_or_else(|| ScoreLogError::Malformed {
                line: i + 1,
                content: line.to_string(),
            })?;
            entries.push(entry);
        }
        log::debug!("Loaded {} score log entries", entries.len());
        Ok(entries)
    }

    /// Append an entry
    pub fn append(&mut self, entry: &ScoreEntry) -> Result<(), ScoreLogError> {
        self.store.append_row(&entry.to_row())?;
        log::info!("Score {} {} logged", entry.score, self.unit.suffix());
        Ok(())
    }

    /// Log a score stamped with the current time
    pub fn record(&mut self, score: u64) -> Result<ScoreEntry, ScoreLogError> {
        let entry = ScoreEntry::new(score, timestamp_now());
        self.append(&entry)?;
        Ok(entry)
    }

    /// Game over screen lines for the most recent rounds
    pub fn history_lines(&mut self) -> Result<Vec<String>, ScoreLogError> {
        let entries = self.load()?;
        Ok(recent(&entries, HISTORY_ROWS)
            .iter()
            .map(|e| e.display(self.unit))
            .collect())
    }
}

/// The last `n` entries, oldest first
pub fn recent(entries: &[ScoreEntry], n: usize) -> &[ScoreEntry] {
    &entries[entries.len().saturating_sub(n)..]
}

/// In-memory store (tests, or when no persistent storage exists)
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    pub text: Option<String>,
}

impl ScoreStore for MemoryStore {
    fn read(&mut self) -> Result<Option<String>, ScoreLogError> {
        Ok(self.text.clone())
    }

    fn create_empty(&mut self) -> Result<(), ScoreLogError> {
        self.text.get_or_insert_with(String::new);
        Ok(())
    }

    fn append_row(&mut self, row: &str) -> Result<(), ScoreLogError> {
        let text = self.text.get_or_insert_with(String::new);
        text.push_str(row);
        text.push('\n');
        Ok(())
    }
}

/// Plain file store
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

#[cfg(not(target_arch = "wasm32"))]
impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> ScoreLogError {
        ScoreLogError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl ScoreStore for FileStore {
    fn read(&mut self) -> Result<Option<String>, ScoreLogError> {
        match std::fs::read_to_string(&self.path) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(self.io_error(e)),
        }
    }

    fn create_empty(&mut self) -> Result<(), ScoreLogError> {
        std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map(|_| ())
            .map_err(|e| self.io_error(e))
    }

    fn append_row(&mut self, row: &str) -> Result<(), ScoreLogError> {
        use std::io::Write;

        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| self.io_error(e))?;
        writeln!(file, "{row}").map_err(|e| self.io_error(e))
    }
}

/// LocalStorage store (WASM only)
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone)]
pub struct LocalStorageStore {
    key: String,
}

#[cfg(target_arch = "wasm32")]
impl LocalStorageStore {
    /// LocalStorage key used by the game
    pub const DEFAULT_KEY: &'static str = "capybara_evasion_scores";

    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    fn storage(&self) -> Result<web_sys::Storage, ScoreLogError> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or_else(|| ScoreLogError::Storage("LocalStorage is not available".into()))
    }
}

#[cfg(target_arch = "wasm32")]
impl Default for LocalStorageStore {
    fn default() -> Self {
        Self::new(Self::DEFAULT_KEY)
    }
}

#[cfg(target_arch = "wasm32")]
impl ScoreStore for LocalStorageStore {
    fn read(&mut self) -> Result<Option<String>, ScoreLogError> {
        self.storage()?
            .get_item(&self.key)
            .map_err(|e| ScoreLogError::Storage(format!("{e:?}")))
    }

    fn create_empty(&mut self) -> Result<(), ScoreLogError> {
        if self.read()?.is_none() {
            self.storage()?
                .set_item(&self.key, "")
                .map_err(|e| ScoreLogError::Storage(format!("{e:?}")))?;
        }
        Ok(())
    }

    fn append_row(&mut self, row: &str) -> Result<(), ScoreLogError> {
        let mut text = self.read()?.unwrap_or_default();
        text.push_str(row);
        text.push('\n');
        self.storage()?
            .set_item(&self.key, &text)
            .map_err(|e| ScoreLogError::Storage(format!("{e:?}")))
    }
}

/// strftime layout of logged timestamps
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Current time as `YYYY-MM-DD HH:MM:SS` (local time)
#[cfg(target_arch = "wasm32")]
pub fn timestamp_now() -> String {
    let date = js_sys::Date::new_0();
    format!(
        "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
        date.get_full_year(),
        date.get_month() + 1,
        date.get_date(),
        date.get_hours(),
        date.get_minutes(),
        date.get_seconds()
    )
}

/// Current time as `YYYY-MM-DD HH:MM:SS` (local time)
#[cfg(not(target_arch = "wasm32"))]
pub fn timestamp_now() -> String {
    chrono::Local::now().format(TIMESTAMP_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn memory_log() -> ScoreLog<MemoryStore> {
        ScoreLog::new(MemoryStore::default(), ScoreUnit::Millis)
    }

    #[test]
    fn test_missing_log_is_created_empty() {
        let mut log = memory_log();
        assert!(log.store().text.is_none());
        assert!(log.load().unwrap().is_empty());
        assert_eq!(log.store().text.as_deref(), Some(""));
    }

    #[test]
    fn test_round_trip_in_append_order() {
        let mut log = memory_log();
        let written: Vec<_> = (0..7)
            .map(|i| ScoreEntry::new(i * 100, format!("2024-01-0{} 10:00:00", i + 1)))
            .collect();
        for entry in &written {
            log.append(entry).unwrap();
        }
        assert_eq!(log.load().unwrap(), written);
    }

    #[test]
    fn test_history_lines() {
        let mut log = memory_log();
        log.append(&ScoreEntry::new(5, "t1")).unwrap();
        log.append(&ScoreEntry::new(12, "t2")).unwrap();
        assert_eq!(
            log.history_lines().unwrap(),
            vec![
                "Score: 5 ms | Date: t1".to_string(),
                "Score: 12 ms | Date: t2".to_string(),
            ]
        );
    }

    #[test]
    fn test_history_keeps_last_five_oldest_first() {
        let mut log = memory_log();
        for i in 1..=8 {
            log.append(&ScoreEntry::new(i, format!("t{i}"))).unwrap();
        }
        let lines = log.history_lines().unwrap();
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0], "Score: 4 ms | Date: t4");
        assert_eq!(lines[4], "Score: 8 ms | Date: t8");
    }

    #[test]
    fn test_reads_crlf_rows_and_skips_blank_lines() {
        let mut log = ScoreLog::new(
            MemoryStore {
                text: Some("1500,2024-05-01 12:00:00\r\n\r\n2750,\"2024-05-02 08:30:00\"\r\n".into()),
            },
            ScoreUnit::Millis,
        );
        let entries = log.load().unwrap();
        assert_eq!(
            entries,
            vec![
                ScoreEntry::new(1500, "2024-05-01 12:00:00"),
                ScoreEntry::new(2750, "2024-05-02 08:30:00"),
            ]
        );
    }

    #[test]
    fn test_malformed_row_is_an_error() {
        let mut log = ScoreLog::new(
            MemoryStore {
                text: Some("10,t1\nnot a row\n".into()),
            },
            ScoreUnit::Millis,
        );
        match log.load() {
            Err(ScoreLogError::Malformed { line, .. }) => assert_eq!(line, 2),
            other => panic!("expected malformed error, got {other:?}"),
        }
    }

    #[test]
    fn test_seconds_display() {
        let entry = ScoreEntry::new(9, "t");
        assert_eq!(entry.display(ScoreUnit::Seconds), "Score: 9 s | Date: t");
    }

    #[test]
    fn test_recent_tail() {
        let entries: Vec<_> = (0..3).map(|i| ScoreEntry::new(i, "t")).collect();
        assert_eq!(recent(&entries, 5).len(), 3);
        assert_eq!(recent(&entries, 2)[0].score, 1);
        assert!(recent(&[], 5).is_empty());
    }

    #[test]
    fn test_timestamp_now_shape() {
        let ts = timestamp_now();
        assert_eq!(ts.len(), 19);
        assert_eq!(&ts[4..5], "-");
        assert_eq!(&ts[10..11], " ");
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_timestamp_now_is_local_time() {
        let before = chrono::Local::now().naive_local();
        let logged = chrono::NaiveDateTime::parse_from_str(&timestamp_now(), TIMESTAMP_FORMAT)
            .expect("timestamp parses back");
        let after = chrono::Local::now().naive_local();
        // Whole-second resolution
        assert!(logged >= before - chrono::Duration::seconds(1));
        assert!(logged <= after);
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_file_store_round_trip() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("scores.csv");

        let mut log = ScoreLog::new(FileStore::new(&path), ScoreUnit::Millis);
        assert!(log.load()?.is_empty());
        assert!(path.exists());

        log.append(&ScoreEntry::new(5, "t1"))?;
        log.append(&ScoreEntry::new(12, "t2"))?;

        // A fresh handle sees the same rows
        let mut reopened = ScoreLog::new(FileStore::new(&path), ScoreUnit::Millis);
        assert_eq!(
            reopened.load()?,
            vec![ScoreEntry::new(5, "t1"), ScoreEntry::new(12, "t2")]
        );
        assert_eq!(std::fs::read_to_string(&path)?, "5,t1\n12,t2\n");
        Ok(())
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_file_store_io_error_is_reported() -> Result<(), Box<dyn std::error::Error>> {
        // A directory cannot be read as a log
        let dir = tempfile::tempdir()?;
        let mut log = ScoreLog::new(FileStore::new(dir.path()), ScoreUnit::Millis);
        assert!(matches!(log.load(), Err(ScoreLogError::Io { .. })));

        // Neither can a log inside a missing directory be created
        let mut log = ScoreLog::new(
            FileStore::new(dir.path().join("missing").join("scores.csv")),
            ScoreUnit::Millis,
        );
        assert!(matches!(log.load(), Err(ScoreLogError::Io { .. })));
        Ok(())
    }
}
