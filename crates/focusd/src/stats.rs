//! Lifetime statistics persistence
//!
//! Counters accumulate across sessions and are persisted as JSON at session
//! end. Loading never fails: a missing file yields zeroed defaults, and a
//! corrupt file logs a warning and also yields defaults. The origin of the
//! in-memory counters is kept observable so callers can tell persisted
//! numbers from fallbacks.

use std::fs;
use std::io;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Lifetime counters; monotonically non-decreasing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStats {
    /// Sessions completed or cancelled
    pub total_sessions: u64,
    /// Whole minutes of focus time
    pub total_minutes: u64,
    /// Processes suspended, lifetime
    pub processes_blocked: u64,
}

/// Where the in-memory counters came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatsOrigin {
    /// Loaded from the stats file
    Persisted,
    /// No stats file existed; zeroed defaults
    Absent,
    /// The stats file was unreadable or corrupt; zeroed defaults
    Corrupt,
}

/// Durable store for `SessionStats`
pub struct StatsStore {
    path: PathBuf,
    origin: StatsOrigin,
}

impl StatsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            origin: StatsOrigin::Absent,
        }
    }

    /// Load persisted counters, falling back to zeroed defaults. Corruption
    /// is a warning, never an error.
    pub fn load(&mut self) -> SessionStats {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no stats file, starting from zero");
                self.origin = StatsOrigin::Absent;
                return SessionStats::default();
            }
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "could not read stats file");
                self.origin = StatsOrigin::Corrupt;
                return SessionStats::default();
            }
        };

        match serde_json::from_str(&content) {
            Ok(stats) => {
                self.origin = StatsOrigin::Persisted;
                stats
            }
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "stats file is corrupt, starting from zero");
                self.origin = StatsOrigin::Corrupt;
                SessionStats::default()
            }
        }
    }

    /// Persist the counters. Best-effort: a failure is a warning and must not
    /// abort the session-end sequence.
    pub fn save(&self, stats: &SessionStats) {
        if let Err(err) = self.try_save(stats) {
            warn!(path = %self.path.display(), error = %err, "could not save stats");
        }
    }

    fn try_save(&self, stats: &SessionStats) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(stats)?;
        fs::write(&self.path, content)
    }

    pub fn origin(&self) -> StatsOrigin {
        self.origin
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::atomic::{AtomicU64, Ordering};

    static TEST_COUNTER: AtomicU64 = AtomicU64::new(0);

    fn temp_stats_path(test_name: &str) -> PathBuf {
        let counter = TEST_COUNTER.fetch_add(1, Ordering::SeqCst);
        env::temp_dir()
            .join(format!(
                "stats_test_{}_{}_{}",
                std::process::id(),
                test_name,
                counter
            ))
            .join("stats.json")
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let mut store = StatsStore::new(temp_stats_path("missing"));
        let stats = store.load();
        assert_eq!(stats, SessionStats::default());
        assert_eq!(store.origin(), StatsOrigin::Absent);
    }

    #[test]
    fn test_save_and_reload() {
        let path = temp_stats_path("roundtrip");
        let store = StatsStore::new(path.clone());

        let stats = SessionStats {
            total_sessions: 3,
            total_minutes: 70,
            processes_blocked: 12,
        };
        store.save(&stats);

        let mut reloaded = StatsStore::new(path.clone());
        assert_eq!(reloaded.load(), stats);
        assert_eq!(reloaded.origin(), StatsOrigin::Persisted);

        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_corrupt_file_yields_defaults() {
        let path = temp_stats_path("corrupt");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "{not json").unwrap();

        let mut store = StatsStore::new(path.clone());
        assert_eq!(store.load(), SessionStats::default());
        assert_eq!(store.origin(), StatsOrigin::Corrupt);

        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_save_creates_parent_directory() {
        let path = temp_stats_path("mkdir");
        assert!(!path.parent().unwrap().exists());

        StatsStore::new(path.clone()).save(&SessionStats::default());
        assert!(path.exists());

        let _ = fs::remove_dir_all(path.parent().unwrap());
    }
}
