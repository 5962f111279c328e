//! Process name blacklist
//!
//! Matching is case-insensitive substring containment: "chrome" matches
//! "chrome.exe", "Google Chrome Helper", and so on. Entries are loaded once
//! at engine construction and never change during a session.

use std::path::Path;

use tracing::debug;

/// Fallback list for common distracting apps, used when no blacklist file
/// exists.
pub const DEFAULT_BLACKLIST: &[&str] = &[
    "chrome", "firefox", "steam", "discord", "spotify", "telegram", "whatsapp", "slack", "teams",
    "outlook",
];

/// An ordered set of lowercase substring patterns
#[derive(Debug, Clone)]
pub struct Blacklist {
    entries: Vec<String>,
}

impl Default for Blacklist {
    fn default() -> Self {
        Self {
            entries: DEFAULT_BLACKLIST.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Blacklist {
    /// Build a blacklist from raw entries. Entries are trimmed and
    /// lowercased; blank entries are dropped (an empty pattern would match
    /// every process).
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let entries = entries
            .into_iter()
            .map(|e| e.as_ref().trim().to_lowercase())
            .filter(|e| !e.is_empty())
            .collect();
        Self { entries }
    }

    /// Load a blacklist from a file with one pattern per line. An absent or
    /// unreadable file falls back to the default list.
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                debug!(path = %path.display(), "loaded blacklist file");
                Self::new(content.lines())
            }
            Err(_) => {
                debug!(path = %path.display(), "no blacklist file, using defaults");
                Self::default()
            }
        }
    }

    /// True iff any entry is a substring of the lowercased name.
    pub fn is_blacklisted(&self, name: &str) -> bool {
        let name = name.to_lowercase();
        self.entries.iter().any(|entry| name.contains(entry.as_str()))
    }

    /// The patterns, in load order
    pub fn entries(&self) -> &[String] {
        &self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::fs;
    use std::sync::atomic::{AtomicU64, Ordering};

    static TEST_COUNTER: AtomicU64 = AtomicU64::new(0);

    fn temp_file(test_name: &str) -> std::path::PathBuf {
        let counter = TEST_COUNTER.fetch_add(1, Ordering::SeqCst);
        env::temp_dir().join(format!(
            "blacklist_test_{}_{}_{}",
            std::process::id(),
            test_name,
            counter
        ))
    }

    #[test]
    fn test_substring_match() {
        let blacklist = Blacklist::new(["chrome", "spotify"]);
        assert!(blacklist.is_blacklisted("chrome.exe"));
        assert!(blacklist.is_blacklisted("spotify.exe"));
        assert!(blacklist.is_blacklisted("google-chrome-stable"));
        assert!(!blacklist.is_blacklisted("emacs"));
        assert!(!blacklist.is_blacklisted("chrom"));
    }

    #[test]
    fn test_match_is_case_insensitive() {
        let blacklist = Blacklist::new(["chrome"]);
        assert!(blacklist.is_blacklisted("Google Chrome Helper"));
        assert!(blacklist.is_blacklisted("CHROME.EXE"));
    }

    #[test]
    fn test_entries_are_normalized() {
        let blacklist = Blacklist::new(["  Chrome ", "", "  "]);
        assert_eq!(blacklist.entries(), ["chrome"]);
        assert!(blacklist.is_blacklisted("chrome"));
        assert!(!blacklist.is_blacklisted("emacs"));
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let blacklist = Blacklist::load(Path::new("/nonexistent/blacklist.txt"));
        assert_eq!(blacklist.entries().len(), DEFAULT_BLACKLIST.len());
        assert!(blacklist.is_blacklisted("discord"));
    }

    #[test]
    fn test_load_from_file() {
        let path = temp_file("load");
        fs::write(&path, "Chrome\n\nreddit\n").unwrap();

        let blacklist = Blacklist::load(&path);
        assert_eq!(blacklist.entries(), ["chrome", "reddit"]);
        assert!(blacklist.is_blacklisted("reddit-desktop"));
        assert!(!blacklist.is_blacklisted("spotify"));

        let _ = fs::remove_file(&path);
    }
}
