//! Standard paths used by focusd

use std::path::PathBuf;

/// Standard focusd paths
pub struct Paths {
    /// Data directory (~/.local/share/focusd)
    pub data: PathBuf,
    /// Config directory (~/.config/focusd)
    pub config: PathBuf,
}

impl Default for Paths {
    fn default() -> Self {
        Self::new()
    }
}

impl Paths {
    pub fn new() -> Self {
        let data = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("~/.local/share"))
            .join("focusd");

        let config = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("~/.config"))
            .join("focusd");

        Self { data, config }
    }

    /// Blacklist file (one lowercase pattern per line)
    pub fn blacklist_file(&self) -> PathBuf {
        self.config.join("blacklist.txt")
    }

    /// Persisted lifetime statistics
    pub fn stats_file(&self) -> PathBuf {
        self.data.join("stats.json")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_are_namespaced() {
        let paths = Paths::new();
        assert!(paths.data.ends_with("focusd"));
        assert!(paths.config.ends_with("focusd"));
    }

    #[test]
    fn test_file_paths() {
        let paths = Paths::new();
        assert!(paths.blacklist_file().ends_with("blacklist.txt"));
        assert!(paths.stats_file().ends_with("stats.json"));
    }
}
