//! Persisted client preferences.
//!
//! A small TOML file holding the recent-project list and an optional
//! home-directory override. Corrupt or missing storage degrades to the
//! default; loading never fails the caller.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{LensError, Result};
use crate::util::atomic_write;

/// Cap on the recent-project list.
pub const MAX_RECENT_PROJECTS: usize = 6;

/// One remembered project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentProject {
    /// Display name.
    pub name: String,
    /// Absolute project path; the de-duplication key.
    pub path: String,
    /// Free-form tag, e.g. a language or team label.
    #[serde(default)]
    pub tag: Option<String>,
}

/// Client configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Most-recent-first project list, de-duplicated by path.
    #[serde(default)]
    pub recent_projects: Vec<RecentProject>,
    /// Override for the directory the project picker starts in.
    #[serde(default)]
    pub home_directory: Option<String>,
}

impl ClientConfig {
    /// Load from the default location, falling back to the default value on
    /// any missing or unreadable file.
    #[must_use]
    pub fn load() -> Self {
        match default_config_path() {
            Ok(path) => Self::load_from(&path),
            Err(err) => {
                warn!(%err, "config directory unavailable, using defaults");
                Self::default()
            }
        }
    }

    /// Load from a specific path. Corrupt content degrades to the default.
    #[must_use]
    pub fn load_from(path: &Path) -> Self {
        let Ok(content) = std::fs::read_to_string(path) else {
            return Self::default();
        };
        match toml::from_str(&content) {
            Ok(config) => config,
            Err(err) => {
                warn!(%err, path = %path.display(), "corrupt config, using defaults");
                Self::default()
            }
        }
    }

    /// Save to the default location.
    pub fn save(&self) -> Result<()> {
        let path = default_config_path()?;
        self.save_to(&path)
    }

    /// Save to a specific path, atomically.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).map_err(|e| LensError::Config {
            message: format!("Failed to serialize config: {e}"),
        })?;
        atomic_write(path, content.as_bytes())
    }

    /// Record a project as most recently used.
    ///
    /// De-duplicates by path and trims the list to [`MAX_RECENT_PROJECTS`].
    pub fn remember_project(&mut self, project: RecentProject) {
        self.recent_projects.retain(|p| p.path != project.path);
        self.recent_projects.insert(0, project);
        self.recent_projects.truncate(MAX_RECENT_PROJECTS);
    }
}

/// The default configuration path.
pub fn default_config_path() -> Result<PathBuf> {
    let config_dir = dirs::config_dir().ok_or_else(|| LensError::Config {
        message: "config directory discovery unsupported on this platform".to_string(),
    })?;
    Ok(config_dir.join("blamelens").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn project(path: &str) -> RecentProject {
        RecentProject {
            name: path.rsplit('/').next().unwrap_or(path).to_string(),
            path: path.to_string(),
            tag: None,
        }
    }

    #[test]
    fn test_remember_project_mru_and_dedup() {
        let mut config = ClientConfig::default();
        config.remember_project(project("/a"));
        config.remember_project(project("/b"));
        config.remember_project(project("/a"));

        let paths: Vec<&str> = config.recent_projects.iter().map(|p| p.path.as_str()).collect();
        assert_eq!(paths, vec!["/a", "/b"]);
    }

    #[test]
    fn test_remember_project_caps_list() {
        let mut config = ClientConfig::default();
        for i in 0..10 {
            config.remember_project(project(&format!("/p{i}")));
        }
        assert_eq!(config.recent_projects.len(), MAX_RECENT_PROJECTS);
        assert_eq!(config.recent_projects[0].path, "/p9");
    }

    #[test]
    fn test_load_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = ClientConfig::load_from(&dir.path().join("nope.toml"));
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn test_load_corrupt_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "not [valid toml").unwrap();
        assert_eq!(ClientConfig::load_from(&path), ClientConfig::default());
    }

    #[test]
    fn test_save_and_reload_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = ClientConfig::default();
        config.home_directory = Some("/home/dev".to_string());
        config.remember_project(project("/a"));
        config.save_to(&path).unwrap();

        assert_eq!(ClientConfig::load_from(&path), config);
    }
}
