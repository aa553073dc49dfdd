//! The active project selection.

use serde::{Deserialize, Serialize};

/// A project directory the backend resolves traces against.
///
/// Exactly one project is active at a time; selecting a new one invalidates
/// every loaded collection scoped to the previous project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    /// Absolute directory path, passed verbatim to the backend.
    pub path: String,
    /// Display label (defaults to the path when none was given).
    pub label: String,
}

impl Project {
    /// Create a project whose label is its path.
    #[must_use]
    pub fn from_path(path: impl Into<String>) -> Self {
        let path = path.into();
        Self {
            label: path.clone(),
            path,
        }
    }

    /// Create a project with an explicit display label.
    #[must_use]
    pub fn new(path: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            label: label.into(),
        }
    }
}
