//! User snippet overrides.
//!
//! Users can extend or override the registry's snippets with a
//! `snippets.json` in the config directory:
//!
//! ```json
//! {
//!     "markup": { "hero": "<section class=\"hero\">${1}</section>" },
//!     "stylesheet": { "gtc": "grid-template-columns: ${1};" }
//! }
//! ```
//!
//! Overrides are merged over the registry at cache-build time; a same-name
//! entry replaces the registry's. A missing or malformed file degrades to
//! no overrides.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct UserSnippets {
    #[serde(default)]
    pub markup: BTreeMap<String, String>,
    #[serde(default)]
    pub stylesheet: BTreeMap<String, String>,
}

impl UserSnippets {
    /// Load overrides from `snippets.json` in the config directory.
    pub fn load() -> Self {
        let Some(path) = crate::config_paths::snippets_file() else {
            return Self::default();
        };
        Self::load_from(&path)
    }

    /// Load overrides from a specific path.
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            tracing::debug!("No user snippets at {}", path.display());
            return Self::default();
        }
        match std::fs::read_to_string(path) {
            Ok(content) => match Self::from_json(&content) {
                Ok(snippets) => {
                    tracing::info!(
                        "Loaded {} user snippet override(s) from {}",
                        snippets.len(),
                        path.display()
                    );
                    snippets
                }
                Err(e) => {
                    tracing::warn!("Failed to parse user snippets at {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to read user snippets at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn from_json(content: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn is_empty(&self) -> bool {
        self.markup.is_empty() && self.stylesheet.is_empty()
    }

    pub fn len(&self) -> usize {
        self.markup.len() + self.stylesheet.len()
    }
}
