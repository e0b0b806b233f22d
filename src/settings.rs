//! Caller-owned user settings.
//!
//! The core never stores these; the frontend passes them on every synthesis.

use crate::library::{CatalogSettings, FALLBACK_BASE_DIR};
use crate::paths::normalize_base_dir;
use crate::quote::Dialect;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub base_dir: String,
    pub dialect: Dialect,
}

impl Settings {
    /// Effective settings from an optional user override.
    ///
    /// A blank or absent override resolves to the catalog default.
    pub fn resolve(base_dir: Option<&str>, dialect: Dialect, catalog: &CatalogSettings) -> Self {
        let default = default_base_dir(catalog);
        Self {
            base_dir: normalize_base_dir(base_dir.unwrap_or(""), &default),
            dialect,
        }
    }

    /// True when the effective base dir differs from the catalog default.
    pub fn is_base_dir_override(&self, catalog: &CatalogSettings) -> bool {
        self.base_dir != default_base_dir(catalog)
    }

    pub fn is_dialect_override(&self) -> bool {
        self.dialect != Dialect::default()
    }
}

fn default_base_dir(catalog: &CatalogSettings) -> String {
    normalize_base_dir(&catalog.base_dir_default, FALLBACK_BASE_DIR)
}
