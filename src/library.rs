use serde::{Deserialize, Serialize};

/// Base directory used when neither the catalog nor the user supplies one.
pub const FALLBACK_BASE_DIR: &str = "external";

/// Version used when the catalog root does not declare `defaultVersion`.
pub const FALLBACK_VERSION: &str = "0.0.0";

/// Upper bound on cross-links kept per library.
pub const MAX_WORKS_WELL_WITH: usize = 7;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibraryFile {
    /// Relative path under the install directory, slash separated.
    pub path: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocLink {
    pub url: String,
    pub label: String,
}

/// One validated catalog entry. Built once per load and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibraryRecord {
    pub id: String,
    pub fs_name: String,
    pub files: Vec<LibraryFile>,
    pub suffix_dir: String,
    pub version: String,
    pub title: String,
    pub description: String,
    pub categories: Vec<String>,
    pub sample_code: String,
    pub license_summary: String,
    pub license_url: String,
    pub works_well_with: Vec<String>,
    pub documentation: Vec<DocLink>,
}

impl LibraryRecord {
    /// File name of the generated sample program, e.g. `test_curlib_main.c`.
    pub fn test_file(&self) -> String {
        format!("test_{}_main.c", self.fs_name)
    }

    /// Base name of the compiled sample binary (no extension).
    pub fn exe_stem(&self) -> String {
        format!("{}_example", self.fs_name)
    }

    /// Files that are passed to the compiler in addition to the sample program.
    ///
    /// Matches `.c` case-insensitively and keeps catalog order.
    pub fn c_sources(&self) -> impl Iterator<Item = (usize, &LibraryFile)> {
        self.files
            .iter()
            .enumerate()
            .filter(|(_, file)| file.path.to_ascii_lowercase().ends_with(".c"))
    }
}

/// Catalog-wide defaults declared on the catalog root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogSettings {
    pub base_dir_default: String,
    pub default_version: String,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            base_dir_default: FALLBACK_BASE_DIR.to_string(),
            default_version: FALLBACK_VERSION.to_string(),
        }
    }
}
