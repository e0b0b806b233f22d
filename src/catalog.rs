//! Catalog loading and validation.
//!
//! Converts a decoded [`RawCatalog`] into validated [`LibraryRecord`]s. The
//! loader is strict: the first missing or empty required field anywhere in
//! the catalog fails the entire load, so callers never see a partial catalog.
//!
//! # Field rules
//!
//! - `id`, `suffixDir`, `description`, `categories`, `sampleCode`,
//!   `licenseSummary`, `licenseUrl` must be non-empty
//! - `fsName` defaults to `id`, `title` to `fsName`, `version` to the catalog
//!   default version
//! - `files` falls back to the legacy single `file`/`url` pair
//! - `documentation` must hold at least one link with both url and label
//! - `categories` and `worksWellWith` are comma-separated lists

use crate::error::CatalogError;
use crate::library::{
    CatalogSettings, DocLink, LibraryFile, LibraryRecord, FALLBACK_BASE_DIR, FALLBACK_VERSION,
    MAX_WORKS_WELL_WITH,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub type Result<T> = std::result::Result<T, CatalogError>;

/// One `{path, url}` pair as it appears in the source, before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawFile {
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawDocLink {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub label: Option<String>,
}

/// A single undecoded catalog entry: scalar fields by name plus the two lists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawEntry {
    #[serde(flatten)]
    pub fields: BTreeMap<String, String>,
    #[serde(default)]
    pub files: Vec<RawFile>,
    #[serde(default)]
    pub documentation: Vec<RawDocLink>,
}

impl RawEntry {
    /// Builder-style helper used by decoders and tests.
    pub fn with_field(mut self, name: &str, value: &str) -> Self {
        self.fields.insert(name.to_string(), value.to_string());
        self
    }

    /// Trimmed field value; absent fields read as empty.
    fn text(&self, name: &str) -> &str {
        self.fields.get(name).map(|v| v.trim()).unwrap_or("")
    }
}

/// Decoded catalog handed to the loader by whatever parsed the source markup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCatalog {
    #[serde(default)]
    pub base_dir: Option<String>,
    #[serde(default)]
    pub default_version: Option<String>,
    #[serde(default, rename = "libraries")]
    pub entries: Vec<RawEntry>,
}

/// Validated catalog: settings plus records in catalog order.
#[derive(Debug, Clone)]
pub struct Catalog {
    settings: CatalogSettings,
    records: Vec<LibraryRecord>,
    by_id: BTreeMap<String, usize>,
}

impl Catalog {
    /// Validate every entry of `raw`. Fails on the first structural error.
    pub fn load(raw: &RawCatalog) -> Result<Self> {
        let settings = catalog_settings(raw);

        let mut records = Vec::with_capacity(raw.entries.len());
        let mut by_id = BTreeMap::new();
        for entry in &raw.entries {
            let record = parse_entry(entry, &settings)?;
            if by_id.contains_key(&record.id) {
                return Err(CatalogError::DuplicateId { id: record.id });
            }
            by_id.insert(record.id.clone(), records.len());
            records.push(record);
        }

        tracing::debug!(
            libraries = records.len(),
            base_dir = %settings.base_dir_default,
            "catalog parsed"
        );

        Ok(Self {
            settings,
            records,
            by_id,
        })
    }

    pub fn settings(&self) -> &CatalogSettings {
        &self.settings
    }

    pub fn records(&self) -> &[LibraryRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&LibraryRecord> {
        self.by_id.get(id).map(|&idx| &self.records[idx])
    }

    pub fn into_parts(self) -> (CatalogSettings, Vec<LibraryRecord>) {
        (self.settings, self.records)
    }

    /// Resolve a record's cross-links. Ids with no matching record are dropped.
    pub fn works_well_with(&self, record: &LibraryRecord) -> Vec<&LibraryRecord> {
        record
            .works_well_with
            .iter()
            .take(MAX_WORKS_WELL_WITH)
            .filter_map(|id| {
                let found = self.get(id);
                if found.is_none() {
                    tracing::warn!(
                        library = %record.id,
                        related = %id,
                        "dropping unknown related library"
                    );
                }
                found
            })
            .collect()
    }

    /// Case-insensitive substring search over title, description, categories
    /// and file paths, optionally restricted to records carrying `tag`.
    pub fn search(&self, query: &str, tag: Option<&str>) -> Vec<&LibraryRecord> {
        let query = query.trim().to_lowercase();
        let tag = tag.map(str::trim).filter(|t| !t.is_empty());

        self.records
            .iter()
            .filter(|record| match tag {
                Some(tag) => record.categories.iter().any(|c| c.eq_ignore_ascii_case(tag)),
                None => true,
            })
            .filter(|record| query.is_empty() || search_haystack(record).contains(&query))
            .collect()
    }
}

fn search_haystack(record: &LibraryRecord) -> String {
    let categories = record.categories.join(" ");
    let paths: Vec<&str> = record.files.iter().map(|f| f.path.as_str()).collect();
    let paths = paths.join(" ");
    [
        record.title.as_str(),
        record.description.as_str(),
        categories.as_str(),
        paths.as_str(),
    ]
    .join(" ")
    .to_lowercase()
}

fn catalog_settings(raw: &RawCatalog) -> CatalogSettings {
    let pick = |value: &Option<String>, fallback: &str| {
        value
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .unwrap_or(fallback)
            .to_string()
    };
    CatalogSettings {
        base_dir_default: pick(&raw.base_dir, FALLBACK_BASE_DIR),
        default_version: pick(&raw.default_version, FALLBACK_VERSION),
    }
}

fn ensure_content(value: &str, field: &str, id: &str) -> Result<()> {
    if value.is_empty() {
        return Err(CatalogError::missing(field, id));
    }
    Ok(())
}

fn required(entry: &RawEntry, field: &str, id: &str) -> Result<String> {
    let value = entry.text(field);
    ensure_content(value, field, id)?;
    Ok(value.to_string())
}

fn parse_entry(entry: &RawEntry, settings: &CatalogSettings) -> Result<LibraryRecord> {
    let id = entry.text("id").to_string();
    ensure_content(&id, "id", &id)?;

    let fs_name = non_empty_or(entry.text("fsName"), &id);
    let files = parse_files(entry, &id)?;
    let suffix_dir = required(entry, "suffixDir", &id)?;
    let version = non_empty_or(entry.text("version"), &settings.default_version);
    let title = non_empty_or(entry.text("title"), &fs_name);
    let description = required(entry, "description", &id)?;

    let categories_raw = required(entry, "categories", &id)?;
    let categories = parse_tags(&categories_raw);

    let sample_code = required(entry, "sampleCode", &id)?;
    let license_summary = required(entry, "licenseSummary", &id)?;
    let license_url = required(entry, "licenseUrl", &id)?;

    let mut works_well_with = parse_tags(entry.text("worksWellWith"));
    works_well_with.truncate(MAX_WORKS_WELL_WITH);

    let documentation = parse_documentation(entry, &id)?;

    Ok(LibraryRecord {
        id,
        fs_name,
        files,
        suffix_dir,
        version,
        title,
        description,
        categories,
        sample_code,
        license_summary,
        license_url,
        works_well_with,
        documentation,
    })
}

fn non_empty_or(value: &str, fallback: &str) -> String {
    if value.is_empty() {
        fallback.to_string()
    } else {
        value.to_string()
    }
}

fn trimmed(value: &Option<String>) -> &str {
    value.as_deref().map(str::trim).unwrap_or("")
}

/// Explicit file list, or the legacy single `file`/`url` pair.
fn parse_files(entry: &RawEntry, id: &str) -> Result<Vec<LibraryFile>> {
    if !entry.files.is_empty() {
        return entry
            .files
            .iter()
            .enumerate()
            .map(|(index, file)| {
                let path = trimmed(&file.path);
                ensure_content(path, &format!("files[{index}].path"), id)?;
                let url = trimmed(&file.url);
                ensure_content(url, &format!("files[{index}].url"), id)?;
                Ok(LibraryFile {
                    path: path.to_string(),
                    url: url.to_string(),
                })
            })
            .collect();
    }

    let path = entry.text("file");
    ensure_content(path, "file", id)?;
    let url = entry.text("url");
    ensure_content(url, "url", id)?;
    Ok(vec![LibraryFile {
        path: path.to_string(),
        url: url.to_string(),
    }])
}

fn parse_documentation(entry: &RawEntry, id: &str) -> Result<Vec<DocLink>> {
    if entry.documentation.is_empty() {
        return Err(CatalogError::missing("documentation", id));
    }
    entry
        .documentation
        .iter()
        .enumerate()
        .map(|(index, link)| {
            let url = trimmed(&link.url);
            ensure_content(url, &format!("documentation[{index}].url"), id)?;
            let label = trimmed(&link.label);
            ensure_content(label, &format!("documentation[{index}].label"), id)?;
            Ok(DocLink {
                url: url.to_string(),
                label: label.to_string(),
            })
        })
        .collect()
}

/// Split on commas, trim, drop empty tokens.
pub fn parse_tags(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}
