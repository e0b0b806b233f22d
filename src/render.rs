//! Per-record output handed to the rendering layer.
//!
//! Recomputed whenever the base directory changes; nothing here is cached.

use crate::commands::CommandSet;
use crate::library::LibraryRecord;
use crate::paths::InstallTarget;
use crate::scripts::ScriptSet;
use serde::Serialize;
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocEntry {
    pub url: String,
    pub label: String,
    /// Short `host/path` form of `url`, or `url` itself when it does not parse.
    pub display: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderData {
    pub id: String,
    pub title: String,
    pub version: String,
    pub target: InstallTarget,
    pub commands: CommandSet,
    pub scripts: ScriptSet,
    pub documentation: Vec<DocEntry>,
}

impl RenderData {
    /// Run the whole synthesis pipeline for one record.
    ///
    /// `base_dir` is the user setting; `fallback` is the catalog default used
    /// when the setting is blank.
    pub fn build(record: &LibraryRecord, base_dir: &str, fallback: &str) -> Self {
        let target = InstallTarget::resolve(record, base_dir, fallback);
        let commands = CommandSet::build(record, &target);
        let scripts = ScriptSet::build(record, &target);
        let documentation = record
            .documentation
            .iter()
            .map(|link| DocEntry {
                url: link.url.clone(),
                label: link.label.clone(),
                display: display_label(&link.url),
            })
            .collect();

        Self {
            id: record.id.clone(),
            title: record.title.clone(),
            version: record.version.clone(),
            target,
            commands,
            scripts,
            documentation,
        }
    }
}

/// Render one record with the user's base dir over the catalog default.
pub fn render(
    record: &LibraryRecord,
    base_dir: &str,
    catalog_base_default: &str,
) -> RenderData {
    RenderData::build(record, base_dir, catalog_base_default)
}

/// Human readable form of a URL: host plus path, no scheme, no trailing slash.
///
/// Never fails; anything that does not parse as a URL with a host is returned
/// unchanged.
pub fn display_label(raw: &str) -> String {
    let parsed = match Url::parse(raw) {
        Ok(url) => url,
        Err(err) => {
            tracing::debug!(url = raw, error = %err, "using raw url as label");
            return raw.to_string();
        }
    };
    let Some(host) = parsed.host_str() else {
        tracing::debug!(url = raw, "url has no host, using raw value as label");
        return raw.to_string();
    };
    let label = format!("{host}{}", parsed.path());
    label.trim_end_matches('/').to_string()
}
