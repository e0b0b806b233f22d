//! Decoders that turn stored catalog documents into a [`RawCatalog`].
//!
//! The loader in [`crate::catalog`] does not care where entries come from.
//! This module covers the encodings the catalog actually ships in: the XML
//! `<libraries>` document (optionally embedded in an HTML page inside a
//! `<script id="library-xml">` block) and a JSON form of [`RawCatalog`].

use crate::catalog::{RawCatalog, RawDocLink, RawEntry, RawFile, Result};
use crate::error::CatalogError;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

const EMBED_MARKER: &str = "id=\"library-xml\"";

/// Decode by sniffing the content: JSON object, HTML page, or bare XML.
pub fn decode(text: &str) -> Result<RawCatalog> {
    let trimmed = text.trim_start();
    if trimmed.starts_with('{') {
        from_json(trimmed)
    } else if text.contains(EMBED_MARKER) {
        from_html(text)
    } else {
        from_xml(text)
    }
}

pub fn from_json(text: &str) -> Result<RawCatalog> {
    serde_json::from_str(text).map_err(|e| CatalogError::Decode(format!("JSON parse error: {e}")))
}

/// Decode the catalog embedded in a documentation page.
pub fn from_html(html: &str) -> Result<RawCatalog> {
    let xml = extract_embedded_xml(html).ok_or_else(|| {
        CatalogError::Decode("Missing XML data block with id library-xml".to_string())
    })?;
    from_xml(xml)
}

fn extract_embedded_xml(html: &str) -> Option<&str> {
    let marker = html.find(EMBED_MARKER)?;
    let open_end = marker + html[marker..].find('>')? + 1;
    let close = open_end + html[open_end..].find("</script>")?;
    Some(&html[open_end..close])
}

struct Frame {
    name: String,
    text: String,
}

#[derive(Default)]
struct XmlState {
    catalog: RawCatalog,
    seen_root: bool,
    stack: Vec<Frame>,
    entry: Option<RawEntry>,
    file: Option<RawFile>,
    link: Option<RawDocLink>,
}

/// Decode a `<libraries>` XML document.
pub fn from_xml(xml: &str) -> Result<RawCatalog> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut state = XmlState::default();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                let name = element_name(e);
                state.open(&name, e)?;
                state.stack.push(Frame {
                    name,
                    text: String::new(),
                });
            }
            Ok(Event::Empty(ref e)) => {
                let name = element_name(e);
                state.open(&name, e)?;
                state.close(&name, String::new());
            }
            Ok(Event::End(_)) => {
                if let Some(frame) = state.stack.pop() {
                    state.close(&frame.name, frame.text);
                }
            }
            Ok(Event::Text(e)) => {
                let text = e
                    .unescape()
                    .map_err(|err| CatalogError::Decode(format!("XML parse error: {err}")))?;
                state.append_text(&text);
            }
            Ok(Event::CData(e)) => {
                let raw = e.into_inner();
                state.append_text(&String::from_utf8_lossy(&raw));
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(CatalogError::Decode(format!(
                    "XML parse error at position {}: {e}",
                    reader.buffer_position()
                )))
            }
            _ => {}
        }
        buf.clear();
    }

    if !state.seen_root {
        return Err(CatalogError::MissingRoot);
    }
    Ok(state.catalog)
}

fn element_name(e: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(e.name().as_ref()).to_string()
}

fn attributes(e: &BytesStart<'_>) -> Result<Vec<(String, String)>> {
    let mut attrs = Vec::new();
    for attr in e.attributes().flatten() {
        let key = String::from_utf8_lossy(attr.key.as_ref()).to_string();
        let value = attr
            .unescape_value()
            .map_err(|err| CatalogError::Decode(format!("XML attribute error: {err}")))?
            .to_string();
        attrs.push((key, value));
    }
    Ok(attrs)
}

fn attr<'a>(attrs: &'a [(String, String)], names: &[&str]) -> Option<&'a str> {
    names.iter().find_map(|name| {
        attrs
            .iter()
            .find(|(key, value)| key == name && !value.trim().is_empty())
            .map(|(_, value)| value.as_str())
    })
}

impl XmlState {
    fn parent(&self) -> Option<&str> {
        self.stack.last().map(|frame| frame.name.as_str())
    }

    fn append_text(&mut self, text: &str) {
        if let Some(frame) = self.stack.last_mut() {
            frame.text.push_str(text);
        }
    }

    fn open(&mut self, name: &str, e: &BytesStart<'_>) -> Result<()> {
        let parent = self.parent().map(str::to_string);
        match (name, parent.as_deref()) {
            ("libraries", _) if !self.seen_root => {
                self.seen_root = true;
                let attrs = attributes(e)?;
                self.catalog.base_dir = attr(&attrs, &["baseDir"]).map(str::to_string);
                self.catalog.default_version =
                    attr(&attrs, &["defaultVersion"]).map(str::to_string);
            }
            ("library", Some("libraries")) => {
                let attrs = attributes(e)?;
                let mut entry = RawEntry::default();
                for key in ["id", "fsName"] {
                    if let Some(value) = attr(&attrs, &[key]) {
                        entry.fields.insert(key.to_string(), value.to_string());
                    }
                }
                self.entry = Some(entry);
            }
            ("file", Some("files")) => {
                let attrs = attributes(e)?;
                self.file = Some(RawFile {
                    path: attr(&attrs, &["path"]).map(str::to_string),
                    url: attr(&attrs, &["url", "href"]).map(str::to_string),
                });
            }
            ("link", Some("documentation")) => {
                let attrs = attributes(e)?;
                self.link = Some(RawDocLink {
                    url: attr(&attrs, &["url", "href"]).map(str::to_string),
                    label: attr(&attrs, &["label"]).map(str::to_string),
                });
            }
            _ => {}
        }
        Ok(())
    }

    fn close(&mut self, name: &str, text: String) {
        let parent = self.parent().map(str::to_string);
        let text = text.trim().to_string();
        match (name, parent.as_deref()) {
            ("library", Some("libraries")) => {
                if let Some(entry) = self.entry.take() {
                    self.catalog.entries.push(entry);
                }
            }
            ("file", Some("files")) => {
                if let (Some(mut file), Some(entry)) = (self.file.take(), self.entry.as_mut()) {
                    if file.path.is_none() && !text.is_empty() {
                        file.path = Some(text);
                    }
                    entry.files.push(file);
                }
            }
            ("url", Some("file")) => {
                if let Some(file) = self.file.as_mut() {
                    if file.url.is_none() && !text.is_empty() {
                        file.url = Some(text);
                    }
                }
            }
            ("link", Some("documentation")) => {
                if let (Some(mut link), Some(entry)) = (self.link.take(), self.entry.as_mut()) {
                    if link.label.is_none() && !text.is_empty() {
                        link.label = Some(text);
                    }
                    entry.documentation.push(link);
                }
            }
            ("files", _) | ("documentation", _) => {}
            (field, Some("library")) => {
                if let Some(entry) = self.entry.as_mut() {
                    entry.fields.entry(field.to_string()).or_insert(text);
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
<libraries baseDir="vendor" defaultVersion="1.0.0">
  <library id="curlib" fsName="curlib">
    <files>
      <file path="curlib.h" url="https://example.org/curlib.h"/>
      <file path="curlib.c"><url>https://example.org/curlib.c</url></file>
    </files>
    <suffixDir>net</suffixDir>
    <description>HTTP helpers &amp; friends</description>
    <categories>net, http</categories>
    <sampleCode><![CDATA[
#include <stdio.h>
int main(void) { return 0; }
]]></sampleCode>
    <licenseSummary>MIT</licenseSummary>
    <licenseUrl>https://example.org/LICENSE</licenseUrl>
    <worksWellWith>strbuf</worksWellWith>
    <documentation>
      <link url="https://example.org/docs" label="Docs"/>
      <link href="https://example.org/api">API reference</link>
    </documentation>
  </library>
  <library id="legacy">
    <file>legacy.h</file>
    <url>https://example.org/legacy.h</url>
  </library>
</libraries>
"#;

    #[test]
    fn decodes_entries_and_defaults() {
        let raw = from_xml(SAMPLE).unwrap();
        assert_eq!(raw.base_dir.as_deref(), Some("vendor"));
        assert_eq!(raw.default_version.as_deref(), Some("1.0.0"));
        assert_eq!(raw.entries.len(), 2);

        let curlib = &raw.entries[0];
        assert_eq!(curlib.fields["id"], "curlib");
        assert_eq!(curlib.fields["description"], "HTTP helpers & friends");
        assert!(curlib.fields["sampleCode"].starts_with("#include <stdio.h>"));
        assert_eq!(curlib.files.len(), 2);
        assert_eq!(curlib.files[1].url.as_deref(), Some("https://example.org/curlib.c"));
        assert_eq!(curlib.documentation[1].label.as_deref(), Some("API reference"));
        assert_eq!(
            curlib.documentation[1].url.as_deref(),
            Some("https://example.org/api")
        );

        let legacy = &raw.entries[1];
        assert!(legacy.files.is_empty());
        assert_eq!(legacy.fields["file"], "legacy.h");
        assert_eq!(legacy.fields["url"], "https://example.org/legacy.h");
    }

    #[test]
    fn repeated_child_keeps_first_value() {
        let raw = from_xml(
            "<libraries><library id=\"x\"><title>First</title><title>Second</title></library></libraries>",
        )
        .unwrap();
        assert_eq!(raw.entries[0].fields["title"], "First");
    }

    #[test]
    fn missing_root_is_reported() {
        let err = from_xml("<catalog><library id=\"x\"/></catalog>").unwrap_err();
        assert_eq!(err, CatalogError::MissingRoot);
    }

    #[test]
    fn malformed_xml_is_a_decode_error() {
        let err = from_xml("<libraries><library id=\"x\"></libraries>").unwrap_err();
        assert!(matches!(err, CatalogError::Decode(_)));
    }

    #[test]
    fn html_page_is_unwrapped() {
        let page = format!(
            "<html><body><script type=\"application/xml\" id=\"library-xml\">{SAMPLE}</script></body></html>"
        );
        let raw = decode(&page).unwrap();
        assert_eq!(raw.entries.len(), 2);

        let err = from_html("<html></html>").unwrap_err();
        assert!(matches!(err, CatalogError::Decode(_)));
    }

    #[test]
    fn json_form_round_trips_through_serde() {
        let raw = from_xml(SAMPLE).unwrap();
        let json = serde_json::to_string(&raw).unwrap();
        assert_eq!(decode(&json).unwrap(), raw);
    }
}
