// End-to-end checks from catalog text to rendered commands and scripts.

use cwget_core::catalog::{Catalog, RawCatalog, RawDocLink, RawEntry, RawFile};
use cwget_core::render::RenderData;
use cwget_core::source::{decode, from_xml};
use cwget_core::{
    render, resolve_install_dirs, CatalogError, Dialect, DownloadTool, InstallTarget,
};
use pretty_assertions::assert_eq;

const FIXTURE: &str = include_str!("fixtures/catalog.xml");

fn load_fixture() -> Catalog {
    let raw = from_xml(FIXTURE).expect("fixture decodes");
    Catalog::load(&raw).expect("fixture validates")
}

fn entry(id: &str) -> RawEntry {
    let mut entry = RawEntry::default()
        .with_field("id", id)
        .with_field("suffixDir", "net")
        .with_field("description", "HTTP helpers")
        .with_field("categories", "net")
        .with_field("sampleCode", "int main(void) { return 0; }")
        .with_field("licenseSummary", "MIT")
        .with_field("licenseUrl", "https://example.org/LICENSE");
    entry.documentation.push(RawDocLink {
        url: Some("https://example.org/docs".into()),
        label: Some("Docs".into()),
    });
    entry
}

#[test]
fn curlib_end_to_end() {
    let catalog = load_fixture();
    let record = catalog.get("curlib").unwrap();
    let data = RenderData::build(record, "external", &catalog.settings().base_dir_default);

    assert_eq!(data.target.dirs.posix, "external/net");
    assert_eq!(
        data.commands.wget_posix,
        r#"mkdir -p "external/net" && wget -O "external/net/curlib.h" "https://example.org/curlib.h""#
    );
    assert_eq!(
        data.commands.compile_posix,
        r#"cc -Wall -Wextra -I"external/net" "external/net/test_curlib_main.c" -o "external/net/curlib_example""#
    );
    assert_eq!(
        data.commands.iwr_pwsh,
        r#"New-Item -ItemType Directory -Path "external\net" -Force | Out-Null; Invoke-WebRequest "https://example.org/curlib.h" -OutFile "external\net\curlib.h""#
    );
    assert_eq!(data.documentation[0].display, "example.org/curlib/README.md");
}

#[test]
fn posix_script_for_multi_file_library() {
    let catalog = load_fixture();
    let record = catalog.get("strbuf").unwrap();
    let data = RenderData::build(record, "/opt/c/", "external");

    let expected = "\
#!/usr/bin/env bash
set -euo pipefail
BASE_DIR=\"/opt/c/text\"
TEST_PATH=\"/opt/c/text/test_strbuf_main.c\"

mkdir -p \"$BASE_DIR\"
echo \"Downloading library files...\"
curl -L \"https://example.org/strbuf.h\" -o \"/opt/c/text/strbuf.h\"
curl -L \"https://example.org/strbuf.c\" -o \"/opt/c/text/strbuf.c\"
echo \"Writing sample program...\"
cat > \"$TEST_PATH\" <<'CWGET_SAMPLE_END'
#include \"strbuf.h\"
int main(void) { strbuf s = strbuf_new(); strbuf_free(&s); return 0; }
CWGET_SAMPLE_END
echo \"Compiling sample...\"
cc -Wall -Wextra -I\"/opt/c/text\" \"/opt/c/text/test_strbuf_main.c\" \"/opt/c/text/strbuf.c\" -o \"/opt/c/text/strbuf_example\"
echo \"Done.\"
";
    assert_eq!(data.scripts.posix, expected);
}

#[test]
fn powershell_output_never_mixes_separators() {
    let catalog = load_fixture();
    let record = catalog.get("strbuf").unwrap();
    let data = RenderData::build(record, "C:\\work\\deps\\", "external");

    for path in data.target.files.iter().map(|p| p.for_dialect(Dialect::PowerShell)) {
        assert!(!path.contains('/'), "{path}");
    }
    assert!(data
        .commands
        .compile_windows
        .ends_with(r#""C:\work\deps\text\strbuf.c" /Fe"C:\work\deps\text\strbuf_example.exe""#));
    assert!(data.scripts.powershell.contains("$BaseDir = \"C:\\work\\deps\\text\""));
}

#[test]
fn blank_base_dir_uses_catalog_default() {
    let raw = from_xml(&FIXTURE.replace("baseDir=\"external\"", "baseDir=\"vendor\"")).unwrap();
    let catalog = Catalog::load(&raw).unwrap();
    let record = catalog.get("curlib").unwrap();
    let data = RenderData::build(record, "  ", &catalog.settings().base_dir_default);
    assert_eq!(data.target.dirs.posix, "vendor/net");

    let data = render(record, "", &catalog.settings().base_dir_default);
    assert_eq!(data.target.dirs.posix, "vendor/net");
    assert!(data.scripts.posix.contains("BASE_DIR=\"vendor/net\""));
}

#[test]
fn into_parts_keeps_settings_and_order() {
    let (settings, records) = load_fixture().into_parts();
    assert_eq!(settings.base_dir_default, "external");
    assert_eq!(settings.default_version, "0.1.0");
    let ids: Vec<&str> = records.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["curlib", "strbuf"]);
    assert_eq!(records[1].version, "0.1.0");
}

#[test]
fn synthesis_is_deterministic() {
    let catalog = load_fixture();
    for record in catalog.records() {
        let first = RenderData::build(record, "deps", "external");
        let second = RenderData::build(record, "deps", "external");
        assert_eq!(first, second);
    }
}

#[test]
fn legacy_pair_matches_explicit_file_list() {
    let legacy = entry("curlib")
        .with_field("file", "curlib.h")
        .with_field("url", "https://example.org/curlib.h");
    let mut explicit = entry("curlib");
    explicit.files.push(RawFile {
        path: Some("curlib.h".into()),
        url: Some("https://example.org/curlib.h".into()),
    });

    let build = |entry: RawEntry| {
        let catalog = Catalog::load(&RawCatalog {
            entries: vec![entry],
            ..RawCatalog::default()
        })
        .unwrap();
        RenderData::build(catalog.get("curlib").unwrap(), "external", "external")
    };
    assert_eq!(build(legacy), build(explicit));
}

#[test]
fn missing_license_url_fails_whole_load() {
    let mut broken = entry("broken");
    broken.fields.remove("licenseUrl");
    broken.files.push(RawFile {
        path: Some("b.h".into()),
        url: Some("https://example.org/b.h".into()),
    });
    let mut good = entry("good");
    good.files.push(RawFile {
        path: Some("g.h".into()),
        url: Some("https://example.org/g.h".into()),
    });

    let err = Catalog::load(&RawCatalog {
        entries: vec![good, broken],
        ..RawCatalog::default()
    })
    .unwrap_err();
    assert_eq!(
        err,
        CatalogError::MissingField {
            field: "licenseUrl".into(),
            id: "broken".into()
        }
    );
}

#[test]
fn every_loaded_record_has_files() {
    let catalog = load_fixture();
    assert_eq!(catalog.len(), 2);
    assert!(catalog.records().iter().all(|r| !r.files.is_empty()));
}

#[test]
fn dangling_related_ids_are_dropped() {
    let catalog = load_fixture();
    let curlib = catalog.get("curlib").unwrap();
    assert_eq!(curlib.works_well_with, vec!["strbuf", "missing-lib"]);
    let related: Vec<&str> = catalog
        .works_well_with(curlib)
        .into_iter()
        .map(|r| r.id.as_str())
        .collect();
    assert_eq!(related, vec!["strbuf"]);
}

#[test]
fn install_dirs_idempotent_over_fixture_suffixes() {
    let catalog = load_fixture();
    for base in ["external", "C:\\deps\\", "  ./vendor//", ""] {
        for record in catalog.records() {
            let once = resolve_install_dirs(base, &record.suffix_dir);
            assert_eq!(resolve_install_dirs(&once.posix, ""), once);
        }
    }
}

#[test]
fn every_download_tool_covers_every_file() {
    let catalog = load_fixture();
    let record = catalog.get("strbuf").unwrap();
    let target = InstallTarget::resolve(record, "deps", "external");
    let data = RenderData::build(record, "deps", "external");
    for tool in DownloadTool::ALL {
        let command = data.commands.download(tool);
        for (file, path) in record.files.iter().zip(&target.files) {
            assert!(command.contains(&file.url), "{}", tool.label());
            assert!(command.contains(path.for_dialect(tool.dialect())), "{}", tool.label());
        }
    }
}

#[test]
fn json_catalog_loads_like_xml() {
    let raw = from_xml(FIXTURE).unwrap();
    let json = serde_json::to_string_pretty(&raw).unwrap();
    let from_json = Catalog::load(&decode(&json).unwrap()).unwrap();
    assert_eq!(from_json.records(), load_fixture().records());
}
