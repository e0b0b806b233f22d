//! Install directory and file path resolution.
//!
//! Every path is produced in two forms: slash separated (POSIX dialect) and
//! backslash separated (PowerShell dialect). The backslash form is applied to
//! every derived path so a single PowerShell script never mixes separators.

use crate::library::{LibraryRecord, FALLBACK_BASE_DIR};
use crate::quote::Dialect;
use serde::Serialize;

/// The same path in both dialect forms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DualPath {
    pub posix: String,
    pub windows: String,
}

impl DualPath {
    fn from_posix(posix: String) -> Self {
        let windows = posix.replace(Dialect::Posix.separator(), Dialect::PowerShell.separator());
        Self { posix, windows }
    }

    pub fn for_dialect(&self, dialect: Dialect) -> &str {
        match dialect {
            Dialect::Posix => &self.posix,
            Dialect::PowerShell => &self.windows,
        }
    }
}

/// Resolved install directories: `slash_form` and `native_form`.
pub type InstallDirs = DualPath;

/// Trim, fall back when blank, convert `\` to `/`, strip trailing slashes.
///
/// A base made only of separators also falls back, so the result is never
/// empty and normalizing twice is a no-op.
pub fn normalize_base_dir(input: &str, fallback: &str) -> String {
    let stripped = normalize_segment(input);
    if stripped.is_empty() {
        return fallback.to_string();
    }
    stripped
}

/// Slash form of a path fragment with no trailing separators or whitespace.
fn normalize_segment(input: &str) -> String {
    input
        .trim_start()
        .replace('\\', "/")
        .trim_end_matches(|c: char| c == '/' || c.is_whitespace())
        .to_string()
}

/// Combine a base directory with a record's suffix directory.
pub fn resolve_install_dirs(base_dir: &str, suffix_dir: &str) -> InstallDirs {
    resolve_install_dirs_with_fallback(base_dir, suffix_dir, FALLBACK_BASE_DIR)
}

/// As [`resolve_install_dirs`], with an explicit fallback for a blank base.
pub fn resolve_install_dirs_with_fallback(
    base_dir: &str,
    suffix_dir: &str,
    fallback: &str,
) -> InstallDirs {
    let base = normalize_base_dir(base_dir, fallback);
    let suffix = normalize_segment(suffix_dir);
    let combined = if suffix.is_empty() {
        base
    } else {
        format!("{base}{}{suffix}", Dialect::Posix.separator())
    };
    DualPath::from_posix(combined)
}

/// Every path a single `(record, base dir)` pair needs, in both forms.
///
/// Derivation is pure: identical inputs always give identical paths.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstallTarget {
    pub dirs: InstallDirs,
    pub files: Vec<DualPath>,
    pub test_path: DualPath,
    pub exe_path: DualPath,
}

impl InstallTarget {
    pub fn resolve(record: &LibraryRecord, base_dir: &str, fallback: &str) -> Self {
        let dirs = resolve_install_dirs_with_fallback(base_dir, &record.suffix_dir, fallback);
        let files = record
            .files
            .iter()
            .map(|file| join(&dirs, &file.path))
            .collect();
        let test_path = join(&dirs, &record.test_file());
        let exe_stem = record.exe_stem();
        let exe_path = DualPath {
            posix: join_in(&dirs, Dialect::Posix, &exe_stem),
            windows: join_in(&dirs, Dialect::PowerShell, &format!("{exe_stem}.exe")),
        };
        Self {
            dirs,
            files,
            test_path,
            exe_path,
        }
    }
}

fn join(dirs: &InstallDirs, relative: &str) -> DualPath {
    DualPath {
        posix: join_in(dirs, Dialect::Posix, relative),
        windows: join_in(dirs, Dialect::PowerShell, relative),
    }
}

/// `dir + separator + relative`, with `relative`'s own `/` converted too.
fn join_in(dirs: &InstallDirs, dialect: Dialect, relative: &str) -> String {
    let sep = dialect.separator();
    let relative = relative.replace(Dialect::Posix.separator(), sep);
    format!("{}{sep}{relative}", dirs.for_dialect(dialect))
}
