//! Full install scripts, one per dialect.
//!
//! Both scripts have the same fixed shape: preamble, directory creation, one
//! download per file, sample program, compile, completion message. The sample
//! program is embedded verbatim (trimmed) and never re-escaped:
//!
//! - POSIX writes it through a quoted heredoc delimited by
//!   [`HEREDOC_DELIMITER`], so the shell performs no expansion.
//! - PowerShell writes it through a literal here-string (`@'` .. `'@`), so `$`
//!   in C code is never interpolated. A line starting with `'@` cannot appear
//!   in well-formed C outside a string or comment.

use crate::commands::{compile_command, download_clauses, DownloadTool};
use crate::library::LibraryRecord;
use crate::paths::InstallTarget;
use crate::quote::{quote, Dialect};
use serde::Serialize;

pub const HEREDOC_DELIMITER: &str = "CWGET_SAMPLE_END";

pub fn posix_script(record: &LibraryRecord, target: &InstallTarget) -> String {
    let dialect = Dialect::Posix;
    let mut lines = vec![
        "#!/usr/bin/env bash".to_string(),
        "set -euo pipefail".to_string(),
        format!("BASE_DIR={}", quote(&target.dirs.posix, dialect)),
        format!("TEST_PATH={}", quote(&target.test_path.posix, dialect)),
        String::new(),
        "mkdir -p \"$BASE_DIR\"".to_string(),
        "echo \"Downloading library files...\"".to_string(),
    ];
    lines.extend(download_clauses(record, target, DownloadTool::PosixCurl));
    lines.push("echo \"Writing sample program...\"".to_string());
    lines.push(format!("cat > \"$TEST_PATH\" <<'{HEREDOC_DELIMITER}'"));
    lines.push(record.sample_code.trim().to_string());
    lines.push(HEREDOC_DELIMITER.to_string());
    lines.push("echo \"Compiling sample...\"".to_string());
    lines.push(compile_command(record, target, dialect));
    lines.push("echo \"Done.\"".to_string());
    lines.push(String::new());
    lines.join("\n")
}

pub fn powershell_script(record: &LibraryRecord, target: &InstallTarget) -> String {
    let dialect = Dialect::PowerShell;
    let mut lines = vec![
        "# PowerShell install and build script generated by cwget".to_string(),
        format!("$BaseDir = {}", quote(&target.dirs.windows, dialect)),
        format!("$TestPath = {}", quote(&target.test_path.windows, dialect)),
        String::new(),
        "New-Item -ItemType Directory -Force -Path $BaseDir | Out-Null".to_string(),
        "Write-Host \"Downloading library files...\"".to_string(),
    ];
    lines.extend(
        record
            .files
            .iter()
            .zip(&target.files)
            .map(|(file, dest)| {
                format!(
                    "Invoke-WebRequest -Uri {} -OutFile {}",
                    quote(&file.url, dialect),
                    quote(&dest.windows, dialect)
                )
            }),
    );
    lines.push("Write-Host \"Writing sample program...\"".to_string());
    lines.push("@'".to_string());
    lines.push(record.sample_code.trim().to_string());
    lines.push("'@ | Set-Content -Path $TestPath".to_string());
    lines.push("Write-Host \"Compiling sample...\"".to_string());
    lines.push(compile_command(record, target, dialect));
    lines.push("Write-Host \"Done.\"".to_string());
    lines.push(String::new());
    lines.join("\n")
}

pub fn script(record: &LibraryRecord, target: &InstallTarget, dialect: Dialect) -> String {
    match dialect {
        Dialect::Posix => posix_script(record, target),
        Dialect::PowerShell => powershell_script(record, target),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScriptSet {
    pub posix: String,
    pub powershell: String,
}

impl ScriptSet {
    pub fn build(record: &LibraryRecord, target: &InstallTarget) -> Self {
        Self {
            posix: posix_script(record, target),
            powershell: powershell_script(record, target),
        }
    }

    pub fn for_dialect(&self, dialect: Dialect) -> &str {
        match dialect {
            Dialect::Posix => &self.posix,
            Dialect::PowerShell => &self.powershell,
        }
    }
}
