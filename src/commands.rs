//! One-line download and compile commands.
//!
//! POSIX commands chain with `&&` so the first failing step stops the line.
//! PowerShell commands chain with `;`, the dialect's usual sequential
//! separator, which keeps going after a failure.

use crate::library::LibraryRecord;
use crate::paths::InstallTarget;
use crate::quote::{quote, Dialect};
use serde::Serialize;

/// Download tools with a copy-paste command per dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadTool {
    PosixWget,
    PosixCurl,
    /// `curl` as the PowerShell alias of Invoke-WebRequest
    PwshCurl,
    /// `wget` as the PowerShell alias of Invoke-WebRequest
    PwshWget,
    PwshInvokeWebRequest,
}

impl DownloadTool {
    pub const ALL: [DownloadTool; 5] = [
        DownloadTool::PosixWget,
        DownloadTool::PosixCurl,
        DownloadTool::PwshCurl,
        DownloadTool::PwshWget,
        DownloadTool::PwshInvokeWebRequest,
    ];

    pub fn dialect(self) -> Dialect {
        match self {
            DownloadTool::PosixWget | DownloadTool::PosixCurl => Dialect::Posix,
            _ => Dialect::PowerShell,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DownloadTool::PosixWget => "POSIX wget",
            DownloadTool::PosixCurl => "POSIX curl",
            DownloadTool::PwshCurl => "PowerShell curl alias",
            DownloadTool::PwshWget => "PowerShell wget alias",
            DownloadTool::PwshInvokeWebRequest => "PowerShell Invoke-WebRequest",
        }
    }

    /// Single-file download clause; `dest` and `url` are already quoted.
    fn clause(self, dest: &str, url: &str) -> String {
        match self {
            DownloadTool::PosixWget => format!("wget -O {dest} {url}"),
            DownloadTool::PosixCurl => format!("curl -L {url} -o {dest}"),
            DownloadTool::PwshCurl => format!("curl {url} -OutFile {dest}"),
            DownloadTool::PwshWget => format!("wget {url} -OutFile {dest}"),
            DownloadTool::PwshInvokeWebRequest => {
                format!("Invoke-WebRequest {url} -OutFile {dest}")
            }
        }
    }
}

/// Directory creation command for `dialect`.
pub fn mkdir_command(target: &InstallTarget, dialect: Dialect) -> String {
    let dir = quote(target.dirs.for_dialect(dialect), dialect);
    match dialect {
        Dialect::Posix => format!("mkdir -p {dir}"),
        Dialect::PowerShell => {
            format!("New-Item -ItemType Directory -Path {dir} -Force | Out-Null")
        }
    }
}

/// Per-file download clauses in catalog order.
pub(crate) fn download_clauses(
    record: &LibraryRecord,
    target: &InstallTarget,
    tool: DownloadTool,
) -> Vec<String> {
    let dialect = tool.dialect();
    record
        .files
        .iter()
        .zip(&target.files)
        .map(|(file, dest)| {
            tool.clause(
                &quote(dest.for_dialect(dialect), dialect),
                &quote(&file.url, dialect),
            )
        })
        .collect()
}

/// `mkdir` plus one download per file, joined per the dialect's convention.
pub fn download_command(
    record: &LibraryRecord,
    target: &InstallTarget,
    tool: DownloadTool,
) -> String {
    let dialect = tool.dialect();
    let joiner = match dialect {
        Dialect::Posix => " && ",
        Dialect::PowerShell => "; ",
    };
    let mut parts = vec![mkdir_command(target, dialect)];
    parts.extend(download_clauses(record, target, tool));
    parts.join(joiner)
}

/// Compile the sample program plus any `.c` files from the catalog entry.
///
/// POSIX uses `cc`, PowerShell targets MSVC `cl`. Headers and other non-`.c`
/// files are never passed to the compiler.
pub fn compile_command(
    record: &LibraryRecord,
    target: &InstallTarget,
    dialect: Dialect,
) -> String {
    let dir = quote(target.dirs.for_dialect(dialect), dialect);
    let test = quote(target.test_path.for_dialect(dialect), dialect);
    let exe = quote(target.exe_path.for_dialect(dialect), dialect);
    let sources: Vec<String> = record
        .c_sources()
        .map(|(index, _)| quote(target.files[index].for_dialect(dialect), dialect))
        .collect();

    let mut command = match dialect {
        Dialect::Posix => format!("cc -Wall -Wextra -I{dir} {test}"),
        Dialect::PowerShell => format!("cl /W4 /I{dir} {test}"),
    };
    for source in &sources {
        command.push(' ');
        command.push_str(source);
    }
    match dialect {
        Dialect::Posix => command.push_str(&format!(" -o {exe}")),
        Dialect::PowerShell => command.push_str(&format!(" /Fe{exe}")),
    }
    command
}

/// All copy-paste commands for one record at one base directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandSet {
    pub wget_posix: String,
    pub curl_posix: String,
    pub curl_pwsh: String,
    pub wget_pwsh: String,
    pub iwr_pwsh: String,
    pub compile_posix: String,
    pub compile_windows: String,
}

impl CommandSet {
    pub fn build(record: &LibraryRecord, target: &InstallTarget) -> Self {
        Self {
            wget_posix: download_command(record, target, DownloadTool::PosixWget),
            curl_posix: download_command(record, target, DownloadTool::PosixCurl),
            curl_pwsh: download_command(record, target, DownloadTool::PwshCurl),
            wget_pwsh: download_command(record, target, DownloadTool::PwshWget),
            iwr_pwsh: download_command(record, target, DownloadTool::PwshInvokeWebRequest),
            compile_posix: compile_command(record, target, Dialect::Posix),
            compile_windows: compile_command(record, target, Dialect::PowerShell),
        }
    }

    /// Download command produced for `tool`.
    pub fn download(&self, tool: DownloadTool) -> &str {
        match tool {
            DownloadTool::PosixWget => &self.wget_posix,
            DownloadTool::PosixCurl => &self.curl_posix,
            DownloadTool::PwshCurl => &self.curl_pwsh,
            DownloadTool::PwshWget => &self.wget_pwsh,
            DownloadTool::PwshInvokeWebRequest => &self.iwr_pwsh,
        }
    }

    pub fn compile(&self, dialect: Dialect) -> &str {
        match dialect {
            Dialect::Posix => &self.compile_posix,
            Dialect::PowerShell => &self.compile_windows,
        }
    }
}
