//! Minimal double-quote wrapping for the two shell dialects.
//!
//! Only embedded `"` characters are escaped. This is enough for the literal
//! paths and URLs produced by the path resolver; it is not a general purpose
//! shell-safety routine and must not be fed untrusted metacharacters.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// bash with wget/curl/cc
    #[default]
    Posix,
    /// PowerShell with Invoke-WebRequest/cl
    PowerShell,
}

impl Dialect {
    pub fn as_str(&self) -> &'static str {
        match self {
            Dialect::Posix => "posix",
            Dialect::PowerShell => "powershell",
        }
    }

    /// Lenient parse used for stored settings; anything unknown is POSIX.
    pub fn parse_lenient(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("powershell") {
            Dialect::PowerShell
        } else {
            Dialect::Posix
        }
    }

    /// Directory separator used in this dialect's paths.
    pub fn separator(self) -> &'static str {
        match self {
            Dialect::Posix => "/",
            Dialect::PowerShell => "\\",
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn escape_quotes(value: &str, dialect: Dialect) -> String {
    match dialect {
        Dialect::Posix => value.replace('"', "\\\""),
        Dialect::PowerShell => value.replace('"', "\"\""),
    }
}

/// Wrap `value` in double quotes, escaping embedded quotes for `dialect`.
pub fn quote(value: &str, dialect: Dialect) -> String {
    format!("\"{}\"", escape_quotes(value, dialect))
}

/// Inverse of [`quote`]. Returns `None` if `quoted` is not a quoted literal.
pub fn unquote(quoted: &str, dialect: Dialect) -> Option<String> {
    let inner = quoted.strip_prefix('"')?.strip_suffix('"')?;
    let escaped = match dialect {
        Dialect::Posix => "\\\"",
        Dialect::PowerShell => "\"\"",
    };
    Some(inner.replace(escaped, "\""))
}
