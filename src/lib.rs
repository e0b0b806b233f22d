//! cwget Core Library
//!
//! Catalog validation and shell command synthesis for the cwget documentation
//! page: a catalog of small C libraries, each rendered as copy-paste download
//! commands, compile commands and full install scripts for POSIX shells and
//! PowerShell, parameterized by a user-chosen base directory.
//!
//! # Architecture
//!
//! The core is a pure, synchronous text transformation. It never executes a
//! command, touches the network, or reads the filesystem. It is consumed by:
//! - **Native/web frontends** via the C ABI in `ffi` (render data as JSON)
//! - **The `cwget` CLI** in `src/bin/cwget.rs`
//!
//! # Pipeline
//!
//! ## Catalog Loading (`source`, `catalog` modules)
//! - `source::decode()` - XML, HTML-embedded XML, or JSON into a `RawCatalog`
//! - `Catalog::load()` - Validate every entry; the first structural error fails the whole load
//!
//! ## Synthesis (`paths`, `quote`, `commands`, `scripts` modules)
//! - `resolve_install_dirs()` - Base dir + suffix dir in slash and backslash form
//! - `quote()` - Dialect-specific double-quoted literals
//! - `CommandSet::build()` - wget/curl/Invoke-WebRequest and compile one-liners
//! - `ScriptSet::build()` - Complete install scripts per dialect
//!
//! ## Output (`render` module)
//! - `RenderData::build()` - Everything a frontend displays for one library

pub mod catalog;
pub mod commands;
pub mod error;
pub mod ffi;
pub mod library;
pub mod paths;
pub mod quote;
pub mod render;
pub mod scripts;
pub mod settings;
pub mod source;

pub use catalog::{Catalog, RawCatalog, RawDocLink, RawEntry, RawFile};
pub use commands::{CommandSet, DownloadTool};
pub use error::CatalogError;
pub use library::{CatalogSettings, DocLink, LibraryFile, LibraryRecord};
pub use paths::{resolve_install_dirs, DualPath, InstallDirs, InstallTarget};
pub use quote::{quote, unquote, Dialect};
pub use render::{render, RenderData};
pub use scripts::ScriptSet;
pub use settings::Settings;
