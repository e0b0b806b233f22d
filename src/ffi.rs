//! FFI (Foreign Function Interface) bindings for native documentation frontends.
//!
//! The rendering layer (a page, a desktop viewer) loads the catalog once and
//! asks for per-library render data whenever the base-directory setting
//! changes. Render data crosses the boundary as a JSON string.
//!
//! # Memory Management
//!
//! - Rust allocates memory and returns pointers to the caller
//! - The calling code MUST call the corresponding `_free` functions to prevent leaks
//! - Strings are null-terminated UTF-8
//!
//! # Usage from C
//!
//! ```c
//! CCatalog *catalog = cwget_catalog_load(xml_text);
//! if (!catalog) {
//!     char *err = cwget_last_error();
//!     fprintf(stderr, "%s\n", err);
//!     cwget_free_string(err);
//! }
//! char *json = cwget_render_json(catalog, "curlib", "external");
//! cwget_free_string(json);
//! cwget_free_catalog(catalog);
//! ```

use crate::catalog::Catalog;
use crate::quote::Dialect;
use crate::render::RenderData;
use crate::scripts::script;
use crate::source::decode;
use crate::paths::InstallTarget;
use std::cell::RefCell;
use std::ffi::{CStr, CString};
use std::os::raw::{c_char, c_int};
use std::ptr;

thread_local! {
    static LAST_ERROR: RefCell<Option<String>> = const { RefCell::new(None) };
}

// ============================================================================
// C-Compatible Types
// ============================================================================

/// Opaque handle to a validated catalog
#[repr(C)]
pub struct CCatalog {
    catalog: Catalog,
}

// ============================================================================
// Catalog Loading
// ============================================================================

/// Decode and validate a catalog (XML, HTML page with embedded XML, or JSON).
/// Returns null on failure; call cwget_last_error() for the reason.
/// Caller MUST call cwget_free_catalog() when done.
#[no_mangle]
pub extern "C" fn cwget_catalog_load(text: *const c_char) -> *mut CCatalog {
    let Some(text) = c_str_arg(text) else {
        set_last_error("catalog text is null or not UTF-8".to_string());
        return ptr::null_mut();
    };

    match decode(text).and_then(|raw| Catalog::load(&raw)) {
        Ok(catalog) => Box::into_raw(Box::new(CCatalog { catalog })),
        Err(e) => {
            tracing::error!(error = %e, "catalog load failed");
            set_last_error(e.to_string());
            ptr::null_mut()
        }
    }
}

/// Get the number of libraries in a catalog.
#[no_mangle]
pub extern "C" fn cwget_catalog_count(catalog: *const CCatalog) -> c_int {
    if catalog.is_null() {
        return 0;
    }
    unsafe { (*catalog).catalog.len() as c_int }
}

/// Get the library id at a specific index.
/// Caller MUST call cwget_free_string() when done.
#[no_mangle]
pub extern "C" fn cwget_catalog_id_at(catalog: *const CCatalog, index: c_int) -> *mut c_char {
    if catalog.is_null() || index < 0 {
        return ptr::null_mut();
    }
    unsafe {
        match (*catalog).catalog.records().get(index as usize) {
            Some(record) => string_to_c_char(&record.id),
            None => ptr::null_mut(),
        }
    }
}

/// Catalog-wide default base directory.
/// Caller MUST call cwget_free_string() when done.
#[no_mangle]
pub extern "C" fn cwget_catalog_base_dir(catalog: *const CCatalog) -> *mut c_char {
    if catalog.is_null() {
        return ptr::null_mut();
    }
    unsafe { string_to_c_char(&(*catalog).catalog.settings().base_dir_default) }
}

/// Free a catalog returned by cwget_catalog_load().
#[no_mangle]
pub extern "C" fn cwget_free_catalog(catalog: *mut CCatalog) {
    if !catalog.is_null() {
        unsafe {
            let _ = Box::from_raw(catalog);
        }
    }
}

// ============================================================================
// Synthesis
// ============================================================================

/// Render data (paths, commands, scripts, documentation) for one library as JSON.
/// A null or blank base_dir uses the catalog default.
/// Caller MUST call cwget_free_string() when done.
#[no_mangle]
pub extern "C" fn cwget_render_json(
    catalog: *const CCatalog,
    id: *const c_char,
    base_dir: *const c_char,
) -> *mut c_char {
    if catalog.is_null() {
        set_last_error("catalog handle is null".to_string());
        return ptr::null_mut();
    }
    let Some(id) = c_str_arg(id) else {
        set_last_error("library id is null or not UTF-8".to_string());
        return ptr::null_mut();
    };
    let base_dir = c_str_arg(base_dir).unwrap_or("");

    let catalog = unsafe { &(*catalog).catalog };
    let Some(record) = catalog.get(id) else {
        set_last_error(format!("Unknown library \"{id}\""));
        return ptr::null_mut();
    };

    let data = RenderData::build(record, base_dir, &catalog.settings().base_dir_default);
    match serde_json::to_string(&data) {
        Ok(json) => string_to_c_char(&json),
        Err(e) => {
            set_last_error(e.to_string());
            ptr::null_mut()
        }
    }
}

/// Full install script for one library. dialect: 0=POSIX, 1=PowerShell.
/// Caller MUST call cwget_free_string() when done.
#[no_mangle]
pub extern "C" fn cwget_script(
    catalog: *const CCatalog,
    id: *const c_char,
    base_dir: *const c_char,
    dialect: c_int,
) -> *mut c_char {
    if catalog.is_null() {
        set_last_error("catalog handle is null".to_string());
        return ptr::null_mut();
    }
    let Some(id) = c_str_arg(id) else {
        set_last_error("library id is null or not UTF-8".to_string());
        return ptr::null_mut();
    };
    let base_dir = c_str_arg(base_dir).unwrap_or("");

    let catalog = unsafe { &(*catalog).catalog };
    let Some(record) = catalog.get(id) else {
        set_last_error(format!("Unknown library \"{id}\""));
        return ptr::null_mut();
    };

    let target = InstallTarget::resolve(record, base_dir, &catalog.settings().base_dir_default);
    string_to_c_char(&script(record, &target, int_to_dialect(dialect)))
}

// ============================================================================
// String Management
// ============================================================================

/// Message of the most recent failure on this thread, or null.
/// Caller MUST call cwget_free_string() when done.
#[no_mangle]
pub extern "C" fn cwget_last_error() -> *mut c_char {
    LAST_ERROR.with(|slot| match slot.borrow().as_deref() {
        Some(message) => string_to_c_char(message),
        None => ptr::null_mut(),
    })
}

/// Free a string returned by FFI functions.
#[no_mangle]
pub extern "C" fn cwget_free_string(s: *mut c_char) {
    free_c_char(s);
}

// ============================================================================
// Helper Functions
// ============================================================================

fn c_str_arg<'a>(s: *const c_char) -> Option<&'a str> {
    if s.is_null() {
        return None;
    }
    unsafe { CStr::from_ptr(s).to_str().ok() }
}

fn set_last_error(message: String) {
    LAST_ERROR.with(|slot| *slot.borrow_mut() = Some(message));
}

fn string_to_c_char(s: &str) -> *mut c_char {
    match CString::new(s) {
        Ok(c_str) => c_str.into_raw(),
        Err(_) => ptr::null_mut(),
    }
}

fn free_c_char(s: *mut c_char) {
    if !s.is_null() {
        unsafe {
            let _ = CString::from_raw(s);
        }
    }
}

fn int_to_dialect(value: c_int) -> Dialect {
    match value {
        1 => Dialect::PowerShell,
        _ => Dialect::Posix,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATALOG: &str = r#"<libraries baseDir="deps">
  <library id="curlib">
    <file>curlib.h</file>
    <url>https://example.org/curlib.h</url>
    <suffixDir>net</suffixDir>
    <description>HTTP</description>
    <categories>net</categories>
    <sampleCode>int main(void) { return 0; }</sampleCode>
    <licenseSummary>MIT</licenseSummary>
    <licenseUrl>https://example.org/LICENSE</licenseUrl>
    <documentation><link url="https://example.org/docs" label="Docs"/></documentation>
  </library>
</libraries>"#;

    fn take_string(ptr: *mut c_char) -> String {
        assert!(!ptr.is_null());
        let value = unsafe { CStr::from_ptr(ptr) }.to_str().unwrap().to_string();
        cwget_free_string(ptr);
        value
    }

    #[test]
    fn load_render_and_free() {
        let text = CString::new(CATALOG).unwrap();
        let catalog = cwget_catalog_load(text.as_ptr());
        assert!(!catalog.is_null());
        assert_eq!(cwget_catalog_count(catalog), 1);
        assert_eq!(take_string(cwget_catalog_id_at(catalog, 0)), "curlib");
        assert!(cwget_catalog_id_at(catalog, 1).is_null());
        assert_eq!(take_string(cwget_catalog_base_dir(catalog)), "deps");

        let id = CString::new("curlib").unwrap();
        let json = take_string(cwget_render_json(catalog, id.as_ptr(), ptr::null()));
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["target"]["dirs"]["posix"], "deps/net");

        let script = take_string(cwget_script(catalog, id.as_ptr(), ptr::null(), 1));
        assert!(script.starts_with("# PowerShell"));

        cwget_free_catalog(catalog);
    }

    #[test]
    fn load_failure_sets_last_error() {
        let text = CString::new("<libraries><library id=\"x\"/></libraries>").unwrap();
        assert!(cwget_catalog_load(text.as_ptr()).is_null());
        let message = take_string(cwget_last_error());
        assert!(message.contains("\"x\""), "{message}");
    }

    #[test]
    fn null_arguments_are_tolerated() {
        assert!(cwget_catalog_load(ptr::null()).is_null());
        assert_eq!(cwget_catalog_count(ptr::null()), 0);
        assert!(cwget_render_json(ptr::null(), ptr::null(), ptr::null()).is_null());
        cwget_free_catalog(ptr::null_mut());
        cwget_free_string(ptr::null_mut());
    }

    #[test]
    fn null_id_sets_last_error() {
        let text = CString::new(CATALOG).unwrap();
        let catalog = cwget_catalog_load(text.as_ptr());
        assert!(!catalog.is_null());

        assert!(cwget_render_json(catalog, ptr::null(), ptr::null()).is_null());
        assert!(take_string(cwget_last_error()).contains("library id"));

        let bad = [0xffu8, 0];
        let bad_id = bad.as_ptr() as *const c_char;
        assert!(cwget_script(catalog, bad_id, ptr::null(), 0).is_null());
        assert!(take_string(cwget_last_error()).contains("not UTF-8"));

        cwget_free_catalog(catalog);
    }
}
