//! C-ABI wrapper around `reqpad-core`.
//!
//! # Overview
//! Lets a non-Rust host (the webview shell that embeds the request panel)
//! parse pasted commands, beautify JSON bodies, and keep a `RequestStore`
//! whose assembled message it can read back as JSON.
//!
//! # Design
//! - Every `extern "C"` function wraps its body in `catch_unwind` so panics
//!   never cross the FFI boundary.
//! - `reqpad_parse_command` answers with a single `FfiImportResult`
//!   envelope carrying either a descriptor or an error code and message.
//! - `reqpad_view_config_json` hands the host the view settings resolved
//!   from the environment, so both sides agree on delay and indent.
//! - The C caller owns all returned pointers and must call the matching
//!   `reqpad_free_*` / `reqpad_store_free` function to release them.

pub mod types;

use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::panic::catch_unwind;

use reqpad_core::{json, parse_command, RequestStore, ViewConfig};

use types::*;

/// Borrow a C string as `&str`. `Err(code)` for null or non-UTF-8 input.
///
/// The pointer must be null or point to a NUL-terminated string that lives
/// for the duration of the call.
fn borrow_str<'a>(ptr: *const c_char) -> Result<&'a str, FfiErrorCode> {
    if ptr.is_null() {
        return Err(FfiErrorCode::NullArg);
    }
    unsafe { CStr::from_ptr(ptr) }
        .to_str()
        .map_err(|_| FfiErrorCode::InvalidUtf8)
}

// ---------------------------------------------------------------------------
// Command import
// ---------------------------------------------------------------------------

/// Parse a pasted command line.
///
/// Always returns a result (never null). The caller must free it with
/// `reqpad_free_result`.
#[unsafe(no_mangle)]
pub extern "C" fn reqpad_parse_command(command: *const c_char) -> *mut FfiImportResult {
    catch_unwind(|| {
        let command = match borrow_str(command) {
            Ok(s) => s,
            Err(FfiErrorCode::NullArg) => return FfiImportResult::null_arg("command"),
            Err(_) => return FfiImportResult::invalid_utf8("command"),
        };
        match parse_command(command) {
            Ok(desc) => FfiImportResult::ok(desc),
            Err(e) => FfiImportResult::from_error(e),
        }
    })
    .unwrap_or_else(|_| FfiImportResult::panic("panic in reqpad_parse_command"))
}

/// Re-indent a JSON document with `indent` spaces per level.
///
/// Returns null if `text` is null, not UTF-8, or not valid JSON; the caller
/// keeps its original text in that case. Free the result with
/// `reqpad_free_string`.
#[unsafe(no_mangle)]
pub extern "C" fn reqpad_beautify_json(text: *const c_char, indent: u32) -> *mut c_char {
    catch_unwind(|| {
        let Ok(text) = borrow_str(text) else {
            return std::ptr::null_mut();
        };
        match json::beautify_with_indent(text, indent as usize) {
            Ok(pretty) => into_c_string(pretty),
            Err(e) => {
                tracing::debug!(error = %e, "beautify rejected by host call");
                std::ptr::null_mut()
            }
        }
    })
    .unwrap_or(std::ptr::null_mut())
}

/// View settings (`reconcile_delay_ms`, `json_indent`) as a JSON object,
/// taken from the `REQPAD_*` environment variables or their defaults.
///
/// Free the result with `reqpad_free_string`.
#[unsafe(no_mangle)]
pub extern "C" fn reqpad_view_config_json() -> *mut c_char {
    catch_unwind(|| match serde_json::to_string(&ViewConfig::from_env()) {
        Ok(json) => into_c_string(json),
        Err(_) => std::ptr::null_mut(),
    })
    .unwrap_or(std::ptr::null_mut())
}

// ---------------------------------------------------------------------------
// Request store
// ---------------------------------------------------------------------------

/// Create an empty request store.
///
/// The caller must free the returned pointer with `reqpad_store_free`.
#[unsafe(no_mangle)]
pub extern "C" fn reqpad_store_new() -> *mut FfiRequestStore {
    catch_unwind(|| {
        Box::into_raw(Box::new(FfiRequestStore {
            inner: RequestStore::new(),
        }))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Free a store created by `reqpad_store_new`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn reqpad_store_free(store: *mut FfiRequestStore) {
    if !store.is_null() {
        let _ = catch_unwind(|| {
            drop(unsafe { Box::from_raw(store) });
        });
    }
}

/// Import a pasted command into `store`.
///
/// On any error code other than `Ok` the store is unchanged.
#[unsafe(no_mangle)]
pub extern "C" fn reqpad_store_import_command(
    store: *mut FfiRequestStore,
    command: *const c_char,
) -> FfiErrorCode {
    catch_unwind(|| {
        if store.is_null() {
            return FfiErrorCode::NullArg;
        }
        let command = match borrow_str(command) {
            Ok(s) => s,
            Err(code) => return code,
        };
        let store = unsafe { &mut *store };
        match store.inner.import_command(command) {
            Ok(()) => FfiErrorCode::Ok,
            Err(_) => FfiErrorCode::InvalidCommand,
        }
    })
    .unwrap_or(FfiErrorCode::Panic)
}

/// The message the host should execute, as a JSON string.
///
/// Returns null if `store` is null. Free the result with
/// `reqpad_free_string`.
#[unsafe(no_mangle)]
pub extern "C" fn reqpad_store_host_message(store: *const FfiRequestStore) -> *mut c_char {
    catch_unwind(|| {
        if store.is_null() {
            return std::ptr::null_mut();
        }
        let store = unsafe { &*store };
        match serde_json::to_string(&store.inner.host_message()) {
            Ok(json) => into_c_string(json),
            Err(_) => std::ptr::null_mut(),
        }
    })
    .unwrap_or(std::ptr::null_mut())
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Free an `FfiImportResult` returned by `reqpad_parse_command`.
/// Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn reqpad_free_result(result: *mut FfiImportResult) {
    if result.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let result = unsafe { Box::from_raw(result) };
        free_c_string(result.error_message);
        if !result.descriptor.is_null() {
            let desc = unsafe { Box::from_raw(result.descriptor) };
            free_descriptor_fields(&desc);
        }
    });
}

/// Free the heap fields of an `FfiRequestDescriptor` (but not the struct).
fn free_descriptor_fields(desc: &FfiRequestDescriptor) {
    free_c_string(desc.url);
    free_c_string(desc.body);
    if !desc.headers.is_null() && desc.headers_len > 0 {
        let headers = unsafe {
            Box::from_raw(std::ptr::slice_from_raw_parts_mut(
                desc.headers,
                desc.headers_len as usize,
            ))
        };
        for h in headers.iter() {
            free_c_string(h.key);
            free_c_string(h.value);
        }
    }
}

fn free_c_string(s: *mut c_char) {
    if !s.is_null() {
        drop(unsafe { CString::from_raw(s) });
    }
}

/// Free a C string allocated by this library. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn reqpad_free_string(s: *mut c_char) {
    if !s.is_null() {
        let _ = catch_unwind(|| free_c_string(s));
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
