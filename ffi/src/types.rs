//! `#[repr(C)]` types for the FFI boundary.
//!
//! # Design
//! Each type mirrors a core type but uses C-compatible representations:
//! `*mut c_char` instead of `String`, raw pointers instead of `Vec`, and
//! tagged enums with explicit discriminants. Conversion functions live here
//! to keep `lib.rs` focused on the `extern "C"` surface.

use std::ffi::CString;
use std::os::raw::c_char;

use reqpad_core::error::ImportError;
use reqpad_core::http::{HttpMethod, RequestDescriptor};
use reqpad_core::store::RequestStore;

/// Opaque handle to a `RequestStore`. C callers receive a pointer to this
/// and pass it back into every `reqpad_store_*` function.
pub struct FfiRequestStore {
    pub(crate) inner: RequestStore,
}

/// Move a Rust string onto the C heap. Interior NUL bytes are dropped.
pub(crate) fn into_c_string(s: String) -> *mut c_char {
    let cleaned = if s.contains('\0') { s.replace('\0', "") } else { s };
    CString::new(cleaned).unwrap_or_default().into_raw()
}

// ---------------------------------------------------------------------------
// Descriptor
// ---------------------------------------------------------------------------

/// HTTP method as a C enum.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiHttpMethod {
    Get = 0,
    Post = 1,
    Put = 2,
    Patch = 3,
    Delete = 4,
    Head = 5,
    Options = 6,
}

impl From<HttpMethod> for FfiHttpMethod {
    fn from(m: HttpMethod) -> Self {
        match m {
            HttpMethod::Get => FfiHttpMethod::Get,
            HttpMethod::Post => FfiHttpMethod::Post,
            HttpMethod::Put => FfiHttpMethod::Put,
            HttpMethod::Patch => FfiHttpMethod::Patch,
            HttpMethod::Delete => FfiHttpMethod::Delete,
            HttpMethod::Head => FfiHttpMethod::Head,
            HttpMethod::Options => FfiHttpMethod::Options,
        }
    }
}

/// A single header as a key-value pair of C strings.
#[repr(C)]
pub struct FfiHeader {
    pub key: *mut c_char,
    pub value: *mut c_char,
}

/// An imported request as C-compatible plain data. `body` is null when the
/// command carried no body flag.
#[repr(C)]
pub struct FfiRequestDescriptor {
    pub method: FfiHttpMethod,
    pub url: *mut c_char,
    pub headers: *mut FfiHeader,
    pub headers_len: u32,
    pub body: *mut c_char,
}

impl FfiRequestDescriptor {
    /// Convert a core descriptor into a heap-allocated `FfiRequestDescriptor`.
    pub(crate) fn from_core(desc: RequestDescriptor) -> *mut Self {
        let url = into_c_string(desc.url);
        let body = match desc.body {
            Some(b) => into_c_string(b),
            None => std::ptr::null_mut(),
        };

        let pairs = desc.headers.into_vec();
        let headers_len = pairs.len() as u32;
        let headers = if pairs.is_empty() {
            std::ptr::null_mut()
        } else {
            let ffi_headers: Box<[FfiHeader]> = pairs
                .into_iter()
                .map(|(k, v)| FfiHeader {
                    key: into_c_string(k),
                    value: into_c_string(v),
                })
                .collect();
            Box::into_raw(ffi_headers) as *mut FfiHeader
        };

        Box::into_raw(Box::new(FfiRequestDescriptor {
            method: desc.method.into(),
            url,
            headers,
            headers_len,
            body,
        }))
    }
}

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Error codes returned across the boundary.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiErrorCode {
    Ok = 0,
    InvalidCommand = 1,
    InvalidUtf8 = 2,
    NullArg = 3,
    Panic = 4,
}

/// Result envelope for `reqpad_parse_command`.
///
/// On success `error_code` is `Ok`, `error_message` is null, and
/// `descriptor` points to the parsed request. On failure `error_message`
/// is a human-readable C string and `descriptor` is null.
#[repr(C)]
pub struct FfiImportResult {
    pub error_code: FfiErrorCode,
    pub error_message: *mut c_char,
    pub descriptor: *mut FfiRequestDescriptor,
}

impl FfiImportResult {
    pub(crate) fn ok(desc: RequestDescriptor) -> *mut Self {
        Box::into_raw(Box::new(FfiImportResult {
            error_code: FfiErrorCode::Ok,
            error_message: std::ptr::null_mut(),
            descriptor: FfiRequestDescriptor::from_core(desc),
        }))
    }

    pub(crate) fn from_error(err: ImportError) -> *mut Self {
        Self::failure(FfiErrorCode::InvalidCommand, err.to_string())
    }

    pub(crate) fn null_arg(name: &str) -> *mut Self {
        Self::failure(FfiErrorCode::NullArg, format!("null argument: {name}"))
    }

    pub(crate) fn invalid_utf8(name: &str) -> *mut Self {
        Self::failure(FfiErrorCode::InvalidUtf8, format!("argument is not UTF-8: {name}"))
    }

    pub(crate) fn panic(msg: &str) -> *mut Self {
        Self::failure(FfiErrorCode::Panic, msg.to_string())
    }

    fn failure(error_code: FfiErrorCode, msg: String) -> *mut Self {
        Box::into_raw(Box::new(FfiImportResult {
            error_code,
            error_message: into_c_string(msg),
            descriptor: std::ptr::null_mut(),
        }))
    }
}
