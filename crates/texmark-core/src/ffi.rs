// SPDX-License-Identifier: AGPL-3.0-or-later
//! C FFI exports for mobile hosts
//!
//! The UI shell links the static library and asks for either the serialized
//! render plan (to drive its own math and Markdown views) or a ready HTML
//! body built with the reference renderers.

use std::ffi::{CStr, CString};
use std::os::raw::c_char;

use crate::dispatch::render_plan;
use crate::formats::{ComrakMarkdownRenderer, MathJaxHtmlRenderer};

/// Result code for FFI operations
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiResult {
    Success = 0,
    InvalidInput = 1,
    RenderError = 2,
    NullPointer = 3,
    Utf8Error = 4,
    LoggingError = 5,
}

unsafe fn read_input<'a>(content: *const c_char) -> Result<&'a str, FfiResult> {
    if content.is_null() {
        return Err(FfiResult::NullPointer);
    }
    CStr::from_ptr(content)
        .to_str()
        .map_err(|_| FfiResult::Utf8Error)
}

unsafe fn write_output(
    output: String,
    out_content: *mut *mut c_char,
    out_length: *mut usize,
) -> FfiResult {
    let length = output.len();
    let c_string = match CString::new(output) {
        Ok(s) => s,
        Err(_) => return FfiResult::InvalidInput,
    };

    *out_length = length;
    *out_content = c_string.into_raw();

    FfiResult::Success
}

/// Segment and normalize a document, returning the render plan as JSON
///
/// # Safety
/// - `content` must be a valid null-terminated UTF-8 string
/// - `out_content` and `out_length` must be valid pointers
#[no_mangle]
pub unsafe extern "C" fn texmark_render_plan_json(
    content: *const c_char,
    out_content: *mut *mut c_char,
    out_length: *mut usize,
) -> FfiResult {
    if out_content.is_null() || out_length.is_null() {
        return FfiResult::NullPointer;
    }
    let input = match read_input(content) {
        Ok(s) => s,
        Err(code) => return code,
    };

    match render_plan(input).to_json() {
        Ok(json) => write_output(json, out_content, out_length),
        Err(_) => FfiResult::RenderError,
    }
}

/// Render a document to an HTML body with the reference renderers
///
/// # Safety
/// - `content` must be a valid null-terminated UTF-8 string
/// - `out_content` and `out_length` must be valid pointers
#[no_mangle]
pub unsafe extern "C" fn texmark_render_html(
    content: *const c_char,
    out_content: *mut *mut c_char,
    out_length: *mut usize,
) -> FfiResult {
    if out_content.is_null() || out_length.is_null() {
        return FfiResult::NullPointer;
    }
    let input = match read_input(content) {
        Ok(s) => s,
        Err(code) => return code,
    };

    let plan = render_plan(input);
    match plan.dispatch(&MathJaxHtmlRenderer::new(), &ComrakMarkdownRenderer::new()) {
        Ok(rendered) => {
            let html: String = rendered.into_iter().map(|r| r.output).collect();
            write_output(html, out_content, out_length)
        }
        Err(_) => FfiResult::RenderError,
    }
}

/// Install a `tracing` subscriber writing to stderr
///
/// The filter is read from `TEXMARK_LOG` and defaults to `warn`.
#[no_mangle]
pub extern "C" fn texmark_init_logging() -> FfiResult {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_env("TEXMARK_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    match tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
    {
        Ok(()) => FfiResult::Success,
        Err(_) => FfiResult::LoggingError,
    }
}

/// Free a string allocated by the library
///
/// # Safety
/// - `s` must be a valid string from this library or null
#[no_mangle]
pub unsafe extern "C" fn texmark_free_string(s: *mut c_char) {
    if !s.is_null() {
        drop(CString::from_raw(s));
    }
}

/// Get library version
///
/// # Safety
/// Returns a static string, do not free
#[no_mangle]
pub extern "C" fn texmark_version() -> *const c_char {
    static VERSION: &[u8] = concat!(env!("CARGO_PKG_VERSION"), "\0").as_bytes();
    VERSION.as_ptr() as *const c_char
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ptr;

    unsafe fn take(ptr: *mut c_char) -> String {
        let s = CStr::from_ptr(ptr).to_str().unwrap().to_string();
        texmark_free_string(ptr);
        s
    }

    #[test]
    fn test_render_plan_json() {
        let content = CString::new(r"\section*{Intro}\[x\]").unwrap();
        let mut out: *mut c_char = ptr::null_mut();
        let mut len = 0usize;

        unsafe {
            let result = texmark_render_plan_json(content.as_ptr(), &mut out, &mut len);
            assert_eq!(result, FfiResult::Success);
            let json = take(out);
            assert_eq!(json.len(), len);
            let value: serde_json::Value = serde_json::from_str(&json).unwrap();
            assert_eq!(value["units"][0]["markdown"], "## Intro");
            assert_eq!(value["units"][1]["type"], "math");
        }
    }

    #[test]
    fn test_render_html() {
        let content = CString::new(r"\textbf{a}\[x\]").unwrap();
        let mut out: *mut c_char = ptr::null_mut();
        let mut len = 0usize;

        unsafe {
            let result = texmark_render_html(content.as_ptr(), &mut out, &mut len);
            assert_eq!(result, FfiResult::Success);
            let html = take(out);
            assert!(html.contains("<strong>a</strong>"));
            assert!(html.contains("texmark-math"));
        }
    }

    #[test]
    fn test_null_pointers() {
        let mut out: *mut c_char = ptr::null_mut();
        let mut len = 0usize;
        unsafe {
            assert_eq!(
                texmark_render_plan_json(ptr::null(), &mut out, &mut len),
                FfiResult::NullPointer
            );
            let content = CString::new("x").unwrap();
            assert_eq!(
                texmark_render_html(content.as_ptr(), ptr::null_mut(), &mut len),
                FfiResult::NullPointer
            );
        }
    }

    #[test]
    fn test_version() {
        let version = unsafe { CStr::from_ptr(texmark_version()) };
        assert_eq!(version.to_str().unwrap(), env!("CARGO_PKG_VERSION"));
    }
}
