//! C-ABI wrapper around `http-tiny-core`.
//!
//! # Overview
//! Exposes URL parsing and the four verbs through `extern "C"` functions with
//! the shape of the classic `http_lib.h`: every call returns one `int` that is
//! either a server status, `0` for a parsed URL, or a negative error code
//! (see `types`).
//!
//! # Design
//! - Every `extern "C"` function wraps its body in `catch_unwind` so panics
//!   never cross the FFI boundary; a caught panic returns `ERRPANIC`.
//! - Request state lives in an opaque `HttpReq` handle owned by the caller,
//!   created with `http_req_new` and released with `http_freereq`.
//! - Bodies handed out by `http_get` are owned by the caller and must be
//!   released with `http_free_data` using the length that came with them.
//! - Content types are copied into a caller buffer, NUL-terminated and
//!   truncated to fit.

pub mod types;

use std::ffi::CStr;
use std::os::raw::{c_char, c_int};
use std::panic::catch_unwind;

use http_tiny::{Proxy, RequestDescriptor, Status};

use types::*;

/// Borrow a C string as `&str`. Invalid UTF-8 becomes the empty string.
///
/// # Safety
/// `s` must be non-null and point to a NUL-terminated string that outlives
/// the returned reference.
unsafe fn str_arg<'a>(s: *const c_char) -> &'a str {
    unsafe { CStr::from_ptr(s) }.to_str().unwrap_or("")
}

/// Copy `value` into `buf` as a NUL-terminated C string, truncating to fit.
/// Bytes are copied unchanged. Writes nothing when `buf` is null or `len` is
/// zero.
fn copy_type(buf: *mut c_char, len: usize, value: Option<&[u8]>) {
    if buf.is_null() || len == 0 {
        return;
    }
    let bytes = value.unwrap_or_default();
    let n = bytes.len().min(len - 1);
    unsafe {
        std::ptr::copy_nonoverlapping(bytes.as_ptr(), buf.cast::<u8>(), n);
        *buf.add(n) = 0;
    }
}

// ---------------------------------------------------------------------------
// Descriptor lifecycle
// ---------------------------------------------------------------------------

/// Create an empty request descriptor with the default port and user agent.
///
/// Returns null only if an internal panic occurs.
/// The caller must free the returned pointer with `http_freereq`.
#[unsafe(no_mangle)]
pub extern "C" fn http_req_new() -> *mut HttpReq {
    catch_unwind(|| {
        Box::into_raw(Box::new(HttpReq {
            inner: RequestDescriptor::default(),
        }))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Free a descriptor created by `http_req_new`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn http_freereq(req: *mut HttpReq) {
    if !req.is_null() {
        let _ = catch_unwind(|| {
            drop(unsafe { Box::from_raw(req) });
        });
    }
}

/// Parse `url` (`http://host[:port][/path]`) into `req`.
///
/// Returns `0` on success, `ERRURLH` for a wrong scheme, `ERRURLP` for a bad
/// port, `ERRURLS` for an empty host, `ERRNULL` if an argument is null. On
/// failure the host and path of `req` are left empty.
#[unsafe(no_mangle)]
pub extern "C" fn http_parse_url(req: *mut HttpReq, url: *const c_char) -> c_int {
    catch_unwind(|| {
        if req.is_null() {
            return null_arg("req");
        }
        if url.is_null() {
            return null_arg("url");
        }
        let req = unsafe { &mut *req };
        let url = unsafe { str_arg(url) };
        match req.inner.set_url(url) {
            Ok(()) => OK0,
            Err(e) => error_code(&e),
        }
    })
    .unwrap_or(ERRPANIC)
}

/// Route requests through the proxy at `host:port`. A null or empty `host` or
/// a zero `port` clears the proxy.
#[unsafe(no_mangle)]
pub extern "C" fn http_set_proxy(req: *mut HttpReq, host: *const c_char, port: u16) -> c_int {
    catch_unwind(|| {
        if req.is_null() {
            return null_arg("req");
        }
        let req = unsafe { &mut *req };
        let host = if host.is_null() { "" } else { unsafe { str_arg(host) } };
        let proxy = Proxy::new(host, port);
        req.inner.proxy = proxy.is_active().then_some(proxy);
        OK0
    })
    .unwrap_or(ERRPANIC)
}

/// Replace the `User-Agent` sent with every request.
#[unsafe(no_mangle)]
pub extern "C" fn http_set_user_agent(req: *mut HttpReq, user_agent: *const c_char) -> c_int {
    catch_unwind(|| {
        if req.is_null() {
            return null_arg("req");
        }
        if user_agent.is_null() {
            return null_arg("user_agent");
        }
        let req = unsafe { &mut *req };
        req.inner.user_agent = unsafe { str_arg(user_agent) }.to_owned();
        OK0
    })
    .unwrap_or(ERRPANIC)
}

// ---------------------------------------------------------------------------
// Verbs
// ---------------------------------------------------------------------------

/// Store `length` bytes at `data` under the descriptor's path.
///
/// `overwrite` non-zero asks the server to replace an existing resource.
/// `content_type` may be null. `data` may be null only when `length` is 0.
/// Returns the server status (201 created, 200 overwritten, ...) or a
/// negative error code.
#[unsafe(no_mangle)]
pub extern "C" fn http_put(
    req: *const HttpReq,
    data: *const u8,
    length: usize,
    overwrite: c_int,
    content_type: *const c_char,
) -> c_int {
    catch_unwind(|| {
        if req.is_null() {
            return null_arg("req");
        }
        if data.is_null() && length > 0 {
            return null_arg("data");
        }
        let req = unsafe { &*req };
        let body: &[u8] = if length == 0 {
            &[]
        } else {
            unsafe { std::slice::from_raw_parts(data, length) }
        };
        let content_type = if content_type.is_null() {
            None
        } else {
            Some(unsafe { str_arg(content_type) })
        };
        retcode(http_tiny::put(&req.inner, body, overwrite != 0, content_type))
    })
    .unwrap_or(ERRPANIC)
}

/// Fetch the resource at the descriptor's path.
///
/// On 200 `*pdata` receives a buffer the caller must release with
/// `http_free_data(*pdata, *plength)`. On any other outcome `*pdata` is null
/// and `*plength` is 0. `plength` and `typebuf` may be null; `typebuf`
/// receives the content type truncated to `typebuf_len - 1` bytes.
#[unsafe(no_mangle)]
pub extern "C" fn http_get(
    req: *const HttpReq,
    pdata: *mut *mut u8,
    plength: *mut usize,
    typebuf: *mut c_char,
    typebuf_len: usize,
) -> c_int {
    catch_unwind(|| {
        if req.is_null() {
            return null_arg("req");
        }
        if pdata.is_null() {
            return null_arg("pdata");
        }
        unsafe { *pdata = std::ptr::null_mut() };
        if !plength.is_null() {
            unsafe { *plength = 0 };
        }
        copy_type(typebuf, typebuf_len, None);

        let req = unsafe { &*req };
        let resp = match http_tiny::get(&req.inner) {
            Ok(resp) => resp,
            Err(e) => return error_code(&e),
        };
        if resp.status == Status::OK {
            copy_type(typebuf, typebuf_len, resp.content_type.as_deref());
            let body = resp.body.into_boxed_slice();
            if !plength.is_null() {
                unsafe { *plength = body.len() };
            }
            unsafe { *pdata = Box::into_raw(body).cast::<u8>() };
        }
        status_code(resp.status)
    })
    .unwrap_or(ERRPANIC)
}

/// Ask for the headers of the resource at the descriptor's path.
///
/// `*plength` receives the declared length, or 0 when the server sent none.
/// Both output pointers may be null.
#[unsafe(no_mangle)]
pub extern "C" fn http_head(
    req: *const HttpReq,
    plength: *mut usize,
    typebuf: *mut c_char,
    typebuf_len: usize,
) -> c_int {
    catch_unwind(|| {
        if req.is_null() {
            return null_arg("req");
        }
        if !plength.is_null() {
            unsafe { *plength = 0 };
        }
        copy_type(typebuf, typebuf_len, None);

        let req = unsafe { &*req };
        let resp = match http_tiny::head(&req.inner) {
            Ok(resp) => resp,
            Err(e) => return error_code(&e),
        };
        if resp.status == Status::OK {
            copy_type(typebuf, typebuf_len, resp.content_type.as_deref());
            if !plength.is_null() {
                let length = resp.content_length.unwrap_or(0);
                unsafe { *plength = usize::try_from(length).unwrap_or(usize::MAX) };
            }
        }
        status_code(resp.status)
    })
    .unwrap_or(ERRPANIC)
}

/// Remove the resource at the descriptor's path.
#[unsafe(no_mangle)]
pub extern "C" fn http_delete(req: *const HttpReq) -> c_int {
    catch_unwind(|| {
        if req.is_null() {
            return null_arg("req");
        }
        let req = unsafe { &*req };
        retcode(http_tiny::delete(&req.inner))
    })
    .unwrap_or(ERRPANIC)
}

/// Release a body returned by `http_get`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn http_free_data(data: *mut u8, length: usize) {
    if !data.is_null() {
        let _ = catch_unwind(|| {
            let slice = std::ptr::slice_from_raw_parts_mut(data, length);
            drop(unsafe { Box::from_raw(slice) });
        });
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
