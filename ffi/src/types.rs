//! Opaque handle and flat return codes for the C boundary.
//!
//! # Design
//! C callers get one `int` per call: `0` for a successful URL parse, the
//! server's three-digit status when a request got an answer, or one of the
//! negative codes below for client-side failures. The negative codes keep the
//! numbering of the classic `http_lib.h` so existing C callers stay source
//! compatible; codes past `-13` are new failure kinds.

use http_tiny::{ClientError, RequestDescriptor, Status};

/// Opaque handle to a `RequestDescriptor`. C callers receive a pointer to
/// this from `http_req_new` and release it with `http_freereq`.
pub struct HttpReq {
    pub(crate) inner: RequestDescriptor,
}

/// URL parsed successfully.
pub const OK0: i32 = 0;
/// No such host.
pub const ERRHOST: i32 = -1;
/// Can't create socket.
pub const ERRSOCK: i32 = -2;
/// Can't connect to host.
pub const ERRCONN: i32 = -3;
/// Write error on socket while writing header.
pub const ERRWRHD: i32 = -4;
/// Write error on socket while writing data.
pub const ERRWRDT: i32 = -5;
/// Read error on socket while reading result.
pub const ERRRDHD: i32 = -6;
/// Invalid answer from data server.
pub const ERRPAHD: i32 = -7;
/// Null data pointer.
pub const ERRNULL: i32 = -8;
/// No or bad length in header.
pub const ERRNOLG: i32 = -9;
/// Can't allocate memory.
pub const ERRMEM: i32 = -10;
/// Read error while reading data.
pub const ERRRDDT: i32 = -11;
/// Invalid url, must start with `http://`.
pub const ERRURLH: i32 = -12;
/// Invalid port in url.
pub const ERRURLP: i32 = -13;
/// Request header exceeds the fixed buffer size.
pub const ERRTOOBIG: i32 = -14;
/// Invalid url, no host.
pub const ERRURLS: i32 = -15;
/// Request field contains a line break.
pub const ERRINVAL: i32 = -16;
/// Invalid configuration.
pub const ERRCONF: i32 = -17;
/// The library panicked; the request state is unknown.
pub const ERRPANIC: i32 = -99;

pub(crate) fn error_code(err: &ClientError) -> i32 {
    match err {
        ClientError::HostNotFound(_) => ERRHOST,
        ClientError::Socket(_) => ERRSOCK,
        ClientError::Connect(_) => ERRCONN,
        ClientError::HeaderWrite(_) => ERRWRHD,
        ClientError::BodyWrite(_) => ERRWRDT,
        ClientError::ResponseRead => ERRRDHD,
        ClientError::MalformedStatus(_) => ERRPAHD,
        ClientError::NullArgument(_) => ERRNULL,
        ClientError::NoContentLength => ERRNOLG,
        ClientError::OutOfMemory(_) => ERRMEM,
        ClientError::BodyRead { .. } => ERRRDDT,
        ClientError::InvalidScheme => ERRURLH,
        ClientError::InvalidPort => ERRURLP,
        ClientError::RequestTooLarge { .. } => ERRTOOBIG,
        ClientError::MissingHost => ERRURLS,
        ClientError::InvalidRequest(_) => ERRINVAL,
        ClientError::Config(_) => ERRCONF,
    }
}

/// Code for a required pointer argument that was null.
pub(crate) fn null_arg(name: &'static str) -> i32 {
    error_code(&ClientError::NullArgument(name))
}

pub(crate) fn status_code(status: Status) -> i32 {
    i32::from(status.code())
}

/// Flatten a status-or-error into the C return code.
pub(crate) fn retcode(result: Result<Status, ClientError>) -> i32 {
    match result {
        Ok(status) => status_code(status),
        Err(err) => error_code(&err),
    }
}
