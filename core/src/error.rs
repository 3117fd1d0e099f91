//! Error types for the HTTP/1.0 client.
//!
//! # Design
//! Every client-side failure gets its own variant so callers can tell a
//! resolver failure from a refused connection, or a short header write from a
//! short body write. Server answers are never errors: any status line the
//! server sends comes back as `Ok(Status)`. Variants carry `io::ErrorKind`
//! rather than `io::Error` so the type stays `Clone + Eq`.

use std::fmt;
use std::io;

/// Client-side failures reported by parsing and by the verb operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// The target host name did not resolve to any address.
    HostNotFound(String),

    /// A socket could not be created for the resolved address.
    Socket(io::ErrorKind),

    /// Every resolved address refused or failed the connection.
    Connect(io::ErrorKind),

    /// Writing the request line and headers failed.
    HeaderWrite(io::ErrorKind),

    /// Writing the request body failed.
    BodyWrite(io::ErrorKind),

    /// The connection closed or failed before a complete response line or
    /// header line arrived.
    ResponseRead,

    /// The status line did not look like `HTTP/1.<minor> <code>`.
    MalformedStatus(String),

    /// A required output argument was missing (C-ABI callers only).
    NullArgument(&'static str),

    /// The response carried no usable `Content-Length`.
    NoContentLength,

    /// The response body buffer could not be allocated.
    OutOfMemory(u64),

    /// The connection closed before the declared body length arrived.
    BodyRead { expected: usize, received: usize },

    /// The URL does not start with `http://`.
    InvalidScheme,

    /// The URL port is not a number in 1..=65535.
    InvalidPort,

    /// The URL has no host before the port or path.
    MissingHost,

    /// The assembled request header exceeds the fixed buffer size.
    RequestTooLarge { len: usize, limit: usize },

    /// A request field contains a CR or LF byte.
    InvalidRequest(&'static str),

    /// The client configuration could not be loaded.
    Config(String),
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientError::HostNotFound(host) => write!(f, "no such host: {host}"),
            ClientError::Socket(kind) => write!(f, "cannot create socket: {kind}"),
            ClientError::Connect(kind) => write!(f, "cannot connect to host: {kind}"),
            ClientError::HeaderWrite(kind) => {
                write!(f, "write error while sending header: {kind}")
            }
            ClientError::BodyWrite(kind) => write!(f, "write error while sending data: {kind}"),
            ClientError::ResponseRead => write!(f, "read error while reading response header"),
            ClientError::MalformedStatus(line) => {
                write!(f, "invalid answer from server: {line:?}")
            }
            ClientError::NullArgument(name) => write!(f, "null argument: {name}"),
            ClientError::NoContentLength => write!(f, "no or bad content length in response"),
            ClientError::OutOfMemory(len) => {
                write!(f, "cannot allocate {len} bytes for response body")
            }
            ClientError::BodyRead { expected, received } => {
                write!(f, "read error while reading data: got {received} of {expected} bytes")
            }
            ClientError::InvalidScheme => write!(f, "invalid url: must start with 'http://'"),
            ClientError::InvalidPort => write!(f, "invalid port in url"),
            ClientError::MissingHost => write!(f, "invalid url: missing host"),
            ClientError::RequestTooLarge { len, limit } => {
                write!(f, "request header is {len} bytes, limit is {limit}")
            }
            ClientError::InvalidRequest(field) => {
                write!(f, "request {field} contains a line break")
            }
            ClientError::Config(msg) => write!(f, "invalid configuration: {msg}"),
        }
    }
}

impl std::error::Error for ClientError {}
