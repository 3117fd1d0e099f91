//! HTTP method, status and response value types.
//!
//! All fields use owned types so values can cross the C-ABI boundary in the
//! `ffi` crate without lifetime concerns.

use std::fmt;

/// Request methods supported by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Put,
    Head,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Put => "PUT",
            Method::Head => "HEAD",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Three-digit status code echoed verbatim from the server's status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Status(pub u16);

impl Status {
    pub const OK: Status = Status(200);
    pub const CREATED: Status = Status(201);
    pub const BAD_REQUEST: Status = Status(400);
    pub const FORBIDDEN: Status = Status(403);
    pub const NOT_FOUND: Status = Status(404);
    pub const REQUEST_TIMEOUT: Status = Status(408);
    pub const INTERNAL_SERVER_ERROR: Status = Status(500);
    pub const NOT_IMPLEMENTED: Status = Status(501);
    pub const SERVICE_UNAVAILABLE: Status = Status(503);

    pub fn code(self) -> u16 {
        self.0
    }

    pub fn is_success(self) -> bool {
        (200..300).contains(&self.0)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Outcome of a GET or HEAD.
///
/// For any status other than 200 only `status` is meaningful: the client
/// neither reads headers nor a body in that case. HEAD never fills `body`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: Status,
    pub content_length: Option<u64>,
    /// The first token of the `Content-Type` value, byte for byte.
    pub content_type: Option<Vec<u8>>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// The content type as text, when it is valid UTF-8.
    pub fn content_type(&self) -> Option<&str> {
        self.content_type
            .as_deref()
            .and_then(|token| std::str::from_utf8(token).ok())
    }

    pub(crate) fn status_only(status: Status) -> Self {
        Self {
            status,
            content_length: None,
            content_type: None,
            body: Vec::new(),
        }
    }
}
