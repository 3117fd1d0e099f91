//! GET, PUT, HEAD and DELETE on top of the query engine.
//!
//! # Design
//! Each verb is a free function taking a borrowed `RequestDescriptor`, so one
//! descriptor can serve any number of calls. GET and HEAD run the query in
//! keep-open mode and own the returned stream until they return; it is
//! dropped (closed) on every path, including errors and non-200 answers.

use std::io::Read;

use log::trace;

use crate::error::ClientError;
use crate::framing::{read_fixed, read_line};
use crate::http::{HttpResponse, Method, Status};
use crate::query::{query, Exchange, QueryMode, MAX_LINE_LEN};
use crate::request::RequestDescriptor;

/// Longest `Content-Type` value PUT will send.
pub const MAX_CONTENT_TYPE_LEN: usize = 64;

/// Body bytes read per fixed read.
const BODY_CHUNK_LEN: usize = 64 * 1024;

/// Store `data` at the descriptor's resource.
///
/// `overwrite` asks the server to replace an existing resource. Returns the
/// server's status, typically 201 for a new resource.
pub fn put(
    req: &RequestDescriptor,
    data: &[u8],
    overwrite: bool,
    content_type: Option<&str>,
) -> Result<Status, ClientError> {
    let length = data.len().to_string();
    let mut headers = vec![("Content-Length", length.as_str())];
    if let Some(content_type) = content_type {
        if content_type.len() > MAX_CONTENT_TYPE_LEN {
            return Err(ClientError::RequestTooLarge {
                len: content_type.len(),
                limit: MAX_CONTENT_TYPE_LEN,
            });
        }
        headers.push(("Content-Type", content_type));
    }
    if overwrite {
        headers.push(("Control", "overwrite=1"));
    }

    let exchange = query(req, Method::Put, &headers, QueryMode::Close, Some(data))?;
    Ok(exchange.status)
}

/// Fetch the descriptor's resource into memory.
///
/// A non-200 status is returned as-is with an empty body. On 200 the response
/// must declare a positive `Content-Length`, and exactly that many bytes are
/// read.
pub fn get(req: &RequestDescriptor) -> Result<HttpResponse, ClientError> {
    let exchange = query(req, Method::Get, &[], QueryMode::KeepOpen, None)?;
    let (status, mut stream) = match exchange {
        Exchange {
            status: Status::OK,
            stream: Some(stream),
        } => (Status::OK, stream),
        Exchange { status, .. } => return Ok(HttpResponse::status_only(status)),
    };

    let headers = read_response_headers(&mut stream)?;
    let length = headers
        .positive_length()
        .ok_or(ClientError::NoContentLength)?;
    let body = read_body(&mut stream, length)?;

    Ok(HttpResponse {
        status,
        content_length: Some(length),
        content_type: headers.content_type,
        body,
    })
}

/// Fetch only the headers of the descriptor's resource.
///
/// The body is never read, whatever length the server reports.
pub fn head(req: &RequestDescriptor) -> Result<HttpResponse, ClientError> {
    let exchange = query(req, Method::Head, &[], QueryMode::KeepOpen, None)?;
    let (status, mut stream) = match exchange {
        Exchange {
            status: Status::OK,
            stream: Some(stream),
        } => (Status::OK, stream),
        Exchange { status, .. } => return Ok(HttpResponse::status_only(status)),
    };

    let headers = read_response_headers(&mut stream)?;
    Ok(HttpResponse {
        status,
        content_length: headers.positive_length(),
        content_type: headers.content_type,
        body: Vec::new(),
    })
}

/// Remove the descriptor's resource.
pub fn delete(req: &RequestDescriptor) -> Result<Status, ClientError> {
    let exchange = query(req, Method::Delete, &[], QueryMode::Close, None)?;
    Ok(exchange.status)
}

/// The response headers the client cares about. Later occurrences override
/// earlier ones.
#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct ResponseHeaders {
    /// Signed so that an explicit negative or zero length is kept distinct
    /// from a missing header until the caller decides.
    pub content_length: Option<i64>,
    pub content_type: Option<Vec<u8>>,
}

impl ResponseHeaders {
    fn positive_length(&self) -> Option<u64> {
        self.content_length
            .filter(|&n| n > 0)
            .and_then(|n| u64::try_from(n).ok())
    }
}

/// Consume header lines up to and including the blank line.
pub(crate) fn read_response_headers<R: Read>(
    reader: &mut R,
) -> Result<ResponseHeaders, ClientError> {
    let mut headers = ResponseHeaders::default();

    loop {
        let line = read_line(reader, MAX_LINE_LEN).map_err(|_| ClientError::ResponseRead)?;
        if line.is_empty() {
            return Ok(headers);
        }
        trace!("< {}", String::from_utf8_lossy(&line));

        let Some(colon) = line.iter().position(|&b| b == b':') else {
            continue;
        };
        let (name, value) = (&line[..colon], &line[colon + 1..]);

        if name.eq_ignore_ascii_case(b"content-length") {
            if let Some(length) = parse_length(value) {
                headers.content_length = Some(length);
            }
        } else if name.eq_ignore_ascii_case(b"content-type") {
            if let Some(token) = first_token(value) {
                headers.content_type = Some(token.to_vec());
            }
        }
    }
}

/// Leading optionally-signed decimal integer, after skipping whitespace.
/// Trailing bytes are ignored.
fn parse_length(value: &[u8]) -> Option<i64> {
    let value = value.trim_ascii_start();
    let (negative, digits) = match value.split_first() {
        Some((b'-', rest)) => (true, rest),
        Some((b'+', rest)) => (false, rest),
        _ => (false, value),
    };

    let count = digits.iter().take_while(|b| b.is_ascii_digit()).count();
    if count == 0 {
        return None;
    }
    let magnitude = digits[..count].iter().try_fold(0i64, |acc, b| {
        acc.checked_mul(10)?.checked_add(i64::from(b - b'0'))
    })?;
    Some(if negative { -magnitude } else { magnitude })
}

/// First whitespace-delimited token, e.g. `text/html;` from
/// ` text/html; charset=utf-8`.
fn first_token(value: &[u8]) -> Option<&[u8]> {
    value
        .split(|b| b.is_ascii_whitespace())
        .find(|token| !token.is_empty())
}

/// Read exactly `length` body bytes. The buffer is reserved up front but only
/// initialised one chunk ahead of the bytes that have arrived.
fn read_body<R: Read>(reader: &mut R, length: u64) -> Result<Vec<u8>, ClientError> {
    let len = usize::try_from(length).map_err(|_| ClientError::OutOfMemory(length))?;
    let mut body = Vec::new();
    body.try_reserve_exact(len)
        .map_err(|_| ClientError::OutOfMemory(length))?;

    while body.len() < len {
        let start = body.len();
        body.resize(len.min(start + BODY_CHUNK_LEN), 0);
        read_fixed(reader, &mut body[start..]).map_err(|e| ClientError::BodyRead {
            expected: len,
            received: start + e.read,
        })?;
    }
    Ok(body)
}
