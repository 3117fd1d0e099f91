//! The request-execution engine shared by every verb.
//!
//! # Design
//! A query is: validate and assemble the header block, resolve and connect,
//! write header then body, read the status line. The header is built before
//! any network activity so oversized or malformed requests never open a
//! socket. The wire exchange is generic over `Read + Write` so it can be
//! driven by an in-memory stream in tests.
//!
//! The stream is owned by this function until it either returns it inside an
//! `Exchange` (keep-open mode) or drops it. Every error path drops it too.

use std::io::{self, Read, Write};
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};

use log::debug;

use crate::error::ClientError;
use crate::framing::read_line;
use crate::http::{Method, Status};
use crate::request::RequestDescriptor;

/// Upper bound on the assembled request line and headers, in bytes.
pub const MAX_HEADER_LEN: usize = 1024;

/// Upper bound on a single response line, in bytes consumed.
pub const MAX_LINE_LEN: usize = 511;

/// Whether the connection outlives the status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum QueryMode {
    Close,
    KeepOpen,
}

/// Status line outcome plus, in keep-open mode, the stream positioned on the
/// first response header byte.
#[derive(Debug)]
pub(crate) struct Exchange {
    pub status: Status,
    pub stream: Option<TcpStream>,
}

/// Run one request against the descriptor's target.
///
/// `headers` are extra `(name, value)` pairs sent after `User-Agent`. A body
/// is written only when present and non-empty.
pub(crate) fn query(
    req: &RequestDescriptor,
    method: Method,
    headers: &[(&str, &str)],
    mode: QueryMode,
    body: Option<&[u8]>,
) -> Result<Exchange, ClientError> {
    let header = build_request_header(req, method, headers)?;
    debug!("> {method} {}", request_target(req));

    let mut stream = connect(req)?;
    let status = exchange(&mut stream, &header, body)?;

    let stream = match mode {
        QueryMode::KeepOpen => Some(stream),
        QueryMode::Close => None,
    };
    Ok(Exchange { status, stream })
}

/// The request-URI: absolute form through a proxy, origin form otherwise.
fn request_target(req: &RequestDescriptor) -> String {
    match req.active_proxy() {
        Some(_) => req.url(),
        None => format!("/{}", req.pathname),
    }
}

fn reject_line_breaks(value: &str, field: &'static str) -> Result<(), ClientError> {
    if value.contains(['\r', '\n']) {
        return Err(ClientError::InvalidRequest(field));
    }
    Ok(())
}

/// Assemble the request line, `User-Agent`, extra headers and the blank line.
pub(crate) fn build_request_header(
    req: &RequestDescriptor,
    method: Method,
    headers: &[(&str, &str)],
) -> Result<Vec<u8>, ClientError> {
    reject_line_breaks(&req.server, "server")?;
    reject_line_breaks(&req.pathname, "path")?;
    reject_line_breaks(&req.user_agent, "user agent")?;
    for (name, value) in headers {
        reject_line_breaks(name, "header name")?;
        reject_line_breaks(value, "header value")?;
    }

    let mut header = format!("{method} {} HTTP/1.0\r\n", request_target(req));
    push_field(&mut header, "User-Agent", &req.user_agent);
    for (name, value) in headers {
        push_field(&mut header, name, value);
    }
    header.push_str("\r\n");

    if header.len() > MAX_HEADER_LEN {
        return Err(ClientError::RequestTooLarge {
            len: header.len(),
            limit: MAX_HEADER_LEN,
        });
    }
    Ok(header.into_bytes())
}

fn push_field(header: &mut String, name: &str, value: &str) {
    header.push_str(name);
    header.push_str(": ");
    header.push_str(value);
    header.push_str("\r\n");
}

/// Failures that happen before the peer is involved count as socket errors.
fn connect_error(kind: io::ErrorKind) -> ClientError {
    match kind {
        io::ErrorKind::PermissionDenied
        | io::ErrorKind::Unsupported
        | io::ErrorKind::OutOfMemory => ClientError::Socket(kind),
        _ => ClientError::Connect(kind),
    }
}

/// Resolve the target and connect to the first address that accepts.
fn connect(req: &RequestDescriptor) -> Result<TcpStream, ClientError> {
    let (host, port) = req.target();
    let addrs: Vec<SocketAddr> = (host, port)
        .to_socket_addrs()
        .map_err(|_| ClientError::HostNotFound(host.to_string()))?
        .collect();
    if addrs.is_empty() {
        return Err(ClientError::HostNotFound(host.to_string()));
    }

    let mut last_kind = io::ErrorKind::NotConnected;
    for addr in &addrs {
        debug!("connecting to {host}:{port} at {addr}");
        match TcpStream::connect(addr) {
            Ok(stream) => return Ok(stream),
            Err(e) => {
                debug!("connect to {addr} failed: {e}");
                last_kind = e.kind();
            }
        }
    }
    Err(connect_error(last_kind))
}

/// Write the header block and body, then read and parse the status line.
pub(crate) fn exchange<S: Read + Write>(
    stream: &mut S,
    header: &[u8],
    body: Option<&[u8]>,
) -> Result<Status, ClientError> {
    stream
        .write_all(header)
        .and_then(|()| stream.flush())
        .map_err(|e| ClientError::HeaderWrite(e.kind()))?;

    if let Some(body) = body.filter(|b| !b.is_empty()) {
        stream
            .write_all(body)
            .and_then(|()| stream.flush())
            .map_err(|e| ClientError::BodyWrite(e.kind()))?;
    }

    let line = read_line(stream, MAX_LINE_LEN).map_err(|_| ClientError::ResponseRead)?;
    debug!("< {}", String::from_utf8_lossy(&line));
    parse_status_line(&line)
        .ok_or_else(|| ClientError::MalformedStatus(String::from_utf8_lossy(&line).into_owned()))
}

/// Parse `HTTP/1.<minor> <code>[ reason]`, returning the three-digit code.
pub fn parse_status_line(line: &[u8]) -> Option<Status> {
    let rest = line.strip_prefix(b"HTTP/1.")?;

    let minor = rest.iter().take_while(|b| b.is_ascii_digit()).count();
    if minor == 0 {
        return None;
    }
    let rest = &rest[minor..];

    let gap = rest.iter().take_while(|&&b| b == b' ' || b == b'\t').count();
    if gap == 0 {
        return None;
    }
    let rest = &rest[gap..];

    let code = rest.get(..3)?;
    if !code.iter().all(u8::is_ascii_digit) {
        return None;
    }
    if !matches!(rest.get(3), None | Some(b' ' | b'\t')) {
        return None;
    }

    let value = code
        .iter()
        .fold(0u16, |acc, b| acc * 10 + u16::from(b - b'0'));
    Some(Status(value))
}
