//! Minimal blocking HTTP/1.0 client for a single resource server.
//!
//! # Overview
//! Stores, fetches, inspects and removes resources with PUT, GET, HEAD and
//! DELETE over plain TCP, optionally through an HTTP proxy. Every call opens
//! its own connection, runs the exchange to completion and closes it.
//!
//! # Design
//! - A caller-owned `RequestDescriptor` carries server, port, proxy, user
//!   agent and path. There is no process-wide state.
//! - Outcomes are `Result<_, ClientError>`: any status the server sends is a
//!   success value carrying the three-digit code; only client-side failures
//!   are errors.
//! - Response headers are read one byte at a time so the stream is left on
//!   the first body byte. Bodies are framed by `Content-Length` only.
//! - Request headers are assembled with an explicit size limit
//!   (`MAX_HEADER_LEN`) and rejected with `RequestTooLarge` when exceeded.
//!
//! ```no_run
//! let req = http_tiny::parse_url("http://example.org:8080/data/file1")?;
//! let status = http_tiny::put(&req, b"hello", false, Some("text/plain"))?;
//! assert_eq!(status, http_tiny::Status::CREATED);
//! let response = http_tiny::get(&req)?;
//! assert_eq!(response.body, b"hello");
//! # Ok::<(), http_tiny::ClientError>(())
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod framing;
pub mod http;
pub mod query;
pub mod request;
pub mod url;

pub use client::{delete, get, head, put, MAX_CONTENT_TYPE_LEN};
pub use config::ClientConfig;
pub use error::ClientError;
pub use http::{HttpResponse, Method, Status};
pub use query::{MAX_HEADER_LEN, MAX_LINE_LEN};
pub use request::{parse_url, Proxy, RequestDescriptor, DEFAULT_USER_AGENT};
