//! Full resource lifecycle against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then drives every verb over real
//! TCP. Also checks interop in both directions with ureq, so the bytes this
//! client stores are what an independent client reads back.

use std::net::SocketAddr;

use http_tiny::{delete, get, head, parse_url, put, ClientError, Proxy, RequestDescriptor, Status};

fn resource(addr: SocketAddr, path: &str) -> RequestDescriptor {
    parse_url(&format!("http://{addr}/{path}")).unwrap()
}

#[test]
fn resource_lifecycle() {
    let addr = mock_server::spawn().unwrap();
    let req = resource(addr, "data/file1");

    // Step 1: nothing stored yet.
    let resp = get(&req).unwrap();
    assert_eq!(resp.status, Status::NOT_FOUND);
    assert!(resp.body.is_empty());
    assert_eq!(resp.content_length, None);

    // Step 2: create.
    let status = put(&req, b"hello", false, Some("text/plain")).unwrap();
    assert_eq!(status, Status::CREATED);

    // Step 3: read back.
    let resp = get(&req).unwrap();
    assert_eq!(resp.status, Status::OK);
    assert_eq!(resp.body, b"hello");
    assert_eq!(resp.content_length, Some(5));
    assert_eq!(resp.content_type(), Some("text/plain"));

    // Step 4: headers only.
    let resp = head(&req).unwrap();
    assert_eq!(resp.status, Status::OK);
    assert_eq!(resp.content_length, Some(5));
    assert_eq!(resp.content_type(), Some("text/plain"));
    assert!(resp.body.is_empty());

    // Step 5: a second PUT without overwrite is refused and changes nothing.
    let status = put(&req, b"changed", false, Some("text/plain")).unwrap();
    assert_eq!(status, Status::FORBIDDEN);
    assert_eq!(get(&req).unwrap().body, b"hello");

    // Step 6: overwrite.
    let status = put(&req, b"changed", true, Some("text/markdown")).unwrap();
    assert_eq!(status, Status::OK);
    let resp = get(&req).unwrap();
    assert_eq!(resp.body, b"changed");
    assert_eq!(resp.content_type(), Some("text/markdown"));

    // Step 7: delete, then it is gone.
    assert_eq!(delete(&req).unwrap(), Status::OK);
    assert_eq!(get(&req).unwrap().status, Status::NOT_FOUND);
    assert_eq!(head(&req).unwrap().status, Status::NOT_FOUND);
    assert_eq!(delete(&req).unwrap(), Status::NOT_FOUND);
}

#[test]
fn binary_body_round_trips() {
    let addr = mock_server::spawn().unwrap();
    let req = resource(addr, "blobs/all-bytes");
    let data: Vec<u8> = (0..=255u8).cycle().take(100_000).collect();

    assert_eq!(put(&req, &data, false, None).unwrap(), Status::CREATED);

    let resp = get(&req).unwrap();
    assert_eq!(resp.status, Status::OK);
    assert_eq!(resp.content_length, Some(data.len() as u64));
    assert_eq!(resp.content_type(), Some(mock_server::DEFAULT_CONTENT_TYPE));
    assert!(resp.body == data, "body differs from what was stored");
}

#[test]
fn empty_resource_has_no_usable_length() {
    let addr = mock_server::spawn().unwrap();
    let req = resource(addr, "empty");

    assert_eq!(put(&req, b"", false, None).unwrap(), Status::CREATED);
    assert_eq!(get(&req), Err(ClientError::NoContentLength));
}

#[test]
fn descriptor_is_reusable_across_resources() {
    let addr = mock_server::spawn().unwrap();
    let mut req = resource(addr, "a");
    put(&req, b"first", false, None).unwrap();

    req.set_url(&format!("http://{addr}/b")).unwrap();
    put(&req, b"second", false, None).unwrap();

    assert_eq!(get(&resource(addr, "a")).unwrap().body, b"first");
    assert_eq!(get(&req).unwrap().body, b"second");
}

#[test]
fn inactive_proxy_connects_direct() {
    let addr = mock_server::spawn().unwrap();
    put(&resource(addr, "direct"), b"origin", false, None).unwrap();

    for proxy in [Proxy::new("127.0.0.1", 0), Proxy::new("", 3128)] {
        let req = resource(addr, "direct").with_proxy(proxy);
        let resp = get(&req).unwrap();
        assert_eq!(resp.status, Status::OK);
        assert_eq!(resp.body, b"origin");
    }
}

#[test]
fn ureq_reads_what_client_stored() {
    let addr = mock_server::spawn().unwrap();
    let req = resource(addr, "interop/out");
    put(&req, b"written by http-tiny", false, Some("text/plain")).unwrap();

    let mut response = ureq::get(&format!("http://{addr}/interop/out"))
        .call()
        .expect("HTTP transport error");
    assert_eq!(response.status().as_u16(), 200);
    let body = response.body_mut().read_to_string().unwrap();
    assert_eq!(body, "written by http-tiny");
}

#[test]
fn client_reads_what_ureq_stored() {
    let addr = mock_server::spawn().unwrap();
    ureq::put(&format!("http://{addr}/interop/in"))
        .content_type("text/plain")
        .send("written by ureq".as_bytes())
        .expect("HTTP transport error");

    let resp = get(&resource(addr, "interop/in")).unwrap();
    assert_eq!(resp.status, Status::OK);
    assert_eq!(resp.body, b"written by ureq");
    assert_eq!(resp.content_type(), Some("text/plain"));
}
