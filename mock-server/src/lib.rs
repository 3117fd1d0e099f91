use std::{collections::HashMap, net::SocketAddr, sync::Arc};

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use tokio::{net::TcpListener, sync::RwLock};

/// Content type reported for resources stored without one.
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

#[derive(Clone, Debug)]
pub struct Resource {
    pub data: Bytes,
    pub content_type: Option<String>,
}

pub type Store = Arc<RwLock<HashMap<String, Resource>>>;

pub fn app() -> Router {
    let store: Store = Arc::new(RwLock::new(HashMap::new()));
    // HEAD is served by the GET handler; axum keeps Content-Length and drops the body.
    Router::new()
        .route(
            "/{*path}",
            get(get_resource).put(put_resource).delete(delete_resource),
        )
        .with_state(store)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

/// Start the server on an ephemeral loopback port in a background thread and
/// return the bound address.
pub fn spawn() -> std::io::Result<SocketAddr> {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0")?;
    let addr = std_listener.local_addr()?;
    std_listener.set_nonblocking(true)?;

    std::thread::spawn(move || -> std::io::Result<()> {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        rt.block_on(async {
            let listener = TcpListener::from_std(std_listener)?;
            run(listener).await
        })
    });

    Ok(addr)
}

/// True when a `Control` header carries the `overwrite=1` directive.
fn overwrite_requested(headers: &HeaderMap) -> bool {
    headers
        .get_all("control")
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .any(|directive| directive.trim() == "overwrite=1")
}

async fn put_resource(
    State(store): State<Store>,
    Path(path): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> StatusCode {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let resource = Resource {
        data: body,
        content_type,
    };

    let mut resources = store.write().await;
    let status = if !resources.contains_key(&path) {
        StatusCode::CREATED
    } else if overwrite_requested(&headers) {
        StatusCode::OK
    } else {
        return StatusCode::FORBIDDEN;
    };
    resources.insert(path, resource);
    status
}

async fn get_resource(
    State(store): State<Store>,
    Path(path): Path<String>,
) -> Result<Response, StatusCode> {
    let resources = store.read().await;
    let resource = resources.get(&path).ok_or(StatusCode::NOT_FOUND)?;
    let content_type = resource
        .content_type
        .clone()
        .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string());
    Ok(([(header::CONTENT_TYPE, content_type)], resource.data.clone()).into_response())
}

async fn delete_resource(State(store): State<Store>, Path(path): Path<String>) -> StatusCode {
    let mut resources = store.write().await;
    match resources.remove(&path) {
        Some(_) => StatusCode::OK,
        None => StatusCode::NOT_FOUND,
    }
}
