//! `HttpStore` against an in-process `/canvas` server.

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, put};
use axum::{Json, Router};
use inkboard_core::store::{
    CanvasFile, CanvasStore, CreateRequest, FileId, HttpStore, StoreError, UpdateRequest,
};
use inkboard_core::{PointerEvent, Session, View};
use serde::Serialize;
use serde_json::json;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use url::Url;

const TOKEN: &str = "secret";
const CHANNEL: &str = "general";

#[derive(Clone)]
struct Server {
    files: Arc<Mutex<Vec<CanvasFile>>>,
    envelope: bool,
}

impl Server {
    fn new(envelope: bool) -> Self {
        Self {
            files: Arc::new(Mutex::new(Vec::new())),
            envelope,
        }
    }

    fn reply<T: Serialize>(&self, value: T) -> Response {
        if self.envelope {
            Json(json!({ "success": true, "data": value })).into_response()
        } else {
            Json(value).into_response()
        }
    }
}

fn authorized(headers: &HeaderMap) -> bool {
    let header = |name: &str| headers.get(name).and_then(|v| v.to_str().ok());
    header("authorization") == Some("Bearer secret") && header("x-channel-id") == Some(CHANNEL)
}

async fn list(State(server): State<Server>, headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    let files = server.files.lock().unwrap().clone();
    server.reply(files)
}

async fn create(
    State(server): State<Server>,
    headers: HeaderMap,
    Json(request): Json<CreateRequest>,
) -> Response {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    match request.name.as_str() {
        "full" => {
            return Json(json!({ "success": false, "message": "quota exceeded" })).into_response();
        }
        "boom" => return (StatusCode::INTERNAL_SERVER_ERROR, "exploded").into_response(),
        _ => {}
    }
    let file = {
        let mut files = server.files.lock().unwrap();
        let id = files.iter().map(|f| f.id.0).max().unwrap_or(0) + 1;
        let file = CanvasFile {
            id: FileId(id),
            name: request.name,
            data: Vec::new(),
            created_at: "2024-05-01T12:00:00Z".to_string(),
        };
        files.insert(0, file.clone());
        file
    };
    server.reply(file)
}

async fn update(
    State(server): State<Server>,
    Path(id): Path<i64>,
    headers: HeaderMap,
    Json(request): Json<UpdateRequest>,
) -> Response {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    let updated = {
        let mut files = server.files.lock().unwrap();
        files.iter_mut().find(|f| f.id.0 == id).map(|file| {
            file.data = request.data;
            file.clone()
        })
    };
    match updated {
        Some(file) => server.reply(file),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn remove(State(server): State<Server>, Path(id): Path<i64>, headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    let removed = {
        let mut files = server.files.lock().unwrap();
        let before = files.len();
        files.retain(|f| f.id.0 != id);
        files.len() != before
    };
    match (removed, server.envelope) {
        (false, _) => StatusCode::NOT_FOUND.into_response(),
        (true, true) => Json(json!({ "success": true })).into_response(),
        (true, false) => StatusCode::NO_CONTENT.into_response(),
    }
}

async fn spawn(server: Server) -> Url {
    let app = Router::new()
        .route("/api/canvas", get(list).post(create))
        .route("/api/canvas/{id}", put(update).delete(remove))
        .with_state(server);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    Url::parse(&format!("http://{}/api/", addr)).unwrap()
}

fn client(url: &Url) -> HttpStore {
    HttpStore::new(url, Duration::from_secs(5))
        .unwrap()
        .with_token(TOKEN)
        .with_channel(CHANNEL)
}

#[tokio::test(flavor = "current_thread")]
async fn test_crud_with_envelope() {
    let server = Server::new(true);
    let url = spawn(server.clone()).await;
    let store = client(&url);

    assert!(store.list().await.unwrap().is_empty());

    let first = store.create("  Notes ").await.unwrap();
    assert_eq!(first.id, FileId(1));
    assert_eq!(first.name, "Notes");
    assert!(first.created_date().is_some());

    let second = store.create("Sketch").await.unwrap();
    let files = store.list().await.unwrap();
    assert_eq!(files.iter().map(|f| f.id).collect::<Vec<_>>(), vec![second.id, first.id]);

    let data: Vec<_> = serde_json::from_str(
        r##"[{"type":"line","startX":0,"startY":0,"endX":10,"endY":10,
              "color":"#ff0000","strokeWidth":3}]"##,
    )
    .unwrap();
    let saved = store.update(first.id, &data).await.unwrap();
    assert_eq!(saved.data, data);
    assert_eq!(server.files.lock().unwrap()[1].data, data);

    store.delete(second.id).await.unwrap();
    let files = store.list().await.unwrap();
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].id, first.id);
}

#[tokio::test(flavor = "current_thread")]
async fn test_crud_with_bare_payloads() {
    let url = spawn(Server::new(false)).await;
    let store = client(&url);

    let file = store.create("Bare").await.unwrap();
    assert_eq!(store.list().await.unwrap(), vec![file.clone()]);

    let updated = store.update(file.id, &[]).await.unwrap();
    assert!(updated.data.is_empty());

    // 204 with no body.
    store.delete(file.id).await.unwrap();
    assert!(store.list().await.unwrap().is_empty());
}

#[tokio::test(flavor = "current_thread")]
async fn test_missing_credentials_are_unauthorized() {
    let url = spawn(Server::new(true)).await;
    let anonymous = HttpStore::new(&url, Duration::from_secs(5)).unwrap();
    assert!(matches!(anonymous.list().await, Err(StoreError::Unauthorized)));

    let wrong_channel = client(&url).with_channel("random");
    assert!(matches!(wrong_channel.create("x").await, Err(StoreError::Unauthorized)));
}

#[tokio::test(flavor = "current_thread")]
async fn test_unknown_document_is_not_found() {
    let url = spawn(Server::new(true)).await;
    let store = client(&url);
    assert!(matches!(store.update(FileId(42), &[]).await, Err(StoreError::NotFound(_))));
    assert!(matches!(store.delete(FileId(42)).await, Err(StoreError::NotFound(_))));
}

#[tokio::test(flavor = "current_thread")]
async fn test_server_failures_surface() {
    let server = Server::new(true);
    let url = spawn(server.clone()).await;
    let store = client(&url);

    match store.create("full").await {
        Err(StoreError::Rejected(message)) => assert_eq!(message, "quota exceeded"),
        other => panic!("expected rejection, got {:?}", other),
    }
    match store.create("boom").await {
        Err(StoreError::Http { status, message }) => {
            assert_eq!(status, 500);
            assert_eq!(message, "exploded");
        }
        other => panic!("expected HTTP error, got {:?}", other),
    }
    assert!(matches!(store.create("   ").await, Err(StoreError::InvalidName)));
    assert!(server.files.lock().unwrap().is_empty());
}

#[tokio::test(flavor = "current_thread")]
async fn test_unreachable_server_is_network_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let url = Url::parse(&format!("http://{}/api", addr)).unwrap();
    let store = client(&url);
    assert!(matches!(store.list().await, Err(StoreError::Network(_))));
}

#[tokio::test(flavor = "current_thread")]
async fn test_session_round_trip() {
    let server = Server::new(true);
    let url = spawn(server.clone()).await;
    let mut session = Session::new(Arc::new(client(&url)));

    assert!(session.refresh().await);
    let id = session.create("Whiteboard").await.unwrap();
    assert_eq!(session.view(), View::Editor);

    let canvas = session.canvas_mut();
    canvas.handle_pointer(PointerEvent::down(10.0, 10.0));
    canvas.handle_pointer(PointerEvent::moved(20.0, 15.0));
    canvas.handle_pointer(PointerEvent::Up);
    assert!(session.save().await);

    let stored = server.files.lock().unwrap()[0].clone();
    assert_eq!(stored.id, id);
    assert_eq!(stored.data.len(), 1);
    assert_eq!(stored.data[0].type_name(), "path");

    // A second session sees the saved drawing.
    let mut other = Session::new(Arc::new(client(&url)));
    assert!(other.refresh().await);
    assert!(other.open(id));
    assert_eq!(other.canvas().elements(), stored.data.as_slice());
}
